//! Token definitions.
//!
//! A [`Token`] is a small `Copy` value: a [`TokenKind`], the [`Span`] it was
//! read from, its decoded [`Literal`] and the per-unit constant index used by
//! the code generator for numeric literals.

use std::fmt;

use hadron_util::Span;

/// Every token the lexer can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ===== Comparison =====
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,

    // ===== Assignment =====
    /// `#=`
    HashEq,
    /// `$=`
    DollarEq,
    /// `=`
    Eq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `&&=`
    AndAndEq,
    /// `||=`
    OrOrEq,
    /// `&=`
    AndEq,
    /// `|=`
    OrEq,
    /// `^=`
    CaretEq,
    /// `**=`
    StarStarEq,
    /// `%=`
    PercentEq,
    /// `>>=`
    ShrEq,
    /// `<<=`
    ShlEq,

    // ===== Keywords =====
    /// `as`
    As,
    /// `async`
    Async,
    /// `await`
    Await,
    /// `case`
    Case,
    /// `class`
    Class,
    /// `default`
    Default,
    /// `do`
    Do,
    /// `else`
    Else,
    /// `false`
    False,
    /// `for`
    For,
    /// `from`
    From,
    /// `fx`
    Fx,
    /// `if`
    If,
    /// `import`
    Import,
    /// `new`
    New,
    /// `null`
    Null,
    /// `return`
    Return,
    /// `select`
    Select,
    /// `switch`
    Switch,
    /// `true`
    True,
    /// `while`
    While,

    // ===== Literals and structure =====
    /// Quoted string
    String,
    /// Identifier
    Name,
    /// Decimal number
    Decimal,
    /// `0x` number
    Hex,
    /// `0o` or loose octal number
    Octal,
    /// `0b` number
    Binary,
    /// `.`
    Dot,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `@`
    At,
    /// `#`
    Hash,
    /// `$`
    Dollar,
    /// `?`
    Question,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `:`
    Colon,
    /// End of input
    End,

    // ===== Ranges =====
    /// `..`
    DotDot,
    /// `=..`
    EqDotDot,
    /// `..=`
    DotDotEq,
    /// `=..=`
    EqDotDotEq,

    // ===== Operators =====
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `**`
    StarStar,
    /// `%`
    Percent,
}

/// The partition of [`TokenKind`] into families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenGroup {
    /// `==` `!=` `<` ...
    Comparison,
    /// `=` and compound assignments
    Assignment,
    /// Reserved words
    Keyword,
    /// Literals, names, punctuation and end of input
    Literal,
    /// The four range spellings
    Range,
    /// Arithmetic, bitwise and logical operators
    Operator,
}

impl TokenKind {
    /// Which family this kind belongs to.
    pub fn group(self) -> TokenGroup {
        use TokenKind::*;
        match self {
            EqEq | BangEq | Greater | GreaterEq | Less | LessEq => TokenGroup::Comparison,
            HashEq | DollarEq | Eq | PlusEq | MinusEq | StarEq | SlashEq | PlusPlus
            | MinusMinus | AndAndEq | OrOrEq | AndEq | OrEq | CaretEq | StarStarEq
            | PercentEq | ShrEq | ShlEq => TokenGroup::Assignment,
            As | Async | Await | Case | Class | Default | Do | Else | False | For | From | Fx
            | If | Import | New | Null | Return | Select | Switch | True | While => {
                TokenGroup::Keyword
            },
            String | Name | Decimal | Hex | Octal | Binary | Dot | Semicolon | Comma | At
            | Hash | Dollar | Question | LBracket | RBracket | LParen | RParen | LBrace
            | RBrace | Colon | End => TokenGroup::Literal,
            DotDot | EqDotDot | DotDotEq | EqDotDotEq => TokenGroup::Range,
            Plus | Minus | Star | Slash | AndAnd | OrOr | And | Or | Caret | Tilde | Bang
            | Shl | Shr | StarStar | Percent => TokenGroup::Operator,
        }
    }

    /// Whether this kind is one of the numeric literal kinds.
    pub fn is_number(self) -> bool {
        matches!(
            self,
            TokenKind::Decimal | TokenKind::Hex | TokenKind::Octal | TokenKind::Binary
        )
    }

    /// Whether this is a reserved word.
    pub fn is_keyword(self) -> bool {
        self.group() == TokenGroup::Keyword
    }

    /// Source spelling, or a description for kinds without a fixed one.
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            EqEq => "==",
            BangEq => "!=",
            Greater => ">",
            GreaterEq => ">=",
            Less => "<",
            LessEq => "<=",
            HashEq => "#=",
            DollarEq => "$=",
            Eq => "=",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PlusPlus => "++",
            MinusMinus => "--",
            AndAndEq => "&&=",
            OrOrEq => "||=",
            AndEq => "&=",
            OrEq => "|=",
            CaretEq => "^=",
            StarStarEq => "**=",
            PercentEq => "%=",
            ShrEq => ">>=",
            ShlEq => "<<=",
            As => "as",
            Async => "async",
            Await => "await",
            Case => "case",
            Class => "class",
            Default => "default",
            Do => "do",
            Else => "else",
            False => "false",
            For => "for",
            From => "from",
            Fx => "fx",
            If => "if",
            Import => "import",
            New => "new",
            Null => "null",
            Return => "return",
            Select => "select",
            Switch => "switch",
            True => "true",
            While => "while",
            String => "string",
            Name => "name",
            Decimal => "decimal number",
            Hex => "hex number",
            Octal => "octal number",
            Binary => "binary number",
            Dot => ".",
            Semicolon => ";",
            Comma => ",",
            At => "@",
            Hash => "#",
            Dollar => "$",
            Question => "?",
            LBracket => "[",
            RBracket => "]",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            Colon => ":",
            End => "end of input",
            DotDot => "..",
            EqDotDot => "=..",
            DotDotEq => "..=",
            EqDotDotEq => "=..=",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            AndAnd => "&&",
            OrOr => "||",
            And => "&",
            Or => "|",
            Caret => "^",
            Tilde => "~",
            Bang => "!",
            Shl => "<<",
            Shr => ">>",
            StarStar => "**",
            Percent => "%",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded literal payload of a token.
///
/// Text borrows from the compilation unit's arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal<'a> {
    /// Operators, keywords, punctuation
    None,
    /// Numeric literal value
    Number(f64),
    /// String contents (without quotes) or identifier text
    Text(&'a str),
}

/// A lexical token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'a> {
    /// Token kind
    pub kind: TokenKind,
    /// Where the token was read from
    pub span: Span,
    /// Decoded payload
    pub literal: Literal<'a>,
    /// Per-unit ordinal of numeric and string literals, wrapping at 256
    pub constant_index: u8,
}

impl<'a> Token<'a> {
    /// Create a token without a payload.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            literal: Literal::None,
            constant_index: 0,
        }
    }

    /// Numeric value, if this is a number token.
    pub fn number(&self) -> Option<f64> {
        match self.literal {
            Literal::Number(value) => Some(value),
            _ => None,
        }
    }

    /// Text payload, if this is a string or name token.
    pub fn text(&self) -> Option<&'a str> {
        match self.literal {
            Literal::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this is the end-of-input token.
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.literal {
            Literal::Number(value) => write!(f, "{} {}", self.kind, value),
            Literal::Text(text) if self.kind == TokenKind::String => {
                write!(f, "{} {:?}", self.kind, text)
            },
            Literal::Text(text) => write!(f, "{} {}", self.kind, text),
            Literal::None => write!(f, "{}", self.kind),
        }
    }
}

/// Look up a reserved word.
///
/// Dispatches on the first byte before comparing the whole word.
///
/// # Examples
///
/// ```
/// use hadron_lex::{keyword_from_ident, TokenKind};
///
/// assert_eq!(keyword_from_ident("fx"), Some(TokenKind::Fx));
/// assert_eq!(keyword_from_ident("await"), Some(TokenKind::Await));
/// assert_eq!(keyword_from_ident("fxx"), None);
/// ```
pub fn keyword_from_ident(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let first = *ident.as_bytes().first()?;
    let kind = match first {
        b'a' => match ident {
            "as" => As,
            "async" => Async,
            "await" => Await,
            _ => return None,
        },
        b'c' => match ident {
            "case" => Case,
            "class" => Class,
            _ => return None,
        },
        b'd' => match ident {
            "default" => Default,
            "do" => Do,
            _ => return None,
        },
        b'e' if ident == "else" => Else,
        b'f' => match ident {
            "false" => False,
            "for" => For,
            "from" => From,
            "fx" => Fx,
            _ => return None,
        },
        b'i' => match ident {
            "if" => If,
            "import" => Import,
            _ => return None,
        },
        b'n' => match ident {
            "new" => New,
            "null" => Null,
            _ => return None,
        },
        b'r' if ident == "return" => Return,
        b's' => match ident {
            "select" => Select,
            "switch" => Switch,
            _ => return None,
        },
        b't' if ident == "true" => True,
        b'w' if ident == "while" => While,
        _ => return None,
    };
    Some(kind)
}
