//! Pratt dispatch table.
//!
//! # Precedence (lowest to highest)
//!
//! | Level | Tokens | Handlers |
//! |-------|--------|----------|
//! | Assignment | `=` `+=` `**=` ... | none |
//! | LogicalOr | `\|\|` | binary |
//! | LogicalAnd | `&&` | binary |
//! | BitOr | `\|` | binary |
//! | BitXor | `^` | binary |
//! | BitAnd | `&` | binary |
//! | Equality | `==` `!=` | binary |
//! | Comparison | `<` `<=` `>` `>=` | binary |
//! | Shift | `<<` `>>` | binary |
//! | Term | `+` `-` | unary, binary |
//! | Factor | `*` `/` `%` | binary |
//! | Exponent | `**` | binary, right-associative |
//! | Range | `..` `=..` `..=` `=..=` | range |
//! | Unary | `!` `~` | unary |
//! | Unary | `++` `--` | none |
//! | Grouping | `(` | grouping |
//! | Literal | numbers, strings, names | literal, name |
//!
//! Every other token has [`Precedence::Null`]; `fx` is the only keyword
//! with a handler.

use hadron_lex::{InputSource, Token, TokenKind};

use crate::error::ParseResult;
use crate::parser::Parser;

/// Binding strength, compared against the caller's threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Binds nothing; also the threshold for a full expression
    Null,
    /// Assignment forms
    Assignment,
    /// `||`
    LogicalOr,
    /// `&&`
    LogicalAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `&`
    BitAnd,
    /// `==` `!=`
    Equality,
    /// `<` `<=` `>` `>=`
    Comparison,
    /// `<<` `>>`
    Shift,
    /// `+` `-`
    Term,
    /// `*` `/` `%`
    Factor,
    /// `**`
    Exponent,
    /// Range operators
    Range,
    /// Prefix operators
    Unary,
    /// `(`
    Grouping,
    /// Literals and names
    Literal,
}

/// Handler for a token that starts an expression.
pub type NudFn<'a, S> = fn(&mut Parser<'a, S>, Token<'a>) -> ParseResult<()>;

/// Handler for a token that follows a left operand.
pub type LedFn<'a, S> = fn(&mut Parser<'a, S>, Token<'a>) -> ParseResult<()>;

/// One row of the dispatch table.
pub struct ParseRule<'a, S: InputSource> {
    /// Binding strength of the token in infix position
    pub precedence: Precedence,
    /// Prefix handler
    pub nud: Option<NudFn<'a, S>>,
    /// Infix handler
    pub led: Option<LedFn<'a, S>>,
}

/// Binding strength of `kind`.
pub fn precedence(kind: TokenKind) -> Precedence {
    use TokenKind::*;
    match kind {
        HashEq | DollarEq | Eq | PlusEq | MinusEq | StarEq | SlashEq | AndAndEq | OrOrEq
        | AndEq | OrEq | CaretEq | StarStarEq | PercentEq | ShrEq | ShlEq => {
            Precedence::Assignment
        },
        OrOr => Precedence::LogicalOr,
        AndAnd => Precedence::LogicalAnd,
        Or => Precedence::BitOr,
        Caret => Precedence::BitXor,
        And => Precedence::BitAnd,
        EqEq | BangEq => Precedence::Equality,
        Less | LessEq | Greater | GreaterEq => Precedence::Comparison,
        Shl | Shr => Precedence::Shift,
        Plus | Minus => Precedence::Term,
        Star | Slash | Percent => Precedence::Factor,
        StarStar => Precedence::Exponent,
        DotDot | EqDotDot | DotDotEq | EqDotDotEq => Precedence::Range,
        Bang | Tilde | PlusPlus | MinusMinus => Precedence::Unary,
        LParen => Precedence::Grouping,
        Decimal | Hex | Octal | Binary | String | Name => Precedence::Literal,
        _ => Precedence::Null,
    }
}

/// Dispatch table lookup.
pub fn rule<'a, S: InputSource>(kind: TokenKind) -> ParseRule<'a, S> {
    use TokenKind::*;
    let (nud, led): (Option<NudFn<'a, S>>, Option<LedFn<'a, S>>) = match kind {
        Decimal | Hex | Octal | Binary | String => (Some(Parser::literal), None),
        Name => (Some(Parser::name), None),
        LParen => (Some(Parser::grouping), None),
        Fx => (Some(Parser::function), None),
        Plus | Minus => (Some(Parser::unary), Some(Parser::binary)),
        Bang | Tilde => (Some(Parser::unary), None),
        Star | Slash | Percent | StarStar | AndAnd | OrOr | And | Or | Caret | Shl | Shr
        | EqEq | BangEq | Less | LessEq | Greater | GreaterEq => (None, Some(Parser::binary)),
        DotDot | EqDotDot | DotDotEq | EqDotDotEq => (None, Some(Parser::range)),
        _ => (None, None),
    };
    ParseRule {
        precedence: precedence(kind),
        nud,
        led,
    }
}
