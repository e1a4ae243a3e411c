//! Operator and punctuation lexing.
//!
//! Each `lex_*` method runs after the first byte has been consumed and uses
//! [`Lexer::match_byte`] to take the longest spelling.

use crate::error::{LexError, LexResult};
use crate::input::InputSource;
use crate::token::TokenKind;
use crate::Lexer;

impl<'a, S: InputSource> Lexer<'a, S> {
    /// `+`, `+=`, `++`
    pub(crate) fn lex_plus(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            TokenKind::PlusEq
        } else if self.match_byte(b'+') {
            TokenKind::PlusPlus
        } else {
            TokenKind::Plus
        }
    }

    /// `-`, `-=`, `--`
    pub(crate) fn lex_minus(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            TokenKind::MinusEq
        } else if self.match_byte(b'-') {
            TokenKind::MinusMinus
        } else {
            TokenKind::Minus
        }
    }

    /// `*`, `*=`, `**`, `**=`
    pub(crate) fn lex_star(&mut self) -> TokenKind {
        if self.match_byte(b'*') {
            if self.match_byte(b'=') {
                TokenKind::StarStarEq
            } else {
                TokenKind::StarStar
            }
        } else if self.match_byte(b'=') {
            TokenKind::StarEq
        } else {
            TokenKind::Star
        }
    }

    /// `/`, `/=` (comments are consumed before dispatch)
    pub(crate) fn lex_slash(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            TokenKind::SlashEq
        } else {
            TokenKind::Slash
        }
    }

    /// `%`, `%=`
    pub(crate) fn lex_percent(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            TokenKind::PercentEq
        } else {
            TokenKind::Percent
        }
    }

    /// `!`, `!=`
    pub(crate) fn lex_bang(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            TokenKind::BangEq
        } else {
            TokenKind::Bang
        }
    }

    /// `=`, `==`, `=..`, `=..=`
    pub(crate) fn lex_equals(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            return TokenKind::EqEq;
        }
        if self.current() == b'.' && self.peek() == b'.' {
            self.advance();
            self.advance();
            return if self.match_byte(b'=') {
                TokenKind::EqDotDotEq
            } else {
                TokenKind::EqDotDot
            };
        }
        TokenKind::Eq
    }

    /// `<`, `<=`, `<<`, `<<=`
    pub(crate) fn lex_less(&mut self) -> TokenKind {
        if self.match_byte(b'<') {
            if self.match_byte(b'=') {
                TokenKind::ShlEq
            } else {
                TokenKind::Shl
            }
        } else if self.match_byte(b'=') {
            TokenKind::LessEq
        } else {
            TokenKind::Less
        }
    }

    /// `>`, `>=`, `>>`, `>>=`
    pub(crate) fn lex_greater(&mut self) -> TokenKind {
        if self.match_byte(b'>') {
            if self.match_byte(b'=') {
                TokenKind::ShrEq
            } else {
                TokenKind::Shr
            }
        } else if self.match_byte(b'=') {
            TokenKind::GreaterEq
        } else {
            TokenKind::Greater
        }
    }

    /// `&`, `&=`, `&&`, `&&=`
    pub(crate) fn lex_ampersand(&mut self) -> TokenKind {
        if self.match_byte(b'&') {
            if self.match_byte(b'=') {
                TokenKind::AndAndEq
            } else {
                TokenKind::AndAnd
            }
        } else if self.match_byte(b'=') {
            TokenKind::AndEq
        } else {
            TokenKind::And
        }
    }

    /// `|`, `|=`, `||`, `||=`
    pub(crate) fn lex_pipe(&mut self) -> TokenKind {
        if self.match_byte(b'|') {
            if self.match_byte(b'=') {
                TokenKind::OrOrEq
            } else {
                TokenKind::OrOr
            }
        } else if self.match_byte(b'=') {
            TokenKind::OrEq
        } else {
            TokenKind::Or
        }
    }

    /// `^`, `^=`
    pub(crate) fn lex_caret(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            TokenKind::CaretEq
        } else {
            TokenKind::Caret
        }
    }

    /// `#`, `#=`
    pub(crate) fn lex_hash(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            TokenKind::HashEq
        } else {
            TokenKind::Hash
        }
    }

    /// `$`, `$=` (a `$` followed by a name byte is an identifier)
    pub(crate) fn lex_dollar(&mut self) -> TokenKind {
        if self.match_byte(b'=') {
            TokenKind::DollarEq
        } else {
            TokenKind::Dollar
        }
    }

    /// `.`, `..`, `..=`; `...` is rejected
    pub(crate) fn lex_dot(&mut self) -> LexResult<TokenKind> {
        if !self.match_byte(b'.') {
            return Ok(TokenKind::Dot);
        }
        if self.match_byte(b'=') {
            return Ok(TokenKind::DotDotEq);
        }
        if self.current() == b'.' {
            self.advance();
            return Err(LexError::InvalidRange { span: self.span() });
        }
        Ok(TokenKind::DotDot)
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;

    use crate::error::LexError;
    use crate::token::TokenKind::{self, *};
    use crate::{Lexer, StringInput};

    fn kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        let mut out: Vec<TokenKind> = Lexer::new(StringInput::new(source), &arena)
            .map(|t| t.unwrap().kind)
            .collect();
        assert_eq!(out.pop(), Some(End));
        out
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(kinds("&&="), vec![AndAndEq]);
        assert_eq!(kinds("&& &= &"), vec![AndAnd, AndEq, And]);
        assert_eq!(kinds("||= || |= |"), vec![OrOrEq, OrOr, OrEq, Or]);
        assert_eq!(kinds("**= ** *= *"), vec![StarStarEq, StarStar, StarEq, Star]);
        assert_eq!(kinds("<<= << <= <"), vec![ShlEq, Shl, LessEq, Less]);
        assert_eq!(kinds(">>= >> >= >"), vec![ShrEq, Shr, GreaterEq, Greater]);
    }

    #[test]
    fn test_single_byte_punctuation() {
        assert_eq!(
            kinds("( ) { } [ ] , ; : ? @ ~ # $"),
            vec![
                LParen, RParen, LBrace, RBrace, LBracket, RBracket, Comma, Semicolon, Colon,
                Question, At, Tilde, Hash, Dollar
            ]
        );
    }

    #[test]
    fn test_assignment_family() {
        assert_eq!(
            kinds("#= $= = += -= /= ++ -- ^= %="),
            vec![HashEq, DollarEq, Eq, PlusEq, MinusEq, SlashEq, PlusPlus, MinusMinus, CaretEq, PercentEq]
        );
    }

    #[test]
    fn test_ranges() {
        assert_eq!(kinds(".. =.. ..= =..="), vec![DotDot, EqDotDot, DotDotEq, EqDotDotEq]);
        assert_eq!(kinds("a..b"), vec![Name, DotDot, Name]);
        assert_eq!(kinds("=.="), vec![Eq, Dot, Eq]);
    }

    #[test]
    fn test_triple_dot_is_an_error() {
        let arena = Bump::new();
        let mut lexer = Lexer::new(StringInput::new("..."), &arena);
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, LexError::InvalidRange { .. }));
        assert_eq!(err.span().len(), 3);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(kinds("== != ! ="), vec![EqEq, BangEq, Bang, Eq]);
    }
}
