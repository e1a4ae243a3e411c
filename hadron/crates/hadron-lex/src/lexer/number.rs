//! Number literal lexing.
//!
//! One pass classifies and decodes decimal, hexadecimal (`0x`), octal
//! (`0o`, or "loose" octal such as `017`), binary (`0b`) and floating-point
//! literals. The base prefix is only recognized directly after a leading
//! `0`, so the scanner carries a parallel octal value for `0`-prefixed
//! literals until it knows whether they stay octal (`017`) or turn out to be
//! decimal (`0.5`, `09`, `0e1`).
//!
//! Rules shared by every base:
//! - `_` and `'` separate digit groups; a separator must sit between two
//!   digits.
//! - Exponent digits are always decimal. Decimal literals use `e`, hex
//!   literals use `p` (a power of two); octal and binary have no exponent.
//! - A hex literal with a fraction needs a `p` exponent.
//! - `1..` is the number `1` followed by a range operator.

use crate::error::{LexError, LexResult};
use crate::input::InputSource;
use crate::token::{Literal, Token, TokenKind};
use crate::Lexer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Radix {
    Decimal,
    Hex,
    Octal,
    Binary,
}

impl Radix {
    fn base(self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Hex => 16,
            Radix::Octal => 8,
            Radix::Binary => 2,
        }
    }

    fn kind(self) -> TokenKind {
        match self {
            Radix::Decimal => TokenKind::Decimal,
            Radix::Hex => TokenKind::Hex,
            Radix::Octal => TokenKind::Octal,
            Radix::Binary => TokenKind::Binary,
        }
    }

    fn prefix_name(self) -> &'static str {
        match self {
            Radix::Decimal => "number start",
            Radix::Hex => "base-16 prefix",
            Radix::Octal => "base-8 prefix",
            Radix::Binary => "base-2 prefix",
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Exponent {
    negative: bool,
    value: i32,
    digits: usize,
}

impl Exponent {
    fn signed(&self) -> i32 {
        if self.negative {
            -self.value
        } else {
            self.value
        }
    }
}

/// Scanner state for one numeric literal.
struct NumberState {
    radix: Radix,
    leading_zero: bool,
    mantissa: f64,
    /// Still a loose-octal candidate (`0` followed only by octal digits).
    loose: bool,
    loose_value: f64,
    /// Digits since the start or since the base prefix.
    digits: usize,
    /// Divisor for the next fraction digit, once a `.` was seen.
    fraction_scale: Option<f64>,
    exponent: Option<Exponent>,
    prev_digit: bool,
    pending_separator: bool,
}

impl NumberState {
    fn new(first: u8) -> Self {
        let leading_zero = first == b'0';
        Self {
            radix: Radix::Decimal,
            leading_zero,
            mantissa: f64::from(first - b'0'),
            loose: leading_zero,
            loose_value: 0.0,
            digits: 1,
            fraction_scale: None,
            exponent: None,
            prev_digit: true,
            pending_separator: false,
        }
    }

    /// Value of `c` as a digit in the current context, if it is one.
    ///
    /// Decimal digits beyond the base are still reported so the caller can
    /// raise `InvalidDigit` for them.
    fn digit(&self, c: u8) -> Option<u32> {
        if self.exponent.is_some() || self.radix != Radix::Hex {
            return c.is_ascii_digit().then(|| u32::from(c - b'0'));
        }
        char::from(c).to_digit(16)
    }

    fn commit_prefix(&mut self, radix: Radix) {
        self.radix = radix;
        self.loose = false;
        self.digits = 0;
        self.prev_digit = false;
    }
}

impl<'a, S: InputSource> Lexer<'a, S> {
    /// Lexes a numeric literal whose first digit has been consumed.
    pub(crate) fn lex_number(&mut self, first: u8) -> LexResult<Token<'a>> {
        let mut state = NumberState::new(first);

        while !self.at_end() {
            let c = self.current();
            let at_prefix = state.leading_zero && self.offset == self.token_start + 1;

            if let Some(value) = state.digit(c) {
                self.advance();
                self.push_digit(&mut state, c, value)?;
                continue;
            }

            if state.pending_separator {
                return Err(self.malformed("digit separator must be followed by a digit"));
            }

            match c {
                b'_' | b'\'' => {
                    if !state.prev_digit {
                        self.advance();
                        return Err(self.malformed("digit separator must follow a digit"));
                    }
                    state.pending_separator = true;
                    state.prev_digit = false;
                    self.advance();
                },
                b'.' => {
                    if self.peek() == b'.' {
                        // `..` belongs to a range operator.
                        break;
                    }
                    self.advance();
                    if state.exponent.is_some() {
                        return Err(self.malformed("fractional part after exponent"));
                    }
                    if state.fraction_scale.is_some() {
                        return Err(self.malformed("multiple decimal points"));
                    }
                    match state.radix {
                        Radix::Octal => {
                            return Err(self.malformed("fractional part in octal literal"))
                        },
                        Radix::Binary => {
                            return Err(self.malformed("fractional part in binary literal"))
                        },
                        Radix::Decimal | Radix::Hex => {},
                    }
                    state.loose = false;
                    state.fraction_scale = Some(1.0);
                    state.prev_digit = false;
                },
                b'x' | b'X' => {
                    self.advance();
                    if !at_prefix {
                        return Err(self.malformed("'x' is only valid after a leading 0"));
                    }
                    state.commit_prefix(Radix::Hex);
                    let next = self.current();
                    if self.at_end() || !(next.is_ascii_hexdigit() || next == b'.') {
                        return Err(LexError::MissingDigits {
                            what: Radix::Hex.prefix_name(),
                            span: self.span(),
                        });
                    }
                },
                b'o' | b'O' => {
                    self.advance();
                    if !at_prefix {
                        return Err(self.malformed("'o' is only valid after a leading 0"));
                    }
                    state.commit_prefix(Radix::Octal);
                },
                b'b' | b'B' => {
                    self.advance();
                    if !at_prefix {
                        return Err(self.malformed("'b' is only valid after a leading 0"));
                    }
                    state.commit_prefix(Radix::Binary);
                },
                b'e' | b'E' => match state.radix {
                    Radix::Octal => {
                        self.advance();
                        return Err(self.malformed("exponent in octal literal"));
                    },
                    Radix::Binary => {
                        self.advance();
                        return Err(self.malformed("exponent in binary literal"));
                    },
                    Radix::Decimal | Radix::Hex => self.start_exponent(&mut state)?,
                },
                b'p' | b'P' => {
                    if state.radix != Radix::Hex {
                        self.advance();
                        return Err(self.malformed("'p' exponent in non-hexadecimal literal"));
                    }
                    self.start_exponent(&mut state)?;
                },
                b'a' | b'c' | b'd' | b'f' | b'A' | b'C' | b'D' | b'F' => {
                    self.advance();
                    return Err(self.malformed(if state.exponent.is_some() {
                        "non-decimal digit in exponent"
                    } else {
                        "hexadecimal digit in non-hexadecimal literal"
                    }));
                },
                _ => break,
            }
        }

        self.finish_number(state)
    }

    fn push_digit(&mut self, state: &mut NumberState, c: u8, value: u32) -> LexResult<()> {
        state.prev_digit = true;
        state.pending_separator = false;

        if let Some(exponent) = state.exponent.as_mut() {
            exponent.value = exponent
                .value
                .saturating_mul(10)
                .saturating_add(value as i32);
            exponent.digits += 1;
            return Ok(());
        }

        let base = state.radix.base();
        if value >= base {
            return Err(LexError::InvalidDigit {
                digit: char::from(c),
                base,
                span: self.span(),
            });
        }

        let base = f64::from(base);
        let value = f64::from(value);
        match state.fraction_scale.as_mut() {
            Some(scale) => {
                *scale *= base;
                state.mantissa += value / *scale;
            },
            None => {
                state.mantissa = state.mantissa * base + value;
                if state.loose {
                    if value >= 8.0 {
                        state.loose = false;
                    } else {
                        state.loose_value = state.loose_value * 8.0 + value;
                    }
                }
            },
        }
        state.digits += 1;
        Ok(())
    }

    fn start_exponent(&mut self, state: &mut NumberState) -> LexResult<()> {
        self.advance();
        if state.exponent.is_some() {
            return Err(self.malformed("multiple exponents"));
        }
        let mut exponent = Exponent::default();
        match self.current() {
            b'+' if !self.at_end() => self.advance(),
            b'-' if !self.at_end() => {
                exponent.negative = true;
                self.advance();
            },
            _ => {},
        }
        state.loose = false;
        state.exponent = Some(exponent);
        state.prev_digit = false;
        Ok(())
    }

    fn finish_number(&mut self, state: NumberState) -> LexResult<Token<'a>> {
        if state.pending_separator {
            return Err(self.malformed("trailing digit separator"));
        }
        if state.digits == 0 {
            return Err(LexError::MissingDigits {
                what: state.radix.prefix_name(),
                span: self.span(),
            });
        }
        if let Some(exponent) = state.exponent {
            if exponent.digits == 0 {
                return Err(LexError::MissingDigits {
                    what: "exponent",
                    span: self.span(),
                });
            }
        }

        let (kind, value) = match state.radix {
            Radix::Hex => {
                if state.fraction_scale.is_some() && state.exponent.is_none() {
                    return Err(self.malformed("hexadecimal fraction requires a 'p' exponent"));
                }
                let power = state.exponent.map_or(0, |e| e.signed());
                (TokenKind::Hex, state.mantissa * 2f64.powi(power))
            },
            Radix::Octal | Radix::Binary => (state.radix.kind(), state.mantissa),
            Radix::Decimal if state.loose && state.digits > 1 => {
                (TokenKind::Octal, state.loose_value)
            },
            Radix::Decimal => (TokenKind::Decimal, self.parse_decimal_span()?),
        };

        if !value.is_finite() {
            return Err(self.malformed("literal is out of range"));
        }

        Ok(self.literal_token(kind, Literal::Number(value)))
    }

    /// Re-reads the literal and lets the standard library round it.
    fn parse_decimal_span(&mut self) -> LexResult<f64> {
        let start = self.token_start;
        let length = self.offset - start;
        let text: String = self
            .reread(start, length)?
            .iter()
            .filter(|&&b| b != b'_' && b != b'\'')
            .map(|&b| char::from(b))
            .collect();
        text.parse::<f64>()
            .map_err(|_| self.malformed("not a valid decimal number"))
    }

    fn malformed(&self, reason: &'static str) -> LexError {
        LexError::MalformedNumber {
            reason,
            span: self.span(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;

    use crate::error::LexError;
    use crate::token::TokenKind;
    use crate::{Lexer, StringInput};

    fn lex_num(source: &str) -> Result<(TokenKind, f64), LexError> {
        let arena = Bump::new();
        let mut lexer = Lexer::new(StringInput::new(source), &arena);
        let token = lexer.next_token()?;
        Ok((token.kind, token.number().unwrap_or(f64::NAN)))
    }

    fn value(source: &str) -> f64 {
        lex_num(source).unwrap().1
    }

    #[test]
    fn test_decimal_integer() {
        assert_eq!(lex_num("123").unwrap(), (TokenKind::Decimal, 123.0));
        assert_eq!(lex_num("0").unwrap(), (TokenKind::Decimal, 0.0));
        assert_eq!(value("9007199254740993"), 9007199254740993.0);
    }

    #[test]
    fn test_hex_integer() {
        assert_eq!(lex_num("0x1F").unwrap(), (TokenKind::Hex, 31.0));
        assert_eq!(value("0XfF"), 255.0);
        assert_eq!(value("0xB"), 11.0);
        assert_eq!(value("0x1e5"), 485.0);
        assert_eq!(value("0xAB_CD"), 43981.0);
    }

    #[test]
    fn test_hex_float_uses_binary_exponent() {
        assert_eq!(value("0x1p4"), 16.0);
        assert_eq!(value("0x1.8p1"), 3.0);
        assert_eq!(value("0x10p-2"), 4.0);
        assert_eq!(value("0x.8p1"), 1.0);
    }

    #[test]
    fn test_binary_integer() {
        assert_eq!(lex_num("0b101").unwrap(), (TokenKind::Binary, 5.0));
        assert_eq!(value("0B1111_0000"), 240.0);
    }

    #[test]
    fn test_octal_integer() {
        assert_eq!(lex_num("0o17").unwrap(), (TokenKind::Octal, 15.0));
        assert_eq!(value("0O777"), 511.0);
    }

    #[test]
    fn test_loose_octal() {
        assert_eq!(lex_num("017").unwrap(), (TokenKind::Octal, 15.0));
        assert_eq!(lex_num("0_17").unwrap(), (TokenKind::Octal, 15.0));
        assert_eq!(lex_num("00").unwrap(), (TokenKind::Octal, 0.0));
    }

    #[test]
    fn test_leading_zero_that_turns_decimal() {
        assert_eq!(lex_num("09").unwrap(), (TokenKind::Decimal, 9.0));
        assert_eq!(lex_num("0.5").unwrap(), (TokenKind::Decimal, 0.5));
        assert_eq!(lex_num("017.5").unwrap(), (TokenKind::Decimal, 17.5));
        assert_eq!(lex_num("01e2").unwrap(), (TokenKind::Decimal, 100.0));
    }

    #[test]
    fn test_float() {
        assert_eq!(value("1.5e2"), 150.0);
        assert_eq!(value("2.5E-1"), 0.25);
        assert_eq!(value("1e+3"), 1000.0);
        assert_eq!(value("3.25"), 3.25);
        assert_eq!(value("7."), 7.0);
    }

    #[test]
    fn test_separators() {
        assert_eq!(value("1_000"), 1000.0);
        assert_eq!(value("1'000'000"), 1_000_000.0);
        assert_eq!(value("1_0.2_5"), 10.25);
    }

    #[test]
    fn test_separator_errors() {
        for source in ["1__0", "1_", "1_'0", "1._5", "1_.5"] {
            assert!(
                matches!(lex_num(source), Err(LexError::MalformedNumber { .. })),
                "{source}"
            );
        }
    }

    #[test]
    fn test_digit_out_of_base() {
        assert!(matches!(
            lex_num("0b2"),
            Err(LexError::InvalidDigit {
                digit: '2',
                base: 2,
                ..
            })
        ));
        assert!(matches!(
            lex_num("0o8"),
            Err(LexError::InvalidDigit { base: 8, .. })
        ));
    }

    #[test]
    fn test_missing_digits() {
        for source in ["0x", "0x;", "0x_1", "0b", "0o", "1e", "1e+", "0x1p"] {
            assert!(
                matches!(lex_num(source), Err(LexError::MissingDigits { .. })),
                "{source}"
            );
        }
    }

    #[test]
    fn test_structural_errors() {
        for source in [
            "0b1.0", "0o1.0", "0b1e1", "0x1.8", "1.2.3", "1e2e3", "1e2.5", "12a", "1f", "10x1",
            "2o7", "3b1", "1p3",
        ] {
            assert!(
                matches!(lex_num(source), Err(LexError::MalformedNumber { .. })),
                "{source}"
            );
        }
    }

    #[test]
    fn test_range_after_number() {
        let arena = Bump::new();
        let kinds: Vec<_> = Lexer::new(StringInput::new("1..5"), &arena)
            .map(|t| t.unwrap())
            .map(|t| (t.kind, t.number()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (TokenKind::Decimal, Some(1.0)),
                (TokenKind::DotDot, None),
                (TokenKind::Decimal, Some(5.0)),
                (TokenKind::End, None),
            ]
        );
    }

    #[test]
    fn test_fraction_then_range() {
        let arena = Bump::new();
        let mut lexer = Lexer::new(StringInput::new("1.5..=2"), &arena);
        assert_eq!(lexer.next_token().unwrap().number(), Some(1.5));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::DotDotEq);
    }

    #[test]
    fn test_letters_after_number_end_it() {
        let arena = Bump::new();
        let mut lexer = Lexer::new(StringInput::new("3g"), &arena);
        assert_eq!(lexer.next_token().unwrap().number(), Some(3.0));
        assert_eq!(lexer.next_token().unwrap().text(), Some("g"));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            lex_num("1e400"),
            Err(LexError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_number_span() {
        let arena = Bump::new();
        let mut lexer = Lexer::new(StringInput::new("x = 0x1F;"), &arena);
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let span = lexer.next_token().unwrap().span;
        assert_eq!((span.byte_start, span.byte_end), (4, 8));
        assert_eq!((span.col_start, span.col_end), (5, 9));
    }
}
