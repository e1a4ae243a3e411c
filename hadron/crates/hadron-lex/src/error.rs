//! Lexical errors.

use hadron_util::diagnostic::{
    E_LEXER_ARENA_EXHAUSTED, E_LEXER_INPUT, E_LEXER_INVALID_DIGIT, E_LEXER_INVALID_RANGE,
    E_LEXER_INVALID_UTF8,
    E_LEXER_MALFORMED_NUMBER, E_LEXER_MISSING_DIGITS, E_LEXER_UNEXPECTED_CHAR,
    E_LEXER_UNTERMINATED_COMMENT, E_LEXER_UNTERMINATED_STRING,
};
use hadron_util::{Diagnostic, Span, ToDiagnostic};
use thiserror::Error;

/// Error produced while scanning one token.
///
/// Every variant carries the span of the offending token (or of the part
/// scanned so far).
#[derive(Debug, Error)]
pub enum LexError {
    /// A byte that cannot start any token
    #[error("unexpected character '{found}'")]
    UnexpectedCharacter {
        /// The byte, escaped for display
        found: String,
        /// Where it was found
        span: Span,
    },

    /// Quoted string reached a newline (for `"`/`'`) or end of input
    #[error("unterminated string literal")]
    UnterminatedString {
        /// From the opening quote to where scanning stopped
        span: Span,
    },

    /// Block comment without `*/`
    #[error("unterminated block comment")]
    UnterminatedComment {
        /// From `/*` to end of input
        span: Span,
    },

    /// A numeric literal that breaks the literal grammar
    #[error("malformed numeric literal: {reason}")]
    MalformedNumber {
        /// What was wrong
        reason: &'static str,
        /// The literal scanned so far
        span: Span,
    },

    /// A digit that does not exist in the literal's base
    #[error("invalid digit '{digit}' in base-{base} literal")]
    InvalidDigit {
        /// The digit
        digit: char,
        /// The literal's base
        base: u32,
        /// The literal scanned so far
        span: Span,
    },

    /// A base prefix or exponent marker with nothing after it
    #[error("no digits after {what}")]
    MissingDigits {
        /// `base-16 prefix`, `exponent`, ...
        what: &'static str,
        /// The literal scanned so far
        span: Span,
    },

    /// `...`
    #[error("'...' is not a range operator")]
    InvalidRange {
        /// The three dots
        span: Span,
    },

    /// Literal text exceeds the arena ceiling
    #[error("literal text needs {requested} bytes but only {available} of {capacity} remain")]
    ArenaExhausted {
        /// Bytes needed for this literal
        requested: usize,
        /// Bytes still free
        available: usize,
        /// Configured arena size
        capacity: usize,
        /// The literal
        span: Span,
    },

    /// Token text is not valid UTF-8
    #[error("invalid UTF-8 in token text at byte {valid_up_to}")]
    InvalidUtf8 {
        /// Offset of the first bad byte within the token
        valid_up_to: usize,
        /// The token
        span: Span,
    },

    /// Re-reading the token's text from the input failed
    #[error("failed to read token text: {source}")]
    Io {
        /// The token whose text was being read
        span: Span,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
}

impl LexError {
    /// Span of the offending input.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::MalformedNumber { span, .. }
            | LexError::InvalidDigit { span, .. }
            | LexError::MissingDigits { span, .. }
            | LexError::InvalidRange { span }
            | LexError::ArenaExhausted { span, .. }
            | LexError::InvalidUtf8 { span, .. }
            | LexError::Io { span, .. } => *span,
        }
    }

    pub(crate) fn unexpected(byte: u8, span: Span) -> Self {
        LexError::UnexpectedCharacter {
            found: byte.escape_ascii().to_string(),
            span,
        }
    }
}

impl ToDiagnostic for LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            LexError::UnexpectedCharacter { .. } => E_LEXER_UNEXPECTED_CHAR,
            LexError::UnterminatedString { .. } => E_LEXER_UNTERMINATED_STRING,
            LexError::UnterminatedComment { .. } => E_LEXER_UNTERMINATED_COMMENT,
            LexError::MalformedNumber { .. } => E_LEXER_MALFORMED_NUMBER,
            LexError::InvalidDigit { .. } => E_LEXER_INVALID_DIGIT,
            LexError::MissingDigits { .. } => E_LEXER_MISSING_DIGITS,
            LexError::InvalidRange { .. } => E_LEXER_INVALID_RANGE,
            LexError::ArenaExhausted { .. } => E_LEXER_ARENA_EXHAUSTED,
            LexError::InvalidUtf8 { .. } => E_LEXER_INVALID_UTF8,
            LexError::Io { .. } => E_LEXER_INPUT,
        };
        Diagnostic::error(self.to_string(), self.span()).with_code(code)
    }
}

/// Result type alias using LexError
pub type LexResult<T> = Result<T, LexError>;
