//! Parse and code generation errors.

use hadron_bc::ChunkError;
use hadron_lex::{LexError, Literal, Token, TokenKind};
use hadron_util::diagnostic::{
    E_PARSER_DUPLICATE_SYMBOL, E_PARSER_EXPECTED_TOKEN, E_PARSER_INVALID_LIMITS,
    E_PARSER_SYMBOL_TABLE_FULL, E_PARSER_TOO_DEEP, E_PARSER_TOO_MANY_VARIABLES, E_PARSER_UNDEFINED_NAME, E_PARSER_UNEXPECTED_OPERATOR,
    E_PARSER_UNEXPECTED_TOKEN,
};
use hadron_util::{Diagnostic, LimitsError, Span, ToDiagnostic};
use thiserror::Error;

use crate::symbol::SymbolError;

/// First error met while compiling a unit.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The lexer failed on the next token
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The chunk ran out of room
    #[error("{source}")]
    Chunk {
        /// Underlying capacity failure
        #[source]
        source: ChunkError,
        /// Token whose code did not fit
        span: Span,
    },

    /// Symbol table rejected an insert
    #[error("{source}")]
    Symbol {
        /// Underlying table failure
        #[source]
        source: SymbolError,
        /// The name being declared
        span: Span,
    },

    /// A token with no prefix handler where an expression must start
    #[error("unexpected token '{found}'")]
    UnexpectedToken {
        /// The token, as written
        found: String,
        /// Where it was found
        span: Span,
    },

    /// A token with no infix handler after a complete operand
    #[error("unexpected operator '{found}'")]
    UnexpectedOperator {
        /// The token, as written
        found: String,
        /// Where it was found
        span: Span,
    },

    /// A required token was missing
    #[error("{message}, found '{found}'")]
    Expected {
        /// What was required
        message: &'static str,
        /// What was there instead
        found: String,
        /// Where it was found
        span: Span,
    },

    /// Reference to a name that is not a declared variable
    #[error("undefined name '{name}'")]
    UndefinedName {
        /// The name
        name: String,
        /// Where it was used
        span: Span,
    },

    /// More variables than `LOAD`/`STORE` can address
    #[error("too many variables: at most {max} per unit")]
    TooManyVariables {
        /// Slot limit
        max: usize,
        /// The declaration that did not fit
        span: Span,
    },

    /// Parentheses or prefix operators nested past `limits.max_depth`
    #[error("expression nested too deeply: at most {max} levels")]
    TooDeep {
        /// Configured nesting limit
        max: usize,
        /// The token that would open one level too many
        span: Span,
    },

    /// The limits given to the parser are unusable
    #[error("invalid limits: {0}")]
    Limits(#[from] LimitsError),
}

impl ParseError {
    /// Where the error happened.
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::Chunk { span, .. }
            | ParseError::Symbol { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedOperator { span, .. }
            | ParseError::Expected { span, .. }
            | ParseError::UndefinedName { span, .. }
            | ParseError::TooManyVariables { span, .. }
            | ParseError::TooDeep { span, .. } => *span,
            ParseError::Limits(_) => Span::DUMMY,
        }
    }

    pub(crate) fn unexpected_token(token: &Token<'_>) -> Self {
        ParseError::UnexpectedToken {
            found: spelling(token),
            span: token.span,
        }
    }

    pub(crate) fn unexpected_operator(token: &Token<'_>) -> Self {
        ParseError::UnexpectedOperator {
            found: spelling(token),
            span: token.span,
        }
    }

    pub(crate) fn expected(message: &'static str, token: &Token<'_>) -> Self {
        ParseError::Expected {
            message,
            found: spelling(token),
            span: token.span,
        }
    }
}

/// How a token is shown in messages.
fn spelling(token: &Token<'_>) -> String {
    match (token.kind, token.literal) {
        (TokenKind::String, Literal::Text(text)) => format!("\"{}\"", text),
        (_, Literal::Text(text)) => text.to_string(),
        (_, Literal::Number(value)) => value.to_string(),
        (kind, Literal::None) => kind.as_str().to_string(),
    }
}

impl ToDiagnostic for ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            ParseError::Lex(err) => return err.to_diagnostic(),
            ParseError::Chunk { source, span } => {
                let mut diag = source.to_diagnostic();
                diag.span = *span;
                return diag;
            },
            ParseError::Symbol { source, .. } => match source {
                SymbolError::Duplicate { .. } => E_PARSER_DUPLICATE_SYMBOL,
                SymbolError::Full { .. } => E_PARSER_SYMBOL_TABLE_FULL,
            },
            ParseError::UnexpectedToken { .. } => E_PARSER_UNEXPECTED_TOKEN,
            ParseError::UnexpectedOperator { .. } => E_PARSER_UNEXPECTED_OPERATOR,
            ParseError::Expected { .. } => E_PARSER_EXPECTED_TOKEN,
            ParseError::UndefinedName { .. } => E_PARSER_UNDEFINED_NAME,
            ParseError::TooManyVariables { .. } => E_PARSER_TOO_MANY_VARIABLES,
            ParseError::TooDeep { .. } => E_PARSER_TOO_DEEP,
            ParseError::Limits(_) => E_PARSER_INVALID_LIMITS,
        };
        Diagnostic::error(self.to_string(), self.span()).with_code(code)
    }
}

/// Result type alias using ParseError
pub type ParseResult<T> = Result<T, ParseError>;
