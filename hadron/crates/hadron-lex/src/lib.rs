//! hadron-lex - Lexical Analyzer for the Hadron language
//!
//! This crate turns a byte stream into [`Token`]s, one at a time. It is the
//! first phase of the pipeline; the parser pulls tokens on demand and never
//! holds more than the current and previous one.
//!
//! # Example Usage
//!
//! ```
//! use bumpalo::Bump;
//! use hadron_lex::{Lexer, StringInput, TokenKind};
//!
//! let arena = Bump::new();
//! let mut lexer = Lexer::new(StringInput::new("fx main() { 0x1F }"), &arena);
//!
//! assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Fx);
//! assert_eq!(lexer.next_token().unwrap().text(), Some("main"));
//! ```
//!
//! # Module Structure
//!
//! - [`input`] - The [`InputSource`] trait with string and file sources
//! - [`token`] - Token kinds, groups and literal payloads
//! - [`lexer`] - The scanner itself
//! - [`error`] - [`LexError`]
//!
//! # Token Categories
//!
//! ## Keywords
//!
//! `as`, `async`, `await`, `case`, `class`, `default`, `do`, `else`,
//! `false`, `for`, `from`, `fx`, `if`, `import`, `new`, `null`, `return`,
//! `select`, `switch`, `true`, `while`
//!
//! ## Names
//!
//! Pattern: `[A-Za-z_$][A-Za-z0-9_$]*`
//!
//! ## Literals
//!
//! - **Decimal**: `42`, `3.25`, `1.5e2`, `1_000`
//! - **Hexadecimal**: `0x1F`, `0x1.8p1`
//! - **Octal**: `0o17`, `017`
//! - **Binary**: `0b101`
//! - **String**: `"text"`, `'text'`, `` `multi-line` ``
//!
//! ## Operators
//!
//! - **Arithmetic**: `+`, `-`, `*`, `/`, `%`, `**`
//! - **Comparison**: `==`, `!=`, `<`, `>`, `<=`, `>=`
//! - **Logical**: `&&`, `||`, `!`
//! - **Bitwise**: `&`, `|`, `^`, `~`, `<<`, `>>`
//! - **Range**: `..`, `=..`, `..=`, `=..=`
//! - **Assignment**: `=` and the compound forms (`+=`, `**=`, `&&=`, ...)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod input;
pub mod lexer;
pub mod token;

#[cfg(test)]
mod edge_cases;

pub use error::{LexError, LexResult};
pub use input::{FileInput, InputSource, StringInput};
pub use lexer::Lexer;
pub use token::{keyword_from_ident, Literal, Token, TokenGroup, TokenKind};

/// Lex a whole string, collecting every token up to and including `End`.
///
/// Stops at the first error.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use hadron_lex::{tokenize, TokenKind};
///
/// let arena = Bump::new();
/// let tokens = tokenize("2 ** 8", &arena).unwrap();
/// assert_eq!(tokens[1].kind, TokenKind::StarStar);
/// assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::End));
/// ```
pub fn tokenize<'a>(source: &str, arena: &'a bumpalo::Bump) -> LexResult<Vec<Token<'a>>> {
    Lexer::new(StringInput::new(source), arena).collect()
}
