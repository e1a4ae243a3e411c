//! hadron-par - Parser and code generator for the Hadron language
//!
//! A single-pass Pratt parser: tokens are pulled from the lexer one at a
//! time and bytecode is written to the unit's [`Chunk`] as soon as each
//! operand and operator is recognised. Names of functions, variables and
//! string literals go into a fixed-size [`SymbolTable`].
//!
//! # Example Usage
//!
//! ```
//! use hadron_bc::OpCode;
//! use hadron_par::compile_source;
//! use hadron_util::Limits;
//!
//! let chunk = compile_source("(1 + 2) * 3;", &Limits::default()).unwrap();
//! assert_eq!(chunk.code()[0], OpCode::Move.byte());
//! assert_eq!(chunk.last_op(), Some(OpCode::Return));
//! ```
//!
//! # Statements
//!
//! A statement is one expression ended by `;`, a line break or end of
//! input. Line breaks inside parentheses do not end a statement. Each
//! statement is followed by `RETURN`, so a unit with at least one statement
//! always ends in `RETURN`.
//!
//! # Error Handling
//!
//! Compilation stops at the first [`ParseError`]; lexer, chunk capacity and
//! symbol table failures are wrapped in it.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

#[cfg(test)]
mod edge_cases;

pub mod error;
pub mod parser;
pub mod rules;
pub mod symbol;

pub use error::{ParseError, ParseResult};
pub use parser::{Parser, MAX_VARIABLES};
pub use rules::{precedence, rule, ParseRule, Precedence};
pub use symbol::{Symbol, SymbolError, SymbolKind, SymbolTable};

use bumpalo::Bump;
use hadron_bc::Chunk;
use hadron_lex::{InputSource, Lexer, StringInput};
use hadron_util::Limits;

/// Output of compiling one unit.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// Generated code
    pub chunk: Chunk,
    /// Functions, variables and strings seen
    pub symbols: SymbolTable,
    /// Number of statements, i.e. `RETURN`s emitted
    pub statements: usize,
}

/// Compile everything `input` yields.
///
/// The literal arena lives only for the duration of the call.
pub fn compile<S: InputSource>(input: S, limits: &Limits) -> ParseResult<Compiled> {
    let arena = Bump::new();
    let lexer = Lexer::with_limits(input, &arena, limits);
    let mut parser = Parser::with_limits(lexer, limits)?;
    let statements = parser.parse_program()?;
    let (chunk, symbols) = parser.into_parts();
    Ok(Compiled {
        chunk,
        symbols,
        statements,
    })
}

/// Compile a source string and keep only the chunk.
pub fn compile_source(source: &str, limits: &Limits) -> ParseResult<Chunk> {
    compile(StringInput::new(source), limits).map(|compiled| compiled.chunk)
}
