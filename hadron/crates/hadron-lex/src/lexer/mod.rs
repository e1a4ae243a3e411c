//! Lexer module.
//!
//! The implementation is split by token family, each file adding an
//! `impl Lexer` block:
//! - `core` - Lexer state, position tracking and first-byte dispatch
//! - `comment` - Whitespace and comment skipping
//! - `operator` - Operators and punctuation
//! - `string` - Quoted string literals
//! - `identifier` - Names and keywords
//! - `number` - The numeric literal state machine

mod comment;
mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use core::Lexer;
