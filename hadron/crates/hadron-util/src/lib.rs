//! hadron-util - Shared foundation types for the Hadron pipeline
//!
//! Every phase of the pipeline (lexer, parser/code generator, bytecode
//! tooling, VM and driver) reports positions, errors and resource ceilings
//! through the types in this crate.
//!
//! # Module Structure
//!
//! - [`span`] - Source positions attached to tokens and errors
//! - [`diagnostic`] - Leveled diagnostics, stable error codes and the
//!   [`Handler`] that applies the strict/accumulate error policy
//! - [`limits`] - Configurable fixed-capacity ceilings (chunk, stack,
//!   symbol table, literal arena)
//! - [`error`] - Errors raised by this crate itself
//!
//! # Example
//!
//! ```
//! use hadron_util::{Diagnostic, ErrorMode, Handler, Span};
//!
//! let handler = Handler::new(ErrorMode::Strict);
//! handler.emit_diagnostic(Diagnostic::error("unexpected character '`'", Span::DUMMY));
//! assert!(handler.should_abort());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod diagnostic;
pub mod error;
pub mod limits;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticCode, ErrorMode, Handler, Level, ToDiagnostic};
pub use error::LimitsError;
pub use limits::Limits;
pub use span::Span;
