//! hadron-vm - Bytecode interpreter for the Hadron pipeline
//!
//! Runs a [`Chunk`](hadron_bc::Chunk) produced by `hadron-par` or read back
//! from a `.hbc` file. The machine has an `f64` operand stack of fixed depth
//! and 256 variable slots; there is no heap and no call stack.
//!
//! # Example Usage
//!
//! ```
//! use hadron_par::compile_source;
//! use hadron_util::Limits;
//! use hadron_vm::Vm;
//!
//! let limits = Limits::default();
//! let chunk = compile_source("(1 + 2) * 3;", &limits).unwrap();
//! let mut out = Vec::new();
//! Vm::new(&limits).interpret(&chunk, &mut out).unwrap();
//! assert_eq!(out, b"9\n");
//! ```
//!
//! # Error Handling
//!
//! Every fault is a [`RuntimeError`] carrying the offset of the instruction
//! that raised it. Unknown opcodes and truncated operands are faults, not
//! aborts.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod vm;

pub use error::{RuntimeError, RuntimeResult};
pub use format::format_g;
pub use vm::{InterpretResult, Vm, VARIABLE_SLOTS};
