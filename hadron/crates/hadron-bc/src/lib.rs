//! hadron-bc - Bytecode for the Hadron pipeline
//!
//! The parser writes instructions straight into a [`Chunk`]; the VM reads
//! them back. This crate owns the instruction set, the chunk buffer, the
//! listing format used by `hadronc` and the `.hbc` file that stores a
//! compiled unit between runs.
//!
//! # Module Structure
//!
//! - [`opcode`] - [`OpCode`] bytes, widths and mnemonics
//! - [`chunk`] - The bounded, append-only [`Chunk`] and the [`Encode`] trait
//! - [`disasm`] - [`disassemble`]
//! - [`format`] - `.hbc` header, [`write_unit`] and [`read_unit`]
//! - [`error`] - [`ChunkError`] and [`FormatError`]
//!
//! # Example
//!
//! ```
//! use hadron_bc::{read_unit, write_unit, Chunk, OpCode};
//!
//! let mut chunk = Chunk::new();
//! chunk.emit_move(0, 42.0).unwrap();
//! chunk.emit(OpCode::Return).unwrap();
//!
//! let mut file = Vec::new();
//! write_unit(&mut file, "answer", &chunk).unwrap();
//! let unit = read_unit(&mut file.as_slice(), 1024).unwrap();
//! assert_eq!(unit.name, "answer");
//! assert_eq!(unit.chunk, chunk);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chunk;
pub mod disasm;
pub mod error;
pub mod format;
pub mod opcode;

pub use chunk::{Chunk, Encode};
pub use disasm::disassemble;
pub use error::{ChunkError, FormatError};
pub use format::{read_unit, read_unit_file, write_unit, write_unit_file, Header, Unit};
pub use opcode::{OpCode, MOVE_WIDTH};
