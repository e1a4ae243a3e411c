//! Runtime faults.

use std::io;

use hadron_bc::OpCode;
use hadron_util::diagnostic::{
    E_DRIVER_IO, E_VM_MISSING_RETURN, E_VM_NOT_AN_INTEGER, E_VM_STACK_OVERFLOW,
    E_VM_STACK_UNDERFLOW, E_VM_TRUNCATED_INSTRUCTION, E_VM_UNINITIALIZED_VARIABLE,
    E_VM_UNKNOWN_OPCODE,
};
use hadron_util::{Diagnostic, Span, ToDiagnostic};
use thiserror::Error;

/// Error raised while executing a chunk.
///
/// Offsets are byte offsets of the faulting instruction within the chunk.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// An instruction needed more operands than the stack holds
    #[error("stack underflow in {op}")]
    StackUnderflow {
        /// The instruction that popped
        op: OpCode,
        /// Its offset
        offset: usize,
    },

    /// A push went past the configured stack depth
    #[error("stack overflow: depth limit is {capacity}")]
    StackOverflow {
        /// Configured stack capacity
        capacity: usize,
        /// Offset of the pushing instruction
        offset: usize,
    },

    /// A byte that is not an opcode
    #[error("unknown opcode 0x{byte:02x}")]
    UnknownOpcode {
        /// The byte
        byte: u8,
        /// Its offset
        offset: usize,
    },

    /// The operands of the last instruction run past the end of the chunk
    #[error("truncated {op} instruction")]
    TruncatedInstruction {
        /// The cut-off instruction
        op: OpCode,
        /// Its offset
        offset: usize,
    },

    /// The chunk ended before any `RETURN`
    #[error("reached end of chunk without RETURN")]
    MissingReturn {
        /// Chunk length in bytes
        len: usize,
    },

    /// Bitwise operand with a fractional part or out of integer range
    #[error("{op} needs integer operands, got {value}")]
    NotAnInteger {
        /// The bitwise instruction
        op: OpCode,
        /// Offending operand
        value: f64,
        /// Offset of the instruction
        offset: usize,
    },

    /// `LOAD` of a slot no `STORE` has written
    #[error("variable slot {slot} read before it was set")]
    UninitializedVariable {
        /// Variable slot
        slot: u8,
        /// Offset of the `LOAD`
        offset: usize,
    },

    /// Writing the result failed
    #[error("cannot write result: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    /// Offset of the faulting instruction, if the fault has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            RuntimeError::StackUnderflow { offset, .. }
            | RuntimeError::StackOverflow { offset, .. }
            | RuntimeError::UnknownOpcode { offset, .. }
            | RuntimeError::TruncatedInstruction { offset, .. }
            | RuntimeError::NotAnInteger { offset, .. }
            | RuntimeError::UninitializedVariable { offset, .. } => Some(*offset),
            RuntimeError::MissingReturn { .. } | RuntimeError::Output(_) => None,
        }
    }
}

impl ToDiagnostic for RuntimeError {
    fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            RuntimeError::StackUnderflow { .. } => E_VM_STACK_UNDERFLOW,
            RuntimeError::StackOverflow { .. } => E_VM_STACK_OVERFLOW,
            RuntimeError::UnknownOpcode { .. } => E_VM_UNKNOWN_OPCODE,
            RuntimeError::TruncatedInstruction { .. } => E_VM_TRUNCATED_INSTRUCTION,
            RuntimeError::MissingReturn { .. } => E_VM_MISSING_RETURN,
            RuntimeError::NotAnInteger { .. } => E_VM_NOT_AN_INTEGER,
            RuntimeError::UninitializedVariable { .. } => E_VM_UNINITIALIZED_VARIABLE,
            RuntimeError::Output(_) => E_DRIVER_IO,
        };
        let diag = Diagnostic::error(self.to_string(), Span::DUMMY).with_code(code);
        match self.offset() {
            Some(offset) => diag.with_note(format!("at offset 0x{:04x}", offset)),
            None => diag,
        }
    }
}

/// Result type alias using RuntimeError
pub type RuntimeResult<T> = Result<T, RuntimeError>;
