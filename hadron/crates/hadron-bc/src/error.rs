//! Bytecode and file format errors.

use hadron_util::diagnostic::{
    E_CHUNK_CAPACITY, E_FORMAT_BAD_MAGIC, E_FORMAT_INVALID_NAME, E_FORMAT_IO,
    E_FORMAT_NAME_TOO_LONG, E_FORMAT_TRUNCATED,
};
use hadron_util::{Diagnostic, Span, ToDiagnostic};
use thiserror::Error;

/// Error writing into a [`Chunk`](crate::Chunk).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// The write would cross the chunk's fixed capacity
    #[error("chunk capacity exceeded: {needed} more bytes needed, {remaining} of {capacity} left")]
    CapacityExceeded {
        /// Bytes the write needed
        needed: usize,
        /// Bytes still free
        remaining: usize,
        /// Configured capacity
        capacity: usize,
    },
}

impl ToDiagnostic for ChunkError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string(), Span::DUMMY).with_code(E_CHUNK_CAPACITY)
    }
}

/// Error reading or writing a `.hbc` file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The first four bytes are not `0x7F 'H' 'B' 'C'`
    #[error("file header magic not correct")]
    BadMagic,

    /// The file ends inside the fixed header or the unit name
    #[error("truncated bytecode file: {0}")]
    Truncated(&'static str),

    /// Unit names are limited by the one-byte length field
    #[error("unit name is {0} bytes, maximum is 255")]
    NameTooLong(usize),

    /// The stored unit name is not UTF-8
    #[error("unit name is not valid UTF-8")]
    InvalidName(#[source] std::string::FromUtf8Error),

    /// The instruction bytes do not fit a chunk
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToDiagnostic for FormatError {
    fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            FormatError::BadMagic => E_FORMAT_BAD_MAGIC,
            FormatError::Truncated(_) => E_FORMAT_TRUNCATED,
            FormatError::NameTooLong(_) => E_FORMAT_NAME_TOO_LONG,
            FormatError::InvalidName(_) => E_FORMAT_INVALID_NAME,
            FormatError::Chunk(_) => E_CHUNK_CAPACITY,
            FormatError::Io(_) => E_FORMAT_IO,
        };
        Diagnostic::error(self.to_string(), Span::DUMMY).with_code(code)
    }
}
