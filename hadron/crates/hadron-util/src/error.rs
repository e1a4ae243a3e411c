//! Core error types for hadron-util crate

use thiserror::Error;

/// Error type for resource limit validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitsError {
    /// A ceiling was configured as zero
    #[error("limit '{name}' must be greater than zero")]
    Zero {
        /// Name of the offending field
        name: &'static str,
    },

    /// A ceiling is above its accepted maximum
    #[error("limit '{name}' is {value}, maximum is {max}")]
    TooLarge {
        /// Name of the offending field
        name: &'static str,
        /// Configured value
        value: usize,
        /// Largest accepted value
        max: usize,
    },
}

/// Result type alias using LimitsError
pub type LimitsResult<T> = Result<T, LimitsError>;
