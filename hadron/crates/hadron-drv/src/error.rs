//! Driver errors.

use std::io;
use std::path::PathBuf;

use hadron_util::diagnostic::{E_DRIVER_CONFIG, E_DRIVER_IO};
use hadron_util::{Diagnostic, Span, ToDiagnostic};
use thiserror::Error;

use crate::config::ConfigError;

/// Failure outside the compile and run phases.
#[derive(Error, Debug)]
pub enum DriverError {
    /// An input file could not be opened
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        /// The input
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },

    /// An output directory could not be created
    #[error("cannot create '{}': {source}", path.display())]
    Create {
        /// The directory
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },

    /// Reading stdin or writing stdout/stderr failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ToDiagnostic for DriverError {
    fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            DriverError::Config(_) => E_DRIVER_CONFIG,
            DriverError::Read { .. } | DriverError::Create { .. } | DriverError::Io(_) => {
                E_DRIVER_IO
            },
        };
        Diagnostic::error(self.to_string(), Span::DUMMY).with_code(code)
    }
}

/// Result type alias using DriverError.
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let err = DriverError::Read {
            path: PathBuf::from("missing.hd"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot read 'missing.hd': not found");
        assert_eq!(
            err.to_diagnostic().to_string(),
            "error[E0501]: cannot read 'missing.hd': not found"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: DriverError = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, DriverError::Io(_)));
    }

    #[test]
    fn test_config_error_code() {
        let err: DriverError = ConfigError::NotFound(PathBuf::from("x.toml")).into();
        assert_eq!(err.to_diagnostic().code, Some(E_DRIVER_CONFIG));
    }
}
