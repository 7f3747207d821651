//! Error types shared by every stage of the model.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type OlaResult<T> = Result<T, OlaError>;

/// Errors raised while configuring, generating or replaying a golden run.
#[derive(Error, Debug)]
pub enum OlaError {
    /// A configuration parameter is out of range or unsupported.
    ///
    /// Raised before any sample is generated, so no artifact exists yet.
    #[error("invalid configuration `{parameter}`: {message}")]
    Configuration {
        parameter: &'static str,
        message: String,
    },

    /// An artifact could not be created, written or read.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An artifact line is not a signed integer.
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A replayed trace has a different number of values than the stored one.
    #[error("{channel} trace length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        channel: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A replayed trace value differs from the stored one.
    #[error("{channel} trace mismatch at index {index}: expected {expected}, got {actual}")]
    TraceMismatch {
        channel: &'static str,
        index: usize,
        expected: i64,
        actual: i64,
    },
}

impl OlaError {
    pub(crate) fn config(parameter: &'static str, message: impl Into<String>) -> Self {
        OlaError::Configuration {
            parameter,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        OlaError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was raised by configuration validation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, OlaError::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_message_names_parameter() {
        let err = OlaError::config("frame_size", "must be >= hop_size (3 < 4)");
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "invalid configuration `frame_size`: must be >= hop_size (3 < 4)"
        );
    }

    #[test]
    fn io_message_names_path() {
        let err = OlaError::io(
            "/nonexistent/anaInputs.txt",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("/nonexistent/anaInputs.txt"));
    }
}
