//! Error types for document construction.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that can occur while assembling a METS/DNX document.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A supplied checksum could not be reproduced from the file on disk.
    #[error("could not reproduce checksum for {}: expected {expected}, got {actual}", file.display())]
    ChecksumMismatch {
        file: PathBuf,
        expected: String,
        actual: String,
    },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// JSON input could not be parsed or has the wrong shape.
    #[error("invalid JSON input: {0}")]
    InvalidJson(String),

    /// A required input was not supplied.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Two elements were assigned the same identifier.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// A reference attribute points at an identifier that does not exist.
    #[error("dangling {attribute} reference: {value}")]
    DanglingReference { attribute: String, value: String },

    /// The document could not be written as XML.
    #[error("failed to serialize document: {0}")]
    Serialize(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BuildError {
    /// Wrap an I/O error with the path that produced it.
    pub fn read_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::ReadFailed {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(e: serde_json::Error) -> Self {
        BuildError::InvalidJson(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_checksum_mismatch_display() {
        let err = BuildError::ChecksumMismatch {
            file: PathBuf::from("pm/img.tif"),
            expected: "abc123".to_string(),
            actual: "def456".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pm/img.tif"));
        assert!(msg.contains("expected abc123"));
        assert!(msg.contains("got def456"));
    }

    #[test]
    fn test_read_failed_has_source() {
        let err = BuildError::read_failed(
            "/missing",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/missing"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: BuildError = json_err.into();
        assert!(matches!(err, BuildError::InvalidJson(_)));
    }
}
