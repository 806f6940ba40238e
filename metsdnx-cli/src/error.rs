//! CLI error types.

use std::fmt;
use std::io;
use std::path::PathBuf;

use metsdnx::BuildError;

/// Errors reported by the command-line front end.
#[derive(Debug)]
pub enum CliError {
    /// The library failed to build the document.
    Build(BuildError),

    /// An input or output file could not be read or written.
    Io { path: PathBuf, source: io::Error },

    /// A JSON input file could not be parsed.
    Json { path: PathBuf, reason: String },

    /// Configuration error.
    Config(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Build(e) => write!(f, "{}", e),
            CliError::Io { path, source } => {
                write!(f, "Failed to access {}: {}", path.display(), source)
            }
            CliError::Json { path, reason } => {
                write!(f, "Invalid JSON in {}: {}", path.display(), reason)
            }
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Build(e) => Some(e),
            CliError::Io { source, .. } => Some(source),
            CliError::Json { .. } => None,
            CliError::Config(_) => None,
        }
    }
}

impl From<BuildError> for CliError {
    fn from(e: BuildError) -> Self {
        match e {
            BuildError::Config(msg) => CliError::Config(msg),
            other => CliError::Build(other),
        }
    }
}
