//! Error types for parameter store operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the backing resource failed.
    #[error("I/O error in {operation} for {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Key contains characters the record format cannot carry.
    #[error("Invalid parameter key '{0}': only [A-Za-z0-9_] are allowed")]
    InvalidKey(String),

    /// Store options text could not be parsed.
    #[error("Failed to parse store options: {0}")]
    Options(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create an I/O error with operation context.
    pub fn io(operation: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }
}

/// Result type for store operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_operation_and_path() {
        let err = ConfigError::io(
            "read",
            Path::new("cfg.txt"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = err.to_string();
        assert!(text.contains("read"));
        assert!(text.contains("cfg.txt"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn invalid_key_message() {
        let err = ConfigError::invalid_key("bad key");
        assert!(err.to_string().contains("'bad key'"));
    }
}
