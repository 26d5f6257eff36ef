//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// No configuration existed, so a default document was written for the operator to edit.
    #[error("default configuration created")]
    DefaultCreated {
        /// Location of the freshly written document.
        path: PathBuf,
    },
    /// The API key still carries the placeholder from the default document.
    #[error("api key not configured")]
    PlaceholderApiKey {
        /// Location of the document that needs editing.
        path: PathBuf,
    },
    /// The document could not be decoded or encoded.
    #[error("configuration document invalid")]
    Json {
        /// Operation identifier.
        operation: &'static str,
        /// Document location.
        path: PathBuf,
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// File system operation failed.
    #[error("filesystem operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

impl ConfigError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: serde_json::Error,
    ) -> Self {
        Self::Json {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: &'static str, value: &str, reason: &'static str) -> Self {
        Self::InvalidField {
            field,
            value: Some(value.to_string()),
            reason,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_stay_constant_and_sources_are_kept() {
        let err = ConfigError::io("read", "/tmp/config.json", io::Error::other("boom"));
        assert_eq!(err.to_string(), "filesystem operation failed");
        assert!(err.source().is_some());

        let err = ConfigError::invalid("max_hash_file_size", "lots", "invalid_number");
        assert_eq!(err.to_string(), "invalid configuration field");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "max_hash_file_size",
                reason: "invalid_number",
                ..
            }
        ));
    }
}
