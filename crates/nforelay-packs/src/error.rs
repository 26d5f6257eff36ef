//! # Design
//!
//! - Provide structured, constant-message errors for release decomposition.
//! - Capture operation context (paths, fields, inputs) to make failures reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for decomposition operations.
pub type PacksResult<T> = Result<T, PacksError>;

/// Errors produced while decomposing and submitting releases.
#[derive(Debug, Error)]
pub enum PacksError {
    /// IO failures while interacting with the filesystem.
    #[error("packs io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Walkdir traversal failures on the scan root.
    #[error("packs walkdir failure")]
    Walkdir {
        /// Operation that triggered the walkdir failure.
        operation: &'static str,
        /// Path involved in the walkdir failure.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// JSON serialization failures for submission payloads.
    #[error("packs json failure")]
    Json {
        /// Operation that triggered the JSON failure.
        operation: &'static str,
        /// Path involved in the JSON failure.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Input validation failures.
    #[error("packs invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// A release collaborator refused or failed to accept a submission.
    #[error("packs submission failure")]
    Submission {
        /// Release name the submission was made for.
        release: String,
        /// Static reason for the failure.
        reason: &'static str,
        /// Collaborator-supplied detail when available.
        detail: Option<String>,
    },
}

impl PacksError {
    /// Wrap an IO failure raised while touching `path`.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON failure raised while encoding a payload for `path`.
    pub fn json(
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

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Build a submission failure for `release`.
    pub fn submission(
        release: impl Into<String>,
        reason: &'static str,
        detail: Option<String>,
    ) -> Self {
        Self::Submission {
            release: release.into(),
            reason,
            detail,
        }
    }
}
