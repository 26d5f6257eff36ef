//! Content hashing for submitted media files.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use nforelay_config::HashPolicy;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{PacksError, PacksResult};

/// Stream `path` through SHA-256 and return the lowercase hex digest.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn sha256_file(path: &Path) -> PacksResult<String> {
    let mut file =
        File::open(path).map_err(|source| PacksError::io("open_hash_source", path, source))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|source| PacksError::io("read_hash_source", path, source))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Decide whether `path` should be hashed under `policy`.
///
/// # Errors
///
/// Returns an error if the policy is size-bounded and the file cannot be stat'ed.
pub fn should_hash(path: &Path, policy: &HashPolicy) -> PacksResult<bool> {
    match policy {
        HashPolicy::Always => Ok(true),
        HashPolicy::Never => Ok(false),
        HashPolicy::MaxBytes(limit) => {
            let size = fs::metadata(path)
                .map_err(|source| PacksError::io("stat_hash_source", path, source))?
                .len();
            if size > *limit {
                info!(
                    path = %path.display(),
                    size,
                    limit = *limit,
                    "skipping hash for file above configured size limit"
                );
                return Ok(false);
            }
            Ok(true)
        }
    }
}

/// Hash `path` when `policy` allows it.
///
/// # Errors
///
/// Returns an error if the file cannot be stat'ed or read.
pub fn hash_with_policy(path: &Path, policy: &HashPolicy) -> PacksResult<Option<String>> {
    if should_hash(path, policy)? {
        sha256_file(path).map(Some)
    } else {
        Ok(None)
    }
}
