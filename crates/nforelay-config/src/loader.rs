//! Loading and first-run creation of the JSON configuration document.
//!
//! # Design
//! - A missing document is replaced by a default one and reported as an error so the
//!   operator edits the API key before anything is processed.
//! - Documents still carrying the placeholder key are rejected on every load.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::model::ClientConfig;

/// Load the document at `path`, writing a default one first when it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::DefaultCreated`] after writing a default document,
/// [`ConfigError::PlaceholderApiKey`] when the key was never edited, and IO or JSON
/// errors when the document cannot be read or decoded.
pub fn load_or_create(path: &Path) -> ConfigResult<ClientConfig> {
    match fs::metadata(path) {
        Ok(_) => load(path),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            write_default(path)?;
            warn!(
                path = %path.display(),
                "created default configuration; set api_key before the next run"
            );
            Err(ConfigError::DefaultCreated {
                path: path.to_path_buf(),
            })
        }
        Err(err) => Err(ConfigError::io("stat_config", path, err)),
    }
}

/// Load and validate an existing document.
///
/// # Errors
///
/// Returns an error when the document cannot be read or decoded, or when its API key
/// is still the placeholder.
pub fn load(path: &Path) -> ConfigResult<ClientConfig> {
    let raw = fs::read_to_string(path).map_err(|err| ConfigError::io("read_config", path, err))?;
    let config: ClientConfig =
        serde_json::from_str(&raw).map_err(|err| ConfigError::json("decode_config", path, err))?;
    if config.has_placeholder_api_key() {
        return Err(ConfigError::PlaceholderApiKey {
            path: path.to_path_buf(),
        });
    }
    info!(
        path = %path.display(),
        base_url = %config.base_url,
        excluded_categories = config.excluded_categories.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Write the default document to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error when the directory or file cannot be written.
pub fn write_default(path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| ConfigError::io("create_config_dir", parent, err))?;
    }
    let encoded = serde_json::to_string_pretty(&ClientConfig::default())
        .map_err(|err| ConfigError::json("encode_config", path, err))?;
    fs::write(path, encoded).map_err(|err| ConfigError::io("write_config", path, err))
}
