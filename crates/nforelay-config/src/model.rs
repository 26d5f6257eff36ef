//! Typed client configuration document.
//!
//! # Design
//! - Mirrors the on-disk JSON document field for field; unknown keys are ignored so
//!   older documents keep loading.
//! - Derived policies (hashing) are computed on demand, never stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::validate::parse_hash_policy;

/// API key written into freshly created documents.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";
/// Catalog endpoint used when the document does not override it.
pub const DEFAULT_BASE_URL: &str = "https://crowdnfo.net/api/releases";

const fn default_verify_ssl() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Client configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Catalog API key.
    #[serde(default)]
    pub api_key: String,
    /// Catalog releases endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Explicit `mediainfo` binary; empty means auto-detect.
    #[serde(default)]
    pub mediainfo_path: String,
    /// Hash size limit: empty hashes everything, `"0"` disables hashing, otherwise
    /// a size such as `"800MB"`, `"5GB"` or a bare number of gigabytes.
    #[serde(default)]
    pub max_hash_file_size: String,
    /// Whether TLS certificates are verified.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    /// Catalog category name to the download-client labels that map onto it.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_mappings: BTreeMap<String, Vec<String>>,
    /// Download-client labels that are never processed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_categories: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mapping = |labels: &[&str]| -> Vec<String> {
            labels.iter().map(ToString::to_string).collect()
        };
        let category_mappings = BTreeMap::from([
            (
                "Movies".to_string(),
                mapping(&["movies", "movie", "radarr", "film"]),
            ),
            (
                "TV".to_string(),
                mapping(&["tv", "television", "sonarr", "series", "shows", "serien", "anime"]),
            ),
            ("Games".to_string(), mapping(&["games", "gaming", "pc-games"])),
            (
                "Software".to_string(),
                mapping(&["software", "apps", "programs"]),
            ),
            ("Music".to_string(), mapping(&["music", "audio", "mp3", "flac"])),
            (
                "Audiobooks".to_string(),
                mapping(&["audiobooks", "hoerbuch", "abook"]),
            ),
            ("Books".to_string(), mapping(&["books", "ebooks", "epub"])),
            ("Other".to_string(), mapping(&["other", "misc"])),
        ]);
        Self {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            base_url: default_base_url(),
            mediainfo_path: String::new(),
            max_hash_file_size: String::new(),
            verify_ssl: true,
            category_mappings,
            excluded_categories: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Whether the API key is still the placeholder (or blank).
    #[must_use]
    pub fn has_placeholder_api_key(&self) -> bool {
        let key = self.api_key.trim();
        key.is_empty() || key == PLACEHOLDER_API_KEY
    }

    /// Hashing policy derived from `max_hash_file_size`.
    ///
    /// An unparseable limit is logged and treated as "no limit".
    #[must_use]
    pub fn hash_policy(&self) -> HashPolicy {
        parse_hash_policy(&self.max_hash_file_size).unwrap_or_else(|err| {
            warn!(
                value = %self.max_hash_file_size,
                error = %err,
                "invalid max_hash_file_size; ignoring limit"
            );
            HashPolicy::Always
        })
    }
}

/// When media files are hashed before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashPolicy {
    /// Hash every file.
    #[default]
    Always,
    /// Never hash.
    Never,
    /// Hash files no larger than this many bytes.
    MaxBytes(u64),
}
