//! Domain models for release decomposition.
//!
//! # Design
//! - Keep request/response types lightweight; every record is built once and never mutated.
//! - Avoid embedding IO handles; callers supply paths and the crate reads metadata on demand.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Identity of one candidate media file discovered under a release root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Absolute (or root-relative, as supplied) path to the file.
    pub path: PathBuf,
    /// Directory that directly contains the file.
    pub dir: PathBuf,
    /// Base file name including its extension.
    pub name: String,
}

impl VideoFile {
    /// Build a video identity from a file path; `None` when the path has no file name.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Some(Self {
            path: path.to_path_buf(),
            dir,
            name,
        })
    }

    /// File name with its final extension removed.
    #[must_use]
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }

    /// Name of the directory that directly contains the file.
    #[must_use]
    pub fn parent_name(&self) -> String {
        self.dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Strip the final `.ext` from a file name, leaving dot-separated release names intact.
#[must_use]
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) if index > 0 => &name[..index],
        _ => name,
    }
}

/// Normalised identifier for one episode within a pack.
///
/// Either an upper-cased episode token (`E01`) or an ISO calendar date
/// (`2024-03-15`). Keys are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EpisodeKey {
    /// Episode token such as `E07`.
    Episode(String),
    /// Calendar date in `yyyy-mm-dd` form.
    Date(String),
}

impl EpisodeKey {
    /// Build an episode token key from the digits following `E`.
    #[must_use]
    pub fn episode(digits: &str) -> Self {
        Self::Episode(format!("E{digits}"))
    }

    /// Build a date key from an already matched `yyyy-mm-dd` string.
    #[must_use]
    pub fn date(value: &str) -> Self {
        Self::Date(value.to_string())
    }

    /// Render the key as it appears in release names.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Episode(token) => token,
            Self::Date(date) => date,
        }
    }

    /// Whether this key identifies the first episode of a season.
    #[must_use]
    pub fn is_first_episode(&self) -> bool {
        matches!(self, Self::Episode(token) if token == "E01")
    }

    /// Case-insensitive comparison used when grouping sibling files.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Per-episode release identity produced by decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeUnit {
    /// Video file carrying the episode.
    pub video: VideoFile,
    /// Episode key used to group related files.
    pub key: EpisodeKey,
    /// External release identity used for upload and archival.
    pub release_name: String,
    /// Descriptive text file associated with the episode, if any.
    pub nfo: Option<PathBuf>,
}

/// Where a pack keeps a given episode's files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackLayout {
    /// The episode's video sits directly in the pack's outer directory.
    SharedDirectory,
    /// The episode lives in its own nested directory.
    EpisodeDirectory,
}

impl PackLayout {
    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SharedDirectory => "shared_directory",
            Self::EpisodeDirectory => "episode_directory",
        }
    }
}

/// One file in a release listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListEntry {
    /// Path relative to the listing's base directory, `/`-separated.
    pub file_path: String,
    /// File size in bytes, read when the listing was built.
    pub file_size_bytes: u64,
}

/// Wire payload describing a release's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListRequest {
    /// Release identity the listing belongs to.
    pub release_name: String,
    /// Catalog category supplied by the caller.
    pub category: String,
    /// Entries in directory-walk order.
    pub entries: Vec<FileListEntry>,
}

/// Listing of files relative to a known base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListing {
    /// Directory every entry path is relative to.
    pub base_dir: PathBuf,
    /// Entries in directory-walk order.
    pub entries: Vec<FileListEntry>,
}

impl FileListing {
    /// Resolve an entry back to the file it describes.
    #[must_use]
    pub fn resolve(&self, entry: &FileListEntry) -> PathBuf {
        entry
            .file_path
            .split('/')
            .fold(self.base_dir.clone(), |path, segment| path.join(segment))
    }

    /// Total size of every listed file.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|entry| entry.file_size_bytes).sum()
    }

    /// Convert into the wire payload for `release_name`.
    #[must_use]
    pub fn into_request(self, release_name: &str, category: &str) -> FileListRequest {
        FileListRequest {
            release_name: release_name.to_string(),
            category: category.to_string(),
            entries: self.entries,
        }
    }
}
