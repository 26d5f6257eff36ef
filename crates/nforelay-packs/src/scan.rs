//! Directory traversal and extension classification.
//!
//! # Design
//! - Classification is a static extension table; file contents are never inspected.
//! - Traversal is lazy and sorted by file name so "first" and "biggest" tie-breaks are
//!   reproducible across runs on the same tree.
//! - A failure on the scan root is fatal; failures on descendants are logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{PacksError, PacksResult};
use crate::model::{VideoFile, file_stem};
use crate::patterns::FIRST_TRACK;

const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "flv", "mpeg", "mpg", "webm", "m4v", "divx", "xvid",
];
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "aac", "flac", "wav", "ogg", "opus", "m4a", "mka", "wma", "alac", "dts", "dtshd",
    "ac3", "eac3", "ec3", "m4b",
];
const HASH_ONLY_EXTENSIONS: &[&str] = &["iso", "img"];
const NFO_EXTENSIONS: &[&str] = &["nfo"];

/// Category a file falls into based on its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Video container.
    Video,
    /// Audio-only file.
    Audio,
    /// Disk image that is hashed but never probed.
    HashOnly,
    /// Descriptive text file.
    Nfo,
    /// Anything else.
    Other,
}

impl MediaKind {
    /// Classify a bare extension (without the leading dot), ignoring ASCII case.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.to_ascii_lowercase();
        let extension = extension.as_str();
        if VIDEO_EXTENSIONS.contains(&extension) {
            Self::Video
        } else if AUDIO_EXTENSIONS.contains(&extension) {
            Self::Audio
        } else if HASH_ONLY_EXTENSIONS.contains(&extension) {
            Self::HashOnly
        } else if NFO_EXTENSIONS.contains(&extension) {
            Self::Nfo
        } else {
            Self::Other
        }
    }

    /// Classify a path by its extension.
    #[must_use]
    pub fn of_path(path: &Path) -> Self {
        path.extension()
            .map_or(Self::Other, |ext| Self::from_extension(&ext.to_string_lossy()))
    }
}

/// A regular file found by [`walk_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Path to the file, rooted at the scan root.
    pub path: PathBuf,
    /// Extension classification.
    pub kind: MediaKind,
}

impl ScannedFile {
    fn new(path: PathBuf) -> Self {
        let kind = MediaKind::of_path(&path);
        Self { path, kind }
    }

    /// Read the file size, logging and returning `None` when the file cannot be stat'ed.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Some(metadata.len()),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "skipping unreadable file");
                None
            }
        }
    }
}

/// Lazily walk every regular file under `root`, depth first, sorted by name.
///
/// The first item is an error when `root` itself cannot be opened.
pub fn walk_files(root: &Path) -> impl Iterator<Item = PacksResult<ScannedFile>> {
    let root = root.to_path_buf();
    WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => Some(Ok(ScannedFile::new(entry.into_path()))),
            Err(err) if err.depth() == 0 => {
                Some(Err(PacksError::walkdir("walk_root", root.clone(), err)))
            }
            Err(err) => {
                warn!(
                    path = ?err.path(),
                    error = %err,
                    "skipping unreadable entry during scan"
                );
                None
            }
        })
}

/// Find the largest video or disk-image file under `root`; the first one seen wins ties.
///
/// # Errors
///
/// Returns an error if `root` cannot be traversed.
pub fn find_biggest_file(root: &Path) -> PacksResult<Option<PathBuf>> {
    let mut biggest: Option<(u64, PathBuf)> = None;
    for file in walk_files(root) {
        let file = file?;
        if !matches!(file.kind, MediaKind::Video | MediaKind::HashOnly) {
            continue;
        }
        let Some(size) = file.size() else {
            continue;
        };
        if biggest.as_ref().is_none_or(|(current, _)| size > *current) {
            biggest = Some((size, file.path));
        }
    }
    Ok(biggest.map(|(_, path)| path))
}

/// Find the first audio file whose name carries track number one, else the first audio file.
///
/// # Errors
///
/// Returns an error if `root` cannot be traversed.
pub fn find_first_audio_file(root: &Path) -> PacksResult<Option<PathBuf>> {
    let mut fallback = None;
    for file in walk_files(root) {
        let file = file?;
        if file.kind != MediaKind::Audio {
            continue;
        }
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if FIRST_TRACK.is_match(file_stem(&name)) {
            return Ok(Some(file.path));
        }
        if fallback.is_none() {
            fallback = Some(file.path);
        }
    }
    Ok(fallback)
}

/// Collect every video file under `root` in traversal order.
///
/// # Errors
///
/// Returns an error if `root` cannot be traversed.
pub fn find_all_video_files(root: &Path) -> PacksResult<Vec<VideoFile>> {
    let mut videos = Vec::new();
    for file in walk_files(root) {
        let file = file?;
        if file.kind != MediaKind::Video {
            continue;
        }
        if let Some(video) = VideoFile::from_path(&file.path) {
            videos.push(video);
        }
    }
    Ok(videos)
}

/// Count video files directly inside `dir`, ignoring subdirectories.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn count_video_files_in_dir(dir: &Path) -> PacksResult<usize> {
    Ok(read_dir_files(dir)?
        .iter()
        .filter(|path| MediaKind::of_path(path) == MediaKind::Video)
        .count())
}

/// List regular files directly inside `dir`, sorted by name.
///
/// Entries whose type cannot be determined are logged and skipped.
pub(crate) fn read_dir_files(dir: &Path) -> PacksResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| PacksError::io("read_dir", dir, source))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => {}
            Ok(_) => files.push(entry.path()),
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "skipping entry with unknown type");
            }
        }
    }
    files.sort();
    Ok(files)
}
