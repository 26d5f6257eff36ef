//! File listings for single releases and individual pack episodes.
//!
//! # Design
//! - Entry paths are relative to the listing's base directory and always `/`-separated.
//! - Sizes are read while the listing is built; files that vanish or cannot be stat'ed
//!   are logged and left out.
//! - An episode that shares its directory with other episodes lists only its own files.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::episode::belongs_to_episode;
use crate::error::{PacksError, PacksResult};
use crate::model::{EpisodeUnit, FileListEntry, FileListing, VideoFile, file_stem};
use crate::scan::{read_dir_files, walk_files};

/// Render `path` relative to `base` with `/` separators; `None` when `path` is outside `base`.
fn relative_entry_path(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let segments: Vec<_> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

fn entry_for(base: &Path, path: &Path) -> Option<FileListEntry> {
    let file_path = relative_entry_path(base, path)?;
    match fs::metadata(path) {
        Ok(metadata) => Some(FileListEntry {
            file_path,
            file_size_bytes: metadata.len(),
        }),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping unreadable file in listing");
            None
        }
    }
}

/// List every file under `dir`, recursively, relative to `dir`.
///
/// # Errors
///
/// Returns an error if `dir` itself cannot be traversed.
pub fn build_file_list(dir: &Path) -> PacksResult<FileListing> {
    let mut entries = Vec::new();
    for file in walk_files(dir) {
        let file = file?;
        if let Some(entry) = entry_for(dir, &file.path) {
            entries.push(entry);
        }
    }
    Ok(FileListing {
        base_dir: dir.to_path_buf(),
        entries,
    })
}

/// List a release that is a single file: just that file, relative to its parent.
///
/// # Errors
///
/// Returns an error if the file cannot be stat'ed or has no file name.
pub fn build_single_file_list(path: &Path) -> PacksResult<FileListing> {
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let metadata =
        fs::metadata(path).map_err(|source| PacksError::io("stat_release_file", path, source))?;
    let file_path =
        relative_entry_path(&base_dir, path).ok_or_else(|| PacksError::InvalidInput {
            field: "root",
            reason: "release file has no name",
            value: Some(path.display().to_string()),
        })?;
    Ok(FileListing {
        base_dir,
        entries: vec![FileListEntry {
            file_path,
            file_size_bytes: metadata.len(),
        }],
    })
}

/// Build the listing for one episode of a pack.
///
/// `pack_videos` is every video found in the pack. When the episode's directory holds
/// at most one of them, the whole directory is listed recursively. Otherwise the list
/// starts with the episode's video, followed by the files directly beside it whose
/// episode key matches the unit's key.
///
/// # Errors
///
/// Returns an error if the episode's directory cannot be read.
pub fn build_episode_file_list(
    unit: &EpisodeUnit,
    pack_videos: &[VideoFile],
) -> PacksResult<FileListing> {
    let dir = &unit.video.dir;
    let videos_in_dir = pack_videos
        .iter()
        .filter(|video| video.dir == *dir)
        .count();
    if videos_in_dir <= 1 {
        return build_file_list(dir);
    }

    let mut entries = Vec::new();
    if let Some(entry) = entry_for(dir, &unit.video.path) {
        entries.push(entry);
    }
    for path in read_dir_files(dir)? {
        if path == unit.video.path {
            continue;
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !belongs_to_episode(file_stem(&name), &unit.key) {
            continue;
        }
        if let Some(entry) = entry_for(dir, &path) {
            entries.push(entry);
        }
    }
    debug!(
        release = %unit.release_name,
        dir = %dir.display(),
        entries = entries.len(),
        "built shared-directory episode listing"
    );
    Ok(FileListing {
        base_dir: dir.clone(),
        entries,
    })
}
