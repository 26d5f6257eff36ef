//! Season-pack detection and per-file layout classification.

use std::path::Path;

use crate::error::PacksResult;
use crate::model::{PackLayout, VideoFile};
use crate::patterns::{EPISODE_TOKEN, SEASON_TOKEN, YEAR_SEASON};
use crate::scan::find_all_video_files;

/// Minimum number of video files that turns an unmarked release into a pack.
pub const PACK_FALLBACK_MIN_VIDEOS: usize = 3;

/// How a release was recognised as a pack, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackDetection {
    /// The release name carries a season marker.
    ByName,
    /// The release name is unmarked but the tree holds enough videos.
    ByFileCount,
    /// Treat the release as a single item.
    NotPack,
}

impl PackDetection {
    /// Whether the release should be decomposed into episodes.
    #[must_use]
    pub const fn is_pack(self) -> bool {
        !matches!(self, Self::NotPack)
    }

    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByName => "name_pattern",
            Self::ByFileCount => "file_count",
            Self::NotPack => "not_pack",
        }
    }
}

/// Whether a release name marks a season pack.
///
/// A season token (`S01`) counts only when the name has no single-episode token
/// (`S01E05`). Year-numbered seasons (`S2024`) always count.
#[must_use]
pub fn is_season_pack_name(release_name: &str) -> bool {
    if SEASON_TOKEN.is_match(release_name) && !EPISODE_TOKEN.is_match(release_name) {
        return true;
    }
    YEAR_SEASON.is_match(release_name)
}

/// Whether `root` holds enough video files to be treated as a pack regardless of its name.
///
/// # Errors
///
/// Returns an error if `root` cannot be traversed.
pub fn is_season_pack_by_count(root: &Path) -> PacksResult<bool> {
    Ok(find_all_video_files(root)?.len() >= PACK_FALLBACK_MIN_VIDEOS)
}

/// Classify a release by name first, then by video count.
///
/// # Errors
///
/// Returns an error if the name does not match and `root` cannot be traversed.
pub fn detect_pack(release_name: &str, root: &Path) -> PacksResult<PackDetection> {
    if is_season_pack_name(release_name) {
        return Ok(PackDetection::ByName);
    }
    if is_season_pack_by_count(root)? {
        return Ok(PackDetection::ByFileCount);
    }
    Ok(PackDetection::NotPack)
}

impl PackLayout {
    /// Decide the layout for one video: its parent directory equals the pack name
    /// (ignoring case) for shared layouts, anything else is a per-episode directory.
    #[must_use]
    pub fn for_video(video: &VideoFile, pack_name: &str) -> Self {
        if video.parent_name().to_lowercase() == pack_name.to_lowercase() {
            Self::SharedDirectory
        } else {
            Self::EpisodeDirectory
        }
    }
}
