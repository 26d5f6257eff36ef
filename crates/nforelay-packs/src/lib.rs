#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Release and season-pack decomposition for completed downloads.
//!
//! Layout: `scan.rs` (traversal and extension classes), `layout.rs` (pack
//! detection), `episode.rs` (episode identity), `nfo.rs` (NFO lookup),
//! `filelist.rs` (release listings), `hash.rs` (content hashing), `pipeline.rs`
//! (per-release driver and the [`ReleaseSink`] seam).

pub mod episode;
pub mod error;
pub mod filelist;
pub mod hash;
pub mod layout;
pub mod model;
pub mod nfo;
mod patterns;
pub mod pipeline;
pub mod scan;

pub use episode::{
    EpisodeMatch, Identification, belongs_to_episode, episode_key_of, identify_episode,
    is_all_lowercase, match_episode, shares_pack_prefix, synthesize_release_name,
};
pub use error::{PacksError, PacksResult};
pub use filelist::{build_episode_file_list, build_file_list, build_single_file_list};
pub use hash::{hash_with_policy, sha256_file, should_hash};
pub use layout::{
    PACK_FALLBACK_MIN_VIDEOS, PackDetection, detect_pack, is_season_pack_by_count,
    is_season_pack_name,
};
pub use model::{
    EpisodeKey, EpisodeUnit, FileListEntry, FileListRequest, FileListing, PackLayout, VideoFile,
};
pub use nfo::{find_first_nfo, find_general_nfo, find_named_nfo, find_nfo_in_directory};
pub use pipeline::{
    Decomposition, ProcessReport, ReleaseFailure, ReleaseMode, ReleaseRequest, ReleaseSink,
    ReleaseSubmission, decompose_pack, process_release,
};
pub use scan::{
    MediaKind, ScannedFile, count_video_files_in_dir, find_all_video_files, find_biggest_file,
    find_first_audio_file, walk_files,
};
