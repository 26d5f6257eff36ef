//! Per-release processing: pack decomposition or single-release handling, then
//! one submission per processable release.
//!
//! # Design
//! - The driver is synchronous and processes episodes in discovery order.
//! - Only structural failures (unreadable root) abort a run; per-episode failures
//!   are recorded on the [`ProcessReport`] and the next episode is attempted.
//! - A root that is a regular file is a single-file release listed on its own.
//! - Submissions go through the [`ReleaseSink`] seam so uploads, archival and dry
//!   runs stay outside the engine.

use std::path::{Path, PathBuf};

use nforelay_config::HashPolicy;
use tracing::{info, warn};

use crate::episode::{Identification, identify_episode};
use crate::error::{PacksError, PacksResult};
use crate::filelist::{build_episode_file_list, build_file_list, build_single_file_list};
use crate::hash::{hash_with_policy, sha256_file, should_hash};
use crate::layout::{PACK_FALLBACK_MIN_VIDEOS, PackDetection, detect_pack};
use crate::model::{EpisodeUnit, FileListRequest, FileListing, VideoFile};
use crate::nfo::{find_first_nfo, find_general_nfo};
use crate::scan::{MediaKind, find_all_video_files, find_biggest_file, find_first_audio_file};

/// Input for one processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Outer release (torrent/job) name.
    pub release_name: String,
    /// Directory holding the completed download, or the file itself for single-file downloads.
    pub root: PathBuf,
    /// Catalog category attached to every submission.
    pub category: String,
    /// Whether and when media files are hashed.
    pub hash_policy: HashPolicy,
}

/// Everything a collaborator needs to publish one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSubmission {
    /// Release identity (episode name for packs).
    pub release_name: String,
    /// Catalog category.
    pub category: String,
    /// Media file the release is described by, when one was found.
    pub media_path: Option<PathBuf>,
    /// Descriptive text file, when one was found.
    pub nfo_path: Option<PathBuf>,
    /// Lowercase hex SHA-256 of the media file, when hashing was allowed.
    pub content_hash: Option<String>,
    /// Files that belong to the release.
    pub file_list: FileListing,
}

impl ReleaseSubmission {
    /// Wire-shaped listing payload for this release.
    #[must_use]
    pub fn file_list_request(&self) -> FileListRequest {
        self.file_list
            .clone()
            .into_request(&self.release_name, &self.category)
    }
}

/// Collaborator that accepts processable releases.
pub trait ReleaseSink {
    /// Publish one release.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the release could not be published; the
    /// driver records it and continues with the next release.
    fn submit(&mut self, submission: &ReleaseSubmission) -> PacksResult<()>;
}

/// How the release was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseMode {
    /// Decomposed into episodes.
    SeasonPack,
    /// Submitted as one release.
    SingleRelease,
}

impl ReleaseMode {
    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SeasonPack => "season_pack",
            Self::SingleRelease => "single_release",
        }
    }
}

/// A release that could not be submitted.
#[derive(Debug)]
pub struct ReleaseFailure {
    /// Release the failure belongs to.
    pub release_name: String,
    /// Processing stage that failed.
    pub stage: &'static str,
    /// Underlying error.
    pub error: PacksError,
}

/// Outcome of one processing run.
#[derive(Debug)]
pub struct ProcessReport {
    /// Processing mode that was chosen.
    pub mode: ReleaseMode,
    /// How the release name and tree were classified.
    pub detection: PackDetection,
    /// Release names accepted by the sink, in submission order.
    pub submitted: Vec<String>,
    /// Videos rejected by the naming heuristics.
    pub rejected: Vec<PathBuf>,
    /// Videos without any recognisable episode identity.
    pub unmatched: Vec<PathBuf>,
    /// Releases that failed after identification.
    pub failures: Vec<ReleaseFailure>,
}

impl ProcessReport {
    const fn new(mode: ReleaseMode, detection: PackDetection) -> Self {
        Self {
            mode,
            detection,
            submitted: Vec::new(),
            rejected: Vec::new(),
            unmatched: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Whether the run found nothing to submit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty() && self.failures.is_empty()
    }

    fn record(&mut self, release_name: &str, outcome: Result<(), ReleaseFailure>) {
        match outcome {
            Ok(()) => self.submitted.push(release_name.to_string()),
            Err(failure) => {
                warn!(
                    release = %failure.release_name,
                    stage = failure.stage,
                    error = %failure.error,
                    "release processing failed; continuing"
                );
                self.failures.push(failure);
            }
        }
    }
}

/// Every video of a pack together with its identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// All videos found in the pack, in traversal order.
    pub videos: Vec<VideoFile>,
    /// Pack-level NFO, if any.
    pub general_nfo: Option<PathBuf>,
    /// One identification per video, in the same order as `videos`.
    pub identifications: Vec<Identification>,
}

impl Decomposition {
    /// Accepted episode units, in discovery order.
    pub fn units(&self) -> impl Iterator<Item = &EpisodeUnit> {
        self.identifications.iter().filter_map(Identification::unit)
    }
}

/// Identify every video under `root` as an episode of the pack named `pack_name`.
///
/// # Errors
///
/// Returns an error if `root` cannot be traversed.
pub fn decompose_pack(root: &Path, pack_name: &str) -> PacksResult<Decomposition> {
    let videos = find_all_video_files(root)?;
    Ok(decompose_videos(root, pack_name, videos))
}

fn decompose_videos(root: &Path, pack_name: &str, videos: Vec<VideoFile>) -> Decomposition {
    let general_nfo = find_general_nfo(root);
    let identifications = videos
        .iter()
        .map(|video| identify_episode(video, pack_name, general_nfo.as_deref()))
        .collect();
    Decomposition {
        videos,
        general_nfo,
        identifications,
    }
}

/// Process one completed download and hand every processable release to `sink`.
///
/// # Errors
///
/// Returns an error if `request.root` is neither a readable directory nor a regular
/// file. Failures for individual releases are reported on the returned
/// [`ProcessReport`] instead.
pub fn process_release<S>(request: &ReleaseRequest, sink: &mut S) -> PacksResult<ProcessReport>
where
    S: ReleaseSink + ?Sized,
{
    if request.root.is_file() {
        return process_single_file(request, sink);
    }
    if !request.root.is_dir() {
        return Err(PacksError::InvalidInput {
            field: "root",
            reason: "release root is not a directory",
            value: Some(request.root.display().to_string()),
        });
    }

    let detection = detect_pack(&request.release_name, &request.root)?;
    if detection.is_pack() {
        let videos = find_all_video_files(&request.root)?;
        if videos.len() >= PACK_FALLBACK_MIN_VIDEOS {
            info!(
                release = %request.release_name,
                detection = detection.as_str(),
                videos = videos.len(),
                "processing season pack"
            );
            let decomposition = decompose_videos(&request.root, &request.release_name, videos);
            return Ok(process_pack(request, decomposition, detection, sink));
        }
        info!(
            release = %request.release_name,
            videos = videos.len(),
            "too few videos for a season pack; processing as single release"
        );
    }
    process_single(request, detection, sink)
}

fn process_pack<S>(
    request: &ReleaseRequest,
    decomposition: Decomposition,
    detection: PackDetection,
    sink: &mut S,
) -> ProcessReport
where
    S: ReleaseSink + ?Sized,
{
    let mut report = ProcessReport::new(ReleaseMode::SeasonPack, detection);
    let Decomposition {
        videos,
        identifications,
        ..
    } = decomposition;

    for identification in identifications {
        match identification {
            Identification::Accepted(unit) => {
                let outcome = submit_episode(request, &unit, &videos, sink);
                report.record(&unit.release_name, outcome);
            }
            Identification::Rejected {
                video,
                candidate,
                reason,
            } => {
                warn!(
                    path = %video.path.display(),
                    candidate = %candidate,
                    reason,
                    "rejected episode candidate"
                );
                report.rejected.push(video.path);
            }
            Identification::Unmatched { video } => {
                info!(path = %video.path.display(), "video matches no episode pattern; skipping");
                report.unmatched.push(video.path);
            }
        }
    }

    if report.is_empty() {
        info!(release = %request.release_name, "no valid episodes found in season pack");
    }
    info!(
        release = %request.release_name,
        submitted = report.submitted.len(),
        failed = report.failures.len(),
        rejected = report.rejected.len(),
        unmatched = report.unmatched.len(),
        "season pack completed"
    );
    report
}

fn submit_episode<S>(
    request: &ReleaseRequest,
    unit: &EpisodeUnit,
    videos: &[VideoFile],
    sink: &mut S,
) -> Result<(), ReleaseFailure>
where
    S: ReleaseSink + ?Sized,
{
    let at = |stage: &'static str| {
        move |error: PacksError| ReleaseFailure {
            release_name: unit.release_name.clone(),
            stage,
            error,
        }
    };

    let file_list = build_episode_file_list(unit, videos).map_err(at("file_list"))?;
    let path = &unit.video.path;
    let content_hash = match should_hash(path, &request.hash_policy) {
        Ok(true) => Some(sha256_file(path).map_err(at("hash"))?),
        Ok(false) => None,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "cannot check hash size limit; submitting without hash"
            );
            None
        }
    };
    let submission = ReleaseSubmission {
        release_name: unit.release_name.clone(),
        category: request.category.clone(),
        media_path: Some(unit.video.path.clone()),
        nfo_path: unit.nfo.clone(),
        content_hash,
        file_list,
    };
    sink.submit(&submission).map_err(at("submit"))
}

fn process_single<S>(
    request: &ReleaseRequest,
    detection: PackDetection,
    sink: &mut S,
) -> PacksResult<ProcessReport>
where
    S: ReleaseSink + ?Sized,
{
    let root = &request.root;
    let media_path = match find_biggest_file(root)? {
        Some(path) => Some(path),
        None => find_first_audio_file(root)?,
    };
    let nfo_path = find_first_nfo(root)?;
    let file_list = build_file_list(root)?;
    Ok(submit_single(
        request, detection, media_path, nfo_path, file_list, sink,
    ))
}

fn process_single_file<S>(request: &ReleaseRequest, sink: &mut S) -> PacksResult<ProcessReport>
where
    S: ReleaseSink + ?Sized,
{
    let root = &request.root;
    info!(
        release = %request.release_name,
        path = %root.display(),
        "content path is a single file; processing as single release"
    );
    let file_list = build_single_file_list(root)?;
    let media_path = matches!(
        MediaKind::of_path(root),
        MediaKind::Video | MediaKind::HashOnly | MediaKind::Audio
    )
    .then(|| root.clone());
    Ok(submit_single(
        request,
        PackDetection::NotPack,
        media_path,
        None,
        file_list,
        sink,
    ))
}

fn submit_single<S>(
    request: &ReleaseRequest,
    detection: PackDetection,
    media_path: Option<PathBuf>,
    nfo_path: Option<PathBuf>,
    file_list: FileListing,
    sink: &mut S,
) -> ProcessReport
where
    S: ReleaseSink + ?Sized,
{
    let content_hash = match &media_path {
        Some(path) => hash_with_policy(path, &request.hash_policy).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "content hash unavailable");
            None
        }),
        None => {
            info!(release = %request.release_name, "no media file found; submitting listing only");
            None
        }
    };
    let submission = ReleaseSubmission {
        release_name: request.release_name.clone(),
        category: request.category.clone(),
        media_path,
        nfo_path,
        content_hash,
        file_list,
    };

    let mut report = ProcessReport::new(ReleaseMode::SingleRelease, detection);
    let outcome = sink.submit(&submission).map_err(|error| ReleaseFailure {
        release_name: submission.release_name.clone(),
        stage: "submit",
        error,
    });
    report.record(&submission.release_name, outcome);
    info!(
        release = %request.release_name,
        submitted = report.submitted.len(),
        "single release completed"
    );
    report
}
