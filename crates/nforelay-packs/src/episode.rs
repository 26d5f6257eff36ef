//! Episode identity extraction for season packs.
//!
//! # Design
//! - Name patterns are tried as an ordered list of matcher strategies; the first one
//!   that returns a match wins and later strategies are never consulted.
//! - Identification is pure over its inputs apart from NFO existence checks.
//! - Shared-directory and per-episode-directory layouts apply different lower-case
//!   heuristics; the asymmetry is intentional and covered by tests.

use std::path::Path;

use crate::model::{EpisodeKey, EpisodeUnit, PackLayout, VideoFile};
use crate::nfo::{find_named_nfo, find_nfo_in_directory};
use crate::patterns::{
    COMPLETE_MARKER, EPISODE_PREFIX, ISO_DATE, PACK_PREFIX, SEASON_EPISODE, SEASON_REWRITE,
    SIBLING_EPISODE,
};

/// Structured result of a matcher strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeMatch {
    /// `SxxExx` token with its raw digit groups.
    SeasonEpisode {
        /// Season digits as written.
        season: String,
        /// Episode digits as written.
        episode: String,
    },
    /// ISO calendar date.
    Date(String),
}

impl EpisodeMatch {
    /// Normalised key for this match.
    #[must_use]
    pub fn key(&self) -> EpisodeKey {
        match self {
            Self::SeasonEpisode { episode, .. } => EpisodeKey::episode(episode),
            Self::Date(date) => EpisodeKey::date(date),
        }
    }
}

type Matcher = fn(&str) -> Option<EpisodeMatch>;

const MATCHERS: &[Matcher] = &[match_season_episode, match_iso_date];

fn match_season_episode(name: &str) -> Option<EpisodeMatch> {
    let caps = SEASON_EPISODE.captures(name)?;
    Some(EpisodeMatch::SeasonEpisode {
        season: caps.get(1)?.as_str().to_string(),
        episode: caps.get(2)?.as_str().to_string(),
    })
}

fn match_iso_date(name: &str) -> Option<EpisodeMatch> {
    let caps = ISO_DATE.captures(name)?;
    Some(EpisodeMatch::Date(caps.get(1)?.as_str().to_string()))
}

/// Run the matcher strategies in order against `name`.
#[must_use]
pub fn match_episode(name: &str) -> Option<EpisodeMatch> {
    MATCHERS.iter().find_map(|matcher| matcher(name))
}

/// Key used to group sibling files in a shared directory.
///
/// Accepts `SxxExx`, a bare `Exx` token, or an ISO date; episode tokens are upper-cased.
#[must_use]
pub fn episode_key_of(name: &str) -> Option<EpisodeKey> {
    if let Some(caps) = SIBLING_EPISODE.captures(name) {
        let token = caps.get(1).or_else(|| caps.get(2))?;
        return Some(EpisodeKey::Episode(token.as_str().to_ascii_uppercase()));
    }
    match_iso_date(name).map(|found| found.key())
}

/// Whether a file named `name` belongs to the episode keyed `key`.
///
/// Date keys are looked up among every date in the name before any episode token,
/// so `Daily.Show.2024-03-15.E12.srt` still belongs to `2024-03-15`.
#[must_use]
pub fn belongs_to_episode(name: &str, key: &EpisodeKey) -> bool {
    if let EpisodeKey::Date(date) = key
        && ISO_DATE
            .captures_iter(name)
            .filter_map(|caps| caps.get(1))
            .any(|found| found.as_str() == date)
    {
        return true;
    }
    episode_key_of(name).is_some_and(|found| found.matches(key))
}

/// Outcome of identifying one video file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identification {
    /// The file is a processable episode.
    Accepted(EpisodeUnit),
    /// The file matched an episode pattern but its name was judged unusable.
    Rejected {
        /// Video that was rejected.
        video: VideoFile,
        /// Name the decision was made on.
        candidate: String,
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// No matcher strategy recognised the file.
    Unmatched {
        /// Video without an episode identity.
        video: VideoFile,
    },
}

impl Identification {
    /// Release name of an accepted unit; empty for rejected or unmatched files.
    #[must_use]
    pub fn release_name(&self) -> &str {
        match self {
            Self::Accepted(unit) => &unit.release_name,
            Self::Rejected { .. } | Self::Unmatched { .. } => "",
        }
    }

    /// Accepted unit, if any.
    #[must_use]
    pub const fn unit(&self) -> Option<&EpisodeUnit> {
        match self {
            Self::Accepted(unit) => Some(unit),
            Self::Rejected { .. } | Self::Unmatched { .. } => None,
        }
    }

    /// Video the identification was made for.
    #[must_use]
    pub const fn video(&self) -> &VideoFile {
        match self {
            Self::Accepted(unit) => &unit.video,
            Self::Rejected { video, .. } | Self::Unmatched { video } => video,
        }
    }
}

/// Identify the episode carried by `video` inside the pack named `pack_name`.
///
/// `general_nfo` is the pack-level NFO used when no episode-specific one exists; it
/// is attached to `E01` and to every date-keyed episode.
#[must_use]
pub fn identify_episode(
    video: &VideoFile,
    pack_name: &str,
    general_nfo: Option<&Path>,
) -> Identification {
    let layout = PackLayout::for_video(video, pack_name);
    let name = match layout {
        PackLayout::SharedDirectory => video.stem().to_string(),
        PackLayout::EpisodeDirectory => video.parent_name(),
    };

    let Some(found) = match_episode(&name) else {
        return Identification::Unmatched {
            video: video.clone(),
        };
    };
    let key = found.key();

    let release_name = match (layout, &found) {
        (PackLayout::SharedDirectory, EpisodeMatch::SeasonEpisode { .. }) => {
            if shares_pack_prefix(&name, pack_name) && !is_all_lowercase(&name) {
                name
            } else {
                synthesize_release_name(pack_name, &key).unwrap_or(name)
            }
        }
        (PackLayout::EpisodeDirectory, EpisodeMatch::SeasonEpisode { .. }) => {
            if shares_pack_prefix(&name, pack_name) && is_all_lowercase(&name) {
                return Identification::Rejected {
                    video: video.clone(),
                    candidate: name,
                    reason: "lowercase_episode_directory",
                };
            }
            name
        }
        (_, EpisodeMatch::Date(_)) => name,
    };

    let specific = match layout {
        PackLayout::SharedDirectory => find_named_nfo(&video.dir, &release_name),
        PackLayout::EpisodeDirectory => find_nfo_in_directory(&video.dir),
    };
    let falls_back = matches!(key, EpisodeKey::Date(_)) || key.is_first_episode();
    let nfo = specific.or_else(|| {
        general_nfo
            .filter(|_| falls_back)
            .map(Path::to_path_buf)
    });

    Identification::Accepted(EpisodeUnit {
        video: video.clone(),
        key,
        release_name,
        nfo,
    })
}

/// Build an episode release name from the pack name: drop `COMPLETE`/`iNCOMPLETE`
/// and rewrite every standalone `Sxx` token to `Sxx<key>`.
///
/// Returns `None` when the pack name has no standalone season token to rewrite.
#[must_use]
pub fn synthesize_release_name(pack_name: &str, key: &EpisodeKey) -> Option<String> {
    let cleaned = COMPLETE_MARKER.replace_all(pack_name, "");
    let cleaned = cleaned.trim_matches(|c: char| matches!(c, ' ' | '.' | '_'));
    if !SEASON_REWRITE.is_match(cleaned) {
        return None;
    }
    let rewritten = SEASON_REWRITE.replace_all(cleaned, |caps: &regex::Captures<'_>| {
        format!("S{}{}", &caps[1], key.as_str())
    });
    Some(rewritten.into_owned())
}

/// Whether `name` and the pack share the same normalised title before their season tokens.
#[must_use]
pub fn shares_pack_prefix(name: &str, pack_name: &str) -> bool {
    let Some(pack_prefix) = PACK_PREFIX.captures(pack_name).and_then(|caps| caps.get(1)) else {
        return false;
    };
    let Some(episode_prefix) = EPISODE_PREFIX.captures(name).and_then(|caps| caps.get(1)) else {
        return false;
    };
    normalize(pack_prefix.as_str()) == normalize(episode_prefix.as_str())
}

/// Whether `value` has at least one ASCII letter and no upper-case ones.
#[must_use]
pub fn is_all_lowercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase()) && !value.chars().any(|c| c.is_ascii_uppercase())
}

fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ' '))
        .collect()
}
