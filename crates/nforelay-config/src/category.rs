//! Catalog category mapping and exclusion.
//!
//! # Design
//! - Resolution order: configured label mappings, then built-in category names, then
//!   release-name heuristics. The first hit wins.
//! - Heuristics are an ordered table; more specific families (audiobooks, books) are
//!   tried before broad ones (TV, movies).

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::model::ClientConfig;

/// Catalog categories accepted by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Feature films.
    Movies,
    /// Series and episodes.
    Tv,
    /// Games.
    Games,
    /// Applications.
    Software,
    /// Music releases.
    Music,
    /// Spoken-word audio books.
    Audiobooks,
    /// Written books.
    Books,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category in catalog order.
    pub const ALL: [Self; 8] = [
        Self::Movies,
        Self::Tv,
        Self::Games,
        Self::Software,
        Self::Music,
        Self::Audiobooks,
        Self::Books,
        Self::Other,
    ];

    /// Catalog spelling of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movies => "Movies",
            Self::Tv => "TV",
            Self::Games => "Games",
            Self::Software => "Software",
            Self::Music => "Music",
            Self::Audiobooks => "Audiobooks",
            Self::Books => "Books",
            Self::Other => "Other",
        }
    }

    /// Exact (case-sensitive) catalog name lookup.
    #[must_use]
    pub fn from_catalog_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == name)
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(label))
    }
}

static HEURISTICS: LazyLock<Vec<(Regex, Category)>> = LazyLock::new(|| {
    [
        (
            r"(?i)\b(audiobook|abook|abookde|hörbuch|hoerbuch|horbuch|m4b)\b",
            Category::Audiobooks,
        ),
        (r"(?i)\b(ebook|epaper|pdf|epub|mobi)\b", Category::Books),
        (
            r"(?i)\b((s\d{1,4}e\d{1,4})|(s\d{1,4})|(e\d{1,4})|season|staffel|episode|folge|(\d{4}-\d{2}-\d{2}))\b",
            Category::Tv,
        ),
        (
            r"(?i)\b(elamigos|gog|xbox|xbox360|x360|ps\d|nintendo|nsw|amiga|atari|wii[u]?)\b",
            Category::Games,
        ),
        (
            r"(?i)\b(patch|crack|cracked|keygen|keymaker|keyfilemaker|x64|dvt|btcr|macos)\b",
            Category::Software,
        ),
        (
            r"(?i)\b((\d{3,4}[pi])|bluray|dvdrip|webrip|hdtv|bdrip|dvd|remux|mpeg[-]?2|vc[-]?1|avc|hevc|([xh][. ]?26[456]))\b",
            Category::Movies,
        ),
        (
            r"(?i)\b(mp3|flac|webflac|aac|wav|album|artist|discography|single|vinyl|cd|\d+bit|\d+khz)\b",
            Category::Music,
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, category)| match Regex::new(pattern) {
        Ok(regex) => Some((regex, category)),
        Err(err) => {
            warn!(pattern, error = %err, "invalid built-in category pattern; skipping");
            None
        }
    })
    .collect()
});

/// Guess a category from the release name alone.
#[must_use]
pub fn match_category_by_name(release_name: &str) -> Option<Category> {
    let found = HEURISTICS
        .iter()
        .find(|(regex, _)| regex.is_match(release_name))
        .map(|(_, category)| *category);
    match found {
        Some(category) => debug!(category = category.as_str(), "category matched by release name"),
        None => warn!(release = %release_name, "could not detect category"),
    }
    found
}

/// Map a download-client label onto a catalog category.
///
/// Blank and `*` labels skip straight to release-name heuristics.
#[must_use]
pub fn map_category(config: &ClientConfig, label: &str, release_name: &str) -> Option<Category> {
    let label = label.trim();
    if label.is_empty() || label == "*" {
        return match_category_by_name(release_name);
    }

    for (catalog_name, labels) in &config.category_mappings {
        let Some(category) = Category::from_catalog_name(catalog_name) else {
            warn!(category = %catalog_name, "invalid catalog category in configuration; skipping");
            continue;
        };
        if labels.iter().any(|candidate| candidate.eq_ignore_ascii_case(label)) {
            debug!(category = category.as_str(), "category mapped via configuration");
            return Some(category);
        }
    }

    if let Some(category) = Category::from_label(label) {
        debug!(category = category.as_str(), "category mapped via built-in name");
        return Some(category);
    }

    match_category_by_name(release_name)
}

/// Whether `label` is listed in `excluded_categories` (case-insensitive).
#[must_use]
pub fn is_category_excluded(config: &ClientConfig, label: &str) -> bool {
    config
        .excluded_categories
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(label))
}
