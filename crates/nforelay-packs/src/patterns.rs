//! Compiled release-name patterns shared by the classifier, extractor and listing builder.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &'static str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("static pattern {pattern} is invalid: {err}"))
}

/// `SxxExx` anywhere in a name; captures season and episode digits.
pub(crate) static SEASON_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)S(\d{2,4})E(\d{2,4})"));

/// ISO calendar date used by daily shows.
pub(crate) static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d{4}-\d{2}-\d{2})"));

/// Standalone season token (`S01`, `S2024`).
pub(crate) static SEASON_TOKEN: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bS\d{2,4}\b"));

/// Standalone single-episode token (`S01E05`).
pub(crate) static EPISODE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bS\d{2,4}E\d{2,4}\b"));

/// Year-numbered season (`S2024`).
pub(crate) static YEAR_SEASON: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bS(20\d{2})\b"));

/// Title prefix (possibly empty) before the season token of a pack name.
pub(crate) static PACK_PREFIX: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^(.*?)\.?S\d{2,4}"));

/// Title prefix (possibly empty) before the `SxxExx` token of an episode name.
pub(crate) static EPISODE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^(.*?)\.?S\d{2,4}E\d{2,4}"));

/// `COMPLETE`/`iNCOMPLETE` marker together with the separator in front of it.
pub(crate) static COMPLETE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)[._ -]?\b(?:COMPLETE|INCOMPLETE)\b"));

/// Season token rewritten into `SxxExx` when synthesising episode names.
pub(crate) static SEASON_REWRITE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bS(\d{2,4})\b"));

/// Episode token for sibling grouping: `SxxExx` first, then a bare `Exx`.
pub(crate) static SIBLING_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)S\d{2,4}(E\d{2,4})|(E\d{2,4})"));

/// Track number one (`1`, `01`, `001`) as a standalone word.
pub(crate) static FIRST_TRACK: LazyLock<Regex> = LazyLock::new(|| compile(r"\b0*1\b"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile_and_capture() {
        let caps = SEASON_EPISODE.captures("show.s01e12.720p");
        assert_eq!(caps.and_then(|c| c.get(2)).map(|m| m.as_str()), Some("12"));
        assert!(ISO_DATE.is_match("Daily.Show.2024-03-15.WEB"));
        assert!(SEASON_TOKEN.is_match("Show.S01.1080p"));
        assert!(!SEASON_TOKEN.is_match("Show.S01E01.1080p"));
        assert!(FIRST_TRACK.is_match("01 - Intro"));
        assert!(!FIRST_TRACK.is_match("10 - Outro"));
    }
}
