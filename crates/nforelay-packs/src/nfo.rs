//! Descriptive text (`.nfo`) lookup for packs, episodes and single releases.
//!
//! Lookups are best-effort: an unreadable directory simply yields no NFO.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PacksResult;
use crate::patterns::SEASON_EPISODE;
use crate::scan::{MediaKind, read_dir_files, walk_files};

fn is_nfo(path: &Path) -> bool {
    MediaKind::of_path(path) == MediaKind::Nfo
}

fn nfo_files_in(dir: &Path) -> Vec<PathBuf> {
    match read_dir_files(dir) {
        Ok(files) => files.into_iter().filter(|path| is_nfo(path)).collect(),
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "nfo lookup skipped unreadable directory");
            Vec::new()
        }
    }
}

/// First NFO directly inside the pack directory whose name carries no `SxxExx` token.
#[must_use]
pub fn find_general_nfo(pack_dir: &Path) -> Option<PathBuf> {
    nfo_files_in(pack_dir).into_iter().find(|path| {
        path.file_name()
            .is_some_and(|name| !SEASON_EPISODE.is_match(&name.to_string_lossy()))
    })
}

/// Any NFO directly inside an episode directory; its name is not checked.
#[must_use]
pub fn find_nfo_in_directory(dir: &Path) -> Option<PathBuf> {
    nfo_files_in(dir).into_iter().next()
}

/// `<release_name>.nfo` beside a video in a shared pack directory.
#[must_use]
pub fn find_named_nfo(dir: &Path, release_name: &str) -> Option<PathBuf> {
    let candidate = dir.join(format!("{release_name}.nfo"));
    candidate.is_file().then_some(candidate)
}

/// First NFO anywhere under `root`, used for single releases.
///
/// # Errors
///
/// Returns an error if `root` cannot be traversed.
pub fn find_first_nfo(root: &Path) -> PacksResult<Option<PathBuf>> {
    for file in walk_files(root) {
        let file = file?;
        if file.kind == MediaKind::Nfo {
            return Ok(Some(file.path));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use nforelay_test_support::fixtures::ReleaseTree;

    #[test]
    fn general_nfo_skips_episode_specific_files() -> Result<()> {
        let tree = ReleaseTree::new("Show.S01")?;
        tree.file("a.Show.S01E01.nfo", 1)?;
        tree.file("show.s01.nfo", 1)?;
        tree.file("Sub/zz.nfo", 1)?;

        assert_eq!(
            find_general_nfo(tree.root()),
            Some(tree.root().join("show.s01.nfo"))
        );

        let episodic = ReleaseTree::new("Other.S01")?;
        episodic.file("Other.S01E01.nfo", 1)?;
        assert_eq!(find_general_nfo(episodic.root()), None);
        Ok(())
    }

    #[test]
    fn directory_and_named_lookups() -> Result<()> {
        let tree = ReleaseTree::new("Show.S01")?;
        tree.file("Show.S01E03/whatever.NFO", 1)?;
        tree.file("Show.S01E01.nfo", 1)?;

        assert_eq!(
            find_nfo_in_directory(&tree.root().join("Show.S01E03")),
            Some(tree.root().join("Show.S01E03").join("whatever.NFO"))
        );
        assert_eq!(find_nfo_in_directory(&tree.root().join("missing")), None);
        assert_eq!(
            find_named_nfo(tree.root(), "Show.S01E01"),
            Some(tree.root().join("Show.S01E01.nfo"))
        );
        assert_eq!(find_named_nfo(tree.root(), "Show.S01E02"), None);
        Ok(())
    }

    #[test]
    fn first_nfo_searches_recursively() -> Result<()> {
        let tree = ReleaseTree::new("Movie.2020")?;
        tree.file("Movie.2020.mkv", 1)?;
        tree.file("Info/movie.nfo", 1)?;
        assert_eq!(
            find_first_nfo(tree.root())?,
            Some(tree.root().join("Info").join("movie.nfo"))
        );
        Ok(())
    }
}
