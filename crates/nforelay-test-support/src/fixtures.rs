//! On-disk release tree fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tempfile::TempDir;

/// A release directory named like a download, living in a disposable temp dir.
///
/// The directory is removed when the fixture is dropped.
#[derive(Debug)]
pub struct ReleaseTree {
    _temp: TempDir,
    root: PathBuf,
}

impl ReleaseTree {
    /// Create an empty release directory called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp dir or the release directory cannot be created.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) {
            bail!("release fixture name must be a single path segment: {name:?}");
        }
        let temp = tempfile::tempdir().context("failed to create fixture temp dir")?;
        let root = temp.path().join(name);
        fs::create_dir(&root)
            .with_context(|| format!("failed to create release dir {}", root.display()))?;
        Ok(Self { _temp: temp, root })
    }

    /// Release directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a file of `size` bytes at `relative` (`/`-separated), creating parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directories cannot be written.
    pub fn file(&self, relative: &str, size: usize) -> Result<PathBuf> {
        self.write(relative, &vec![b'x'; size])
    }

    /// Write `contents` at `relative` (`/`-separated), creating parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directories cannot be written.
    pub fn write(&self, relative: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = relative
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Create an empty directory at `relative`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn dir(&self, relative: &str) -> Result<PathBuf> {
        let path = relative
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment));
        fs::create_dir_all(&path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(path)
    }
}
