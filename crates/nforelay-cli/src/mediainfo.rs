//! External `mediainfo` binary discovery and probing.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, ensure};
use tracing::{info, warn};

const BINARY_NAME: &str = if cfg!(windows) {
    "mediainfo.exe"
} else {
    "mediainfo"
};

#[cfg(target_os = "linux")]
const STANDARD_PATHS: &[&str] = &[
    "/usr/bin/mediainfo",
    "/usr/local/bin/mediainfo",
    "/opt/mediainfo/bin/mediainfo",
];
#[cfg(target_os = "macos")]
const STANDARD_PATHS: &[&str] = &[
    "/usr/local/bin/mediainfo",
    "/opt/homebrew/bin/mediainfo",
    "/usr/bin/mediainfo",
];
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
const STANDARD_PATHS: &[&str] = &[];

/// A working `mediainfo` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MediaInfo {
    binary: PathBuf,
}

impl MediaInfo {
    /// Find a usable binary: the configured path, then beside the executable, then
    /// `PATH`, then the platform's standard install locations.
    pub(crate) fn locate(configured: &str) -> Option<Self> {
        let configured = configured.trim();
        if !configured.is_empty() {
            let path = PathBuf::from(configured);
            if is_usable(&path) {
                info!(path = %path.display(), "using configured mediainfo");
                return Some(Self { binary: path });
            }
            warn!(path = %path.display(), "configured mediainfo is not usable; searching");
        }

        let beside_exe = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(BINARY_NAME)));
        let on_path = env::var_os("PATH")
            .map(|paths| {
                env::split_paths(&paths)
                    .map(|dir| dir.join(BINARY_NAME))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let standard = STANDARD_PATHS.iter().map(PathBuf::from);

        let found = beside_exe
            .into_iter()
            .chain(on_path)
            .chain(standard)
            .find(|candidate| is_usable(candidate));
        match found {
            Some(binary) => {
                info!(path = %binary.display(), "using mediainfo");
                Some(Self { binary })
            }
            None => {
                info!("mediainfo not available; releases are archived without media info");
                None
            }
        }
    }

    /// Run `mediainfo --Output=JSON` against `media` and return its raw output.
    pub(crate) fn probe(&self, media: &Path) -> Result<Vec<u8>> {
        let output = Command::new(&self.binary)
            .arg("--Output=JSON")
            .arg(media)
            .output()
            .with_context(|| format!("failed to run {}", self.binary.display()))?;
        ensure!(
            output.status.success(),
            "mediainfo exited with {} for {}",
            output.status,
            media.display()
        );
        Ok(output.stdout)
    }
}

fn is_usable(path: &Path) -> bool {
    path.is_file()
        && Command::new(path)
            .arg("--Version")
            .output()
            .is_ok_and(|output| output.status.success())
}
