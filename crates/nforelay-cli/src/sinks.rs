//! Release sinks used by the CLI: on-disk archive and dry-run printer.
//!
//! # Design
//! - Every release gets its own archive directory named after the release.
//! - MediaInfo is best-effort; a failed probe is logged and the release is still archived.
//! - Categories are resolved per release name, so each pack episode is classified on its own.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use nforelay_config::{ClientConfig, map_category};
use nforelay_packs::{
    FileListRequest, MediaKind, PacksError, PacksResult, ReleaseSink, ReleaseSubmission,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::mediainfo::MediaInfo;
use crate::output::format_bytes;

/// Make a release name safe to use as a single path segment.
fn archive_segment(release_name: &str) -> String {
    release_name
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect()
}

/// Maps the download-client label onto a catalog category for every submission,
/// using that submission's own release name, then forwards it.
pub(crate) struct CategorizedSink<'a, S> {
    inner: S,
    config: &'a ClientConfig,
    label: &'a str,
}

impl<'a, S> CategorizedSink<'a, S> {
    pub(crate) const fn new(inner: S, config: &'a ClientConfig, label: &'a str) -> Self {
        Self {
            inner,
            config,
            label,
        }
    }
}

impl<S: ReleaseSink> ReleaseSink for CategorizedSink<'_, S> {
    fn submit(&mut self, submission: &ReleaseSubmission) -> PacksResult<()> {
        let category = map_category(self.config, self.label, &submission.release_name)
            .map(|category| category.as_str().to_string())
            .unwrap_or_default();
        let categorized = ReleaseSubmission {
            category,
            ..submission.clone()
        };
        self.inner.submit(&categorized)
    }
}

/// Writes each submission into `<root>/<release>/`.
pub(crate) struct ArchiveSink<'a> {
    root: PathBuf,
    mediainfo: Option<&'a MediaInfo>,
}

impl<'a> ArchiveSink<'a> {
    pub(crate) const fn new(root: PathBuf, mediainfo: Option<&'a MediaInfo>) -> Self {
        Self { root, mediainfo }
    }

    fn write_media_info(&self, dir: &Path, segment: &str, submission: &ReleaseSubmission) {
        let (Some(mediainfo), Some(media)) = (self.mediainfo, submission.media_path.as_deref())
        else {
            return;
        };
        if MediaKind::of_path(media) == MediaKind::HashOnly {
            return;
        }
        let target = dir.join(format!("{segment}.json"));
        match mediainfo.probe(media) {
            Ok(report) => {
                if let Err(err) = fs::write(&target, report) {
                    warn!(path = %target.display(), error = %err, "failed to archive media info");
                }
            }
            Err(err) => {
                warn!(
                    release = %submission.release_name,
                    error = %format!("{err:#}"),
                    "media info unavailable"
                );
            }
        }
    }
}

impl ReleaseSink for ArchiveSink<'_> {
    fn submit(&mut self, submission: &ReleaseSubmission) -> PacksResult<()> {
        let segment = archive_segment(&submission.release_name);
        let dir = self.root.join(&segment);
        fs::create_dir_all(&dir).map_err(|err| PacksError::io("create_archive_dir", &dir, err))?;

        let listing_path = dir.join(format!("{segment}.filelist.json"));
        let listing = serde_json::to_vec_pretty(&submission.file_list_request())
            .map_err(|err| PacksError::json("encode_file_list", &listing_path, err))?;
        fs::write(&listing_path, listing)
            .map_err(|err| PacksError::io("write_file_list", &listing_path, err))?;

        if let Some(nfo) = &submission.nfo_path {
            let name = nfo
                .file_name()
                .map_or_else(|| format!("{segment}.nfo").into(), ToOwned::to_owned);
            let target = dir.join(name);
            fs::copy(nfo, &target).map_err(|err| PacksError::io("copy_nfo", &target, err))?;
        }

        if let (Some(hash), Some(media)) = (&submission.content_hash, &submission.media_path) {
            let target = dir.join(format!("{segment}.sha256"));
            let name = media
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            fs::write(&target, format!("{hash}  {name}\n"))
                .map_err(|err| PacksError::io("write_checksum", &target, err))?;
        }

        self.write_media_info(&dir, &segment, submission);

        info!(
            release = %submission.release_name,
            category = %submission.category,
            files = submission.file_list.entries.len(),
            size = %format_bytes(submission.file_list.total_bytes()),
            archive = %dir.display(),
            "release archived"
        );
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DryRunRecord<'a> {
    #[serde(flatten)]
    request: FileListRequest,
    media_path: Option<&'a Path>,
    nfo_path: Option<&'a Path>,
    content_hash: Option<&'a str>,
}

/// Prints every submission as one JSON document per line.
pub(crate) struct DryRunSink<W> {
    out: W,
}

impl<W: Write> DryRunSink<W> {
    pub(crate) const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ReleaseSink for DryRunSink<W> {
    fn submit(&mut self, submission: &ReleaseSubmission) -> PacksResult<()> {
        let record = DryRunRecord {
            request: submission.file_list_request(),
            media_path: submission.media_path.as_deref(),
            nfo_path: submission.nfo_path.as_deref(),
            content_hash: submission.content_hash.as_deref(),
        };
        serde_json::to_writer(&mut self.out, &record)
            .map_err(|err| PacksError::json("encode_dry_run", "<stdout>", err))?;
        writeln!(self.out).map_err(|err| PacksError::io("write_dry_run", "<stdout>", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use nforelay_packs::{FileListEntry, FileListing};
    use nforelay_test_support::fixtures::ReleaseTree;

    fn submission(tree: &ReleaseTree) -> Result<ReleaseSubmission> {
        let media = tree.file("Show.S01E01.mkv", 6)?;
        let nfo = tree.file("Show.S01E01.nfo", 2)?;
        Ok(ReleaseSubmission {
            release_name: "Show.S01E01".to_string(),
            category: "TV".to_string(),
            media_path: Some(media),
            nfo_path: Some(nfo),
            content_hash: Some("abc123".to_string()),
            file_list: FileListing {
                base_dir: tree.root().to_path_buf(),
                entries: vec![FileListEntry {
                    file_path: "Show.S01E01.mkv".to_string(),
                    file_size_bytes: 6,
                }],
            },
        })
    }

    #[test]
    fn archive_sink_writes_listing_nfo_and_checksum() -> Result<()> {
        let tree = ReleaseTree::new("Show.S01")?;
        let archive = ReleaseTree::new("archive")?;
        let mut sink = ArchiveSink::new(archive.root().to_path_buf(), None);
        sink.submit(&submission(&tree)?)?;

        let dir = archive.root().join("Show.S01E01");
        let listing: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.join("Show.S01E01.filelist.json"))?)?;
        assert_eq!(listing["releaseName"], "Show.S01E01");
        assert_eq!(listing["entries"][0]["fileSizeBytes"], 6);
        assert!(dir.join("Show.S01E01.nfo").is_file());
        assert_eq!(
            fs::read_to_string(dir.join("Show.S01E01.sha256"))?,
            "abc123  Show.S01E01.mkv\n"
        );
        assert!(!dir.join("Show.S01E01.json").exists());
        Ok(())
    }

    #[test]
    fn dry_run_prints_one_json_line_per_release() -> Result<()> {
        let tree = ReleaseTree::new("Show.S01")?;
        let mut out = Vec::new();
        let mut sink = DryRunSink::new(&mut out);
        sink.submit(&submission(&tree)?)?;
        sink.submit(&submission(&tree)?)?;

        let text = String::from_utf8(out)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let record: serde_json::Value = serde_json::from_str(lines[0])?;
        assert_eq!(record["category"], "TV");
        assert_eq!(record["contentHash"], "abc123");
        assert_eq!(record["entries"][0]["filePath"], "Show.S01E01.mkv");
        Ok(())
    }

    #[test]
    fn categories_follow_each_release_name() -> Result<()> {
        let tree = ReleaseTree::new("Mixed")?;
        let config = ClientConfig::default();
        let mut out = Vec::new();
        let mut sink = CategorizedSink::new(DryRunSink::new(&mut out), &config, "*");

        let episode = submission(&tree)?;
        sink.submit(&episode)?;
        let movie = ReleaseSubmission {
            release_name: "Movie.Title.2021.1080p.BluRay.x264".to_string(),
            ..episode.clone()
        };
        sink.submit(&movie)?;
        let unknown = ReleaseSubmission {
            release_name: "Untitled".to_string(),
            ..episode
        };
        sink.submit(&unknown)?;

        let text = String::from_utf8(out)?;
        let categories = text
            .lines()
            .map(|line| {
                serde_json::from_str::<serde_json::Value>(line)
                    .map(|record| record["category"].as_str().unwrap_or("?").to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(categories, ["TV", "Movies", ""]);
        Ok(())
    }

    #[test]
    fn archive_segments_never_contain_separators() {
        assert_eq!(archive_segment("a/b\\c"), "a_b_c");
        assert_eq!(archive_segment("Show.S01E01"), "Show.S01E01");
    }
}
