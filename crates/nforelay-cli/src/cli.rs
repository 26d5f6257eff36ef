//! Post-processor invoked by the download client once a release completes.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use nforelay_config::{ConfigError, is_category_excluded, load_or_create};
use nforelay_packs::{ProcessReport, ReleaseRequest, ReleaseSink, process_release};
use nforelay_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, RunContextGuard, build_sha, init_logging,
};
use tracing::{info, warn};

use crate::error::{CliError, CliResult};
use crate::mediainfo::MediaInfo;
use crate::output::log_report;
use crate::sinks::{ArchiveSink, CategorizedSink, DryRunSink};

const CONFIG_FILE_NAME: &str = "nforelay-config.json";
const ARCHIVE_DIR_NAME: &str = "archive";

#[derive(Parser, Debug)]
#[command(
    name = "nforelay",
    version,
    about = "Decompose completed downloads into releases and archive their file lists"
)]
struct Cli {
    /// Torrent name as reported by the download client.
    torrent_name: String,
    /// Content path of the completed download.
    content_path: PathBuf,
    /// Download-client category label.
    category: String,
    /// Torrent info hash.
    info_hash: String,
    /// Configuration document; defaults to `nforelay-config.json` beside the binary.
    #[arg(long, env = "NFORELAY_CONFIG")]
    config: Option<PathBuf>,
    /// Archive root; defaults to `archive/` beside the binary.
    #[arg(long, env = "NFORELAY_ARCHIVE_DIR")]
    archive_dir: Option<PathBuf>,
    /// Print submissions as JSON lines instead of archiving them.
    #[arg(long)]
    dry_run: bool,
    /// Log output format (`json` or `pretty`).
    #[arg(long, env = "NFORELAY_LOG_FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, env = "NFORELAY_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value
        .parse()
        .map_err(|_| format!("unknown log format '{value}' (expected json or pretty)"))
}

/// Parses arguments, processes the release and returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    run_with(&Cli::parse())
}

fn run_with(cli: &Cli) -> i32 {
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: option_env!("NFORELAY_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: logging unavailable: {err}");
    }

    let context = RunContextGuard::enter(&cli.torrent_name);
    info!(
        run_id = %context.run_id(),
        content_path = %cli.content_path.display(),
        category = %cli.category,
        info_hash = %cli.info_hash,
        build_sha = build_sha(),
        "post-processing started"
    );

    match execute(cli) {
        Ok(Some(report)) => {
            log_report(&cli.torrent_name, &report);
            0
        }
        Ok(None) => 0,
        Err(err) => {
            let message = err.display_message();
            tracing::error!(error = %message, "post-processing failed");
            eprintln!("error: {message}");
            err.exit_code()
        }
    }
}

/// Run one release. `None` means the category is excluded.
fn execute(cli: &Cli) -> CliResult<Option<ProcessReport>> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| beside_executable(CONFIG_FILE_NAME));
    let config = load_or_create(&config_path).map_err(config_error)?;

    if is_category_excluded(&config, &cli.category) {
        info!(category = %cli.category, "category excluded; skipping release");
        return Ok(None);
    }

    let request = ReleaseRequest {
        release_name: cli.torrent_name.clone(),
        root: cli.content_path.clone(),
        category: cli.category.clone(),
        hash_policy: config.hash_policy(),
    };

    let report = if cli.dry_run {
        let stdout = io::stdout();
        let printer = DryRunSink::new(stdout.lock());
        let mut sink = CategorizedSink::new(printer, &config, &cli.category);
        process(&request, &mut sink)?
    } else {
        let archive_root = cli
            .archive_dir
            .clone()
            .unwrap_or_else(|| beside_executable(ARCHIVE_DIR_NAME));
        let mediainfo = MediaInfo::locate(&config.mediainfo_path);
        let archive = ArchiveSink::new(archive_root, mediainfo.as_ref());
        let mut sink = CategorizedSink::new(archive, &config, &cli.category);
        process(&request, &mut sink)?
    };
    Ok(Some(report))
}

fn process<S: ReleaseSink>(request: &ReleaseRequest, sink: &mut S) -> CliResult<ProcessReport> {
    process_release(request, sink).map_err(|err| {
        CliError::failure(anyhow::Error::new(err).context(format!(
            "failed to process {}",
            request.root.display()
        )))
    })
}

fn config_error(err: ConfigError) -> CliError {
    match err {
        ConfigError::DefaultCreated { path } => CliError::validation(format!(
            "created default configuration at {}; set api_key and rerun",
            path.display()
        )),
        ConfigError::PlaceholderApiKey { path } => CliError::validation(format!(
            "api_key in {} is still the placeholder",
            path.display()
        )),
        other => {
            CliError::failure(anyhow::Error::new(other).context("failed to load configuration"))
        }
    }
}

fn beside_executable(name: &str) -> PathBuf {
    match env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map_or_else(|| PathBuf::from(name), |dir| dir.join(name)),
        Err(err) => {
            warn!(error = %err, "cannot resolve executable directory; using working directory");
            Path::new(".").join(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use nforelay_config::ClientConfig;
    use nforelay_test_support::fixtures::ReleaseTree;

    fn cli_for(tree: &ReleaseTree, config: &Path, archive: &Path, category: &str) -> Result<Cli> {
        let content = tree.root().to_string_lossy().into_owned();
        let config = config.to_string_lossy().into_owned();
        let archive = archive.to_string_lossy().into_owned();
        Ok(Cli::try_parse_from([
            "nforelay",
            "Show.Name.S01.1080p",
            content.as_str(),
            category,
            "0123abcd",
            "--config",
            config.as_str(),
            "--archive-dir",
            archive.as_str(),
        ])?)
    }

    fn write_config(dir: &ReleaseTree, excluded: &[&str]) -> Result<PathBuf> {
        let config = ClientConfig {
            api_key: "secret".to_string(),
            mediainfo_path: dir.root().join("no-mediainfo").to_string_lossy().into_owned(),
            excluded_categories: excluded.iter().map(ToString::to_string).collect(),
            ..ClientConfig::default()
        };
        dir.write("nforelay-config.json", serde_json::to_string(&config)?.as_bytes())
    }

    fn season_pack() -> Result<ReleaseTree> {
        let tree = ReleaseTree::new("Show.Name.S01.1080p")?;
        tree.file("Show.Name.S01E01.1080p.mkv", 10)?;
        tree.file("Show.Name.S01E02.1080p.mkv", 12)?;
        tree.file("Show.Name.S01E03.1080p.mkv", 14)?;
        tree.write("Show.Name.S01.1080p.nfo", b"nfo")?;
        Ok(tree)
    }

    #[test]
    fn arguments_parse_with_defaults() -> Result<()> {
        let cli = Cli::try_parse_from(["nforelay", "Name", "/data/Name", "tv", "hash"])?;
        assert_eq!(cli.torrent_name, "Name");
        assert_eq!(cli.content_path, PathBuf::from("/data/Name"));
        assert!(!cli.dry_run);
        assert_eq!(cli.log_level, DEFAULT_LOG_LEVEL);
        assert!(Cli::try_parse_from(["nforelay", "Name", "/data/Name"]).is_err());
        Ok(())
    }

    #[test]
    fn log_format_flag_is_validated() -> Result<()> {
        let cli = Cli::try_parse_from([
            "nforelay", "Name", "/x", "tv", "hash", "--log-format", "json",
        ])?;
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert!(
            Cli::try_parse_from(["nforelay", "Name", "/x", "tv", "hash", "--log-format", "xml"])
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn season_pack_is_archived_per_episode() -> Result<()> {
        let tree = season_pack()?;
        let workdir = ReleaseTree::new("work")?;
        let config = write_config(&workdir, &[])?;
        let archive = workdir.root().join("archive");
        let cli = cli_for(&tree, &config, &archive, "sonarr")?;

        let report = execute(&cli).map_err(|err| anyhow::anyhow!(err.display_message()))?;
        let report = report.ok_or_else(|| anyhow::anyhow!("release was skipped"))?;
        assert_eq!(report.submitted.len(), 3);

        let listing: serde_json::Value = serde_json::from_slice(&std::fs::read(
            archive
                .join("Show.Name.S01E01.1080p")
                .join("Show.Name.S01E01.1080p.filelist.json"),
        )?)?;
        assert_eq!(listing["category"], "TV");
        assert!(
            archive
                .join("Show.Name.S01E01.1080p")
                .join("Show.Name.S01.1080p.nfo")
                .is_file()
        );
        assert!(
            !archive
                .join("Show.Name.S01E02.1080p")
                .join("Show.Name.S01.1080p.nfo")
                .exists()
        );
        Ok(())
    }

    #[test]
    fn excluded_categories_skip_processing() -> Result<()> {
        let tree = season_pack()?;
        let workdir = ReleaseTree::new("work")?;
        let config = write_config(&workdir, &["XXX"])?;
        let archive = workdir.root().join("archive");
        let cli = cli_for(&tree, &config, &archive, "xxx")?;

        assert!(matches!(execute(&cli), Ok(None)));
        assert!(!archive.exists());
        Ok(())
    }

    #[test]
    fn first_run_creates_config_and_exits_with_validation_code() -> Result<()> {
        let tree = season_pack()?;
        let workdir = ReleaseTree::new("work")?;
        let config = workdir.root().join("nforelay-config.json");
        let cli = cli_for(&tree, &config, &workdir.root().join("archive"), "tv")?;

        let err = execute(&cli).err().ok_or_else(|| anyhow::anyhow!("expected failure"))?;
        assert_eq!(err.exit_code(), 2);
        assert!(config.is_file());
        Ok(())
    }

    #[test]
    fn missing_content_path_is_a_failure() -> Result<()> {
        let tree = season_pack()?;
        let workdir = ReleaseTree::new("work")?;
        let config = write_config(&workdir, &[])?;
        let mut cli = cli_for(&tree, &config, &workdir.root().join("archive"), "tv")?;
        cli.content_path = workdir.root().join("gone");

        let err = execute(&cli).err().ok_or_else(|| anyhow::anyhow!("expected failure"))?;
        assert_eq!(err.exit_code(), 3);
        Ok(())
    }
}
