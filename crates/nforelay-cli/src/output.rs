//! Run summaries and formatting helpers.

use std::fmt::Write as _;

use nforelay_packs::ProcessReport;
use tracing::{info, warn};

/// One-line summary of a processing run.
#[must_use]
pub(crate) fn summarize(report: &ProcessReport) -> String {
    let mut line = format!(
        "{} ({}): {} submitted",
        report.mode.as_str(),
        report.detection.as_str(),
        report.submitted.len()
    );
    for (label, count) in [
        ("failed", report.failures.len()),
        ("rejected", report.rejected.len()),
        ("unmatched", report.unmatched.len()),
    ] {
        if count > 0 {
            let _ = write!(line, ", {count} {label}");
        }
    }
    line
}

/// Log the outcome of a run; failures are repeated individually.
pub(crate) fn log_report(release_name: &str, report: &ProcessReport) {
    for failure in &report.failures {
        warn!(
            release = %failure.release_name,
            stage = failure.stage,
            error = %failure.error,
            "release not archived"
        );
    }
    if report.is_empty() {
        info!(release = %release_name, summary = %summarize(report), "nothing to process");
    } else {
        info!(release = %release_name, summary = %summarize(report), "post-processing finished");
    }
}

/// Human-readable byte count.
#[must_use]
pub(crate) fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;
    let value = bytes_to_f64(bytes);
    if value >= GIB {
        format!("{:.2} GiB", value / GIB)
    } else if value >= MIB {
        format!("{:.2} MiB", value / MIB)
    } else if value >= KIB {
        format!("{:.2} KiB", value / KIB)
    } else {
        format!("{bytes} B")
    }
}

fn bytes_to_f64(value: u64) -> f64 {
    let high = u32::try_from(value >> 32).unwrap_or(u32::MAX);
    let low = u32::try_from(value & 0xFFFF_FFFF).unwrap_or(u32::MAX);
    f64::from(high) * 4_294_967_296.0 + f64::from(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use nforelay_config::HashPolicy;
    use nforelay_packs::{
        PacksResult, ReleaseRequest, ReleaseSink, ReleaseSubmission, process_release,
    };
    use nforelay_test_support::fixtures::ReleaseTree;

    struct Discard;

    impl ReleaseSink for Discard {
        fn submit(&mut self, _submission: &ReleaseSubmission) -> PacksResult<()> {
            Ok(())
        }
    }

    #[test]
    fn summary_lists_only_non_zero_counters() -> Result<()> {
        let tree = ReleaseTree::new("Show.S01")?;
        tree.file("Show.S01E01.mkv", 3)?;
        tree.file("Show.S01E02.mkv", 3)?;
        tree.file("Show.S01E03.mkv", 3)?;
        tree.file("Bonus.mkv", 3)?;
        let request = ReleaseRequest {
            release_name: "Show.S01".to_string(),
            root: tree.root().to_path_buf(),
            category: "TV".to_string(),
            hash_policy: HashPolicy::Never,
        };
        let report = process_release(&request, &mut Discard)?;
        assert_eq!(
            summarize(&report),
            "season_pack (name_pattern): 3 submitted, 1 unmatched"
        );
        Ok(())
    }

    #[test]
    fn format_bytes_displays_expected_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MiB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GiB");
    }
}
