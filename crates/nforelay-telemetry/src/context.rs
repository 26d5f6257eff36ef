//! Per-run span that tags every log line of one post-processing invocation.

use tracing::span::EnteredSpan;
use uuid::Uuid;

use crate::init::build_sha;

/// Guard that keeps the run span entered until it is dropped.
#[derive(Debug)]
pub struct RunContextGuard {
    run_id: Uuid,
    _span: EnteredSpan,
}

impl RunContextGuard {
    /// Enter a fresh `run` span for the release named `release`.
    #[must_use]
    pub fn enter(release: &str) -> Self {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "run",
            run_id = %run_id,
            release = %release,
            build_sha = %build_sha()
        );
        Self {
            run_id,
            _span: span.entered(),
        }
    }

    /// Identifier attached to this run's logs.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }
}
