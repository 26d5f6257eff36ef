#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Post-processing CLI invoked by the download client once a release completes.
//!
//! Layout:
//! - `cli.rs`: argument parsing and the processing run
//! - `error.rs`: CLI errors and exit codes
//! - `sinks.rs`: archive and dry-run release sinks
//! - `mediainfo.rs`: external `mediainfo` probe
//! - `output.rs`: run summaries
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod error;
pub(crate) mod mediainfo;
pub(crate) mod output;
pub(crate) mod sinks;

pub use cli::run;
