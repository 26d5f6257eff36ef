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
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! File-backed client configuration for the post-processor.
//!
//! Layout: `model.rs` (typed document and hash policy), `validate.rs`
//! (size and policy parsing), `loader.rs` (load or create the JSON document),
//! `category.rs` (catalog category mapping and exclusion).

pub mod category;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use category::{Category, is_category_excluded, map_category, match_category_by_name};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load, load_or_create, write_default};
pub use model::{ClientConfig, DEFAULT_BASE_URL, HashPolicy, PLACEHOLDER_API_KEY};
pub use validate::{parse_hash_policy, parse_size_with_unit};
