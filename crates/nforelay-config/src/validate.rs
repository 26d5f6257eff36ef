//! Validation helpers and parsing utilities for configuration values.

use crate::error::{ConfigError, ConfigResult};
use crate::model::HashPolicy;

const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Parse a size such as `"800MB"`, `"5GB"` or `"5.5"` (bare numbers are gigabytes).
///
/// Units are case-insensitive and surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the number is malformed, negative or
/// not finite.
pub fn parse_size_with_unit(value: &str) -> ConfigResult<u64> {
    let normalized = value.trim().to_ascii_uppercase();
    let (number, scale) = if let Some(number) = normalized.strip_suffix("MB") {
        (number, MIB)
    } else if let Some(number) = normalized.strip_suffix("GB") {
        (number, GIB)
    } else {
        (normalized.as_str(), GIB)
    };

    let parsed: f64 = number
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid("max_hash_file_size", value, "invalid_number"))?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(ConfigError::invalid(
            "max_hash_file_size",
            value,
            "must_be_non_negative",
        ));
    }
    Ok(to_bytes(parsed * scale))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn to_bytes(value: f64) -> u64 {
    // saturating float-to-int conversion; callers pass finite, non-negative values
    value as u64
}

/// Interpret a `max_hash_file_size` value.
///
/// Empty means [`HashPolicy::Always`], `"0"` means [`HashPolicy::Never`], anything
/// else is a size limit.
///
/// # Errors
///
/// Returns an error when the value is neither empty, `"0"`, nor a valid size.
pub fn parse_hash_policy(value: &str) -> ConfigResult<HashPolicy> {
    match value.trim() {
        "" => Ok(HashPolicy::Always),
        "0" => Ok(HashPolicy::Never),
        _ => parse_size_with_unit(value).map(HashPolicy::MaxBytes),
    }
}
