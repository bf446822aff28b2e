//! # Size Descriptors
//!
//! Free-text sizes such as `"500ml"`, `"1.5 L"` or `"2,5l"` are turned into a
//! volume in liters. Anything that does not contain a recognizable quantity
//! counts as zero liters; a bad size never fails a request.
//!
//! Volumes are summed as whole milliliters so bracket boundaries compare
//! exactly.

use regex::Regex;
use std::sync::OnceLock;

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)([0-9]+(?:[.,][0-9]+)?)\s*(ml|l)\b").expect("size pattern is valid")
    })
}

/// Parse a size descriptor into whole milliliters.
///
/// Only the leftmost match is considered.
pub fn parse_size_to_milliliters(size: &str) -> u64 {
    let Some(caps) = size_pattern().captures(size) else {
        return 0;
    };

    let value: f64 = caps[1].replace(',', ".").parse().unwrap_or(0.0);
    let ml = if caps[2].eq_ignore_ascii_case("ml") {
        value
    } else {
        value * 1000.0
    };
    ml.round() as u64
}

/// Parse a size descriptor into liters.
pub fn parse_size_to_liters(size: &str) -> f64 {
    parse_size_to_milliliters(size) as f64 / 1000.0
}
