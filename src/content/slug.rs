//! Slug normalization for titles and filenames

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_PREFIX: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}[-_]?").unwrap();
    static ref UNSAFE_RUN: Regex = Regex::new(r"[^a-z0-9-]+").unwrap();
    static ref DASH_RUN: Regex = Regex::new(r"-+").unwrap();
}

/// Turn an arbitrary title or filename into a URL-safe identifier
///
/// The result contains only lowercase ASCII alphanumerics separated by single
/// hyphens. Empty input (or input with nothing usable) yields an empty string.
pub fn normalize(input: &str) -> String {
    let lower = input.to_lowercase();
    let trimmed = lower.trim();
    let undated = DATE_PREFIX.replace(trimmed, "");
    let replaced = UNSAFE_RUN.replace_all(&undated, "-");
    let collapsed = DASH_RUN.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_string()
}
