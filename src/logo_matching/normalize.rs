//! Channel name normalization
//!
//! Turns a human-readable channel label into the key used for every catalog
//! and alias lookup. The mapping is lossy: quality and region suffixes are
//! dropped along with all punctuation and whitespace.

use regex::Regex;
use std::sync::LazyLock;

static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(directs\)|\s*-\s*(?:sd|hd|fhd|uhd)|\s+uk$").expect("channel suffix pattern is valid")
});

/// Normalize a channel name into its matching key.
///
/// ```rust
/// use channel_logo_updater::logo_matching::normalize;
///
/// assert_eq!(normalize("BBC One - HD"), "bbcone");
/// assert_eq!(normalize("Sky Sports F1 UK"), "skysportsf1");
/// ```
pub fn normalize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let lowered = name.to_lowercase();
    let stripped = SUFFIX_RE.replace_all(&lowered, "");

    stripped
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
