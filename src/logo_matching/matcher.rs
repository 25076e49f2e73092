//! Two-tier logo matching
//!
//! 1. Exact: the normalized channel key is an alias whose filename is in the
//!    catalog.
//! 2. Fuzzy: every alias is scored against the key by substring containment
//!    and the highest scoring alias that resolves in the catalog wins.

use super::catalog::{AliasTable, LogoCatalog};
use super::normalize::normalize;

/// How a logo was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Fuzzy { score: usize },
}

/// A resolved logo for a channel name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoMatch {
    pub url: String,
    pub filename: String,
    pub tier: MatchTier,
}

/// Substring score of an alias against a channel key.
///
/// An alias contained in the key scores its own length, so longer and more
/// specific aliases rank higher. A key contained in an alias scores the key
/// length.
fn fuzzy_score(alias: &str, key: &str) -> usize {
    if key.contains(alias) {
        alias.len()
    } else if alias.contains(key) {
        key.len()
    } else {
        0
    }
}

/// Find the best logo for `channel_name`.
pub fn match_logo(channel_name: &str, catalog: &LogoCatalog, aliases: &AliasTable) -> Option<LogoMatch> {
    if catalog.is_empty() {
        return None;
    }

    let key = normalize(channel_name);
    if key.is_empty() {
        return None;
    }

    if let Some(filename) = aliases.get(&key)
        && let Some(url) = catalog.url_for(filename)
    {
        return Some(LogoMatch {
            url: url.to_string(),
            filename: filename.to_string(),
            tier: MatchTier::Exact,
        });
    }

    let mut best: Option<(usize, &str, &str)> = None;
    for (alias, filename) in aliases.iter() {
        let score = fuzzy_score(alias, &key);
        if score == 0 || best.is_some_and(|(best_score, _, _)| score <= best_score) {
            continue;
        }
        if let Some(url) = catalog.url_for(filename) {
            best = Some((score, filename, url));
        }
    }

    best.map(|(score, filename, url)| LogoMatch {
        url: url.to_string(),
        filename: filename.to_string(),
        tier: MatchTier::Fuzzy { score },
    })
}
