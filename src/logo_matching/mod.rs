//! Channel name to logo URL matching
//!
//! [`normalize`] builds the lookup key, [`LogoCatalog`] and [`AliasTable`]
//! hold the known logos and key aliases, and [`match_logo`] applies the
//! exact-then-fuzzy strategy.

mod aliases;
pub mod catalog;
pub mod matcher;
pub mod normalize;

pub use catalog::{AliasTable, LogoCatalog, LogoCatalogEntry};
pub use matcher::{LogoMatch, MatchTier, match_logo};
pub use normalize::normalize;

/// Filename part of a logo URL, as shown in the audit reports.
pub fn logo_filename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
