//! Logo catalog and alias table
//!
//! The catalog is the list of known logo files (`filename|url` lines), the
//! alias table maps normalized channel keys onto catalog filenames. Both are
//! built once per run and only read afterwards.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::aliases::BUILTIN_ALIASES;
use super::normalize::normalize;
use crate::models::Outcome;

/// A single known logo file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoCatalogEntry {
    pub filename: String,
    pub url: String,
}

/// Known logo files, looked up by filename.
///
/// Duplicate filenames are kept in `entries` but lookups always resolve to
/// the first one in scan order.
#[derive(Debug, Clone, Default)]
pub struct LogoCatalog {
    entries: Vec<LogoCatalogEntry>,
    first_by_filename: HashMap<String, usize>,
}

impl LogoCatalog {
    /// Parse catalog text. Lines without a `|` separator are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut skipped = 0usize;
        let entries = contents
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| match line.split_once('|') {
                Some((filename, url)) => Some(LogoCatalogEntry {
                    filename: filename.to_string(),
                    url: url.to_string(),
                }),
                None => {
                    skipped += 1;
                    None
                }
            })
            .collect::<Vec<_>>();

        if skipped > 0 {
            debug!("Skipped {} catalog lines without a '|' separator", skipped);
        }

        Self::from_entries(entries)
    }

    pub fn from_entries<I: IntoIterator<Item = LogoCatalogEntry>>(entries: I) -> Self {
        let entries: Vec<LogoCatalogEntry> = entries.into_iter().collect();
        let mut first_by_filename = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            first_by_filename
                .entry(entry.filename.clone())
                .or_insert(position);
        }
        Self {
            entries,
            first_by_filename,
        }
    }

    /// Load the catalog file. Any problem yields an empty catalog, which
    /// switches matching off without failing the run.
    pub async fn load(path: Option<&Path>) -> Outcome<Self> {
        let Some(path) = path else {
            warn!("No logo list file provided. Skipping automatic logo matching.");
            return Outcome::degraded(Self::default(), "no logo list file configured");
        };

        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let catalog = Self::parse(&contents);
                info!("Loaded {} entries from logo list {}", catalog.len(), path.display());
                Outcome::Complete(catalog)
            }
            Err(e) => {
                warn!(
                    "Error reading logo list file {}: {}. Proceeding without automatic matching.",
                    path.display(),
                    e
                );
                Outcome::degraded(
                    Self::default(),
                    format!("cannot read logo list {}: {e}", path.display()),
                )
            }
        }
    }

    /// URL of the first entry with this filename.
    pub fn url_for(&self, filename: &str) -> Option<&str> {
        self.first_by_filename
            .get(filename)
            .map(|&position| self.entries[position].url.as_str())
    }

    pub fn entries(&self) -> &[LogoCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalized channel key to catalog filename, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AliasTable {
    /// The built-in UK alias table.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ALIASES.iter().copied())
    }

    /// Build a table from `(key, filename)` pairs. Keys are normalized; a
    /// repeated key keeps its first position and takes the later filename.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::default();
        table.extend(pairs);
        table
    }

    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, filename) in pairs {
            let key = normalize(key.as_ref());
            if key.is_empty() {
                continue;
            }
            let filename = filename.into();
            match self.index.get(&key) {
                Some(&position) => self.entries[position].1 = filename,
                None => {
                    self.index.insert(key.clone(), self.entries.len());
                    self.entries.push((key, filename));
                }
            }
        }
    }

    /// Built-in aliases extended with an optional JSON object file of extra
    /// `key -> filename` entries. Extra entries are applied in key order.
    pub async fn load(extra_path: Option<&Path>) -> Outcome<Self> {
        let mut table = Self::builtin();
        let Some(path) = extra_path else {
            return Outcome::Complete(table);
        };

        let extra = match tokio::fs::read_to_string(path).await {
            Ok(contents) => serde_json::from_str::<std::collections::BTreeMap<String, String>>(&contents)
                .map_err(|e| format!("invalid alias file {}: {e}", path.display())),
            Err(e) => Err(format!("cannot read alias file {}: {e}", path.display())),
        };

        match extra {
            Ok(extra) => {
                info!("Loaded {} extra aliases from {}", extra.len(), path.display());
                table.extend(extra);
                Outcome::Complete(table)
            }
            Err(reason) => {
                warn!("{}. Using built-in aliases only.", reason);
                Outcome::degraded(table, reason)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, filename)| (key.as_str(), filename.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
