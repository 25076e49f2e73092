use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of a step that can proceed with reduced capability.
///
/// Fatal conditions are returned as `Err(AppError)`; this type only
/// distinguishes "everything worked" from "carried on without something".
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Complete(T),
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn degraded<S: Into<String>>(value: T, reason: S) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Complete(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Complete(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Complete(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// Something a pass had to do without. Collected on pass results so the
/// orchestrator can report it in the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    CatalogUnavailable { reason: String },
    AliasesUnavailable { reason: String },
    FixesUnavailable { reason: String },
    CrossReferenceUnavailable { reason: String },
    ReportsDirUnavailable { path: PathBuf, reason: String },
    ReportWriteFailed { report: String, reason: String },
    OutputWriteFailed { path: PathBuf, reason: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogUnavailable { reason } => {
                write!(f, "logo catalog unavailable: {reason}")
            }
            Self::AliasesUnavailable { reason } => {
                write!(f, "extra aliases unavailable: {reason}")
            }
            Self::FixesUnavailable { reason } => {
                write!(f, "specific fixes unavailable: {reason}")
            }
            Self::CrossReferenceUnavailable { reason } => {
                write!(f, "guide cross-reference unavailable: {reason}")
            }
            Self::ReportsDirUnavailable { path, reason } => {
                write!(f, "reports directory {} unavailable: {reason}", path.display())
            }
            Self::ReportWriteFailed { report, reason } => {
                write!(f, "report {report} not written: {reason}")
            }
            Self::OutputWriteFailed { path, reason } => {
                write!(f, "output {} not written: {reason}", path.display())
            }
        }
    }
}

/// A channel as seen during a single rewrite pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRecord {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
}

impl ChannelRecord {
    /// Key used for match report rows: the identifier, or the name when the
    /// channel has no identifier.
    pub fn report_key(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// Where an M3U entry's logo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    /// Copied from the finished XMLTV guide by tvg-id
    Map,
    /// Curated override
    Fix,
    /// Catalog match on the channel name
    Match,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Fix => "fix",
            Self::Match => "match",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curated channel-identifier to logo URL overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecificFixes(HashMap<String, String>);

impl SpecificFixes {
    pub fn new(fixes: HashMap<String, String>) -> Self {
        Self(fixes)
    }

    pub fn get(&self, channel_id: &str) -> Option<&str> {
        self.0.get(channel_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load fixes from a JSON object file.
    ///
    /// An unset path means "no fixes" and is not a degradation. A configured
    /// file that is missing, unreadable or not a string-to-string object
    /// degrades to an empty table.
    pub async fn load(path: Option<&Path>) -> Outcome<Self> {
        let Some(path) = path else {
            info!("Skipping specific fixes (no fixes file configured)");
            return Outcome::Complete(Self::default());
        };

        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Skipping specific fixes, cannot read {}: {}", path.display(), e);
                return Outcome::degraded(Self::default(), format!("cannot read fixes file: {e}"));
            }
        };

        match serde_json::from_str::<Self>(&contents) {
            Ok(fixes) => {
                info!("Loaded {} specific fixes from {}", fixes.len(), path.display());
                Outcome::Complete(fixes)
            }
            Err(e) => {
                warn!("Error decoding JSON fixes in {}: {}", path.display(), e);
                Outcome::degraded(Self::default(), format!("invalid fixes file: {e}"))
            }
        }
    }
}

impl FromIterator<(String, String)> for SpecificFixes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Channel-identifier to logo URL lookup derived from the finished guide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossReferenceMap(HashMap<String, String>);

impl CrossReferenceMap {
    pub fn get(&self, channel_id: &str) -> Option<&str> {
        self.0.get(channel_id).map(String::as_str)
    }

    /// Record a channel's icon. Empty identifiers or sources are ignored.
    pub fn insert(&mut self, channel_id: String, logo_url: String) {
        if !channel_id.is_empty() && !logo_url.is_empty() {
            self.0.insert(channel_id, logo_url);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for CrossReferenceMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (id, url) in iter {
            map.insert(id, url);
        }
        map
    }
}
