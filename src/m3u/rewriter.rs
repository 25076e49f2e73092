//! Playlist `tvg-logo` rewriting
//!
//! Only `#EXTINF:` lines are touched. Every other line is passed through
//! verbatim and in order.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::logo_matching::{AliasTable, LogoCatalog, match_logo};
use crate::models::{CrossReferenceMap, ResolutionSource, SpecificFixes};

const EXTINF: &str = "#EXTINF:";

static TVG_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)tvg-id="([^"]*)""#).expect("tvg-id pattern is valid"));

static TVG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)tvg-name="([^"]*)""#).expect("tvg-name pattern is valid"));

static TVG_LOGO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)tvg-logo="([^"]*)""#).expect("tvg-logo pattern is valid"));

/// Everything the playlist pass may take a logo from, in precedence order.
#[derive(Debug, Clone, Copy)]
pub struct LogoSources<'a> {
    pub cross_reference: &'a CrossReferenceMap,
    pub fixes: &'a SpecificFixes,
    pub catalog: &'a LogoCatalog,
    pub aliases: &'a AliasTable,
}

impl LogoSources<'_> {
    /// Pick a logo for an entry: guide cross-reference, then curated fix, then
    /// catalog match on the name.
    pub fn resolve(&self, id: Option<&str>, name: Option<&str>) -> Option<ResolvedLogo> {
        if let Some(id) = id {
            if let Some(url) = self.cross_reference.get(id) {
                return Some(ResolvedLogo::new(ResolutionSource::Map, url));
            }
            if let Some(url) = self.fixes.get(id) {
                return Some(ResolvedLogo::new(ResolutionSource::Fix, url));
            }
        }

        let name = name?;
        if self.catalog.is_empty() {
            return None;
        }
        match_logo(name, self.catalog, self.aliases)
            .map(|found| ResolvedLogo::new(ResolutionSource::Match, &found.url))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLogo {
    pub source: ResolutionSource,
    pub url: String,
}

impl ResolvedLogo {
    fn new(source: ResolutionSource, url: &str) -> Self {
        Self {
            source,
            url: url.to_string(),
        }
    }
}

/// Attributes read from one `#EXTINF:` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtinfAttributes {
    /// Non-empty `tvg-id`
    pub id: Option<String>,
    /// Non-empty `tvg-name`, else the trailing label, else the id
    pub name: Option<String>,
    pub has_logo: bool,
    /// Byte offset just past the `tvg-name="..."` attribute
    name_attr_end: Option<usize>,
    /// Byte offset of the comma introducing the trailing label
    label_comma: Option<usize>,
}

/// Position of the first comma that is not inside a quoted value.
fn label_comma(line: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (position, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return Some(position),
            _ => {}
        }
    }
    None
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Read the tvg attributes and label of a trimmed `#EXTINF:` line.
pub fn parse_extinf(line: &str) -> ExtinfAttributes {
    let id = TVG_ID_RE
        .captures(line)
        .and_then(|caps| non_empty(&caps[1]));
    let name_match = TVG_NAME_RE.captures(line);
    let label_comma = label_comma(line);
    let label = label_comma.and_then(|comma| non_empty(&line[comma + 1..]));

    let name = name_match
        .as_ref()
        .and_then(|caps| non_empty(&caps[1]))
        .or(label)
        .or_else(|| id.clone());

    ExtinfAttributes {
        id,
        name,
        has_logo: TVG_LOGO_RE.is_match(line),
        name_attr_end: name_match.and_then(|caps| caps.get(0)).map(|m| m.end()),
        label_comma,
    }
}

/// Set `tvg-logo` on a trimmed `#EXTINF:` line.
///
/// Existing `tvg-logo` values are all replaced. Otherwise the attribute goes
/// right after `tvg-name`, else right before the label comma, else at the end.
pub fn set_tvg_logo(line: &str, attributes: &ExtinfAttributes, url: &str) -> String {
    let attribute = format!(r#"tvg-logo="{url}""#);
    if attributes.has_logo {
        return TVG_LOGO_RE
            .replace_all(line, NoExpand(&attribute))
            .into_owned();
    }

    let insert_at = attributes
        .name_attr_end
        .or(attributes.label_comma)
        .unwrap_or(line.len());
    format!("{} {attribute}{}", &line[..insert_at], &line[insert_at..])
}

/// One `#EXTINF:` entry as processed by [`rewrite_playlist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: Option<String>,
    pub name: Option<String>,
    pub resolved: Option<ResolvedLogo>,
}

impl PlaylistEntry {
    /// Key for match report rows.
    pub fn report_key(&self) -> &str {
        self.id
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistRewrite {
    pub document: String,
    pub entries: Vec<PlaylistEntry>,
    pub has_header: bool,
}

impl PlaylistRewrite {
    pub fn resolved_from(&self, source: ResolutionSource) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.resolved.as_ref().is_some_and(|r| r.source == source))
            .count()
    }

    pub fn resolved(&self) -> usize {
        self.entries.iter().filter(|entry| entry.resolved.is_some()).count()
    }
}

/// Rewrite every `#EXTINF:` line's logo from `sources`.
pub fn rewrite_playlist(playlist: &str, sources: &LogoSources<'_>) -> PlaylistRewrite {
    let has_header = playlist
        .lines()
        .next()
        .is_some_and(|first| first.trim().starts_with("#EXTM3U"));
    if !has_header {
        warn!("Input does not start with #EXTM3U");
    }

    let mut entries = Vec::new();
    let lines: Vec<String> = playlist
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if !trimmed.starts_with(EXTINF) {
                return line.to_string();
            }

            let attributes = parse_extinf(trimmed);
            let resolved = sources.resolve(attributes.id.as_deref(), attributes.name.as_deref());
            let output = match &resolved {
                Some(logo) => {
                    debug!(
                        "Playlist entry {:?} ({:?}) -> {} [{}]",
                        attributes.id, attributes.name, logo.url, logo.source
                    );
                    set_tvg_logo(trimmed, &attributes, &logo.url)
                }
                None => {
                    debug!("No logo for playlist entry {:?} ({:?})", attributes.id, attributes.name);
                    line.to_string()
                }
            };

            entries.push(PlaylistEntry {
                id: attributes.id,
                name: attributes.name,
                resolved,
            });
            output
        })
        .collect();

    PlaylistRewrite {
        document: lines.join("\n"),
        entries,
        has_header,
    }
}
