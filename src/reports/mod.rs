//! Plain-text audit reports
//!
//! Each pass writes a matched and an unmatched report into the reports
//! directory. Reports are `|`-delimited with a two-line header and contain
//! ASCII only: every other character is written as `?`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::logo_matching::logo_filename;
use crate::models::{Degradation, ResolutionSource};

/// The four report files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    XmlMatched,
    XmlUnmatched,
    M3uMatched,
    M3uUnmatched,
}

impl ReportKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::XmlMatched => "logo_matching_report_xml.txt",
            Self::XmlUnmatched => "unmatched_channels_xml.txt",
            Self::M3uMatched => "logo_matching_report_m3u.txt",
            Self::M3uUnmatched => "unmatched_channels_m3u.txt",
        }
    }

    fn header(&self) -> (&'static str, usize) {
        match self {
            Self::XmlMatched => ("Channel ID | Display Name | Matched Logo", 60),
            Self::M3uMatched => ("Channel ID/Name | Display Name | Matched Logo | Source", 70),
            Self::XmlUnmatched | Self::M3uUnmatched => ("Channel ID | Display Name", 40),
        }
    }
}

/// ASCII-only rendering of a report field; empty fields become `N/A`.
pub fn ascii_field(value: &str) -> String {
    if value.is_empty() {
        return "N/A".to_string();
    }
    value
        .chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub key: String,
    pub name: String,
    pub logo: String,
    pub source: Option<ResolutionSource>,
}

/// Matched channels, one row per key. A repeated key replaces the earlier
/// row but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    rows: Vec<MatchRow>,
    index: HashMap<String, usize>,
}

impl MatchReport {
    /// Record a match. `logo_url` is reduced to its filename.
    pub fn record(&mut self, key: &str, name: &str, logo_url: &str, source: Option<ResolutionSource>) {
        let row = MatchRow {
            key: key.to_string(),
            name: name.to_string(),
            logo: logo_filename(logo_url).to_string(),
            source,
        };
        match self.index.get(key) {
            Some(&position) => self.rows[position] = row,
            None => {
                self.index.insert(row.key.clone(), self.rows.len());
                self.rows.push(row);
            }
        }
    }

    pub fn rows(&self) -> &[MatchRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UnmatchedReport {
    rows: Vec<UnmatchedRow>,
}

impl UnmatchedReport {
    pub fn record(&mut self, id: &str, name: &str) {
        self.rows.push(UnmatchedRow {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn rows(&self) -> &[UnmatchedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn render(kind: ReportKind, rows: impl Iterator<Item = String>) -> String {
    let (header, dashes) = kind.header();
    let mut out = format!("{header}\n{}\n", "-".repeat(dashes));
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Render a match report. The source column is only written for the
/// playlist report.
pub fn render_matches(kind: ReportKind, report: &MatchReport) -> String {
    let with_source = kind == ReportKind::M3uMatched;
    render(
        kind,
        report.rows().iter().map(|row| {
            let mut line = format!(
                "{} | {} | {}",
                ascii_field(&row.key),
                ascii_field(&row.name),
                ascii_field(&row.logo)
            );
            if with_source {
                line.push_str(" | ");
                line.push_str(row.source.map(|s| s.as_str()).unwrap_or("N/A"));
            }
            line
        }),
    )
}

pub fn render_unmatched(kind: ReportKind, report: &UnmatchedReport) -> String {
    render(
        kind,
        report
            .rows()
            .iter()
            .map(|row| format!("{} | {}", ascii_field(&row.id), ascii_field(&row.name))),
    )
}

/// Create the reports directory. Failure is returned as a degradation; the
/// report writes that follow will then fail individually.
pub async fn ensure_reports_dir(dir: &Path) -> Option<Degradation> {
    match tokio::fs::create_dir_all(dir).await {
        Ok(()) => None,
        Err(e) => {
            warn!("Cannot create reports directory {}: {}", dir.display(), e);
            Some(Degradation::ReportsDirUnavailable {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

/// Write rendered report text to `dir`.
pub async fn write_report(dir: &Path, kind: ReportKind, contents: &str) -> Result<PathBuf, Degradation> {
    let path = dir.join(kind.file_name());
    match tokio::fs::write(&path, contents).await {
        Ok(()) => {
            info!("Report saved to {}", path.display());
            Ok(path)
        }
        Err(e) => {
            warn!("Failed to write report {}: {}", path.display(), e);
            Err(Degradation::ReportWriteFailed {
                report: kind.file_name().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Write a matched/unmatched report pair, collecting any failures.
pub async fn write_report_pair(
    dir: &Path,
    (matched_kind, matched): (ReportKind, &MatchReport),
    (unmatched_kind, unmatched): (ReportKind, &UnmatchedReport),
) -> Vec<Degradation> {
    let mut degradations = Vec::new();
    if let Err(d) = write_report(dir, matched_kind, &render_matches(matched_kind, matched)).await {
        degradations.push(d);
    }
    if let Err(d) = write_report(dir, unmatched_kind, &render_unmatched(unmatched_kind, unmatched)).await {
        degradations.push(d);
    }
    degradations
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ascii_field() {
        assert_eq!(ascii_field(""), "N/A");
        assert_eq!(ascii_field("Télé 5"), "T?l? 5");
        assert_eq!(ascii_field("BBC One"), "BBC One");
    }

    #[test]
    fn test_repeated_key_keeps_first_position() {
        let mut report = MatchReport::default();
        report.record("A", "First", "https://x/a.png", None);
        report.record("B", "Second", "https://x/b.png", None);
        report.record("A", "Again", "https://x/a2.png", None);

        assert_eq!(report.len(), 2);
        assert_eq!(report.rows()[0].name, "Again");
        assert_eq!(report.rows()[0].logo, "a2.png");
        assert_eq!(report.rows()[1].key, "B");
    }

    #[test]
    fn test_render_xml_reports() {
        let mut matched = MatchReport::default();
        matched.record("BBCONE.uk", "BBC One", "https://x/bbc-one-uk.png", None);
        let mut unmatched = UnmatchedReport::default();
        unmatched.record("", "Kanal Ü");

        assert_eq!(
            render_matches(ReportKind::XmlMatched, &matched),
            format!(
                "Channel ID | Display Name | Matched Logo\n{}\nBBCONE.uk | BBC One | bbc-one-uk.png\n",
                "-".repeat(60)
            )
        );
        assert_eq!(
            render_unmatched(ReportKind::XmlUnmatched, &unmatched),
            format!("Channel ID | Display Name\n{}\nN/A | Kanal ?\n", "-".repeat(40))
        );
    }

    #[test]
    fn test_render_m3u_report_has_source_column() {
        let mut matched = MatchReport::default();
        matched.record("ITV1.uk", "ITV1", "https://y/itv1.png", Some(ResolutionSource::Fix));

        let rendered = render_matches(ReportKind::M3uMatched, &matched);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "Channel ID/Name | Display Name | Matched Logo | Source");
        assert_eq!(lines[1].len(), 70);
        assert_eq!(lines[2], "ITV1.uk | ITV1 | itv1.png | fix");
    }

    #[tokio::test]
    async fn test_write_report_pair() {
        let dir = TempDir::new().unwrap();
        let degradations = write_report_pair(
            dir.path(),
            (ReportKind::XmlMatched, &MatchReport::default()),
            (ReportKind::XmlUnmatched, &UnmatchedReport::default()),
        )
        .await;

        assert!(degradations.is_empty());
        assert!(dir.path().join("logo_matching_report_xml.txt").exists());
        assert!(dir.path().join("unmatched_channels_xml.txt").exists());
    }

    #[tokio::test]
    async fn test_write_failure_is_degradation() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let result = write_report(&missing, ReportKind::M3uUnmatched, "x").await;
        assert!(matches!(result, Err(Degradation::ReportWriteFailed { .. })));
    }
}
