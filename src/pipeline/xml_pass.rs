//! Guide pass: automatic icon matching into the intermediate guide

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::AppResult;
use crate::logo_matching::{AliasTable, LogoCatalog, match_logo};
use crate::models::{ChannelRecord, Degradation, Outcome};
use crate::reports::{self, MatchReport, ReportKind, UnmatchedReport};
use crate::utils::fs::{intermediate_path, write_atomic};
use crate::xmltv::{repair_display_names, rewrite_channel_icons};

#[derive(Debug, Clone)]
pub struct XmlPassResult {
    pub intermediate_path: PathBuf,
    pub matched: usize,
    pub total: usize,
    pub repaired_names: usize,
    pub degradations: Vec<Degradation>,
}

fn build_reports(channels: &[ChannelRecord]) -> (MatchReport, UnmatchedReport) {
    let mut matched = MatchReport::default();
    let mut unmatched = UnmatchedReport::default();
    for channel in channels {
        match &channel.logo_url {
            Some(url) => matched.record(channel.report_key(), &channel.name, url, None),
            None => unmatched.record(&channel.id, &channel.name),
        }
    }
    (matched, unmatched)
}

/// Match every channel of `document` against the catalog and write the
/// result to the intermediate guide beside `output`.
///
/// Parse and write failures abort the pass. A missing catalog, reports
/// directory or report file only degrades it.
pub async fn run_xml_pass(
    document: &str,
    catalog: &Outcome<LogoCatalog>,
    aliases: &AliasTable,
    output: &Path,
    reports_dir: &Path,
) -> AppResult<XmlPassResult> {
    let mut degradations = Vec::new();

    let catalog_value = catalog.value();
    if catalog_value.is_empty() {
        info!("Logo matching skipped (logo list file not loaded or empty)");
        degradations.push(Degradation::CatalogUnavailable {
            reason: catalog.reason().unwrap_or("logo list is empty").to_string(),
        });
    }

    if let Some(degradation) = reports::ensure_reports_dir(reports_dir).await {
        degradations.push(degradation);
    }

    let (repaired, repaired_names) = repair_display_names(document);
    if repaired_names > 0 {
        info!("Escaped bare ampersands in {} display names", repaired_names);
    }

    let document_name = output.display().to_string();
    let rewrite = rewrite_channel_icons(&repaired, &document_name, |channel| {
        if catalog_value.is_empty() {
            return None;
        }
        let found = match_logo(channel.matching_name(), catalog_value, aliases)?;
        debug!(
            "Channel {} ({}) matched {} [{:?}]",
            channel.id,
            channel.matching_name(),
            found.filename,
            found.tier
        );
        Some(found.url)
    })?;

    let total = rewrite.channels.len();
    let matched = rewrite.assigned();
    info!("Finished processing channels. Total: {}", total);

    let intermediate = intermediate_path(output);
    write_atomic(&intermediate, rewrite.document.as_bytes()).await?;
    info!("Intermediate XML saved to {}", intermediate.display());
    info!("Matched {} logo(s) automatically (XML)", matched);

    let (matched_report, unmatched_report) = build_reports(&rewrite.channels);
    let report_failures = reports::write_report_pair(
        reports_dir,
        (ReportKind::XmlMatched, &matched_report),
        (ReportKind::XmlUnmatched, &unmatched_report),
    )
    .await;
    if !report_failures.is_empty() {
        warn!("{} XML report(s) could not be written", report_failures.len());
    }
    degradations.extend(report_failures);

    Ok(XmlPassResult {
        intermediate_path: intermediate,
        matched,
        total,
        repaired_names,
        degradations,
    })
}
