//! Playlist pass: logo assignment from the guide, fixes and the catalog

use std::path::Path;
use tracing::{info, warn};

use crate::m3u::{LogoSources, PlaylistEntry, rewrite_playlist};
use crate::models::{Degradation, ResolutionSource};
use crate::reports::{self, MatchReport, ReportKind, UnmatchedReport};
use crate::utils::fs::write_with_parents;

#[derive(Debug, Clone, Default)]
pub struct M3uPassResult {
    pub resolved: usize,
    pub from_map: usize,
    pub from_fix: usize,
    pub from_match: usize,
    pub total: usize,
    pub output_written: bool,
    pub degradations: Vec<Degradation>,
}

fn build_reports(entries: &[PlaylistEntry]) -> (MatchReport, UnmatchedReport) {
    let mut matched = MatchReport::default();
    let mut unmatched = UnmatchedReport::default();
    for entry in entries {
        let name = entry.name.as_deref().unwrap_or_default();
        match &entry.resolved {
            Some(logo) => matched.record(entry.report_key(), name, &logo.url, Some(logo.source)),
            None if entry.name.is_some() => unmatched.record(entry.id.as_deref().unwrap_or_default(), name),
            None => {}
        }
    }
    (matched, unmatched)
}

/// Rewrite `playlist`, write it to `output` and report on every entry.
///
/// Nothing here is fatal: a failed output write is reported as a
/// degradation and the in-memory counts are still returned.
pub async fn run_m3u_pass(
    playlist: &str,
    sources: &LogoSources<'_>,
    output: &Path,
    reports_dir: &Path,
) -> M3uPassResult {
    info!("Processing M3U content...");
    info!("Using {} logos mapped from XML", sources.cross_reference.len());
    if sources.catalog.is_empty() {
        warn!("Logo list not loaded. Will only use XML map and specific fixes for M3U.");
    }

    let mut degradations = Vec::new();
    if let Some(degradation) = reports::ensure_reports_dir(reports_dir).await {
        degradations.push(degradation);
    }

    let rewrite = rewrite_playlist(playlist, sources);
    let resolved = rewrite.resolved();
    let from_map = rewrite.resolved_from(ResolutionSource::Map);
    let from_fix = rewrite.resolved_from(ResolutionSource::Fix);
    let from_match = rewrite.resolved_from(ResolutionSource::Match);
    let total = rewrite.entries.len();

    let output_written = match write_with_parents(output, rewrite.document.as_bytes()).await {
        Ok(()) => {
            info!(
                "M3U Update Summary: Used XML Map={}, Matched New={}, Fixed={} out of {} channels",
                from_map, from_match, from_fix, total
            );
            info!("Updated M3U saved to: {}", output.display());
            true
        }
        Err(e) => {
            warn!("Error writing updated M3U file {}: {}", output.display(), e);
            degradations.push(Degradation::OutputWriteFailed {
                path: output.to_path_buf(),
                reason: e.to_string(),
            });
            false
        }
    };

    let (matched_report, unmatched_report) = build_reports(&rewrite.entries);
    degradations.extend(
        reports::write_report_pair(
            reports_dir,
            (ReportKind::M3uMatched, &matched_report),
            (ReportKind::M3uUnmatched, &unmatched_report),
        )
        .await,
    );

    M3uPassResult {
        resolved,
        from_map,
        from_fix,
        from_match,
        total,
        output_written,
        degradations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo_matching::{AliasTable, LogoCatalog, LogoCatalogEntry};
    use crate::models::{CrossReferenceMap, SpecificFixes};
    use tempfile::TempDir;

    const PLAYLIST: &str = "#EXTM3U\n#EXTINF:-1 tvg-id=\"BBCONE.uk\" tvg-name=\"BBC One\",BBC One\nhttp://s/1\n#EXTINF:-1 tvg-id=\"ITV1.uk\" tvg-logo=\"old\",ITV1\nhttp://s/2\n#EXTINF:-1 tvg-id=\"X.uk\",Mystery\nhttp://s/3\n#EXTINF:-1,\nhttp://s/4";

    #[tokio::test]
    async fn test_pass_writes_output_and_reports() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out/playlist.m3u");
        let cross_reference: CrossReferenceMap =
            [("BBCONE.uk".to_string(), "https://x/bbc-one-uk.png".to_string())].into_iter().collect();
        let fixes: SpecificFixes = [("ITV1.uk".to_string(), "https://y/itv1.png".to_string())].into_iter().collect();
        let catalog = LogoCatalog::default();
        let aliases = AliasTable::builtin();
        let sources = LogoSources {
            cross_reference: &cross_reference,
            fixes: &fixes,
            catalog: &catalog,
            aliases: &aliases,
        };

        let result = run_m3u_pass(PLAYLIST, &sources, &output, dir.path()).await;

        assert!(result.output_written);
        assert_eq!(result.total, 4);
        assert_eq!((result.from_map, result.from_fix, result.from_match), (1, 1, 0));
        assert_eq!(result.resolved, 2);

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains(r#"tvg-name="BBC One" tvg-logo="https://x/bbc-one-uk.png",BBC One"#));
        assert!(written.contains(r#"tvg-id="ITV1.uk" tvg-logo="https://y/itv1.png",ITV1"#));

        let matched = std::fs::read_to_string(dir.path().join("logo_matching_report_m3u.txt")).unwrap();
        assert!(matched.contains("BBCONE.uk | BBC One | bbc-one-uk.png | map\n"));
        assert!(matched.contains("ITV1.uk | ITV1 | itv1.png | fix\n"));

        let unmatched = std::fs::read_to_string(dir.path().join("unmatched_channels_m3u.txt")).unwrap();
        assert!(unmatched.ends_with("-\nX.uk | Mystery\n"));
    }

    #[tokio::test]
    async fn test_output_write_failure_is_degradation() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let output = blocker.join("playlist.m3u");
        let empty_map = CrossReferenceMap::default();
        let fixes: SpecificFixes = [("A".to_string(), "https://y/a.png".to_string())].into_iter().collect();
        let catalog = LogoCatalog::from_entries([LogoCatalogEntry {
            filename: "a.png".to_string(),
            url: "https://x/a.png".to_string(),
        }]);
        let aliases = AliasTable::default();
        let sources = LogoSources {
            cross_reference: &empty_map,
            fixes: &fixes,
            catalog: &catalog,
            aliases: &aliases,
        };

        let result = run_m3u_pass("#EXTM3U\n#EXTINF:-1 tvg-id=\"A\",A\nhttp://a", &sources, &output, dir.path()).await;

        assert!(!result.output_written);
        assert_eq!(result.from_fix, 1);
        assert!(
            result
                .degradations
                .iter()
                .any(|d| matches!(d, Degradation::OutputWriteFailed { .. }))
        );
    }
}
