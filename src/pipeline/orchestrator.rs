//! End-to-end run: guide, cross-reference, playlist, upload, cleanup
//!
//! The order matters: the playlist pass reads the cross-reference map built
//! from the finished guide, so the guide (including fixes) always completes
//! first.

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::fix_pass::apply_specific_fixes;
use super::m3u_pass::{M3uPassResult, run_m3u_pass};
use super::xml_pass::{XmlPassResult, run_xml_pass};
use crate::config::Config;
use crate::errors::AppResult;
use crate::logo_matching::{AliasTable, LogoCatalog};
use crate::m3u::LogoSources;
use crate::models::{CrossReferenceMap, Degradation, Outcome, SpecificFixes};
use crate::services::ArtifactUploader;
use crate::utils::ContentFetcher;
use crate::utils::fs::intermediate_path;
use crate::utils::url::UrlUtils;
use crate::xmltv::load_cross_reference;

const BANNER_WIDTH: usize = 80;

/// How a requested document fared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentState {
    NotRequested,
    Processed,
    Failed(String),
}

impl DocumentState {
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Everything a run did, for logging and for the process exit status
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub xml: DocumentState,
    pub xml_output: Option<PathBuf>,
    pub xml_pass: Option<XmlPassResult>,
    pub fixes_applied: usize,
    pub cross_reference_entries: usize,
    pub m3u: DocumentState,
    pub m3u_output: Option<PathBuf>,
    pub m3u_pass: Option<M3uPassResult>,
    pub reports_dir: PathBuf,
    pub uploads_attempted: usize,
    pub uploads_succeeded: usize,
    pub degradations: Vec<Degradation>,
}

impl RunSummary {
    fn new(reports_dir: PathBuf) -> Self {
        Self {
            xml: DocumentState::NotRequested,
            xml_output: None,
            xml_pass: None,
            fixes_applied: 0,
            cross_reference_entries: 0,
            m3u: DocumentState::NotRequested,
            m3u_output: None,
            m3u_pass: None,
            reports_dir,
            uploads_attempted: 0,
            uploads_succeeded: 0,
            degradations: Vec::new(),
        }
    }

    /// True when every requested document failed
    pub fn all_failed(&self) -> bool {
        let requested = [&self.xml, &self.m3u]
            .into_iter()
            .filter(|state| **state != DocumentState::NotRequested)
            .collect::<Vec<_>>();
        !requested.is_empty() && requested.iter().all(|state| state.is_failed())
    }

    fn degrade(&mut self, degradation: Degradation) {
        if !self.degradations.contains(&degradation) {
            self.degradations.push(degradation);
        }
    }

    fn degrade_all(&mut self, degradations: impl IntoIterator<Item = Degradation>) {
        for degradation in degradations {
            self.degrade(degradation);
        }
    }
}

/// Drives one run over the configured documents
pub struct Orchestrator<'a> {
    config: &'a Config,
    fetcher: &'a dyn ContentFetcher,
    uploader: Option<&'a dyn ArtifactUploader>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config, fetcher: &'a dyn ContentFetcher, uploader: Option<&'a dyn ArtifactUploader>) -> Self {
        Self {
            config,
            fetcher,
            uploader,
        }
    }

    fn banner(&self) {
        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("IPTV Channel Logo Updater v{} (XML & M3U)", env!("CARGO_PKG_VERSION"));
        info!("Current time: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        info!("{}", "=".repeat(BANNER_WIDTH));
    }

    pub async fn run(&self) -> RunSummary {
        self.banner();
        let mut summary = RunSummary::new(self.config.reports_dir.clone());

        let fixes = SpecificFixes::load(self.config.specific_fixes_file.as_deref()).await;
        if let Some(reason) = fixes.reason() {
            summary.degrade(Degradation::FixesUnavailable {
                reason: reason.to_string(),
            });
        }
        let fixes = fixes.into_value();

        let catalog = LogoCatalog::load(self.config.logo_list_file.as_deref()).await;
        if let Some(reason) = catalog.reason() {
            summary.degrade(Degradation::CatalogUnavailable {
                reason: reason.to_string(),
            });
        }
        let aliases = AliasTable::load(self.config.alias_file.as_deref()).await;
        if let Some(reason) = aliases.reason() {
            summary.degrade(Degradation::AliasesUnavailable {
                reason: reason.to_string(),
            });
        }
        let aliases = aliases.into_value();
        info!("{}", "-".repeat(40));

        let intermediate = self.config.output_xml.as_deref().map(intermediate_path);

        if let (Some(input), Some(output)) = (&self.config.input_xml, &self.config.output_xml) {
            info!("Processing XML: {} -> {}", UrlUtils::obfuscate_credentials(input), output.display());
            match self.process_xml(input, output, &catalog, &aliases, &fixes).await {
                Ok((pass, fixed)) => {
                    summary.degrade_all(pass.degradations.iter().cloned());
                    summary.xml = DocumentState::Processed;
                    summary.xml_output = Some(output.clone());
                    summary.fixes_applied = fixed;
                    summary.xml_pass = Some(pass);
                }
                Err(e) => {
                    error!("XML processing failed: {}", e);
                    summary.xml = DocumentState::Failed(e.to_string());
                }
            }
            info!("{}", "-".repeat(40));
        }

        let final_xml = summary.xml_output.clone();
        let cross_reference = match final_xml {
            Some(output) => {
                let outcome = load_cross_reference(&output).await;
                if let Some(reason) = outcome.reason() {
                    summary.degrade(Degradation::CrossReferenceUnavailable {
                        reason: reason.to_string(),
                    });
                }
                outcome.into_value()
            }
            None => {
                info!("Skipping tvg-id map build (XML not processed successfully)");
                CrossReferenceMap::default()
            }
        };
        summary.cross_reference_entries = cross_reference.len();

        if let (Some(input), Some(output)) = (&self.config.input_m3u, &self.config.output_m3u) {
            info!("Processing M3U: {} -> {}", UrlUtils::obfuscate_credentials(input), output.display());
            let sources = LogoSources {
                cross_reference: &cross_reference,
                fixes: &fixes,
                catalog: catalog.value(),
                aliases: &aliases,
            };
            match self.fetcher.fetch_text(input).await {
                Ok(playlist) => {
                    let pass = run_m3u_pass(&playlist, &sources, output, &self.config.reports_dir).await;
                    summary.degrade_all(pass.degradations.iter().cloned());
                    summary.m3u = DocumentState::Processed;
                    if pass.output_written {
                        summary.m3u_output = Some(output.clone());
                    }
                    summary.m3u_pass = Some(pass);
                }
                Err(e) => {
                    error!("Failed to download M3U content: {}", e);
                    summary.m3u = DocumentState::Failed(e.to_string());
                }
            }
            info!("{}", "-".repeat(40));
        }

        self.upload(&mut summary).await;
        self.log_summary(&summary);

        if let Some(intermediate) = intermediate {
            remove_intermediate(&intermediate).await;
        }

        summary
    }

    async fn process_xml(
        &self,
        input: &str,
        output: &Path,
        catalog: &Outcome<LogoCatalog>,
        aliases: &AliasTable,
        fixes: &SpecificFixes,
    ) -> AppResult<(XmlPassResult, usize)> {
        let document = self.fetcher.fetch_text(input).await?;
        let pass = run_xml_pass(&document, catalog, aliases, output, &self.config.reports_dir).await?;
        let fixed = apply_specific_fixes(&pass.intermediate_path, fixes, output).await?;
        Ok((pass, fixed))
    }

    async fn upload(&self, summary: &mut RunSummary) {
        let Some(uploader) = self.uploader.filter(|u| u.is_available()) else {
            info!("Dropbox upload not configured, skipping upload");
            return;
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for output in [&summary.xml_output, &summary.m3u_output].into_iter().flatten() {
            if tokio::fs::try_exists(output).await.unwrap_or(false) {
                files.push(output.clone());
            } else {
                warn!("Processed output {} not found, not uploading", output.display());
            }
        }
        if files.is_empty() {
            return;
        }

        info!("Uploading {} file(s)", files.len());
        let mut succeeded = 0;
        for file in &files {
            match uploader.upload(file).await {
                Ok(remote) => {
                    info!("Successfully uploaded: {}", remote);
                    succeeded += 1;
                }
                Err(e) => error!("Error during upload of {}: {}", file.display(), e),
            }
        }
        if succeeded == files.len() {
            info!("All processed files successfully uploaded");
        } else {
            warn!("Uploaded {}/{} processed files", succeeded, files.len());
        }

        summary.uploads_attempted = files.len();
        summary.uploads_succeeded = succeeded;
    }

    fn log_summary(&self, summary: &RunSummary) {
        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("Processing Summary:");
        log_document("XML", &summary.xml, summary.xml_output.as_deref());
        if let Some(pass) = &summary.xml_pass {
            info!(
                "  XML channels: {} total, {} matched, {} fixed",
                pass.total, pass.matched, summary.fixes_applied
            );
        }
        log_document("M3U", &summary.m3u, summary.m3u_output.as_deref());
        if let Some(pass) = &summary.m3u_pass {
            info!(
                "  M3U entries: {} total, {} updated (map {}, fix {}, match {})",
                pass.total, pass.resolved, pass.from_map, pass.from_fix, pass.from_match
            );
        }
        info!("  Reports directory: {}", summary.reports_dir.display());
        if summary.uploads_attempted > 0 {
            info!("  Uploaded: {}/{}", summary.uploads_succeeded, summary.uploads_attempted);
        }
        for degradation in &summary.degradations {
            warn!("  Degraded: {}", degradation);
        }
        info!("{}", "=".repeat(BANNER_WIDTH));
    }
}

fn log_document(label: &str, state: &DocumentState, output: Option<&Path>) {
    match (state, output) {
        (DocumentState::NotRequested, _) => info!("  {}: not requested", label),
        (DocumentState::Processed, Some(output)) => info!("  {}: processed -> {}", label, output.display()),
        (DocumentState::Processed, None) => info!("  {}: processed (output not written)", label),
        (DocumentState::Failed(reason), _) => warn!("  {}: failed ({})", label, reason),
    }
}

async fn remove_intermediate(path: &Path) {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return;
    }
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("Cleaned up intermediate file: {}", path.display()),
        Err(e) => warn!("Could not remove intermediate file {}: {}", path.display(), e),
    }
}
