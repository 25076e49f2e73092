use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use channel_logo_updater::{
    config::{Config, ConfigOverrides, defaults::DEFAULT_CONFIG_FILE},
    pipeline::Orchestrator,
    services::{ArtifactUploader, DropboxUploader},
    utils::StandardContentFetcher,
};

#[derive(Parser)]
#[command(name = "channel-logo-updater")]
#[command(version)]
#[command(about = "Update IPTV channel logos in XMLTV and/or M3U files")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Input XMLTV URL or file path
    #[arg(long, value_name = "URL|PATH")]
    input_xml: Option<String>,

    /// Input M3U URL or file path
    #[arg(long, value_name = "URL|PATH")]
    input_m3u: Option<String>,

    /// Output XMLTV file path
    #[arg(long, value_name = "PATH")]
    output_xml: Option<PathBuf>,

    /// Output M3U file path
    #[arg(long, value_name = "PATH")]
    output_m3u: Option<PathBuf>,

    /// Directory to store reports
    #[arg(long = "reports", value_name = "DIR")]
    reports_dir: Option<PathBuf>,

    /// Logo list file path (format: filename|url)
    #[arg(long = "logos", value_name = "PATH")]
    logo_list_file: Option<PathBuf>,

    /// Specific fixes JSON file path
    #[arg(long = "fixes", value_name = "PATH")]
    specific_fixes_file: Option<PathBuf>,

    /// Extra channel aliases JSON file path
    #[arg(long = "aliases", value_name = "PATH")]
    alias_file: Option<PathBuf>,

    /// Download timeout (e.g. 30s, 2m)
    #[arg(long, value_name = "DURATION")]
    request_timeout: Option<String>,

    /// Dropbox OAuth configuration (JSON string or path to JSON file)
    #[arg(long, value_name = "JSON|PATH")]
    dropbox_oauth: Option<String>,

    /// Path (directory) in Dropbox
    #[arg(long, value_name = "PATH")]
    dropbox_path: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_xml: self.input_xml.clone(),
            output_xml: self.output_xml.clone(),
            input_m3u: self.input_m3u.clone(),
            output_m3u: self.output_m3u.clone(),
            logo_list_file: self.logo_list_file.clone(),
            specific_fixes_file: self.specific_fixes_file.clone(),
            alias_file: self.alias_file.clone(),
            reports_dir: self.reports_dir.clone(),
            request_timeout: self.request_timeout.clone(),
            dropbox_path: self.dropbox_path.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", toml::to_string_pretty(&Config::default())?);
        return Ok(());
    }

    let log_filter = format!("channel_logo_updater={}", cli.log_level);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(&cli.config, &cli.overrides())?;
    if let Some(oauth) = &cli.dropbox_oauth {
        config.apply_dropbox_oauth(oauth);
    }
    info!("Reports directory: {}", config.reports_dir.display());

    let fetcher = StandardContentFetcher::with_timeout(config.request_timeout)?;

    let credentials = config.dropbox_credentials();
    if credentials.is_some() && config.dropbox_path.is_none() {
        warn!("Dropbox credentials given without a Dropbox path. Dropbox upload will be disabled.");
    }
    let uploader = DropboxUploader::new(credentials, config.dropbox_path.clone(), config.request_timeout)?;
    let uploader: Option<&dyn ArtifactUploader> = uploader.is_available().then_some(&uploader as &dyn ArtifactUploader);

    let summary = Orchestrator::new(&config, &fetcher, uploader).run().await;

    if summary.all_failed() {
        anyhow::bail!("No requested document could be processed");
    }
    Ok(())
}
