use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;
pub mod duration_serde;

use crate::errors::{AppError, AppResult};
use crate::services::DropboxCredentials;
use defaults::*;

/// Run configuration
///
/// Layered as built-in defaults, then the TOML file, then environment
/// variables, then command-line overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// XMLTV guide URL or path
    pub input_xml: Option<String>,
    pub output_xml: Option<PathBuf>,
    /// M3U playlist URL or path
    pub input_m3u: Option<String>,
    pub output_m3u: Option<PathBuf>,

    /// Logo catalog (`filename|url` per line)
    pub logo_list_file: Option<PathBuf>,
    /// JSON object of channel id -> logo URL overrides
    pub specific_fixes_file: Option<PathBuf>,
    /// JSON object of extra channel key -> logo filename aliases
    pub alias_file: Option<PathBuf>,
    pub reports_dir: PathBuf,

    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,

    pub dropbox_refresh_token: Option<String>,
    pub dropbox_app_key: Option<String>,
    pub dropbox_app_secret: Option<String>,
    /// Dropbox directory uploads are written into
    pub dropbox_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_xml: None,
            output_xml: None,
            input_m3u: None,
            output_m3u: None,
            logo_list_file: Some(PathBuf::from(DEFAULT_LOGO_LIST_FILE)),
            specific_fixes_file: Some(PathBuf::from(DEFAULT_SPECIFIC_FIXES_FILE)),
            alias_file: None,
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            request_timeout: humantime::parse_duration(DEFAULT_REQUEST_TIMEOUT).unwrap_or(Duration::from_secs(30)),
            dropbox_refresh_token: None,
            dropbox_app_key: None,
            dropbox_app_secret: None,
            dropbox_path: Some(DEFAULT_DROPBOX_PATH.to_string()),
        }
    }
}

/// Command-line values layered over every other source. Unset fields leave
/// the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_xml: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_xml: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_m3u: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_m3u: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_list_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_fixes_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropbox_path: Option<String>,
}

fn non_empty<T: AsRef<str>>(value: Option<T>) -> Option<T> {
    value.filter(|v| !v.as_ref().trim().is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty())
}

impl Config {
    /// The layered provider chain, exposed so callers can add layers.
    pub fn figment(config_file: &Path, overrides: &ConfigOverrides) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::raw().only(ENV_KEYS))
            .merge(Serialized::defaults(overrides))
    }

    /// Load and validate configuration
    pub fn load(config_file: &Path, overrides: &ConfigOverrides) -> AppResult<Self> {
        if config_file.exists() {
            info!("Loading configuration from {}", config_file.display());
        }

        let config: Config = Self::figment(config_file, overrides)
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Treat empty strings (typically unset-but-exported environment
    /// variables) as absent.
    fn normalized(self) -> Self {
        Self {
            input_xml: non_empty(self.input_xml),
            output_xml: non_empty_path(self.output_xml),
            input_m3u: non_empty(self.input_m3u),
            output_m3u: non_empty_path(self.output_m3u),
            logo_list_file: non_empty_path(self.logo_list_file),
            specific_fixes_file: non_empty_path(self.specific_fixes_file),
            alias_file: non_empty_path(self.alias_file),
            reports_dir: self.reports_dir,
            request_timeout: self.request_timeout,
            dropbox_refresh_token: non_empty(self.dropbox_refresh_token),
            dropbox_app_key: non_empty(self.dropbox_app_key),
            dropbox_app_secret: non_empty(self.dropbox_app_secret),
            dropbox_path: non_empty(self.dropbox_path),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.input_xml.is_some() && self.output_xml.is_none() {
            return Err(AppError::configuration("--output-xml is required with --input-xml"));
        }
        if self.input_m3u.is_some() && self.output_m3u.is_none() {
            return Err(AppError::configuration("--output-m3u is required with --input-m3u"));
        }
        if self.input_xml.is_none() && self.input_m3u.is_none() {
            return Err(AppError::configuration("Either --input-xml or --input-m3u must be provided"));
        }
        if self.reports_dir.as_os_str().is_empty() {
            return Err(AppError::configuration("Reports directory must not be empty"));
        }
        Ok(())
    }

    /// Replace the Dropbox credentials with an inline JSON object or the
    /// contents of a JSON file. Unparsable input disables upload.
    pub fn apply_dropbox_oauth(&mut self, value: &str) {
        match DropboxCredentials::from_json_or_path(value) {
            Ok(credentials) => {
                self.dropbox_refresh_token = non_empty(Some(credentials.refresh_token));
                self.dropbox_app_key = non_empty(Some(credentials.app_key));
                self.dropbox_app_secret = non_empty(Some(credentials.app_secret));
            }
            Err(e) => {
                warn!("Invalid Dropbox OAuth configuration ({}). Dropbox upload will be disabled.", e);
                self.dropbox_refresh_token = None;
                self.dropbox_app_key = None;
                self.dropbox_app_secret = None;
            }
        }
    }

    /// Dropbox credentials, if any part of them is configured
    pub fn dropbox_credentials(&self) -> Option<DropboxCredentials> {
        if self.dropbox_refresh_token.is_none() && self.dropbox_app_key.is_none() && self.dropbox_app_secret.is_none() {
            return None;
        }
        Some(DropboxCredentials {
            refresh_token: self.dropbox_refresh_token.clone().unwrap_or_default(),
            app_key: self.dropbox_app_key.clone().unwrap_or_default(),
            app_secret: self.dropbox_app_secret.clone().unwrap_or_default(),
        })
    }
}
