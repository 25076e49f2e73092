//! Dropbox upload via the OAuth2 refresh-token flow

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::ArtifactUploader;
use crate::errors::{AppError, AppResult};

const TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";
const UPLOAD_URL: &str = "https://content.dropboxapi.com/2/files/upload";
const SERVICE: &str = "dropbox";

/// Default access token lifetime when the token endpoint omits `expires_in`
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 14_400;
/// Refresh this long before the reported expiry
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 300;

/// Refresh-token credentials for a Dropbox app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropboxCredentials {
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: String,
    #[serde(default, alias = "appKey")]
    pub app_key: String,
    #[serde(default, alias = "appSecret")]
    pub app_secret: String,
}

impl DropboxCredentials {
    /// Names of the credential fields that are empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("refresh_token", &self.refresh_token),
            ("app_key", &self.app_key),
            ("app_secret", &self.app_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Parse inline JSON or the contents of a JSON file at `value`
    pub fn from_json_or_path(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        if trimmed.starts_with('{') {
            return Ok(serde_json::from_str(trimmed)?);
        }
        let contents = std::fs::read_to_string(trimmed).map_err(|e| AppError::io(trimmed, e))?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

#[derive(Debug, Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
}

/// Remote path for a local file: `destination` with a single leading `/`
/// and no trailing `/`, followed by the file's base name.
pub fn remote_path(destination: &str, local: &Path) -> String {
    let file_name = local
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = destination.trim_end_matches('/');
    let full = format!("{base}/{file_name}");
    if full.starts_with('/') {
        full
    } else {
        format!("/{full}")
    }
}

/// Uploads files into a Dropbox directory, overwriting existing files
pub struct DropboxUploader {
    client: Client,
    credentials: Option<DropboxCredentials>,
    destination: Option<String>,
    token: Mutex<Option<CachedToken>>,
}

impl DropboxUploader {
    pub fn new(
        credentials: Option<DropboxCredentials>,
        destination: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let credentials = match credentials {
            Some(credentials) if !credentials.is_complete() => {
                warn!(
                    "Dropbox OAuth config missing required fields ({}). Dropbox upload will be disabled.",
                    credentials.missing_fields().join(", ")
                );
                None
            }
            other => other,
        };
        let destination = destination.filter(|d| !d.trim().is_empty());

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            credentials,
            destination,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self, credentials: &DropboxCredentials) -> AppResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.access_token.clone());
        }

        debug!("Refreshing Dropbox access token");
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credentials.refresh_token.as_str()),
                ("client_id", credentials.app_key.as_str()),
                ("client_secret", credentials.app_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(
                SERVICE,
                format!("Failed to refresh token: {status} {body}"),
            ));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = token
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        info!("Successfully refreshed Dropbox access token");

        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(token.access_token)
    }
}

#[async_trait]
impl ArtifactUploader for DropboxUploader {
    fn is_available(&self) -> bool {
        self.credentials.is_some() && self.destination.is_some()
    }

    async fn upload(&self, path: &Path) -> AppResult<String> {
        let (Some(credentials), Some(destination)) = (&self.credentials, &self.destination) else {
            return Err(AppError::configuration("Dropbox upload is not configured"));
        };

        let contents = tokio::fs::read(path).await.map_err(|e| AppError::io(path, e))?;
        let remote = remote_path(destination, path);
        let arg = serde_json::to_string(&UploadArg {
            path: &remote,
            mode: "overwrite",
        })?;

        let access_token = self.access_token(credentials).await?;
        info!("Attempting upload: {} -> {}", path.display(), remote);

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(access_token)
            .header("Dropbox-API-Arg", arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(contents)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(
                SERVICE,
                format!("Failed to upload {remote}: {status} {body}"),
            ));
        }

        info!("Successfully uploaded to Dropbox: {}", remote);
        Ok(remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[rstest]
    #[case("/", "/out/guide.xml", "/guide.xml")]
    #[case("/IPTV/", "/out/guide.xml", "/IPTV/guide.xml")]
    #[case("IPTV", "playlist.m3u", "/IPTV/playlist.m3u")]
    #[case("/a/b", "x/y/playlist.m3u", "/a/b/playlist.m3u")]
    fn test_remote_path(#[case] destination: &str, #[case] local: &str, #[case] expected: &str) {
        assert_eq!(remote_path(destination, Path::new(local)), expected);
    }

    #[test]
    fn test_credentials_accept_both_key_styles() {
        let snake = DropboxCredentials::from_json_or_path(
            r#"{"refresh_token": "r", "app_key": "k", "app_secret": "s"}"#,
        )
        .unwrap();
        let camel = DropboxCredentials::from_json_or_path(
            r#"{"refreshToken": "r", "appKey": "k", "appSecret": "s"}"#,
        )
        .unwrap();
        assert_eq!(snake, camel);
        assert!(snake.is_complete());
    }

    #[test]
    fn test_credentials_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"refresh_token": "r", "app_key": "k"}}"#).unwrap();

        let credentials = DropboxCredentials::from_json_or_path(&file.path().display().to_string()).unwrap();
        assert_eq!(credentials.missing_fields(), vec!["app_secret"]);
    }

    #[test]
    fn test_invalid_credentials_json_is_error() {
        assert!(DropboxCredentials::from_json_or_path("{not json").is_err());
        assert!(DropboxCredentials::from_json_or_path("/nonexistent/oauth.json").is_err());
    }

    #[test]
    fn test_availability() {
        let complete = DropboxCredentials {
            refresh_token: "r".into(),
            app_key: "k".into(),
            app_secret: "s".into(),
        };
        let timeout = Duration::from_secs(5);

        let uploader = DropboxUploader::new(Some(complete.clone()), Some("/IPTV".into()), timeout).unwrap();
        assert!(uploader.is_available());

        let no_destination = DropboxUploader::new(Some(complete), Some("  ".into()), timeout).unwrap();
        assert!(!no_destination.is_available());

        let partial = DropboxCredentials {
            app_secret: String::new(),
            ..DropboxCredentials::default()
        };
        let incomplete = DropboxUploader::new(Some(partial), Some("/IPTV".into()), timeout).unwrap();
        assert!(!incomplete.is_available());
    }

    #[tokio::test]
    async fn test_upload_without_configuration_fails() {
        let uploader = DropboxUploader::new(None, None, Duration::from_secs(5)).unwrap();
        let result = uploader.upload(Path::new("/tmp/guide.xml")).await;
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}
