use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::utils::decompression::{CompressionFormat, DecompressionService};
use crate::utils::encoding::{charset_from_content_type, decode_text};
use crate::utils::url::UrlUtils;

pub const USER_AGENT: &str = concat!("IPTVLogoUpdater/", env!("CARGO_PKG_VERSION"));

/// Retrieves guide and playlist text from a URL or a local path
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch `location` as text. `http(s)://` locations are downloaded,
    /// anything else is read from disk.
    async fn fetch_text(&self, location: &str) -> AppResult<String>;
}

/// Default fetcher backed by reqwest
pub struct StandardContentFetcher {
    client: Client,
}

impl StandardContentFetcher {
    /// Create a fetcher whose requests time out after `timeout`
    pub fn with_timeout(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Decompress if needed, then decode using the declared charset when the
    /// content is not UTF-8
    fn decode_body(bytes: &[u8], declared_charset: Option<&str>) -> AppResult<String> {
        let format = DecompressionService::detect_compression_format(bytes);
        debug!("Detected compression format: {:?}", format);

        let text = match format {
            CompressionFormat::Uncompressed => decode_text(bytes, declared_charset).into_owned(),
            _ => {
                let decompressed = DecompressionService::decompress(bytes)?;
                decode_text(&decompressed, declared_charset).into_owned()
            }
        };
        Ok(text)
    }

    async fn fetch_remote(&self, url: &str) -> AppResult<String> {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        info!("Downloading content from: {}", safe_url);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::external_service("http_client", UrlUtils::obfuscate_credentials(&e.to_string()))
        })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                "http_client",
                format!(
                    "HTTP error: {} {} - URL: {}",
                    response.status().as_u16(),
                    response.status().canonical_reason().unwrap_or("Unknown"),
                    safe_url
                ),
            ));
        }

        let charset = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type)
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(|e| {
            AppError::external_service(
                "http_client",
                format!("Failed to read response: {}", UrlUtils::obfuscate_credentials(&e.to_string())),
            )
        })?;
        debug!("Fetched {} bytes of raw content", bytes.len());

        let text = Self::decode_body(&bytes, charset.as_deref())?;
        info!("Successfully downloaded {} characters from {}", text.len(), safe_url);
        Ok(text)
    }

    async fn read_local(path: &str) -> AppResult<String> {
        info!("Reading local file: {}", path);
        let bytes = tokio::fs::read(path).await.map_err(|e| AppError::io(path, e))?;
        Self::decode_body(&bytes, None)
    }
}

#[async_trait]
impl ContentFetcher for StandardContentFetcher {
    async fn fetch_text(&self, location: &str) -> AppResult<String> {
        if UrlUtils::is_remote(location) {
            self.fetch_remote(location.trim()).await
        } else {
            Self::read_local(location).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_non_utf8_without_charset_decodes_as_windows_1252() {
        let text = StandardContentFetcher::decode_body(b"BBC \xff One", None).unwrap();
        assert_eq!(text, "BBC \u{ff} One");
    }

    #[test]
    fn test_header_charset_is_applied() {
        let text = StandardContentFetcher::decode_body(b"T\xe9l\xe9 5", Some("ISO-8859-1")).unwrap();
        assert_eq!(text, "T\u{e9}l\u{e9} 5");
    }

    #[tokio::test]
    async fn test_latin1_guide_keeps_accented_names() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<tv><channel id=\"t5\"><display-name>T\xe9l\xe9 5</display-name></channel></tv>",
        )
        .unwrap();

        let fetcher = StandardContentFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        let text = fetcher.fetch_text(&file.path().display().to_string()).await.unwrap();
        assert!(text.contains("<display-name>T\u{e9}l\u{e9} 5</display-name>"));
        assert!(!text.contains('\u{fffd}'));
    }

    #[tokio::test]
    async fn test_local_file_is_read() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "#EXTM3U\n").unwrap();

        let fetcher = StandardContentFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        let text = fetcher.fetch_text(&file.path().display().to_string()).await.unwrap();
        assert_eq!(text, "#EXTM3U\n");
    }

    #[tokio::test]
    async fn test_missing_local_file_is_io_error() {
        let fetcher = StandardContentFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        let result = fetcher.fetch_text("/nonexistent/playlist.m3u").await;
        assert!(matches!(result, Err(AppError::Io { .. })));
    }
}
