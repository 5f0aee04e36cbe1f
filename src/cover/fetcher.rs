//! Full-resolution artwork download.
//!
//! The catalog hands out display-size URLs. The download URL is derived from
//! it by rewriting the embedded dimension token, no second search needed.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::ProviderConfig;

/// Download failures. Empty bodies count as failures too.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),
}

/// Something that can fetch image bytes by URL.
///
/// Used for both thumbnails and full-resolution artwork.
#[async_trait]
pub trait ArtworkSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Rewrite a display-size artwork URL to its download-size rendition.
///
/// `.../250x250bb.jpg` becomes `.../1000x1000bb.jpg`. URLs without the
/// token are returned as-is.
pub fn download_url(thumbnail_url: &str, display_size: u32, download_size: u32) -> String {
    let from = format!("{0}x{0}bb", display_size);
    let to = format!("{0}x{0}bb", download_size);
    thumbnail_url.replace(&from, &to)
}

/// HTTP artwork downloader
#[derive(Clone)]
pub struct ArtworkFetcher {
    http_client: reqwest::Client,
}

impl ArtworkFetcher {
    pub fn new() -> Self {
        Self::from_config(&ProviderConfig::default())
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("coverpick/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });
        Self { http_client }
    }

    /// Download an image from a URL
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::DownloadFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::DownloadFailed(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| FetchError::DownloadFailed(e.to_string()))?
            .to_vec();

        if data.is_empty() {
            return Err(FetchError::DownloadFailed(format!("empty response from {}", url)));
        }

        tracing::debug!(url, bytes = data.len(), "Downloaded artwork");
        Ok(data)
    }
}

impl Default for ArtworkFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtworkSource for ArtworkFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetch(url).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_rewrites_dimensions() {
        let url = "https://is1-ssl.mzstatic.com/image/thumb/Music/x/source/250x250bb.jpg";
        assert_eq!(
            download_url(url, 250, 1000),
            "https://is1-ssl.mzstatic.com/image/thumb/Music/x/source/1000x1000bb.jpg"
        );
    }

    #[test]
    fn test_download_url_without_token_unchanged() {
        let url = "https://example.com/cover.jpg";
        assert_eq!(download_url(url, 250, 1000), url);
    }

    #[test]
    fn test_download_url_other_display_size() {
        let url = "https://example.com/art/100x100bb.jpg";
        assert_eq!(download_url(url, 250, 1000), url);
        assert_eq!(download_url(url, 100, 600), "https://example.com/art/600x600bb.jpg");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_download_failure() {
        let fetcher = ArtworkFetcher::new();
        let result = fetcher.fetch("http://127.0.0.1:9/250x250bb.jpg").await;
        assert!(matches!(result, Err(FetchError::DownloadFailed(_))));
    }
}
