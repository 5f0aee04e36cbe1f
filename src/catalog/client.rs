//! iTunes Search API HTTP client
//!
//! Searches the store's album catalog and returns ranked candidates.
//! No API key required; Apple asks for roughly 20 calls per minute at most.
//!
//! API: https://itunes.apple.com/search

use std::time::Duration;

use super::domain::{Candidate, CatalogError};
use super::dto;
use crate::config::ProviderConfig;

/// Dimension token present in every `artworkUrl100`
const SOURCE_ARTWORK_TOKEN: &str = "100x100bb";

/// iTunes Search API client
pub struct ItunesClient {
    http_client: reqwest::Client,
    base_url: String,
    country: String,
    limit: u32,
}

impl ItunesClient {
    /// Create a client with the default provider settings
    pub fn new() -> Self {
        Self::from_config(&ProviderConfig::default())
    }

    /// Create a client from the provider section of the config file
    pub fn from_config(config: &ProviderConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("coverpick/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });

        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country: config.country.clone(),
            limit: config.limit,
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            country: "US".to_string(),
            limit: 50,
        }
    }

    /// Build the search URL for a query
    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?term={}&media=music&entity=album&limit={}&country={}",
            self.base_url,
            urlencoding::encode(query.trim()),
            self.limit,
            urlencoding::encode(&self.country),
        )
    }

    /// Search the album catalog.
    ///
    /// `dimensions` is the display size the returned thumbnail URLs should
    /// point at.
    pub async fn search(
        &self,
        query: &str,
        dimensions: (u32, u32),
    ) -> Result<Vec<Candidate>, CatalogError> {
        if query.trim().is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        let url = self.search_url(query);
        tracing::debug!(%url, "Catalog search");

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            return Err(CatalogError::ProviderUnavailable(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| CatalogError::ProviderUnavailable(e.to_string()))?;

        let candidates = to_candidates(body, dimensions);
        tracing::info!(query = query.trim(), count = candidates.len(), "Catalog search complete");
        Ok(candidates)
    }
}

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a search response into candidates, keeping provider order.
///
/// Results without artwork are skipped.
pub(crate) fn to_candidates(response: dto::SearchResponse, dimensions: (u32, u32)) -> Vec<Candidate> {
    response
        .results
        .into_iter()
        .filter_map(|result| {
            let artwork = result.artwork_url100?;
            Some(Candidate {
                artist: result.artist_name.unwrap_or_default(),
                title: result.collection_name.unwrap_or_default(),
                thumbnail_url: resize_artwork_url(&artwork, dimensions),
            })
        })
        .collect()
}

/// Point an `artworkUrl100` at another rendition size
pub fn resize_artwork_url(url: &str, (width, height): (u32, u32)) -> String {
    url.replace(SOURCE_ARTWORK_TOKEN, &format!("{}x{}bb", width, height))
}
