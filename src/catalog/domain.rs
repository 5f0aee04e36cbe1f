//! Catalog domain types.
//!
//! Provider DTOs are converted into these before leaving the catalog module.

/// One ranked search result.
///
/// The thumbnail URL is the identity of a candidate: it is the key used by the
/// thumbnail cache and the source of the full-resolution download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Artist name as reported by the provider
    pub artist: String,
    /// Release title
    pub title: String,
    /// Display-size artwork URL
    pub thumbnail_url: String,
}

impl Candidate {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
        }
    }
}

/// Errors from a catalog search
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Artwork provider unavailable: {0}")]
    ProviderUnavailable(String),
}
