//! Trait seam for the catalog provider.
//!
//! Production code uses [`ItunesClient`](super::ItunesClient); tests
//! substitute the mocks below.

use async_trait::async_trait;

use super::domain::{Candidate, CatalogError};

/// Trait for an artwork catalog search.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Search for albums matching a query.
    async fn search(
        &self,
        query: &str,
        dimensions: (u32, u32),
    ) -> Result<Vec<Candidate>, CatalogError>;
}

#[async_trait]
impl CatalogApi for super::ItunesClient {
    async fn search(
        &self,
        query: &str,
        dimensions: (u32, u32),
    ) -> Result<Vec<Candidate>, CatalogError> {
        self.search(query, dimensions).await
    }
}

/// Mock catalog for testing.
#[cfg(test)]
pub mod mocks {
    use super::*;

    /// Mock catalog that returns predefined results.
    pub struct MockCatalog {
        /// Results to return from search
        pub results: Vec<Candidate>,
        /// Error to return (takes precedence over results)
        pub error: Option<CatalogError>,
    }

    impl MockCatalog {
        /// Create a mock that returns no matches.
        pub fn no_matches() -> Self {
            Self {
                results: vec![],
                error: None,
            }
        }

        /// Create a mock that returns the given candidates.
        pub fn with_results(results: Vec<Candidate>) -> Self {
            Self {
                results,
                error: None,
            }
        }

        /// Create a mock that returns an error.
        pub fn with_error(error: CatalogError) -> Self {
            Self {
                results: vec![],
                error: Some(error),
            }
        }
    }

    #[async_trait]
    impl CatalogApi for MockCatalog {
        async fn search(
            &self,
            query: &str,
            _dimensions: (u32, u32),
        ) -> Result<Vec<Candidate>, CatalogError> {
            if query.trim().is_empty() {
                return Err(CatalogError::EmptyQuery);
            }
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            Ok(self.results.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_no_matches() {
            let mock = MockCatalog::no_matches();
            let results = mock.search("anything", (250, 250)).await.unwrap();
            assert!(results.is_empty());
        }

        #[tokio::test]
        async fn test_mock_error() {
            let mock =
                MockCatalog::with_error(CatalogError::ProviderUnavailable("down".to_string()));
            let result = mock.search("anything", (250, 250)).await;
            assert!(matches!(result, Err(CatalogError::ProviderUnavailable(_))));
        }
    }
}
