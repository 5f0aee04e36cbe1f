//! iTunes Search API Data Transfer Objects
//!
//! API Reference: https://performance-partners.apple.com/search-api
//!
//! Only the fields needed to build a [`Candidate`](super::Candidate) are
//! modelled; everything else in the response is ignored.

use serde::{Deserialize, Serialize};

/// Top-level search response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Number of results returned
    #[serde(default)]
    pub result_count: u32,
    /// Ranked results
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// A single album (collection) result
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Artist display name
    #[serde(default)]
    pub artist_name: Option<String>,
    /// Album title
    #[serde(default)]
    pub collection_name: Option<String>,
    /// 100x100 artwork URL; resized by rewriting its dimension token
    #[serde(default)]
    pub artwork_url100: Option<String>,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "resultCount": 1,
            "results": [{
                "wrapperType": "collection",
                "collectionType": "Album",
                "artistId": 136975,
                "collectionId": 1441164426,
                "artistName": "The Beatles",
                "collectionName": "Abbey Road (Remastered)",
                "artworkUrl60": "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/abc/source/60x60bb.jpg",
                "artworkUrl100": "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/abc/source/100x100bb.jpg",
                "collectionPrice": 12.99,
                "trackCount": 17,
                "country": "USA",
                "primaryGenreName": "Rock"
            }]
        }"#;

        let response: SearchResponse =
            serde_json::from_str(json).expect("Should parse search response");

        assert_eq!(response.result_count, 1);
        assert_eq!(response.results.len(), 1);
        let result = &response.results[0];
        assert_eq!(result.artist_name.as_deref(), Some("The Beatles"));
        assert_eq!(
            result.collection_name.as_deref(),
            Some("Abbey Road (Remastered)")
        );
        assert!(result.artwork_url100.as_deref().unwrap().ends_with("100x100bb.jpg"));
    }

    #[test]
    fn test_parse_empty_response() {
        let json = r#"{"resultCount": 0, "results": []}"#;
        let response: SearchResponse =
            serde_json::from_str(json).expect("Should parse empty response");
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_parse_result_without_artwork() {
        let json = r#"{
            "resultCount": 1,
            "results": [{"artistName": "Someone", "collectionName": "Something"}]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.results[0].artwork_url100.is_none());
    }
}
