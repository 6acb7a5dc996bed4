//! iTunes Search API Data Transfer Objects
//!
//! These types match EXACTLY what the search API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the catalog module - convert to domain types.
//!
//! API Reference: https://performance-partners.apple.com/search-api
//!
//! Example response:
//! ```json
//! {
//!   "resultCount": 1,
//!   "results": [{
//!     "trackName": "Song Title",
//!     "artistName": "Artist Name",
//!     "collectionName": "Album Title",
//!     "artworkUrl100": "https://.../100x100bb.jpg"
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(rename = "resultCount", default)]
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// A single song result. Every field is optional - the API omits fields
/// freely depending on the media kind.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    #[serde(rename = "trackName")]
    pub track_name: Option<String>,
    #[serde(rename = "artistName")]
    pub artist_name: Option<String>,
    /// Album title (iTunes calls albums "collections")
    #[serde(rename = "collectionName")]
    pub collection_name: Option<String>,
    /// 100x100 artwork thumbnail
    #[serde(rename = "artworkUrl100")]
    pub artwork_url_100: Option<String>,
    /// 60x60 artwork thumbnail, fallback when the larger one is absent
    #[serde(rename = "artworkUrl60")]
    pub artwork_url_60: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
