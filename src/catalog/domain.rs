//! Internal domain models for catalog lookups.
//!
//! These types are OUR types - they don't change when the catalog API
//! changes. API responses get converted into them via the adapter.

/// The best match a catalog lookup produced for a search term.
///
/// Ephemeral: consumed once by the resolver and merged into a
/// [`crate::model::SongRecord`], never persisted as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongMatch {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub artwork_url: Option<String>,
}

/// Errors that can occur during a catalog lookup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Catalog request failed: {0}")]
    Api(String),

    #[error("Rate limited - try again later")]
    RateLimited,
}
