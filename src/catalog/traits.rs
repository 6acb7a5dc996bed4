//! Trait definition for the catalog lookup seam.
//!
//! The resolver depends on [`CatalogApi`] rather than the concrete HTTP
//! client, so tests can substitute mock catalogs with canned responses,
//! failures, or lookups that never complete.

use async_trait::async_trait;

use super::client::ItunesClient;
use super::domain::{CatalogError, SongMatch};

/// Trait for free-text song lookup against a remote catalog.
///
/// Returns zero-or-one best match per term.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search_song(&self, term: &str) -> Result<Option<SongMatch>, CatalogError>;
}

#[async_trait]
impl CatalogApi for ItunesClient {
    async fn search_song(&self, term: &str) -> Result<Option<SongMatch>, CatalogError> {
        self.search_song(term).await
    }
}
