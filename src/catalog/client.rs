//! iTunes Search API HTTP client
//!
//! Handles communication with the search endpoint. No API key is
//! required, but the service rate-limits aggressively (~20 calls/min),
//! which is one reason lookups are cached in the store.

use super::domain::{CatalogError, SongMatch};
use super::{adapter, dto};

/// User agent sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Search API client
pub struct ItunesClient {
    http_client: reqwest::Client,
    base_url: String,
    country: Option<String>,
}

impl ItunesClient {
    /// Create a new client against the public endpoint.
    pub fn new() -> Self {
        Self::with_base_url("https://itunes.apple.com")
    }

    /// Create a client with a custom base URL (config override, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            country: None,
        }
    }

    /// Restrict results to a storefront country (ISO 3166-1 alpha-2).
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Look up a free-text search term and return the best song match,
    /// or `None` when the catalog has nothing for it.
    pub async fn search_song(&self, term: &str) -> Result<Option<SongMatch>, CatalogError> {
        let response = self.send_search_request(term).await?;
        Ok(adapter::to_match(response))
    }

    /// Send the HTTP request and parse the response
    async fn send_search_request(&self, term: &str) -> Result<dto::SearchResponse, CatalogError> {
        let mut url = format!(
            "{}/search?term={}&media=music&entity=song&limit=1",
            self.base_url,
            urlencoding::encode(term)
        );
        if let Some(ref country) = self.country {
            url.push_str("&country=");
            url.push_str(&urlencoding::encode(country));
        }

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        // The endpoint answers rate limiting with 403 as often as 429
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CatalogError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(format!(
                "HTTP {}: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown"),
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new()
    }
}
