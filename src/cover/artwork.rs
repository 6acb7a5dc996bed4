//! Artwork materialization - fetches a cover image from a cached URL.
//!
//! Downloads the bytes and decodes them once to confirm they really are
//! an image; anything that fails either step falls back to the default
//! cover upstream.

/// A downloaded, decodable cover image.
#[derive(Debug, Clone)]
pub struct CoverImage {
    /// Image data (JPEG or PNG)
    pub data: Vec<u8>,
    /// MIME type reported by the server
    pub mime_type: String,
    /// Source URL
    pub url: String,
}

/// Errors from artwork materialization.
#[derive(Debug, thiserror::Error)]
pub enum ArtworkError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not a decodable image: {0}")]
    Decode(String),
}

/// Fetches cover images over HTTP.
pub struct ArtworkFetcher {
    http_client: reqwest::Client,
}

impl ArtworkFetcher {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    /// Download an image from a URL and verify it decodes.
    pub async fn fetch(&self, url: &str) -> Result<CoverImage, ArtworkError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ArtworkError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtworkError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let data = response
            .bytes()
            .await
            .map_err(|e| ArtworkError::Network(e.to_string()))?
            .to_vec();

        // Confirm the payload decodes before handing it to the UI
        image::load_from_memory(&data).map_err(|e| ArtworkError::Decode(e.to_string()))?;

        Ok(CoverImage {
            data,
            mime_type,
            url: url.to_string(),
        })
    }
}

impl Default for ArtworkFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_url_is_a_network_error() {
        let fetcher = ArtworkFetcher::new();
        // Port 0 is never listening
        let result = fetcher.fetch("http://127.0.0.1:0/cover.jpg").await;
        assert!(matches!(result, Err(ArtworkError::Network(_))));
    }
}
