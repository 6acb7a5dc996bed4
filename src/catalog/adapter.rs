//! Adapter layer: Convert iTunes Search DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If the search API changes its response format, only this file and
//! dto.rs need to change.

use super::domain::SongMatch;
use super::dto;

/// Convert a search response to the best match, if any.
///
/// The client requests `limit=1`, so the first result IS the best match
/// by the catalog's own ranking; extra results are ignored.
pub fn to_match(response: dto::SearchResponse) -> Option<SongMatch> {
    response.results.into_iter().next().map(|r| SongMatch {
        track_name: r.track_name,
        artist_name: r.artist_name,
        album_name: r.collection_name,
        artwork_url: r.artwork_url_100.or(r.artwork_url_60),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(track: Option<&str>) -> dto::SearchResult {
        dto::SearchResult {
            track_name: track.map(String::from),
            artist_name: None,
            collection_name: None,
            artwork_url_100: None,
            artwork_url_60: None,
        }
    }

    #[test]
    fn test_empty_response_is_no_match() {
        let response = dto::SearchResponse {
            result_count: 0,
            results: vec![],
        };
        assert!(to_match(response).is_none());
    }

    #[test]
    fn test_first_result_wins() {
        let response = dto::SearchResponse {
            result_count: 2,
            results: vec![make_result(Some("First")), make_result(Some("Second"))],
        };
        let matched = to_match(response).unwrap();
        assert_eq!(matched.track_name.as_deref(), Some("First"));
    }

    #[test]
    fn test_collection_maps_to_album() {
        let mut result = make_result(Some("Song"));
        result.collection_name = Some("Album".to_string());
        let response = dto::SearchResponse {
            result_count: 1,
            results: vec![result],
        };
        let matched = to_match(response).unwrap();
        assert_eq!(matched.album_name.as_deref(), Some("Album"));
    }

    #[test]
    fn test_artwork_falls_back_to_small_thumbnail() {
        let mut result = make_result(Some("Song"));
        result.artwork_url_60 = Some("https://example.com/60.jpg".to_string());
        let response = dto::SearchResponse {
            result_count: 1,
            results: vec![result],
        };
        let matched = to_match(response).unwrap();
        assert_eq!(
            matched.artwork_url.as_deref(),
            Some("https://example.com/60.jpg")
        );
    }
}
