//! Test utilities and fixtures for tunedeck tests.
//!
//! Common helpers to reduce boilerplate: temporary stores and files,
//! pre-filled records.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use crate::model::SongRecord;
use crate::store::{STORE_FILE, SongStore};

/// Creates a store backed by a temporary directory.
///
/// Keep the returned `TempDir` alive for the duration of the test; the
/// backing file is deleted when it drops.
pub fn temp_store() -> (Arc<SongStore>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let store = SongStore::open(dir.path().join(STORE_FILE));
    (Arc::new(store), dir)
}

/// Create an empty file in the temp directory and return its path.
pub fn touch(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"stub").expect("Failed to create test file");
    path
}

/// A record with all four lookup fields filled in.
pub fn mock_record(file_path: &str) -> SongRecord {
    let mut record = SongRecord::new(file_path);
    record.track_name = Some("Test Track".to_string());
    record.artist_name = Some("Test Artist".to_string());
    record.album_name = Some("Test Album".to_string());
    record.artwork_url = Some("http://art.example/cover.jpg".to_string());
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_store_is_isolated() {
        let (store, _dir) = temp_store();
        assert!(store.is_empty());
        store.upsert(mock_record("/music/a.mp3")).unwrap();
        assert_eq!(store.len(), 1);

        let (other, _dir2) = temp_store();
        assert!(other.is_empty());
    }

    #[test]
    fn test_mock_record_is_a_cache_hit() {
        let record = mock_record("/music/a.mp3");
        assert!(record.has_metadata());
        assert_eq!(record.track_name.as_deref(), Some("Test Track"));
    }
}
