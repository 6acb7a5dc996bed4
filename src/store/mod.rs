//! Durable song metadata store.
//!
//! A JSON-file-backed table of [`SongRecord`]s keyed by file path
//! (case-insensitive). The whole table lives in memory and is rewritten
//! to disk on every change; a single mutex covers each read-modify-write
//! so no two operations can interleave mid-sequence.
//!
//! Load is corruption-tolerant: a missing backing file is created empty,
//! unreadable content resets the table to empty. Neither case surfaces
//! an error to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;

use crate::model::{SongRecord, same_path};

/// File name of the metadata store in the data directory.
pub const STORE_FILE: &str = "songdata.json";

/// Store errors. Only write-path failures surface; load problems are
/// absorbed by resetting to an empty table.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to create data directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to write store to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

/// File-backed metadata table.
pub struct SongStore {
    path: PathBuf,
    items: Mutex<Vec<SongRecord>>,
}

impl SongStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = load_or_create(&path);
        Self {
            path,
            items: Mutex::new(items),
        }
    }

    /// Open the store in the platform data directory
    /// (e.g. `~/.local/share/tunedeck/songdata.json`).
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = crate::config::data_dir().ok_or(StoreError::NoDataDir)?;
        fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDir(dir.clone(), e))?;
        Ok(Self::open(dir.join(STORE_FILE)))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch the record for a file path, matching case-insensitively.
    pub fn get_by_path(&self, file_path: &str) -> Option<SongRecord> {
        let items = self.items.lock();
        items
            .iter()
            .find(|r| same_path(&r.file_path, file_path))
            .cloned()
    }

    /// Insert or replace the record for its path and persist the table.
    ///
    /// Replacement is whole-record: fields cleared in `record` are cleared
    /// in the store. The record's `last_updated_utc` is refreshed before
    /// writing; the stored copy is returned.
    pub fn upsert(&self, mut record: SongRecord) -> Result<SongRecord, StoreError> {
        let mut items = self.items.lock();
        record.last_updated_utc = Utc::now();
        match items
            .iter()
            .position(|r| same_path(&r.file_path, &record.file_path))
        {
            Some(idx) => items[idx] = record.clone(),
            None => items.push(record.clone()),
        }
        save_locked(&self.path, &items)?;
        Ok(record)
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read the backing file, creating an empty one when missing and
/// resetting on unparseable content.
fn load_or_create(path: &Path) -> Vec<SongRecord> {
    if !path.exists() {
        let empty = Vec::new();
        if let Err(e) = save_locked(path, &empty) {
            tracing::warn!("Could not create store file {:?}: {}", path, e);
        }
        return empty;
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Corrupt store file {:?}, resetting: {}", path, e);
                let empty = Vec::new();
                if let Err(e) = save_locked(path, &empty) {
                    tracing::warn!("Could not rewrite store file {:?}: {}", path, e);
                }
                empty
            }
        },
        Err(e) => {
            tracing::warn!("Could not read store file {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Serialize the full table and replace the backing file.
///
/// Callers must hold the items lock (or own the only reference).
fn save_locked(path: &Path, items: &[SongRecord]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(items)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir(parent.to_path_buf(), e))?;
    }

    // Write to temp, then rename
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json).map_err(|e| StoreError::Write(temp_path.clone(), e))?;
    fs::rename(&temp_path, path)
        .map_err(|e| StoreError::Rename(temp_path, path.to_path_buf(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SongStore {
        SongStore::open(dir.path().join(STORE_FILE))
    }

    #[test]
    fn test_missing_file_creates_empty_table() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(store.is_empty());
        // the empty file is written immediately
        assert!(store.path().exists());
    }

    #[test]
    fn test_upsert_then_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let mut record = SongRecord::new("/music/a.mp3");
        record.track_name = Some("X".to_string());
        record.artist_name = Some("Y".to_string());
        let before = record.last_updated_utc;

        let stored = store.upsert(record.clone()).unwrap();
        assert!(stored.last_updated_utc >= before);

        let fetched = store.get_by_path("/music/a.mp3").unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(fetched.track_name.as_deref(), Some("X"));
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.upsert(SongRecord::new("C:/Music/Song.MP3")).unwrap();

        assert!(store.get_by_path("c:/music/song.mp3").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_upsert_is_whole_record_replace() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let mut record = SongRecord::new("/music/a.mp3");
        record.artist_name = Some("Artist".to_string());
        record.album_name = Some("Album".to_string());
        store.upsert(record).unwrap();

        // Second upsert with artist cleared must clear it in the store
        let mut replacement = SongRecord::new("/music/A.MP3");
        replacement.album_name = Some("Other".to_string());
        store.upsert(replacement).unwrap();

        let fetched = store.get_by_path("/music/a.mp3").unwrap();
        assert!(fetched.artist_name.is_none());
        assert_eq!(fetched.album_name.as_deref(), Some("Other"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILE);

        {
            let store = SongStore::open(&path);
            let mut record = SongRecord::new("/music/a.mp3");
            record.custom_title = Some("Mine".to_string());
            record.user_images.push(PathBuf::from("/img/x.png"));
            store.upsert(record).unwrap();
        }

        let reopened = SongStore::open(&path);
        let fetched = reopened.get_by_path("/music/a.mp3").unwrap();
        assert_eq!(fetched.custom_title.as_deref(), Some("Mine"));
        assert_eq!(fetched.user_images, vec![PathBuf::from("/img/x.png")]);
    }

    #[test]
    fn test_corrupt_file_resets_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILE);
        fs::write(&path, "{ not json at all").unwrap();

        let store = SongStore::open(&path);
        assert!(store.is_empty());

        // the reset table was rewritten, so a reopen stays clean
        let contents = fs::read_to_string(&path).unwrap();
        let parsed: Vec<SongRecord> = serde_json::from_str(&contents).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_backing_file_is_pretty_printed() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.upsert(SongRecord::new("/music/a.mp3")).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains('\n'));
        assert!(contents.contains("\"FilePath\""));
    }

    #[test]
    fn test_concurrent_upserts_serialize() {
        let temp = TempDir::new().unwrap();
        let store = std::sync::Arc::new(store_in(&temp));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    let mut record = SongRecord::new(format!("/music/{i}.mp3"));
                    record.track_name = Some(format!("Track {i}"));
                    store.upsert(record).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        // reload from disk: last write carried the full table
        let reopened = SongStore::open(store.path());
        assert_eq!(reopened.len(), 8);
    }
}
