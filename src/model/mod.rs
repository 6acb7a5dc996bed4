//! Core data models for the player.
//!
//! Defines the two persisted entities: [`TrackRef`] (an entry in the
//! playback library) and [`SongRecord`] (cached metadata for one audio
//! file, keyed by path). Field names serialize in PascalCase to stay
//! compatible with the existing `library.json` / `songdata.json` layout.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display placeholder for absent metadata fields.
pub const PLACEHOLDER: &str = "-";

/// An entry in the playback library: a display title plus the file it
/// refers to. Identity for cache purposes is the file path
/// (case-insensitive); the library itself allows duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrackRef {
    pub title: String,
    pub file_path: String,
}

impl TrackRef {
    /// Build a track reference from a file path, deriving the title from
    /// the file stem.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            title: local_title(&path.to_string_lossy()),
            file_path: path.to_string_lossy().into_owned(),
        }
    }
}

/// Cached metadata for a single audio file.
///
/// The four remote fields (`track_name`, `artist_name`, `album_name`,
/// `artwork_url`) come from catalog lookups; `custom_title` and
/// `user_images` are user edits and survive lookup merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SongRecord {
    pub file_path: String,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub artwork_url: Option<String>,
    pub custom_title: Option<String>,
    #[serde(default)]
    pub user_images: Vec<PathBuf>,
    pub last_updated_utc: DateTime<Utc>,
}

impl SongRecord {
    /// A blank record for a path, carrying no metadata yet.
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            track_name: None,
            artist_name: None,
            album_name: None,
            artwork_url: None,
            custom_title: None,
            user_images: Vec::new(),
            last_updated_utc: Utc::now(),
        }
    }

    /// Cache-hit rule: a record counts as carrying metadata only if at
    /// least one display field is present and non-blank. A physically
    /// present but all-blank record is treated the same as no record.
    pub fn has_metadata(&self) -> bool {
        [
            &self.custom_title,
            &self.track_name,
            &self.artist_name,
            &self.album_name,
            &self.artwork_url,
        ]
        .into_iter()
        .any(|f| non_blank(f).is_some())
    }

    /// Display title priority: user override > catalog name > local fallback.
    pub fn display_title(&self, fallback: &str) -> String {
        non_blank(&self.custom_title)
            .or_else(|| non_blank(&self.track_name))
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Trimmed, non-empty view of an optional string field.
pub fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Case-insensitive file path identity, matching how the store keys records.
pub fn same_path(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Title derived from the file name with the extension stripped.
pub fn local_title(file_path: &str) -> String {
    Path::new(file_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_blank_record_is_a_miss() {
        let record = SongRecord::new("/music/a.mp3");
        assert!(!record.has_metadata());

        let mut spaces = SongRecord::new("/music/a.mp3");
        spaces.artist_name = Some("   ".to_string());
        assert!(!spaces.has_metadata());
    }

    #[test]
    fn test_single_field_makes_a_hit() {
        let mut record = SongRecord::new("/music/a.mp3");
        record.track_name = Some("Song".to_string());
        assert!(record.has_metadata());
    }

    #[test]
    fn test_display_title_priority() {
        let mut record = SongRecord::new("/music/a.mp3");
        assert_eq!(record.display_title("a"), "a");

        record.track_name = Some("Catalog Name".to_string());
        assert_eq!(record.display_title("a"), "Catalog Name");

        record.custom_title = Some("My Name".to_string());
        assert_eq!(record.display_title("a"), "My Name");
    }

    #[test]
    fn test_local_title_strips_extension() {
        assert_eq!(local_title("/music/My Song.mp3"), "My Song");
        assert_eq!(local_title("no_extension"), "no_extension");
    }

    #[test]
    fn test_same_path_ignores_case() {
        assert!(same_path("C:/Music/Song.MP3", "c:/music/song.mp3"));
        assert!(!same_path("/a.mp3", "/b.mp3"));
    }

    #[test]
    fn test_track_ref_from_path() {
        let track = TrackRef::from_path("/music/Best Song.mp3");
        assert_eq!(track.title, "Best Song");
        assert_eq!(track.file_path, "/music/Best Song.mp3");
    }

    #[test]
    fn test_record_serializes_pascal_case() {
        let mut record = SongRecord::new("/music/a.mp3");
        record.track_name = Some("X".to_string());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"FilePath\""));
        assert!(json.contains("\"TrackName\""));
        assert!(json.contains("\"LastUpdatedUtc\""));
    }
}
