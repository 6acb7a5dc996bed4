//! Metadata editor surface.
//!
//! An [`EditorSession`] is an editable snapshot of one track's stored
//! record: the user can override the display title and curate a list of
//! cover images, then save the whole thing back in one upsert. Display
//! values come from the cache only - the editor never calls the catalog.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::model::{PLACEHOLDER, SongRecord, TrackRef, non_blank};
use crate::store::{SongStore, StoreError};

/// What the editor preview should show, cache-only.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCover {
    /// First user image whose file exists.
    UserImage(PathBuf),
    /// Artwork URL cached from an earlier lookup.
    CachedArtwork(String),
    /// The default cover.
    Default,
}

/// Editable snapshot of a track's metadata record.
pub struct EditorSession {
    store: Arc<SongStore>,
    track: TrackRef,
    record: SongRecord,
}

impl EditorSession {
    /// Open an editor over the stored record for a track, or a blank
    /// record when none exists yet.
    pub fn open(store: Arc<SongStore>, track: TrackRef) -> Self {
        let record = store
            .get_by_path(&track.file_path)
            .unwrap_or_else(|| SongRecord::new(track.file_path.clone()));
        Self {
            store,
            track,
            record,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.track.file_path
    }

    // Read-only metadata from the cache
    pub fn track_name(&self) -> &str {
        non_blank(&self.record.track_name).unwrap_or(PLACEHOLDER)
    }

    pub fn artist_name(&self) -> &str {
        non_blank(&self.record.artist_name).unwrap_or(PLACEHOLDER)
    }

    pub fn album_name(&self) -> &str {
        non_blank(&self.record.album_name).unwrap_or(PLACEHOLDER)
    }

    pub fn custom_title(&self) -> &str {
        self.record.custom_title.as_deref().unwrap_or("")
    }

    /// Set the user's title override. Blank input clears the override.
    pub fn set_custom_title(&mut self, value: &str) {
        let trimmed = value.trim();
        self.record.custom_title = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn user_images(&self) -> &[PathBuf] {
        &self.record.user_images
    }

    /// Add a cover image. Missing files and duplicates are skipped;
    /// returns whether the image was added.
    pub fn add_user_image(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if !path.exists() || self.record.user_images.contains(&path) {
            return false;
        }
        self.record.user_images.push(path);
        true
    }

    /// Remove a cover image; returns whether anything was removed.
    pub fn remove_user_image(&mut self, path: &Path) -> bool {
        let before = self.record.user_images.len();
        self.record.user_images.retain(|p| p != path);
        self.record.user_images.len() != before
    }

    /// What the editor preview shows: first existing user image, else the
    /// cached artwork URL, else the default cover.
    pub fn cover(&self) -> EditorCover {
        for image in &self.record.user_images {
            if image.exists() {
                return EditorCover::UserImage(image.clone());
            }
        }
        if let Some(url) = non_blank(&self.record.artwork_url) {
            return EditorCover::CachedArtwork(url.to_string());
        }
        EditorCover::Default
    }

    /// Persist the working copy as a whole-record upsert.
    pub fn save(&mut self) -> Result<SongRecord, StoreError> {
        self.record.file_path = self.track.file_path.clone();
        let stored = self.store.upsert(self.record.clone())?;
        self.record = stored.clone();
        Ok(stored)
    }
}
