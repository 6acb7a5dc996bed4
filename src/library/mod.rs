//! The playback library - an ordered list of tracks.
//!
//! Persisted as JSON (`library.json` in the data directory), read fully
//! on startup and rewritten fully on every add/remove. Order is
//! insertion order; duplicates by path are allowed - library identity is
//! positional, distinct from the store's path-keyed identity.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{TrackRef, same_path};

/// File name of the library list in the data directory.
pub const LIBRARY_FILE: &str = "library.json";

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to serialize library: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to create data directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to write library to {0}: {1}")]
    Write(PathBuf, std::io::Error),
}

/// Ordered, file-backed track list.
pub struct Library {
    path: PathBuf,
    tracks: Vec<TrackRef>,
}

impl Library {
    /// Open (or start) a library at the given path. A missing file means
    /// an empty library; unreadable content resets to empty with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tracks = load(&path);
        Self { path, tracks }
    }

    /// Open the library in the platform data directory.
    pub fn open_default() -> Result<Self, LibraryError> {
        let dir = crate::config::data_dir().ok_or(LibraryError::NoDataDir)?;
        fs::create_dir_all(&dir).map_err(|e| LibraryError::CreateDir(dir.clone(), e))?;
        Ok(Self::open(dir.join(LIBRARY_FILE)))
    }

    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&TrackRef> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Append a track for a file, deriving the title from the file stem,
    /// and persist the whole list.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<TrackRef, LibraryError> {
        let track = TrackRef::from_path(path);
        self.tracks.push(track.clone());
        self.save()?;
        Ok(track)
    }

    /// Append several tracks, persisting once at the end.
    pub fn add_paths(
        &mut self,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> Result<Vec<TrackRef>, LibraryError> {
        let added: Vec<TrackRef> = paths.into_iter().map(TrackRef::from_path).collect();
        self.tracks.extend(added.iter().cloned());
        self.save()?;
        Ok(added)
    }

    /// Remove the track at `index` and persist.
    pub fn remove(&mut self, index: usize) -> Result<Option<TrackRef>, LibraryError> {
        if index >= self.tracks.len() {
            return Ok(None);
        }
        let removed = self.tracks.remove(index);
        self.save()?;
        Ok(Some(removed))
    }

    /// Remove the first entry equal to `track` and persist.
    /// Returns whether anything was removed.
    pub fn remove_track(&mut self, track: &TrackRef) -> Result<bool, LibraryError> {
        match self.tracks.iter().position(|t| t == track) {
            Some(idx) => {
                self.tracks.remove(idx);
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the first entry for a file path (case-insensitive) and persist.
    pub fn remove_path(&mut self, path: &str) -> Result<Option<TrackRef>, LibraryError> {
        match self
            .tracks
            .iter()
            .position(|t| same_path(&t.file_path, path))
        {
            Some(idx) => {
                let removed = self.tracks.remove(idx);
                self.save()?;
                Ok(Some(removed))
            }
            None => Ok(None),
        }
    }

    /// Find the first entry for a file path (case-insensitive).
    pub fn find_path(&self, path: &str) -> Option<&TrackRef> {
        self.tracks.iter().find(|t| same_path(&t.file_path, path))
    }

    /// Rewrite the whole list to the backing file.
    fn save(&self) -> Result<(), LibraryError> {
        let json = serde_json::to_string(&self.tracks)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| LibraryError::CreateDir(parent.to_path_buf(), e))?;
        }
        fs::write(&self.path, json).map_err(|e| LibraryError::Write(self.path.clone(), e))?;
        Ok(())
    }
}

fn load(path: &Path) -> Vec<TrackRef> {
    if !path.exists() {
        return Vec::new();
    }
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!("Corrupt library file {:?}, starting empty: {}", path, e);
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!("Could not read library file {:?}: {}", path, e);
            Vec::new()
        }
    }
}
