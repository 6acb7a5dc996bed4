//! Player session - the narrow interface the presentation layer consumes.
//!
//! Wires the store, catalog client, resolver, cover engine and library
//! together. The GUI (not part of this crate) talks to a
//! [`PlayerSession`] and to nothing below it: select a track, open an
//! editor, manage user images, subscribe to updates.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::catalog::{CatalogApi, ItunesClient};
use crate::config::Config;
use crate::cover::{CoverEngine, CoverEvent};
use crate::editor::EditorSession;
use crate::error::Result;
use crate::library::Library;
use crate::model::TrackRef;
use crate::resolver::{MetadataResolver, PresentationState, ResolverEvent};
use crate::store::SongStore;

/// Facade over the metadata core.
pub struct PlayerSession {
    store: Arc<SongStore>,
    covers: Arc<CoverEngine>,
    resolver: Arc<MetadataResolver>,
    library: Mutex<Library>,
}

impl PlayerSession {
    /// Build a session from configuration: store and library in the data
    /// directory, catalog client against the configured endpoint.
    pub fn new(config: &Config) -> Result<Self> {
        let (store, library) = match &config.storage.data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                (
                    SongStore::open(dir.join(crate::store::STORE_FILE)),
                    Library::open(dir.join(crate::library::LIBRARY_FILE)),
                )
            }
            None => (SongStore::open_default()?, Library::open_default()?),
        };

        let mut client = match &config.catalog.base_url {
            Some(url) => ItunesClient::with_base_url(url.clone()),
            None => ItunesClient::new(),
        };
        if let Some(country) = &config.catalog.country {
            client = client.with_country(country.clone());
        }

        Ok(Self::with_parts(
            Arc::new(store),
            library,
            Arc::new(client),
            config.presentation.default_cover.clone(),
        ))
    }

    /// Build a session from explicit parts (tests, custom wiring).
    pub fn with_parts(
        store: Arc<SongStore>,
        library: Library,
        catalog: Arc<dyn CatalogApi>,
        default_cover: Option<PathBuf>,
    ) -> Self {
        let covers = Arc::new(CoverEngine::new(default_cover));
        let resolver = Arc::new(MetadataResolver::new(
            Arc::clone(&store),
            catalog,
            Arc::clone(&covers),
        ));
        Self {
            store,
            covers,
            resolver,
            library: Mutex::new(library),
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select a track: immediate display state now, follow-up updates on
    /// the event channel when a lookup completes.
    pub fn select_track(&self, track: &TrackRef) -> PresentationState {
        self.resolver.select_track(track)
    }

    /// Select the library entry at `index`.
    pub fn select_index(&self, index: usize) -> Option<PresentationState> {
        let track = self.library.lock().get(index).cloned()?;
        Some(self.select_track(&track))
    }

    /// Follow-up presentation updates and status lines.
    pub fn subscribe(&self) -> broadcast::Receiver<ResolverEvent> {
        self.resolver.subscribe()
    }

    /// Slideshow ticks and artwork arrivals.
    pub fn subscribe_covers(&self) -> broadcast::Receiver<CoverEvent> {
        self.covers.subscribe()
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Open an editable metadata snapshot for a track.
    pub fn edit(&self, track: &TrackRef) -> EditorSession {
        EditorSession::open(Arc::clone(&self.store), track.clone())
    }

    /// Add a user cover image for a track and persist. Returns whether
    /// the image was added (missing files and duplicates are skipped).
    pub fn add_user_image(&self, track: &TrackRef, path: PathBuf) -> Result<bool> {
        let mut editor = self.edit(track);
        if !editor.add_user_image(path) {
            return Ok(false);
        }
        editor.save()?;
        Ok(true)
    }

    /// Remove a user cover image for a track and persist.
    pub fn remove_user_image(&self, track: &TrackRef, path: &std::path::Path) -> Result<bool> {
        let mut editor = self.edit(track);
        if !editor.remove_user_image(path) {
            return Ok(false);
        }
        editor.save()?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Library
    // ------------------------------------------------------------------

    pub fn tracks(&self) -> Vec<TrackRef> {
        self.library.lock().tracks().to_vec()
    }

    pub fn add_paths(&self, paths: impl IntoIterator<Item = PathBuf>) -> Result<Vec<TrackRef>> {
        Ok(self.library.lock().add_paths(paths)?)
    }

    pub fn remove_path(&self, path: &str) -> Result<Option<TrackRef>> {
        Ok(self.library.lock().remove_path(path)?)
    }

    /// Library entry for a path, or a fresh reference when the file was
    /// never added.
    pub fn track_for(&self, path: &str) -> TrackRef {
        self.library
            .lock()
            .find_path(path)
            .cloned()
            .unwrap_or_else(|| TrackRef::from_path(path))
    }

    pub fn store(&self) -> &Arc<SongStore> {
        &self.store
    }

    /// Cancel outstanding lookups and stop the slideshow (window close).
    pub fn shutdown(&self) {
        self.resolver.cancel();
        self.covers.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::traits::mocks::MockCatalog;
    use crate::cover::CoverDescriptor;
    use crate::library::LIBRARY_FILE;
    use crate::model::PLACEHOLDER;
    use crate::store::STORE_FILE;
    use tempfile::TempDir;

    fn session_with(catalog: MockCatalog) -> (PlayerSession, Arc<MockCatalog>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(SongStore::open(dir.path().join(STORE_FILE)));
        let library = Library::open(dir.path().join(LIBRARY_FILE));
        let catalog = Arc::new(catalog);
        let session = PlayerSession::with_parts(
            store,
            library,
            Arc::clone(&catalog) as Arc<dyn CatalogApi>,
            None,
        );
        (session, catalog, dir)
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"audio").unwrap();
        path
    }

    async fn next_presentation(
        rx: &mut broadcast::Receiver<ResolverEvent>,
    ) -> PresentationState {
        loop {
            if let ResolverEvent::Presentation(state) = rx.recv().await.unwrap() {
                return state;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_unseen_track_end_to_end() {
        let (session, catalog, dir) = session_with(MockCatalog::single_match(
            "X",
            "Y",
            "Z",
            "http://127.0.0.1:0/art.jpg",
        ));
        let file = touch(&dir, "Fresh Track.mp3");
        let added = session.add_paths(vec![file]).unwrap();
        let track = added[0].clone();

        let mut rx = session.subscribe();
        let immediate = session.select_track(&track);
        assert_eq!(immediate.track_name, "Fresh Track");
        assert_eq!(immediate.artist_name, PLACEHOLDER);

        let follow_up = next_presentation(&mut rx).await;
        assert_eq!(follow_up.track_name, "X");
        assert_eq!(follow_up.artist_name, "Y");
        assert_eq!(follow_up.album_name, "Z");

        let stored = session.store().get_by_path(&track.file_path).unwrap();
        assert_eq!(stored.track_name.as_deref(), Some("X"));
        assert_eq!(stored.artist_name.as_deref(), Some("Y"));
        assert_eq!(stored.album_name.as_deref(), Some("Z"));
        assert_eq!(stored.artwork_url.as_deref(), Some("http://127.0.0.1:0/art.jpg"));

        // Second selection: same state, no second catalog call
        let second = session.select_track(&track);
        assert_eq!(second, follow_up);
        assert_eq!(catalog.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_missing_file_end_to_end() {
        let (session, catalog, dir) = session_with(MockCatalog::single_match("X", "Y", "Z", ""));
        let ghost = dir.path().join("Gone Song.mp3");

        let mut rx = session.subscribe();
        let track = session.track_for(&ghost.to_string_lossy());
        let state = session.select_track(&track);

        assert_eq!(state.track_name, "Gone Song");
        assert_eq!(state.artist_name, PLACEHOLDER);
        assert_eq!(state.album_name, PLACEHOLDER);
        assert_eq!(state.cover, CoverDescriptor::Default);

        match rx.recv().await.unwrap() {
            ResolverEvent::Status(line) => {
                assert!(line.starts_with("File not found:"));
            }
            other => panic!("expected status line, got {:?}", other),
        }

        let stored = session.store().get_by_path(&track.file_path).unwrap();
        assert_eq!(stored.track_name.as_deref(), Some("Gone Song"));
        assert!(stored.artist_name.is_none());
        assert!(stored.artwork_url.is_none());
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_images_flow_through_to_slideshow() {
        let (session, _catalog, dir) = session_with(MockCatalog::no_matches());
        let file = touch(&dir, "Song.mp3");
        let image_a = touch(&dir, "a.png");
        let image_b = touch(&dir, "b.png");

        let track = session.track_for(&file.to_string_lossy());

        // Seed metadata via the editor so the record is a cache hit
        let mut editor = session.edit(&track);
        editor.set_custom_title("Mine");
        editor.save().unwrap();

        assert!(session.add_user_image(&track, image_a.clone()).unwrap());
        assert!(session.add_user_image(&track, image_b.clone()).unwrap());
        assert!(!session.add_user_image(&track, image_a.clone()).unwrap());

        let state = session.select_track(&track);
        assert_eq!(state.track_name, "Mine");
        match state.cover {
            CoverDescriptor::Slideshow(show) => {
                assert_eq!(show.images(), &[image_a.clone(), image_b]);
                assert_eq!(show.current_index(), 0);
            }
            other => panic!("expected slideshow, got {:?}", other),
        }

        assert!(session.remove_user_image(&track, &image_a).unwrap());
        let stored = session.store().get_by_path(&track.file_path).unwrap();
        assert_eq!(stored.user_images.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_index_uses_library_order() {
        let (session, _catalog, dir) = session_with(MockCatalog::no_matches());
        let first = touch(&dir, "First.mp3");
        let second = touch(&dir, "Second.mp3");
        session.add_paths(vec![first, second]).unwrap();

        let state = session.select_index(1).unwrap();
        assert_eq!(state.track_name, "Second");
        assert!(session.select_index(5).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_lookup() {
        let (session, _catalog, dir) = session_with(MockCatalog::pending());
        let file = touch(&dir, "Song.mp3");
        let track = session.track_for(&file.to_string_lossy());

        session.select_track(&track);
        session.shutdown();

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(session.store().get_by_path(&track.file_path).is_none());
    }
}
