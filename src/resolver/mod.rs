//! Metadata resolver - turns a selected track into display state.
//!
//! For each selection the resolver consults the store first. A record
//! carrying any usable display field is a cache hit and is presented
//! directly, with no network traffic. On a miss the caller gets an
//! immediate placeholder state while a catalog lookup runs in the
//! background; its outcome is merged into the store and re-emitted as a
//! follow-up [`ResolverEvent::Presentation`].
//!
//! Every selection opens a fresh cancellation scope and cancels the
//! previous one, so a superseded lookup can never write to the store or
//! reach the presentation layer, no matter when it completes.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogApi, SongMatch};
use crate::cover::{CoverDescriptor, CoverEngine};
use crate::model::{PLACEHOLDER, SongRecord, TrackRef, local_title, non_blank};
use crate::store::SongStore;

/// Resolved display strings plus the cover decision for one track.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub cover: CoverDescriptor,
}

impl PresentationState {
    /// Synthesize display state from a stored record.
    fn from_record(record: &SongRecord, cover: CoverDescriptor) -> Self {
        let fallback = local_title(&record.file_path);
        Self {
            track_name: record.display_title(&fallback),
            artist_name: display_or_placeholder(&record.artist_name),
            album_name: display_or_placeholder(&record.album_name),
            cover,
        }
    }

    /// Immediate state for a track we know nothing about yet.
    fn placeholder(track: &TrackRef, cover: CoverDescriptor) -> Self {
        Self {
            track_name: local_title(&track.file_path),
            artist_name: PLACEHOLDER.to_string(),
            album_name: PLACEHOLDER.to_string(),
            cover,
        }
    }
}

fn display_or_placeholder(field: &Option<String>) -> String {
    non_blank(field).unwrap_or(PLACEHOLDER).to_string()
}

/// State-transition events for whatever presentation layer is listening.
#[derive(Debug, Clone)]
pub enum ResolverEvent {
    /// An asynchronous follow-up to an earlier selection.
    Presentation(PresentationState),
    /// A user-visible status line ("File not found: ...", lookup errors).
    Status(String),
}

/// Orchestrates store, catalog and cover engine for track selection.
pub struct MetadataResolver {
    store: Arc<SongStore>,
    catalog: Arc<dyn CatalogApi>,
    covers: Arc<CoverEngine>,
    events: broadcast::Sender<ResolverEvent>,
    scope: Mutex<CancellationToken>,
}

impl MetadataResolver {
    pub fn new(
        store: Arc<SongStore>,
        catalog: Arc<dyn CatalogApi>,
        covers: Arc<CoverEngine>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            store,
            catalog,
            covers,
            events,
            scope: Mutex::new(CancellationToken::new()),
        }
    }

    /// Subscribe to follow-up presentation updates and status lines.
    pub fn subscribe(&self) -> broadcast::Receiver<ResolverEvent> {
        self.events.subscribe()
    }

    /// Resolve a selected track to display state.
    ///
    /// Returns synchronously; when a catalog lookup is needed the result
    /// arrives later as a [`ResolverEvent::Presentation`]. Any lookup
    /// still in flight from a previous selection is cancelled first.
    pub fn select_track(self: &Arc<Self>, track: &TrackRef) -> PresentationState {
        let token = self.begin_scope();

        if !Path::new(&track.file_path).exists() {
            let _ = self.events.send(ResolverEvent::Status(format!(
                "File not found: {}",
                track.file_path
            )));
            // Remember the attempt so the next selection skips the lookup too
            self.record_attempt(track);
            let cover = self.covers.present_default();
            return PresentationState::placeholder(track, cover);
        }

        if let Some(record) = self
            .store
            .get_by_path(&track.file_path)
            .filter(SongRecord::has_metadata)
        {
            tracing::debug!("Cache hit for {}", track.file_path);
            let cover = self.covers.present(&record);
            return PresentationState::from_record(&record, cover);
        }

        tracing::debug!("Cache miss for {}, querying catalog", track.file_path);
        let cover = self.covers.present_default();
        self.spawn_lookup(track.clone(), token);
        PresentationState::placeholder(track, cover)
    }

    /// Cancel whatever lookup is outstanding (shutdown, window close).
    pub fn cancel(&self) {
        self.scope.lock().cancel();
    }

    /// Cancel the previous scope and open a fresh one for this selection.
    fn begin_scope(&self) -> CancellationToken {
        let mut scope = self.scope.lock();
        scope.cancel();
        *scope = CancellationToken::new();
        scope.clone()
    }

    fn spawn_lookup(self: &Arc<Self>, track: TrackRef, token: CancellationToken) {
        let resolver = Arc::clone(self);
        tokio::spawn(async move {
            let term = search_term(&track.file_path);
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                result = resolver.catalog.search_song(&term) => result,
            };
            // Superseded while the response was in flight: drop it whole
            if token.is_cancelled() {
                return;
            }

            match outcome {
                Ok(Some(found)) => resolver.apply_match(&track, found, &token),
                Ok(None) => {
                    let _ = resolver.events.send(ResolverEvent::Status(
                        "No catalog results. Showing file info only.".to_string(),
                    ));
                    resolver.finish_without_match(&track, &token);
                }
                Err(e) => {
                    tracing::warn!("Catalog lookup failed for {}: {}", track.file_path, e);
                    let _ = resolver.events.send(ResolverEvent::Status(format!(
                        "Catalog error: {}. Showing file info only.",
                        e
                    )));
                    resolver.finish_without_match(&track, &token);
                }
            }
        });
    }

    /// Merge a catalog match into the store and re-present.
    fn apply_match(&self, track: &TrackRef, found: SongMatch, token: &CancellationToken) {
        if token.is_cancelled() {
            return;
        }

        // Overwrite the four lookup fields; user edits ride along untouched
        let mut record = self.existing_or_new(track);
        record.track_name = found.track_name;
        record.artist_name = found.artist_name;
        record.album_name = found.album_name;
        record.artwork_url = found.artwork_url;

        match self.store.upsert(record) {
            Ok(stored) => {
                let cover = self.covers.present(&stored);
                let _ = self.events.send(ResolverEvent::Presentation(
                    PresentationState::from_record(&stored, cover),
                ));
            }
            Err(e) => tracing::error!("Could not persist lookup result: {}", e),
        }
    }

    /// No match or lookup failure: record the attempt and fall back to
    /// locally derived display values.
    fn finish_without_match(&self, track: &TrackRef, token: &CancellationToken) {
        if token.is_cancelled() {
            return;
        }
        if let Some(stored) = self.record_attempt(track) {
            let cover = self.covers.present_default();
            let _ = self.events.send(ResolverEvent::Presentation(
                PresentationState::from_record(&stored, cover),
            ));
        }
    }

    /// Upsert a record marking "lookup attempted, no data": the locally
    /// derived title with the remote fields explicitly empty. The title
    /// makes the record a cache hit next time, which is what suppresses
    /// repeated failing lookups for an unchanged file.
    fn record_attempt(&self, track: &TrackRef) -> Option<SongRecord> {
        let mut record = self.existing_or_new(track);
        record.track_name = Some(local_title(&track.file_path));
        record.artist_name = None;
        record.album_name = None;
        record.artwork_url = None;

        match self.store.upsert(record) {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::error!("Could not persist lookup attempt: {}", e);
                None
            }
        }
    }

    fn existing_or_new(&self, track: &TrackRef) -> SongRecord {
        self.store
            .get_by_path(&track.file_path)
            .unwrap_or_else(|| SongRecord::new(track.file_path.clone()))
    }
}

/// Derive a catalog search term from a file name: drop the extension,
/// turn `-`/`_` into spaces, delete bracketed and parenthesized groups,
/// collapse whitespace.
pub fn search_term(file_path: &str) -> String {
    let name = local_title(file_path);
    let name = name.replace(['-', '_'], " ");
    let name = strip_groups(&name, '[', ']');
    let name = strip_groups(&name, '(', ')');
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace every shortest `open...close` group with a single space.
/// An unmatched opener is left alone.
fn strip_groups(s: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find(open) {
        let Some(len) = rest[start..].find(close) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push(' ');
        rest = &rest[start + len + close.len_utf8()..];
    }
    out.push_str(rest);
    out
}
