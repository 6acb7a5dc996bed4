//! Cover engine - drives which cover is shown and how it animates.
//!
//! Priority chain for a record: user-image slideshow, then cached
//! artwork URL, then the default cover. The engine owns a single
//! cancellation token for whatever is currently showing; `present` and
//! `present_default` replace it, so exactly one slideshow timer or
//! artwork fetch can be alive at a time.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::model::SongRecord;

use super::CoverDescriptor;
use super::artwork::{ArtworkFetcher, CoverImage};
use super::slideshow::SlideshowDescriptor;

/// Cover updates emitted as timed/async work completes.
#[derive(Debug, Clone)]
pub enum CoverEvent {
    /// The slideshow moved to another image.
    Slide { index: usize, path: PathBuf },
    /// Remote artwork finished downloading.
    Artwork(CoverImage),
    /// Fall back to the default cover (payload: its configured path).
    Default(Option<PathBuf>),
}

/// Owns slideshow timing and artwork fetching for the current track.
pub struct CoverEngine {
    default_cover: Option<PathBuf>,
    fetcher: ArtworkFetcher,
    active: Mutex<CancellationToken>,
    events: broadcast::Sender<CoverEvent>,
}

impl CoverEngine {
    /// Create an engine. `default_cover` is the configured fallback image,
    /// injected here rather than read from any global.
    pub fn new(default_cover: Option<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            default_cover,
            fetcher: ArtworkFetcher::new(),
            active: Mutex::new(CancellationToken::new()),
            events,
        }
    }

    /// Subscribe to cover updates.
    pub fn subscribe(&self) -> broadcast::Receiver<CoverEvent> {
        self.events.subscribe()
    }

    /// The configured default cover, if any.
    pub fn default_cover(&self) -> Option<&Path> {
        self.default_cover.as_deref()
    }

    /// Decide what to show for a record and start any timed or async
    /// work under a fresh show scope. Whatever was showing before is
    /// stopped first.
    pub fn present(self: &Arc<Self>, record: &SongRecord) -> CoverDescriptor {
        let token = self.begin_show();

        if let Some(show) = SlideshowDescriptor::from_user_images(&record.user_images) {
            self.spawn_slideshow(show.clone(), token);
            return CoverDescriptor::Slideshow(show);
        }

        if let Some(url) = crate::model::non_blank(&record.artwork_url) {
            self.spawn_artwork_fetch(url.to_string(), token);
            return CoverDescriptor::Artwork {
                url: url.to_string(),
            };
        }

        let _ = self.events.send(CoverEvent::Default(self.default_cover.clone()));
        CoverDescriptor::Default
    }

    /// Show the default cover, stopping whatever was running.
    pub fn present_default(&self) -> CoverDescriptor {
        self.stop();
        let _ = self.events.send(CoverEvent::Default(self.default_cover.clone()));
        CoverDescriptor::Default
    }

    /// Stop the current slideshow/fetch without starting anything new.
    pub fn stop(&self) {
        self.active.lock().cancel();
    }

    /// Cancel the previous show and install a fresh scope for the next one.
    fn begin_show(&self) -> CancellationToken {
        let mut active = self.active.lock();
        active.cancel();
        *active = CancellationToken::new();
        active.clone()
    }

    fn spawn_slideshow(self: &Arc<Self>, mut show: SlideshowDescriptor, token: CancellationToken) {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            // First frame shows immediately, then one step per interval
            if let Some(path) = show.current_image() {
                let _ = engine.events.send(CoverEvent::Slide {
                    index: show.current_index(),
                    path: path.clone(),
                });
            }

            let mut ticker = tokio::time::interval(show.interval());
            ticker.tick().await; // the zeroth tick completes immediately

            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = ticker.tick() => {}
                }
                if token.is_cancelled() {
                    return;
                }
                if !show.advance() {
                    tracing::debug!("All slideshow images gone, stopping");
                    return;
                }
                let Some(path) = show.current_image() else {
                    return;
                };
                let _ = engine.events.send(CoverEvent::Slide {
                    index: show.current_index(),
                    path: path.clone(),
                });
            }
        });
    }

    fn spawn_artwork_fetch(self: &Arc<Self>, url: String, token: CancellationToken) {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let fetched = tokio::select! {
                _ = token.cancelled() => return,
                result = engine.fetcher.fetch(&url) => result,
            };
            if token.is_cancelled() {
                return;
            }
            match fetched {
                Ok(cover) => {
                    let _ = engine.events.send(CoverEvent::Artwork(cover));
                }
                Err(e) => {
                    tracing::debug!("Artwork fetch failed for {}: {}", url, e);
                    let _ = engine
                        .events
                        .send(CoverEvent::Default(engine.default_cover.clone()));
                }
            }
        });
    }
}
