//! Cover presentation engine.
//!
//! Decides what image(s) to show for a track: a cycling slideshow over
//! the user's own cover images, a single piece of artwork fetched from
//! the cached catalog URL, or the configured default cover. The engine
//! owns the slideshow timer and the artwork fetch; starting any new
//! presentation fully stops the previous one first.

pub mod artwork;
pub mod engine;
pub mod slideshow;

pub use artwork::{ArtworkError, ArtworkFetcher, CoverImage};
pub use engine::{CoverEngine, CoverEvent};
pub use slideshow::{SLIDESHOW_INTERVAL, SlideshowDescriptor};

/// What the presentation layer should display for the current track.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverDescriptor {
    /// Cycle through the user's cover images.
    Slideshow(SlideshowDescriptor),
    /// A single image being materialized from a remote URL.
    Artwork { url: String },
    /// The bundled/configured default cover.
    Default,
}
