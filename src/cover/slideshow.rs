//! Slideshow state for user-curated cover images.
//!
//! Pure iteration logic lives here; the timed driver that ticks it is in
//! [`super::engine`]. Images whose backing file is missing are filtered
//! out up front and re-checked on every advance, so a file deleted
//! mid-show drops out silently and an emptied show stops.

use std::path::PathBuf;
use std::time::Duration;

/// Fixed advancement interval for slideshows.
pub const SLIDESHOW_INTERVAL: Duration = Duration::from_millis(3000);

/// A cycling presentation over the user's cover images.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowDescriptor {
    images: Vec<PathBuf>,
    interval: Duration,
    current: usize,
}

impl SlideshowDescriptor {
    /// Build a slideshow from user images, keeping only entries whose
    /// backing file currently exists. Returns `None` when nothing
    /// survives the filter.
    pub fn from_user_images(paths: &[PathBuf]) -> Option<Self> {
        let images: Vec<PathBuf> = paths.iter().filter(|p| p.exists()).cloned().collect();
        if images.is_empty() {
            return None;
        }
        Some(Self {
            images,
            interval: SLIDESHOW_INTERVAL,
            current: 0,
        })
    }

    /// The surviving image list, in user order.
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The image to display right now.
    pub fn current_image(&self) -> Option<&PathBuf> {
        self.images.get(self.current)
    }

    /// Move one step forward, wrapping modulo the surviving image count.
    ///
    /// Files that have gone missing since the last step are dropped first.
    /// Returns `false` when no images remain - the show is over.
    pub fn advance(&mut self) -> bool {
        self.images.retain(|p| p.exists());
        if self.images.is_empty() {
            return false;
        }
        if self.current >= self.images.len() {
            self.current = 0;
        }
        self.current = (self.current + 1) % self.images.len();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"img").unwrap();
        path
    }

    #[test]
    fn test_missing_files_are_filtered_out() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("a.png");
        let b = touch(&temp, "b.png");
        let c = touch(&temp, "c.png");

        let show =
            SlideshowDescriptor::from_user_images(&[missing, b.clone(), c.clone()]).unwrap();
        assert_eq!(show.images(), &[b, c]);
        assert_eq!(show.current_index(), 0);
        assert_eq!(show.interval(), Duration::from_millis(3000));
    }

    #[test]
    fn test_advance_wraps_around() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("a.png");
        let b = touch(&temp, "b.png");
        let c = touch(&temp, "c.png");

        let mut show = SlideshowDescriptor::from_user_images(&[missing, b, c]).unwrap();
        assert_eq!(show.current_index(), 0);

        assert!(show.advance());
        assert_eq!(show.current_index(), 1);

        assert!(show.advance());
        assert_eq!(show.current_index(), 0);
    }

    #[test]
    fn test_no_existing_images_means_no_show() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("gone.png");
        assert!(SlideshowDescriptor::from_user_images(&[gone]).is_none());
        assert!(SlideshowDescriptor::from_user_images(&[]).is_none());
    }

    #[test]
    fn test_show_stops_when_files_vanish_mid_show() {
        let temp = TempDir::new().unwrap();
        let a = touch(&temp, "a.png");
        let b = touch(&temp, "b.png");

        let mut show = SlideshowDescriptor::from_user_images(&[a.clone(), b.clone()]).unwrap();
        assert!(show.advance());

        std::fs::remove_file(&a).unwrap();
        std::fs::remove_file(&b).unwrap();
        assert!(!show.advance());
    }

    #[test]
    fn test_deleted_image_drops_out_but_show_goes_on() {
        let temp = TempDir::new().unwrap();
        let a = touch(&temp, "a.png");
        let b = touch(&temp, "b.png");

        let mut show = SlideshowDescriptor::from_user_images(&[a.clone(), b.clone()]).unwrap();
        std::fs::remove_file(&a).unwrap();

        assert!(show.advance());
        assert_eq!(show.images(), &[b.clone()]);
        assert_eq!(show.current_image(), Some(&b));
    }
}
