//! Seams to the outside world.
//!
//! The session never touches files or screens. Loading, saving and
//! showing previews go through these traits; `retouch-io` provides the
//! filesystem and preview implementations.

use std::path::Path;

use crate::types::RgbImage;

/// Loads images, e.g. the initial image and blend overlays.
pub trait ImageSource {
    /// Error reported when an image cannot be loaded.
    type Error: std::error::Error;

    /// Load the image at `path` as three-channel RGB.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the image is missing or cannot be decoded.
    fn load(&mut self, path: &Path) -> Result<RgbImage, Self::Error>;
}

/// Persists the final image.
pub trait ImageSink {
    /// Error reported when an image cannot be written.
    type Error: std::error::Error;

    /// Write `image` to `path`.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if encoding or writing fails.
    fn save(&mut self, image: &RgbImage, path: &Path) -> Result<(), Self::Error>;
}

/// Shows a candidate next to the image it would replace.
///
/// Purely observational: nothing it does can affect the session.
pub trait Presenter {
    /// Present `before` and `after` under `label`.
    fn present(&mut self, before: &RgbImage, after: &RgbImage, label: &str);
}

/// A presenter that shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreview;

impl Presenter for NoPreview {
    fn present(&mut self, _before: &RgbImage, _after: &RgbImage, _label: &str) {}
}

impl<F> Presenter for F
where
    F: FnMut(&RgbImage, &RgbImage, &str),
{
    fn present(&mut self, before: &RgbImage, after: &RgbImage, label: &str) {
        self(before, after, label);
    }
}
