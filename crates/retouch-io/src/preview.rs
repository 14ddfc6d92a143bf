//! Before/after previews.
//!
//! [`PreviewWriter`] writes one side-by-side PNG per operation into a
//! directory, numbered in the order operations were previewed.
//! [`LogPresenter`] only emits a log event and is used when no preview
//! directory is configured.

use std::path::{Path, PathBuf};

use retouch_core::resize::{ResizeFilter, fit_to};
use retouch_core::{Dimensions, Presenter, RgbImage};

use crate::codec::CodecError;

/// Width of the gray bar between the two halves of a preview.
const SEPARATOR_WIDTH: u32 = 4;

/// Colour of the separator bar.
const SEPARATOR_COLOR: [u8; 3] = [128, 128, 128];

/// Place `before` and `after` next to each other, separated by a thin bar.
///
/// `after` is resized to `before`'s dimensions for display only; padding
/// changes the size of the image and the two halves must line up.
#[must_use]
pub fn side_by_side(before: &RgbImage, after: &RgbImage) -> RgbImage {
    let (width, height) = before.dimensions();
    let after = fit_to(after, Dimensions::of(before), ResizeFilter::Triangle);

    let total = width
        .saturating_mul(2)
        .saturating_add(SEPARATOR_WIDTH);
    let mut canvas = RgbImage::from_pixel(total, height, image::Rgb(SEPARATOR_COLOR));
    image::imageops::replace(&mut canvas, before, 0, 0);
    image::imageops::replace(
        &mut canvas,
        &*after,
        i64::from(width) + i64::from(SEPARATOR_WIDTH),
        0,
    );
    canvas
}

/// Turn an operation label into something safe for a file name.
fn file_stem(label: &str) -> String {
    let mut stem = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.ends_with('-') && !stem.is_empty() {
            stem.push('-');
        }
    }
    while stem.ends_with('-') {
        stem.pop();
    }
    if stem.is_empty() {
        stem.push_str("preview");
    }
    stem
}

/// Writes each preview as `NNN-label.png` into a directory.
#[derive(Debug, Clone)]
pub struct PreviewWriter {
    dir: PathBuf,
    written: u32,
}

impl PreviewWriter {
    /// A writer targeting `dir`, which is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    /// Directory previews are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render and write one preview, returning its path.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Save`] if the directory cannot be created or
    /// the PNG cannot be written.
    pub fn write(
        &mut self,
        before: &RgbImage,
        after: &RgbImage,
        label: &str,
    ) -> Result<PathBuf, CodecError> {
        let path = self
            .dir
            .join(format!("{:03}-{}.png", self.written + 1, file_stem(label)));
        std::fs::create_dir_all(&self.dir).map_err(|err| CodecError::Save {
            path: path.clone(),
            source: image::ImageError::IoError(err),
        })?;
        side_by_side(before, after)
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|source| CodecError::Save {
                path: path.clone(),
                source,
            })?;
        self.written += 1;
        Ok(path)
    }
}

impl Presenter for PreviewWriter {
    fn present(&mut self, before: &RgbImage, after: &RgbImage, label: &str) {
        match self.write(before, after, label) {
            Ok(path) => tracing::info!(path = %path.display(), label, "preview written"),
            Err(err) => tracing::warn!(%err, label, "preview not written"),
        }
    }
}

/// Reports each preview as a log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, before: &RgbImage, after: &RgbImage, label: &str) {
        tracing::info!(
            label,
            before = %Dimensions::of(before),
            after = %Dimensions::of(after),
            "preview"
        );
    }
}
