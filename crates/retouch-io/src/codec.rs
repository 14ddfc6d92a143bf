//! Image files on disk.
//!
//! Reading decodes any format the `image` crate is built with (PNG, JPEG,
//! BMP, WebP) by sniffing the content. Writing picks the format from the
//! file extension. Every image is converted to three-channel RGB on load.

use std::path::{Path, PathBuf};

use retouch_core::{Dimensions, ImageSink, ImageSource, RgbImage};

/// Errors from reading, decoding or writing image files.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Load {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The image could not be encoded or written.
    #[error("failed to write {}: {source}", path.display())]
    Save {
        /// Destination file.
        path: PathBuf,
        /// Underlying encode or I/O error.
        source: image::ImageError,
    },

    /// The input held no bytes.
    #[error("input image data is empty")]
    EmptyInput,

    /// The bytes are not an image in a supported format.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decode an in-memory image to RGB.
///
/// # Errors
///
/// Returns [`CodecError::EmptyInput`] if `bytes` is empty.
/// Returns [`CodecError::Decode`] if the format is unrecognized or the
/// data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

/// Loads and saves images through the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCodec;

impl ImageSource for FsCodec {
    type Error = CodecError;

    fn load(&mut self, path: &Path) -> Result<RgbImage, CodecError> {
        let bytes = std::fs::read(path).map_err(|source| CodecError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decode(&bytes)?;
        tracing::info!(
            path = %path.display(),
            dimensions = %Dimensions::of(&image),
            "image loaded"
        );
        Ok(image)
    }
}

impl ImageSink for FsCodec {
    type Error = CodecError;

    fn save(&mut self, image: &RgbImage, path: &Path) -> Result<(), CodecError> {
        image.save(path).map_err(|source| CodecError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            dimensions = %Dimensions::of(image),
            "image written"
        );
        Ok(())
    }
}
