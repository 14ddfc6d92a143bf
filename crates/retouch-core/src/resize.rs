//! Resampling an image to exact target dimensions.
//!
//! Used by the blend operator when the overlay does not match the active
//! image. Unlike a thumbnail resize the aspect ratio is not preserved: the
//! output always has exactly the requested width and height.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, RgbImage};

/// Resampling filter used when resizing an overlay.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    #[default]
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest.
    Lanczos3,
}

impl ResizeFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Resize `image` to exactly `target`, borrowing it unchanged when it
/// already has those dimensions.
#[must_use]
pub fn fit_to(image: &RgbImage, target: Dimensions, filter: ResizeFilter) -> Cow<'_, RgbImage> {
    if Dimensions::of(image) == target {
        return Cow::Borrowed(image);
    }

    tracing::debug!(
        from = %Dimensions::of(image),
        to = %target,
        %filter,
        "resizing image",
    );
    Cow::Owned(image::imageops::resize(
        image,
        target.width,
        target.height,
        filter.to_image_filter(),
    ))
}
