//! Grayscale conversion and binary thresholding.
//!
//! Both produce three-channel output with the gray value replicated to
//! R, G and B, so every later operation sees the same pixel layout.
//!
//! Luminance uses the BT.601 weights `0.299*R + 0.587*G + 0.114*B` in
//! 14-bit fixed point, rounded to nearest.

use image::GrayImage;
use imageproc::contrast::ThresholdType;

use crate::types::{RgbImage, SessionError};

/// BT.601 weights scaled by `1 << LUMA_SHIFT`; they sum to exactly 16384.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Luminance of one RGB pixel.
#[allow(clippy::cast_possible_truncation)]
const fn luma([r, g, b]: [u8; 3]) -> u8 {
    let weighted = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Single-channel luminance of an RGB image.
#[must_use]
pub fn to_luma(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        image::Luma([luma(image.get_pixel(x, y).0)])
    })
}

/// Replicate a single-channel image to three channels.
#[must_use]
pub fn replicate(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        image::Rgb([v, v, v])
    })
}

/// Convert to grayscale, keeping three channels.
#[must_use = "returns the grayscale image"]
pub fn grayscale(image: &RgbImage) -> RgbImage {
    replicate(&to_luma(image))
}

/// Check a threshold level.
///
/// # Errors
///
/// Returns [`SessionError::InvalidParameter`] if `level` is outside
/// `0..=255`.
pub fn validate_threshold(level: i32) -> Result<u8, SessionError> {
    u8::try_from(level)
        .map_err(|_| SessionError::invalid(format!("threshold {level} outside 0..=255")))
}

/// Binary threshold on luminance.
///
/// Pixels brighter than `level` become white and the rest black, or the
/// reverse when `inverse` is set.
#[must_use = "returns the thresholded image"]
pub fn threshold(image: &RgbImage, level: u8, inverse: bool) -> RgbImage {
    let kind = if inverse {
        ThresholdType::BinaryInverted
    } else {
        ThresholdType::Binary
    };
    let binary = imageproc::contrast::threshold(&to_luma(image), level, kind);
    replicate(&binary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pixel(rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(1, 1, image::Rgb(rgb))
    }

    #[test]
    fn weights_sum_to_unity() {
        assert_eq!(LUMA_R + LUMA_G + LUMA_B, 1 << LUMA_SHIFT);
    }

    #[test]
    fn extremes_map_to_extremes() {
        assert_eq!(luma([0, 0, 0]), 0);
        assert_eq!(luma([255, 255, 255]), 255);
    }

    #[test]
    fn primaries_follow_bt601() {
        // round(0.299 * 255) = 76, round(0.587 * 255) = 150, round(0.114 * 255) = 29
        assert_eq!(luma([255, 0, 0]), 76);
        assert_eq!(luma([0, 255, 0]), 150);
        assert_eq!(luma([0, 0, 255]), 29);
    }

    #[test]
    fn grayscale_replicates_channels() {
        let out = grayscale(&pixel([255, 0, 0]));
        assert_eq!(out.get_pixel(0, 0).0, [76, 76, 76]);
    }

    #[test]
    fn grayscale_keeps_dimensions() {
        let img = RgbImage::new(17, 31);
        assert_eq!(grayscale(&img).dimensions(), (17, 31));
    }

    #[test]
    fn threshold_splits_on_level() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgb([100, 100, 100])
            } else {
                image::Rgb([200, 200, 200])
            }
        });
        let out = threshold(&img, 150, false);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);

        let inverted = threshold(&img, 150, true);
        assert_eq!(inverted.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(inverted.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn threshold_level_range() {
        assert_eq!(validate_threshold(0).unwrap(), 0);
        assert_eq!(validate_threshold(255).unwrap(), 255);
        assert!(validate_threshold(256).is_err());
        assert!(validate_threshold(-1).is_err());
    }
}
