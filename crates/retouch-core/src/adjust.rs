//! Brightness and contrast adjustments.
//!
//! Both operate independently on every channel of every pixel and
//! saturate at the ends of the `u8` range.

use crate::types::{RgbImage, SessionError};

/// Largest brightness offset in either direction. Anything beyond this
/// already saturates every channel.
pub const MAX_BRIGHTNESS_DELTA: i32 = 255;

/// Check a brightness offset.
///
/// # Errors
///
/// Returns [`SessionError::InvalidParameter`] if `delta` is outside
/// `-255..=255`.
pub fn validate_brightness(delta: i32) -> Result<(), SessionError> {
    if (-MAX_BRIGHTNESS_DELTA..=MAX_BRIGHTNESS_DELTA).contains(&delta) {
        Ok(())
    } else {
        Err(SessionError::invalid(format!(
            "brightness delta {delta} outside -{MAX_BRIGHTNESS_DELTA}..={MAX_BRIGHTNESS_DELTA}"
        )))
    }
}

/// Check a contrast gain.
///
/// # Errors
///
/// Returns [`SessionError::InvalidParameter`] if `factor` is negative,
/// NaN or infinite.
pub fn validate_contrast(factor: f64) -> Result<(), SessionError> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(SessionError::invalid(format!(
            "contrast factor {factor} must be finite and non-negative"
        )))
    }
}

/// Add `delta` to every channel, clamping to `[0, 255]`.
#[must_use = "returns the adjusted image"]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn brightness(image: &RgbImage, delta: i32) -> RgbImage {
    let mut out = image.clone();
    for channel in out.iter_mut() {
        *channel = (i32::from(*channel) + delta).clamp(0, 255) as u8;
    }
    out
}

/// Multiply every channel by `factor`, clamping to `[0, 255]` and
/// truncating toward zero.
#[must_use = "returns the adjusted image"]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn contrast(image: &RgbImage, factor: f64) -> RgbImage {
    let mut out = image.clone();
    for channel in out.iter_mut() {
        *channel = (f64::from(*channel) * factor).clamp(0.0, 255.0) as u8;
    }
    out
}
