//! Weighted blend of two images.
//!
//! Computes `c = (1 - alpha) * a + alpha * b` per pixel per channel in
//! `f64`, then rounds and clamps to `u8`. The arithmetic is written out
//! explicitly so results are reproducible bit-for-bit; no library
//! weighted-add primitive is involved.
//!
//! When the overlay `b` does not match the base `a`, it is first resized to
//! `a`'s dimensions (see [`crate::resize`]). This is expected behavior, not
//! an error: the output always has exactly `a`'s dimensions.

use crate::resize::{ResizeFilter, fit_to};
use crate::types::{Dimensions, RgbImage, SessionError};

/// Check that `alpha` is a finite value in `[0, 1]`.
///
/// # Errors
///
/// Returns [`SessionError::InvalidParameter`] otherwise.
pub fn validate_alpha(alpha: f64) -> Result<(), SessionError> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(SessionError::invalid(format!(
            "blend alpha {alpha} outside [0, 1]"
        )))
    }
}

/// Blend `overlay` onto `base` with weight `alpha` on the overlay.
///
/// `alpha = 0` reproduces `base` exactly and `alpha = 1` reproduces the
/// (resized) overlay exactly.
///
/// # Errors
///
/// Returns [`SessionError::InvalidParameter`] if `alpha` is NaN or outside
/// `[0, 1]`.
pub fn blend(
    base: &RgbImage,
    overlay: &RgbImage,
    alpha: f64,
    filter: ResizeFilter,
) -> Result<RgbImage, SessionError> {
    validate_alpha(alpha)?;

    let overlay = fit_to(overlay, Dimensions::of(base), filter);
    let (width, height) = base.dimensions();

    let mut output = RgbImage::new(width, height);
    for ((out, a), b) in output
        .iter_mut()
        .zip(base.as_raw())
        .zip(overlay.as_raw())
    {
        *out = mix(*a, *b, alpha);
    }
    Ok(output)
}

/// Blend a single channel value.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
fn mix(a: u8, b: u8, alpha: f64) -> u8 {
    let value = (1.0 - alpha) * f64::from(a) + alpha * f64::from(b);
    value.round().clamp(0.0, 255.0) as u8
}
