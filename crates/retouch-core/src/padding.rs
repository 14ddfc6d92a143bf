//! Border padding with selectable extrapolation.
//!
//! Grows an image by a number of pixels on each side. The new border
//! pixels are either a constant colour or extrapolated from the image
//! itself. With `abcdefgh` as one source row:
//!
//! ```text
//! Constant    iiiiii|abcdefgh|iiiiiii
//! Reflect     fedcba|abcdefgh|hgfedcb
//! Reflect101  gfedcb|abcdefgh|gfedcba
//! Replicate   aaaaaa|abcdefgh|hhhhhhh
//! Wrap        cdefgh|abcdefgh|abcdefg
//! ```
//!
//! Borders wider than the image keep reflecting (or wrapping) back and
//! forth, so any padding up to [`MAX_PADDING`] is valid regardless of
//! image size.

use std::fmt;

use crate::types::{RgbImage, SessionError};

/// Largest padding accepted on any single side, in pixels.
pub const MAX_PADDING: u32 = 4096;

/// How border pixels are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderType {
    /// Fill with a fixed RGB colour.
    Constant([u8; 3]),
    /// Mirror including the edge pixel.
    Reflect,
    /// Mirror excluding the edge pixel.
    Reflect101,
    /// Repeat the edge pixel.
    Replicate,
    /// Tile the image.
    Wrap,
}

impl BorderType {
    /// Menu index of each border type, in the order the operator sees them.
    pub const NAMES: [&'static str; 5] = ["CONST", "REFLECT", "REFLECT101", "REPLICATE", "WRAP"];

    /// Select a border type by menu index (0-4).
    ///
    /// `color` is only used for index 0 ([`Constant`](Self::Constant)).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidParameter`] for any other index.
    pub fn from_index(index: u32, color: [u8; 3]) -> Result<Self, SessionError> {
        match index {
            0 => Ok(Self::Constant(color)),
            1 => Ok(Self::Reflect),
            2 => Ok(Self::Reflect101),
            3 => Ok(Self::Replicate),
            4 => Ok(Self::Wrap),
            other => Err(SessionError::invalid(format!(
                "border type {other} is not one of 0-4"
            ))),
        }
    }
}

impl fmt::Display for BorderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constant(_) => Self::NAMES[0],
            Self::Reflect => Self::NAMES[1],
            Self::Reflect101 => Self::NAMES[2],
            Self::Replicate => Self::NAMES[3],
            Self::Wrap => Self::NAMES[4],
        };
        f.write_str(name)
    }
}

/// Padding amounts for each side plus the border type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    /// Rows added above the image.
    pub top: u32,
    /// Rows added below the image.
    pub bottom: u32,
    /// Columns added left of the image.
    pub left: u32,
    /// Columns added right of the image.
    pub right: u32,
    /// How the new pixels are filled.
    pub border: BorderType,
}

impl Padding {
    /// Check that no side exceeds [`MAX_PADDING`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidParameter`] naming the first
    /// offending side.
    pub fn validate(&self) -> Result<(), SessionError> {
        let sides = [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ];
        for (side, amount) in sides {
            if amount > MAX_PADDING {
                return Err(SessionError::invalid(format!(
                    "{side} padding {amount} exceeds {MAX_PADDING}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "padded {},{},{},{} type={}",
            self.top, self.bottom, self.left, self.right, self.border
        )
    }
}

/// Pad `image` on each side according to `padding`.
///
/// # Errors
///
/// Returns [`SessionError::InvalidParameter`] if the padding is invalid or
/// the padded dimensions do not fit in `u32`.
pub fn pad(image: &RgbImage, padding: &Padding) -> Result<RgbImage, SessionError> {
    padding.validate()?;

    let (width, height) = image.dimensions();
    let out_width = width
        .checked_add(padding.left)
        .and_then(|w| w.checked_add(padding.right))
        .ok_or_else(|| SessionError::invalid("padded width overflows"))?;
    let out_height = height
        .checked_add(padding.top)
        .and_then(|h| h.checked_add(padding.bottom))
        .ok_or_else(|| SessionError::invalid("padded height overflows"))?;

    let fill = match padding.border {
        BorderType::Constant(color) => image::Rgb(color),
        _ => image::Rgb([0, 0, 0]),
    };

    let columns = index_table(out_width, padding.left, width, padding.border);
    let rows = index_table(out_height, padding.top, height, padding.border);

    Ok(RgbImage::from_fn(out_width, out_height, |x, y| {
        match (columns[x as usize], rows[y as usize]) {
            (Some(sx), Some(sy)) => *image.get_pixel(sx, sy),
            _ => fill,
        }
    }))
}

/// Source index for each of the `out_len` output positions along one axis.
fn index_table(out_len: u32, before: u32, len: u32, border: BorderType) -> Vec<Option<u32>> {
    (0..out_len)
        .map(|i| source_index(i64::from(i) - i64::from(before), len, border))
        .collect()
}

/// Map a possibly out-of-range coordinate back into `0..len`.
///
/// Returns `None` when the pixel comes from the constant fill. Reflections
/// repeat with period `2 * len` (`2 * len - 2` without the edge pixel), so
/// the offset is folded with a single `rem_euclid`.
fn source_index(p: i64, len: u32, border: BorderType) -> Option<u32> {
    let len = i64::from(len);
    if (0..len).contains(&p) {
        return u32::try_from(p).ok();
    }
    if len == 0 {
        return None;
    }

    let mapped = match border {
        BorderType::Constant(_) => return None,
        BorderType::Replicate => p.clamp(0, len - 1),
        BorderType::Wrap => p.rem_euclid(len),
        BorderType::Reflect101 if len == 1 => 0,
        BorderType::Reflect => {
            let period = 2 * len;
            let m = p.rem_euclid(period);
            if m < len { m } else { period - 1 - m }
        }
        BorderType::Reflect101 => {
            let period = 2 * len - 2;
            let m = p.rem_euclid(period);
            if m < len { m } else { period - m }
        }
    };
    u32::try_from(mapped).ok()
}
