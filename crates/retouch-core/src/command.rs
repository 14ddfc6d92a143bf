//! Commands accepted by [`Session::execute`](crate::Session::execute).

use std::fmt;
use std::path::PathBuf;

use crate::padding::Padding;
use crate::transform::Transform;
use crate::types::{Dimensions, RgbImage};

/// A second image to blend with, already loaded.
#[derive(Clone)]
pub struct Overlay {
    /// Where the image came from; shown in the history entry.
    pub label: String,
    /// The decoded image.
    pub image: RgbImage,
}

impl Overlay {
    /// Pair a loaded image with its source label.
    pub fn new(label: impl Into<String>, image: RgbImage) -> Self {
        Self {
            label: label.into(),
            image,
        }
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("label", &self.label)
            .field("dimensions", &Dimensions::of(&self.image))
            .finish()
    }
}

/// One user request, with its parameters.
#[derive(Debug, Clone)]
pub enum Command {
    /// Add `delta` to every channel.
    Brightness {
        /// Offset in `-255..=255`.
        delta: i32,
    },
    /// Scale every channel by `factor`.
    Contrast {
        /// Non-negative gain.
        factor: f64,
    },
    /// Convert to grayscale.
    Grayscale,
    /// Add a border.
    Pad(Padding),
    /// Binary threshold on luminance.
    Threshold {
        /// Cut-off in `0..=255`.
        level: i32,
        /// Swap black and white.
        inverse: bool,
    },
    /// Blend with another image.
    Blend {
        /// The image mixed in.
        overlay: Overlay,
        /// Weight of the overlay in `[0, 1]`.
        alpha: f64,
    },
    /// Revert the most recent committed operation.
    Undo,
    /// List the operation log.
    ViewHistory,
    /// Write the active image and close the session.
    SaveExit {
        /// Output file.
        path: PathBuf,
    },
}

impl Command {
    /// The pixel transform this command requests, if it is one.
    #[must_use]
    pub fn transform(&self) -> Option<Transform> {
        match self {
            Self::Brightness { delta } => Some(Transform::Brightness { delta: *delta }),
            Self::Contrast { factor } => Some(Transform::Contrast { factor: *factor }),
            Self::Grayscale => Some(Transform::Grayscale),
            Self::Pad(padding) => Some(Transform::Pad(*padding)),
            Self::Threshold { level, inverse } => Some(Transform::Threshold {
                level: *level,
                inverse: *inverse,
            }),
            Self::Blend { .. } | Self::Undo | Self::ViewHistory | Self::SaveExit { .. } => None,
        }
    }

    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Brightness { .. } => "brightness",
            Self::Contrast { .. } => "contrast",
            Self::Grayscale => "grayscale",
            Self::Pad(_) => "pad",
            Self::Threshold { .. } => "threshold",
            Self::Blend { .. } => "blend",
            Self::Undo => "undo",
            Self::ViewHistory => "history",
            Self::SaveExit { .. } => "save",
        }
    }
}
