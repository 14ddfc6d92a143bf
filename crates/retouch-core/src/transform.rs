//! Transform dispatch.
//!
//! A [`Transform`] is a requested pixel operation together with its
//! parameters. The [`TransformRegistry`] maps each [`TransformKind`] to a
//! pure function `(image, transform) -> image` and is the only way the
//! session controller runs a transform.
//!
//! # Strategy table
//!
//! The built-in kernels live in [`crate::adjust`], [`crate::grayscale`]
//! and [`crate::padding`]. A registry can be built empty and filled with
//! other implementations (for instance instrumented or failing ones in
//! tests) without touching the controller.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::padding::Padding;
use crate::types::{RgbImage, SessionError};

/// Identifies a transform independently of its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    /// Add a constant to every channel.
    Brightness,
    /// Multiply every channel by a gain.
    Contrast,
    /// Replace colour with replicated luminance.
    Grayscale,
    /// Grow the image with a border.
    Pad,
    /// Binary threshold on luminance.
    Threshold,
}

impl TransformKind {
    /// All kinds, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Brightness,
        Self::Contrast,
        Self::Grayscale,
        Self::Pad,
        Self::Threshold,
    ];
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness => f.write_str("brightness"),
            Self::Contrast => f.write_str("contrast"),
            Self::Grayscale => f.write_str("grayscale"),
            Self::Pad => f.write_str("pad"),
            Self::Threshold => f.write_str("threshold"),
        }
    }
}

/// A transform request with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Brightness offset in `-255..=255`.
    Brightness {
        /// Value added to every channel.
        delta: i32,
    },
    /// Contrast gain, finite and non-negative.
    Contrast {
        /// Multiplier applied to every channel.
        factor: f64,
    },
    /// Grayscale conversion.
    Grayscale,
    /// Border padding.
    Pad(Padding),
    /// Binary threshold.
    Threshold {
        /// Luminance cut-off in `0..=255`.
        level: i32,
        /// Swap black and white in the output.
        inverse: bool,
    },
}

impl Transform {
    /// The kind used for registry lookup.
    #[must_use]
    pub const fn kind(&self) -> TransformKind {
        match self {
            Self::Brightness { .. } => TransformKind::Brightness,
            Self::Contrast { .. } => TransformKind::Contrast,
            Self::Grayscale => TransformKind::Grayscale,
            Self::Pad(_) => TransformKind::Pad,
            Self::Threshold { .. } => TransformKind::Threshold,
        }
    }

    /// Range-check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidParameter`] describing the first
    /// out-of-range parameter.
    pub fn validate(&self) -> Result<(), SessionError> {
        match self {
            Self::Brightness { delta } => crate::adjust::validate_brightness(*delta),
            Self::Contrast { factor } => crate::adjust::validate_contrast(*factor),
            Self::Grayscale => Ok(()),
            Self::Pad(padding) => padding.validate(),
            Self::Threshold { level, .. } => crate::grayscale::validate_threshold(*level).map(drop),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness { delta } => write!(f, "brightness {delta:+}"),
            Self::Contrast { factor } => write!(f, "contrast ×{factor:.2}"),
            Self::Grayscale => f.write_str("grayscale"),
            Self::Pad(padding) => fmt::Display::fmt(padding, f),
            Self::Threshold { level, inverse } => {
                write!(f, "threshold {level}")?;
                if *inverse {
                    f.write_str(" INV")?;
                }
                Ok(())
            }
        }
    }
}

/// Signature shared by every registered transform.
///
/// Implementations must not mutate their input and may assume the
/// transform has already been validated.
pub type TransformFn = fn(&RgbImage, &Transform) -> Result<RgbImage, SessionError>;

/// Maps transform kinds to their implementations.
#[derive(Clone)]
pub struct TransformRegistry {
    table: HashMap<TransformKind, TransformFn>,
}

impl TransformRegistry {
    /// A registry with no transforms.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// A registry with the built-in kernel for every [`TransformKind`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(TransformKind::Brightness, builtin_brightness);
        registry.register(TransformKind::Contrast, builtin_contrast);
        registry.register(TransformKind::Grayscale, builtin_grayscale);
        registry.register(TransformKind::Pad, builtin_pad);
        registry.register(TransformKind::Threshold, builtin_threshold);
        registry
    }

    /// Install `function` for `kind`, returning the one it replaces.
    pub fn register(&mut self, kind: TransformKind, function: TransformFn) -> Option<TransformFn> {
        self.table.insert(kind, function)
    }

    /// The function registered for `kind`, if any.
    #[must_use]
    pub fn lookup(&self, kind: TransformKind) -> Option<TransformFn> {
        self.table.get(&kind).copied()
    }

    /// Validate `transform` and run its registered function on `image`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidParameter`] if validation fails,
    /// [`SessionError::MissingTransform`] if nothing is registered for the
    /// kind, or whatever error the function itself reports.
    pub fn apply(&self, image: &RgbImage, transform: &Transform) -> Result<RgbImage, SessionError> {
        transform.validate()?;
        let kind = transform.kind();
        let function = self
            .lookup(kind)
            .ok_or(SessionError::MissingTransform(kind))?;
        function(image, transform)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.table.keys().map(ToString::to_string).collect();
        kinds.sort_unstable();
        f.debug_struct("TransformRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

fn mismatch(expected: TransformKind, got: &Transform) -> SessionError {
    SessionError::invalid(format!(
        "{expected} transform invoked with {} parameters",
        got.kind()
    ))
}

fn builtin_brightness(image: &RgbImage, transform: &Transform) -> Result<RgbImage, SessionError> {
    match transform {
        Transform::Brightness { delta } => Ok(crate::adjust::brightness(image, *delta)),
        other => Err(mismatch(TransformKind::Brightness, other)),
    }
}

fn builtin_contrast(image: &RgbImage, transform: &Transform) -> Result<RgbImage, SessionError> {
    match transform {
        Transform::Contrast { factor } => Ok(crate::adjust::contrast(image, *factor)),
        other => Err(mismatch(TransformKind::Contrast, other)),
    }
}

fn builtin_grayscale(image: &RgbImage, transform: &Transform) -> Result<RgbImage, SessionError> {
    match transform {
        Transform::Grayscale => Ok(crate::grayscale::grayscale(image)),
        other => Err(mismatch(TransformKind::Grayscale, other)),
    }
}

fn builtin_pad(image: &RgbImage, transform: &Transform) -> Result<RgbImage, SessionError> {
    match transform {
        Transform::Pad(padding) => crate::padding::pad(image, padding),
        other => Err(mismatch(TransformKind::Pad, other)),
    }
}

fn builtin_threshold(image: &RgbImage, transform: &Transform) -> Result<RgbImage, SessionError> {
    match transform {
        Transform::Threshold { level, inverse } => {
            let level = crate::grayscale::validate_threshold(*level)?;
            Ok(crate::grayscale::threshold(image, level, *inverse))
        }
        other => Err(mismatch(TransformKind::Threshold, other)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::padding::BorderType;

    fn solid() -> RgbImage {
        RgbImage::from_pixel(4, 4, image::Rgb([100, 150, 200]))
    }

    #[test]
    fn builtin_covers_every_kind() {
        let registry = TransformRegistry::builtin();
        for kind in TransformKind::ALL {
            assert!(registry.lookup(kind).is_some(), "missing {kind}");
        }
    }

    #[test]
    fn apply_dispatches_by_kind() {
        let registry = TransformRegistry::default();
        let out = registry
            .apply(&solid(), &Transform::Brightness { delta: 10 })
            .unwrap();
        assert!(out.pixels().all(|p| p.0 == [110, 160, 210]));
    }

    #[test]
    fn apply_validates_before_dispatch() {
        let registry = TransformRegistry::default();
        let result = registry.apply(
            &solid(),
            &Transform::Threshold {
                level: 300,
                inverse: false,
            },
        );
        assert!(matches!(result, Err(SessionError::InvalidParameter(_))));
    }

    #[test]
    fn empty_registry_reports_missing_transform() {
        let registry = TransformRegistry::empty();
        let result = registry.apply(&solid(), &Transform::Grayscale);
        assert!(matches!(
            result,
            Err(SessionError::MissingTransform(TransformKind::Grayscale))
        ));
    }

    #[test]
    fn register_replaces_existing() {
        fn invert(image: &RgbImage, _: &Transform) -> Result<RgbImage, SessionError> {
            let mut out = image.clone();
            image::imageops::invert(&mut out);
            Ok(out)
        }

        let mut registry = TransformRegistry::builtin();
        assert!(registry.register(TransformKind::Grayscale, invert).is_some());
        let out = registry.apply(&solid(), &Transform::Grayscale).unwrap();
        assert!(out.pixels().all(|p| p.0 == [155, 105, 55]));
    }

    #[test]
    fn kernel_rejects_foreign_parameters() {
        let result = builtin_pad(&solid(), &Transform::Grayscale);
        assert!(matches!(result, Err(SessionError::InvalidParameter(_))));
    }

    #[test]
    fn descriptions() {
        assert_eq!(
            Transform::Brightness { delta: 50 }.to_string(),
            "brightness +50"
        );
        assert_eq!(
            Transform::Brightness { delta: -5 }.to_string(),
            "brightness -5"
        );
        assert_eq!(
            Transform::Contrast { factor: 1.2 }.to_string(),
            "contrast ×1.20"
        );
        assert_eq!(Transform::Grayscale.to_string(), "grayscale");
        assert_eq!(
            Transform::Threshold {
                level: 128,
                inverse: true
            }
            .to_string(),
            "threshold 128 INV"
        );
        assert_eq!(
            Transform::Pad(Padding {
                top: 5,
                bottom: 5,
                left: 0,
                right: 0,
                border: BorderType::Constant([0, 0, 0]),
            })
            .to_string(),
            "padded 5,5,0,0 type=CONST"
        );
    }
}
