//! Shared types for the retouch editing session.

use serde::{Deserialize, Serialize};

use crate::resize::ResizeFilter;
use crate::transform::TransformKind;

/// Re-export `RgbImage` so downstream crates can hold session snapshots
/// without depending on `image` directly.
///
/// Every image that flows through a session has exactly three channels.
/// Grayscale results are replicated across R, G and B rather than stored
/// as single-channel buffers.
pub use image::RgbImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an existing image.
    #[must_use]
    pub fn of(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration for an editing session.
///
/// # Invariants
///
/// `capacity` must be at least 1: the stack always holds the active
/// image. [`SessionConfig::validate`] enforces this and
/// [`Session::open`](crate::Session::open) calls it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of snapshots retained for undo, including the
    /// active image. The oldest snapshot is evicted once exceeded.
    pub capacity: usize,

    /// Filter used to resize the overlay image in a blend when its
    /// dimensions differ from the active image.
    pub resize_filter: ResizeFilter,
}

impl SessionConfig {
    /// Default snapshot capacity.
    pub const DEFAULT_CAPACITY: usize = 20;

    /// Default overlay resize filter (bilinear).
    pub const DEFAULT_RESIZE_FILTER: ResizeFilter = ResizeFilter::Triangle;

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if `capacity` is zero.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.capacity == 0 {
            return Err(SessionError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            resize_filter: Self::DEFAULT_RESIZE_FILTER,
        }
    }
}

/// Errors raised by the session controller and its components.
///
/// Undo refusals ([`UndoOutcome::NothingToUndo`](crate::UndoOutcome) and
/// [`UndoOutcome::HistoryExpired`](crate::UndoOutcome)) are reported as
/// outcomes rather than errors. [`SessionError::NothingToUndo`] is only
/// produced by the stack itself and converted by the controller.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A parameter was outside the range accepted by its operation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The snapshot stack holds no image.
    #[error("session has no active image")]
    EmptySession,

    /// The stack holds a single snapshot, so there is nothing to revert.
    #[error("nothing to undo")]
    NothingToUndo,

    /// A candidate is already staged and must be committed or discarded
    /// before anything else happens.
    #[error("an operation is already pending; commit or discard it first")]
    CandidatePending,

    /// Commit or discard was requested with no staged candidate.
    #[error("no pending operation to commit or discard")]
    NoCandidate,

    /// The session was saved and closed; no further commands are accepted.
    #[error("session is closed")]
    SessionClosed,

    /// The registry has no function for this transform kind.
    #[error("no transform registered for {0}")]
    MissingTransform(TransformKind),

    /// Persisting the active image failed; the session stays open.
    #[error("failed to save image: {0}")]
    Save(String),

    /// Session configuration is invalid.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// Build an [`InvalidParameter`](Self::InvalidParameter) error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_of_image() {
        let img = RgbImage::new(17, 31);
        assert_eq!(
            Dimensions::of(&img),
            Dimensions {
                width: 17,
                height: 31
            }
        );
        assert_eq!(Dimensions::of(&img).to_string(), "17x31");
    }

    #[test]
    fn session_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.capacity, 20);
        assert_eq!(config.resize_filter, ResizeFilter::Triangle);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = SessionConfig {
            capacity: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn session_config_partial_json_fills_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"capacity": 5}"#).unwrap();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.resize_filter, SessionConfig::DEFAULT_RESIZE_FILTER);
    }

    #[test]
    fn session_config_serde_round_trip() {
        let config = SessionConfig {
            capacity: 3,
            resize_filter: ResizeFilter::Nearest,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn error_display_strings() {
        assert_eq!(
            SessionError::invalid("alpha 1.5 outside [0, 1]").to_string(),
            "invalid parameter: alpha 1.5 outside [0, 1]",
        );
        assert_eq!(SessionError::NothingToUndo.to_string(), "nothing to undo");
        assert_eq!(SessionError::SessionClosed.to_string(), "session is closed");
        assert_eq!(
            SessionError::MissingTransform(TransformKind::Pad).to_string(),
            "no transform registered for pad",
        );
    }
}
