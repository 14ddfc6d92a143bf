//! retouch-core: Interactive image-editing session (sans-IO).
//!
//! One image is loaded, then edited through a sequence of operations:
//! brightness -> contrast -> grayscale -> padding -> threshold -> blend,
//! in any order and any number of times. Each operation produces a
//! candidate image, which is previewed next to the active image and then
//! committed as a new snapshot. Snapshots sit on a bounded stack so the
//! most recent operations can be undone.
//!
//! This crate has **no I/O dependencies**. Loading, saving and previewing
//! are reached through the [`ImageSource`], [`ImageSink`] and [`Presenter`]
//! traits; filesystem implementations live in `retouch-io`.

pub mod adjust;
pub mod blend;
pub mod collaborator;
pub mod command;
pub mod grayscale;
pub mod history;
pub mod padding;
pub mod resize;
pub mod session;
pub mod stack;
pub mod transform;
pub mod types;

pub use blend::blend;
pub use collaborator::{ImageSink, ImageSource, NoPreview, Presenter};
pub use command::{Command, Overlay};
pub use history::{HistoryEntry, HistoryLog, OperationKind, OperationRecord};
pub use padding::{BorderType, Padding};
pub use resize::ResizeFilter;
pub use session::{Candidate, Edit, Outcome, Session, SessionState, UndoOutcome};
pub use stack::SessionStack;
pub use transform::{Transform, TransformFn, TransformKind, TransformRegistry};
pub use types::{Dimensions, RgbImage, SessionConfig, SessionError};
