//! retouch-io: Filesystem and preview I/O for retouch.
//!
//! Implements the collaborator traits of `retouch-core`: loading and
//! saving images on disk, and presenting before/after previews either as
//! side-by-side PNG files or as log events.

pub mod codec;
pub mod preview;

pub use codec::{CodecError, FsCodec, decode};
pub use preview::{LogPresenter, PreviewWriter, side_by_side};
