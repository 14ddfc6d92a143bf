//! Session controller.
//!
//! A [`Session`] owns the snapshot stack and the operation log and moves
//! between three states:
//!
//! - **Idle**: ready for a command.
//! - **Staging**: a candidate image has been computed and waits to be
//!   committed or discarded. Nothing else may happen until it is.
//! - **Closed**: the active image was saved. Every further command fails
//!   with [`SessionError::SessionClosed`].
//!
//! A failed request never changes the session: candidates are computed
//! from the active image without touching the stack, and the stack and log
//! are only updated together on commit.

use std::mem;
use std::path::{Path, PathBuf};

use crate::blend::blend;
use crate::collaborator::{ImageSink, Presenter};
use crate::command::{Command, Overlay};
use crate::history::{HistoryEntry, HistoryLog, OperationRecord};
use crate::stack::SessionStack;
use crate::transform::{Transform, TransformRegistry};
use crate::types::{Dimensions, RgbImage, SessionConfig, SessionError};

/// An operation that produces a new snapshot.
#[derive(Debug, Clone)]
pub enum Edit {
    /// Run a registered transform.
    Transform(Transform),
    /// Blend with another image.
    Blend {
        /// The image mixed in.
        overlay: Overlay,
        /// Weight of the overlay in `[0, 1]`.
        alpha: f64,
    },
}

impl From<Transform> for Edit {
    fn from(transform: Transform) -> Self {
        Self::Transform(transform)
    }
}

/// A computed result awaiting commit.
#[derive(Debug, Clone)]
pub struct Candidate {
    image: RgbImage,
    record: OperationRecord,
}

impl Candidate {
    /// The candidate image.
    #[must_use]
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// The log entry committing it would add.
    #[must_use]
    pub const fn record(&self) -> &OperationRecord {
        &self.record
    }
}

/// Result of an undo request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The most recent operation was reverted.
    Undone(OperationRecord),
    /// No operation has been committed.
    NothingToUndo,
    /// Operations remain in the log, but the snapshots needed to revert
    /// them were evicted.
    HistoryExpired {
        /// Number of log entries that can no longer be undone.
        expired: usize,
    },
}

/// Result of [`Session::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An operation was committed.
    Committed(OperationRecord),
    /// An undo was attempted.
    Undo(UndoOutcome),
    /// The operation log, oldest first.
    History(Vec<HistoryEntry>),
    /// The active image was written and the session closed.
    Saved(PathBuf),
}

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for a command.
    Idle,
    /// A candidate is waiting for commit or discard.
    Staging,
    /// Saved; no further commands are accepted.
    Closed,
}

#[derive(Debug)]
enum State {
    Idle,
    Staging(Candidate),
    Closed,
}

/// An interactive editing session over one image.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    registry: TransformRegistry,
    stack: SessionStack<RgbImage>,
    history: HistoryLog,
    state: State,
}

impl Session {
    /// Start a session on `image` with the built-in transforms.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if `config` is invalid.
    pub fn open(image: RgbImage, config: SessionConfig) -> Result<Self, SessionError> {
        Self::with_registry(image, config, TransformRegistry::builtin())
    }

    /// Start a session that dispatches transforms through `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if `config` is invalid.
    pub fn with_registry(
        image: RgbImage,
        config: SessionConfig,
        registry: TransformRegistry,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        tracing::info!(
            dimensions = %Dimensions::of(&image),
            capacity = config.capacity,
            "session opened"
        );
        let stack = SessionStack::new(image, config.capacity)?;
        Ok(Self {
            config,
            registry,
            stack,
            history: HistoryLog::new(),
            state: State::Idle,
        })
    }

    /// The configuration this session was opened with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        match self.state {
            State::Idle => SessionState::Idle,
            State::Staging(_) => SessionState::Staging,
            State::Closed => SessionState::Closed,
        }
    }

    /// The active image.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptySession`] if the stack is empty, which
    /// cannot happen for a session built with [`open`](Self::open).
    pub fn active(&self) -> Result<&RgbImage, SessionError> {
        self.stack.top()
    }

    /// Number of snapshots currently retained.
    #[must_use]
    pub fn snapshots(&self) -> usize {
        self.stack.len()
    }

    /// Number of operations that can currently be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.stack.undo_depth()
    }

    /// The staged candidate, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&Candidate> {
        match &self.state {
            State::Staging(candidate) => Some(candidate),
            State::Idle | State::Closed => None,
        }
    }

    /// Compute a candidate for `edit` and hold it until
    /// [`commit`](Self::commit) or [`discard`](Self::discard).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionClosed`] or
    /// [`SessionError::CandidatePending`] if the session is not idle, or
    /// any error from validating or running the edit. On error the session
    /// is unchanged.
    pub fn stage(&mut self, edit: Edit) -> Result<&Candidate, SessionError> {
        self.ensure_idle()?;
        let candidate = self.render(&edit)?;
        tracing::debug!(operation = %candidate.record, "candidate staged");
        self.state = State::Staging(candidate);
        self.pending().ok_or(SessionError::NoCandidate)
    }

    /// Commit the staged candidate: push it onto the stack and append its
    /// record to the log.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoCandidate`] when idle or
    /// [`SessionError::SessionClosed`] when closed.
    pub fn commit(&mut self) -> Result<OperationRecord, SessionError> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Staging(candidate) => Ok(self.push(candidate)),
            State::Idle => Err(SessionError::NoCandidate),
            State::Closed => {
                self.state = State::Closed;
                Err(SessionError::SessionClosed)
            }
        }
    }

    /// Drop the staged candidate, leaving the stack and log as they were.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoCandidate`] when idle or
    /// [`SessionError::SessionClosed`] when closed.
    pub fn discard(&mut self) -> Result<Candidate, SessionError> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Staging(candidate) => {
                tracing::debug!(operation = %candidate.record, "candidate discarded");
                Ok(candidate)
            }
            State::Idle => Err(SessionError::NoCandidate),
            State::Closed => {
                self.state = State::Closed;
                Err(SessionError::SessionClosed)
            }
        }
    }

    /// Compute a candidate for `edit`, show it next to the active image
    /// and commit it.
    ///
    /// # Errors
    ///
    /// Same as [`stage`](Self::stage). On error the session is unchanged
    /// and the presenter is not called.
    pub fn apply<P>(&mut self, edit: Edit, presenter: &mut P) -> Result<OperationRecord, SessionError>
    where
        P: Presenter + ?Sized,
    {
        self.ensure_idle()?;
        let candidate = self.render(&edit)?;
        presenter.present(self.stack.top()?, &candidate.image, &candidate.record.description);
        Ok(self.push(candidate))
    }

    /// Revert the most recent committed operation.
    ///
    /// Refusals are reported as [`UndoOutcome`] values and leave the
    /// session unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionClosed`] or
    /// [`SessionError::CandidatePending`] if the session is not idle.
    pub fn undo(&mut self) -> Result<UndoOutcome, SessionError> {
        self.ensure_idle()?;
        match self.stack.undo() {
            Ok(_) => {}
            Err(SessionError::NothingToUndo) => {
                let outcome = if self.history.is_empty() {
                    UndoOutcome::NothingToUndo
                } else {
                    UndoOutcome::HistoryExpired {
                        expired: self.history.expired(self.stack.undo_depth()),
                    }
                };
                tracing::debug!(?outcome, "undo refused");
                return Ok(outcome);
            }
            Err(err) => return Err(err),
        }
        // Every retained undo step has a log record, so this only fails if
        // the two were mutated separately.
        let record = self.history.pop().ok_or(SessionError::EmptySession)?;
        tracing::debug!(
            operation = %record,
            remaining = self.stack.undo_depth(),
            "undone"
        );
        Ok(UndoOutcome::Undone(record))
    }

    /// The operation log, oldest first, with expired entries marked.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.entries(self.stack.undo_depth())
    }

    /// Write the active image to `path` through `sink` and close the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionClosed`] or
    /// [`SessionError::CandidatePending`] if the session is not idle, and
    /// [`SessionError::Save`] if the sink fails, in which case the session
    /// stays open.
    pub fn save<S>(&mut self, sink: &mut S, path: &Path) -> Result<(), SessionError>
    where
        S: ImageSink + ?Sized,
    {
        self.ensure_idle()?;
        sink.save(self.stack.top()?, path)
            .map_err(|err| SessionError::Save(err.to_string()))?;
        self.state = State::Closed;
        tracing::info!(path = %path.display(), operations = self.history.len(), "session saved");
        Ok(())
    }

    /// Run one command.
    ///
    /// Transforms and blends are applied and committed immediately, with
    /// `presenter` shown the before/after pair. `sink` is only used by
    /// [`Command::SaveExit`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionClosed`] for any command once the
    /// session is closed, otherwise whatever the underlying operation
    /// reports.
    pub fn execute<P, S>(
        &mut self,
        command: Command,
        presenter: &mut P,
        sink: &mut S,
    ) -> Result<Outcome, SessionError>
    where
        P: Presenter + ?Sized,
        S: ImageSink + ?Sized,
    {
        if matches!(self.state, State::Closed) {
            return Err(SessionError::SessionClosed);
        }
        tracing::debug!(command = command.name(), "executing");
        if let Some(transform) = command.transform() {
            return self
                .apply(Edit::Transform(transform), presenter)
                .map(Outcome::Committed);
        }
        match command {
            Command::Blend { overlay, alpha } => self
                .apply(Edit::Blend { overlay, alpha }, presenter)
                .map(Outcome::Committed),
            Command::Undo => self.undo().map(Outcome::Undo),
            Command::ViewHistory => Ok(Outcome::History(self.history())),
            Command::SaveExit { path } => {
                self.save(sink, &path)?;
                Ok(Outcome::Saved(path))
            }
            Command::Brightness { .. }
            | Command::Contrast { .. }
            | Command::Grayscale
            | Command::Pad(_)
            | Command::Threshold { .. } => Err(SessionError::invalid(format!(
                "{} did not resolve to a transform",
                command.name()
            ))),
        }
    }

    /// End the session and take the active image.
    ///
    /// Any staged candidate is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptySession`] if the stack is empty.
    pub fn close(self) -> Result<RgbImage, SessionError> {
        self.stack.into_top()
    }

    const fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.state {
            State::Idle => Ok(()),
            State::Staging(_) => Err(SessionError::CandidatePending),
            State::Closed => Err(SessionError::SessionClosed),
        }
    }

    fn render(&self, edit: &Edit) -> Result<Candidate, SessionError> {
        let before = self.stack.top()?;
        match edit {
            Edit::Transform(transform) => Ok(Candidate {
                image: self.registry.apply(before, transform)?,
                record: OperationRecord::transform(transform),
            }),
            Edit::Blend { overlay, alpha } => Ok(Candidate {
                image: blend(before, &overlay.image, *alpha, self.config.resize_filter)?,
                record: OperationRecord::blend(&overlay.label, *alpha),
            }),
        }
    }

    fn push(&mut self, candidate: Candidate) -> OperationRecord {
        let Candidate { image, record } = candidate;
        let dimensions = Dimensions::of(&image);
        self.stack.push(image);
        self.history.append(record.clone());
        tracing::info!(
            operation = %record,
            %dimensions,
            snapshots = self.stack.len(),
            evicted = self.stack.evicted(),
            "committed"
        );
        record
    }
}
