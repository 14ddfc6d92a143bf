//! Bounded snapshot stack.
//!
//! Holds the most recent `capacity` snapshots of the edited image, oldest
//! first. The newest entry is always the active image and the stack never
//! becomes empty through its own API: [`undo`](SessionStack::undo) refuses
//! to remove the last entry, and only [`push`](SessionStack::push) past
//! capacity drops anything (the oldest entry, FIFO).
//!
//! The stack is generic over the snapshot type so its bookkeeping can be
//! tested without images.

use std::collections::VecDeque;

use crate::types::SessionError;

/// Bounded, ordered history of snapshots.
#[derive(Debug, Clone)]
pub struct SessionStack<T> {
    snapshots: VecDeque<T>,
    capacity: usize,
    evicted: usize,
}

// Never empty after `new`.
#[allow(clippy::len_without_is_empty)]
impl<T> SessionStack<T> {
    /// Create a stack holding `initial` as its only entry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if `capacity` is zero.
    pub fn new(initial: T, capacity: usize) -> Result<Self, SessionError> {
        if capacity == 0 {
            return Err(SessionError::InvalidConfig(
                "stack capacity must be at least 1".to_string(),
            ));
        }
        let mut snapshots = VecDeque::with_capacity(capacity.saturating_add(1));
        snapshots.push_back(initial);
        Ok(Self {
            snapshots,
            capacity,
            evicted: 0,
        })
    }

    /// Push a new active snapshot, evicting and returning the oldest one
    /// when capacity is exceeded.
    pub fn push(&mut self, snapshot: T) -> Option<T> {
        self.snapshots.push_back(snapshot);
        if self.snapshots.len() > self.capacity {
            self.evicted += 1;
            tracing::debug!(
                capacity = self.capacity,
                evicted = self.evicted,
                "evicting oldest snapshot"
            );
            return self.snapshots.pop_front();
        }
        None
    }

    /// The active snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptySession`] if the stack is empty.
    pub fn top(&self) -> Result<&T, SessionError> {
        self.snapshots.back().ok_or(SessionError::EmptySession)
    }

    /// Drop the active snapshot and return the one below it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NothingToUndo`] if exactly one entry remains
    /// (the stack is left unchanged), or [`SessionError::EmptySession`] if
    /// the stack is empty.
    pub fn undo(&mut self) -> Result<&T, SessionError> {
        match self.snapshots.len() {
            0 => Err(SessionError::EmptySession),
            1 => Err(SessionError::NothingToUndo),
            _ => {
                self.snapshots.pop_back();
                self.top()
            }
        }
    }

    /// Number of snapshots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Number of undo steps currently available.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.snapshots.len().saturating_sub(1)
    }

    /// Total number of snapshots evicted since creation.
    #[must_use]
    pub const fn evicted(&self) -> usize {
        self.evicted
    }

    /// Consume the stack, returning the active snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptySession`] if the stack is empty.
    pub fn into_top(mut self) -> Result<T, SessionError> {
        self.snapshots.pop_back().ok_or(SessionError::EmptySession)
    }

    /// Snapshots from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.snapshots.iter()
    }
}
