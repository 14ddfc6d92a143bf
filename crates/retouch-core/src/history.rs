//! Operation log kept alongside the snapshot stack.
//!
//! One [`OperationRecord`] is appended per committed operation and popped
//! per successful undo, so the newest record always describes how the
//! active image was produced. The log itself is unbounded; the stack is
//! not. Once the stack has evicted the snapshot an older record started
//! from, that record is *expired*: it is still listed but can no longer be
//! undone. With `n` records and `d` available undo steps on the stack, the
//! first `n - d` records are expired.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::transform::{Transform, TransformKind};

/// What kind of operation produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    /// A registered pixel transform.
    Transform(TransformKind),
    /// A blend with a second image.
    Blend,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform(kind) => fmt::Display::fmt(kind, f),
            Self::Blend => f.write_str("blend"),
        }
    }
}

/// Human-readable description of one committed operation.
///
/// Carries no executable state; it exists for display and undo labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Operation kind.
    pub kind: OperationKind,
    /// Description including parameters, e.g. `contrast ×1.20`.
    pub description: String,
}

impl OperationRecord {
    /// Record for a transform.
    #[must_use]
    pub fn transform(transform: &Transform) -> Self {
        Self {
            kind: OperationKind::Transform(transform.kind()),
            description: transform.to_string(),
        }
    }

    /// Record for a blend with the image labelled `source`.
    #[must_use]
    pub fn blend(source: &str, alpha: f64) -> Self {
        Self {
            kind: OperationKind::Blend,
            description: format!("blend '{source}' α={alpha:.2}"),
        }
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// One line of the history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based position in the log.
    pub index: usize,
    /// The recorded operation.
    pub record: OperationRecord,
    /// Whether undo can still reach this entry.
    pub undoable: bool,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.index, self.record)?;
        if !self.undoable {
            f.write_str(" (expired)")?;
        }
        Ok(())
    }
}

/// Ordered, unbounded log of committed operations.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    records: Vec<OperationRecord>,
}

impl HistoryLog {
    /// An empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a committed operation.
    pub fn append(&mut self, record: OperationRecord) {
        self.records.push(record);
    }

    /// Remove and return the newest record.
    pub fn pop(&mut self) -> Option<OperationRecord> {
        self.records.pop()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose undo path has been evicted, given how many undo steps
    /// the stack still holds.
    #[must_use]
    pub fn expired(&self, undo_depth: usize) -> usize {
        self.records.len().saturating_sub(undo_depth)
    }

    /// Numbered view of the log, marking expired records.
    #[must_use]
    pub fn entries(&self, undo_depth: usize) -> Vec<HistoryEntry> {
        let expired = self.expired(undo_depth);
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| HistoryEntry {
                index: i + 1,
                record: record.clone(),
                undoable: i >= expired,
            })
            .collect()
    }
}
