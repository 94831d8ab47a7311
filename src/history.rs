//! Bounded linear undo/redo history of full-scene snapshots.
//!
//! The undo stack keeps at most `limit` entries and evicts the oldest first.
//! Recording a new entry always invalidates the redo stack.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::HISTORY_LIMIT;
use crate::element::Element;
use crate::snapshot::{Snapshot, SnapshotError};

#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl History {
    /// An empty history retaining at most `limit` undo entries (minimum 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), limit: limit.max(1) }
    }

    /// Push the pre-mutation scene and drop any redo entries.
    pub fn record(&mut self, before: Snapshot) {
        self.push_undo(before);
        self.redo.clear();
    }

    /// Restore the latest undo entry, parking `current` on the redo stack.
    ///
    /// Returns `Ok(None)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns the restore error; both stacks are untouched then.
    pub fn step_back(&mut self, current: Snapshot) -> Result<Option<Vec<Element>>, SnapshotError> {
        let Some(target) = self.undo.back() else {
            return Ok(None);
        };
        let restored = target.restore()?;
        self.undo.pop_back();
        self.redo.push(current);
        Ok(Some(restored))
    }

    /// Restore the latest redo entry, parking `current` on the undo stack.
    ///
    /// Returns `Ok(None)` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns the restore error; both stacks are untouched then.
    pub fn step_forward(&mut self, current: Snapshot) -> Result<Option<Vec<Element>>, SnapshotError> {
        let Some(target) = self.redo.last() else {
            return Ok(None);
        };
        let restored = target.restore()?;
        self.redo.pop();
        self.push_undo(current);
        Ok(Some(restored))
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}
