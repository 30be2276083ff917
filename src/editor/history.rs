//! Undo/redo history of document versions.
//!
//! Because the rope is persistent, a version is just a root handle: recording
//! one costs a reference count, not a copy.

use std::collections::VecDeque;

/// Two stacks of prior versions.
#[derive(Debug)]
pub(crate) struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    /// Maximum undo depth (0 = unlimited).
    limit: usize,
}

impl<T> History<T> {
    pub(crate) const fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Record the version that a mutation is about to replace.
    pub(crate) fn record(&mut self, previous: T) {
        self.redo.clear();
        self.push_undo(previous);
    }

    /// Swap `current` with the most recent undo entry.
    pub(crate) fn undo(&mut self, current: &mut T) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(std::mem::replace(current, previous));
        true
    }

    /// Swap `current` with the most recent redo entry.
    pub(crate) fn redo(&mut self, current: &mut T) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let previous = std::mem::replace(current, next);
        self.push_undo(previous);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    fn push_undo(&mut self, version: T) {
        self.undo.push_back(version);
        if self.limit > 0 && self.undo.len() > self.limit {
            self.undo.pop_front();
            tracing::debug!(limit = self.limit, "undo history full, dropped oldest version");
        }
    }
}
