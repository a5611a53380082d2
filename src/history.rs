//! Linear undo/redo over whole-scene snapshots.

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo stack, unbounded redo stack and the current state.
///
/// States are opaque serialized snapshots; comparing two of them is a plain
/// string comparison.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<String>,
    redo: Vec<String>,
    current: Option<String>,
    limit: usize,
}

impl History {
    /// Creates an empty history keeping at most `limit` undo steps (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            current: None,
            limit: limit.max(1),
        }
    }

    /// Records a new state. The previous state becomes an undo step and any
    /// redo branch is discarded.
    pub fn push(&mut self, state: String) {
        if let Some(previous) = self.current.take() {
            self.undo.push_back(previous);
            while self.undo.len() > self.limit {
                self.undo.pop_front();
            }
        }
        self.current = Some(state);
        self.redo.clear();
    }

    /// Steps back. Returns the state to restore, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&str> {
        let previous = self.undo.pop_back()?;
        if let Some(current) = self.current.take() {
            self.redo.push(current);
        }
        self.current = Some(previous);
        self.current.as_deref()
    }

    /// Steps forward again after an undo.
    pub fn redo(&mut self) -> Option<&str> {
        let next = self.redo.pop()?;
        if let Some(current) = self.current.take() {
            self.undo.push_back(current);
        }
        self.current = Some(next);
        self.current.as_deref()
    }

    /// Forgets every step and starts over from `present`.
    pub fn clear(&mut self, present: String) {
        self.undo.clear();
        self.redo.clear();
        self.current = Some(present);
    }

    /// Replaces the current state without touching either stack.
    pub fn set_current(&mut self, state: String) {
        self.current = Some(state);
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
