//! Undo/Redo history of page snapshots
//!
//! Every structural change (a reflow, a pull, a page operation) records the
//! page list as it was before the change. Undo swaps the current pages for
//! the most recent snapshot.

use crate::document::Page;

/// Receives a snapshot before each structural change
pub trait UndoRecorder {
    fn snapshot(&mut self, label: &str, pages: &[Page]);
}

/// Recorder that keeps no history
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHistory;

impl UndoRecorder for NoHistory {
    fn snapshot(&mut self, _label: &str, _pages: &[Page]) {}
}

/// Page list captured before a change
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Description of the change that followed
    pub label: String,
    pub pages: Vec<Page>,
    /// Milliseconds since the epoch
    pub timestamp: u64,
}

impl Snapshot {
    pub fn new(label: impl Into<String>, pages: &[Page]) -> Self {
        Self {
            label: label.into(),
            pages: pages.to_vec(),
            timestamp: current_timestamp(),
        }
    }
}

/// Bounded undo/redo stacks
#[derive(Debug)]
pub struct UndoManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(20)
    }
}

impl UndoManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        self.trim();
    }

    fn trim(&mut self) {
        if self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..excess);
        }
    }

    /// Restore the most recent snapshot. `current` is kept for redo.
    pub fn undo(&mut self, current: &[Page]) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot::new(snapshot.label.clone(), current));
        log::debug!("undo: {}", snapshot.label);
        Some(snapshot)
    }

    /// Reapply the most recently undone change
    pub fn redo(&mut self, current: &[Page]) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot::new(snapshot.label.clone(), current));
        self.trim();
        log::debug!("redo: {}", snapshot.label);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the change the next undo would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|s| s.label.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl UndoRecorder for UndoManager {
    fn snapshot(&mut self, label: &str, pages: &[Page]) {
        // A new change invalidates anything undone before it
        self.redo_stack.clear();
        self.undo_stack.push(Snapshot::new(label, pages));
        self.trim();
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
