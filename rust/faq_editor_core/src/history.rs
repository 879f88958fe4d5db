//! Bounded, linear undo/redo log of buffer snapshots.
//!
//! The log is a timeline of [`Snapshot`]s plus a pointer at the one that
//! matches the live buffer. Entries after the pointer are redo states and are
//! dropped as soon as a new snapshot is saved; there is no redo tree.
//!
//! Capacity is enforced by evicting the oldest entry. When that happens the
//! pointer is *not* advanced: everything shifted left by one, so the same index
//! already names the newly appended snapshot.

use tracing::{debug, trace};

use crate::doc::{HistoryInfo, Snapshot};
use crate::selection::SelectionRange;

pub const DEFAULT_MAX_SIZE: usize = 50;
pub const DEFAULT_DESCRIPTION: &str = "Edit";

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    /// `None` while empty, otherwise `< entries.len()`.
    current: Option<usize>,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SIZE)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self { entries: Vec::new(), current: None, max_size }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Record a snapshot labelled with [`DEFAULT_DESCRIPTION`].
    pub fn save(&mut self, content: impl Into<String>, selection: SelectionRange) {
        self.save_state(content, selection, DEFAULT_DESCRIPTION);
    }

    /// Record the buffer and selection as the new current state.
    pub fn save_state(&mut self, content: impl Into<String>, selection: SelectionRange, description: impl Into<String>) {
        self.push(Snapshot::new(content, selection, description));
    }

    /// Append a prebuilt snapshot, discarding any redo tail first.
    pub fn push(&mut self, snapshot: Snapshot) {
        if let Some(idx) = self.current {
            if idx + 1 < self.entries.len() {
                trace!(dropped = self.entries.len() - idx - 1, "discarding redo states");
                self.entries.truncate(idx + 1);
            }
        }

        trace!(description = %snapshot.description, "saving history state");
        self.entries.push(snapshot);

        if self.entries.len() > self.max_size {
            let evicted = self.entries.remove(0);
            debug!(max_size = self.max_size, evicted = %evicted.description, "history full, evicted oldest state");
            if self.entries.is_empty() {
                self.current = None;
            }
        } else {
            self.current = Some(self.current.map_or(0, |i| i + 1));
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.current, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.current, Some(i) if i + 1 < self.entries.len())
    }

    /// Step back one state. `None` means there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let idx = self.current? - 1;
        self.current = Some(idx);
        self.entries.get(idx)
    }

    /// Step forward one state. `None` means there is nothing to redo.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        let idx = self.current? + 1;
        self.current = Some(idx);
        self.entries.get(idx)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    pub fn current_state(&self) -> Option<&Snapshot> {
        self.entries.get(self.current?)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    /// Label of the state `undo` would land on.
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries.get(self.current? - 1).map(|s| s.description.as_str())
    }

    /// Label of the state `redo` would land on.
    pub fn redo_description(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.entries.get(self.current? + 1).map(|s| s.description.as_str())
    }

    pub fn info(&self) -> HistoryInfo {
        HistoryInfo {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            history_size: self.entries.len(),
            current_index: self.current,
        }
    }
}
