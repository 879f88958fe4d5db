pub mod config;
pub mod doc;
pub mod error;
pub mod history;
pub mod ops;
pub mod selection;
pub mod toggle;

use tracing::debug;

pub use config::EditorConfig;
pub use doc::{HistoryInfo, Snapshot, TagPair, ToggleAction, ToggleResult};
pub use error::{EditorError, Result};
pub use history::History;
pub use ops::{FormatCommand, Operation};
pub use selection::SelectionRange;
pub use toggle::{toggle, toggle_with, ToggleOptions};

use selection::char_len;

pub const INITIAL_STATE: &str = "Initial state";
pub const CONTENT_CHANGE: &str = "Content change";
pub const TEXT_FORMATTING: &str = "Text formatting";

/// One document open in the editor: its live buffer, selection and history.
///
/// Every buffer change goes through [`EditSession::apply`]; only
/// [`Operation::UserEdit`] records a snapshot. Typing is debounced: keystrokes
/// update the buffer and are recorded once the host reports enough idle time.
#[derive(Debug)]
pub struct EditSession {
    content: String,
    selection: SelectionRange,
    history: History,
    config: EditorConfig,
    /// Time of the last unrecorded keystroke.
    last_typed_at: Option<u64>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            content: String::new(),
            selection: SelectionRange::default(),
            history: History::with_capacity(config.max_history),
            config,
            last_typed_at: None,
        }
    }

    pub fn from_json_config(json: &str) -> Result<Self> {
        Ok(Self::new(EditorConfig::from_json(json)?))
    }

    /// Start editing a different document. History never carries over.
    pub fn load_document(&mut self, content: impl Into<String>) {
        self.history.clear();
        self.last_typed_at = None;
        self.content = content.into();
        self.selection = SelectionRange::caret(0);
        self.history.save_state(self.content.clone(), self.selection, INITIAL_STATE);
        debug!(chars = char_len(&self.content), "loaded document");
    }

    /// Replace the buffer and selection, recording a snapshot for user edits.
    pub fn apply(&mut self, content: impl Into<String>, selection: SelectionRange, op: Operation) {
        self.content = content.into();
        self.selection = selection.normalized().clamp_to(char_len(&self.content));
        self.last_typed_at = None;
        if let Operation::UserEdit { description } = op {
            self.history.save_state(self.content.clone(), self.selection, description);
        }
    }

    /// A keystroke changed the buffer. Recorded later by [`Self::flush_pending`].
    pub fn type_text(&mut self, content: impl Into<String>, selection: SelectionRange, now_ms: u64) {
        self.content = content.into();
        self.selection = selection.normalized().clamp_to(char_len(&self.content));
        self.last_typed_at = Some(now_ms);
    }

    /// Record pending typing if the debounce interval has elapsed since the
    /// last keystroke. Returns whether a snapshot was recorded.
    pub fn flush_pending(&mut self, now_ms: u64) -> bool {
        match self.last_typed_at {
            Some(at) if now_ms.saturating_sub(at) >= self.config.debounce_ms => self.commit_pending(),
            _ => false,
        }
    }

    /// Record pending typing now, regardless of the debounce interval.
    pub fn commit_pending(&mut self) -> bool {
        if self.last_typed_at.take().is_none() {
            return false;
        }
        if self.history.current_state().is_some_and(|s| s.content == self.content) {
            return false;
        }
        self.history.save_state(self.content.clone(), self.selection, CONTENT_CHANGE);
        true
    }

    pub fn has_pending(&self) -> bool {
        self.last_typed_at.is_some()
    }

    /// Move the caret or selection. Never touches history.
    pub fn set_selection(&mut self, start: usize, end: usize) -> Result<()> {
        self.selection = SelectionRange::checked(start, end, &self.content)?;
        Ok(())
    }

    pub fn format(&mut self, command: &FormatCommand) -> Result<ToggleResult> {
        self.toggle_tags(&command.tag_pair())
    }

    /// Toggle `tags` around the live selection and record the result.
    ///
    /// The pre-toggle buffer is recorded first, so one undo restores it.
    pub fn toggle_tags(&mut self, tags: &TagPair) -> Result<ToggleResult> {
        let selection = SelectionRange::checked(self.selection.start, self.selection.end, &self.content)?;

        self.commit_pending();
        if self.history.current_state().map_or(true, |s| s.content != self.content) {
            self.history.save_state(self.content.clone(), selection, CONTENT_CHANGE);
        }

        let result = toggle_with(&self.content, selection, tags, self.config.toggle_options());
        debug!(action = ?result.action, removed = result.action.is_removal(), start_tag = %tags.start_tag, "formatting applied");
        self.apply(
            result.new_content.clone(),
            SelectionRange::caret(result.new_cursor_pos),
            Operation::user_edit(TEXT_FORMATTING),
        );
        Ok(result)
    }

    /// Step back one state and apply it. `None` means nothing to undo.
    pub fn undo(&mut self) -> Option<Snapshot> {
        self.commit_pending();
        let snapshot = self.history.undo()?.clone();
        self.apply(snapshot.content.clone(), snapshot.selection, Operation::ProgrammaticRestore);
        Some(snapshot)
    }

    /// Step forward one state and apply it. `None` means nothing to redo.
    pub fn redo(&mut self) -> Option<Snapshot> {
        self.commit_pending();
        let snapshot = self.history.redo()?.clone();
        self.apply(snapshot.content.clone(), snapshot.selection, Operation::ProgrammaticRestore);
        Some(snapshot)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.last_typed_at = None;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn selection(&self) -> SelectionRange {
        self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_info(&self) -> HistoryInfo {
        self.history.info()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}

// Wall-clock time, not monotonic: a clock adjustment can make a later
// snapshot carry a smaller timestamp. History order is the entry order.
#[cfg(target_arch = "wasm32")]
fn current_time_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}
