//! Buffer snapshots, tag pairs and toggle results.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionRange;

/// One recorded point in editing history.
///
/// `content` and `selection` are captured together and always belong to each
/// other; a snapshot owns its text, so later edits to the live buffer never
/// reach back into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub content: String,
    pub selection: SelectionRange,
    /// Milliseconds since the Unix epoch, read from the wall clock. Not
    /// monotonic; entry order in the history is the authoritative order.
    pub timestamp: u64,
    pub description: String,
}

impl Snapshot {
    pub fn new(content: impl Into<String>, selection: SelectionRange, description: impl Into<String>) -> Self {
        Self::at(content, selection, description, crate::current_time_ms())
    }

    pub fn at(content: impl Into<String>, selection: SelectionRange, description: impl Into<String>, timestamp: u64) -> Self {
        Self { content: content.into(), selection, timestamp, description: description.into() }
    }
}

/// Inline markup delimiters toggled around a selection, e.g. `<strong>`/`</strong>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPair {
    pub start_tag: String,
    pub end_tag: String,
}

impl TagPair {
    pub fn new(start_tag: impl Into<String>, end_tag: impl Into<String>) -> Self {
        Self { start_tag: start_tag.into(), end_tag: end_tag.into() }
    }

    /// `<name>` / `</name>` with no attributes.
    pub fn element(name: &str) -> Self {
        Self { start_tag: format!("<{name}>"), end_tag: format!("</{name}>") }
    }

    /// `<a href="...">` / `</a>`, with the href escaped for a double-quoted attribute.
    pub fn link(href: &str) -> Self {
        Self {
            start_tag: format!("<a href=\"{}\">", html_escape::encode_double_quoted_attribute(href)),
            end_tag: "</a>".to_string(),
        }
    }
}

/// Which rule the toggle engine applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleAction {
    /// The selection itself started and ended with the tags.
    StripSelected,
    /// The tags sat directly outside the selection.
    StripFlanking,
    /// A matching pair enclosed the selection within the search radius.
    StripEnclosing,
    /// No enclosing pair; the selection was wrapped.
    Wrap,
    /// No enclosing pair and no selection; an empty pair was inserted.
    InsertEmpty,
}

impl ToggleAction {
    pub fn is_removal(self) -> bool {
        matches!(self, Self::StripSelected | Self::StripFlanking | Self::StripEnclosing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub new_content: String,
    /// Character offset of the caret in `new_content`.
    pub new_cursor_pos: usize,
    pub action: ToggleAction,
}

/// Read-only summary for enabling undo/redo controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInfo {
    pub can_undo: bool,
    pub can_redo: bool,
    pub history_size: usize,
    pub current_index: Option<usize>,
}
