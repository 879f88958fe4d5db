//! Errors raised where host-supplied values enter the editor.
//!
//! The engine itself never fails: undo/redo exhaustion is `None` and tag
//! toggling always produces a result. These variants only cover input the
//! host hands across the boundary (selections, toolbar names, config JSON).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid selection {start}..{end} for buffer of {len} characters")]
    InvalidSelection { start: usize, end: usize, len: usize },

    #[error("unknown format command `{0}`")]
    UnknownFormat(String),

    #[error("invalid editor config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
