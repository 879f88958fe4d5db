//! Commands/operations for editing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::doc::TagPair;
use crate::error::EditorError;

/// How a buffer change reached the session.
///
/// Only user edits are recorded; restoring a snapshot from history must not
/// record it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    UserEdit { description: String },
    ProgrammaticRestore,
}

impl Operation {
    pub fn user_edit(description: impl Into<String>) -> Self {
        Operation::UserEdit { description: description.into() }
    }

    pub fn records_history(&self) -> bool {
        matches!(self, Operation::UserEdit { .. })
    }
}

/// Inline formats offered by the editor toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Link { href: String },
}

impl FormatCommand {
    pub fn tag_pair(&self) -> TagPair {
        match self {
            FormatCommand::Bold => TagPair::element("strong"),
            FormatCommand::Italic => TagPair::element("em"),
            FormatCommand::Underline => TagPair::element("u"),
            FormatCommand::Strikethrough => TagPair::element("s"),
            FormatCommand::Code => TagPair::element("code"),
            FormatCommand::Link { href } => TagPair::link(href),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::Strikethrough => "strikethrough",
            FormatCommand::Code => "code",
            FormatCommand::Link { .. } => "link",
        }
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses toolbar names. `link` needs an href and is built directly instead.
impl FromStr for FormatCommand {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bold" | "strong" => Ok(FormatCommand::Bold),
            "italic" | "em" => Ok(FormatCommand::Italic),
            "underline" | "u" => Ok(FormatCommand::Underline),
            "strikethrough" | "strike" | "s" => Ok(FormatCommand::Strikethrough),
            "code" => Ok(FormatCommand::Code),
            _ => Err(EditorError::UnknownFormat(s.to_string())),
        }
    }
}
