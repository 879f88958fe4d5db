//! Editor configuration.
//!
//! Hosts pass this as JSON; every field has a default so `{}` is valid.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::history::DEFAULT_MAX_SIZE;
use crate::toggle::{ToggleOptions, DEFAULT_SEARCH_RADIUS};

pub const DEFAULT_DEBOUNCE_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snapshots kept before the oldest is evicted.
    pub max_history: usize,
    /// Characters scanned each side of a selection for an enclosing tag pair.
    pub search_radius: usize,
    /// Typing idle time before a pending change is recorded.
    pub debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_SIZE,
            search_radius: DEFAULT_SEARCH_RADIUS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history == 0 {
            return Err(EditorError::InvalidConfig("maxHistory must be at least 1".into()));
        }
        Ok(())
    }

    pub fn toggle_options(&self) -> ToggleOptions {
        ToggleOptions { search_radius: self.search_radius }
    }
}
