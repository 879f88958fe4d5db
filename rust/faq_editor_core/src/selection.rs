//! Selection model: character-offset ranges into the edited buffer.
//!
//! Offsets count `char`s, not bytes and not grapheme clusters. Helpers here
//! translate them to byte offsets so the rest of the crate can slice `str`s
//! without landing inside a multi-byte character.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Build a range without checking it against any buffer.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Build a range and verify `start <= end <= chars(content)`.
    pub fn checked(start: usize, end: usize, content: &str) -> Result<Self> {
        let len = char_len(content);
        if start > end || end > len {
            return Err(EditorError::InvalidSelection { start, end, len });
        }
        Ok(Self { start, end })
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swap the bounds if the range was captured backwards (focus before anchor).
    pub fn normalize(&mut self) {
        if self.start > self.end {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Convert a range counted in UTF-16 code units (what a browser textarea
    /// reports) into character offsets into `content`.
    pub fn from_utf16(start: usize, end: usize, content: &str) -> Self {
        Self { start: utf16_to_char(content, start), end: utf16_to_char(content, end) }
    }

    /// The same range counted in UTF-16 code units.
    pub fn to_utf16(self, content: &str) -> Self {
        Self { start: char_to_utf16(content, self.start), end: char_to_utf16(content, self.end) }
    }

    /// Pull both bounds back inside a buffer of `len` characters.
    pub fn clamp_to(self, len: usize) -> Self {
        Self { start: self.start.min(len), end: self.end.min(len) }
    }
}

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Character offset for a UTF-16 offset. An offset inside a surrogate pair
/// rounds up to the next character; offsets past the end stay past the end
/// so range checks still reject them.
pub fn utf16_to_char(s: &str, utf16_idx: usize) -> usize {
    let mut units = 0;
    for (i, c) in s.chars().enumerate() {
        if units >= utf16_idx {
            return i;
        }
        units += c.len_utf16();
    }
    let count = char_len(s);
    count + utf16_idx.saturating_sub(units)
}

/// UTF-16 offset of the `char_idx`-th character, clamped to the end.
pub fn char_to_utf16(s: &str, char_idx: usize) -> usize {
    s.chars().take(char_idx).map(char::len_utf16).sum()
}

/// Byte offset of the `char_idx`-th character, or `s.len()` past the end.
pub(crate) fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(b, _)| b)
}
