//! Smart inline tag toggling over an HTML source buffer.
//!
//! Given a buffer, a selection and a [`TagPair`], decide whether the selection
//! is already wrapped by that pair and strip it, or wrap the selection in it.
//! Detection rules run in a fixed order and the first match wins:
//!
//! 1. the selection itself starts with the start tag and ends with the end tag;
//! 2. the tags sit immediately outside the selection;
//! 3. an open/close pair brackets the selection within a bounded search window;
//! 4. otherwise insert the tags (an empty pair when only a caret is placed).
//!
//! Matching is plain, case-sensitive substring comparison. No HTML is parsed,
//! so malformed markup yields odd but deterministic output. Offsets are
//! character indices; out-of-range offsets are clamped to the buffer end.

use tracing::trace;

use crate::doc::{TagPair, ToggleAction, ToggleResult};
use crate::selection::{byte_offset, char_len, SelectionRange};

/// Characters scanned on each side of the selection when looking for an
/// enclosing tag pair. Tags further away are treated as absent.
pub const DEFAULT_SEARCH_RADIUS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOptions {
    pub search_radius: usize,
}

impl Default for ToggleOptions {
    fn default() -> Self {
        Self { search_radius: DEFAULT_SEARCH_RADIUS }
    }
}

/// Toggle `tags` around `selection` using the default search radius.
pub fn toggle(buffer: &str, selection: SelectionRange, tags: &TagPair) -> ToggleResult {
    toggle_with(buffer, selection, tags, ToggleOptions::default())
}

pub fn toggle_with(buffer: &str, selection: SelectionRange, tags: &TagPair, opts: ToggleOptions) -> ToggleResult {
    let sel = selection.normalized().clamp_to(char_len(buffer));
    let span = Span::new(buffer, sel);
    let (open, close) = (tags.start_tag.as_str(), tags.end_tag.as_str());

    let result = strip_selected(&span, open, close)
        .or_else(|| strip_flanking(&span, open, close))
        .or_else(|| strip_enclosing(&span, open, close, opts.search_radius))
        .unwrap_or_else(|| insert(&span, open, close));

    trace!(start_tag = open, action = ?result.action, cursor = result.new_cursor_pos, "toggled tag pair");
    result
}

/// A selection resolved to byte offsets alongside its character offsets.
struct Span<'a> {
    buffer: &'a str,
    sel: SelectionRange,
    start_b: usize,
    end_b: usize,
}

impl<'a> Span<'a> {
    fn new(buffer: &'a str, sel: SelectionRange) -> Self {
        let start_b = byte_offset(buffer, sel.start);
        let end_b = start_b + byte_offset(&buffer[start_b..], sel.end - sel.start);
        Self { buffer, sel, start_b, end_b }
    }

    fn before(&self) -> &'a str {
        &self.buffer[..self.start_b]
    }

    fn selected(&self) -> &'a str {
        &self.buffer[self.start_b..self.end_b]
    }

    fn after(&self) -> &'a str {
        &self.buffer[self.end_b..]
    }
}

fn strip_selected(span: &Span<'_>, open: &str, close: &str) -> Option<ToggleResult> {
    let selected = span.selected();
    if selected.len() < open.len() + close.len() {
        return None;
    }
    let inner = selected.strip_prefix(open)?.strip_suffix(close)?;

    Some(ToggleResult {
        new_content: [span.before(), inner, span.after()].concat(),
        new_cursor_pos: span.sel.start + char_len(inner),
        action: ToggleAction::StripSelected,
    })
}

fn strip_flanking(span: &Span<'_>, open: &str, close: &str) -> Option<ToggleResult> {
    let before = span.before().strip_suffix(open)?;
    let after = span.after().strip_prefix(close)?;
    let selected = span.selected();

    Some(ToggleResult {
        new_content: [before, selected, after].concat(),
        new_cursor_pos: char_len(before) + char_len(selected),
        action: ToggleAction::StripFlanking,
    })
}

fn strip_enclosing(span: &Span<'_>, open: &str, close: &str, radius: usize) -> Option<ToggleResult> {
    if open.is_empty() || close.is_empty() {
        return None;
    }
    let buffer = span.buffer;

    let window_start = byte_offset(buffer, span.sel.start.saturating_sub(radius));
    let before = &buffer[window_start..span.start_b];
    let open_b = window_start + unmatched_open(before, open, close)?;

    let window_end = span.end_b + byte_offset(span.after(), radius);
    let after = &buffer[span.end_b..window_end];
    let close_b = span.end_b + matching_close(after, open, close)?;

    let inner = &buffer[open_b + open.len()..close_b];
    let prefix = &buffer[..open_b];

    Some(ToggleResult {
        new_content: [prefix, inner, &buffer[close_b + close.len()..]].concat(),
        new_cursor_pos: char_len(prefix) + char_len(inner),
        action: ToggleAction::StripEnclosing,
    })
}

/// Occurrences of either tag in `window`, ordered by position. `true` marks a start tag.
fn tag_positions(window: &str, open: &str, close: &str) -> Vec<(usize, bool)> {
    let mut found: Vec<(usize, bool)> = window
        .match_indices(open)
        .map(|(at, _)| (at, true))
        .chain(window.match_indices(close).map(|(at, _)| (at, false)))
        .collect();
    found.sort_unstable();
    found
}

/// Byte offset of the nearest start tag in `window` not closed before the window ends.
fn unmatched_open(window: &str, open: &str, close: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (at, is_open) in tag_positions(window, open, close).into_iter().rev() {
        if !is_open {
            depth += 1;
        } else if depth == 0 {
            return Some(at);
        } else {
            depth -= 1;
        }
    }
    None
}

/// Byte offset of the end tag in `window` that closes a pair opened before it.
fn matching_close(window: &str, open: &str, close: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (at, is_open) in tag_positions(window, open, close) {
        if is_open {
            depth += 1;
        } else if depth == 0 {
            return Some(at);
        } else {
            depth -= 1;
        }
    }
    None
}

fn insert(span: &Span<'_>, open: &str, close: &str) -> ToggleResult {
    let selected = span.selected();
    let new_content = [span.before(), open, selected, close, span.after()].concat();

    if selected.is_empty() {
        ToggleResult {
            new_content,
            new_cursor_pos: span.sel.start + char_len(open),
            action: ToggleAction::InsertEmpty,
        }
    } else {
        ToggleResult {
            new_content,
            new_cursor_pos: span.sel.end + char_len(open) + char_len(close),
            action: ToggleAction::Wrap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strong() -> TagPair {
        TagPair::element("strong")
    }

    fn run(buffer: &str, start: usize, end: usize, tags: &TagPair) -> (String, usize, ToggleAction) {
        let r = toggle(buffer, SelectionRange::new(start, end), tags);
        (r.new_content, r.new_cursor_pos, r.action)
    }

    #[test]
    fn caret_in_empty_buffer_inserts_empty_pair() {
        let (content, cursor, action) = run("", 0, 0, &TagPair::element("em"));
        assert_eq!(content, "<em></em>");
        assert_eq!(cursor, 4);
        assert_eq!(action, ToggleAction::InsertEmpty);
    }

    #[test]
    fn caret_mid_text_lands_between_new_tags() {
        let (content, cursor, _) = run("ab", 1, 1, &strong());
        assert_eq!(content, "a<strong></strong>b");
        assert_eq!(cursor, 9);
    }

    #[test]
    fn wraps_selection_and_places_caret_after_close() {
        let (content, cursor, action) = run("say hello now", 4, 9, &strong());
        assert_eq!(content, "say <strong>hello</strong> now");
        assert_eq!(cursor, 26);
        assert_eq!(action, ToggleAction::Wrap);
    }

    #[test]
    fn strips_tags_included_in_selection() {
        let (content, cursor, action) = run("x <strong>foo</strong> y", 2, 22, &strong());
        assert_eq!(content, "x foo y");
        assert_eq!(cursor, 5);
        assert_eq!(action, ToggleAction::StripSelected);
    }

    #[test]
    fn strips_flanking_tags() {
        let (content, cursor, action) = run("<strong>hello</strong>", 8, 13, &strong());
        assert_eq!(content, "hello");
        assert_eq!(cursor, 5);
        assert_eq!(action, ToggleAction::StripFlanking);
    }

    #[test]
    fn strips_enclosing_pair_around_partial_selection() {
        let buf = "<p><strong>one two three</strong></p>";
        // selects "two"
        let (content, cursor, action) = run(buf, 15, 18, &strong());
        assert_eq!(content, "<p>one two three</p>");
        assert_eq!(cursor, 16);
        assert_eq!(action, ToggleAction::StripEnclosing);
    }

    #[test]
    fn caret_inside_pair_strips_it() {
        let (content, cursor, action) = run("<em>abc</em>", 5, 5, &TagPair::element("em"));
        assert_eq!(content, "abc");
        assert_eq!(cursor, 3);
        assert_eq!(action, ToggleAction::StripEnclosing);
    }

    #[test]
    fn closed_pair_before_selection_is_not_enclosing() {
        let buf = "<strong>a</strong> b <strong>c</strong>";
        let (content, _, action) = run(buf, 19, 20, &strong());
        assert_eq!(action, ToggleAction::Wrap);
        assert_eq!(content, "<strong>a</strong> <strong>b</strong> <strong>c</strong>");
    }

    #[test]
    fn tags_outside_radius_are_ignored() {
        let filler = "x".repeat(250);
        let buf = format!("<em>{filler}</em>");
        let sel_at = 4 + 240;
        let r = toggle(&buf, SelectionRange::new(sel_at, sel_at + 1), &TagPair::element("em"));
        assert_eq!(r.action, ToggleAction::Wrap);

        let wide = ToggleOptions { search_radius: 300 };
        let r = toggle_with(&buf, SelectionRange::new(sel_at, sel_at + 1), &TagPair::element("em"), wide);
        assert_eq!(r.action, ToggleAction::StripEnclosing);
        assert_eq!(r.new_content, filler);
    }

    #[test]
    fn closed_nested_pair_on_left_is_skipped() {
        let buf = "<b>a <b>b</b> y</b>";
        let (content, cursor, action) = run(buf, 14, 15, &TagPair::element("b"));
        assert_eq!(action, ToggleAction::StripEnclosing);
        assert_eq!(content, "a <b>b</b> y");
        assert_eq!(cursor, 12);
    }

    #[test]
    fn closed_nested_pair_on_right_is_skipped() {
        let buf = "<b>x y <b>z</b></b>";
        let (content, cursor, action) = run(buf, 5, 6, &TagPair::element("b"));
        assert_eq!(action, ToggleAction::StripEnclosing);
        assert_eq!(content, "x y <b>z</b>");
        assert_eq!(cursor, 12);
    }

    #[test]
    fn unclosed_start_tag_on_right_leaves_no_closer() {
        // the only end tag after the selection belongs to the later start tag
        let buf = "<b>x y <b>z</b>";
        let (content, _, action) = run(buf, 5, 6, &TagPair::element("b"));
        assert_eq!(action, ToggleAction::Wrap);
        assert_eq!(content, "<b>x <b>y</b> <b>z</b>");
    }

    #[test]
    fn end_tag_beyond_radius_is_ignored() {
        let filler = "x".repeat(250);
        let buf = format!("<em>a{filler}</em>");
        // selects the first filler char; start tag is close, end tag is 249 chars away
        let r = toggle(&buf, SelectionRange::new(5, 6), &TagPair::element("em"));
        assert_eq!(r.action, ToggleAction::Wrap);

        let wide = ToggleOptions { search_radius: 260 };
        let r = toggle_with(&buf, SelectionRange::new(5, 6), &TagPair::element("em"), wide);
        assert_eq!(r.action, ToggleAction::StripEnclosing);
        assert_eq!(r.new_content, format!("a{filler}"));
    }

    #[test]
    fn end_tag_cut_by_radius_edge_is_ignored() {
        // "</em>" starts 198 chars after the selection, so it ends past a 200-char window
        let buf = format!("<em>a{}</em>", "x".repeat(199));
        let r = toggle(&buf, SelectionRange::new(5, 6), &TagPair::element("em"));
        assert_eq!(r.action, ToggleAction::Wrap);
    }

    #[test]
    fn selected_tags_win_over_enclosing_scan() {
        // The selection also sits inside an outer pair of the same tags.
        let buf = "<b>x <b>y</b> z</b>";
        let (content, cursor, action) = run(buf, 5, 13, &TagPair::element("b"));
        assert_eq!(action, ToggleAction::StripSelected);
        assert_eq!(content, "<b>x y z</b>");
        assert_eq!(cursor, 6);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let (_, _, action) = run("<STRONG>hi</STRONG>", 8, 10, &strong());
        assert_eq!(action, ToggleAction::Wrap);
    }

    #[test]
    fn offsets_are_characters() {
        let (content, cursor, _) = run("añb", 1, 2, &strong());
        assert_eq!(content, "a<strong>ñ</strong>b");
        assert_eq!(cursor, 19);

        let (content, cursor, action) = run("<em>日本語</em>", 4, 7, &TagPair::element("em"));
        assert_eq!(action, ToggleAction::StripFlanking);
        assert_eq!(content, "日本語");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn out_of_range_selection_is_clamped() {
        let (content, cursor, _) = run("ab", 5, 9, &strong());
        assert_eq!(content, "ab<strong></strong>");
        assert_eq!(cursor, 10);
    }

    #[test]
    fn toggle_on_then_off_restores_buffer() {
        let buf = "Answer: use the cache.";
        let on = toggle(buf, SelectionRange::new(8, 21), &strong());
        let wrapped_end = 21 + "<strong></strong>".len();
        let off = toggle(&on.new_content, SelectionRange::new(8, wrapped_end), &strong());
        assert_eq!(off.new_content, buf);

        let inner = toggle(&on.new_content, SelectionRange::new(16, 29), &strong());
        assert_eq!(inner.new_content, buf);
    }
}
