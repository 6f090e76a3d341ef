//! Grapheme-aware helpers for the editor cursor and table cells.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" { 4 } else { UnicodeWidthStr::width(g) }
}

/// Fit `s` into `max_cells`, ending in `…` when something was cut.
/// Never splits a grapheme or a wide character.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme after the one at `byte_offset`; `None` at the end
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let rest = s.get(byte_offset..).filter(|r| !r.is_empty())?;
    let step = rest.graphemes(true).next().map_or(rest.len(), str::len);
    Some(byte_offset + step)
}

/// Byte offset of the grapheme before `byte_offset`; `None` at the start
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let head = s.get(..byte_offset).filter(|h| !h.is_empty())?;
    head.grapheme_indices(true).next_back().map(|(i, _)| i)
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word at or before `byte_offset` (whitespace-delimited)
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let Some(head) = s.get(..byte_offset) else {
        return 0;
    };
    let graphemes: Vec<(usize, &str)> = head.grapheme_indices(true).collect();
    let mut idx = graphemes.len();
    while idx > 0 && is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

/// Start of the next word after `byte_offset`, or the end of `s`
pub fn word_boundary_right(s: &str, byte_offset: usize) -> usize {
    let Some(tail) = s.get(byte_offset..) else {
        return s.len();
    };
    let mut graphemes = tail.grapheme_indices(true).peekable();
    while graphemes.next_if(|(_, g)| !is_space(g)).is_some() {}
    while graphemes.next_if(|(_, g)| is_space(g)).is_some() {}
    graphemes.peek().map_or(s.len(), |(i, _)| byte_offset + i)
}
