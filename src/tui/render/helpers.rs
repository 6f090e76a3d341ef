use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Truncate to `width` cells (with `…`) and pad with spaces to exactly `width`
pub(super) fn fit(s: &str, width: usize) -> String {
    let mut out = unicode::truncate_to_width(s, width);
    let used = unicode::display_width(&out);
    if used < width {
        out.push_str(&" ".repeat(width - used));
    }
    out
}

/// Right-align within `width` cells
pub(super) fn fit_right(s: &str, width: usize) -> String {
    let out = unicode::truncate_to_width(s, width);
    let used = unicode::display_width(&out);
    format!("{}{}", " ".repeat(width.saturating_sub(used)), out)
}

/// Pad spans to fill `target_width` with background.
pub(super) fn pad_to_width<'a>(spans: &mut Vec<Span<'a>>, target_width: usize, pad_style: Style) {
    let total_used = spans_width(spans);
    if total_used < target_width {
        spans.push(Span::styled(
            " ".repeat(target_width - total_used),
            pad_style,
        ));
    }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
