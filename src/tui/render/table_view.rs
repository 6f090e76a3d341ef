use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::sort::Column;
use crate::tui::app::App;
use crate::tui::table::{DEPENDS_GLYPH, Row, RowGlyph};

use super::helpers::{fit, fit_right, pad_to_width};

const ID_W: usize = 4;
const PROJECT_W: usize = 14;
const PRIORITY_W: usize = 4;
const DUE_W: usize = 10;
const TAGS_W: usize = 14;
const URGENCY_W: usize = 5;
/// Selection/activity glyph plus dependency glyph
const GLYPH_W: usize = 3;
const MIN_DESCRIPTION_W: usize = 12;

/// Width of each column for a given table width
fn column_widths(total: usize) -> [usize; 7] {
    let fixed = GLYPH_W + ID_W + PROJECT_W + PRIORITY_W + DUE_W + TAGS_W + URGENCY_W + 6;
    let description = total.saturating_sub(fixed).max(MIN_DESCRIPTION_W);
    [
        ID_W,
        PROJECT_W,
        PRIORITY_W,
        DUE_W,
        description,
        TAGS_W,
        URGENCY_W,
    ]
}

/// Render the task table: a header row, then one line per task
pub fn render_table_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let widths = column_widths(width);
    let body_height = (area.height as usize).saturating_sub(1);
    app.table.clamp_scroll(body_height);

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(header_line(app, &widths, width));

    if app.table.rows().is_empty() {
        lines.push(Line::from(Span::styled(
            "  No active tasks. Press n to add one.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let cursor = app.table.cursor();
    for (i, row) in app
        .table
        .rows()
        .iter()
        .enumerate()
        .skip(app.table.scroll_offset)
        .take(body_height)
    {
        lines.push(row_line(app, row, &widths, width, cursor == Some(i)));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn header_line(app: &App, widths: &[usize; 7], width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let style = Style::default()
        .fg(app.theme.dim)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let active = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::styled(" ".repeat(GLYPH_W), style)];
    for (column, w) in Column::ALL.iter().zip(widths) {
        let mut title = column.title().to_string();
        let is_active = app.sort.column == *column;
        if is_active {
            title.push(if app.sort.effective_descending() {
                '\u{25BC}'
            } else {
                '\u{25B2}'
            });
        }
        let text = if *column == Column::Urgency {
            fit_right(&title, *w)
        } else {
            fit(&title, *w)
        };
        spans.push(Span::styled(text, if is_active { active } else { style }));
        spans.push(Span::styled(" ", style));
    }
    pad_to_width(&mut spans, width, Style::default().bg(bg));
    Line::from(spans)
}

fn row_line(
    app: &App,
    row: &Row,
    widths: &[usize; 7],
    width: usize,
    highlighted: bool,
) -> Line<'static> {
    let theme = &app.theme;
    let row_bg = if highlighted {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().fg(theme.text).bg(row_bg);
    let dim = Style::default().fg(theme.dim).bg(row_bg);

    let glyph_style = match row.glyph {
        RowGlyph::Selected => Style::default().fg(theme.highlight).bg(row_bg),
        RowGlyph::Active => Style::default().fg(theme.active).bg(row_bg),
        RowGlyph::None => base,
    };
    let depends = if row.has_depends { DEPENDS_GLYPH } else { " " };
    let urgency_style = if row.urgent {
        Style::default()
            .fg(theme.urgent)
            .bg(row_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        dim
    };
    let description_style = if highlighted {
        Style::default().fg(theme.text_bright).bg(row_bg)
    } else {
        base
    };

    let mut spans = vec![
        Span::styled(row.glyph.symbol().to_string(), glyph_style),
        Span::styled(depends.to_string(), dim),
        Span::styled(" ", base),
        Span::styled(fit(&row.id, widths[0]), dim),
        Span::styled(" ", base),
        Span::styled(
            fit(&row.project, widths[1]),
            Style::default()
                .fg(theme.project_color(&row.project))
                .bg(row_bg),
        ),
        Span::styled(" ", base),
        Span::styled(
            fit(row.priority.code(), widths[2]),
            Style::default()
                .fg(theme.priority_color(row.priority))
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", base),
        Span::styled(fit(&row.due, widths[3]), base),
        Span::styled(" ", base),
        Span::styled(fit(&row.description, widths[4]), description_style),
        Span::styled(" ", base),
        Span::styled(
            fit(&row.tags, widths[5]),
            Style::default().fg(theme.tag).bg(row_bg),
        ),
        Span::styled(" ", base),
        Span::styled(fit_right(&format!("{:.1}", row.urgency), widths[6]), urgency_style),
    ];
    pad_to_width(&mut spans, width, Style::default().bg(row_bg));
    Line::from(spans)
}
