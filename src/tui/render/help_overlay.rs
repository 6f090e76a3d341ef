use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect_fixed;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Table",
        &[
            ("\u{2191}\u{2193}/jk", "Move cursor"),
            ("g/G", "Jump to top/bottom"),
            ("Space", "Toggle selection"),
            ("Esc", "Clear selection"),
            ("1-7", "Sort by column (again to reverse)"),
            ("</>", "Sort by previous/next column"),
            ("/", "Jump to task"),
            ("r", "Refresh"),
            ("q", "Quit"),
        ],
    ),
    (
        "Tasks (selection, else highlighted)",
        &[
            ("d", "Set due date"),
            ("p", "Set priority"),
            ("x", "Mark done"),
        ],
    ),
    (
        "Highlighted task",
        &[
            ("Enter/e", "Edit"),
            ("n", "New task"),
            ("s", "Start/stop"),
            ("a", "Add annotation"),
            ("A", "Remove latest annotation"),
            ("D", "Dependencies"),
            ("u", "Undo last change"),
        ],
    ),
    (
        "Editor",
        &[
            ("Tab/S-Tab", "Next/previous field"),
            ("Ctrl-S", "Save"),
            ("Esc", "Discard changes"),
            ("Ctrl-D/F", "Pick a dependency"),
            ("\u{2190}\u{2192}", "Cycle priority (on Priority)"),
        ],
    ),
];

const KEY_W: usize = 12;

/// Key reference, toggled with `?`. Sized to its content.
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let heading = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let key = Style::default()
        .fg(theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc = Style::default().fg(theme.text).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    for (title, bindings) in SECTIONS {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(format!(" {}", title), heading)));
        lines.extend(bindings.iter().map(|(k, d)| {
            Line::from(vec![
                Span::styled(format!(" {:<w$}", k, w = KEY_W - 1), key),
                Span::styled(*d, desc),
            ])
        }));
    }

    let content_w = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let popup = centered_rect_fixed(content_w + 4, lines.len() as u16 + 2, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .title(Span::styled(" Key Bindings ", heading))
        .style(Style::default().bg(bg));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
