use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, StatusLevel};

use super::helpers::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = if let Some(prompt) = &app.prompt {
        // Prompt: Annotate: text▌
        vec![
            Span::styled(
                format!("{}: ", prompt.label),
                Style::default().fg(app.theme.highlight).bg(bg),
            ),
            Span::styled(
                prompt.buffer.clone(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        ]
    } else if let Some(status) = &app.status {
        let color = match status.level {
            StatusLevel::Info => app.theme.text,
            StatusLevel::Warning => app.theme.warning,
            StatusLevel::Error => app.theme.error,
        };
        vec![Span::styled(
            status.text.clone(),
            Style::default().fg(color).bg(bg),
        )]
    } else {
        Vec::new()
    };

    let hint = if app.prompt.is_some() {
        "Enter save  Esc cancel".to_string()
    } else if !app.selection.is_empty() {
        format!("{} selected", app.selection.len())
    } else if app.show_key_hints && app.status.is_none() && !app.editor.is_modifying() {
        "? help".to_string()
    } else {
        String::new()
    };

    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
