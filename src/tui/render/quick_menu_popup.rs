use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect_fixed;

/// Render the open quick menu level as a small key list
pub fn render_quick_menu(frame: &mut Frame, app: &App, area: Rect) {
    if !app.quick_menu.is_open() {
        return;
    }
    let (title, entries) = app.quick_menu.entries();
    let theme = &app.theme;
    let bg = theme.background;

    let key_style = Style::default()
        .fg(theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(theme.text).bg(bg);

    let mut lines: Vec<Line> = entries
        .iter()
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(format!(" {:>3}  ", key), key_style),
                Span::styled(label.to_string(), desc_style),
            ])
        })
        .collect();

    let count = app.quick_targets.len();
    lines.push(Line::from(Span::styled(
        format!(" {} task{}", count, if count == 1 { "" } else { "s" }),
        Style::default().fg(theme.dim).bg(bg),
    )));

    let height = lines.len() as u16 + 2;
    let popup = centered_rect_fixed(28, height, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.selection_border).bg(bg))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
