use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::picker::PickerPurpose;

use super::helpers::{centered_rect_fixed, fit, pad_to_width};

/// Render the search picker: query line, then the visible window of matches
pub fn render_picker(frame: &mut Frame, app: &App, area: Rect) {
    let Some(picker) = &app.picker else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;

    let popup_w = (area.width as usize * 7 / 10).clamp(30, 90) as u16;
    let popup_h = (area.height * 7 / 10).max(6);
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);

    let inner_w = popup.width.saturating_sub(2) as usize;
    let list_h = popup.height.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.highlight).bg(bg)),
        Span::styled(
            picker.query().to_string(),
            Style::default().fg(theme.text_bright).bg(bg),
        ),
        Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg)),
    ]));
    lines.push(Line::from(Span::styled(
        format!("{} match{}", picker.match_count(), if picker.match_count() == 1 { "" } else { "es" }),
        Style::default().fg(theme.dim).bg(bg),
    )));

    // Keep the cursor inside the window
    let start = (picker.cursor() + 1).saturating_sub(list_h.max(1));
    for (i, task) in picker.matches().enumerate().skip(start).take(list_h) {
        let selected = i == picker.cursor();
        let row_bg = if selected { theme.selection_bg } else { bg };
        let mut spans = vec![
            Span::styled(
                format!("{} ", fit(&task.display_id(), 8)),
                Style::default().fg(theme.dim).bg(row_bg),
            ),
            Span::styled(
                format!("{} ", fit(&task.project, 14)),
                Style::default()
                    .fg(theme.project_color(&task.project))
                    .bg(row_bg),
            ),
            Span::styled(
                task.description.clone(),
                Style::default()
                    .fg(if selected { theme.text_bright } else { theme.text })
                    .bg(row_bg),
            ),
        ];
        pad_to_width(&mut spans, inner_w, Style::default().bg(row_bg));
        lines.push(Line::from(spans));
    }

    let title = match picker.purpose {
        PickerPurpose::Jump => " Jump to task ",
        PickerPurpose::Dependency => " Add dependency ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.selection_border).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
