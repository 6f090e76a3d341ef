use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, DepPopupEntry};
use crate::tui::theme::Theme;

use super::helpers::{centered_rect_fixed, fit, pad_to_width};

const ID_W: usize = 9;

/// Blocked-by / blocks listing for the highlighted task
pub fn render_dep_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dp) = &app.dep_popup else {
        return;
    };
    let theme = &app.theme;

    // Two thirds of the screen, between 40 and 90 columns inside the border
    let inner_w = (area.width * 2 / 3)
        .clamp(40, 90)
        .min(area.width.saturating_sub(2)) as usize;
    let height = (dp.entries.len() as u16 + 4).min(area.height);
    let popup = centered_rect_fixed(inner_w as u16 + 2, height, area);

    let lines: Vec<Line> = dp
        .entries
        .iter()
        .enumerate()
        .flat_map(|(idx, entry)| entry_lines(theme, entry, idx, idx == dp.cursor, inner_w))
        .collect();

    let title_style = Style::default()
        .fg(theme.text_bright)
        .bg(theme.background)
        .add_modifier(Modifier::BOLD);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.selection_border).bg(theme.background))
        .title(Span::styled(format!(" {} ", dp.title), title_style))
        .style(Style::default().bg(theme.background));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn entry_lines(
    theme: &Theme,
    entry: &DepPopupEntry,
    idx: usize,
    under_cursor: bool,
    width: usize,
) -> Vec<Line<'static>> {
    let bg = theme.background;
    match entry {
        DepPopupEntry::SectionHeader { label } => {
            let header = Line::from(Span::styled(
                format!(" {}", label),
                Style::default()
                    .fg(theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ));
            // blank line between sections
            if idx == 0 {
                vec![header]
            } else {
                vec![Line::from(""), header]
            }
        }
        DepPopupEntry::Nothing => vec![Line::from(Span::styled(
            "   (nothing)",
            Style::default().fg(theme.dim).bg(bg),
        ))],
        DepPopupEntry::Task {
            uuid,
            id,
            description,
        } => {
            let row_bg = if under_cursor { theme.selection_bg } else { bg };
            // Unresolved dependencies are dimmed
            let fg = if uuid.is_some() { theme.text } else { theme.dim };
            let mut spans = vec![
                Span::styled("   ", Style::default().bg(row_bg)),
                Span::styled(fit(id, ID_W), Style::default().fg(theme.dim).bg(row_bg)),
                Span::styled(description.clone(), Style::default().fg(fg).bg(row_bg)),
            ];
            pad_to_width(&mut spans, width, Style::default().bg(row_bg));
            vec![Line::from(spans)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::DepPopupState;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn lists_sections_and_unresolved_entries() {
        let mut app = app_with_tasks(sample_tasks());
        app.dep_popup = Some(DepPopupState {
            title: "Dependencies of 1".into(),
            entries: vec![
                DepPopupEntry::SectionHeader { label: "Blocked by" },
                DepPopupEntry::Task {
                    uuid: Some("bbbb-2222".into()),
                    id: "2".into(),
                    description: "Renew passport".into(),
                },
                DepPopupEntry::Task {
                    uuid: None,
                    id: "dead".into(),
                    description: "(not active)".into(),
                },
                DepPopupEntry::SectionHeader { label: "Blocks" },
                DepPopupEntry::Nothing,
            ],
            cursor: 1,
        });
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_dep_popup(frame, &app, area);
        });
        assert!(output.contains("Dependencies of 1"));
        assert!(output.contains("Blocked by"));
        assert!(output.contains("Renew passport"));
        assert!(output.contains("dead"));
        assert!(output.contains("(nothing)"));
    }
}
