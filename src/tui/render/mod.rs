pub mod dep_popup;
pub mod detail_panel;
pub mod help_overlay;
mod helpers;
pub mod picker_popup;
pub mod quick_menu_popup;
pub mod status_row;
pub mod table_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::App;

/// Below this width the detail panel goes under the table
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 110;
const DETAIL_PANEL_WIDTH: u16 = 44;
const DETAIL_PANEL_HEIGHT: u16 = 12;

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title bar (1 row) | body | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(1),    // table + detail panel
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_title_bar(frame, app, chunks[0]);

    let body = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(DETAIL_PANEL_WIDTH)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(DETAIL_PANEL_HEIGHT)])
            .split(chunks[1])
    };
    table_view::render_table_view(frame, app, body[0]);
    detail_panel::render_detail_panel(frame, app, body[1]);

    // Modals, drawn over the body
    quick_menu_popup::render_quick_menu(frame, app, chunks[1]);
    picker_popup::render_picker(frame, app, chunks[1]);
    dep_popup::render_dep_popup(frame, app, chunks[1]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let active = app
        .collection
        .tasks()
        .iter()
        .filter(|t| t.is_active())
        .count();
    let mut spans = vec![
        Span::styled(
            " twdeck ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} tasks", app.collection.len()),
            Style::default().fg(app.theme.text).bg(bg),
        ),
    ];
    if active > 0 {
        spans.push(Span::styled(
            format!("  {} started", active),
            Style::default().fg(app.theme.active).bg(bg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::quick_menu::QuickMenu;
    use test_helpers::*;

    #[test]
    fn full_screen_layout() {
        let mut app = app_with_tasks(sample_tasks());
        let output = render_to_string(TERM_W, TERM_H, |frame, _| {
            render(frame, &mut app);
        });
        let first = output.lines().next().unwrap();
        assert!(first.contains("twdeck"));
        assert!(first.contains("3 tasks"));
        assert!(output.contains("Renew passport"));
        assert!(output.contains("Task 1"));
    }

    #[test]
    fn wide_terminal_puts_panel_beside_table() {
        let mut app = app_with_tasks(sample_tasks());
        let output = render_to_string(140, 20, |frame, _| {
            render(frame, &mut app);
        });
        let header = output.lines().nth(1).unwrap();
        assert!(header.contains("Urg"));
        assert!(header.contains("Task 1"));
    }

    #[test]
    fn quick_menu_draws_over_body() {
        let mut app = app_with_tasks(sample_tasks());
        app.quick_targets = vec!["aaaa-1111".into()];
        app.quick_menu = QuickMenu::Priority;
        let output = render_to_string(TERM_W, TERM_H, |frame, _| {
            render(frame, &mut app);
        });
        assert!(output.contains("Set priority"));
        assert!(output.contains("1 task"));
    }
}
