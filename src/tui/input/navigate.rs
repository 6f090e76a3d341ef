use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::sort::Column;
use crate::tui::app::App;
use crate::tui::picker::PickerPurpose;

use super::*;

/// Rows moved by PageUp/PageDown
const PAGE: isize = 10;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cursor
        (_, KeyCode::Char('j') | KeyCode::Down) => app.move_cursor_with(|t| t.move_cursor(1)),
        (_, KeyCode::Char('k') | KeyCode::Up) => app.move_cursor_with(|t| t.move_cursor(-1)),
        (_, KeyCode::PageDown) => app.move_cursor_with(|t| t.move_cursor(PAGE)),
        (_, KeyCode::PageUp) => app.move_cursor_with(|t| t.move_cursor(-PAGE)),
        (_, KeyCode::Char('g') | KeyCode::Home) => app.move_cursor_with(|t| t.jump_top()),
        (_, KeyCode::Char('G') | KeyCode::End) => app.move_cursor_with(|t| t.jump_bottom()),

        // Editor
        (_, KeyCode::Enter | KeyCode::Char('e')) => begin_edit(app),
        (_, KeyCode::Char('n')) => begin_new(app),

        // Selection
        (_, KeyCode::Char(' ')) => toggle_selection(app),
        (_, KeyCode::Esc) => clear_selection(app),

        // Batch and single-task actions
        (_, KeyCode::Char('d')) => open_quick_menu(app, MenuKind::Date),
        (_, KeyCode::Char('p')) => open_quick_menu(app, MenuKind::Priority),
        (_, KeyCode::Char('x')) => mark_done(app),
        (_, KeyCode::Char('s')) => toggle_start(app),
        (_, KeyCode::Char('u')) => undo(app),
        (_, KeyCode::Char('a')) => open_annotate_prompt(app),
        (_, KeyCode::Char('A')) => remove_latest_annotation(app),

        // Popups
        (_, KeyCode::Char('/')) => open_picker(app, PickerPurpose::Jump),
        (_, KeyCode::Char('D')) => open_dep_popup(app),
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Sorting: 1-7 pick a column, < and > step through them
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c @ '1'..='7')) => {
            let index = c as usize - '1' as usize;
            if let Some(column) = Column::from_index(index) {
                sort_by(app, column);
            }
        }
        (_, KeyCode::Char('<')) => cycle_sort(app, false),
        (_, KeyCode::Char('>')) => cycle_sort(app, true),

        (_, KeyCode::Char('r')) => manual_refresh(app),
        (_, KeyCode::Char('q')) => request_quit(app),
        _ => {}
    }
}
