use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;
use crate::tui::picker::PickerPurpose;
use crate::tui::session::Field;

use super::*;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let on_priority = app.editor.focus() == Field::Priority;

    match key.code {
        KeyCode::Char('s') if ctrl => save_edit(app),
        KeyCode::Char('d' | 'f') if ctrl => open_picker(app, PickerPurpose::Dependency),
        KeyCode::Char('w') if ctrl => {
            app.editor.delete_word_back();
        }
        KeyCode::Char('a') if ctrl => app.editor.cursor_home(),
        KeyCode::Char('e') if ctrl => app.editor.cursor_end(),
        KeyCode::Esc => cancel_edit(app),

        // Field focus
        KeyCode::Tab => app.editor.focus_next(),
        KeyCode::BackTab => app.editor.focus_prev(),
        KeyCode::Enter => app.editor.focus_next(),

        // Up/Down move the table; refused while there are unsaved edits
        KeyCode::Up => app.move_cursor_with(|t| t.move_cursor(-1)),
        KeyCode::Down => app.move_cursor_with(|t| t.move_cursor(1)),

        KeyCode::Left if on_priority => {
            app.editor.cycle_priority(false);
        }
        KeyCode::Right if on_priority => {
            app.editor.cycle_priority(true);
        }
        KeyCode::Left if ctrl || alt => app.editor.cursor_word_left(),
        KeyCode::Right if ctrl || alt => app.editor.cursor_word_right(),
        KeyCode::Left => app.editor.cursor_left(),
        KeyCode::Right => app.editor.cursor_right(),
        KeyCode::Home => app.editor.cursor_home(),
        KeyCode::End => app.editor.cursor_end(),

        KeyCode::Backspace => {
            app.editor.backspace();
        }
        KeyCode::Delete => {
            app.editor.delete_forward();
        }
        KeyCode::Char(c) if !ctrl => {
            app.editor.insert_char(c);
        }
        _ => {}
    }
}
