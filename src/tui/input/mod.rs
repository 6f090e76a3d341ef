mod common;
mod edit;
mod navigate;
mod popups;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

// Import all submodule functions into this module's namespace
// so that submodules can access cross-module functions via `use super::*;`
#[allow(unused_imports)]
use common::*;
#[allow(unused_imports)]
use edit::*;
#[allow(unused_imports)]
use navigate::*;
#[allow(unused_imports)]
use popups::*;

/// Route a key to whichever component currently owns input
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        request_quit(app);
        return;
    }

    // Modals capture all input, innermost first
    if app.show_help {
        handle_help(app, key);
    } else if app.quick_menu.is_open() {
        handle_quick_menu(app, key);
    } else if app.picker.is_some() {
        handle_picker(app, key);
    } else if app.dep_popup.is_some() {
        handle_dep_popup(app, key);
    } else if app.prompt.is_some() {
        handle_prompt(app, key);
    } else if app.editor.is_modifying() {
        handle_edit(app, key);
    } else {
        handle_navigate(app, key);
    }
}
