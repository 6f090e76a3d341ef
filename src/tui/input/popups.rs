use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, DepPopupEntry};
use crate::tui::picker::PickerOutcome;
use crate::tui::quick_menu::MenuOutcome;

use super::*;

// ---------------------------------------------------------------------------
// Help overlay

pub(super) fn handle_help(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
        app.show_help = false;
    }
}

// ---------------------------------------------------------------------------
// Quick menu: captures every key while open

pub(super) fn handle_quick_menu(app: &mut App, key: KeyEvent) {
    match app.quick_menu.handle_key(key.code) {
        MenuOutcome::Applied(action) => apply_quick_action(app, action),
        MenuOutcome::Cancelled => app.quick_targets.clear(),
        MenuOutcome::Opened | MenuOutcome::BackOneLevel | MenuOutcome::Ignored => {}
    }
}

// ---------------------------------------------------------------------------
// Search picker

pub(super) fn handle_picker(app: &mut App, key: KeyEvent) {
    let Some(picker) = app.picker.as_mut() else {
        return;
    };
    let purpose = picker.purpose;
    match picker.handle_key(key) {
        PickerOutcome::Pending => {}
        PickerOutcome::Cancelled => app.picker = None,
        PickerOutcome::Chosen(picked) => {
            app.picker = None;
            apply_pick(app, purpose, picked);
        }
    }
}

// ---------------------------------------------------------------------------
// Dependency viewer

pub(super) fn handle_dep_popup(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('D') => app.dep_popup = None,
        KeyCode::Char('j') | KeyCode::Down => dep_popup_move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => dep_popup_move_cursor(app, -1),
        KeyCode::Enter => dep_popup_jump_to_task(app),
        _ => {}
    }
}

/// Step to the next task entry, skipping headers and placeholders
fn dep_popup_move_cursor(app: &mut App, direction: i32) {
    let Some(dp) = app.dep_popup.as_mut() else {
        return;
    };
    let mut i = dp.cursor as i64;
    loop {
        i += direction as i64;
        if i < 0 || i as usize >= dp.entries.len() {
            return;
        }
        if matches!(dp.entries[i as usize], DepPopupEntry::Task { .. }) {
            dp.cursor = i as usize;
            return;
        }
    }
}

fn dep_popup_jump_to_task(app: &mut App) {
    let target = app.dep_popup.as_ref().and_then(|dp| match dp.entries.get(dp.cursor) {
        Some(DepPopupEntry::Task { uuid, .. }) => Some(uuid.clone()),
        _ => None,
    });
    match target {
        Some(Some(uuid)) => {
            app.dep_popup = None;
            jump_to(app, &uuid);
        }
        Some(None) => app.set_info("That task is not active"),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Single-line prompt

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.prompt = None,
        KeyCode::Enter => submit_annotation(app),
        KeyCode::Backspace => {
            prompt.buffer.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            prompt.buffer.push(c);
        }
        _ => {}
    }
}
