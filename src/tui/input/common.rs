//! Actions shared by the key handlers. Every store write ends in a refresh
//! from the same call.

use tracing::{info, warn};

use crate::io::gateway::TaskRef;
use crate::ops::batch::{apply_to_targets, summarize};
use crate::ops::sort::Column;
use crate::tui::app::{App, DepPopupEntry, DepPopupState, PromptState};
use crate::tui::picker::{PickedTask, PickerPurpose, SearchPicker};
use crate::tui::quick_menu::QuickAction;
use crate::tui::session::{SaveOutcome, SessionWarning};

/// Which quick menu to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MenuKind {
    Date,
    Priority,
}

// ---------------------------------------------------------------------------
// Editor

pub(super) fn begin_edit(app: &mut App) {
    let Some(task) = app.highlighted_task().cloned() else {
        app.set_warning(SessionWarning::NoBinding);
        return;
    };
    if let Err(w) = app.editor.begin_edit(&task, &app.collection) {
        app.set_warning(w);
    }
}

pub(super) fn begin_new(app: &mut App) {
    if let Err(w) = app.editor.begin_new() {
        app.set_warning(w);
    }
}

pub(super) fn cancel_edit(app: &mut App) {
    let task = app
        .table
        .highlighted_uuid()
        .and_then(|uuid| app.collection.find(uuid));
    app.editor.cancel(task, &app.collection);
}

pub(super) fn save_edit(app: &mut App) {
    let outcome = match app.editor.save(app.store.as_ref()) {
        Ok(outcome) => outcome,
        Err(e) => {
            app.set_error(e.to_string());
            return;
        }
    };
    if !app.refresh() {
        return;
    }
    match outcome {
        SaveOutcome::Modified(_) => app.set_info("Task saved"),
        SaveOutcome::Added(reference) => focus_created(app, &reference),
    }
}

/// Highlight a freshly added task, fetched by the reference `add` reported
fn focus_created(app: &mut App, reference: &TaskRef) {
    match app.store.export_one(reference) {
        Ok(Some(task)) => {
            if app.table.select_uuid(&task.uuid) {
                app.sync_editor();
            }
            app.set_info(format!("Created task {}", task.display_id()));
        }
        Ok(None) => {
            warn!(reference = %reference.as_arg(), "created task not found");
            app.set_info("Task created");
        }
        Err(e) => app.set_error(format!("task created, but lookup failed: {}", e)),
    }
}

// ---------------------------------------------------------------------------
// Selection

pub(super) fn toggle_selection(app: &mut App) {
    let Some(uuid) = app.table.highlighted_uuid().map(String::from) else {
        return;
    };
    app.selection.toggle(&uuid);
    app.rebuild_table();
}

pub(super) fn clear_selection(app: &mut App) {
    if app.selection.is_empty() {
        return;
    }
    app.selection.clear();
    app.rebuild_table();
    app.set_info("Selection cleared");
}

// ---------------------------------------------------------------------------
// Quick menu and batch actions

pub(super) fn open_quick_menu(app: &mut App, kind: MenuKind) {
    let targets = app.batch_targets();
    let opened = match kind {
        MenuKind::Date => app.quick_menu.open_date(&targets),
        MenuKind::Priority => app.quick_menu.open_priority(&targets),
    };
    match opened {
        Ok(()) => app.quick_targets = targets,
        Err(w) => app.set_warning(w),
    }
}

pub(super) fn apply_quick_action(app: &mut App, action: QuickAction) {
    let targets = std::mem::take(&mut app.quick_targets);
    let mods = action.modifications();
    let store = app.store.as_ref();
    let outcomes = apply_to_targets(&targets, |uuid| store.modify_raw(uuid, &mods));
    info!(action = %action.describe(), targets = targets.len(), "quick action applied");

    let (text, failed) = summarize("Updated", &outcomes);
    report_batch(app, text, failed);
}

pub(super) fn mark_done(app: &mut App) {
    let targets = app.batch_targets();
    if targets.is_empty() {
        app.set_warning(SessionWarning::NoTarget);
        return;
    }
    let store = app.store.as_ref();
    let outcomes = apply_to_targets(&targets, |uuid| store.done(uuid));
    app.selection.clear();

    let (text, failed) = summarize("Completed", &outcomes);
    report_batch(app, text, failed);
}

/// Refresh, then show the batch summary unless the refresh failed
fn report_batch(app: &mut App, text: String, failed: bool) {
    if !app.refresh() {
        return;
    }
    if failed {
        app.set_error(text);
    } else {
        app.set_info(text);
    }
}

pub(super) fn toggle_start(app: &mut App) {
    let Some(task) = app.highlighted_task() else {
        app.set_warning(SessionWarning::NoTarget);
        return;
    };
    let uuid = task.uuid.clone();
    let (result, verb) = if task.is_active() {
        (app.store.stop(&uuid), "Stopped")
    } else {
        (app.store.start(&uuid), "Started")
    };
    finish_single(app, result, verb);
}

pub(super) fn undo(app: &mut App) {
    let result = app.store.undo();
    finish_single(app, result, "Undid last change on");
}

fn finish_single(
    app: &mut App,
    result: Result<(), crate::io::gateway::StoreError>,
    verb: &str,
) {
    match result {
        Ok(()) => {
            if app.refresh() {
                app.set_info(format!("{} task", verb));
            }
        }
        Err(e) => {
            app.set_error(e.to_string());
            app.refresh();
        }
    }
}

// ---------------------------------------------------------------------------
// Annotations

pub(super) fn open_annotate_prompt(app: &mut App) {
    let Some(uuid) = app.table.highlighted_uuid().map(String::from) else {
        app.set_warning(SessionWarning::NoTarget);
        return;
    };
    app.prompt = Some(PromptState {
        uuid,
        label: "Annotate",
        buffer: String::new(),
    });
}

pub(super) fn submit_annotation(app: &mut App) {
    let Some(prompt) = app.prompt.take() else {
        return;
    };
    let text = prompt.buffer.trim();
    if text.is_empty() {
        return;
    }
    let result = app.store.annotate(&prompt.uuid, text);
    finish_single(app, result, "Annotated");
}

pub(super) fn remove_latest_annotation(app: &mut App) {
    let Some(task) = app.highlighted_task() else {
        app.set_warning(SessionWarning::NoTarget);
        return;
    };
    let Some(latest) = task.annotations.last() else {
        app.set_info("No annotations to remove");
        return;
    };
    let uuid = task.uuid.clone();
    let text = latest.description.clone();
    let result = app.store.denotate(&uuid, &text);
    finish_single(app, result, "Removed annotation from");
}

// ---------------------------------------------------------------------------
// Search picker

pub(super) fn open_picker(app: &mut App, purpose: PickerPurpose) {
    match SearchPicker::open(app.store.as_ref(), purpose) {
        Ok(picker) => app.picker = Some(picker),
        Err(e) => app.set_error(format!("search unavailable: {}", e)),
    }
}

pub(super) fn apply_pick(app: &mut App, purpose: PickerPurpose, picked: PickedTask) {
    match purpose {
        PickerPurpose::Jump => jump_to(app, &picked.uuid),
        PickerPurpose::Dependency => {
            app.editor.append_dependency(&picked.reference);
        }
    }
}

/// Highlight a task in the table, subject to the editor guard
pub(super) fn jump_to(app: &mut App, uuid: &str) {
    if !app.collection.contains(uuid) {
        // Picker snapshots can be newer than ours
        app.refresh();
    }
    let uuid = uuid.to_string();
    app.move_cursor_with(|table| {
        table.select_uuid(&uuid);
    });
    if app.table.highlighted_uuid() != Some(uuid.as_str()) && app.status.is_none() {
        app.set_info("Task is no longer active");
    }
}

// ---------------------------------------------------------------------------
// Dependency viewer

pub(super) fn open_dep_popup(app: &mut App) {
    let Some(task) = app.highlighted_task() else {
        app.set_warning(SessionWarning::NoTarget);
        return;
    };

    let mut entries = vec![DepPopupEntry::SectionHeader { label: "Blocked by" }];
    if task.depends.is_empty() {
        entries.push(DepPopupEntry::Nothing);
    }
    for dep in &task.depends {
        entries.push(match app.collection.find_by_reference(dep) {
            Some(t) => DepPopupEntry::Task {
                uuid: Some(t.uuid.clone()),
                id: t.display_id(),
                description: t.description.clone(),
            },
            None => DepPopupEntry::Task {
                uuid: None,
                id: dep.split('-').next().unwrap_or(dep).to_string(),
                description: "(not active)".to_string(),
            },
        });
    }

    entries.push(DepPopupEntry::SectionHeader { label: "Blocks" });
    let blocked: Vec<DepPopupEntry> = app
        .collection
        .tasks()
        .iter()
        .filter(|t| {
            t.depends
                .iter()
                .any(|d| app.collection.find_by_reference(d).is_some_and(|r| r.uuid == task.uuid))
        })
        .map(|t| DepPopupEntry::Task {
            uuid: Some(t.uuid.clone()),
            id: t.display_id(),
            description: t.description.clone(),
        })
        .collect();
    if blocked.is_empty() {
        entries.push(DepPopupEntry::Nothing);
    }
    entries.extend(blocked);

    let cursor = first_task_entry(&entries).unwrap_or(0);
    let title = format!("Dependencies of {}", task.display_id());
    app.dep_popup = Some(DepPopupState {
        title,
        entries,
        cursor,
    });
}

fn first_task_entry(entries: &[DepPopupEntry]) -> Option<usize> {
    entries
        .iter()
        .position(|e| matches!(e, DepPopupEntry::Task { .. }))
}

// ---------------------------------------------------------------------------
// Sorting and lifecycle

pub(super) fn sort_by(app: &mut App, column: Column) {
    app.sort.select(column);
    app.rebuild_table();
    let dir = if app.sort.effective_descending() {
        "descending"
    } else {
        "ascending"
    };
    app.set_info(format!("Sorted by {} ({})", column.title(), dir));
}

/// Move the sort to the neighbouring column
pub(super) fn cycle_sort(app: &mut App, forward: bool) {
    let len = Column::ALL.len();
    let index = app.sort.column.index();
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    if let Some(column) = Column::from_index(next) {
        sort_by(app, column);
    }
}

pub(super) fn manual_refresh(app: &mut App) {
    if app.refresh() {
        app.set_info(format!("{} active tasks", app.collection.len()));
    }
}

pub(super) fn request_quit(app: &mut App) {
    if app.editor.is_dirty() {
        app.set_warning(SessionWarning::GuardedTransition);
        return;
    }
    app.should_quit = true;
}
