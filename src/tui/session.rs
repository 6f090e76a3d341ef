//! The view/edit state machine bound to one task.
//!
//! `Viewing` shows the highlighted task read-only. `Modifying` edits a
//! working copy of either an existing task or a blank new one. Once a field
//! changes the session is dirty, and it refuses to move to another task
//! until the edit is saved or cancelled.

use tracing::{debug, info};

use crate::io::gateway::{FieldSet, StoreError, TaskRef, TaskStore};
use crate::model::task::{Priority, Task};
use crate::ops::collection::TaskCollection;
use crate::util::unicode;

/// What the editor is bound to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Binding {
    #[default]
    None,
    /// A task being created, not yet in the store
    New,
    Existing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    Modifying,
}

/// Editable fields, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Description,
    Project,
    Priority,
    Due,
    Tags,
    Depends,
}

impl Field {
    pub const ORDER: [Field; 6] = [
        Field::Description,
        Field::Project,
        Field::Priority,
        Field::Due,
        Field::Tags,
        Field::Depends,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Description => "Description",
            Field::Project => "Project",
            Field::Priority => "Priority",
            Field::Due => "Due",
            Field::Tags => "Tags",
            Field::Depends => "Depends",
        }
    }

    fn position(self) -> usize {
        Field::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Field {
        Field::ORDER[(self.position() + 1) % Field::ORDER.len()]
    }

    pub fn prev(self) -> Field {
        Field::ORDER[(self.position() + Field::ORDER.len() - 1) % Field::ORDER.len()]
    }
}

/// Working copy of the editable fields, as text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorFields {
    pub description: String,
    pub project: String,
    pub priority: Priority,
    /// Date component only (`YYYYMMDD`) when populated from a task
    pub due: String,
    /// Space-delimited
    pub tags: String,
    /// Comma-joined external ids
    pub depends: String,
}

impl EditorFields {
    /// Populate from a snapshot. Dependencies are shown by short id when the
    /// referenced task is in the collection; anything else (completed or
    /// deleted tasks) keeps the stored reference so a save writes it back
    /// unchanged.
    pub fn from_task(task: &Task, collection: &TaskCollection) -> Self {
        let depends = task
            .depends
            .iter()
            .map(|dep| match collection.find_by_reference(dep) {
                Some(t) => t.dependency_ref(),
                None => dep.clone(),
            })
            .collect::<Vec<_>>()
            .join(",");

        EditorFields {
            description: task.description.clone(),
            project: task.project.clone(),
            priority: task.priority,
            due: task.due_date().to_string(),
            tags: task.tags.join(" "),
            depends,
        }
    }

    /// Text of a text field; `None` for the priority selector
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Description => Some(&self.description),
            Field::Project => Some(&self.project),
            Field::Due => Some(&self.due),
            Field::Tags => Some(&self.tags),
            Field::Depends => Some(&self.depends),
            Field::Priority => None,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Description => Some(&mut self.description),
            Field::Project => Some(&mut self.project),
            Field::Due => Some(&mut self.due),
            Field::Tags => Some(&mut self.tags),
            Field::Depends => Some(&mut self.depends),
            Field::Priority => None,
        }
    }
}

/// Non-fatal refusals surfaced as status warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionWarning {
    #[error("unsaved changes: save (ctrl-s) or discard (esc) first")]
    GuardedTransition,
    #[error("no task selected")]
    NoTarget,
    #[error("no task to edit")]
    NoBinding,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("nothing to save")]
    NoBinding,
    /// Store diagnostic, shown verbatim
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationTarget {
    Add,
    Modify(String),
}

/// A store write built from the working copy
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub target: MutationTarget,
    pub fields: FieldSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New task created; how to address it
    Added(TaskRef),
    Modified(String),
}

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    binding: Binding,
    mode: EditMode,
    dirty: bool,
    fields: EditorFields,
    focus: Field,
    /// Byte offset into the focused text field
    cursor: usize,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_modifying(&self) -> bool {
        self.mode == EditMode::Modifying
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn fields(&self) -> &EditorFields {
        &self.fields
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// uuid of a bound existing task (never the creation sentinel)
    pub fn existing_uuid(&self) -> Option<&str> {
        match &self.binding {
            Binding::Existing(uuid) => Some(uuid),
            _ => None,
        }
    }

    /// Follow the table's highlighted row.
    ///
    /// Refused while dirty unless it is the task already bound. A clean
    /// session always ends up `Viewing` the highlighted task.
    pub fn highlight(
        &mut self,
        task: Option<&Task>,
        collection: &TaskCollection,
    ) -> Result<(), SessionWarning> {
        let same = match (&self.binding, task) {
            (Binding::Existing(uuid), Some(t)) => *uuid == t.uuid,
            (Binding::None, None) => true,
            _ => false,
        };
        if self.dirty {
            return if same {
                Ok(())
            } else {
                Err(SessionWarning::GuardedTransition)
            };
        }
        if same && self.is_modifying() {
            return Ok(());
        }

        self.enter_viewing(task, collection);
        Ok(())
    }

    /// Viewing → Modifying on the bound task
    pub fn begin_edit(
        &mut self,
        task: &Task,
        collection: &TaskCollection,
    ) -> Result<(), SessionWarning> {
        match &self.binding {
            Binding::Existing(uuid) if *uuid == task.uuid => {}
            _ => return Err(SessionWarning::NoBinding),
        }
        if self.is_modifying() {
            return Ok(());
        }
        self.fields = EditorFields::from_task(task, collection);
        self.mode = EditMode::Modifying;
        self.dirty = false;
        self.focus = Field::Description;
        self.cursor = self.fields.description.len();
        debug!(uuid = %task.uuid, "editing task");
        Ok(())
    }

    /// Start a blank task
    pub fn begin_new(&mut self) -> Result<(), SessionWarning> {
        if self.dirty {
            return Err(SessionWarning::GuardedTransition);
        }
        self.binding = Binding::New;
        self.fields = EditorFields::default();
        self.mode = EditMode::Modifying;
        self.dirty = false;
        self.focus = Field::Description;
        self.cursor = 0;
        Ok(())
    }

    /// Drop the working copy without sending anything and show
    /// `highlighted` read-only.
    pub fn cancel(&mut self, highlighted: Option<&Task>, collection: &TaskCollection) {
        self.enter_viewing(highlighted, collection);
    }

    fn enter_viewing(&mut self, task: Option<&Task>, collection: &TaskCollection) {
        self.mode = EditMode::Viewing;
        self.dirty = false;
        self.focus = Field::Description;
        self.cursor = 0;
        match task {
            Some(t) => {
                self.binding = Binding::Existing(t.uuid.clone());
                self.fields = EditorFields::from_task(t, collection);
            }
            None => {
                self.binding = Binding::None;
                self.fields = EditorFields::default();
            }
        }
    }

    // --- focus and cursor (not edits) ---

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next());
    }

    pub fn focus_prev(&mut self) {
        self.set_focus(self.focus.prev());
    }

    pub fn set_focus(&mut self, field: Field) {
        self.focus = field;
        self.cursor = self.fields.text(field).map_or(0, str::len);
    }

    pub fn cursor_left(&mut self) {
        if let Some(text) = self.fields.text(self.focus)
            && let Some(pos) = unicode::prev_grapheme_boundary(text, self.cursor)
        {
            self.cursor = pos;
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(text) = self.fields.text(self.focus)
            && let Some(pos) = unicode::next_grapheme_boundary(text, self.cursor)
        {
            self.cursor = pos;
        }
    }

    pub fn cursor_word_left(&mut self) {
        if let Some(text) = self.fields.text(self.focus) {
            self.cursor = unicode::word_boundary_left(text, self.cursor.min(text.len()));
        }
    }

    pub fn cursor_word_right(&mut self) {
        if let Some(text) = self.fields.text(self.focus) {
            self.cursor = unicode::word_boundary_right(text, self.cursor.min(text.len()));
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.fields.text(self.focus).map_or(0, str::len);
    }

    // --- edits: accepted only while Modifying, and each one marks dirty ---

    /// Type a character into the focused field. On the priority field,
    /// `h`/`m`/`l` pick a level and `n` clears it.
    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.is_modifying() {
            return false;
        }
        if self.focus == Field::Priority {
            let priority = match c.to_ascii_lowercase() {
                'h' => Priority::High,
                'm' => Priority::Mid,
                'l' => Priority::Low,
                'n' | 'x' => Priority::None,
                _ => return false,
            };
            return self.set_priority(priority);
        }
        let cursor = self.cursor;
        let Some(text) = self.fields.text_mut(self.focus) else {
            return false;
        };
        let at = cursor.min(text.len());
        text.insert(at, c);
        self.cursor = at + c.len_utf8();
        self.dirty = true;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if !self.is_modifying() {
            return false;
        }
        let cursor = self.cursor;
        let Some(text) = self.fields.text_mut(self.focus) else {
            return false;
        };
        let Some(start) = unicode::prev_grapheme_boundary(text, cursor.min(text.len())) else {
            return false;
        };
        text.replace_range(start..cursor.min(text.len()), "");
        self.cursor = start;
        self.dirty = true;
        true
    }

    /// Delete back to the previous word boundary (ctrl-w)
    pub fn delete_word_back(&mut self) -> bool {
        if !self.is_modifying() {
            return false;
        }
        let cursor = self.cursor;
        let Some(text) = self.fields.text_mut(self.focus) else {
            return false;
        };
        let end = cursor.min(text.len());
        let start = unicode::word_boundary_left(text, end);
        if start == end {
            return false;
        }
        text.replace_range(start..end, "");
        self.cursor = start;
        self.dirty = true;
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if !self.is_modifying() {
            return false;
        }
        let cursor = self.cursor;
        let Some(text) = self.fields.text_mut(self.focus) else {
            return false;
        };
        let Some(end) = unicode::next_grapheme_boundary(text, cursor) else {
            return false;
        };
        text.replace_range(cursor..end, "");
        self.dirty = true;
        true
    }

    pub fn set_priority(&mut self, priority: Priority) -> bool {
        if !self.is_modifying() {
            return false;
        }
        self.fields.priority = priority;
        self.dirty = true;
        true
    }

    pub fn cycle_priority(&mut self, forward: bool) -> bool {
        let p = self.fields.priority;
        self.set_priority(if forward { p.next() } else { p.prev() })
    }

    /// Replace a text field wholesale (paste, tests)
    pub fn set_field_text(&mut self, field: Field, value: &str) -> bool {
        if !self.is_modifying() {
            return false;
        }
        let Some(text) = self.fields.text_mut(field) else {
            return false;
        };
        *text = value.to_string();
        if self.focus == field {
            self.cursor = value.len();
        }
        self.dirty = true;
        true
    }

    /// Append a reference picked from the search picker to the depends field
    pub fn append_dependency(&mut self, reference: &str) -> bool {
        if !self.is_modifying() || reference.is_empty() {
            return false;
        }
        let deps = &mut self.fields.depends;
        if !deps.trim().is_empty() && !deps.trim_end().ends_with(',') {
            deps.push(',');
        }
        deps.push_str(reference);
        if self.focus == Field::Depends {
            self.cursor = self.fields.depends.len();
        }
        self.dirty = true;
        true
    }

    /// Build the store write for the working copy
    pub fn mutation(&self) -> Option<Mutation> {
        let target = match &self.binding {
            Binding::None => return None,
            Binding::New => MutationTarget::Add,
            Binding::Existing(uuid) => MutationTarget::Modify(uuid.clone()),
        };
        Some(Mutation {
            target,
            fields: FieldSet {
                description: self.fields.description.trim().to_string(),
                project: self.fields.project.trim().to_string(),
                priority: self.fields.priority,
                due: widen_due(&self.fields.due),
                tags: split_tags(&self.fields.tags),
                depends: normalize_depends(&self.fields.depends),
            },
        })
    }

    /// Send the working copy. On success the session is `Viewing` and
    /// clean; on failure nothing changes so the edits survive.
    pub fn save(&mut self, store: &dyn TaskStore) -> Result<SaveOutcome, SaveError> {
        let mutation = self.mutation().ok_or(SaveError::NoBinding)?;
        let outcome = match &mutation.target {
            MutationTarget::Add => SaveOutcome::Added(store.add(&mutation.fields)?),
            MutationTarget::Modify(uuid) => {
                store.modify(uuid, &mutation.fields)?;
                SaveOutcome::Modified(uuid.clone())
            }
        };
        info!(outcome = ?outcome, "task saved");

        self.mode = EditMode::Viewing;
        self.dirty = false;
        self.cursor = 0;
        if let SaveOutcome::Added(_) = outcome {
            // The new task's uuid is only known after the next refresh
            self.binding = Binding::None;
        }
        Ok(outcome)
    }
}

/// Split on commas, trim, drop empties, rejoin with commas
pub fn normalize_depends(input: &str) -> String {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// A bare `YYYYMMDD` becomes midnight of that day; anything else (relative
/// keywords, full timestamps) is passed through.
pub fn widen_due(input: &str) -> String {
    let due = input.trim();
    if due.len() == 8 && due.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}T000000", due)
    } else {
        due.to_string()
    }
}

/// Tags typed as a space- or comma-delimited list, optional `+` prefixes
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.trim_start_matches('+'))
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
