//! Substring-filtered chooser over a private snapshot of active tasks.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::gateway::{StoreError, TaskStore};
use crate::model::task::Task;
use crate::ops::search::filter_tasks;

/// What the caller will do with the chosen task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPurpose {
    /// Highlight it in the main table
    Jump,
    /// Append it to the editor's depends field
    Dependency,
}

/// The task the user chose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedTask {
    pub uuid: String,
    /// Short id if the task has one, else its full uuid
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    Chosen(PickedTask),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct SearchPicker {
    pub purpose: PickerPurpose,
    snapshot: Vec<Task>,
    query: String,
    matches: Vec<usize>,
    cursor: usize,
}

impl SearchPicker {
    /// Take a fresh snapshot from the store; the shared collection is not used.
    pub fn open(store: &dyn TaskStore, purpose: PickerPurpose) -> Result<Self, StoreError> {
        Ok(Self::with_snapshot(store.export_active()?, purpose))
    }

    pub fn with_snapshot(snapshot: Vec<Task>, purpose: PickerPurpose) -> Self {
        let matches = (0..snapshot.len()).collect();
        SearchPicker {
            purpose,
            snapshot,
            query: String::new(),
            matches,
            cursor: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current matches, in snapshot order
    pub fn matches(&self) -> impl Iterator<Item = &Task> {
        self.matches.iter().map(|&i| &self.snapshot[i])
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.matches = filter_tasks(&self.snapshot, &self.query);
        self.cursor = self.cursor.min(self.matches.len().saturating_sub(1));
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.matches.is_empty() {
            return;
        }
        let max = self.matches.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    fn chosen(&self) -> Option<PickedTask> {
        let task = &self.snapshot[*self.matches.get(self.cursor)?];
        Some(PickedTask {
            uuid: task.uuid.clone(),
            reference: task.dependency_ref(),
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        match key.code {
            KeyCode::Esc => PickerOutcome::Cancelled,
            KeyCode::Enter => match self.chosen() {
                Some(picked) => PickerOutcome::Chosen(picked),
                None => PickerOutcome::Pending,
            },
            KeyCode::Up => {
                self.move_cursor(-1);
                PickerOutcome::Pending
            }
            KeyCode::Down => {
                self.move_cursor(1);
                PickerOutcome::Pending
            }
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_cursor(-1);
                PickerOutcome::Pending
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_cursor(1);
                PickerOutcome::Pending
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.refilter();
                PickerOutcome::Pending
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push(c);
                self.refilter();
                PickerOutcome::Pending
            }
            _ => PickerOutcome::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_store::FakeStore;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tasks() -> Vec<Task> {
        let mut tasks = vec![
            Task::new("u1", "Fix login bug"),
            Task::new("u2", "Write docs"),
            Task::new("u3", "Deploy"),
        ];
        tasks[0].id = Some(1);
        tasks[1].id = Some(2);
        tasks[2].project = "login-service".into();
        tasks
    }

    fn type_str(picker: &mut SearchPicker, s: &str) {
        for c in s.chars() {
            picker.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn open_takes_its_own_snapshot() {
        let store = FakeStore::with_tasks(tasks());
        let picker = SearchPicker::open(&store, PickerPurpose::Jump).unwrap();
        assert_eq!(store.export_count(), 1);
        assert_eq!(picker.match_count(), 3);
    }

    #[test]
    fn filters_on_every_keystroke() {
        let mut picker = SearchPicker::with_snapshot(tasks(), PickerPurpose::Jump);
        type_str(&mut picker, "LOG");
        let uuids: Vec<&str> = picker.matches().map(|t| t.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["u1", "u3"]);

        picker.handle_key(key(KeyCode::Backspace));
        picker.handle_key(key(KeyCode::Backspace));
        picker.handle_key(key(KeyCode::Backspace));
        assert_eq!(picker.query(), "");
        assert_eq!(picker.match_count(), 3);
    }

    #[test]
    fn enter_chooses_highlighted_match() {
        let mut picker = SearchPicker::with_snapshot(tasks(), PickerPurpose::Dependency);
        type_str(&mut picker, "o");
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter)),
            PickerOutcome::Chosen(PickedTask {
                uuid: "u2".into(),
                reference: "2".into(),
            })
        );
    }

    #[test]
    fn task_without_id_is_referenced_by_full_uuid() {
        let uuid = "5f0e9c1a-2b3c-4d5e-8f90-abcdef012345";
        let mut snapshot = tasks();
        snapshot.push(Task::new(uuid, "Rotate keys"));
        let mut picker = SearchPicker::with_snapshot(snapshot, PickerPurpose::Dependency);
        type_str(&mut picker, "rotate");
        match picker.handle_key(key(KeyCode::Enter)) {
            PickerOutcome::Chosen(picked) => assert_eq!(picked.reference, uuid),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn escape_cancels() {
        let mut picker = SearchPicker::with_snapshot(tasks(), PickerPurpose::Jump);
        type_str(&mut picker, "docs");
        assert_eq!(picker.handle_key(key(KeyCode::Esc)), PickerOutcome::Cancelled);
    }

    #[test]
    fn enter_with_no_matches_stays_open() {
        let mut picker = SearchPicker::with_snapshot(tasks(), PickerPurpose::Jump);
        type_str(&mut picker, "zzz");
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerOutcome::Pending);
    }

    #[test]
    fn cursor_clamps_when_matches_shrink() {
        let mut picker = SearchPicker::with_snapshot(tasks(), PickerPurpose::Jump);
        picker.move_cursor(10);
        assert_eq!(picker.cursor(), 2);
        picker.set_query("docs");
        assert_eq!(picker.cursor(), 0);
    }
}
