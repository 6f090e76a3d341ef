use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::io::gateway::{FieldSet, StoreError, TaskRef, TaskStore};
use crate::model::task::{Annotation, Priority, Task};

/// A store call, as recorded by [`FakeStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ExportOne(TaskRef),
    Add(FieldSet),
    Modify(String, FieldSet),
    ModifyRaw(String, Vec<String>),
    Start(String),
    Stop(String),
    Done(String),
    Undo,
    Annotate(String, String),
    Denotate(String, String),
}

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<Task>,
    calls: Vec<Call>,
    exports: usize,
    export_error: Option<String>,
    failing: HashMap<String, String>,
    add_error: Option<String>,
    add_result: Option<TaskRef>,
    next_id: u64,
}

/// In-memory [`TaskStore`] that records every mutation and applies the
/// simple ones to its task list so refreshes see the effect.
///
/// Clones share state, so a test can keep a handle after giving one away.
#[derive(Debug, Clone, Default)]
pub struct FakeStore {
    inner: Rc<RefCell<Inner>>,
}

impl FakeStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().filter_map(|t| t.id).max().unwrap_or(0) + 1;
        let store = FakeStore::default();
        {
            let mut inner = store.inner.borrow_mut();
            inner.tasks = tasks;
            inner.next_id = next_id;
        }
        store
    }

    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.inner.borrow_mut().tasks = tasks;
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.borrow().tasks.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    pub fn export_count(&self) -> usize {
        self.inner.borrow().exports
    }

    /// Make every export fail with this diagnostic
    pub fn fail_exports(&self, message: &str) {
        self.inner.borrow_mut().export_error = Some(message.to_string());
    }

    /// Make every mutation addressed to `uuid` fail
    pub fn fail_for(&self, uuid: &str, message: &str) {
        self.inner
            .borrow_mut()
            .failing
            .insert(uuid.to_string(), message.to_string());
    }

    pub fn fail_adds(&self, message: &str) {
        self.inner.borrow_mut().add_error = Some(message.to_string());
    }

    /// Override what `add` reports (e.g. the `+LATEST` fallback)
    pub fn add_reports(&self, reference: TaskRef) {
        self.inner.borrow_mut().add_result = Some(reference);
    }

    fn record(&self, call: Call) {
        self.inner.borrow_mut().calls.push(call);
    }

    fn check(&self, uuid: &str) -> Result<(), StoreError> {
        match self.inner.borrow().failing.get(uuid) {
            Some(message) => Err(rejected(message)),
            None => Ok(()),
        }
    }

    fn with_task(&self, uuid: &str, f: impl FnOnce(&mut Task)) {
        if let Some(task) = self
            .inner
            .borrow_mut()
            .tasks
            .iter_mut()
            .find(|t| t.uuid == uuid)
        {
            f(task);
        }
    }
}

fn rejected(message: &str) -> StoreError {
    StoreError::Rejected {
        code: Some(1),
        message: message.to_string(),
    }
}

fn apply_fields(task: &mut Task, fields: &FieldSet) {
    task.description = fields.description.clone();
    task.project = fields.project.clone();
    task.priority = fields.priority;
    task.due = (!fields.due.is_empty()).then(|| fields.due.clone());
    task.tags = fields.tags.clone();
    task.depends = fields
        .depends
        .split(',')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
}

impl TaskStore for FakeStore {
    fn export_active(&self) -> Result<Vec<Task>, StoreError> {
        let mut inner = self.inner.borrow_mut();
        inner.exports += 1;
        match &inner.export_error {
            Some(message) => Err(rejected(message)),
            None => Ok(inner.tasks.clone()),
        }
    }

    fn export_one(&self, task: &TaskRef) -> Result<Option<Task>, StoreError> {
        self.record(Call::ExportOne(task.clone()));
        let inner = self.inner.borrow();
        Ok(match task {
            TaskRef::Id(id) => inner.tasks.iter().find(|t| t.id == Some(*id)).cloned(),
            TaskRef::Uuid(uuid) => inner.tasks.iter().find(|t| &t.uuid == uuid).cloned(),
            TaskRef::Latest => inner.tasks.last().cloned(),
        })
    }

    fn add(&self, fields: &FieldSet) -> Result<TaskRef, StoreError> {
        self.record(Call::Add(fields.clone()));
        let mut inner = self.inner.borrow_mut();
        if let Some(message) = &inner.add_error {
            return Err(rejected(message));
        }
        let id = inner.next_id.max(1);
        inner.next_id = id + 1;
        let mut task = Task::new(format!("new-{}", id), "");
        task.id = Some(id);
        apply_fields(&mut task, fields);
        inner.tasks.push(task);
        Ok(inner.add_result.clone().unwrap_or(TaskRef::Id(id)))
    }

    fn modify(&self, uuid: &str, fields: &FieldSet) -> Result<(), StoreError> {
        self.record(Call::Modify(uuid.to_string(), fields.clone()));
        self.check(uuid)?;
        self.with_task(uuid, |t| apply_fields(t, fields));
        Ok(())
    }

    fn modify_raw(&self, uuid: &str, mods: &[String]) -> Result<(), StoreError> {
        self.record(Call::ModifyRaw(uuid.to_string(), mods.to_vec()));
        self.check(uuid)?;
        self.with_task(uuid, |t| {
            for m in mods {
                if let Some(p) = m.strip_prefix("priority:") {
                    t.priority = Priority::from_code(p);
                } else if let Some(d) = m.strip_prefix("due:") {
                    t.due = (!d.is_empty()).then(|| d.to_string());
                }
            }
        });
        Ok(())
    }

    fn start(&self, uuid: &str) -> Result<(), StoreError> {
        self.record(Call::Start(uuid.to_string()));
        self.check(uuid)?;
        self.with_task(uuid, |t| t.start = Some("20250101T090000Z".into()));
        Ok(())
    }

    fn stop(&self, uuid: &str) -> Result<(), StoreError> {
        self.record(Call::Stop(uuid.to_string()));
        self.check(uuid)?;
        self.with_task(uuid, |t| t.start = None);
        Ok(())
    }

    fn done(&self, uuid: &str) -> Result<(), StoreError> {
        self.record(Call::Done(uuid.to_string()));
        self.check(uuid)?;
        self.inner.borrow_mut().tasks.retain(|t| t.uuid != uuid);
        Ok(())
    }

    fn undo(&self) -> Result<(), StoreError> {
        self.record(Call::Undo);
        Ok(())
    }

    fn annotate(&self, uuid: &str, text: &str) -> Result<(), StoreError> {
        self.record(Call::Annotate(uuid.to_string(), text.to_string()));
        self.check(uuid)?;
        self.with_task(uuid, |t| {
            t.annotations.push(Annotation {
                entry: "20250101T090000Z".into(),
                description: text.to_string(),
            })
        });
        Ok(())
    }

    fn denotate(&self, uuid: &str, text: &str) -> Result<(), StoreError> {
        self.record(Call::Denotate(uuid.to_string(), text.to_string()));
        self.check(uuid)?;
        self.with_task(uuid, |t| t.annotations.retain(|a| a.description != text));
        Ok(())
    }
}
