use std::collections::HashMap;

use indexmap::IndexSet;
use tracing::{info, warn};

use crate::io::gateway::{StoreError, TaskStore};
use crate::model::task::Task;

/// In-memory snapshot of the store's active tasks, keyed by uuid.
///
/// Replaced wholesale by [`TaskCollection::refresh`]; never patched in place.
#[derive(Debug, Clone, Default)]
pub struct TaskCollection {
    tasks: Vec<Task>,
    by_uuid: HashMap<String, usize>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from an export. Later duplicates of a uuid are dropped.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut by_uuid = HashMap::with_capacity(tasks.len());
        let mut kept = Vec::with_capacity(tasks.len());
        for task in tasks {
            if by_uuid.contains_key(&task.uuid) {
                warn!(uuid = %task.uuid, "duplicate uuid in export, keeping first");
                continue;
            }
            by_uuid.insert(task.uuid.clone(), kept.len());
            kept.push(task);
        }
        TaskCollection {
            tasks: kept,
            by_uuid,
        }
    }

    /// Re-query the store and swap in the new snapshot. On failure the
    /// previous snapshot is kept untouched.
    pub fn refresh(&mut self, store: &dyn TaskStore) -> Result<usize, StoreError> {
        match store.export_active() {
            Ok(tasks) => {
                *self = Self::from_tasks(tasks);
                info!(count = self.len(), "task snapshot refreshed");
                Ok(self.len())
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, uuid: &str) -> Option<&Task> {
        self.by_uuid.get(uuid).map(|&i| &self.tasks[i])
    }

    /// Look up by uuid, short id, or uuid prefix (how `depends` entries and
    /// hand-typed references address tasks)
    pub fn find_by_reference(&self, reference: &str) -> Option<&Task> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if let Some(task) = self.find(reference) {
            return Some(task);
        }
        if let Ok(id) = reference.parse::<u64>() {
            return self.tasks.iter().find(|t| t.id == Some(id));
        }
        self.tasks.iter().find(|t| t.uuid.starts_with(reference))
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.by_uuid.contains_key(uuid)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Tasks marked for batch actions, in the order they were marked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    uuids: IndexSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership; returns whether the uuid is now selected
    pub fn toggle(&mut self, uuid: &str) -> bool {
        if self.uuids.shift_remove(uuid) {
            false
        } else {
            self.uuids.insert(uuid.to_string());
            true
        }
    }

    pub fn insert(&mut self, uuid: &str) {
        self.uuids.insert(uuid.to_string());
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.uuids.contains(uuid)
    }

    pub fn clear(&mut self) {
        self.uuids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.uuids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.uuids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uuids.iter().map(String::as_str)
    }

    /// Drop members that are no longer in the snapshot (completed or
    /// deleted elsewhere). Returns how many were dropped.
    pub fn retain_present(&mut self, collection: &TaskCollection) -> usize {
        let before = self.uuids.len();
        self.uuids.retain(|uuid| collection.contains(uuid));
        before - self.uuids.len()
    }
}
