use std::cmp::Ordering;

use crate::model::task::Task;

/// Fixed table column schema, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Project,
    Priority,
    Due,
    Description,
    Tags,
    Urgency,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Id,
        Column::Project,
        Column::Priority,
        Column::Due,
        Column::Description,
        Column::Tags,
        Column::Urgency,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Project => "Project",
            Column::Priority => "Pri",
            Column::Due => "Due",
            Column::Description => "Description",
            Column::Tags => "Tags",
            Column::Urgency => "Urg",
        }
    }

    pub fn index(self) -> usize {
        Column::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    /// String form used by the lexicographic comparator
    fn sort_key(self, task: &Task) -> String {
        match self {
            Column::Id => task.display_id(),
            Column::Project => task.project.clone(),
            Column::Priority => task.priority.code().to_string(),
            Column::Due => task.due.clone().unwrap_or_default(),
            Column::Description => task.description.clone(),
            Column::Tags => task.tags_joined(),
            Column::Urgency => task.urgency.to_string(),
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Column,
    pub descending: bool,
}

impl Default for SortState {
    /// Most urgent first
    fn default() -> Self {
        SortState {
            column: Column::Urgency,
            descending: true,
        }
    }
}

impl SortState {
    /// Header click: the active column flips direction, any other column
    /// becomes active ascending.
    pub fn select(&mut self, column: Column) {
        if self.column == column {
            self.descending = !self.descending;
        } else {
            self.column = column;
            self.descending = false;
        }
    }

    /// Direction actually applied. Priority always sorts high-to-low.
    pub fn effective_descending(&self) -> bool {
        self.column == Column::Priority || self.descending
    }
}

/// Column-specific ascending comparison
pub fn compare(column: Column, a: &Task, b: &Task) -> Ordering {
    match column {
        Column::Urgency => a.urgency.total_cmp(&b.urgency),
        Column::Priority => a.priority.weight().cmp(&b.priority.weight()),
        _ => {
            let ka = column.sort_key(a).to_lowercase();
            let kb = column.sort_key(b).to_lowercase();
            ka.cmp(&kb)
        }
    }
}

/// Stable sort: equal keys keep their input order in both directions.
pub fn sort_tasks<'a>(tasks: &'a [Task], state: &SortState) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    let descending = state.effective_descending();
    sorted.sort_by(|a, b| {
        let ord = compare(state.column, a, b);
        if descending { ord.reverse() } else { ord }
    });
    sorted
}
