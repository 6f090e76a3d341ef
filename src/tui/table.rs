use crate::model::task::{Priority, Task};
use crate::ops::collection::{Selection, TaskCollection};
use crate::ops::sort::{SortState, sort_tasks};

/// Urgency above this is emphasized
pub const URGENCY_EMPHASIS_THRESHOLD: f64 = 20.0;

/// Leading status marker. Selection wins over activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowGlyph {
    None,
    Active,
    Selected,
}

impl RowGlyph {
    pub fn symbol(self) -> &'static str {
        match self {
            RowGlyph::None => " ",
            RowGlyph::Active => "\u{25B6}",
            RowGlyph::Selected => "\u{25CF}",
        }
    }
}

pub const DEPENDS_GLYPH: &str = "\u{21B3}";

/// One display row, detached from the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub uuid: String,
    pub glyph: RowGlyph,
    pub has_depends: bool,
    pub id: String,
    pub project: String,
    pub priority: Priority,
    /// `YYYY-MM-DD`, or empty
    pub due: String,
    pub description: String,
    pub tags: String,
    pub urgency: f64,
    pub urgent: bool,
}

impl Row {
    fn from_task(task: &Task, selection: &Selection) -> Self {
        let glyph = if selection.contains(&task.uuid) {
            RowGlyph::Selected
        } else if task.is_active() {
            RowGlyph::Active
        } else {
            RowGlyph::None
        };
        Row {
            uuid: task.uuid.clone(),
            glyph,
            has_depends: !task.depends.is_empty(),
            id: task.display_id(),
            project: task.project.clone(),
            priority: task.priority,
            due: format_due(task.due.as_deref()),
            description: task.description.clone(),
            tags: task.tags_joined(),
            urgency: task.urgency,
            urgent: task.urgency > URGENCY_EMPHASIS_THRESHOLD,
        }
    }
}

/// Render a compact store timestamp (or bare `YYYYMMDD`) as a calendar date
pub fn format_due(due: Option<&str>) -> String {
    let Some(due) = due else {
        return String::new();
    };
    let date = due.get(..8).unwrap_or(due);
    chrono::NaiveDate::parse_from_str(date, "%Y%m%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Sorted display rows plus the cursor and scroll position that must
/// survive re-renders.
#[derive(Debug, Clone, Default)]
pub struct TableViewState {
    rows: Vec<Row>,
    cursor: Option<usize>,
    pub scroll_offset: usize,
}

impl TableViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild rows from the snapshot. The highlighted task keeps the
    /// cursor if it is still present; otherwise the old index is kept,
    /// clamped to the new row count.
    pub fn render(&mut self, collection: &TaskCollection, sort: &SortState, selection: &Selection) {
        let previous_uuid = self.highlighted_uuid().map(String::from);
        let previous_index = self.cursor;
        let scroll = self.scroll_offset;

        self.rows = sort_tasks(collection.tasks(), sort)
            .into_iter()
            .map(|task| Row::from_task(task, selection))
            .collect();

        self.cursor = if self.rows.is_empty() {
            None
        } else {
            previous_uuid
                .and_then(|uuid| self.position_of(&uuid))
                .or_else(|| Some(previous_index.unwrap_or(0).min(self.rows.len() - 1)))
        };
        self.scroll_offset = scroll;
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn highlighted(&self) -> Option<&Row> {
        self.cursor.and_then(|i| self.rows.get(i))
    }

    pub fn highlighted_uuid(&self) -> Option<&str> {
        self.highlighted().map(|row| row.uuid.as_str())
    }

    fn position_of(&self, uuid: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.uuid == uuid)
    }

    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = match cursor {
            Some(i) if !self.rows.is_empty() => Some(i.min(self.rows.len() - 1)),
            _ => None,
        };
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.cursor.unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(self.rows.len() - 1);
        self.cursor = Some(next);
    }

    pub fn jump_top(&mut self) {
        self.set_cursor(Some(0));
    }

    pub fn jump_bottom(&mut self) {
        self.set_cursor(self.rows.len().checked_sub(1));
    }

    /// Move the cursor to a task; false if it is not in the table
    pub fn select_uuid(&mut self, uuid: &str) -> bool {
        match self.position_of(uuid) {
            Some(i) => {
                self.cursor = Some(i);
                true
            }
            None => false,
        }
    }

    /// Keep the cursor inside a viewport of `height` rows
    pub fn clamp_scroll(&mut self, height: usize) {
        let Some(cursor) = self.cursor else {
            self.scroll_offset = 0;
            return;
        };
        if height == 0 {
            return;
        }
        if cursor < self.scroll_offset {
            self.scroll_offset = cursor;
        } else if cursor >= self.scroll_offset + height {
            self.scroll_offset = cursor + 1 - height;
        }
        let max_offset = self.rows.len().saturating_sub(height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}
