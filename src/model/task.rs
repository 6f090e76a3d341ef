use serde::{Deserialize, Deserializer};

/// Task priority as stored by Taskwarrior.
///
/// Anything other than `H`, `M` or `L` (absent, empty, the legacy `X`) is
/// treated as [`Priority::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    #[default]
    None,
    Low,
    Mid,
    High,
}

impl Priority {
    /// Parse the store's single-letter form
    pub fn from_code(code: &str) -> Priority {
        match code.trim() {
            "H" => Priority::High,
            "M" => Priority::Mid,
            "L" => Priority::Low,
            _ => Priority::None,
        }
    }

    /// Value sent to the store. `None` is sent empty, which clears the field.
    pub fn code(self) -> &'static str {
        match self {
            Priority::High => "H",
            Priority::Mid => "M",
            Priority::Low => "L",
            Priority::None => "",
        }
    }

    /// Ordinal weight used for sorting
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Mid => 2,
            Priority::Low => 1,
            Priority::None => 0,
        }
    }

    /// Cycle None → L → M → H → None (used by the editor's priority field)
    pub fn next(self) -> Priority {
        match self {
            Priority::None => Priority::Low,
            Priority::Low => Priority::Mid,
            Priority::Mid => Priority::High,
            Priority::High => Priority::None,
        }
    }

    pub fn prev(self) -> Priority {
        match self {
            Priority::None => Priority::High,
            Priority::High => Priority::Mid,
            Priority::Mid => Priority::Low,
            Priority::Low => Priority::None,
        }
    }

    /// Label for the editor panel
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Mid => "Medium",
            Priority::Low => "Low",
            Priority::None => "none",
        }
    }
}

/// A timestamped free-text note on a task
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub entry: String,
    pub description: String,
}

/// Read-only snapshot of one task from `task export`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    /// Working-set id. Taskwarrior exports `0` for tasks outside the
    /// working set; that maps to `None`.
    #[serde(default, deserialize_with = "de_short_id")]
    pub id: Option<u64>,
    pub uuid: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project: String,
    #[serde(default, deserialize_with = "de_priority")]
    pub priority: Priority,
    /// Compact date-time, e.g. `20250101T000000Z`
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Referenced tasks (uuids in exports, ids when typed by hand)
    #[serde(default, deserialize_with = "de_depends")]
    pub depends: Vec<String>,
    #[serde(default, deserialize_with = "de_urgency")]
    pub urgency: f64,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Task {
    /// Minimal task for tests and placeholders
    pub fn new(uuid: impl Into<String>, description: impl Into<String>) -> Self {
        Task {
            id: None,
            uuid: uuid.into(),
            description: description.into(),
            project: String::new(),
            priority: Priority::None,
            due: None,
            tags: Vec::new(),
            depends: Vec::new(),
            urgency: 0.0,
            start: None,
            annotations: Vec::new(),
        }
    }

    /// Whether the activity marker is set
    pub fn is_active(&self) -> bool {
        self.start.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Date component of `due` (`YYYYMMDD`), or empty
    pub fn due_date(&self) -> &str {
        match self.due.as_deref() {
            Some(due) => due.get(..8).unwrap_or(due),
            None => "",
        }
    }

    /// First block of the uuid, as Taskwarrior abbreviates it
    pub fn short_uuid(&self) -> &str {
        self.uuid.split('-').next().unwrap_or(&self.uuid)
    }

    /// What the table shows in the id column
    pub fn display_id(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => self.short_uuid().to_string(),
        }
    }

    /// How another task's `depends` names this one: the short id while it
    /// has one, else the full uuid
    pub fn dependency_ref(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => self.uuid.clone(),
        }
    }

    /// Tags joined in store order
    pub fn tags_joined(&self) -> String {
        self.tags.join(" ")
    }
}

fn de_short_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<u64>::deserialize(deserializer)?;
    Ok(id.filter(|id| *id != 0))
}

fn de_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let code = Option::<String>::deserialize(deserializer)?;
    Ok(code.as_deref().map_or(Priority::None, Priority::from_code))
}

/// Taskwarrior 2.x exports `depends` as a comma-joined string, 3.x as an array.
fn de_depends<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Depends {
        List(Vec<String>),
        Joined(String),
    }

    let deps = Option::<Depends>::deserialize(deserializer)?;
    Ok(match deps {
        Some(Depends::List(list)) => list,
        Some(Depends::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    })
}

/// Urgency is computed by the store; anything unparsable counts as 0.0.
fn de_urgency<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let urgency = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if urgency.is_finite() { urgency } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_full_export_record() {
        let json = r#"{
            "id": 4,
            "uuid": "6f1e3a52-0000-4000-8000-000000000001",
            "description": "Write release notes",
            "project": "docs",
            "priority": "H",
            "due": "20250101T230000Z",
            "tags": ["writing", "release"],
            "depends": ["aaaa-1", "bbbb-2"],
            "urgency": 12.5,
            "start": "20241230T101500Z",
            "annotations": [{"entry": "20241230T101500Z", "description": "draft in wiki"}]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, Some(4));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date(), "20250101");
        assert_eq!(task.tags, vec!["writing", "release"]);
        assert_eq!(task.depends, vec!["aaaa-1", "bbbb-2"]);
        assert_eq!(task.urgency, 12.5);
        assert!(task.is_active());
        assert_eq!(task.annotations[0].description, "draft in wiki");
    }

    #[test]
    fn deserialize_minimal_record_uses_defaults() {
        let task: Task = serde_json::from_str(r#"{"uuid": "u1"}"#).unwrap();
        assert_eq!(task.id, None);
        assert_eq!(task.project, "");
        assert_eq!(task.priority, Priority::None);
        assert!(task.depends.is_empty());
        assert_eq!(task.urgency, 0.0);
        assert!(!task.is_active());
        assert_eq!(task.due_date(), "");
    }

    #[test]
    fn zero_id_means_outside_working_set() {
        let task: Task = serde_json::from_str(r#"{"id": 0, "uuid": "abcd1234-ef"}"#).unwrap();
        assert_eq!(task.id, None);
        assert_eq!(task.display_id(), "abcd1234");
        assert_eq!(task.dependency_ref(), "abcd1234-ef");
    }

    #[test]
    fn legacy_comma_joined_depends() {
        let task: Task =
            serde_json::from_str(r#"{"uuid": "u1", "depends": "a, b,,c"}"#).unwrap();
        assert_eq!(task.depends, vec!["a", "b", "c"]);
    }

    #[test]
    fn unparsable_urgency_is_zero() {
        let task: Task = serde_json::from_str(r#"{"uuid": "u1", "urgency": "n/a"}"#).unwrap();
        assert_eq!(task.urgency, 0.0);
        let task: Task = serde_json::from_str(r#"{"uuid": "u1", "urgency": "3.25"}"#).unwrap();
        assert_eq!(task.urgency, 3.25);
    }

    #[test]
    fn priority_none_class() {
        assert_eq!(Priority::from_code("X"), Priority::None);
        assert_eq!(Priority::from_code(""), Priority::None);
        assert_eq!(Priority::from_code("M"), Priority::Mid);
        assert_eq!(Priority::None.code(), "");
        let task: Task = serde_json::from_str(r#"{"uuid": "u1", "priority": "X"}"#).unwrap();
        assert_eq!(task.priority, Priority::None);
    }

    #[test]
    fn priority_cycle_round_trips() {
        let mut p = Priority::None;
        for _ in 0..4 {
            p = p.next();
        }
        assert_eq!(p, Priority::None);
        assert_eq!(Priority::High.prev().next(), Priority::High);
    }
}
