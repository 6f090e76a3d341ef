//! Synchronous boundary to the external task tool.
//!
//! Every call spawns one `task` process, waits for it, and captures its
//! output. Nothing here keeps state between calls.

use std::process::{Command, Output, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::model::config::TaskConfig;
use crate::model::task::{Priority, Task};

/// Overrides for commands that only read
const QUERY_RC: [&str; 3] = ["rc.verbose=nothing", "rc.json.array=on", "rc.hooks=off"];

/// Overrides for commands that write. `new-id` makes `add` report the id.
const MUTATE_RC: [&str; 3] = ["rc.confirmation=off", "rc.bulk=0", "rc.verbose=new-id"];

static CREATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Created task (\d+)").expect("valid regex"));

/// Error type for store calls
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("unreadable export: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The tool ran and exited non-zero; `message` is its diagnostic text
    #[error("{message}")]
    Rejected { code: Option<i32>, message: String },
}

/// How a command addresses a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    Id(u64),
    Uuid(String),
    /// The most recently added task. Racy if something else adds a task
    /// between our `add` and the lookup.
    Latest,
}

impl TaskRef {
    pub fn as_arg(&self) -> String {
        match self {
            TaskRef::Id(id) => id.to_string(),
            TaskRef::Uuid(uuid) => uuid.clone(),
            TaskRef::Latest => "+LATEST".to_string(),
        }
    }
}

/// The editable field set sent by add/modify. Empty values clear the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    pub description: String,
    pub project: String,
    pub priority: Priority,
    pub due: String,
    pub tags: Vec<String>,
    /// Comma-joined dependency references
    pub depends: String,
}

impl FieldSet {
    /// `attr:value` modifications for `modify`, clearing empty fields
    pub fn modify_args(&self) -> Vec<String> {
        vec![
            format!("description:{}", self.description),
            format!("project:{}", self.project),
            format!("priority:{}", self.priority.code()),
            format!("due:{}", self.due),
            format!("tags:{}", self.tags.join(",")),
            format!("depends:{}", self.depends),
        ]
    }

    /// Arguments after `add`: non-empty attributes, then the description
    pub fn add_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if !self.project.is_empty() {
            args.push(format!("project:{}", self.project));
        }
        if self.priority != Priority::None {
            args.push(format!("priority:{}", self.priority.code()));
        }
        if !self.due.is_empty() {
            args.push(format!("due:{}", self.due));
        }
        if !self.tags.is_empty() {
            args.push(format!("tags:{}", self.tags.join(",")));
        }
        if !self.depends.is_empty() {
            args.push(format!("depends:{}", self.depends));
        }
        args.push("--".to_string());
        args.push(self.description.clone());
        args
    }
}

/// Query/mutate primitives of the external store
pub trait TaskStore {
    /// All tasks not yet completed or deleted
    fn export_active(&self) -> Result<Vec<Task>, StoreError>;
    /// A single task, fetched fresh
    fn export_one(&self, task: &TaskRef) -> Result<Option<Task>, StoreError>;
    /// Create a task; returns how to address it afterwards
    fn add(&self, fields: &FieldSet) -> Result<TaskRef, StoreError>;
    fn modify(&self, uuid: &str, fields: &FieldSet) -> Result<(), StoreError>;
    /// Modify with raw `attr:value` arguments (quick actions)
    fn modify_raw(&self, uuid: &str, mods: &[String]) -> Result<(), StoreError>;
    fn start(&self, uuid: &str) -> Result<(), StoreError>;
    fn stop(&self, uuid: &str) -> Result<(), StoreError>;
    fn done(&self, uuid: &str) -> Result<(), StoreError>;
    fn undo(&self) -> Result<(), StoreError>;
    fn annotate(&self, uuid: &str, text: &str) -> Result<(), StoreError>;
    fn denotate(&self, uuid: &str, text: &str) -> Result<(), StoreError>;
}

/// [`TaskStore`] backed by the `task` command-line tool
#[derive(Debug, Clone)]
pub struct TaskCli {
    program: String,
    base_args: Vec<String>,
}

impl TaskCli {
    pub fn new(config: &TaskConfig) -> Self {
        TaskCli {
            program: config.command.clone(),
            base_args: config.args.clone(),
        }
    }

    fn run<I, S>(&self, rc: &[&str], args: I) -> Result<Output, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .args(rc)
            .args(args)
            .stdin(Stdio::null());
        debug!(program = %self.program, args = ?cmd.get_args().collect::<Vec<_>>(), "invoking task");

        let output = cmd.output().map_err(|e| StoreError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        if !output.status.success() {
            let message = diagnostic(&output);
            warn!(code = ?output.status.code(), %message, "task command failed");
            return Err(StoreError::Rejected {
                code: output.status.code(),
                message,
            });
        }
        Ok(output)
    }

    fn export(&self, filter: &[String]) -> Result<Vec<Task>, StoreError> {
        let mut args = filter.to_vec();
        args.push("export".to_string());
        let output = self.run(&QUERY_RC, &args)?;
        parse_export(&output.stdout)
    }

    fn mutate(&self, uuid: &str, command: &str, rest: &[String]) -> Result<Output, StoreError> {
        let mut args = vec![uuid.to_string(), command.to_string()];
        args.extend_from_slice(rest);
        self.run(&MUTATE_RC, &args)
    }
}

impl TaskStore for TaskCli {
    fn export_active(&self) -> Result<Vec<Task>, StoreError> {
        self.export(&["status:pending".to_string()])
    }

    fn export_one(&self, task: &TaskRef) -> Result<Option<Task>, StoreError> {
        Ok(self.export(&[task.as_arg()])?.into_iter().next())
    }

    fn add(&self, fields: &FieldSet) -> Result<TaskRef, StoreError> {
        let mut args = vec!["add".to_string()];
        args.extend(fields.add_args());
        let output = self.run(&MUTATE_RC, &args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let created = parse_created_id(&stdout);
        if created == TaskRef::Latest {
            warn!("could not read new task id from add output; falling back to +LATEST");
        }
        Ok(created)
    }

    fn modify(&self, uuid: &str, fields: &FieldSet) -> Result<(), StoreError> {
        self.mutate(uuid, "modify", &fields.modify_args()).map(drop)
    }

    fn modify_raw(&self, uuid: &str, mods: &[String]) -> Result<(), StoreError> {
        self.mutate(uuid, "modify", mods).map(drop)
    }

    fn start(&self, uuid: &str) -> Result<(), StoreError> {
        self.mutate(uuid, "start", &[]).map(drop)
    }

    fn stop(&self, uuid: &str) -> Result<(), StoreError> {
        self.mutate(uuid, "stop", &[]).map(drop)
    }

    fn done(&self, uuid: &str) -> Result<(), StoreError> {
        self.mutate(uuid, "done", &[]).map(drop)
    }

    fn undo(&self) -> Result<(), StoreError> {
        self.run(&MUTATE_RC, ["undo"]).map(drop)
    }

    fn annotate(&self, uuid: &str, text: &str) -> Result<(), StoreError> {
        self.mutate(uuid, "annotate", &["--".to_string(), text.to_string()])
            .map(drop)
    }

    fn denotate(&self, uuid: &str, text: &str) -> Result<(), StoreError> {
        self.mutate(uuid, "denotate", &["--".to_string(), text.to_string()])
            .map(drop)
    }
}

/// Parse `task export` output. An empty payload is an empty list.
pub fn parse_export(stdout: &[u8]) -> Result<Vec<Task>, StoreError> {
    let text = String::from_utf8_lossy(stdout);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&text)?)
}

/// Recover the new id from `Created task 42.`, else `+LATEST`
pub fn parse_created_id(stdout: &str) -> TaskRef {
    CREATED_RE
        .captures(stdout)
        .and_then(|caps| caps[1].parse().ok())
        .map_or(TaskRef::Latest, TaskRef::Id)
}

/// Diagnostic text for a failed call: stderr, else stdout, else the status
fn diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    match output.status.code() {
        Some(code) => format!("task exited with status {}", code),
        None => "task was terminated by a signal".to_string(),
    }
}
