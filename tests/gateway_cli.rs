//! Integration tests for the `task` process gateway.
//!
//! Each test writes a small shell script standing in for `task` into a temp
//! directory and points `TaskCli` at it. The script appends its arguments to
//! a log file so tests can assert on the exact command lines.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use twdeck::io::gateway::{FieldSet, StoreError, TaskCli, TaskRef, TaskStore};
use twdeck::model::config::TaskConfig;
use twdeck::model::task::Priority;

const EXPORT_JSON: &str = r#"[{"id":1,"uuid":"aaaa-1111","description":"Fix the leaking tap","status":"pending","project":"home","priority":"H","urgency":9.1},{"id":2,"uuid":"bbbb-2222","description":"Renew passport","status":"pending","urgency":2.0}]"#;

struct FakeTask {
    _dir: tempfile::TempDir,
    log: PathBuf,
    store: TaskCli,
}

impl FakeTask {
    fn log_lines(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Build a fake `task`. `body` is a `case "$*" in ... esac` arm list.
fn fake_task(body: &str) -> FakeTask {
    let dir = tempfile::TempDir::new().unwrap();
    let log = dir.path().join("calls.log");
    let script = dir.path().join("task");
    fs::write(&script, script_text(&log, body)).unwrap();

    // Run through sh so the script never needs exec permission
    let config = TaskConfig {
        command: "sh".to_string(),
        args: vec![script.display().to_string()],
    };
    FakeTask {
        _dir: dir,
        log,
        store: TaskCli::new(&config),
    }
}

fn script_text(log: &Path, body: &str) -> String {
    format!(
        "echo \"$*\" >> '{}'\ncase \"$*\" in\n{}\n  *) exit 0 ;;\nesac\n",
        log.display(),
        body
    )
}

#[test]
fn export_active_reads_pending_tasks() {
    let fake = fake_task(&format!("  *export*) echo '{}' ;;", EXPORT_JSON));
    let tasks = fake.store.export_active().unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].uuid, "aaaa-1111");
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[1].description, "Renew passport");

    let calls = fake.log_lines();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("rc.json.array=on"));
    assert!(calls[0].ends_with("status:pending export"));
}

#[test]
fn empty_export_is_no_tasks() {
    let fake = fake_task("  *export*) ;;");
    assert!(fake.store.export_active().unwrap().is_empty());
}

#[test]
fn garbage_export_is_malformed() {
    let fake = fake_task("  *export*) echo 'not json' ;;");
    let err = fake.store.export_active().unwrap_err();
    assert!(matches!(err, StoreError::Malformed(_)));
}

#[test]
fn add_reports_created_id() {
    let fake = fake_task("  *add*) echo 'Created task 17.' ;;");
    let fields = FieldSet {
        description: "Buy stamps".into(),
        project: "admin".into(),
        priority: Priority::Low,
        ..Default::default()
    };

    assert_eq!(fake.store.add(&fields).unwrap(), TaskRef::Id(17));
    let calls = fake.log_lines();
    assert!(calls[0].contains("rc.verbose=new-id"));
    assert!(calls[0].ends_with("add project:admin priority:L -- Buy stamps"));
}

#[test]
fn add_without_id_falls_back_to_latest() {
    let fake = fake_task("  *add*) echo 'Task added.' ;;");
    let fields = FieldSet {
        description: "Quiet add".into(),
        ..Default::default()
    };
    assert_eq!(fake.store.add(&fields).unwrap(), TaskRef::Latest);
}

#[test]
fn modify_sends_every_field() {
    let fake = fake_task("");
    let fields = FieldSet {
        description: "Renew passport".into(),
        due: "2025-06-01".into(),
        tags: vec!["errand".into()],
        ..Default::default()
    };
    fake.store.modify("bbbb-2222", &fields).unwrap();

    let calls = fake.log_lines();
    assert!(calls[0].ends_with(
        "bbbb-2222 modify description:Renew passport project: priority: due:2025-06-01 tags:errand depends:"
    ));
}

#[test]
fn rejection_carries_stderr_verbatim() {
    let fake = fake_task(
        "  *modify*) echo \"The 'due' attribute does not allow a value of 'someday'.\" >&2; exit 2 ;;",
    );
    let fields = FieldSet {
        description: "x".into(),
        due: "someday".into(),
        ..Default::default()
    };
    let err = fake.store.modify("aaaa-1111", &fields).unwrap_err();

    match err {
        StoreError::Rejected { code, message } => {
            assert_eq!(code, Some(2));
            assert_eq!(
                message,
                "The 'due' attribute does not allow a value of 'someday'."
            );
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn silent_failure_reports_exit_status() {
    let fake = fake_task("  *done*) exit 3 ;;");
    let err = fake.store.done("aaaa-1111").unwrap_err();
    assert_eq!(err.to_string(), "task exited with status 3");
}

#[test]
fn lifecycle_commands_address_by_uuid() {
    let fake = fake_task("");
    fake.store.start("aaaa-1111").unwrap();
    fake.store.stop("aaaa-1111").unwrap();
    fake.store.annotate("aaaa-1111", "called the plumber").unwrap();
    fake.store.denotate("aaaa-1111", "called the plumber").unwrap();
    fake.store.undo().unwrap();

    let calls = fake.log_lines();
    assert_eq!(calls.len(), 5);
    assert!(calls[0].ends_with("aaaa-1111 start"));
    assert!(calls[1].ends_with("aaaa-1111 stop"));
    assert!(calls[2].ends_with("aaaa-1111 annotate -- called the plumber"));
    assert!(calls[3].ends_with("aaaa-1111 denotate -- called the plumber"));
    assert!(calls[4].ends_with("rc.verbose=new-id undo"));
}

#[test]
fn missing_program_is_spawn_error() {
    let config = TaskConfig {
        command: "/nonexistent/twdeck-task".to_string(),
        args: Vec::new(),
    };
    let err = TaskCli::new(&config).export_active().unwrap_err();
    assert!(matches!(err, StoreError::Spawn { .. }));
}
