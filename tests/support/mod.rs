#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use taskflow::model::{Category, NewCategory, NewTask, Priority, Task, TaskId};
use taskflow::store::MemoryStore;
use taskflow::TaskBoard;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Reference date used by library-level tests.
pub fn today() -> NaiveDate {
    day(2024, 3, 10)
}

pub fn created(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Task fixture; later ids are created later.
pub fn task(id: TaskId, due: Option<NaiveDate>, completed: bool) -> Task {
    let mut task = NewTask::new(format!("Task {id}"))
        .in_category(1)
        .into_task(id, created(id as i64))
        .expect("task");
    task.due_date = due;
    task.set_completed(completed, created(1_000));
    task
}

pub fn with_priority(mut task: Task, priority: Option<Priority>) -> Task {
    task.priority = priority;
    task
}

pub fn category(id: u64, name: &str) -> Category {
    NewCategory::new(name, "#5B47E0").into_category(id, created(0))
}

pub fn ids<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<TaskId> {
    tasks.into_iter().map(|task| task.id).collect()
}

/// Board over an in-memory store holding exactly these records.
pub fn board_with(tasks: Vec<Task>, categories: Vec<Category>) -> TaskBoard {
    TaskBoard::new(Box::new(MemoryStore::with_records(tasks, categories)))
        .and_then(|board| board.with_today(today()))
        .expect("board")
}

pub fn taskflow_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskflow").expect("binary");
    cmd.env_remove("TASKFLOW_CONFIG")
        .env_remove("TASKFLOW_DATA")
        .env_remove("RUST_LOG");
    cmd
}

/// Scratch directory for CLI runs against a file-backed store.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(".taskflow.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Command running in the scratch dir with `--data` pointed inside it.
    pub fn cmd(&self) -> Command {
        let mut cmd = taskflow_cmd();
        cmd.current_dir(self.path()).arg("--data").arg(self.data_path());
        cmd
    }

    /// Run with `--json` and return the parsed envelope; asserts success.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run taskflow");
        assert!(
            output.status.success(),
            "taskflow {args:?} failed: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        serde_json::from_slice(&output.stdout).expect("json envelope")
    }
}
