mod support;

use chrono::{Duration, Local};
use predicates::str::contains;

use support::{taskflow_cmd, TestEnv};

#[test]
fn taskflow_help_works() {
    taskflow_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("task manager"));
}

#[test]
fn subcommand_help_works() {
    for cmd in ["list", "stats", "add", "edit", "done", "reopen", "rm", "category"] {
        taskflow_cmd().arg(cmd).arg("--help").assert().success();
    }
}

#[test]
fn add_list_done_round_trip() {
    let env = TestEnv::new();
    let today = Local::now().date_naive();
    let yesterday = (today - Duration::days(1)).to_string();

    let added = env.json(&["add", "  Pay rent ", "--priority", "high", "--due", &yesterday]);
    assert_eq!(added["schema_version"], "taskflow.v1");
    assert_eq!(added["command"], "add");
    assert_eq!(added["data"]["id"], 1);
    assert_eq!(added["data"]["title"], "Pay rent");
    assert_eq!(added["data"]["category_id"], 1);
    assert!(added["data"].get("completed_at").is_none());

    env.json(&["add", "Water plants", "--category", "2"]);

    let overdue = env.json(&["list", "--view", "overdue"]);
    assert_eq!(overdue["data"]["title"], "Overdue Tasks");
    assert_eq!(overdue["data"]["sections"]["pending"][0]["id"], 1);
    assert_eq!(overdue["data"]["badges"]["1"]["status"], "overdue");

    let done = env.json(&["done", "1"]);
    assert_eq!(done["data"]["completed"], true);
    assert!(done["data"]["completed_at"].is_string());

    let stats = env.json(&["stats"]);
    assert_eq!(stats["data"]["overdue_count"], 0);
    assert_eq!(stats["data"]["completed_count"], 1);
    assert_eq!(stats["data"]["all_count"], 1);

    let reopened = env.json(&["reopen", "1"]);
    assert!(reopened["data"].get("completed_at").is_none());
}

#[test]
fn human_list_shows_sections_and_empty_states() {
    let env = TestEnv::new();
    env.cmd()
        .args(["list", "--view", "today"])
        .assert()
        .success()
        .stdout(contains("Today's Tasks"))
        .stdout(contains("No tasks for today"));

    env.cmd().args(["add", "Buy milk"]).assert().success();
    env.cmd().args(["add", "Call mom"]).assert().success();
    env.cmd().args(["done", "2"]).assert().success();

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("All Tasks"))
        .stdout(contains("Progress: 1/2 (50%)"))
        .stdout(contains("Completed (1)"))
        .stdout(contains("[ ] #1 Buy milk (medium) [Personal]"))
        .stdout(contains("[x] #2 Call mom"));

    env.cmd()
        .args(["list", "--search", "bread"])
        .assert()
        .success()
        .stdout(contains("No matching tasks found"));
}

#[test]
fn edit_changes_and_clears_fields() {
    let env = TestEnv::new();
    env.json(&["add", "Draft", "--due", "2030-01-15"]);

    let edited = env.json(&["edit", "1", "--title", "Final", "--category", "3", "--clear-due"]);
    assert_eq!(edited["data"]["title"], "Final");
    assert_eq!(edited["data"]["category_id"], 3);
    assert!(edited["data"].get("due_date").is_none());

    env.cmd()
        .args(["edit", "1"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("nothing to change"));
}

#[test]
fn rm_single_missing_fails_but_bulk_skips() {
    let env = TestEnv::new();
    env.json(&["add", "One"]);
    env.json(&["add", "Two"]);

    env.cmd()
        .args(["rm", "9"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Task not found: 9"))
        .stderr(contains("hint: taskflow list"));

    let report = env.json(&["rm", "2", "999"]);
    assert_eq!(report["data"]["removed"][0]["id"], 2);
    assert_eq!(report["data"]["skipped"][0], 999);

    env.json(&["rm", "1"]);
    let listing = env.json(&["list"]);
    assert_eq!(listing["data"]["empty_state"]["title"], "No tasks found");
}

#[test]
fn category_in_use_blocks_delete() {
    let env = TestEnv::new();
    env.json(&["add", "Report", "--category", "2"]);
    env.json(&["done", "1"]);

    let output = env
        .cmd()
        .args(["--json", "category", "rm", "2"])
        .output()
        .expect("run taskflow");
    assert_eq!(output.status.code(), Some(3));
    let envelope: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(envelope["command"], "category rm");
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["error"]["kind"], "constraint_violation");
    assert_eq!(envelope["error"]["details"]["tasks"], 1);

    let categories = env.json(&["category", "ls"]);
    assert_eq!(categories["data"].as_array().map(Vec::len), Some(3));

    env.json(&["rm", "1"]);
    env.json(&["category", "rm", "2"]);
    let categories = env.json(&["category", "ls"]);
    assert_eq!(categories["data"].as_array().map(Vec::len), Some(2));
}

#[test]
fn category_add_validates_color() {
    let env = TestEnv::new();
    env.cmd()
        .args(["category", "add", "Garden", "--color", "green"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Validation failed"));

    let created = env.json(&["category", "add", "Garden", "--color", "#0a0"]);
    assert_eq!(created["data"]["id"], 4);
    assert_eq!(created["data"]["color"], "#0a0");
}

#[test]
fn config_file_sets_default_view_and_seed() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new();
    env.write_config(
        r##"
[categories]
seed = [{ name = "Inbox", color = "#111111" }]

[view]
default = "completed"
"##,
    )?;

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Completed Tasks"))
        .stdout(contains("No completed tasks yet"));

    let categories = env.json(&["category", "ls"]);
    assert_eq!(categories["data"][0]["name"], "Inbox");
    Ok(())
}

#[test]
fn invalid_config_exits_with_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new();
    env.write_config("[view]\ndefault = \"someday\"\n")?;

    env.cmd()
        .arg("stats")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid configuration"))
        .stderr(contains("hint: fix .taskflow.toml then retry"));
    Ok(())
}
