use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn todoline(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("todoline").unwrap();
    cmd.env("HOME", home)
        .env_remove("TODOLINE_DB")
        .env_remove("TODOLINE_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn parse_only_shows_extracted_fields() {
    let home = TempDir::new().unwrap();

    let value = json_output(todoline(home.path()).args([
        "add",
        "Buy groceries for tomorrow #shopping",
        "--parse-only",
        "-o",
        "json",
    ]));

    assert_eq!(value["title"], "Buy groceries");
    assert_eq!(value["tags"][0], "shopping");
    assert_eq!(value["deadline_phrase"], "for tomorrow");
    assert!(value["deadline"].is_string());
}

#[test]
fn added_task_is_listed() {
    let home = TempDir::new().unwrap();

    todoline(home.path())
        .args(["add", "Submit report by next friday #work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Submit report"));

    let value = json_output(todoline(home.path()).args(["list", "-o", "json"]));
    assert_eq!(value["count"], 1);
    assert_eq!(value["items"][0]["title"], "Submit report");
    assert_eq!(value["items"][0]["status"], "todo");
    assert_eq!(value["items"][0]["tags"][0], "work");

    assert!(home.path().join(".todoline").join("todoline.db").exists());
}

#[test]
fn empty_title_is_rejected() {
    let home = TempDir::new().unwrap();

    todoline(home.path())
        .args(["add", "#errands"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please provide a title for the task"));

    let value = json_output(todoline(home.path()).args(["list", "-o", "json"]));
    assert_eq!(value["count"], 0);
}

#[test]
fn status_cycles_and_done_completes() {
    let home = TempDir::new().unwrap();
    todoline(home.path())
        .args(["add", "Water plants"])
        .assert()
        .success();

    let value = json_output(todoline(home.path()).args(["status", "1", "-o", "json"]));
    assert_eq!(value["status"], "doing");

    let value = json_output(todoline(home.path()).args(["done", "1", "-o", "json"]));
    assert_eq!(value["status"], "done");
}

#[test]
fn missing_task_fails() {
    let home = TempDir::new().unwrap();

    todoline(home.path())
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn db_flag_overrides_location() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("elsewhere").join("tasks.db");

    todoline(home.path())
        .args(["add", "Call mom", "--db"])
        .arg(&db)
        .assert()
        .success();

    assert!(db.exists());
    let value = json_output(
        todoline(home.path())
            .args(["tags", "-o", "json", "--db"])
            .arg(&db),
    );
    assert_eq!(value["count"], 0);
}

#[test]
fn config_sets_default_output() {
    let home = TempDir::new().unwrap();
    let root = home.path().join(".todoline");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("config.yaml"), "general:\n  default_output: json\n").unwrap();

    let value = json_output(todoline(home.path()).arg("tags"));
    assert_eq!(value["count"], 0);
}

#[test]
fn completions_are_generated() {
    let home = TempDir::new().unwrap();

    todoline(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("todoline"));
}
