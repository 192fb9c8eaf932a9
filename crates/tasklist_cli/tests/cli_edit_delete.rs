use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_store_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tasklist-{nanos}-{name}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn seed(dir: &PathBuf, tasks: serde_json::Value) {
    std::fs::write(
        dir.join("tasks.json"),
        serde_json::to_string_pretty(&tasks).unwrap(),
    )
    .unwrap();
}

fn stored(dir: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(dir.join("tasks.json")).unwrap()).unwrap()
}

#[test]
fn delete_removes_exactly_one_and_keeps_order() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let dir = temp_store_dir("delete-one");

    seed(
        &dir,
        serde_json::json!([
            { "text": "first", "date": "2099-01-01", "time": "09:00", "priority": "Medium" },
            { "text": "second", "date": "2099-01-01", "time": "10:00", "priority": "Medium" },
            { "text": "third", "date": "2099-01-01", "time": "11:00", "priority": "Medium" }
        ]),
    );

    let output = Command::new(exe)
        .args(["delete", "1"])
        .env("TASKLIST_STORE_PATH", &dir)
        .output()
        .expect("failed to run delete command");

    assert!(output.status.success());
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(tasks.as_array().unwrap().len(), 2);
    assert_eq!(tasks[0]["text"], "first");
    assert_eq!(tasks[1]["text"], "third");
}

#[test]
fn delete_rejects_out_of_range_index() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let dir = temp_store_dir("delete-range");

    seed(
        &dir,
        serde_json::json!([
            { "text": "only", "date": "2099-01-01", "time": "09:00", "priority": "Medium" }
        ]),
    );

    let output = Command::new(exe)
        .args(["delete", "5"])
        .env("TASKLIST_STORE_PATH", &dir)
        .output()
        .expect("failed to run delete command");

    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_index"));
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

#[test]
fn edit_replaces_record_and_resorts() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let dir = temp_store_dir("edit-resort");

    seed(
        &dir,
        serde_json::json!([
            { "text": "early", "date": "2099-01-01", "time": "09:00", "priority": "Medium" },
            { "text": "late", "date": "2099-01-01", "time": "10:00", "priority": "Medium" }
        ]),
    );

    let output = Command::new(exe)
        .args(["edit", "0", "--time", "11:00"])
        .env("TASKLIST_STORE_PATH", &dir)
        .output()
        .expect("failed to run edit command");

    assert!(output.status.success());
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(tasks.as_array().unwrap().len(), 2);
    assert_eq!(tasks[0]["text"], "late");
    assert_eq!(tasks[1]["text"], "early");
    assert_eq!(tasks[1]["time"], "11:00");
}

#[test]
fn edit_rejects_resubmitting_a_past_task_unchanged() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let dir = temp_store_dir("edit-past");

    seed(
        &dir,
        serde_json::json!([
            { "text": "old", "date": "2000-01-01", "time": "10:00", "priority": "Medium" }
        ]),
    );

    let output = Command::new(exe)
        .args(["edit", "0"])
        .env("TASKLIST_STORE_PATH", &dir)
        .output()
        .expect("failed to run edit command");

    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scheduled time must be in the future"));
    assert_eq!(tasks[0]["date"], "2000-01-01");
}
