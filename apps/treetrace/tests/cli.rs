use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use treetrace_config::{SessionConfig, TreeKind, load_config};

fn treetrace() -> Command {
    Command::cargo_bin("treetrace").unwrap()
}

#[test]
fn insert_prints_text_trace_with_rotation() {
    treetrace()
        .args(["insert", "--tree", "avl", "10", "20", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== insert 30 =="))
        .stdout(predicate::str::contains("RR case: rotate left at 10, lifting 20"))
        .stdout(predicate::str::contains("20 (h=2, bf=0)"));
}

#[test]
fn red_black_final_only_prints_last_steps() {
    let assert = treetrace()
        .args(["insert", "--tree", "red-black", "--final-only", "10", "20", "30"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("complete:").count(), 3);
    assert!(!stdout.contains("compare"));
    assert!(stdout.contains("20 (black)"));
}

#[test]
fn logs_go_to_stderr() {
    treetrace()
        .args(["insert", "--log-level", "warn", "5", "5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate key 5 ignored"))
        .stderr(predicate::str::contains("inserted 5").not())
        .stdout(predicate::str::contains("already in the tree"));
}

#[test]
fn json_output_is_an_array_of_traces() {
    let assert = treetrace()
        .args(["insert", "--format", "json", "--", "3", "-1"])
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let traces = value.as_array().unwrap();
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0]["steps"][0]["kind"], "insert");
    assert_eq!(
        traces[1]["steps"].as_array().unwrap().last().unwrap()["kind"],
        "complete"
    );
}

#[test]
fn jsonl_output_has_one_step_per_line() {
    let assert = treetrace()
        .args(["insert", "--format", "jsonl", "1", "2"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    // 1: insert, complete. 2: compare, descend, insert, balance check, complete.
    assert_eq!(stdout.lines().count(), 7);
    for line in stdout.lines() {
        let step: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(step.get("snapshot").is_some());
    }
}

#[test]
fn show_prints_only_the_tree() {
    treetrace()
        .args(["show", "--tree", "rb", "20", "10", "30", "5"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("20 (black)"))
        .stdout(predicate::str::contains("#").not());
}

#[test]
fn show_on_no_keys_prints_empty() {
    treetrace()
        .arg("show")
        .assert()
        .success()
        .stdout("(empty)\n");
}

#[test]
fn init_config_writes_loadable_file_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treetrace.yaml");

    treetrace()
        .args(["init-config", "--tree", "red-black"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote"));
    let config = load_config(&path).unwrap();
    assert_eq!(config, SessionConfig::for_tree(TreeKind::RedBlack));

    treetrace()
        .arg("init-config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_seed_keys_are_not_echoed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seed.yaml");
    std::fs::write(&path, "tree: avl\nkeys: [1, 2, 3]\n").unwrap();

    let assert = treetrace()
        .arg("insert")
        .arg("--config")
        .arg(&path)
        .arg("4")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("== insert").count(), 1);
    assert!(stdout.contains("== insert 4 =="));
}

#[test]
fn replay_renders_saved_jsonl() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("trace.jsonl");

    treetrace()
        .args(["insert", "--format", "jsonl", "--out"])
        .arg(&out)
        .arg("7")
        .assert()
        .success();

    treetrace()
        .arg("replay")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("#0 insert: insert 7 as the root"))
        .stdout(predicate::str::contains("7 (h=1, bf=0) *"));
}

#[test]
fn unknown_tree_kind_is_rejected() {
    treetrace()
        .args(["insert", "--tree", "splay", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tree kind"));
}

#[test]
fn seed_key_logs_reach_stderr() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seed.yaml");
    std::fs::write(&path, "tree: red-black\nkeys: [8, 4]\n").unwrap();

    treetrace()
        .arg("show")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("inserted 8"))
        .stderr(predicate::str::contains("inserted 4"));
}

#[test]
fn unknown_log_component_in_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(
        &path,
        "tree: avl\nlogging:\n  component_levels:\n    splay: debug\n",
    )
    .unwrap();

    treetrace()
        .arg("insert")
        .arg("--config")
        .arg(&path)
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown logging component"))
        .stderr(predicate::str::contains("component=splay"));
}
