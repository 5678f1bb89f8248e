//! CLI smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn repograph() -> Command {
    Command::cargo_bin("repograph").expect("binary builds")
}

#[test]
fn help_lists_subcommands() {
    repograph()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("embed"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn build_creates_graph_files_and_reports_counts() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("src")).unwrap();
    std::fs::write(temp.path().join("src/util.py"), "def helper(): pass\n").unwrap();

    repograph()
        .arg("-C")
        .arg(temp.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes"));

    assert!(temp
        .path()
        .join(".repograph/graph/nodes.jsonl")
        .exists());
    assert!(temp
        .path()
        .join(".repograph/graph/edges.jsonl")
        .exists());
}

#[test]
fn status_reports_missing_indexes() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.py"), "x = 1\n").unwrap();

    repograph()
        .arg("-C")
        .arg(temp.path())
        .arg("build")
        .assert()
        .success();

    repograph()
        .arg("-C")
        .arg(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("graph:"))
        .stdout(predicate::str::contains("incomplete"));
}

#[test]
fn embed_without_models_fails_with_guidance() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.py"), "x = 1\n").unwrap();

    repograph()
        .arg("-C")
        .arg(temp.path())
        .arg("build")
        .assert()
        .success();

    // Point every model search location somewhere empty so resolution
    // fails deterministically.
    let fake_home = temp.path().join("home");
    std::fs::create_dir_all(&fake_home).unwrap();

    repograph()
        .arg("-C")
        .arg(temp.path())
        .arg("embed")
        .env("REPOGRAPH_MODELS_DIR", temp.path().join("no-models"))
        .env("HOME", &fake_home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Models directory not found"));
}

#[test]
fn second_build_is_idempotent() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.py"), "def f(): pass\n").unwrap();

    let first = repograph()
        .arg("-C")
        .arg(temp.path())
        .arg("build")
        .assert()
        .success();
    let first_out = String::from_utf8_lossy(&first.get_output().stdout).to_string();

    let second = repograph()
        .arg("-C")
        .arg(temp.path())
        .arg("build")
        .assert()
        .success();
    let second_out = String::from_utf8_lossy(&second.get_output().stdout).to_string();

    let count_line = |s: &str| {
        s.lines()
            .find(|l| l.starts_with("graph:"))
            .map(str::to_string)
    };
    assert_eq!(count_line(&first_out), count_line(&second_out));
}
