//! Backup, restore, and corruption recovery tests for the medtimer binary.
//!
//! These tests verify:
//! - Export/import round trips
//! - Invalid backup documents leave existing data untouched
//! - Corrupted data files degrade to empty instead of crashing

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("medtimer"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn add(data_dir: &std::path::Path, name: &str, time: &str) {
    cli()
        .args(["add", name, "--time", time])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();
}

#[test]
fn test_export_to_stdout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    add(data_dir, "Aspirin 75mg", "08:00");

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"profile\""))
        .stdout(predicate::str::contains("\"meds\""))
        .stdout(predicate::str::contains("Aspirin 75mg"));
}

#[test]
fn test_export_import_roundtrip() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let backup = data_dir.join("backup.json");

    add(data_dir, "Aspirin 75mg", "08:00");
    add(data_dir, "Metformin 500mg", "20:00");

    cli()
        .args(["take", "Aspirin 75mg"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    cli()
        .arg("export")
        .arg("--out")
        .arg(&backup)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 medicines"));

    cli()
        .arg("clear")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    cli()
        .arg("import")
        .arg(&backup)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Data restored: 2 medicines"));

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Aspirin 75mg"))
        .stdout(predicate::str::contains("Metformin 500mg"))
        .stdout(predicate::str::contains("[taken]"));
}

#[test]
fn test_import_missing_required_key_fails_and_preserves_state() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    add(data_dir, "Aspirin 75mg", "08:00");
    let before = fs::read_to_string(data_dir.join("med_data.json")).unwrap();

    // Valid JSON, but the required "profile" key is missing
    let bad = data_dir.join("bad.json");
    fs::write(&bad, r#"{ "meds": [] }"#).unwrap();

    cli()
        .arg("import")
        .arg(&bad)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile"));

    let after = fs::read_to_string(data_dir.join("med_data.json")).unwrap();
    assert_eq!(before, after, "failed import must not touch existing data");
}

#[test]
fn test_import_invalid_json_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let bad = data_dir.join("bad.json");
    fs::create_dir_all(data_dir).unwrap();
    fs::write(&bad, "{ definitely not json").unwrap();

    cli()
        .arg("import")
        .arg(&bad)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_corrupted_record_file_degrades_to_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::create_dir_all(data_dir).unwrap();
    fs::write(data_dir.join("med_data.json"), "{ invalid json }}}}").unwrap();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No medicines added yet"));
}

#[test]
fn test_corrupted_profile_does_not_block_add() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::create_dir_all(data_dir).unwrap();
    fs::write(data_dir.join("profile.json"), "not json at all").unwrap();

    add(data_dir, "Aspirin 75mg", "08:00");

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Aspirin 75mg"));
}

#[test]
fn test_import_roundtrip_document_is_identical() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let first = data_dir.join("first.json");
    let second = data_dir.join("second.json");

    add(data_dir, "Aspirin 75mg", "08:00");
    add(data_dir, "Telmisartan 40mg", "20:30");

    cli()
        .arg("export")
        .arg("--out")
        .arg(&first)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    cli()
        .arg("import")
        .arg(&first)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    cli()
        .arg("export")
        .arg("--out")
        .arg(&second)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    let doc_a: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
    let doc_b: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&second).unwrap()).unwrap();
    assert_eq!(doc_a, doc_b);
}
