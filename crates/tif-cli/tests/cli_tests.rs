//! Integration tests for the tif binary

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn tif() -> Command {
    let mut cmd = Command::cargo_bin("tif").unwrap();
    cmd.env("TIF_TEST_MODE", "1")
        .env_remove("TIF_INCLUDE_HIDDEN")
        .env_remove("TIF_LOG_LEVEL");
    cmd
}

#[test]
fn test_cli_help() {
    tif()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_convert_writes_output_and_summary() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("doc1.md"), "# Intro\n").unwrap();
    fs::write(vault.join("doc2.md"), "[[doc1#Intro]] [[doc1#Gone]]\n").unwrap();

    let output = tif()
        .arg(&vault)
        .args(["--json", "--sequential-uids", "--timestamp", "1000"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["brokenRefs"], 1);
    assert_eq!(summary["topLevelNodes"], 2);

    let written = fs::read_to_string(temp.path().join("vault.tif.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(doc["summary"], summary);
    assert_eq!(doc["nodes"][0]["createdAt"], 1000);
}

#[test]
fn test_sequential_uids_are_reproducible() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("a.md"), "- one [[b]]\n- two #tag\n").unwrap();
    let target = temp.path().join("vault.tif.json");

    let args = ["--sequential-uids", "--timestamp", "5"];
    tif().arg(&vault).args(args).assert().success();
    let first = fs::read_to_string(&target).unwrap();
    tif().arg(&vault).args(args).assert().success();
    let second = fs::read_to_string(&target).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_vault_fails() {
    let temp = TempDir::new().unwrap();
    tif()
        .arg(temp.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to convert vault"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    let config = temp.path().join("config.toml");
    fs::write(&config, "this is not valid toml [[[").unwrap();

    tif()
        .arg(&vault)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}
