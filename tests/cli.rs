//! End-to-end tests for the `smscode` binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn smscode(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("smscode").unwrap();
    cmd.env("SMSCODE_DATA_DIR", data_dir).env_remove("RUST_LOG");
    cmd
}

fn add_rule(data_dir: &Path, company: &str, keyword: &str, regex: &str) {
    smscode(data_dir)
        .args(["rule", "add", company, keyword, regex])
        .assert()
        .success();
}

#[test]
fn test_rule_add_and_list() {
    let data = TempDir::new().unwrap();
    add_rule(data.path(), "Acme", "code", r"(\d{6})");

    smscode(data.path())
        .args(["rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("Total: 1 rule(s)"));
}

#[test]
fn test_rule_add_rejects_bad_regex() {
    let data = TempDir::new().unwrap();

    smscode(data.path())
        .args(["rule", "add", "Acme", "code", "(unclosed"])
        .assert()
        .failure();

    smscode(data.path())
        .args(["rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No rules found."));
}

#[test]
fn test_rule_test_prints_code() {
    let data = TempDir::new().unwrap();
    add_rule(data.path(), "Acme", "code", r"(\d{6})");

    smscode(data.path())
        .args(["rule", "test", "[Acme] Your code is 482913", "--sender", "ACME"])
        .assert()
        .success()
        .stdout(predicate::str::contains("482913"));
}

#[test]
fn test_backup_round_trip_into_fresh_install() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();

    add_rule(source.path(), "Acme", "code", r"(\d{6})");
    add_rule(source.path(), "Bank", "otp", r"(\d{4})");

    smscode(source.path())
        .args(["backup", "export", "rules.scebak", "--dir"])
        .arg(backups.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 rule(s)"));

    smscode(target.path())
        .args(["backup", "import", "rules.scebak", "--dir"])
        .arg(backups.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 added"));

    smscode(target.path())
        .args(["rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("Bank"));
}

#[test]
fn test_import_replace_needs_force() {
    let data = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();
    add_rule(data.path(), "Acme", "code", r"(\d{6})");

    smscode(data.path())
        .args(["backup", "export", "--dir"])
        .arg(backups.path())
        .assert()
        .success();

    add_rule(data.path(), "Bank", "otp", r"(\d{4})");

    smscode(data.path())
        .args(["backup", "import", "latest", "--dir"])
        .arg(backups.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"));

    smscode(data.path())
        .args(["backup", "import", "latest", "--force", "--dir"])
        .arg(backups.path())
        .assert()
        .success();

    smscode(data.path())
        .args(["rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("Bank").not());
}

#[test]
fn test_export_with_no_rules_fails() {
    let data = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();

    smscode(data.path())
        .args(["backup", "export", "--dir"])
        .arg(backups.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No rules to export"));

    assert!(fs::read_dir(backups.path()).unwrap().next().is_none());
}

#[test]
fn test_import_latest_without_backups_fails() {
    let data = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();

    smscode(data.path())
        .args(["backup", "import", "latest", "--dir"])
        .arg(backups.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backup exists"));
}

#[test]
fn test_import_without_version_reports_missing_version() {
    let data = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();
    fs::write(backups.path().join("old.scebak"), r#"{"rules": []}"#).unwrap();

    smscode(data.path())
        .args(["backup", "import", "old.scebak", "--dir"])
        .arg(backups.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("backup version is missing"));
}

#[test]
fn test_import_unknown_version_fails() {
    let data = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();
    fs::write(
        backups.path().join("future.scebak"),
        r#"{"version": 99, "rules": []}"#,
    )
    .unwrap();

    smscode(data.path())
        .args(["backup", "import", "future.scebak", "--dir"])
        .arg(backups.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn test_backup_list_shows_only_backup_files() {
    let data = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();
    fs::write(backups.path().join("bak-2024-01-01.scebak"), "{}").unwrap();
    fs::write(backups.path().join("notes.txt"), "hello").unwrap();

    smscode(data.path())
        .args(["backup", "list", "--dir"])
        .arg(backups.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("bak-2024-01-01.scebak"))
        .stdout(predicate::str::contains("notes.txt").not());
}
