use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ibmetrics(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ibmetrics").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    ibmetrics(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn config_init_then_get_and_set() {
    let home = TempDir::new().unwrap();

    ibmetrics(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    ibmetrics(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    ibmetrics(&home)
        .args(["config", "set", "tabular.min_metrics", "4"])
        .assert()
        .success();

    ibmetrics(&home)
        .args(["config", "get", "tabular.min_metrics"])
        .assert()
        .success()
        .stdout(predicate::str::diff("4\n"));

    ibmetrics(&home)
        .args(["config", "get", "tabular.unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn config_path_reports_status() {
    let home = TempDir::new().unwrap();
    ibmetrics(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ibmetrics"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn process_missing_brokerage_fails() {
    let home = TempDir::new().unwrap();
    ibmetrics(&home)
        .args(["process", "missing.pdf", "also-missing.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Brokerage report not found"));
}

#[test]
fn extract_rejects_invalid_month() {
    let home = TempDir::new().unwrap();
    ibmetrics(&home)
        .args(["extract", "report.pdf", "2025", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("month must be between 1 and 12"));
}

#[test]
fn inspect_rejects_non_pdf() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("not-a.pdf");
    fs::write(&file, b"plain text, not a PDF").unwrap();

    ibmetrics(&home)
        .arg("inspect")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse PDF"));
}

#[test]
fn scan_reports_incomplete_pairs() {
    let home = TempDir::new().unwrap();
    let reports = home.path().join("reports");
    fs::create_dir_all(&reports).unwrap();
    fs::write(reports.join("202508MonthlyBrokerageData.pdf"), b"").unwrap();

    ibmetrics(&home)
        .arg("scan")
        .arg(&reports)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing MetricsPressRelease"))
        .stderr(predicate::str::contains("No complete report pairs found"));
}

#[test]
fn scan_rejects_missing_directory() {
    let home = TempDir::new().unwrap();
    ibmetrics(&home)
        .args(["scan", "does-not-exist"])
        .current_dir(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn scan_continue_on_error_reports_each_failed_pair() {
    let home = TempDir::new().unwrap();
    let reports = home.path().join("reports");
    fs::create_dir_all(&reports).unwrap();
    for prefix in ["202507", "202508"] {
        fs::write(reports.join(format!("{prefix}MonthlyBrokerageData.pdf")), b"not a pdf").unwrap();
        fs::write(reports.join(format!("{prefix}MetricsPressRelease.pdf")), b"not a pdf").unwrap();
    }

    ibmetrics(&home)
        .arg("scan")
        .arg(&reports)
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("0/2 successful"))
        .stdout(predicate::str::contains("202507"))
        .stdout(predicate::str::contains("202508"));
}

#[test]
fn quiet_conflicts_with_verbose() {
    let home = TempDir::new().unwrap();
    ibmetrics(&home)
        .args(["-q", "-v", "config", "path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
