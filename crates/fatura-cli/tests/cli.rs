//! End-to-end tests of the `fatura` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fatura() -> Command {
    Command::cargo_bin("fatura").unwrap()
}

/// A config that decodes embedded page images, so no external renderer is needed.
fn write_config(dir: &Path) -> String {
    let path = dir.join("config.json");
    let config = serde_json::json!({
        "classifier": { "template_dir": dir.join("templates") },
        "pdf": { "rasterizer": "embedded" },
    });
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

fn inbox_with_broken_pdf() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("scan001.pdf"), b"this is not a pdf").unwrap();
    dir
}

#[test]
fn test_help_lists_commands() {
    fatura()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("templates"))
        .stdout(predicate::str::contains("job-status"));
}

#[test]
fn test_config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("fatura").join("config.json");
    let config = config.to_str().unwrap();

    fatura()
        .args(["--config", config, "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    fatura()
        .args(["--config", config, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    fatura()
        .args(["--config", config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fatura()
        .args(["--config", config, "config", "get", "classifier.render_dpi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("200"));

    fatura()
        .args(["--config", config, "config", "set", "classifier.render_dpi", "300"])
        .assert()
        .success();

    fatura()
        .args(["--config", config, "config", "get", "classifier.render_dpi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("300"));

    fatura()
        .args(["--config", config, "config", "get", "classifier.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_set_rejects_wrong_type() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    fatura()
        .args(["--config", &config, "config", "set", "classifier.render_dpi", "high"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_classify_missing_folder() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    fatura()
        .args(["--config", &config, "classify"])
        .arg(dir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Folder not found"));
}

#[test]
fn test_classify_empty_folder() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let inbox = tempfile::tempdir().unwrap();

    fatura()
        .args(["--config", &config, "classify"])
        .arg(inbox.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No PDF files found"));
}

#[test]
fn test_classify_reports_unreadable_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let inbox = inbox_with_broken_pdf();

    fatura()
        .args(["--config", &config, "classify"])
        .arg(inbox.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("UNKNOWN (1 invoices)"))
        .stdout(predicate::str::contains("scan001.pdf: 0.00 (error) [no date]"))
        .stdout(predicate::str::contains("Unknown: 1"));
}

#[test]
fn test_classify_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let inbox = inbox_with_broken_pdf();

    let output = fatura()
        .args(["--config", &config, "classify", "--json"])
        .arg(inbox.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["scan001.pdf"]["supplier"], "unknown");
    assert_eq!(json["scan001.pdf"]["method"], "error");
    assert!(json["scan001.pdf"]["details"]["error"].is_string());
}

#[test]
fn test_process_dry_run_moves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let inbox = inbox_with_broken_pdf();

    fatura()
        .args(["--config", &config, "process", "--dry-run", "--upload"])
        .arg(inbox.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("For review (-> REVIEW/): 1"))
        .stdout(predicate::str::contains("API keys not configured").not());

    assert!(inbox.path().join("scan001.pdf").exists());
    assert!(!inbox.path().join("REVIEW").exists());
}

#[test]
fn test_process_routes_failures_to_review() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let inbox = inbox_with_broken_pdf();
    let output = tempfile::tempdir().unwrap();

    fatura()
        .args(["--config", &config, "process", "--summary", "--output-dir"])
        .arg(output.path())
        .arg(inbox.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total processed: 1"))
        .stdout(predicate::str::contains("For review (-> REVIEW/): 1"))
        .stdout(predicate::str::contains("Errors: 0"));

    assert!(!inbox.path().join("scan001.pdf").exists());
    assert!(output.path().join("REVIEW").join("scan001.pdf").exists());
    assert!(output.path().join("INTEGRATED").is_dir());
    assert!(output.path().join("MATCHED").is_dir());

    let summary = std::fs::read_to_string(output.path().join("summary.csv")).unwrap();
    assert!(summary.contains("scan001.pdf,scan001.pdf,REVIEW,unknown,error"));
}

#[test]
fn test_templates_without_samples() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let samples = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated");

    fatura()
        .args(["--config", &config, "templates", "--output"])
        .arg(&output)
        .arg(samples.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 generated"));

    assert!(output.is_dir());
}

#[test]
fn test_job_status_requires_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    fatura()
        .args(["--config", &config, "job-status", "job-1"])
        .env_remove("DOCUPIPE_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DOCUPIPE_API_KEY"));
}
