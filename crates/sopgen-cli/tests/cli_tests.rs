//! Integration tests for all CLI commands
//!
//! Tests each command with real invocations against temporary directories.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a CLI command isolated from any user or project config
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sopgen"));
    cmd.env("HOME", home).env_remove("RUST_LOG").current_dir(home);
    cmd
}

const PURCHASING: &str = r#"{
    "steps": [
        {"ref": "1", "paragraphs": [{"text": "Submit request", "alignment": "CENTER", "font_size": 12, "bold": true}],
         "raci": {"responsible": "Requester", "accountable": "Manager"}, "is_gateway": false, "sla": "4h", "sla_group": null},
        {"ref": "", "paragraphs": [{"text": "If approved: continue", "alignment": "LEFT", "font_size": 11, "bold": false}],
         "raci": {}, "is_gateway": true, "sla": null, "sla_group": null},
        {"ref": "2", "paragraphs": [{"text": "Raise order", "alignment": "LEFT", "font_size": 11, "bold": false}],
         "raci": {"responsible": "Buyer"}, "is_gateway": false, "sla": "24h", "sla_group": "procurement"},
        {"ref": "3", "paragraphs": [{"text": "Send order", "alignment": "LEFT", "font_size": 11, "bold": false}],
         "raci": {"responsible": "Buyer"}, "is_gateway": false, "sla": "24h", "sla_group": "procurement"},
        {"ref": "4", "paragraphs": [{"text": "Close", "alignment": "LEFT", "font_size": 11, "bold": false}],
         "raci": {}, "is_gateway": false, "sla": null, "sla_group": null}
    ],
    "abbreviations_list": [{"term": "PO", "definition": "Purchase order"}],
    "references_list": [],
    "general_policies_list": [{"policy": "Orders above 10k need CFO approval"}]
}"#;

fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn assert_docx(path: &Path) {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.len() > 4, "{} is empty", path.display());
    assert_eq!(&bytes[..4], b"PK\x03\x04", "{} is not a zip", path.display());
}

// ============ BUILD COMMAND TESTS ============

#[test]
fn test_build_help() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("build")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build a .docx procedure document"));
}

#[test]
fn test_build_default_output_path() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);

    cli(dir.path()).arg("build").arg(&input).assert().success();

    assert_docx(&dir.path().join("purchasing.docx"));
}

#[test]
fn test_build_explicit_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);
    let output = dir.path().join("out.docx");

    cli(dir.path())
        .arg("build")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("out.docx"));

    assert_docx(&output);
}

#[test]
fn test_build_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);
    let output = dir.path().join("purchasing.docx");
    fs::write(&output, "keep me").unwrap();

    cli(dir.path())
        .arg("build")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

    cli(dir.path())
        .arg("build")
        .arg(&input)
        .arg("--force")
        .assert()
        .success();
    assert_docx(&output);
}

#[test]
fn test_build_quiet_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);

    cli(dir.path())
        .arg("--quiet")
        .arg("build")
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_build_missing_input() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("build")
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read build input"));
}

#[test]
fn test_build_malformed_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "broken.json", "{\"steps\": [");
    cli(dir.path())
        .arg("build")
        .arg(&input)
        .assert()
        .failure();
    assert!(!dir.path().join("broken.docx").exists());
}

#[test]
fn test_build_with_layout_lacking_step_table() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);
    let layout = write_input(
        dir.path(),
        "layout.toml",
        r#"
name = "minimal"

[[tables]]
role = "purpose"
columns = 1
header = [["Purpose"]]
"#,
    );

    cli(dir.path())
        .arg("build")
        .arg(&input)
        .arg("--layout")
        .arg(&layout)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template has no"));
    assert!(!dir.path().join("purchasing.docx").exists());
}

#[test]
fn test_build_uses_project_config_layout() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);
    write_input(
        dir.path(),
        ".sopgen.toml",
        "[build]\nlayout = \"does-not-exist.toml\"\n",
    );

    cli(dir.path())
        .arg("build")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.toml"));
}

// ============ BATCH COMMAND TESTS ============

#[test]
fn test_batch_builds_every_input() {
    let dir = TempDir::new().unwrap();
    let first = write_input(dir.path(), "purchasing.json", PURCHASING);
    let second = write_input(dir.path(), "empty.json", "{\"steps\": []}");
    let out = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .arg(&first)
        .arg(&second)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Batch Build Summary"));

    assert_docx(&out.join("purchasing.docx"));
    assert_docx(&out.join("empty.docx"));
}

#[test]
fn test_batch_parallel() {
    let dir = TempDir::new().unwrap();
    let inputs: Vec<PathBuf> = (0..4)
        .map(|i| write_input(dir.path(), &format!("proc{i}.json"), PURCHASING))
        .collect();
    let out = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .args(&inputs)
        .arg("-o")
        .arg(&out)
        .arg("--parallel")
        .assert()
        .success();

    for i in 0..4 {
        assert_docx(&out.join(format!("proc{i}.docx")));
    }
}

#[test]
fn test_batch_stops_on_failure() {
    let dir = TempDir::new().unwrap();
    let broken = write_input(dir.path(), "broken.json", "not json");
    let good = write_input(dir.path(), "purchasing.json", PURCHASING);
    let out = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .arg(&broken)
        .arg(&good)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Batch build stopped"));

    assert!(!out.join("purchasing.docx").exists());
}

#[test]
fn test_batch_continue_on_error() {
    let dir = TempDir::new().unwrap();
    let broken = write_input(dir.path(), "broken.json", "not json");
    let good = write_input(dir.path(), "purchasing.json", PURCHASING);
    let out = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .arg(&broken)
        .arg(&good)
        .arg("-o")
        .arg(&out)
        .arg("--continue-on-error")
        .assert()
        .success()
        .stderr(predicate::str::contains("broken.json"));

    assert_docx(&out.join("purchasing.docx"));
}

#[test]
fn test_batch_rejects_same_stem_inputs() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("north")).unwrap();
    fs::create_dir_all(dir.path().join("south")).unwrap();
    let north = write_input(&dir.path().join("north"), "purchasing.json", PURCHASING);
    let south = write_input(&dir.path().join("south"), "purchasing.json", PURCHASING);
    let out = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .arg(&north)
        .arg(&south)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("would both be written to"));

    assert!(!out.join("purchasing.docx").exists());
}

#[test]
fn test_batch_requires_output_dir() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("batch")
        .arg("a.json")
        .assert()
        .failure();
}

// ============ PLAN COMMAND TESTS ============

#[test]
fn test_plan_text() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);

    cli(dir.path())
        .arg("plan")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("steps 0-1: 4h"))
        .stdout(predicate::str::contains("steps 2-3: 24h"));
}

#[test]
fn test_plan_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);

    let output = cli(dir.path())
        .arg("plan")
        .arg(&input)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let ranges: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ranges = ranges.as_array().unwrap();
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0]["start"], 0);
    assert_eq!(ranges[0]["end"], 1);
    assert_eq!(ranges[0]["value"], "4h");
    assert_eq!(ranges[1]["start"], 2);
    assert_eq!(ranges[1]["end"], 3);
}

#[test]
fn test_plan_without_sla() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        "plain.json",
        r#"{"steps": [{"ref": "1"}, {"ref": "2"}]}"#,
    );

    cli(dir.path())
        .arg("plan")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("No SLA ranges in 2 steps"));
}

// ============ LAYOUT COMMAND TESTS ============

#[test]
fn test_layout_stdout() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("layout")
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"master\""))
        .stdout(predicate::str::contains("process-steps"))
        .stdout(predicate::str::contains("Avenir LT Std 45 Book"));
}

#[test]
fn test_layout_file_round_trips_through_build() {
    let dir = TempDir::new().unwrap();
    let layout = dir.path().join("master.toml");
    let input = write_input(dir.path(), "purchasing.json", PURCHASING);

    cli(dir.path())
        .arg("layout")
        .arg("-o")
        .arg(&layout)
        .assert()
        .success();

    let parsed = sopgen_core::TemplateLayout::from_file(&layout).unwrap();
    assert_eq!(parsed, sopgen_core::TemplateLayout::master());

    cli(dir.path())
        .arg("build")
        .arg(&input)
        .arg("--layout")
        .arg(&layout)
        .assert()
        .success();
    assert_docx(&dir.path().join("purchasing.docx"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sopgen"));
}
