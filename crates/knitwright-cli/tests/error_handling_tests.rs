//! Tests for error handling, suggestions and exit codes.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn knitwright(home: &TempDir) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("knitwright");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_missing_request_file() {
    let home = TempDir::new().unwrap();
    knitwright(&home)
        .args(["calculate", "nowhere.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Request file not found"))
        .stderr(predicate::str::contains("demos/"));
}

#[test]
fn test_malformed_request_lists_methods() {
    let home = TempDir::new().unwrap();
    let request = home.path().join("spiral.toml");
    fs::write(
        &request,
        "name = \"X\"\ngauge = { stitches_per_10 = 20, rows_per_10 = 28 }\n\
         construction = { method = \"spiral\" }\n",
    )
    .unwrap();
    knitwright(&home)
        .arg("calculate")
        .arg(&request)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Could not read request"))
        .stderr(predicate::str::contains("top_down_center_out"));
}

#[test]
fn test_failed_piece_does_not_hide_others() {
    let home = TempDir::new().unwrap();
    let request = home.path().join("garment.toml");
    fs::write(
        &request,
        r#"
[[pieces]]
name = "Good"
gauge = { stitches_per_10 = 20, rows_per_10 = 28 }
construction = { method = "bottom_up", wingspan = 120, depth = 50 }

[[pieces]]
name = "Bad"
gauge = { stitches_per_10 = 0, rows_per_10 = 28 }
construction = { method = "bottom_up", wingspan = 120, depth = 50 }
"#,
    )
    .unwrap();
    knitwright(&home)
        .arg("calculate")
        .arg(&request)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Good"))
        .stdout(predicate::str::contains("Bad: could not be calculated"))
        .stderr(predicate::str::contains("1 of 2 piece(s) could not be calculated"));
}

#[test]
fn test_unknown_piece_lists_available() {
    let home = TempDir::new().unwrap();
    knitwright(&home)
        .arg("calculate")
        .arg(demo("sweater.toml"))
        .args(["--piece", "Sleeve"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No piece named 'Sleeve'"))
        .stderr(predicate::str::contains("Back"))
        .stderr(predicate::str::contains("Front"));
}

#[test]
fn test_missing_stitch_pattern() {
    let home = TempDir::new().unwrap();
    knitwright(&home)
        .arg("calculate")
        .arg(demo("moss-vest.toml"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("moss"));
}

#[test]
fn test_missing_patterns_dir() {
    let home = TempDir::new().unwrap();
    knitwright(&home)
        .args(["patterns", "--patterns-dir", "no-such-dir"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Patterns directory not found"));
}

#[test]
fn test_explicit_config_must_exist() {
    let home = TempDir::new().unwrap();
    knitwright(&home)
        .args(["--config", "missing.toml", "patterns"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_unknown_config_key() {
    let home = TempDir::new().unwrap();
    knitwright(&home)
        .args(["config", "get", "defaults.needles"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_template_with_unknown_placeholder() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join(".knitwright.toml"),
        "[templates.knitting]\nplain = \"Knit {rows} rows\"\n",
    )
    .unwrap();
    knitwright(&home)
        .arg("calculate")
        .arg(demo("top-down-shawl.toml"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("{rows}"));
}

#[test]
fn test_no_arguments_prints_help() {
    let home = TempDir::new().unwrap();
    knitwright(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
