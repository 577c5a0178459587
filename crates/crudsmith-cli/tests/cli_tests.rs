//! End-to-end tests for the `crudsmith` binary.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SHOP: &str = r#"{
    "projectName": "shop",
    "entities": [
        {"name": "Product", "fields": [
            {"name": "title", "type": "string"},
            {"name": "price", "type": "number"},
            {"name": "category", "type": "string", "ref": "Category"}
        ]},
        {"name": "Category", "fields": [
            {"name": "label", "type": "string"}
        ]}
    ]
}"#;

/// A command isolated from the user's config, env and log settings.
fn crudsmith(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("crudsmith").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("CRUDSMITH_LOG_FILE")
        .env_remove("CRUDSMITH__DEFAULTS__DIALECT");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("shop.json"), SHOP).unwrap();
    dir
}

fn entry_names(bytes: Vec<u8>) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn staging_is_empty(dir: &Path) -> bool {
    let staging = dir.join("staging");
    !staging.exists() || fs::read_dir(staging).unwrap().next().is_none()
}

// ── help / version ────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("dialects"));
}

#[test]
fn version_matches_package() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn generate_help_mentions_schema() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--schema"))
        .stdout(predicate::str::contains("--dialect"));
}

// ── generate ──────────────────────────────────────────────────────────────────

#[test]
fn generate_writes_typescript_archive() {
    let dir = workspace();
    crudsmith(dir.path())
        .args(["generate", "-s", "shop.json", "--staging-dir", "staging"])
        .assert()
        .success()
        .stderr(predicate::str::contains("shop.zip"));

    let names = entry_names(fs::read(dir.path().join("shop.zip")).unwrap());
    let files: Vec<_> = names.iter().filter(|n| !n.ends_with('/')).collect();
    assert_eq!(files.len(), 13, "{names:?}");
    assert!(names.contains(&"src/interfaces/Product.interface.ts".to_string()));
    assert!(names.contains(&"src/routes/Category.routes.ts".to_string()));
    assert!(names.contains(&"start.bat".to_string()));
    assert!(staging_is_empty(dir.path()));
}

#[test]
fn generate_javascript_with_shell_script() {
    let dir = workspace();
    crudsmith(dir.path())
        .args([
            "gen",
            "-s",
            "shop.json",
            "-d",
            "js",
            "--startup-script",
            "sh",
            "-o",
            "api.zip",
            "--staging-dir",
            "staging",
        ])
        .assert()
        .success();

    let bytes = fs::read(dir.path().join("api.zip")).unwrap();
    let names = entry_names(bytes.clone());
    assert_eq!(names.iter().filter(|n| !n.ends_with('/')).count(), 9);
    assert!(names.contains(&"start.sh".to_string()));
    assert!(!names.iter().any(|n| n.contains("interfaces")));

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut index = String::new();
    archive
        .by_name("src/index.js")
        .unwrap()
        .read_to_string(&mut index)
        .unwrap();
    assert!(index.contains("mongodb://"));
    assert!(index.contains("/shop"));
}

#[test]
fn config_dialect_applies_without_flag() {
    let dir = workspace();
    crudsmith(dir.path())
        .env("CRUDSMITH__DEFAULTS__DIALECT", "javascript")
        .args(["generate", "-s", "shop.json", "--staging-dir", "staging"])
        .assert()
        .success();

    let names = entry_names(fs::read(dir.path().join("shop.zip")).unwrap());
    assert!(names.contains(&"src/index.js".to_string()));
}

#[test]
fn schema_from_stdin_with_name_override() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .args([
            "generate",
            "-s",
            "-",
            "--name",
            "store",
            "--staging-dir",
            "staging",
        ])
        .write_stdin(r#"{"entities": [{"name": "Product", "fields": []}]}"#)
        .assert()
        .success();

    assert!(dir.path().join("store.zip").exists());
}

#[test]
fn output_dash_streams_archive_to_stdout() {
    let dir = workspace();
    let assert = crudsmith(dir.path())
        .args([
            "generate",
            "-s",
            "shop.json",
            "-o",
            "-",
            "--staging-dir",
            "staging",
        ])
        .assert()
        .success();

    let stdout = assert.get_output().stdout.clone();
    assert!(stdout.starts_with(b"PK"));
    assert!(entry_names(stdout).contains(&"package.json".to_string()));
    assert!(!dir.path().join("shop.zip").exists());
}

#[test]
fn json_receipt_describes_archive() {
    let dir = workspace();
    let assert = crudsmith(dir.path())
        .args([
            "--output-format",
            "json",
            "generate",
            "-s",
            "shop.json",
            "--staging-dir",
            "staging",
        ])
        .assert()
        .success();

    let receipt: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(receipt["projectName"], "shop");
    assert_eq!(receipt["dialect"], "typescript");
    assert_eq!(receipt["fileName"], "shop.zip");
    assert_eq!(receipt["filesWritten"], 13);
    assert_eq!(
        receipt["contentDisposition"],
        "attachment; filename=\"shop.zip\""
    );
}

#[test]
fn dry_run_writes_nothing() {
    let dir = workspace();
    crudsmith(dir.path())
        .args([
            "generate",
            "-s",
            "shop.json",
            "--dry-run",
            "--staging-dir",
            "staging",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("src/models/Product.model.ts"));

    assert!(!dir.path().join("shop.zip").exists());
    assert!(!dir.path().join("staging").exists());
}

#[test]
fn dry_run_json_reports_file_count() {
    let dir = workspace();
    let assert = crudsmith(dir.path())
        .args(["--output-format", "json", "generate", "-s", "shop.json", "--dry-run"])
        .assert()
        .success();

    let plan: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(plan["fileCount"], 13);
    assert_eq!(plan["files"].as_array().unwrap().len(), 13);
}

// ── errors ────────────────────────────────────────────────────────────────────

#[test]
fn empty_entities_is_user_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("empty.json"),
        r#"{"projectName": "shop", "entities": []}"#,
    )
    .unwrap();

    crudsmith(dir.path())
        .args(["generate", "-s", "empty.json", "--staging-dir", "staging"])
        .assert()
        .code(2);

    assert!(!dir.path().join("shop.zip").exists());
}

#[test]
fn missing_schema_is_not_found() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .args(["generate", "-s", "nope.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn malformed_schema_is_user_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.json"), "{ not json").unwrap();

    crudsmith(dir.path())
        .args(["generate", "-s", "bad.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Malformed schema"));
}

#[test]
fn existing_output_requires_force() {
    let dir = workspace();
    fs::write(dir.path().join("shop.zip"), b"keep me").unwrap();

    crudsmith(dir.path())
        .args(["generate", "-s", "shop.json", "--staging-dir", "staging"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
    assert_eq!(fs::read(dir.path().join("shop.zip")).unwrap(), b"keep me");

    crudsmith(dir.path())
        .args([
            "generate",
            "-s",
            "shop.json",
            "--force",
            "--staging-dir",
            "staging",
        ])
        .assert()
        .success();
    assert!(fs::read(dir.path().join("shop.zip")).unwrap().starts_with(b"PK"));
}

#[test]
fn stdout_archive_conflicts_with_json_output() {
    let dir = workspace();
    crudsmith(dir.path())
        .args([
            "--output-format",
            "json",
            "generate",
            "-s",
            "shop.json",
            "-o",
            "-",
        ])
        .assert()
        .code(2);
}

#[test]
fn shared_staging_in_cwd_cannot_overwrite_its_own_archive() {
    let dir = workspace();
    crudsmith(dir.path())
        .args([
            "generate",
            "-s",
            "shop.json",
            "--shared-staging",
            "--staging-dir",
            ".",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--shared-staging"));
    assert!(!dir.path().join("shop.zip").exists());
    assert!(!dir.path().join("shop").exists());

    crudsmith(dir.path())
        .args([
            "generate",
            "-s",
            "shop.json",
            "--shared-staging",
            "--staging-dir",
            ".",
            "-o",
            "delivered.zip",
        ])
        .assert()
        .success();
    assert!(fs::read(dir.path().join("delivered.zip")).unwrap().starts_with(b"PK"));
    assert!(!dir.path().join("shop.zip").exists());
}

#[test]
fn unknown_dialect_is_rejected_by_parser() {
    let dir = workspace();
    crudsmith(dir.path())
        .args(["generate", "-s", "shop.json", "-d", "cobol"])
        .assert()
        .code(2);
}

#[test]
fn invalid_config_file_is_configuration_error() {
    let dir = workspace();
    fs::write(dir.path().join("bad.toml"), "[defaults]\ndialect = \"cobol\"\n").unwrap();

    crudsmith(dir.path())
        .args(["--config", "bad.toml", "dialects"])
        .assert()
        .code(4);
}

// ── other commands ────────────────────────────────────────────────────────────

#[test]
fn dialects_json_lists_both() {
    let dir = TempDir::new().unwrap();
    let assert = crudsmith(dir.path())
        .args(["dialects", "--format", "json"])
        .assert()
        .success();

    let dialects: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(dialects[0]["name"], "typescript");
    assert_eq!(dialects[0]["filesPerEntity"], 5);
    assert_eq!(dialects[1]["name"], "javascript");
    assert_eq!(dialects[1]["projectFiles"], 3);
}

#[test]
fn dialects_list_prints_names() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .args(["ls", "--format", "list"])
        .assert()
        .success()
        .stdout("typescript\njavascript\n");
}

#[test]
fn init_local_then_config_get() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .args(["init", "--local"])
        .assert()
        .success();
    assert!(dir.path().join(".crudsmith.toml").exists());

    crudsmith(dir.path())
        .args(["config", "get", "defaults.dialect"])
        .assert()
        .success()
        .stderr(predicate::str::contains("typescript"));
}

#[test]
fn config_get_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .args(["config", "get", "nope"])
        .assert()
        .code(4);
}

#[test]
fn completions_for_bash() {
    let dir = TempDir::new().unwrap();
    crudsmith(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("crudsmith"));
}
