//! End-to-end tests for the `keeber` CLI.

use std::fs;
use std::process::Command;

/// Path to the keeber binary
fn keeber_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keeber")
}

const FIXTURE: &str = include_str!("fixtures/split.yaml");

#[test]
fn test_inspect_reports_summary() {
    let dir = tempfile::tempdir().expect("temp dir");
    let layout_path = dir.path().join("split.yaml");
    fs::write(&layout_path, FIXTURE).expect("write fixture");

    let output = Command::new(keeber_bin())
        .args(["inspect", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "inspect should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Keys: 14 (14 physical)"), "stdout: {stdout}");
    assert!(stdout.contains("Matrix: 3 rows x 4 cols, mirrored"));
    assert!(stdout.contains("TRRS pin: P15"));
}

#[test]
fn test_inspect_json_output_parses() {
    let dir = tempfile::tempdir().expect("temp dir");
    let layout_path = dir.path().join("split.yaml");
    fs::write(&layout_path, FIXTURE).expect("write fixture");

    let output = Command::new(keeber_bin())
        .args(["inspect", layout_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["keys"].as_array().unwrap().len(), 14);
    assert_eq!(value["matrix"]["mirrored"], true);
}

#[test]
fn test_inspect_missing_file_fails() {
    let output = Command::new(keeber_bin())
        .args(["inspect", "/nonexistent/layout.yaml"])
        .output()
        .expect("Failed to execute command");

    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn test_generate_writes_both_trees() {
    let dir = tempfile::tempdir().expect("temp dir");
    let layout_path = dir.path().join("split.yaml");
    fs::write(&layout_path, FIXTURE).expect("write fixture");
    let out_dir = dir.path().join("out");

    let output = Command::new(keeber_bin())
        .args([
            "generate",
            "--layout",
            layout_path.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "generate should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for file in [
        "zmk/keymap.keymap",
        "zmk/matrix.overlay",
        "qmk/keymap.c",
        "qmk/info.json",
        "qmk/config.h",
        "qmk/rules.mk",
    ] {
        assert!(out_dir.join(file).exists(), "{file} should be created");
    }

    let keymap = fs::read_to_string(out_dir.join("zmk/keymap.keymap")).unwrap();
    assert!(keymap.contains("compatible = \"zmk,keymap\";"));
}

#[test]
fn test_generate_format_filter() {
    let dir = tempfile::tempdir().expect("temp dir");
    let layout_path = dir.path().join("split.yaml");
    fs::write(&layout_path, FIXTURE).expect("write fixture");
    let out_dir = dir.path().join("out");

    let output = Command::new(keeber_bin())
        .args([
            "generate",
            "--layout",
            layout_path.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
            "--format",
            "qmk",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert!(out_dir.join("qmk/keymap.c").exists());
    assert!(!out_dir.join("zmk").exists());
}

#[test]
fn test_generate_from_saved_project() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out_dir = dir.path().join("out");

    // Build and save a project through the library, then feed it back in
    let parsed = keeber::parser::parse_layout_str(FIXTURE).unwrap();
    let mut project = keeber::project::ProjectFile::new(parsed);
    project.layers[0].set_binding(
        "matrix_pinky_home",
        keeber::models::Binding::new("&kp Q", "KC_Q"),
    );
    let project_path = dir.path().join("board.kb.json");
    fs::write(&project_path, project.to_json().unwrap()).unwrap();

    let output = Command::new(keeber_bin())
        .args([
            "generate",
            "--project",
            project_path.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let keymap = fs::read_to_string(out_dir.join("qmk/keymap.c")).unwrap();
    assert!(keymap.contains("KC_Q"));
}

#[test]
fn test_generate_rejects_bad_format() {
    let output = Command::new(keeber_bin())
        .args(["generate", "--layout", "x.yaml", "--format", "avr"])
        .output()
        .expect("Failed to execute command");

    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid format"), "stderr: {stderr}");
}

#[test]
fn test_generate_rejects_unsupported_project_version() {
    let dir = tempfile::tempdir().expect("temp dir");
    let project_path = dir.path().join("old.kb.json");
    fs::write(&project_path, r#"{"version": 0, "parsed": {}, "layers": []}"#).unwrap();

    let output = Command::new(keeber_bin())
        .args([
            "generate",
            "--project",
            project_path.to_str().unwrap(),
            "--out-dir",
            dir.path().join("out").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unsupported project file version"),
        "stderr: {stderr}"
    );
}
