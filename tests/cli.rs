//! Command-line tests for the bundlefs binary
//!
//! Each test runs the built binary inside a fresh temporary directory and
//! checks exit codes, stdout/stderr and the files left behind.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run bundlefs with `args` from inside `dir`
fn run_bundlefs(args: &[&str], dir: &TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bundlefs"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute bundlefs")
}

fn exit_code(output: &Output) -> i32 {
    output.status.code().unwrap_or(-1)
}

fn setup_project(dir: &TempDir) {
    let root = dir.path().join("project");
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("skip.log"), "noise\n").unwrap();
    fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
}

#[test]
fn test_forward_then_reverse() {
    let dir = TempDir::new().unwrap();
    setup_project(&dir);
    fs::write(dir.path().join("config.txt"), "*.log\n").unwrap();

    let output = run_bundlefs(
        &["--forward", "-r", "project", "-o", "bundle.txt", "--quiet"],
        &dir,
    );
    assert_eq!(exit_code(&output), 0, "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let doc = fs::read_to_string(dir.path().join("bundle.txt")).unwrap();
    assert!(doc.starts_with("# --- Project Structure ---\n\nproject/\n    a.txt\n    src/\n        main.rs\n\n"));
    assert!(!doc.contains("skip.log"));

    let output = run_bundlefs(&["--reverse", "-i", "bundle.txt", "-r", "rebuilt", "-q"], &dir);
    assert_eq!(exit_code(&output), 0);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Recreated 2 file(s) under rebuilt"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("rebuilt/a.txt")).unwrap(),
        "hello\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("rebuilt/src/main.rs")).unwrap(),
        "fn main() {}\n"
    );
}

#[test]
fn test_encode_decode_aliases_and_ignore_flag() {
    let dir = TempDir::new().unwrap();
    setup_project(&dir);

    let output = run_bundlefs(
        &["--encode", "--root", "project", "--output", "out.txt", "--ignore", "*.log,src", "-q"],
        &dir,
    );
    assert_eq!(exit_code(&output), 0);

    let doc = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert!(doc.contains("# --- File: a.txt ---"));
    assert!(!doc.contains("main.rs"));

    let output = run_bundlefs(&["--decode", "--input", "out.txt", "--root", "copy", "-q"], &dir);
    assert_eq!(exit_code(&output), 0);
    assert!(dir.path().join("copy/a.txt").is_file());
}

#[test]
fn test_summary_table_is_printed_without_quiet() {
    let dir = TempDir::new().unwrap();
    setup_project(&dir);

    let output = run_bundlefs(&["--forward", "-r", "project", "-o", "bundle.txt"], &dir);
    assert_eq!(exit_code(&output), 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BUNDLE COMPLETE"));
    assert!(stdout.contains("bundle.txt"));
}

#[test]
fn test_forward_without_output_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    setup_project(&dir);

    let output = run_bundlefs(&["--forward", "-r", "project"], &dir);
    assert_eq!(exit_code(&output), 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("--output"));
}

#[test]
fn test_reverse_without_input_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = run_bundlefs(&["--reverse", "-r", "out"], &dir);
    assert_eq!(exit_code(&output), 2);
}

#[test]
fn test_both_modes_are_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run_bundlefs(&["--forward", "--reverse", "-o", "x", "-i", "y"], &dir);
    assert_eq!(exit_code(&output), 2);
}

#[test]
fn test_non_directory_root_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("plain.txt"), "x").unwrap();

    let output = run_bundlefs(&["--forward", "-r", "plain.txt", "-o", "bundle.txt"], &dir);
    assert_eq!(exit_code(&output), 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("bundlefs:"));
    assert!(!dir.path().join("bundle.txt").exists());
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    setup_project(&dir);

    let output = run_bundlefs(
        &["--forward", "-r", "project", "-o", "bundle.txt", "-c", "nope.txt"],
        &dir,
    );
    assert_eq!(exit_code(&output), 1);
}

#[test]
fn test_missing_section_header_writes_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bundle.txt"), "# --- File: a.txt ---\nhello\n").unwrap();

    let output = run_bundlefs(&["--reverse", "-i", "bundle.txt", "-r", "target"], &dir);
    assert_eq!(exit_code(&output), 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Concatenated Files"));
    assert!(!dir.path().join("target").exists());
}

#[test]
fn test_generate_completions() {
    let dir = TempDir::new().unwrap();
    let output = run_bundlefs(&["--generate", "bash"], &dir);
    assert_eq!(exit_code(&output), 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("bundlefs"));
}
