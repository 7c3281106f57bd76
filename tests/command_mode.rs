//! Integration tests for the command-line front end

use std::path::Path;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    // An empty config keeps the tests independent of the user's ~/.config/reckon.
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").expect("Failed to write config");

    let output = Command::new(env!("CARGO_BIN_EXE_reckon"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "3+4*2"]);
    assert_eq!(stdout.trim(), "11");
    assert_eq!(code, 0);
}

#[test]
fn test_parentheses_and_division() {
    let (stdout, _, code) = run_command(&["-c", "=(3+4)*2/4"]);
    assert_eq!(stdout.trim(), "3.5");
    assert_eq!(code, 0);
}

#[test]
fn test_command_rejects_cell_references() {
    let (stdout, stderr, code) = run_command(&["-c", "A1+1"]);
    assert!(stdout.is_empty());
    assert!(stderr.contains("A1"));
    assert_eq!(code, 1);
}

#[test]
fn test_divide_by_zero_exit_code() {
    let (_, stderr, code) = run_command(&["-c", "1/0"]);
    assert!(stderr.contains("Division by zero"));
    assert_eq!(code, 1);
}

#[test]
fn test_set_cascades() {
    let (stdout, _, code) = run_command(&["-s", "B1==A1*2", "-s", "A1=21", "-s", "C1==B1+A1"]);
    assert_eq!(stdout, "A1\t21\t21\nB1\t=A1*2\t42\nC1\t=B1+A1\t63\n");
    assert_eq!(code, 0);
}

#[test]
fn test_cell_errors_are_warnings() {
    let (stdout, stderr, code) = run_command(&["-s", "A1==A1+1", "-s", "B1==B2", "-s", "B2==B1"]);
    assert_eq!(
        stdout,
        "A1\t=A1+1\t#SELF!\nB1\t=B2\t#CYCLE!\nB2\t=B1\t#CYCLE!\n"
    );
    assert!(stderr.contains("Warning"));
    assert_eq!(code, 0);
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("sheet.rsk");

    let (_, _, code) = run_command(&[
        "-s",
        "A1=5",
        "-s",
        "A2==A1*A1",
        "-o",
        path_arg(&file),
    ]);
    assert_eq!(code, 0);
    assert!(file.exists());

    let (stdout, _, code) = run_command(&[path_arg(&file), "-s", "A1=6"]);
    assert_eq!(stdout, "A1\t6\t6\nA2\t=A1*A1\t36\n");
    assert_eq!(code, 0);
}

#[test]
fn test_missing_file_fails() {
    let (_, stderr, code) = run_command(&["/definitely/not/here.rsk"]);
    assert!(stderr.starts_with("Error:"));
    assert_eq!(code, 1);
}

#[test]
fn test_unknown_option() {
    let (_, stderr, code) = run_command(&["--frobnicate"]);
    assert!(stderr.contains("Unknown option"));
    assert_eq!(code, 1);
}
