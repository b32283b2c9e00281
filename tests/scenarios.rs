use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn run_shell(input: &str, cwd: &Path) -> Output {
    run_shell_bytes(input.as_bytes(), cwd)
}

fn run_shell_bytes(input: &[u8], cwd: &Path) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_fgsh"))
        .current_dir(cwd)
        .env("FGSH_NONINTERACTIVE", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input)
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_pipeline_then_prompt_resumes() {
    let dir = tempdir().unwrap();
    let output = run_shell("echo hello | wc -w\necho after\n", dir.path());

    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<_> = out.lines().map(str::trim).collect();
    assert_eq!(lines, vec!["1", "after"]);
}

#[test]
fn test_cd_to_missing_dir() {
    let dir = tempdir().unwrap();
    let output = run_shell("cd nonexistent_dir\npwd\n", dir.path());

    assert!(output.status.success());
    let cwd = dir.path().canonicalize().unwrap();
    assert_eq!(stdout(&output), format!("{}\n", cwd.display()));
    assert!(stderr(&output).contains("cd: nonexistent_dir"));
}

#[test]
fn test_cd_changes_later_commands() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let output = run_shell("cd sub\npwd\nls > listing\ncd\n", dir.path());

    let sub = dir.path().join("sub").canonicalize().unwrap();
    assert_eq!(stdout(&output).lines().next(), Some(sub.to_str().unwrap()));
    assert!(sub.join("listing").exists());
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();
    let output = run_shell("cat < missing_file.txt\necho still here\n", dir.path());

    assert!(output.status.success());
    assert!(stderr(&output).contains("missing_file.txt"));
    assert_eq!(stdout(&output), "still here\n");
}

#[test]
fn test_unknown_program() {
    let dir = tempdir().unwrap();
    let output = run_shell("nonexistent_prog arg1\necho next\n", dir.path());

    assert!(output.status.success());
    assert!(stderr(&output).contains("nonexistent_prog: command not found"));
    assert_eq!(stdout(&output), "next\n");
}

#[test]
fn test_syntax_error_does_not_stop_the_loop() {
    let dir = tempdir().unwrap();
    let output = run_shell("echo a |\necho 'open\necho b\n", dir.path());

    assert!(output.status.success());
    let err = stderr(&output);
    assert!(err.contains("syntax error"));
    assert!(err.contains("parse error"));
    assert_eq!(stdout(&output), "b\n");
}

#[test]
fn test_exit_stops_reading() {
    let dir = tempdir().unwrap();
    let output = run_shell("echo one\nexit\necho two\n", dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "one\n");
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let dir = tempdir().unwrap();
    let output = run_shell("false", dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_help() {
    let dir = tempdir().unwrap();
    let output = run_shell("?\n", dir.path());

    let out = stdout(&output);
    assert!(out.starts_with("? - show this help menu\n"));
    assert_eq!(out.lines().count(), 4);
}

#[test]
fn test_cd_with_redirection_changes_directory() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let output = run_shell("cd sub > log\npwd\n", dir.path());

    assert!(output.status.success());
    let sub = dir.path().join("sub").canonicalize().unwrap();
    assert_eq!(stdout(&output), format!("{}\n", sub.display()));
    assert!(dir.path().join("log").exists());
}

#[test]
fn test_exit_with_redirection_stops_reading() {
    let dir = tempdir().unwrap();
    let output = run_shell("exit > /dev/null\necho unreachable\n", dir.path());

    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_invalid_utf8_line_is_skipped() {
    let dir = tempdir().unwrap();
    let output = run_shell_bytes(b"echo \xff\necho after\n", dir.path());

    assert!(output.status.success());
    assert_eq!(stdout(&output), "after\n");
    assert!(stderr(&output).contains("fgsh: invalid UTF-8 input"));
}
