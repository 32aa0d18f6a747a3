//! Behavior tests for `invoke` against small shell scripts standing in for
//! the PLIP executable.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use pliptab_invoke::{InvokeError, ToolCommand, ToolVerbosity, invoke};
use tempfile::TempDir;

fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[test]
fn captures_stdout_then_stderr() {
    let tmp = TempDir::new().unwrap();
    let tool = script(&tmp, "tool.sh", "echo out; echo err 1>&2");

    let output = invoke(
        &ToolCommand::new(tool),
        Path::new("x.pdb"),
        ToolVerbosity::Quiet,
        None,
    )
    .unwrap();

    assert_eq!(output.stdout, "out\n");
    assert_eq!(output.stderr, "err\n");
    assert_eq!(output.combined(), "out\nerr\n");
}

#[test]
fn passes_the_fixed_flag_vocabulary() {
    let tmp = TempDir::new().unwrap();
    let tool = script(&tmp, "tool.sh", r#"for a in "$@"; do echo "[$a]"; done"#);

    let output = invoke(
        &ToolCommand::new(tool),
        Path::new("/data/a.pdb"),
        ToolVerbosity::Quiet,
        None,
    )
    .unwrap();

    assert_eq!(
        output.stdout,
        "[-x]\n[-O]\n[-q]\n[-f]\n[/data/a.pdb]\n[--chains]\n[[['H'], ['T']]]\n"
    );
}

#[test]
fn nonzero_exit_is_reported_with_command() {
    let tmp = TempDir::new().unwrap();
    let tool = script(&tmp, "tool.sh", "echo boom 1>&2; exit 3");

    let err = invoke(
        &ToolCommand::new(&tool),
        Path::new("bad.pdb"),
        ToolVerbosity::Verbose,
        None,
    )
    .unwrap_err();

    match &err {
        InvokeError::Failed { command, status } => {
            assert!(command.contains("bad.pdb"));
            assert!(!command.contains(" -q "));
            assert_eq!(status.code(), Some(3));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn timeout_kills_a_hung_tool() {
    let tmp = TempDir::new().unwrap();
    let tool = script(&tmp, "tool.sh", "exec sleep 30");

    let start = Instant::now();
    let err = invoke(
        &ToolCommand::new(tool),
        Path::new("slow.pdb"),
        ToolVerbosity::Quiet,
        Some(Duration::from_millis(200)),
    )
    .unwrap_err();

    assert!(matches!(err, InvokeError::TimedOut { .. }));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn timeout_covers_pipes_held_by_a_background_process() {
    // The tool exits at once but leaves a child holding its stdout open.
    let tmp = TempDir::new().unwrap();
    let tool = script(&tmp, "tool.sh", "sleep 30 &\necho started");

    let start = Instant::now();
    let err = invoke(
        &ToolCommand::new(tool),
        Path::new("bg.pdb"),
        ToolVerbosity::Quiet,
        Some(Duration::from_millis(300)),
    )
    .unwrap_err();

    assert!(matches!(err, InvokeError::TimedOut { .. }));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn timeout_does_not_affect_fast_tools() {
    let tmp = TempDir::new().unwrap();
    let tool = script(&tmp, "tool.sh", "echo done");

    let output = invoke(
        &ToolCommand::new(tool),
        Path::new("fast.pdb"),
        ToolVerbosity::Quiet,
        Some(Duration::from_secs(30)),
    )
    .unwrap();

    assert_eq!(output.stdout, "done\n");
}

#[test]
fn large_output_does_not_deadlock() {
    let tmp = TempDir::new().unwrap();
    // Well beyond a pipe buffer on both streams.
    let tool = script(
        &tmp,
        "tool.sh",
        "i=0; while [ $i -lt 20000 ]; do echo 'line of log output'; echo 'noise' 1>&2; i=$((i+1)); done",
    );

    let output = invoke(
        &ToolCommand::new(tool),
        Path::new("big.pdb"),
        ToolVerbosity::Quiet,
        Some(Duration::from_secs(60)),
    )
    .unwrap();

    assert_eq!(output.stdout.lines().count(), 20000);
    assert_eq!(output.stderr.lines().count(), 20000);
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let tmp = TempDir::new().unwrap();
    let tool = script(&tmp, "tool.sh", r"printf 'ok\377ok'");

    let output = invoke(
        &ToolCommand::new(tool),
        Path::new("x.pdb"),
        ToolVerbosity::Quiet,
        None,
    )
    .unwrap();

    assert!(output.stdout.starts_with("ok"));
    assert!(output.stdout.ends_with("ok"));
    assert!(output.stdout.contains('\u{FFFD}'));
}
