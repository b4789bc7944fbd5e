// SPDX-License-Identifier: MIT
//
// Exit status and diagnostics of the `epsilon` binary when it can't run.

use std::process::{Command, Stdio};

use pretty_assertions::assert_eq;

fn epsilon() -> Command {
    Command::new(env!("CARGO_BIN_EXE_epsilon"))
}

// ── Not a terminal ────────────────────────────────────────────────────

#[test]
fn stdin_not_a_tty_exits_one_with_tcgetattr() {
    let out = epsilon()
        .stdin(Stdio::null())
        .output()
        .expect("spawn epsilon");

    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("epsilon: tcgetattr: "), "{stderr}");
    assert!(stderr.contains("os error"), "{stderr}");

    assert_eq!(out.stdout, b"\x1b[2J\x1b[H");
}

// ── Arguments ─────────────────────────────────────────────────────────

#[test]
fn positional_argument_is_rejected() {
    let out = epsilon()
        .arg("file.txt")
        .stdin(Stdio::null())
        .output()
        .expect("spawn epsilon");

    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
}

#[test]
fn unwritable_log_file_exits_one() {
    let out = epsilon()
        .args(["--log", "/nonexistent-dir/epsilon.log"])
        .stdin(Stdio::null())
        .output()
        .expect("spawn epsilon");

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("epsilon: cannot create log file"), "{stderr}");
}
