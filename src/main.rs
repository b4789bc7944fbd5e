// SPDX-License-Identifier: MIT
//
// epsilon — a minimal screen-oriented terminal text editor.
//
// This is the binary that wires the crates together:
//
//   epsilon-term   → raw mode, key decoding, geometry probe, frame writes
//   epsilon-editor → cursor state machine and screen composition
//
// Startup: raw mode (scoped guard) → probe the viewport → build the editor
// → run the render/read/apply loop. Ctrl-Q leaves the loop, the terminal
// is restored, and the process exits 0. Any OS-level failure
// on the way is fatal: the guard restores, the screen is cleared, the
// reason and the OS error are printed, and the process exits 1.

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use epsilon_editor::editor::Editor;
use epsilon_term::ansi;
use epsilon_term::event_loop::EventLoop;
use epsilon_term::output::Stdout;
use epsilon_term::terminal::{RawConfig, RawMode};

// ─── Arguments ──────────────────────────────────────────────────────────────

/// A minimal screen-oriented terminal text editor.
#[derive(Debug, Parser)]
#[command(name = "epsilon", version, about)]
struct Args {
    /// Write logs to this file. Nothing is logged without it.
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Log filter directive, used when `RUST_LOG` is unset.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install a file-backed subscriber if `--log` was given.
///
/// Logs never go to stdout or stderr: either would land in the middle of
/// a raw-mode screen.
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let Some(path) = &args.log else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .with_context(|| format!("invalid log level {:?}", args.log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ─── Run ────────────────────────────────────────────────────────────────────

/// Everything that runs in raw mode. On the way out after quit the
/// restore is explicit, so a failed `tcsetattr` is fatal like any other.
/// Early returns restore through the guard's drop.
fn run() -> epsilon_term::Result<()> {
    let mut raw = RawMode::enable(RawConfig::default())?;

    let mut event_loop = EventLoop::stdio();
    let size = event_loop.window_size()?;
    tracing::info!(rows = size.rows, cols = size.cols, "editor started");

    let mut editor = Editor::new(size);
    event_loop.run(&mut editor)?;
    raw.restore()
}

/// The line printed on the fatal path: `epsilon: <op>: <os error>`.
fn diagnostic(err: &epsilon_term::Error) -> String {
    format!("epsilon: {err}")
}

/// Fatal path. Clears the screen, reports, exits 1.
fn die(err: &epsilon_term::Error) -> ! {
    tracing::error!(op = err.op(), code = ?err.os_code(), error = %err, "fatal");
    let _ = ansi::clear_and_home(&mut Stdout);
    eprintln!("{}", diagnostic(err));
    process::exit(1);
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("epsilon: {e:#}");
        process::exit(1);
    }

    if let Err(e) = run() {
        die(&e);
    }
    tracing::info!("editor exited");
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn args_default() {
        let args = Args::try_parse_from(["epsilon"]).unwrap();
        assert_eq!(args.log, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn args_log_file_and_level() {
        let args =
            Args::try_parse_from(["epsilon", "--log", "/tmp/e.log", "--log-level", "debug"])
                .unwrap();
        assert_eq!(args.log, Some(PathBuf::from("/tmp/e.log")));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn args_reject_positional() {
        assert!(Args::try_parse_from(["epsilon", "file.txt"]).is_err());
    }

    #[test]
    fn logging_is_off_without_flag() {
        let args = Args::try_parse_from(["epsilon"]).unwrap();
        init_logging(&args).unwrap();
    }

    #[test]
    fn diagnostic_names_op_and_os_error() {
        let err = epsilon_term::Error::os("tcgetattr", io::Error::from_raw_os_error(25));
        let line = diagnostic(&err);
        assert!(line.starts_with("epsilon: tcgetattr: "), "{line}");
        assert!(line.contains("os error 25"), "{line}");
    }

    #[test]
    fn diagnostic_for_bad_report() {
        let err = epsilon_term::Error::MalformedReport("junk".into());
        assert_eq!(
            diagnostic(&err),
            "epsilon: malformed cursor position report: \"junk\""
        );
    }
}
