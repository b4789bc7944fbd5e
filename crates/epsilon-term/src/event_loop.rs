// SPDX-License-Identifier: MIT
//
// Event loop — render, read one key, apply it, repeat.
//
// Single-threaded and synchronous. Each iteration paints a complete frame
// into a fresh `AppendBuffer`, flushes it with one write, then blocks in
// `read_key` until a key arrives and hands it to the application. State
// is only ever mutated between a flush and the next paint, so no frame
// can observe a half-applied key.
//
// On `Action::Quit` the loop clears the screen, homes the cursor, and
// returns. Raw mode is not the loop's business: the caller holds the
// `RawMode` guard and drops it after `run` returns.

use std::io::Write;

use crate::ansi;
use crate::error::{Error, Result};
use crate::geometry::{self, Size};
use crate::input::{self, KeyEvent};
use crate::output::{AppendBuffer, Stdout};
use crate::reader::{ByteSource, Stdin};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Clear the screen and leave the loop.
    Quit,
}

/// Application interface for the event loop.
pub trait App {
    /// Compose the current state into `frame`.
    ///
    /// The frame arrives empty. Everything appended is written to the
    /// terminal in one go after this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame buffer cannot grow.
    fn paint(&mut self, frame: &mut AppendBuffer) -> Result<()>;

    /// Apply one decoded key.
    fn on_key(&mut self, key: KeyEvent) -> Action;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The render/read/apply loop over a byte source and an output sink.
///
/// # Example
///
/// ```no_run
/// use epsilon_term::event_loop::{Action, App, EventLoop};
/// use epsilon_term::input::KeyEvent;
/// use epsilon_term::output::AppendBuffer;
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn paint(&mut self, frame: &mut AppendBuffer) -> epsilon_term::Result<()> {
///         frame.append(b"~")
///     }
///
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key.is_ctrl(b'q') { Action::Quit } else { Action::Continue }
///     }
/// }
///
/// EventLoop::stdio().run(&mut Quitter)?;
/// # Ok::<(), epsilon_term::Error>(())
/// ```
#[derive(Debug)]
pub struct EventLoop<S, W> {
    input: S,
    output: W,
}

impl EventLoop<Stdin, Stdout> {
    /// Loop over the process's stdin and stdout.
    #[must_use]
    pub const fn stdio() -> Self {
        Self::new(Stdin, Stdout)
    }
}

impl<S: ByteSource, W: Write> EventLoop<S, W> {
    /// Loop over an arbitrary source and sink.
    #[must_use]
    pub const fn new(input: S, output: W) -> Self {
        Self { input, output }
    }

    /// The output sink (test inspection).
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }

    /// The input source (test inspection).
    #[must_use]
    pub const fn input(&self) -> &S {
        &self.input
    }

    /// Probe the viewport size over this loop's input and output.
    ///
    /// # Errors
    ///
    /// See [`geometry::window_size`].
    pub fn window_size(&mut self) -> Result<Size> {
        geometry::window_size(&mut self.input, &mut self.output)
    }

    /// Paint one frame and write it with a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if painting or the write fails.
    pub fn refresh(&mut self, app: &mut impl App) -> Result<()> {
        let mut frame = AppendBuffer::new();
        app.paint(&mut frame)?;
        frame.flush_to(&mut self.output)
    }

    /// One iteration: refresh, block for a key, apply it.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh or the read fails.
    pub fn step(&mut self, app: &mut impl App) -> Result<Action> {
        self.refresh(app)?;
        let key = input::read_key(&mut self.input)?;
        Ok(app.on_key(key))
    }

    /// Run until the application quits.
    ///
    /// # Errors
    ///
    /// Returns the first OS or frame-buffer error. Nothing is retried.
    pub fn run(&mut self, app: &mut impl App) -> Result<()> {
        while self.step(app)? == Action::Continue {}

        tracing::debug!("quit requested");
        ansi::clear_and_home(&mut self.output)
            .and_then(|()| self.output.flush())
            .map_err(|e| Error::os("write", e))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
