// SPDX-License-Identifier: MIT
//
// epsilon-term — Terminal layer for the epsilon editor.
//
// Puts the terminal into raw mode and guarantees it comes back out,
// decodes keystrokes (including arrow and navigation escape sequences)
// from a timeout-polled stdin, works out the viewport size with an ioctl
// or a cursor-position report, and batches each screen repaint into a
// single write.
//
// Direct termios and VT100 sequences, no TUI framework. Every byte read
// or written goes through a `ByteSource` or an `impl Write`, so all of
// it runs under test without a terminal attached.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Error, Result};
