// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources — where keystrokes and terminal replies come from.
//
// In raw mode with VMIN=0 / VTIME=1 a `read()` on stdin returns after at
// most one decisecond, possibly with zero bytes. `ByteSource::read_byte`
// models exactly that: `Ok(Some(b))` for a byte, `Ok(None)` when the
// quantum elapsed with nothing to read, `Err` for a real failure.
//
// Keystrokes and cursor-position replies share the same stream, so the
// decoder and the geometry probe both pull from a `ByteSource`.

use std::collections::VecDeque;
use std::io;

use crate::error::{Error, Result};

/// A timeout-bounded source of single bytes.
pub trait ByteSource {
    /// Read at most one byte.
    ///
    /// Returns `Ok(None)` if the read timed out with no data available.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "no data yet".
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── Stdin ───────────────────────────────────────────────────────────────────

/// Standard input read one byte at a time with raw `read(2)`.
///
/// Bypasses `io::stdin()`'s internal buffer: a buffered reader would
/// swallow bytes beyond the first and hide them from the next timeout
/// decision.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdin;

impl ByteSource for Stdin {
    #[cfg(unix)]
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::WouldBlock {
                    Ok(None)
                } else {
                    Err(Error::os("read", err))
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn read_byte(&mut self) -> Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(Error::os("read", e)),
        }
    }
}

// ─── Scripted ────────────────────────────────────────────────────────────────

/// A byte source fed from a fixed script, for driving the decoder, the
/// geometry probe, and the event loop without a terminal.
///
/// Each entry is either a byte or `None` for one empty read quantum.
/// Once the script runs dry, reads fail with `UnexpectedEof` so a test
/// can never spin forever waiting for a key that won't come.
#[derive(Debug, Default, Clone)]
pub struct Scripted {
    script: VecDeque<Option<u8>>,
    consumed: usize,
}

impl Scripted {
    /// Script that yields `bytes` back to back with no timeouts.
    #[must_use]
    pub fn bytes(bytes: &[u8]) -> Self {
        Self {
            script: bytes.iter().copied().map(Some).collect(),
            consumed: 0,
        }
    }

    /// Append one empty read quantum.
    #[must_use]
    pub fn then_timeout(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    /// Append more bytes.
    #[must_use]
    pub fn then_bytes(mut self, bytes: &[u8]) -> Self {
        self.script.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Number of bytes (not timeouts) handed out so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Script entries not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ByteSource for Scripted {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.script.pop_front() {
            Some(Some(b)) => {
                self.consumed += 1;
                Ok(Some(b))
            }
            Some(None) => Ok(None),
            None => Err(Error::os("read", io::ErrorKind::UnexpectedEof.into())),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
