// SPDX-License-Identifier: MIT
//
// Append buffer — one frame, one write.
//
// Every escape code and every glyph of a frame goes into this buffer
// first. A single flush at frame end hands the whole thing to the
// terminal in one `write()`, so the terminal never redraws a half-built
// screen between small writes.
//
// Growth is fallible: `append` reserves with `try_reserve` and reports
// `Error::OutOfMemory` instead of aborting or truncating the frame.
//
// `Stdout` is the sink frames go to. It writes with raw `write(2)` on
// fd 1: `io::Stdout` is line-buffered and would split a multi-line frame
// into several syscalls.

use std::io::{self, Write};

use crate::error::{Error, Result};

/// Growable byte accumulator for a single frame.
///
/// Created empty at frame start, flushed once, then released. Dropping
/// the buffer releases its storage too, so an early return out of the
/// owning scope never leaks a frame.
#[derive(Debug, Default)]
pub struct AppendBuffer {
    buf: Vec<u8>,
}

impl AppendBuffer {
    /// Create an empty buffer. No allocation happens until the first append.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Grow the buffer by exactly `bytes.len()` and copy `bytes` to the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the buffer cannot grow. The buffer
    /// is left unchanged in that case.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf
            .try_reserve(bytes.len())
            .map_err(|_| Error::OutOfMemory)?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Deallocate all backing storage.
    pub fn release(&mut self) {
        self.buf = Vec::new();
    }

    /// Write the whole frame to `w` with a single `write_all`, then release.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Os`] tagged `write` if the sink rejects the frame.
    /// The buffer is released either way.
    pub fn flush_to(&mut self, w: &mut impl Write) -> Result<()> {
        let result = if self.buf.is_empty() {
            Ok(())
        } else {
            w.write_all(&self.buf)
                .and_then(|()| w.flush())
                .map_err(|e| Error::os("write", e))
        };
        self.release();
        result
    }
}

impl Write for AppendBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)
            .map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op. Real flushing goes through flush_to().
        Ok(())
    }
}

// ─── Stdout ──────────────────────────────────────────────────────────────────

/// Unbuffered standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Write for Stdout {
    #[cfg(unix)]
    #[allow(unsafe_code)]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(libc::STDOUT_FILENO, buf.as_ptr().cast(), buf.len()) };
        if n == -1 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(n as usize)
    }

    #[cfg(not(unix))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write(buf)
    }

    #[cfg(unix)]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(not(unix))]
    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
