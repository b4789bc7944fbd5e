// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Geometry probe — how big is the screen?
//
// Primary path: `ioctl(TIOCGWINSZ)`. Some terminals answer that with a
// zero column count (or not at all), so there is a fallback that asks the
// terminal itself: push the cursor as far right and down as it will go
// with `ESC[999C ESC[999B` (CUF/CUD stop at the margins, so a large count
// can't overflow), then request a cursor-position report with `ESC[6n`.
// The reply `ESC[<rows>;<cols>R` arrives on stdin like any keystroke.

use std::io::Write;

use crate::ansi;
use crate::error::{Error, Result};
use crate::reader::ByteSource;

/// Capacity of the cursor-position reply buffer (31 bytes + terminator).
const REPORT_CAPACITY: usize = 32;

/// Distance used to drive the cursor to the bottom-right corner.
const FAR_CORNER: u16 = 999;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Viewport dimensions in character cells. Both fields are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Number of rows (height in character cells).
    pub rows: u16,
    /// Number of columns (width in character cells).
    pub cols: u16,
}

impl Size {
    /// Build a size, rejecting zero dimensions.
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            None
        } else {
            Some(Self { rows, cols })
        }
    }
}

// ─── Primary: ioctl ─────────────────────────────────────────────────────────

/// Query the terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if the ioctl fails or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn ioctl_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == -1 {
        return None;
    }
    Size::new(ws.ws_row, ws.ws_col)
}

#[cfg(not(unix))]
#[must_use]
pub fn ioctl_size() -> Option<Size> {
    None
}

// ─── Fallback: cursor position report ───────────────────────────────────────

/// Parse a cursor-position report of the form `ESC [ rows ; cols R`.
///
/// The trailing `R` is optional, so both the raw reply and the bytes
/// collected before the terminator are accepted.
///
/// # Errors
///
/// Returns [`Error::MalformedReport`] if the prefix isn't `ESC [`, either
/// number fails to parse, or either dimension is zero.
pub fn parse_cursor_report(reply: &[u8]) -> Result<Size> {
    let malformed = || Error::MalformedReport(reply.escape_ascii().to_string());

    let body = reply.strip_prefix(b"\x1b[").ok_or_else(malformed)?;
    let body = body.strip_suffix(b"R").unwrap_or(body);

    let mut fields = body.splitn(2, |&b| b == b';');
    let rows = fields.next().and_then(parse_u16).ok_or_else(malformed)?;
    let cols = fields.next().and_then(parse_u16).ok_or_else(malformed)?;

    Size::new(rows, cols).ok_or_else(malformed)
}

/// Parse a non-empty run of ASCII digits.
fn parse_u16(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Request the cursor position and read the reply.
///
/// Reads byte by byte until `R`, an empty read, or the reply buffer is
/// full, then parses whatever arrived.
///
/// # Errors
///
/// Returns an OS error if the request can't be written or a read fails,
/// and [`Error::MalformedReport`] if the reply doesn't parse.
pub fn cursor_position(src: &mut impl ByteSource, out: &mut impl Write) -> Result<Size> {
    ansi::request_cursor_position(out)
        .and_then(|()| out.flush())
        .map_err(|e| Error::os("write", e))?;

    let mut reply = [0u8; REPORT_CAPACITY];
    let mut len = 0;
    while len < REPORT_CAPACITY - 1 {
        match src.read_byte()? {
            Some(b) => {
                reply[len] = b;
                len += 1;
                if b == b'R' {
                    break;
                }
            }
            None => break,
        }
    }

    parse_cursor_report(&reply[..len])
}

// ─── Probe ──────────────────────────────────────────────────────────────────

/// Determine the viewport size, falling back to a cursor-position report.
///
/// # Errors
///
/// Fails if the fallback write fails or its reply is malformed. Callers
/// treat this as fatal.
pub fn window_size(src: &mut impl ByteSource, out: &mut impl Write) -> Result<Size> {
    probe(ioctl_size(), src, out)
}

/// [`window_size`] with the ioctl answer supplied by the caller.
///
/// # Errors
///
/// Same as [`window_size`].
pub fn probe(
    primary: Option<Size>,
    src: &mut impl ByteSource,
    out: &mut impl Write,
) -> Result<Size> {
    if let Some(size) = primary {
        tracing::debug!(rows = size.rows, cols = size.cols, "window size from ioctl");
        return Ok(size);
    }

    tracing::debug!("ioctl size unavailable, probing with cursor position report");
    ansi::cursor_forward(out, FAR_CORNER)
        .and_then(|()| ansi::cursor_down(out, FAR_CORNER))
        .map_err(|e| Error::os("write", e))?;

    let size = cursor_position(src, out)?;
    tracing::debug!(rows = size.rows, cols = size.cols, "window size from cursor report");
    Ok(size)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Scripted;
    use pretty_assertions::assert_eq;
    use std::io;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(5))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // ── Size ──────────────────────────────────────────────────────────

    #[test]
    fn size_rejects_zero() {
        assert_eq!(Size::new(0, 80), None);
        assert_eq!(Size::new(24, 0), None);
        assert_eq!(Size::new(24, 80), Some(Size { rows: 24, cols: 80 }));
    }

    #[test]
    fn ioctl_size_does_not_panic() {
        let _ = ioctl_size();
    }

    // ── Report parsing ────────────────────────────────────────────────

    #[test]
    fn parses_standard_reply() {
        assert_eq!(
            parse_cursor_report(b"\x1b[24;80R").unwrap(),
            Size { rows: 24, cols: 80 }
        );
    }

    #[test]
    fn parses_reply_without_terminator() {
        assert_eq!(
            parse_cursor_report(b"\x1b[50;132").unwrap(),
            Size { rows: 50, cols: 132 }
        );
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(matches!(
            parse_cursor_report(b"24;80R"),
            Err(Error::MalformedReport(_))
        ));
        assert!(parse_cursor_report(b"[24;80R").is_err());
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert!(parse_cursor_report(b"\x1b[;80R").is_err());
        assert!(parse_cursor_report(b"\x1b[24;R").is_err());
        assert!(parse_cursor_report(b"\x1b[24R").is_err());
        assert!(parse_cursor_report(b"\x1b[2x;80R").is_err());
        assert!(parse_cursor_report(b"\x1b[-1;80R").is_err());
    }

    #[test]
    fn rejects_zero_and_overflow() {
        assert!(parse_cursor_report(b"\x1b[0;80R").is_err());
        assert!(parse_cursor_report(b"\x1b[24;70000R").is_err());
    }

    #[test]
    fn malformed_message_is_escaped() {
        let err = parse_cursor_report(b"24;80R").unwrap_err();
        assert!(err.to_string().contains("24;80R"));
    }

    // ── Cursor position query ─────────────────────────────────────────

    #[test]
    fn cursor_position_sends_request_and_stops_at_r() {
        let mut src = Scripted::bytes(b"\x1b[24;80Rx");
        let mut out = Vec::new();
        let size = cursor_position(&mut src, &mut out).unwrap();
        assert_eq!(size, Size { rows: 24, cols: 80 });
        assert_eq!(out, b"\x1b[6n");
        assert_eq!(src.remaining(), 1, "bytes after R stay unread");
    }

    #[test]
    fn cursor_position_stops_on_empty_read() {
        let mut src = Scripted::bytes(b"\x1b[24;80").then_timeout();
        let size = cursor_position(&mut src, &mut Vec::new()).unwrap();
        assert_eq!(size, Size { rows: 24, cols: 80 });
    }

    #[test]
    fn cursor_position_reads_at_most_31_bytes() {
        let junk = [b'9'; 40];
        let mut src = Scripted::bytes(&junk);
        assert!(cursor_position(&mut src, &mut Vec::new()).is_err());
        assert_eq!(src.consumed(), 31);
    }

    #[test]
    fn cursor_position_write_failure() {
        let mut src = Scripted::bytes(b"\x1b[24;80R");
        let err = cursor_position(&mut src, &mut FailingSink).unwrap_err();
        assert_eq!(err.op(), "write");
        assert_eq!(src.consumed(), 0);
    }

    // ── Probe ─────────────────────────────────────────────────────────

    #[test]
    fn probe_prefers_ioctl() {
        let mut src = Scripted::default();
        let mut out = Vec::new();
        let size = probe(Size::new(30, 100), &mut src, &mut out).unwrap();
        assert_eq!(size, Size { rows: 30, cols: 100 });
        assert!(out.is_empty());
    }

    #[test]
    fn probe_falls_back_to_report() {
        let mut src = Scripted::bytes(b"\x1b[24;80R");
        let mut out = Vec::new();
        let size = probe(None, &mut src, &mut out).unwrap();
        assert_eq!(size, Size { rows: 24, cols: 80 });
        assert_eq!(out, b"\x1b[999C\x1b[999B\x1b[6n");
    }

    #[test]
    fn probe_fallback_malformed_reply() {
        let mut src = Scripted::bytes(b"garbage").then_timeout();
        assert!(matches!(
            probe(None, &mut src, &mut Vec::new()),
            Err(Error::MalformedReport(_))
        ));
    }

    #[test]
    fn probe_fallback_write_failure() {
        let err = probe(None, &mut Scripted::default(), &mut FailingSink).unwrap_err();
        assert_eq!(err.op(), "write");
    }
}
