//! View — composes one full screen into an append buffer.
//!
//! A frame is, in order:
//!
//! ```text
//! ESC[?25l                 hide cursor while drawing
//! ESC[H                    home
//! row 0 .. rows-1          "~" or a centered banner line, then ESC[K,
//!                          "\r\n" between rows (not after the last)
//! ESC[<y+1>;<x+1>H         park the cursor at the editor position
//! ESC[?25h                 show cursor
//! ```
//!
//! Nothing here writes to the terminal. The caller flushes the buffer
//! with a single write once the frame is complete.

use std::io::{self, Write};

use epsilon_term::ansi;
use epsilon_term::geometry::Size;
use epsilon_term::output::AppendBuffer;
use epsilon_term::{Error, Result};

use crate::cursor::Cursor;
use crate::options::Options;

/// The marker drawn at the start of every row without content.
const ROW_MARKER: &[u8] = b"~";

/// Separator between rows. Raw mode disables `\n` → `\r\n` translation.
const ROW_SEPARATOR: &[u8] = b"\r\n";

/// Compose a complete frame for `size` with the cursor at `cursor`.
///
/// # Errors
///
/// Returns [`Error::OutOfMemory`] if the frame buffer cannot grow.
pub fn render(
    frame: &mut AppendBuffer,
    cursor: Cursor,
    size: Size,
    options: &Options,
) -> Result<()> {
    // AppendBuffer's writer only fails when it can't grow.
    compose(frame, cursor, size, options).map_err(|_| Error::OutOfMemory)
}

fn compose(w: &mut impl Write, cursor: Cursor, size: Size, options: &Options) -> io::Result<()> {
    ansi::cursor_hide(w)?;
    ansi::cursor_home(w)?;
    draw_rows(w, size, options)?;
    ansi::cursor_to(w, cursor.x, cursor.y)?;
    ansi::cursor_show(w)
}

/// Draw every row: markers, the banner, line erases, and separators.
///
/// # Errors
///
/// Propagates writer errors.
pub fn draw_rows(w: &mut impl Write, size: Size, options: &Options) -> io::Result<()> {
    for row in 0..size.rows {
        match options.banner_line(row, size.rows) {
            Some(line) => draw_banner_line(w, line, size.cols)?,
            None => w.write_all(ROW_MARKER)?,
        }
        ansi::erase_line(w)?;
        if row + 1 < size.rows {
            w.write_all(ROW_SEPARATOR)?;
        }
    }
    Ok(())
}

/// Left padding that centers a line of `len` columns in `cols`.
///
/// `len` is clamped to `cols` first, matching the truncation applied
/// when drawing.
#[must_use]
pub fn banner_padding(len: usize, cols: usize) -> usize {
    (cols - len.min(cols)) / 2
}

/// Draw one banner line, truncated to `cols` characters and centered.
///
/// The first padding column carries the `~` marker, so the row still
/// reads as an empty line with text floating in the middle.
///
/// # Errors
///
/// Propagates writer errors.
pub fn draw_banner_line(w: &mut impl Write, line: &str, cols: u16) -> io::Result<()> {
    let cols = usize::from(cols);
    let end = line.char_indices().nth(cols).map_or(line.len(), |(i, _)| i);
    let text = &line[..end];

    let mut padding = banner_padding(text.chars().count(), cols);
    if padding > 0 {
        w.write_all(ROW_MARKER)?;
        padding -= 1;
    }
    write!(w, "{:padding$}", "")?;
    w.write_all(text.as_bytes())
}
