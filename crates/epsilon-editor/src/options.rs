//! Editor options.
//!
//! | Option               | Default                              |
//! |----------------------|--------------------------------------|
//! | `banner`             | three welcome lines (see [`Options::default`]) |
//! | `banner_row_divisor` | 3 (banner starts a third of the way down) |

/// Display options for the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Welcome lines, drawn centered on consecutive rows.
    pub banner: Vec<String>,
    /// The banner starts at row `rows / banner_row_divisor`.
    pub banner_row_divisor: u16,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            banner: vec![
                format!("Epsilon editor -- version {}", env!("CARGO_PKG_VERSION")),
                "Ctrl-Q quits".to_owned(),
                "Arrow keys move the cursor".to_owned(),
            ],
            banner_row_divisor: 3,
        }
    }
}

impl Options {
    /// First banner row for a viewport `rows` tall.
    ///
    /// A divisor of 0 is treated as 1.
    #[must_use]
    pub fn banner_row(&self, rows: u16) -> u16 {
        rows / self.banner_row_divisor.max(1)
    }

    /// The banner line to draw on `row`, if any.
    #[must_use]
    pub fn banner_line(&self, row: u16, rows: u16) -> Option<&str> {
        let offset = row.checked_sub(self.banner_row(rows))?;
        self.banner.get(usize::from(offset)).map(String::as_str)
    }
}
