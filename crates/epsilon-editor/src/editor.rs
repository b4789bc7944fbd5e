//! Editor — the state machine between keypresses and frames.
//!
//! There is one live state: editing. Keys map to transitions:
//!
//! | Key                    | Effect                                    |
//! |------------------------|-------------------------------------------|
//! | Ctrl-Q                 | [`Action::Quit`]                          |
//! | Arrow keys             | move the cursor one cell (unclamped)      |
//! | Home / End             | column 0 / last column                    |
//! | Page Up / Page Down    | move a full screen of rows (unclamped)    |
//! | anything else          | nothing                                   |
//!
//! The editor owns its cursor, the viewport size it was created with, and
//! its options. It is handed to the event loop by `&mut`, never shared.

use epsilon_term::event_loop::{Action, App};
use epsilon_term::geometry::Size;
use epsilon_term::input::KeyEvent;
use epsilon_term::output::AppendBuffer;
use epsilon_term::Result;

use crate::cursor::{Cursor, Direction};
use crate::options::Options;
use crate::view;

/// Editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    cursor: Cursor,
    size: Size,
    options: Options,
}

impl Editor {
    /// Create an editor for a viewport of `size`, cursor at the origin.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self::with_options(size, Options::default())
    }

    /// Create an editor with explicit options.
    #[must_use]
    pub const fn with_options(size: Size, options: Options) -> Self {
        Self {
            cursor: Cursor::ORIGIN,
            size,
            options,
        }
    }

    /// Current cursor position.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Viewport size fixed at creation.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Display options.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Apply one key and report whether to keep going.
    pub fn process_key(&mut self, key: KeyEvent) -> Action {
        match key {
            k if k.is_ctrl(b'q') => return Action::Quit,
            KeyEvent::ArrowUp => self.cursor.step(Direction::Up),
            KeyEvent::ArrowDown => self.cursor.step(Direction::Down),
            KeyEvent::ArrowLeft => self.cursor.step(Direction::Left),
            KeyEvent::ArrowRight => self.cursor.step(Direction::Right),
            KeyEvent::Home => self.cursor.x = 0,
            KeyEvent::End => self.cursor.x = i32::from(self.size.cols) - 1,
            KeyEvent::PageUp => self.cursor.step_n(Direction::Up, i32::from(self.size.rows)),
            KeyEvent::PageDown => {
                self.cursor.step_n(Direction::Down, i32::from(self.size.rows));
            }
            KeyEvent::Printable(_) | KeyEvent::Control(_) | KeyEvent::Delete | KeyEvent::Escape => {}
        }
        Action::Continue
    }
}

impl App for Editor {
    fn paint(&mut self, frame: &mut AppendBuffer) -> Result<()> {
        view::render(frame, self.cursor, self.size, &self.options)
    }

    fn on_key(&mut self, key: KeyEvent) -> Action {
        let action = self.process_key(key);
        tracing::trace!(?key, x = self.cursor.x, y = self.cursor.y, ?action, "applied");
        action
    }
}
