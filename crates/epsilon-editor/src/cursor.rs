//! Cursor — a screen position that moves one cell at a time.
//!
//! Coordinates are 0-indexed and signed. Movement is deliberately
//! unclamped: moving left from column 0 gives column -1, and moving past
//! the viewport edge keeps counting. Bounds are the caller's concern.

/// A direction of single-cell movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Cursor position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Cursor {
    /// The top-left corner.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a cursor at `(x, y)`.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move one cell in `dir`.
    ///
    /// Saturates at the `i32` limits instead of wrapping; there is no
    /// other bound.
    pub const fn step(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.y = self.y.saturating_sub(1),
            Direction::Down => self.y = self.y.saturating_add(1),
            Direction::Left => self.x = self.x.saturating_sub(1),
            Direction::Right => self.x = self.x.saturating_add(1),
        }
    }

    /// Move `n` cells in `dir`.
    pub const fn step_n(&mut self, dir: Direction, n: i32) {
        match dir {
            Direction::Up => self.y = self.y.saturating_sub(n),
            Direction::Down => self.y = self.y.saturating_add(n),
            Direction::Left => self.x = self.x.saturating_sub(n),
            Direction::Right => self.x = self.x.saturating_add(n),
        }
    }
}
