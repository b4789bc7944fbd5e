//! # epsilon-editor — Editor core for epsilon
//!
//! - **[`cursor`]** — `Cursor` (x, y), 0-indexed, signed, unclamped movement
//! - **[`editor`]** — `Editor` state machine: keys in, cursor moves or quit out
//! - **[`options`]** — welcome banner and its placement
//! - **[`view`]** — composes a full frame into an `AppendBuffer`
//!
//! There is no text buffer yet: every row is a `~` marker, with the
//! welcome banner floating a third of the way down.

pub mod cursor;
pub mod editor;
pub mod options;
pub mod view;
