// SPDX-License-Identifier: MIT
//
// Error type for the terminal layer.
//
// Two families of failure exist at this level. OS-boundary failures carry
// the name of the syscall that failed plus the underlying `io::Error`, so
// the fatal path can report both. Protocol failures (a cursor-position
// reply that doesn't parse) carry the offending bytes, escaped.

use std::io;

/// Errors produced by the terminal layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A syscall at the OS boundary failed (`tcgetattr`, `read`, `ioctl`, ...).
    #[error("{op}: {source}")]
    Os {
        /// The operation that failed, used as the diagnostic prefix.
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// The terminal's reply to a cursor-position request was not of the
    /// form `ESC [ rows ; cols R`. Holds the reply already escaped.
    #[error("malformed cursor position report: \"{0}\"")]
    MalformedReport(String),

    /// The frame buffer could not grow to hold another append.
    #[error("frame buffer allocation failed")]
    OutOfMemory,
}

impl Error {
    /// Wrap an `io::Error` with the name of the failing operation.
    #[must_use]
    pub const fn os(op: &'static str, source: io::Error) -> Self {
        Self::Os { op, source }
    }

    /// Capture `errno` for the operation that just failed.
    #[must_use]
    pub fn last_os(op: &'static str) -> Self {
        Self::os(op, io::Error::last_os_error())
    }

    /// The raw OS error number, when this error came from the OS.
    #[must_use]
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::Os { source, .. } => source.raw_os_error(),
            Self::MalformedReport(_) | Self::OutOfMemory => None,
        }
    }

    /// Short label for the fatal-path diagnostic.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Os { op, .. } => *op,
            Self::MalformedReport(_) => "window size",
            Self::OutOfMemory => "append",
        }
    }
}

/// Terminal-layer result alias.
pub type Result<T> = std::result::Result<T, Error>;
