// SPDX-License-Identifier: MIT
//
// Terminal mode controller — raw mode in, cooked mode out, no matter what.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), isatty, and raw fd writes. These are the standard POSIX
// interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// `RawMode::enable` captures the current attributes, derives the raw set
// from them, and applies it. The returned guard restores the captured
// attributes when dropped, so every way out of the owning scope (normal
// return, `?`, quit) puts the terminal back the way it was found.
//
// A panic unwinds through the guard too, but the panic message would be
// printed into a raw-mode terminal before the guard runs. The panic hook
// therefore restores first: it clears the screen with a direct write to
// fd 1 (no stdout lock, so no deadlock mid-frame), reapplies the backed-up
// attributes, then hands off to the original hook.

#[cfg(unix)]
use std::os::fd::RawFd;
use std::sync::{Mutex, Once};

use crate::error::{Error, Result};

// ─── Raw Configuration ──────────────────────────────────────────────────────

/// Read-timeout semantics applied in raw mode.
///
/// With `min_bytes = 0` and `read_timeout_ds = 1` a `read()` returns after
/// at most 100ms even when no byte arrived. That is the polling quantum
/// the input decoder and the escape timeout are built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawConfig {
    /// `VTIME`: read timeout in deciseconds.
    pub read_timeout_ds: u8,
    /// `VMIN`: minimum bytes before `read()` returns.
    pub min_bytes: u8,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            read_timeout_ds: 1,
            min_bytes: 0,
        }
    }
}

/// Derive the raw attribute set from a captured one.
///
/// - 8-bit characters (`CS8`)
/// - input: no break-as-interrupt, CR→NL translation, parity checking,
///   8th-bit stripping, or XON/XOFF flow control
/// - local: no echo, canonical mode, extended input, or signal keys
/// - output: no post-processing (so `\n` is not turned into `\r\n`)
/// - `VMIN`/`VTIME` from `config`
#[cfg(unix)]
#[must_use]
pub fn make_raw(original: &libc::termios, config: RawConfig) -> libc::termios {
    let mut raw = *original;

    raw.c_cflag |= libc::CS8;
    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cc[libc::VMIN] = config.min_bytes;
    raw.c_cc[libc::VTIME] = config.read_timeout_ds;

    raw
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Read the current attributes of the terminal on `fd`.
///
/// # Errors
///
/// Returns [`Error::Os`] tagged `tcgetattr` on failure (e.g. not a TTY).
#[cfg(unix)]
pub fn get_attributes(fd: RawFd) -> Result<libc::termios> {
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &raw mut termios) } == -1 {
        return Err(Error::last_os("tcgetattr"));
    }
    Ok(termios)
}

/// Apply attributes to the terminal on `fd` after draining pending output.
///
/// # Errors
///
/// Returns [`Error::Os`] tagged `tcsetattr` on failure.
#[cfg(unix)]
pub fn set_attributes(fd: RawFd, termios: &libc::termios) -> Result<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, termios) } == -1 {
        return Err(Error::last_os("tcsetattr"));
    }
    Ok(())
}

/// Whether two attribute sets carry the same mode flags and control chars.
///
/// `libc::termios` has no `PartialEq` without libc's `extra_traits`, and
/// the speed fields are platform-specific, so this compares what raw mode
/// touches plus every control character.
#[cfg(unix)]
#[must_use]
pub fn same_attributes(a: &libc::termios, b: &libc::termios) -> bool {
    a.c_iflag == b.c_iflag
        && a.c_oflag == b.c_oflag
        && a.c_cflag == b.c_cflag
        && a.c_lflag == b.c_lflag
        && a.c_cc == b.c_cc
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Global backup of the captured attributes for the panic hook.
///
/// The [`RawMode`] guard owns its own copy, but the panic hook can't reach
/// it. Behind a [`Mutex`], not `static mut`.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<(RawFd, libc::termios)>> = Mutex::new(None);

#[cfg(not(unix))]
static TERMIOS_BACKUP: Mutex<Option<()>> = Mutex::new(None);

/// Clear screen + cursor home, written straight to fd 1 on panic.
const EMERGENCY_CLEAR: &[u8] = b"\x1b[2J\x1b[H";

/// Panic hook guard: install at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            original(info);
        }));
    });
}

/// Clear the screen and reapply the backed-up attributes. Best-effort.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_CLEAR.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_CLEAR.len(),
        );
    }

    #[cfg(unix)]
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some((fd, ref original)) = *guard {
            unsafe {
                let _ = libc::tcsetattr(fd, libc::TCSAFLUSH, original);
            }
        }
    }

    #[cfg(not(unix))]
    {
        use std::io::Write;
        let _ = std::io::stdout().write_all(EMERGENCY_CLEAR);
        let _ = std::io::stdout().flush();
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Scoped raw mode.
///
/// Holds the attributes captured before raw mode was applied and
/// restores them on [`restore`](Self::restore) or drop, whichever comes
/// first. Restoring twice is a no-op.
///
/// # Example
///
/// ```no_run
/// use epsilon_term::terminal::{RawConfig, RawMode};
///
/// let raw = RawMode::enable(RawConfig::default())?;
/// // ... read keys, render frames ...
/// drop(raw); // cooked mode again
/// # Ok::<(), epsilon_term::Error>(())
/// ```
pub struct RawMode {
    #[cfg(unix)]
    fd: RawFd,
    #[cfg(unix)]
    original: Option<libc::termios>,
    #[cfg(not(unix))]
    original: Option<()>,
}

impl RawMode {
    /// Capture the current attributes and switch stdin to raw mode.
    ///
    /// # Errors
    ///
    /// Fails with `tcgetattr` if the attributes can't be captured (stdin
    /// is not a terminal, for instance), or `tcsetattr` if the raw set
    /// can't be applied. In the latter case the captured attributes are
    /// reapplied before the error is returned.
    #[cfg(unix)]
    pub fn enable(config: RawConfig) -> Result<Self> {
        Self::enable_on(libc::STDIN_FILENO, config)
    }

    /// Like [`enable`](Self::enable), for the terminal on `fd`.
    ///
    /// # Errors
    ///
    /// Same as [`enable`](Self::enable).
    #[cfg(unix)]
    pub fn enable_on(fd: RawFd, config: RawConfig) -> Result<Self> {
        let original = get_attributes(fd)?;

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some((fd, original));
        }
        install_panic_hook();

        // From here on, dropping `mode` restores, even if tcsetattr fails.
        let mode = Self {
            fd,
            original: Some(original),
        };
        set_attributes(fd, &make_raw(&original, config))?;

        tracing::debug!(fd, ?config, "raw mode enabled");
        Ok(mode)
    }

    /// No termios off unix: only the panic hook is installed.
    ///
    /// # Errors
    ///
    /// Infallible here; returns `Result` to match the unix signature.
    #[cfg(not(unix))]
    pub fn enable(_config: RawConfig) -> Result<Self> {
        install_panic_hook();
        Ok(Self { original: Some(()) })
    }

    /// Whether the captured attributes are still waiting to be restored.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.original.is_some()
    }

    /// The attributes captured before raw mode, if not yet restored.
    #[cfg(unix)]
    #[must_use]
    pub const fn original(&self) -> Option<&libc::termios> {
        self.original.as_ref()
    }

    /// Reapply the captured attributes.
    ///
    /// Idempotent: after the first successful call this does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Os`] tagged `tcsetattr` if the restore fails. The
    /// snapshot is kept so a later call (or drop) can retry.
    pub fn restore(&mut self) -> Result<()> {
        #[cfg(unix)]
        if let Some(ref original) = self.original {
            set_attributes(self.fd, original)?;
        }

        self.original = None;
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
        tracing::debug!("raw mode disabled");
        Ok(())
    }
}

// libc only derives Debug for termios behind its `extra_traits` feature.
impl std::fmt::Debug for RawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawMode")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if self.is_active() {
            if let Err(e) = self.restore() {
                tracing::warn!(error = %e, "failed to restore terminal attributes");
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
