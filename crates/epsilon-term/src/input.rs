// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into logical key events. Plain bytes map straight
// to `Printable` or `Control`. An ESC byte starts a small escape-sequence
// automaton:
//
//   Start ──ESC──▶ SawEscape ──[──▶ SawBracket ──A/B/C/D/H/F──▶ key
//                      │                 │
//                      │                 └──digit──▶ SawDigit ──~──▶ key
//                      ├──O──▶ SawSs3 ──H/F──▶ key
//                      └──other──▶ SawOther ──any──▶ Escape
//
// Any empty read after ESC resolves to a bare Escape key. Sequences we
// don't recognize are absorbed and also reported as Escape, so stray
// reply bytes never leak into the editor as printable input.
//
// Ctrl+letter needs no special case: the terminal sends the letter with
// bits 5-7 cleared, which is a C0 control byte. See [`ctrl_key`].

use crate::error::Result;
use crate::reader::ByteSource;

/// The escape byte (0x1B).
pub const ESC: u8 = 0x1B;

/// The byte a terminal sends for Ctrl+`k`: the key with bits 5-7 cleared.
#[inline]
#[must_use]
pub const fn ctrl_key(k: u8) -> u8 {
    k & 0x1F
}

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// A non-control byte (ASCII printable or a high byte of UTF-8).
    Printable(u8),
    /// A C0 control byte or DEL. Ctrl+letter arrives here.
    Control(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    /// A lone ESC, or an unrecognized escape sequence.
    Escape,
}

impl KeyEvent {
    /// Classify a single non-escape byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00..=0x1F | 0x7F => Self::Control(byte),
            _ => Self::Printable(byte),
        }
    }

    /// Whether this is Ctrl+`letter`.
    #[inline]
    #[must_use]
    pub const fn is_ctrl(self, letter: u8) -> bool {
        matches!(self, Self::Control(b) if b == ctrl_key(letter))
    }
}

// ─── Automaton ──────────────────────────────────────────────────────────────

/// Decoder state between reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for the first byte of a key.
    Start,
    /// Read ESC.
    SawEscape,
    /// Read `ESC [`.
    SawBracket,
    /// Read `ESC [ <digit>`, waiting for `~`.
    SawDigit(u8),
    /// Read `ESC O`.
    SawSs3,
    /// Read ESC plus an unknown byte. One more byte is swallowed.
    SawOther,
}

/// Outcome of feeding one read result to the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next(State),
    Emit(KeyEvent),
}

impl State {
    /// Feed one read result (`None` = the read quantum expired empty).
    const fn advance(self, byte: Option<u8>) -> Step {
        use KeyEvent as K;

        match (self, byte) {
            (Self::Start, None) => Step::Next(Self::Start),
            (Self::Start, Some(ESC)) => Step::Next(Self::SawEscape),
            (Self::Start, Some(b)) => Step::Emit(K::from_byte(b)),

            (_, None) => Step::Emit(K::Escape),

            (Self::SawEscape, Some(b'[')) => Step::Next(Self::SawBracket),
            (Self::SawEscape, Some(b'O')) => Step::Next(Self::SawSs3),
            (Self::SawEscape, Some(_)) => Step::Next(Self::SawOther),

            (Self::SawBracket, Some(b @ b'0'..=b'9')) => Step::Next(Self::SawDigit(b)),
            (Self::SawBracket, Some(b'A')) => Step::Emit(K::ArrowUp),
            (Self::SawBracket, Some(b'B')) => Step::Emit(K::ArrowDown),
            (Self::SawBracket, Some(b'C')) => Step::Emit(K::ArrowRight),
            (Self::SawBracket, Some(b'D')) => Step::Emit(K::ArrowLeft),
            (Self::SawBracket | Self::SawSs3, Some(b'H')) => Step::Emit(K::Home),
            (Self::SawBracket | Self::SawSs3, Some(b'F')) => Step::Emit(K::End),

            (Self::SawDigit(d), Some(b'~')) => Step::Emit(match d {
                b'1' | b'7' => K::Home,
                b'4' | b'8' => K::End,
                b'3' => K::Delete,
                b'5' => K::PageUp,
                b'6' => K::PageDown,
                _ => K::Escape,
            }),

            (Self::SawBracket | Self::SawDigit(_) | Self::SawSs3 | Self::SawOther, Some(_)) => {
                Step::Emit(K::Escape)
            }
        }
    }
}

/// Block until one key is available and decode it.
///
/// Loops over timeout-bounded reads until the first byte arrives, then
/// runs the escape automaton over follow-up bytes. An empty read in the
/// middle of a sequence ends it as a bare [`KeyEvent::Escape`].
///
/// # Errors
///
/// Propagates any read failure other than "no data yet".
pub fn read_key(src: &mut impl ByteSource) -> Result<KeyEvent> {
    let mut state = State::Start;
    loop {
        let byte = src.read_byte()?;
        match state.advance(byte) {
            Step::Next(next) => state = next,
            Step::Emit(key) => {
                tracing::trace!(?key, "key");
                return Ok(key);
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Scripted;
    use pretty_assertions::assert_eq;

    /// Decode one key, returning it and the number of bytes consumed.
    fn decode(src: &mut Scripted) -> (KeyEvent, usize) {
        let before = src.consumed();
        let key = read_key(src).unwrap();
        (key, src.consumed() - before)
    }

    fn decode_bytes(bytes: &[u8]) -> (KeyEvent, usize) {
        // A trailing timeout so lone prefixes resolve instead of erroring.
        decode(&mut Scripted::bytes(bytes).then_timeout())
    }

    // ── Plain bytes ─────────────────────────────────────────────────

    #[test]
    fn printable_ascii() {
        assert_eq!(decode_bytes(b"a"), (KeyEvent::Printable(b'a'), 1));
        assert_eq!(decode_bytes(b"~"), (KeyEvent::Printable(b'~'), 1));
        assert_eq!(decode_bytes(b" "), (KeyEvent::Printable(b' '), 1));
    }

    #[test]
    fn high_bytes_are_printable() {
        assert_eq!(decode_bytes(&[0xC3]), (KeyEvent::Printable(0xC3), 1));
    }

    #[test]
    fn ctrl_q_is_control_0x11() {
        assert_eq!(ctrl_key(b'q'), 0x11);
        let (key, n) = decode_bytes(&[ctrl_key(b'q')]);
        assert_eq!(key, KeyEvent::Control(0x11));
        assert_eq!(n, 1);
        assert!(key.is_ctrl(b'q'));
    }

    #[test]
    fn del_and_nul_are_control() {
        assert_eq!(decode_bytes(&[0x7F]).0, KeyEvent::Control(0x7F));
        assert_eq!(decode_bytes(&[0x00]).0, KeyEvent::Control(0x00));
        assert_eq!(decode_bytes(b"\r").0, KeyEvent::Control(b'\r'));
    }

    #[test]
    fn is_ctrl_rejects_other_letters() {
        assert!(!KeyEvent::Control(0x11).is_ctrl(b'a'));
        assert!(!KeyEvent::Printable(b'q').is_ctrl(b'q'));
    }

    #[test]
    fn waits_through_empty_reads() {
        let mut src = Scripted::bytes(&[]).then_timeout().then_timeout().then_bytes(b"x");
        assert_eq!(decode(&mut src), (KeyEvent::Printable(b'x'), 1));
    }

    // ── Arrows ──────────────────────────────────────────────────────

    #[test]
    fn arrow_up_consumes_three_bytes() {
        let mut src = Scripted::bytes(b"\x1b[Ax");
        assert_eq!(decode(&mut src), (KeyEvent::ArrowUp, 3));
        assert_eq!(decode(&mut src), (KeyEvent::Printable(b'x'), 1));
    }

    #[test]
    fn all_arrows() {
        assert_eq!(decode_bytes(b"\x1b[A").0, KeyEvent::ArrowUp);
        assert_eq!(decode_bytes(b"\x1b[B").0, KeyEvent::ArrowDown);
        assert_eq!(decode_bytes(b"\x1b[C").0, KeyEvent::ArrowRight);
        assert_eq!(decode_bytes(b"\x1b[D").0, KeyEvent::ArrowLeft);
    }

    // ── Bare escape ─────────────────────────────────────────────────

    #[test]
    fn lone_escape() {
        assert_eq!(decode_bytes(b"\x1b"), (KeyEvent::Escape, 1));
    }

    #[test]
    fn escape_bracket_then_timeout() {
        assert_eq!(decode_bytes(b"\x1b["), (KeyEvent::Escape, 2));
    }

    #[test]
    fn unknown_csi_final_is_absorbed() {
        let mut src = Scripted::bytes(b"\x1b[Zq");
        assert_eq!(decode(&mut src), (KeyEvent::Escape, 3));
        assert_eq!(decode(&mut src), (KeyEvent::Printable(b'q'), 1));
    }

    #[test]
    fn escape_plus_other_swallows_two_bytes() {
        let mut src = Scripted::bytes(b"\x1bxyz");
        assert_eq!(decode(&mut src), (KeyEvent::Escape, 3));
        assert_eq!(decode(&mut src), (KeyEvent::Printable(b'z'), 1));
    }

    #[test]
    fn escape_plus_other_then_timeout() {
        assert_eq!(decode_bytes(b"\x1bx"), (KeyEvent::Escape, 2));
    }

    // ── Navigation keys ─────────────────────────────────────────────

    #[test]
    fn home_and_end_variants() {
        for seq in [&b"\x1b[H"[..], b"\x1bOH", b"\x1b[1~", b"\x1b[7~"] {
            assert_eq!(decode_bytes(seq).0, KeyEvent::Home, "{seq:?}");
        }
        for seq in [&b"\x1b[F"[..], b"\x1bOF", b"\x1b[4~", b"\x1b[8~"] {
            assert_eq!(decode_bytes(seq).0, KeyEvent::End, "{seq:?}");
        }
    }

    #[test]
    fn page_and_delete() {
        assert_eq!(decode_bytes(b"\x1b[5~"), (KeyEvent::PageUp, 4));
        assert_eq!(decode_bytes(b"\x1b[6~"), (KeyEvent::PageDown, 4));
        assert_eq!(decode_bytes(b"\x1b[3~"), (KeyEvent::Delete, 4));
    }

    #[test]
    fn unknown_tilde_code_is_escape() {
        assert_eq!(decode_bytes(b"\x1b[9~"), (KeyEvent::Escape, 4));
    }

    #[test]
    fn digit_without_tilde_is_escape() {
        assert_eq!(decode_bytes(b"\x1b[5x"), (KeyEvent::Escape, 4));
        assert_eq!(decode_bytes(b"\x1b[5"), (KeyEvent::Escape, 3));
    }

    #[test]
    fn ss3_unknown_is_escape() {
        assert_eq!(decode_bytes(b"\x1bOP"), (KeyEvent::Escape, 3));
    }

    // ── Errors ──────────────────────────────────────────────────────

    #[test]
    fn read_failure_propagates() {
        let mut src = Scripted::bytes(b"\x1b[");
        assert!(read_key(&mut src).is_err());
    }
}
