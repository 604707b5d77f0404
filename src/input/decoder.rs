//! Raw terminal byte decoding
//!
//! The terminal delivers keys as bytes. Most keys are a single byte; the
//! navigation keys arrive as escape sequences:
//!
//! | Sequence              | Key          |
//! |-----------------------|--------------|
//! | `ESC [ A/B/C/D`       | arrows       |
//! | `ESC [ H`, `ESC O H`  | Home         |
//! | `ESC [ F`, `ESC O F`  | End          |
//! | `ESC [ 1~` / `7~`     | Home         |
//! | `ESC [ 4~` / `8~`     | End          |
//! | `ESC [ 3~`            | Delete       |
//! | `ESC [ 5~` / `6~`     | PageUp/Down  |
//!
//! Continuation bytes are awaited with a short timeout. A sequence that is
//! unknown or cut off by the timeout decodes to a literal [`Key::Escape`];
//! the bytes already consumed are dropped.

use std::io;
use std::time::Duration;

/// Escape byte
pub const ESC: u8 = 0x1b;

/// Byte sent by the Backspace key
pub const BACKSPACE: u8 = 127;

/// Byte sent by the Enter key in raw mode
pub const ENTER: u8 = b'\r';

/// The byte a terminal sends for Ctrl plus `k`.
pub const fn ctrl(k: u8) -> u8 {
    k & 0x1f
}

/// A logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Any single byte that is not the start of a recognised sequence
    Byte(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
    Escape,
}

/// A source of raw input bytes.
pub trait ByteSource {
    /// Wait up to `timeout` for one byte.
    ///
    /// `Ok(None)` means nothing arrived in time; it is not an error.
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Position inside an escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Seen ESC
    Escape,
    /// Seen ESC [
    Csi,
    /// Seen ESC [ <digit>
    CsiDigit(u8),
    /// Seen ESC O
    Ss3,
}

impl DecodeState {
    /// Advance on `byte`. `Ok` finishes with a key, `Err` continues.
    fn step(self, byte: u8) -> Result<Key, DecodeState> {
        match (self, byte) {
            (DecodeState::Escape, b'[') => Err(DecodeState::Csi),
            (DecodeState::Escape, b'O') => Err(DecodeState::Ss3),

            (DecodeState::Csi, b'0'..=b'9') => Err(DecodeState::CsiDigit(byte)),
            (DecodeState::Csi, b'A') => Ok(Key::ArrowUp),
            (DecodeState::Csi, b'B') => Ok(Key::ArrowDown),
            (DecodeState::Csi, b'C') => Ok(Key::ArrowRight),
            (DecodeState::Csi, b'D') => Ok(Key::ArrowLeft),
            (DecodeState::Csi, b'H') | (DecodeState::Ss3, b'H') => Ok(Key::Home),
            (DecodeState::Csi, b'F') | (DecodeState::Ss3, b'F') => Ok(Key::End),

            (DecodeState::CsiDigit(digit), b'~') => Ok(match digit {
                b'1' | b'7' => Key::Home,
                b'3' => Key::Delete,
                b'4' | b'8' => Key::End,
                b'5' => Key::PageUp,
                b'6' => Key::PageDown,
                _ => Key::Escape,
            }),

            _ => Ok(Key::Escape),
        }
    }
}

/// Turns raw bytes into [`Key`]s
#[derive(Debug, Clone, Copy)]
pub struct KeyDecoder {
    /// Wait for the first byte of a key
    poll_timeout: Duration,
    /// Wait for each continuation byte of an escape sequence
    escape_timeout: Duration,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_millis(100))
    }
}

impl KeyDecoder {
    pub fn new(poll_timeout: Duration, escape_timeout: Duration) -> Self {
        Self {
            poll_timeout,
            escape_timeout,
        }
    }

    /// Decode the next key, or `Ok(None)` if no byte arrived within the poll
    /// timeout.
    pub fn next_key<S: ByteSource + ?Sized>(&self, source: &mut S) -> io::Result<Option<Key>> {
        let Some(first) = source.read_byte(self.poll_timeout)? else {
            return Ok(None);
        };
        if first != ESC {
            return Ok(Some(Key::Byte(first)));
        }

        let mut state = DecodeState::Escape;
        loop {
            let Some(byte) = source.read_byte(self.escape_timeout)? else {
                tracing::trace!("Escape sequence timed out in {:?}", state);
                return Ok(Some(Key::Escape));
            };
            match state.step(byte) {
                Ok(key) => return Ok(Some(key)),
                Err(next) => state = next,
            }
        }
    }
}

/// Scripted byte source for tests.
///
/// Bytes are handed out in order; `None` entries simulate a poll timeout.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: std::collections::VecDeque<Option<u8>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut source = Self::new();
        source.push_bytes(bytes);
        source
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.script.extend(bytes.iter().copied().map(Some));
    }

    /// Queue a simulated timeout.
    pub fn push_timeout(&mut self) {
        self.script.push_back(None);
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
        Ok(self.script.pop_front().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut source = ScriptedSource::from_bytes(bytes);
        let decoder = KeyDecoder::default();
        let mut keys = Vec::new();
        while !source.is_empty() {
            if let Some(key) = decoder.next_key(&mut source).unwrap() {
                keys.push(key);
            }
        }
        keys
    }

    #[test]
    fn test_plain_bytes() {
        assert_eq!(
            decode_all(b"a\r\x7f"),
            vec![Key::Byte(b'a'), Key::Byte(ENTER), Key::Byte(BACKSPACE)]
        );
        assert_eq!(decode_all(&[ctrl(b'q')]), vec![Key::Byte(17)]);
    }

    #[test]
    fn test_arrow_sequences() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![Key::ArrowUp, Key::ArrowDown, Key::ArrowRight, Key::ArrowLeft]
        );
    }

    #[test]
    fn test_home_end_variants() {
        assert_eq!(
            decode_all(b"\x1b[H\x1bOH\x1b[1~\x1b[7~"),
            vec![Key::Home; 4]
        );
        assert_eq!(
            decode_all(b"\x1b[F\x1bOF\x1b[4~\x1b[8~"),
            vec![Key::End; 4]
        );
    }

    #[test]
    fn test_numbered_sequences() {
        assert_eq!(
            decode_all(b"\x1b[3~\x1b[5~\x1b[6~"),
            vec![Key::Delete, Key::PageUp, Key::PageDown]
        );
        // Unknown digit
        assert_eq!(decode_all(b"\x1b[2~"), vec![Key::Escape]);
        // Digit not followed by '~'
        assert_eq!(decode_all(b"\x1b[5x"), vec![Key::Escape]);
    }

    #[test]
    fn test_lone_escape_times_out() {
        let mut source = ScriptedSource::from_bytes(b"\x1b");
        source.push_timeout();
        source.push_bytes(b"x");
        let decoder = KeyDecoder::default();
        assert_eq!(decoder.next_key(&mut source).unwrap(), Some(Key::Escape));
        assert_eq!(decoder.next_key(&mut source).unwrap(), Some(Key::Byte(b'x')));
    }

    #[test]
    fn test_truncated_sequence_is_escape() {
        let mut source = ScriptedSource::from_bytes(b"\x1b[");
        source.push_timeout();
        let decoder = KeyDecoder::default();
        assert_eq!(decoder.next_key(&mut source).unwrap(), Some(Key::Escape));
    }

    #[test]
    fn test_unknown_sequence_is_escape() {
        assert_eq!(decode_all(b"\x1bx"), vec![Key::Escape]);
        assert_eq!(decode_all(b"\x1b[Z"), vec![Key::Escape]);
        assert_eq!(decode_all(b"\x1bOA"), vec![Key::Escape]);
    }

    #[test]
    fn test_no_byte_is_not_an_error() {
        let mut source = ScriptedSource::new();
        source.push_timeout();
        let decoder = KeyDecoder::default();
        assert_eq!(decoder.next_key(&mut source).unwrap(), None);
        // Exhausted source also reports no key
        assert_eq!(decoder.next_key(&mut source).unwrap(), None);
    }
}
