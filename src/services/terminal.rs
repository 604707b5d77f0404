//! Terminal driver: raw byte input, size queries and frame output

use std::io;
use std::os::fd::AsFd;
use std::time::Duration;

use anyhow::{bail, Context, Result as AnyhowResult};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::unistd;

use crate::input::decoder::{ByteSource, ESC};

/// Longest cursor position report accepted from the terminal
const MAX_REPORT_LEN: usize = 32;

/// How long to wait for each byte of a cursor position report
const REPORT_TIMEOUT: Duration = Duration::from_millis(500);

/// The controlling terminal on stdin/stdout
#[derive(Debug)]
pub struct StdTerminal {
    input: io::Stdin,
    output: io::Stdout,
}

impl StdTerminal {
    pub fn new() -> Self {
        Self {
            input: io::stdin(),
            output: io::stdout(),
        }
    }

    /// Write one complete frame straight to the stdout descriptor.
    ///
    /// Bypasses the line-buffered `Stdout` so a frame is never split at
    /// its newlines.
    pub fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        write_frame_to(self.output.as_fd(), frame)
    }

    /// Terminal size as `(rows, cols)` from the window size ioctl.
    pub fn query_size(&self) -> io::Result<(u16, u16)> {
        let (cols, rows) = crossterm::terminal::size()?;
        if cols == 0 {
            return Err(io::Error::other("terminal reported zero columns"));
        }
        Ok((rows, cols))
    }

    /// Terminal size as `(rows, cols)`, falling back to measuring with the
    /// cursor when the ioctl is unavailable.
    ///
    /// The fallback moves the cursor as far right and down as the terminal
    /// allows and asks for its position. Must be called in raw mode.
    pub fn query_size_with_fallback(&mut self) -> AnyhowResult<(u16, u16)> {
        match self.query_size() {
            Ok(size) => Ok(size),
            Err(err) => {
                tracing::warn!("Window size query failed ({}), measuring with cursor", err);
                self.write_frame(b"\x1b[999C\x1b[999B")
                    .context("Failed to move cursor for size measurement")?;
                self.cursor_position()
            }
        }
    }

    fn cursor_position(&mut self) -> AnyhowResult<(u16, u16)> {
        self.write_frame(b"\x1b[6n")
            .context("Failed to request cursor position")?;
        let mut report = Vec::with_capacity(MAX_REPORT_LEN);
        while report.len() < MAX_REPORT_LEN - 1 {
            match self.read_byte(REPORT_TIMEOUT)? {
                Some(b'R') | None => break,
                Some(byte) => report.push(byte),
            }
        }
        match parse_cursor_report(&report) {
            Some(size) => Ok(size),
            None => bail!("Unrecognised cursor position report {:?}", report),
        }
    }
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for StdTerminal {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        let input = self.input.as_fd();
        let mut poll_fds = [PollFd::new(input, PollFlags::POLLIN)];

        // Clamp to u16::MAX milliseconds (about 65 seconds)
        let timeout_ms = timeout.as_millis().min(u16::MAX as u128) as u16;
        match poll(&mut poll_fds, PollTimeout::from(timeout_ms)) {
            Ok(0) | Err(Errno::EINTR) => return Ok(None),
            Ok(_) => {}
            Err(errno) => return Err(errno.into()),
        }

        let mut byte = [0u8; 1];
        match unistd::read(input, &mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) | Err(Errno::EAGAIN) | Err(Errno::EINTR) => Ok(None),
            Err(errno) => Err(errno.into()),
        }
    }
}

/// Write `frame` to `fd`, issuing one `write(2)` unless the kernel accepts
/// only part of it.
pub fn write_frame_to<Fd: AsFd>(fd: Fd, frame: &[u8]) -> io::Result<()> {
    let mut rest = frame;
    while !rest.is_empty() {
        match unistd::write(&fd, rest) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => rest = &rest[n..],
            Err(Errno::EINTR) => {}
            Err(errno) => return Err(errno.into()),
        }
    }
    Ok(())
}

/// Parse a cursor position report `ESC [ rows ; cols` (the trailing `R`
/// may be present or already stripped) into `(rows, cols)`.
pub fn parse_cursor_report(report: &[u8]) -> Option<(u16, u16)> {
    let body = report.strip_prefix(&[ESC, b'['])?;
    let body = body.strip_suffix(b"R").unwrap_or(body);
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;
    Some((rows.trim().parse().ok()?, cols.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    use nix::sys::socket::{socketpair, AddressFamily, SockFlag, SockType};

    #[test]
    fn test_frame_is_one_write() {
        // Sequenced packets keep write boundaries, one message per write(2)
        let (writer, reader) = socketpair(
            AddressFamily::Unix,
            SockType::SeqPacket,
            None,
            SockFlag::empty(),
        )
        .unwrap();
        let frame = b"\x1b[?25l\x1b[Hrow one\r\nstatus\r\nmessage\x1b[1;1H\x1b[?25h";

        write_frame_to(&writer, frame).unwrap();
        drop(writer);

        let mut messages = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = unistd::read(&reader, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            messages.push(buf[..n].to_vec());
        }
        assert_eq!(messages, vec![frame.to_vec()]);
    }

    #[test]
    fn test_parse_cursor_report() {
        assert_eq!(parse_cursor_report(b"\x1b[24;80"), Some((24, 80)));
        assert_eq!(parse_cursor_report(b"\x1b[50;132R"), Some((50, 132)));
    }

    #[test]
    fn test_parse_cursor_report_rejects_garbage() {
        assert_eq!(parse_cursor_report(b""), None);
        assert_eq!(parse_cursor_report(b"24;80"), None);
        assert_eq!(parse_cursor_report(b"\x1b[24"), None);
        assert_eq!(parse_cursor_report(b"\x1b[a;b"), None);
        assert_eq!(parse_cursor_report(b"\x1b[99999;80"), None);
    }
}
