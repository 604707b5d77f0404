//! Status bar and message line rendering

use std::io;
use std::time::{Duration, Instant};

use crossterm::queue;
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{Clear, ClearType};

use crate::model::cursor::Cursor;
use crate::model::document::Document;

/// Longest file name prefix shown in the status bar
const MAX_NAME_WIDTH: usize = 20;

/// A message on the message line, hidden once it is older than the timeout.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            set_at: now,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text if it is non-empty and younger than `timeout` at `now`.
    pub fn visible(&self, now: Instant, timeout: Duration) -> Option<&str> {
        let age = now.saturating_duration_since(self.set_at);
        (!self.text.is_empty() && age < timeout).then_some(self.text.as_str())
    }
}

/// Build the status line text padded or truncated to exactly `cols` cells
/// (shorter only when `cols` is smaller than the left part).
pub fn status_line(doc: &Document, cursor: &Cursor, cols: usize) -> String {
    let name = doc
        .filename()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "[No Name]".to_string());
    let name: String = name.chars().take(MAX_NAME_WIDTH).collect();
    let modified = if doc.is_dirty() { "(modified)" } else { "" };
    let left = format!("{} - {} lines {}", name, doc.row_count(), modified);
    let right = format!(
        "{} | {}/{}",
        doc.syntax().map(|s| s.name).unwrap_or("no ft"),
        cursor.row + 1,
        doc.row_count()
    );

    let mut line: String = left.chars().take(cols).collect();
    let mut len = line.chars().count();
    while len < cols {
        if cols - len == right.len() {
            line.push_str(&right);
            break;
        }
        line.push(' ');
        len += 1;
    }
    line
}

/// Queue the reverse-video status bar followed by a line break.
pub fn render_status_bar<W: io::Write>(
    out: &mut W,
    doc: &Document,
    cursor: &Cursor,
    cols: usize,
) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reverse))?;
    out.write_all(status_line(doc, cursor, cols).as_bytes())?;
    queue!(out, SetAttribute(Attribute::Reset))?;
    out.write_all(b"\r\n")
}

/// Queue the message line: cleared, then `message` cut to `cols` bytes.
pub fn render_message_bar<W: io::Write>(
    out: &mut W,
    message: Option<&str>,
    cols: usize,
) -> io::Result<()> {
    queue!(out, Clear(ClearType::UntilNewLine))?;
    if let Some(message) = message {
        let bytes = message.as_bytes();
        out.write_all(&bytes[..bytes.len().min(cols)])?;
    }
    Ok(())
}
