//! Frame composition
//!
//! A frame is built into a single byte buffer: hide the cursor, home it,
//! draw every text row (clearing each line's tail), draw the status bar and
//! message line, place the cursor, show it. The caller writes the buffer to
//! the terminal in one go so no partial frame is ever visible.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::model::cursor::Cursor;
use crate::model::document::Document;
use crate::model::row::Row;
use crate::primitives::highlighter::HighlightClass;
use crate::view::status_bar::{render_message_bar, render_status_bar};

/// Colour of the `~` marking screen rows past the end of the document
const FILLER_COLOR: Color = Color::Blue;

/// Everything a frame is drawn from
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub doc: &'a Document,
    /// Already scrolled so the cursor is on screen
    pub cursor: &'a Cursor,
    /// Text rows, excluding the status and message lines
    pub screen_rows: usize,
    pub screen_cols: usize,
    pub message: Option<&'a str>,
}

/// Build the complete byte stream for one frame.
pub fn compose(ctx: &FrameContext<'_>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(ctx.screen_rows * (ctx.screen_cols + 16));
    queue!(buf, Hide, MoveTo(0, 0))?;

    for y in 0..ctx.screen_rows {
        match ctx.doc.row(y + ctx.cursor.row_offset) {
            Some(row) => draw_row(&mut buf, row, ctx.cursor.col_offset, ctx.screen_cols)?,
            None => {
                queue!(buf, SetForegroundColor(FILLER_COLOR))?;
                buf.write_all(b"~")?;
                queue!(buf, SetForegroundColor(Color::Reset))?;
            }
        }
        queue!(buf, Clear(ClearType::UntilNewLine))?;
        buf.write_all(b"\r\n")?;
    }

    render_status_bar(&mut buf, ctx.doc, ctx.cursor, ctx.screen_cols)?;
    render_message_bar(&mut buf, ctx.message, ctx.screen_cols)?;

    let x = ctx
        .cursor
        .display_column
        .saturating_sub(ctx.cursor.col_offset);
    let y = ctx.cursor.row.saturating_sub(ctx.cursor.row_offset);
    queue!(buf, MoveTo(to_u16(x), to_u16(y)), Show)?;
    Ok(buf)
}

/// Draw the visible slice of one row, switching colour only when it changes.
fn draw_row<W: Write>(out: &mut W, row: &Row, col_offset: usize, cols: usize) -> io::Result<()> {
    let render = row.render();
    let highlight = row.highlight();
    let start = col_offset.min(render.len());
    let end = (start + cols).min(render.len());

    let mut current: Option<Color> = None;
    for (&byte, &class) in render[start..end].iter().zip(&highlight[start..end]) {
        if byte.is_ascii_control() {
            let symbol = if byte <= 26 { b'@' + byte } else { b'?' };
            queue!(out, SetAttribute(Attribute::Reverse))?;
            out.write_all(&[symbol])?;
            queue!(out, SetAttribute(Attribute::Reset))?;
            if let Some(color) = current {
                queue!(out, SetForegroundColor(color))?;
            }
        } else if class == HighlightClass::Normal {
            if current.take().is_some() {
                queue!(out, SetForegroundColor(Color::Reset))?;
            }
            out.write_all(&[byte])?;
        } else {
            let color = class.color();
            if current != Some(color) {
                current = Some(color);
                queue!(out, SetForegroundColor(color))?;
            }
            out.write_all(&[byte])?;
        }
    }
    queue!(out, SetForegroundColor(Color::Reset))
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
