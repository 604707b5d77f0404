//! Cursor position and viewport arithmetic
//!
//! The cursor may sit one row past the last row of the document (the empty
//! "append" line). Moving down stops at the last row; only moving right off
//! the end of the last row or a page jump reaches the append line. Every
//! movement keeps the cursor within `0..=row_count` and within `0..=row_len`
//! of its row.

use crate::model::document::Document;

/// Logical cursor plus the scrolled window into the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Logical column (byte index into the row content)
    pub column: usize,
    pub row: usize,
    /// Display column into the rendered row, refreshed by [`Cursor::scroll`]
    pub display_column: usize,
    /// First document row shown on screen
    pub row_offset: usize,
    /// First display column shown on screen
    pub col_offset: usize,
}

/// A cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one movement, clamped to the document.
    ///
    /// `screen_rows` is the viewport height used by the page movements.
    pub fn apply(&mut self, movement: Movement, doc: &Document, screen_rows: usize) {
        match movement {
            Movement::Left => self.move_left(doc),
            Movement::Right => self.move_right(doc),
            Movement::Up => self.move_up(),
            Movement::Down => self.move_down(doc),
            Movement::Home => self.column = 0,
            Movement::End => {
                if let Some(row) = doc.row(self.row) {
                    self.column = row.len();
                }
            }
            Movement::PageUp => {
                self.row = self.row_offset;
                for _ in 0..screen_rows {
                    self.move_up();
                }
            }
            Movement::PageDown => {
                self.row = (self.row_offset + screen_rows)
                    .saturating_sub(1)
                    .min(doc.row_count());
                for _ in 0..screen_rows {
                    self.move_down(doc);
                }
            }
        }
        self.snap_to_row(doc);
    }

    fn move_left(&mut self, doc: &Document) {
        if self.column > 0 {
            self.column -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.column = doc.row(self.row).map_or(0, |r| r.len());
        }
    }

    fn move_right(&mut self, doc: &Document) {
        if let Some(row) = doc.row(self.row) {
            if self.column < row.len() {
                self.column += 1;
            } else {
                self.row += 1;
                self.column = 0;
            }
        }
    }

    fn move_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    fn move_down(&mut self, doc: &Document) {
        if self.row + 1 < doc.row_count() {
            self.row += 1;
        }
    }

    /// Clamp the column to the length of the row now under the cursor.
    pub fn snap_to_row(&mut self, doc: &Document) {
        self.row = self.row.min(doc.row_count());
        let len = doc.row(self.row).map_or(0, |r| r.len());
        self.column = self.column.min(len);
    }

    /// Refresh `display_column` and adjust the offsets minimally so the
    /// cursor is inside a `screen_rows` x `screen_cols` viewport.
    pub fn scroll(&mut self, doc: &Document, screen_rows: usize, screen_cols: usize) {
        self.display_column = doc
            .row(self.row)
            .map_or(0, |r| r.column_to_display(self.column));

        if self.row < self.row_offset {
            self.row_offset = self.row;
        }
        if screen_rows > 0 && self.row >= self.row_offset + screen_rows {
            self.row_offset = self.row + 1 - screen_rows;
        }
        if self.display_column < self.col_offset {
            self.col_offset = self.display_column;
        }
        if screen_cols > 0 && self.display_column >= self.col_offset + screen_cols {
            self.col_offset = self.display_column + 1 - screen_cols;
        }
    }
}
