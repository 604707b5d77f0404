//! Editing operations at the cursor
//!
//! Each operation mutates the document through its row helpers (so derived
//! state is refreshed and the dirty counter bumped) and then moves the
//! cursor to where the user expects it.

use crate::model::cursor::Cursor;
use crate::model::document::Document;

impl Document {
    /// Insert `ch` at the cursor and advance past it.
    ///
    /// On the line after the last row an empty row is appended first.
    pub fn insert_char(&mut self, cursor: &mut Cursor, ch: u8) {
        if cursor.row == self.row_count() {
            self.insert_row(self.row_count(), Vec::new());
        }
        if cursor.row >= self.row_count() {
            return;
        }
        self.row_insert_char(cursor.row, cursor.column, ch);
        cursor.column += 1;
    }

    /// Break the line at the cursor and move to the start of the new line.
    pub fn insert_newline(&mut self, cursor: &mut Cursor) {
        if cursor.row > self.row_count() {
            return;
        }
        if cursor.column == 0 {
            self.insert_row(cursor.row, Vec::new());
        } else {
            let tail = self.row_split_off(cursor.row, cursor.column);
            self.insert_row(cursor.row + 1, tail);
        }
        cursor.row += 1;
        cursor.column = 0;
    }

    /// Delete the byte before the cursor, joining with the previous line at
    /// column 0. Does nothing at the very start or past the end.
    pub fn delete_char(&mut self, cursor: &mut Cursor) {
        if cursor.row >= self.row_count() || (cursor.row == 0 && cursor.column == 0) {
            return;
        }
        if cursor.column > 0 {
            self.row_delete_char(cursor.row, cursor.column - 1);
            cursor.column -= 1;
        } else {
            let prev = cursor.row - 1;
            let join_at = self.row(prev).map_or(0, |r| r.len());
            if let Some(removed) = self.delete_row(cursor.row) {
                self.row_append(prev, removed.content());
            }
            cursor.row = prev;
            cursor.column = join_at;
        }
    }
}
