//! Incremental search
//!
//! A [`SearchSession`] lives for as long as the search prompt is open. It
//! owns the cursor saved when the search started and, while a match is
//! shown, a copy of the matched row's highlight array so the overlay can be
//! undone without re-deriving the row.

use crate::input::decoder::{Key, ENTER};
use crate::model::cursor::Cursor;
use crate::model::document::Document;
use crate::primitives::highlighter::HighlightClass;

/// Saved highlight of the row carrying the match overlay
#[derive(Debug, Clone)]
struct Overlay {
    row: usize,
    saved: Vec<HighlightClass>,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    /// Cursor and viewport when the search began
    saved_cursor: Cursor,
    last_match: Option<usize>,
    forward: bool,
    overlay: Option<Overlay>,
    /// Whether the most recent scan found anything
    found: bool,
}

impl SearchSession {
    pub fn begin(cursor: &Cursor) -> Self {
        Self {
            saved_cursor: *cursor,
            last_match: None,
            forward: true,
            overlay: None,
            found: false,
        }
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// React to one prompt key with the current `query`.
    ///
    /// Arrow right/down repeat forwards from the last match, arrow left/up
    /// search backwards; any other key restarts from the top. Enter and
    /// Escape only clear the overlay.
    pub fn update(&mut self, doc: &mut Document, cursor: &mut Cursor, query: &[u8], key: Key) {
        self.clear_overlay(doc);

        match key {
            Key::Byte(ENTER) | Key::Escape => {
                self.last_match = None;
                self.forward = true;
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.forward = true,
            Key::ArrowLeft | Key::ArrowUp => self.forward = false,
            _ => {
                self.last_match = None;
                self.forward = true;
            }
        }
        if self.last_match.is_none() {
            self.forward = true;
        }

        self.found = false;
        let count = doc.row_count();
        if query.is_empty() || count == 0 {
            return;
        }

        let mut current = self.last_match;
        for _ in 0..count {
            let next = match (current, self.forward) {
                (None, _) => 0,
                (Some(i), true) => (i + 1) % count,
                (Some(0), false) => count - 1,
                (Some(i), false) => i - 1,
            };
            current = Some(next);

            let Some(row) = doc.row_mut(next) else {
                continue;
            };
            let Some(pos) = find_bytes(row.render(), query) else {
                continue;
            };

            self.last_match = Some(next);
            self.found = true;
            cursor.row = next;
            cursor.column = row.display_to_column(pos);
            // Past the end so the next scroll puts the match at the top
            cursor.row_offset = count;

            self.overlay = Some(Overlay {
                row: next,
                saved: row.highlight().to_vec(),
            });
            row.overlay(pos, query.len(), HighlightClass::SearchMatch);
            tracing::debug!("Search match in row {} at display column {}", next, pos);
            break;
        }
    }

    /// Put back the cursor and viewport from before the search.
    pub fn cancel(mut self, doc: &mut Document, cursor: &mut Cursor) {
        self.clear_overlay(doc);
        *cursor = self.saved_cursor;
    }

    /// Keep the cursor at the match and drop the overlay.
    pub fn finish(mut self, doc: &mut Document) {
        self.clear_overlay(doc);
    }

    fn clear_overlay(&mut self, doc: &mut Document) {
        if let Some(overlay) = self.overlay.take() {
            if let Some(row) = doc.row_mut(overlay.row) {
                row.restore_highlight(overlay.saved);
            }
        }
    }
}

/// Position of the first occurrence of `needle` in `haystack`.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
