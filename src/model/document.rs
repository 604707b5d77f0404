//! The row store
//!
//! A [`Document`] exclusively owns its rows. Every structural change goes
//! through [`Document::insert_row`] / [`Document::delete_row`] (which keep
//! row indices equal to their positions) and every content change goes
//! through the `row_*` helpers, which re-derive the touched row and walk
//! forward while the block-comment state keeps changing.

use std::path::{Path, PathBuf};

use crate::model::filesystem::LoadedLine;
use crate::model::row::Row;
use crate::primitives::syntax::SyntaxProfile;

#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
    /// Mutations since the last successful save
    dirty: usize,
    filename: Option<PathBuf>,
    syntax: Option<&'static SyntaxProfile>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from loaded lines. The result is clean.
    pub fn from_lines(filename: Option<PathBuf>, lines: Vec<LoadedLine>) -> Self {
        let mut doc = Self::new();
        doc.set_filename(filename);
        for line in lines {
            doc.insert_row(doc.row_count(), line.bytes);
        }
        doc.dirty = 0;
        doc
    }

    /// Convenience constructor from text split on `\n`.
    pub fn from_text(filename: Option<PathBuf>, text: &str) -> Self {
        let lines = crate::model::filesystem::split_lines(text.as_bytes());
        Self::from_lines(filename, lines)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn dirty(&self) -> usize {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Called after the document has been written out.
    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn syntax(&self) -> Option<&'static SyntaxProfile> {
        self.syntax
    }

    /// Set the file name and re-select the syntax profile from it.
    pub fn set_filename(&mut self, filename: Option<PathBuf>) {
        self.filename = filename;
        let syntax = self.filename.as_deref().and_then(SyntaxProfile::for_path);
        self.set_syntax(syntax);
    }

    /// Switch profile and re-derive every row.
    pub fn set_syntax(&mut self, syntax: Option<&'static SyntaxProfile>) {
        self.syntax = syntax;
        tracing::info!(
            "Syntax profile: {}",
            syntax.map(|s| s.name).unwrap_or("none")
        );
        let mut prev_open = false;
        for row in &mut self.rows {
            row.derive(syntax, prev_open);
            prev_open = row.comment_open();
        }
    }

    /// Insert a row holding `content` at position `at`.
    ///
    /// Positions outside `0..=row_count` are ignored. Returns the index of
    /// the new row when it was inserted.
    pub fn insert_row(&mut self, at: usize, content: Vec<u8>) -> Option<usize> {
        if at > self.rows.len() {
            return None;
        }
        let mut row = Row::new(at, content);
        // Seed with the state the following row was derived against, so the
        // change check below is exact.
        row.set_comment_open(self.comment_open_before(at));
        self.rows.insert(at, row);
        self.renumber_from(at + 1);
        self.rederive_from(at);
        self.dirty += 1;
        Some(at)
    }

    /// Remove the row at `at`. Positions outside `0..row_count` are ignored.
    pub fn delete_row(&mut self, at: usize) -> Option<Row> {
        if at >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(at);
        self.renumber_from(at);
        if removed.comment_open() != self.comment_open_before(at) {
            self.rederive_from(at);
        }
        self.dirty += 1;
        Some(removed)
    }

    /// Insert `ch` into row `row` at logical column `at`. A column past the
    /// end appends.
    pub(crate) fn row_insert_char(&mut self, row: usize, at: usize, ch: u8) {
        let Some(target) = self.rows.get_mut(row) else {
            return;
        };
        let content = target.content_mut();
        let at = at.min(content.len());
        content.insert(at, ch);
        self.rederive_from(row);
        self.dirty += 1;
    }

    /// Delete the byte at logical column `at` of row `row`.
    pub(crate) fn row_delete_char(&mut self, row: usize, at: usize) {
        let Some(target) = self.rows.get_mut(row) else {
            return;
        };
        let content = target.content_mut();
        if at >= content.len() {
            return;
        }
        content.remove(at);
        self.rederive_from(row);
        self.dirty += 1;
    }

    /// Append `bytes` to the end of row `row`.
    pub(crate) fn row_append(&mut self, row: usize, bytes: &[u8]) {
        let Some(target) = self.rows.get_mut(row) else {
            return;
        };
        target.content_mut().extend_from_slice(bytes);
        self.rederive_from(row);
        self.dirty += 1;
    }

    /// Cut row `row` at column `at`, returning the removed tail.
    pub(crate) fn row_split_off(&mut self, row: usize, at: usize) -> Vec<u8> {
        let Some(target) = self.rows.get_mut(row) else {
            return Vec::new();
        };
        let content = target.content_mut();
        let tail = content.split_off(at.min(content.len()));
        self.rederive_from(row);
        self.dirty += 1;
        tail
    }

    pub(crate) fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }

    /// Serialise all rows, each followed by exactly one `\n`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut buf = Vec::with_capacity(len);
        for row in &self.rows {
            buf.extend_from_slice(row.content());
            buf.push(b'\n');
        }
        buf
    }

    fn comment_open_before(&self, at: usize) -> bool {
        at > 0 && self.rows.get(at - 1).is_some_and(|r| r.comment_open())
    }

    fn renumber_from(&mut self, from: usize) {
        for (index, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.set_index(index);
        }
    }

    /// Re-derive row `at`, then each following row for as long as the
    /// end-of-row comment state keeps changing. Each row is visited at most
    /// once, so the walk is bounded by the remaining row count.
    fn rederive_from(&mut self, mut at: usize) {
        while at < self.rows.len() {
            let prev_open = self.comment_open_before(at);
            let changed = self.rows[at].derive(self.syntax, prev_open);
            if !changed {
                break;
            }
            tracing::trace!("Comment state changed at row {}, propagating", at);
            at += 1;
        }
    }
}
