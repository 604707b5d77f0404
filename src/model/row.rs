use crate::primitives::display_width::{column_to_display, display_to_column, expand_tabs};
use crate::primitives::highlighter::{highlight_row, HighlightClass};
use crate::primitives::syntax::SyntaxProfile;

/// One line of the document together with its derived display state.
///
/// `render` and `highlight` are caches of `content`; they are only ever
/// rebuilt by [`Row::derive`], which the owning document calls after every
/// mutation of `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    index: usize,
    content: Vec<u8>,
    render: Vec<u8>,
    highlight: Vec<HighlightClass>,
    comment_open: bool,
}

impl Row {
    /// Create an underived row. Call [`Row::derive`] before reading caches.
    pub(crate) fn new(index: usize, content: Vec<u8>) -> Self {
        Self {
            index,
            content,
            ..Default::default()
        }
    }

    /// Position of this row within its document
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Tab-expanded display bytes
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn highlight(&self) -> &[HighlightClass] {
        &self.highlight
    }

    /// True if a block comment is still open at the end of this row
    pub fn comment_open(&self) -> bool {
        self.comment_open
    }

    /// Display column of logical column `column`.
    pub fn column_to_display(&self, column: usize) -> usize {
        column_to_display(&self.content, column)
    }

    /// Logical column covering display column `display`.
    pub fn display_to_column(&self, display: usize) -> usize {
        display_to_column(&self.content, display)
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn content_mut(&mut self) -> &mut Vec<u8> {
        &mut self.content
    }

    pub(crate) fn set_comment_open(&mut self, open: bool) {
        self.comment_open = open;
    }

    /// Rebuild `render` and `highlight` from `content`.
    ///
    /// `prev_comment_open` is the end-of-row state of the previous row.
    /// Returns true when this row's own `comment_open` changed, meaning the
    /// next row must be derived again.
    pub(crate) fn derive(
        &mut self,
        syntax: Option<&SyntaxProfile>,
        prev_comment_open: bool,
    ) -> bool {
        self.render = expand_tabs(&self.content);
        let hl = highlight_row(&self.render, syntax, prev_comment_open);
        self.highlight = hl.classes;
        let changed = self.comment_open != hl.comment_open;
        self.comment_open = hl.comment_open;
        changed
    }

    /// Overwrite part of the highlight array, clamped to the rendered length.
    pub(crate) fn overlay(&mut self, start: usize, len: usize, class: HighlightClass) {
        let end = start.saturating_add(len).min(self.highlight.len());
        if start < end {
            self.highlight[start..end].fill(class);
        }
    }

    /// Put back a highlight array saved with `highlight().to_vec()`.
    ///
    /// Ignored if the row has been re-derived to a different length since.
    pub(crate) fn restore_highlight(&mut self, saved: Vec<HighlightClass>) {
        if saved.len() == self.highlight.len() {
            self.highlight = saved;
        }
    }
}
