//! Syntax highlighting for rendered rows
//!
//! # Design
//! - **Per-row classification**: each row is classified in a single greedy
//!   left-to-right pass over its rendered bytes.
//! - **Block comment carry**: the only state crossing row boundaries is
//!   whether a block comment is still open at the end of the previous row.
//!   The caller owns propagating a change in that state to the next row.
//! - **Presentation only**: a [`HighlightClass`] maps to a fixed colour and
//!   never feeds back into buffer semantics.

use crate::primitives::syntax::SyntaxProfile;
use crossterm::style::Color;

/// Colour category attached to each rendered byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightClass {
    #[default]
    Normal,
    LineComment,
    BlockComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    SearchMatch,
}

impl HighlightClass {
    /// Foreground colour for this class. `Normal` uses the terminal default.
    pub fn color(self) -> Color {
        match self {
            HighlightClass::LineComment | HighlightClass::BlockComment => Color::DarkCyan,
            HighlightClass::Keyword1 => Color::DarkYellow,
            HighlightClass::Keyword2 => Color::DarkGreen,
            HighlightClass::String => Color::DarkMagenta,
            HighlightClass::Number => Color::DarkRed,
            HighlightClass::SearchMatch => Color::DarkBlue,
            HighlightClass::Normal => Color::Reset,
        }
    }
}

/// Bytes that delimit keywords and numbers.
pub fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'\x0b' || b == 0 || b",.()+-/*=~%<>[];".contains(&b)
}

/// Result of classifying one rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHighlight {
    pub classes: Vec<HighlightClass>,
    /// True if a block comment is still open at the end of the row
    pub comment_open: bool,
}

/// Classify every byte of `render`.
///
/// `comment_open` is the state inherited from the previous row. With no
/// profile every byte is `Normal` and the inherited state is dropped.
pub fn highlight_row(
    render: &[u8],
    syntax: Option<&SyntaxProfile>,
    comment_open: bool,
) -> RowHighlight {
    let mut classes = vec![HighlightClass::Normal; render.len()];
    let Some(syntax) = syntax else {
        return RowHighlight {
            classes,
            comment_open: false,
        };
    };

    let line_comment = syntax.line_comment.map(str::as_bytes).unwrap_or_default();
    let (block_start, block_end) = syntax
        .block_comment
        .map(|(start, end)| (start.as_bytes(), end.as_bytes()))
        .unwrap_or_default();
    let block_comments = !block_start.is_empty() && !block_end.is_empty();

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = comment_open && block_comments;
    let mut i = 0;

    while i < render.len() {
        let c = render[i];
        let rest = &render[i..];
        let prev_class = if i > 0 {
            classes[i - 1]
        } else {
            HighlightClass::Normal
        };

        if !line_comment.is_empty()
            && in_string.is_none()
            && !in_comment
            && rest.starts_with(line_comment)
        {
            classes[i..].fill(HighlightClass::LineComment);
            break;
        }

        if block_comments && in_string.is_none() {
            if in_comment {
                classes[i] = HighlightClass::BlockComment;
                if rest.starts_with(block_end) {
                    classes[i..i + block_end.len()].fill(HighlightClass::BlockComment);
                    i += block_end.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    i += 1;
                }
                continue;
            } else if rest.starts_with(block_start) {
                classes[i..i + block_start.len()].fill(HighlightClass::BlockComment);
                i += block_start.len();
                in_comment = true;
                continue;
            }
        }

        if syntax.highlight_strings {
            if let Some(quote) = in_string {
                classes[i] = HighlightClass::String;
                if c == b'\\' && i + 1 < render.len() {
                    classes[i + 1] = HighlightClass::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                classes[i] = HighlightClass::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlight_numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_class == HighlightClass::Number))
                || (c == b'.' && prev_class == HighlightClass::Number))
        {
            classes[i] = HighlightClass::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some((len, class)) = match_keyword(rest, syntax) {
                classes[i..i + len].fill(class);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    RowHighlight {
        classes,
        comment_open: in_comment,
    }
}

/// First keyword in list order that matches at the start of `rest` and is
/// followed by a separator (or the end of the row).
fn match_keyword(rest: &[u8], syntax: &SyntaxProfile) -> Option<(usize, HighlightClass)> {
    syntax
        .keyword_entries()
        .find(|(kw, _)| {
            !kw.is_empty()
                && rest.starts_with(kw)
                && rest.get(kw.len()).map_or(true, |&next| is_separator(next))
        })
        .map(|(kw, secondary)| {
            let class = if secondary {
                HighlightClass::Keyword2
            } else {
                HighlightClass::Keyword1
            };
            (kw.len(), class)
        })
}
