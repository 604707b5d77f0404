//! Display width calculation for row content
//!
//! Every byte occupies exactly one terminal cell, except a tab which advances
//! to the next multiple of [`TAB_STOP`]. These helpers are the single source of
//! truth for that rule: row rendering, cursor placement and search all go
//! through them so logical and display columns never disagree.

/// Width of a tab stop in display columns.
pub const TAB_STOP: usize = 8;

/// Display width of the byte `b` when it starts at display column `col`.
#[inline]
fn advance(b: u8, col: usize) -> usize {
    if b == b'\t' {
        TAB_STOP - (col % TAB_STOP)
    } else {
        1
    }
}

/// Expand tabs in `content` into spaces aligned to [`TAB_STOP`].
pub fn expand_tabs(content: &[u8]) -> Vec<u8> {
    let tabs = content.iter().filter(|&&b| b == b'\t').count();
    let mut render = Vec::with_capacity(content.len() + tabs * (TAB_STOP - 1));
    for &b in content {
        if b == b'\t' {
            render.push(b' ');
            while render.len() % TAB_STOP != 0 {
                render.push(b' ');
            }
        } else {
            render.push(b);
        }
    }
    render
}

/// Convert a logical column (byte index into `content`) to a display column.
///
/// Columns past the end of `content` are clamped to the end of the row.
#[inline]
pub fn column_to_display(content: &[u8], column: usize) -> usize {
    content
        .iter()
        .take(column)
        .fold(0, |col, &b| col + advance(b, col))
}

/// Convert a display column back to a logical column.
///
/// Returns the logical column of the byte whose cells cover `display`, or the
/// row length if `display` lies past the end of the rendered row.
pub fn display_to_column(content: &[u8], display: usize) -> usize {
    let mut current = 0;
    for (column, &b) in content.iter().enumerate() {
        current += advance(b, current);
        if current > display {
            return column;
        }
    }
    content.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_text() {
        assert_eq!(expand_tabs(b"hello"), b"hello".to_vec());
        assert_eq!(expand_tabs(b""), Vec::<u8>::new());
    }

    #[test]
    fn test_expand_tabs_align_to_stop() {
        assert_eq!(expand_tabs(b"\tx"), b"        x".to_vec());
        assert_eq!(expand_tabs(b"ab\tx"), b"ab      x".to_vec());
        assert_eq!(expand_tabs(b"1234567\tx"), b"1234567 x".to_vec());
        assert_eq!(expand_tabs(b"12345678\tx").len(), 17);
    }

    #[test]
    fn test_column_to_display() {
        let content = b"a\tb\tc";
        assert_eq!(column_to_display(content, 0), 0);
        assert_eq!(column_to_display(content, 1), 1);
        assert_eq!(column_to_display(content, 2), 8);
        assert_eq!(column_to_display(content, 3), 9);
        assert_eq!(column_to_display(content, 4), 16);
        // Past the end clamps to the rendered width
        assert_eq!(column_to_display(content, 99), 17);
    }

    #[test]
    fn test_display_to_column() {
        let content = b"a\tb";
        assert_eq!(display_to_column(content, 0), 0);
        // Every cell covered by the tab maps back to the tab itself
        for display in 1..8 {
            assert_eq!(display_to_column(content, display), 1);
        }
        assert_eq!(display_to_column(content, 8), 2);
        assert_eq!(display_to_column(content, 100), 3);
    }

    #[test]
    fn test_render_length_matches_display_width() {
        let content = b"\tfoo\t\tbar \t";
        assert_eq!(
            expand_tabs(content).len(),
            column_to_display(content, content.len())
        );
    }
}
