//! Syntax profiles and file type detection
//!
//! A [`SyntaxProfile`] is a static rule set: comment markers, two keyword
//! classes and switches for number and string colouring. Profiles are chosen
//! once per document from its file name.

use std::path::Path;

/// Suffix marking a keyword as a "type-like" (secondary) keyword.
pub const KEYWORD2_MARKER: u8 = b'|';

/// Static highlighting rules for one file type.
#[derive(Debug, PartialEq, Eq)]
pub struct SyntaxProfile {
    /// Name shown in the status bar
    pub name: &'static str,
    /// Entries starting with `.` match the file extension, others match as
    /// a substring of the file name
    pub file_match: &'static [&'static str],
    /// Keywords in priority order; a trailing `|` makes it a secondary keyword
    pub keywords: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

impl SyntaxProfile {
    /// Detect the profile for a file name, if any.
    pub fn for_path(path: &Path) -> Option<&'static SyntaxProfile> {
        let name = path.to_string_lossy();
        let ext = path
            .file_name()
            .map(|f| f.to_string_lossy())
            .and_then(|f| f.rfind('.').map(|i| f[i..].to_string()));

        PROFILES.iter().find(|profile| {
            profile.file_match.iter().any(|pattern| {
                if pattern.starts_with('.') {
                    ext.as_deref() == Some(*pattern)
                } else {
                    name.contains(pattern)
                }
            })
        })
    }

    /// Iterate keywords as `(bytes, is_secondary)` with the marker stripped.
    pub fn keyword_entries(&self) -> impl Iterator<Item = (&'static [u8], bool)> + '_ {
        self.keywords.iter().map(|&kw| {
            let bytes: &'static [u8] = kw.as_bytes();
            match bytes.split_last() {
                Some((&KEYWORD2_MARKER, stripped)) => (stripped, true),
                _ => (bytes, false),
            }
        })
    }
}

/// Built-in profile database.
pub static PROFILES: &[SyntaxProfile] = &[
    SyntaxProfile {
        name: "c",
        file_match: &[".c", ".h", ".cpp"],
        keywords: &[
            "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
            "union", "typedef", "static", "enum", "class", "case", "int|", "long|", "double|",
            "float|", "char|", "unsigned|", "signed|", "void|",
        ],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
    SyntaxProfile {
        name: "rust",
        file_match: &[".rs"],
        keywords: &[
            "as", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for",
            "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
            "return", "static", "struct", "trait", "type", "unsafe", "use", "where", "while",
            "i8|", "i16|", "i32|", "i64|", "isize|", "u8|", "u16|", "u32|", "u64|", "usize|",
            "f32|", "f64|", "bool|", "char|", "str|", "String|", "Self|", "self|", "Option|",
            "Result|", "Vec|",
        ],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
    SyntaxProfile {
        name: "python",
        file_match: &[".py"],
        keywords: &[
            "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else",
            "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
            "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
            "True|", "False|", "None|", "int|", "float|", "str|", "bytes|", "list|", "dict|",
            "set|", "tuple|", "bool|",
        ],
        line_comment: Some("#"),
        block_comment: None,
        highlight_numbers: true,
        highlight_strings: true,
    },
];
