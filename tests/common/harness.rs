// Drives a whole editor from raw terminal bytes

use easypoetry::app::Editor;
use easypoetry::config::EditorConfig;
use easypoetry::input::decoder::{KeyDecoder, ScriptedSource};
use easypoetry::model::filesystem::InMemoryFileStore;
use std::path::PathBuf;
use std::time::Instant;

/// Editor wired to an in-memory store and a scripted byte source
pub struct EditorHarness {
    pub editor: Editor,
    pub store: InMemoryFileStore,
    source: ScriptedSource,
    decoder: KeyDecoder,
}

impl EditorHarness {
    /// Create a harness for a terminal of `rows` x `cols` cells
    pub fn new(rows: u16, cols: u16) -> Self {
        Self::with_store(InMemoryFileStore::new(), rows, cols)
    }

    /// Create a harness and open `path` from `store`
    pub fn open(store: InMemoryFileStore, path: &str) -> Self {
        let mut harness = Self::with_store(store, 24, 80);
        harness
            .editor
            .open(PathBuf::from(path), Instant::now())
            .unwrap();
        harness
    }

    /// Create a harness backed by `store`
    pub fn with_store(store: InMemoryFileStore, rows: u16, cols: u16) -> Self {
        let editor = Editor::new(
            &EditorConfig::default(),
            Box::new(store.clone()),
            rows,
            cols,
            Instant::now(),
        );
        Self {
            editor,
            store,
            source: ScriptedSource::new(),
            decoder: KeyDecoder::default(),
        }
    }

    /// Feed raw terminal bytes and process every key they decode to
    pub fn send(&mut self, bytes: &[u8]) {
        self.source.push_bytes(bytes);
        while !self.source.is_empty() {
            if let Some(key) = self.decoder.next_key(&mut self.source).unwrap() {
                self.editor.process_key(key, Instant::now());
            }
        }
    }

    /// Render a frame, scrolling the viewport as the real loop does
    pub fn render(&mut self) -> Vec<u8> {
        self.editor.render(Instant::now()).unwrap()
    }

    pub fn row_text(&self, at: usize) -> String {
        let row = self.editor.document().row(at).unwrap();
        String::from_utf8_lossy(row.content()).into_owned()
    }

    /// Cursor as `(row, column)`
    pub fn cursor_pos(&self) -> (usize, usize) {
        let cursor = self.editor.cursor();
        (cursor.row, cursor.column)
    }
}

/// Escape sequences as a terminal sends them
pub mod keys {
    pub const UP: &[u8] = b"\x1b[A";
    pub const DOWN: &[u8] = b"\x1b[B";
    pub const RIGHT: &[u8] = b"\x1b[C";
    pub const LEFT: &[u8] = b"\x1b[D";
    pub const HOME: &[u8] = b"\x1b[H";
    pub const END: &[u8] = b"\x1bOF";
    pub const DELETE: &[u8] = b"\x1b[3~";
    pub const PAGE_DOWN: &[u8] = b"\x1b[6~";
    pub const ESC: &[u8] = b"\x1b";
    pub const ENTER: &[u8] = b"\r";
    pub const BACKSPACE: &[u8] = b"\x7f";
    pub const CTRL_F: &[u8] = b"\x06";
    pub const CTRL_Q: &[u8] = b"\x11";
    pub const CTRL_S: &[u8] = b"\x13";
}
