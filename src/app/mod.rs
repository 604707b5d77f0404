//! The editor: one owned state object driven by decoded keys
//!
//! [`Editor`] holds the document, cursor, viewport size, input mode and
//! message line. The event loop in `main` feeds it keys and writes the
//! frames it renders; nothing here touches the terminal directly, so the
//! whole editor can be driven from tests.

pub mod prompt;
pub mod search;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app::prompt::{Prompt, PromptEvent, PromptKind};
use crate::app::search::SearchSession;
use crate::config::EditorConfig;
use crate::input::decoder::Key;
use crate::input::keybindings::{self, Action};
use crate::model::cursor::{Cursor, Movement};
use crate::model::document::Document;
use crate::model::filesystem::{FileStore, FileStoreError};
use crate::view::compositor::{compose, FrameContext};
use crate::view::status_bar::StatusMessage;

/// Shown at startup
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// Terminal rows not available for text (status bar and message line)
const CHROME_ROWS: usize = 2;

/// What keys currently drive
#[derive(Debug, Clone)]
pub enum Mode {
    /// Keys edit and navigate the document
    Normal,
    /// Keys edit a prompt on the message line
    Prompt(Prompt),
}

pub struct Editor {
    doc: Document,
    cursor: Cursor,
    /// Text rows, excluding the status bar and message line
    screen_rows: usize,
    screen_cols: usize,
    mode: Mode,
    status: StatusMessage,
    message_timeout: Duration,
    quit_times: usize,
    quit_times_left: usize,
    should_quit: bool,
    store: Box<dyn FileStore>,
}

impl Editor {
    /// Create an editor with an empty, unnamed document for a terminal of
    /// `rows` x `cols` cells.
    pub fn new(
        config: &EditorConfig,
        store: Box<dyn FileStore>,
        rows: u16,
        cols: u16,
        now: Instant,
    ) -> Self {
        let status = if config.show_help_message {
            HELP_MESSAGE
        } else {
            ""
        };
        let mut editor = Self {
            doc: Document::new(),
            cursor: Cursor::new(),
            screen_rows: 0,
            screen_cols: 0,
            mode: Mode::Normal,
            status: StatusMessage::new(status, now),
            message_timeout: config.message_timeout(),
            quit_times: config.quit_times,
            quit_times_left: config.quit_times,
            should_quit: false,
            store,
        };
        editor.resize(rows, cols);
        editor
    }

    /// Load `path` into a fresh document.
    ///
    /// A file that does not exist yet opens as an empty document with that
    /// name; any other load failure is returned.
    pub fn open(&mut self, path: PathBuf, now: Instant) -> Result<(), FileStoreError> {
        match self.store.load_lines(&path) {
            Ok(lines) => {
                tracing::info!("Opened {} ({} lines)", path.display(), lines.len());
                self.doc = Document::from_lines(Some(path), lines);
            }
            Err(FileStoreError::NotFound(_)) => {
                tracing::info!("{} does not exist, starting a new file", path.display());
                let message = format!("New file: {}", path.display());
                self.doc = Document::from_lines(Some(path), Vec::new());
                self.set_status(message, now);
            }
            Err(err) => return Err(err),
        }
        self.cursor = Cursor::new();
        self.mode = Mode::Normal;
        Ok(())
    }

    /// Adapt the viewport to a terminal of `rows` x `cols` cells.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        let screen_rows = usize::from(rows).saturating_sub(CHROME_ROWS);
        let screen_cols = usize::from(cols);
        if (screen_rows, screen_cols) != (self.screen_rows, self.screen_cols) {
            tracing::debug!("Viewport resized to {}x{}", screen_cols, screen_rows);
            self.screen_rows = screen_rows;
            self.screen_cols = screen_cols;
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn screen_size(&self) -> (usize, usize) {
        (self.screen_rows, self.screen_cols)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Text of the message line as last set, regardless of expiry.
    pub fn status_text(&self) -> &str {
        self.status.text()
    }

    /// What the message line shows at `now`: the open prompt, or the
    /// status message while it has not expired.
    pub fn message_line(&self, now: Instant) -> Option<String> {
        match &self.mode {
            Mode::Prompt(prompt) => Some(prompt.message()),
            Mode::Normal => self
                .status
                .visible(now, self.message_timeout)
                .map(str::to_string),
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, now: Instant) {
        self.status = StatusMessage::new(text, now);
    }

    /// Dispatch one decoded key.
    pub fn process_key(&mut self, key: Key, now: Instant) {
        tracing::trace!("Key {:?}", key);
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Prompt(prompt) => self.handle_prompt_key(prompt, key, now),
            Mode::Normal => self.handle_normal_key(key, now),
        }
    }

    /// Scroll the viewport to the cursor and compose a frame.
    pub fn render(&mut self, now: Instant) -> io::Result<Vec<u8>> {
        self.cursor
            .scroll(&self.doc, self.screen_rows, self.screen_cols);
        let message = self.message_line(now);
        compose(&FrameContext {
            doc: &self.doc,
            cursor: &self.cursor,
            screen_rows: self.screen_rows,
            screen_cols: self.screen_cols,
            message: message.as_deref(),
        })
    }

    fn handle_normal_key(&mut self, key: Key, now: Instant) {
        match keybindings::resolve(key) {
            Action::Quit => {
                if self.doc.is_dirty() && self.quit_times_left > 0 {
                    let message = format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times_left
                    );
                    self.set_status(message, now);
                    self.quit_times_left -= 1;
                    return;
                }
                tracing::info!("Quit requested");
                self.should_quit = true;
                return;
            }
            Action::Save => self.save(now),
            Action::Search => {
                let session = SearchSession::begin(&self.cursor);
                self.mode = Mode::Prompt(Prompt::new(PromptKind::Search(session)));
            }
            Action::InsertNewline => self.doc.insert_newline(&mut self.cursor),
            Action::InsertChar(ch) => self.doc.insert_char(&mut self.cursor, ch),
            Action::DeleteBackward => self.doc.delete_char(&mut self.cursor),
            Action::DeleteForward => {
                self.cursor
                    .apply(Movement::Right, &self.doc, self.screen_rows);
                self.doc.delete_char(&mut self.cursor);
            }
            Action::Move(movement) => self.cursor.apply(movement, &self.doc, self.screen_rows),
            Action::None => {}
        }
        self.quit_times_left = self.quit_times;
    }

    fn handle_prompt_key(&mut self, mut prompt: Prompt, key: Key, now: Instant) {
        let event = prompt.handle_key(key);
        let input = prompt.input().to_vec();
        if let PromptKind::Search(session) = &mut prompt.kind {
            session.update(&mut self.doc, &mut self.cursor, &input, key);
        }

        match event {
            PromptEvent::Continue => self.mode = Mode::Prompt(prompt),
            PromptEvent::Cancelled => match prompt.kind {
                PromptKind::Search(session) => {
                    session.cancel(&mut self.doc, &mut self.cursor);
                    self.set_status("", now);
                }
                PromptKind::SaveAs => self.set_status("Save aborted", now),
            },
            PromptEvent::Confirmed => {
                let input = String::from_utf8_lossy(&input).into_owned();
                match prompt.kind {
                    PromptKind::Search(session) => {
                        let found = session.found();
                        session.finish(&mut self.doc);
                        if found {
                            self.set_status("", now);
                        } else {
                            self.set_status(format!("Not found: {input}"), now);
                        }
                    }
                    PromptKind::SaveAs => {
                        self.doc.set_filename(Some(PathBuf::from(input)));
                        self.write_out(now);
                    }
                }
            }
        }
        self.quit_times_left = self.quit_times;
    }

    /// Save to the current file name, prompting for one first if unnamed.
    fn save(&mut self, now: Instant) {
        if self.doc.filename().is_none() {
            self.mode = Mode::Prompt(Prompt::new(PromptKind::SaveAs));
            return;
        }
        self.write_out(now);
    }

    fn write_out(&mut self, now: Instant) {
        let Some(path) = self.doc.filename().map(|p| p.to_path_buf()) else {
            return;
        };
        let data = self.doc.to_bytes();
        match self.store.save(&path, &data) {
            Ok(written) => {
                tracing::info!("Saved {} bytes to {}", written, path.display());
                self.doc.mark_clean();
                self.set_status(format!("{written} bytes written to disk"), now);
            }
            Err(err) => {
                tracing::warn!("Failed to save {}: {}", path.display(), err);
                self.set_status(format!("Can't save! I/O error: {err}"), now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::decoder::{ctrl, ENTER};
    use crate::model::filesystem::InMemoryFileStore;
    use std::path::Path;

    fn editor_with(store: &InMemoryFileStore) -> Editor {
        Editor::new(
            &EditorConfig::default(),
            Box::new(store.clone()),
            24,
            80,
            Instant::now(),
        )
    }

    fn type_text(editor: &mut Editor, text: &str) {
        for b in text.bytes() {
            editor.process_key(Key::Byte(b), Instant::now());
        }
    }

    #[test]
    fn test_new_editor_shows_help() {
        let editor = editor_with(&InMemoryFileStore::new());
        assert_eq!(editor.status_text(), HELP_MESSAGE);
        assert_eq!(editor.screen_size(), (22, 80));
        assert_eq!(editor.document().row_count(), 0);
    }

    #[test]
    fn test_open_missing_file_starts_new_document() {
        let store = InMemoryFileStore::new();
        let mut editor = editor_with(&store);
        editor.open(PathBuf::from("new.c"), Instant::now()).unwrap();
        assert_eq!(editor.document().row_count(), 0);
        assert_eq!(editor.document().syntax().map(|s| s.name), Some("c"));
        assert!(editor.status_text().starts_with("New file"));
    }

    #[test]
    fn test_quit_confirmation_counts_down() {
        let mut editor = editor_with(&InMemoryFileStore::new());
        type_text(&mut editor, "x");
        let quit = Key::Byte(ctrl(b'q'));

        editor.process_key(quit, Instant::now());
        assert!(editor.status_text().contains("Press Ctrl-Q 3 more times"));
        editor.process_key(quit, Instant::now());
        assert!(editor.status_text().contains("Press Ctrl-Q 2 more times"));

        // Any other key resets the counter
        editor.process_key(Key::ArrowLeft, Instant::now());
        editor.process_key(quit, Instant::now());
        assert!(editor.status_text().contains("Press Ctrl-Q 3 more times"));
        editor.process_key(quit, Instant::now());
        editor.process_key(quit, Instant::now());
        assert!(!editor.should_quit());
        editor.process_key(quit, Instant::now());
        assert!(editor.should_quit());
    }

    #[test]
    fn test_clean_buffer_quits_immediately() {
        let mut editor = editor_with(&InMemoryFileStore::new());
        editor.process_key(Key::Byte(ctrl(b'q')), Instant::now());
        assert!(editor.should_quit());
    }

    #[test]
    fn test_save_as_prompt() {
        let store = InMemoryFileStore::new();
        let mut editor = editor_with(&store);
        type_text(&mut editor, "int x;");
        editor.process_key(Key::Byte(ctrl(b's')), Instant::now());
        assert!(matches!(editor.mode(), Mode::Prompt(_)));

        type_text(&mut editor, "out.c");
        editor.process_key(Key::Byte(ENTER), Instant::now());
        assert!(matches!(editor.mode(), Mode::Normal));
        assert_eq!(editor.status_text(), "7 bytes written to disk");
        assert_eq!(store.contents(Path::new("out.c")).unwrap(), b"int x;\n");
        assert!(!editor.document().is_dirty());
        assert_eq!(editor.document().syntax().map(|s| s.name), Some("c"));
    }

    #[test]
    fn test_save_as_escape_aborts() {
        let store = InMemoryFileStore::new();
        let mut editor = editor_with(&store);
        type_text(&mut editor, "x");
        editor.process_key(Key::Byte(ctrl(b's')), Instant::now());
        type_text(&mut editor, "name");
        editor.process_key(Key::Escape, Instant::now());
        assert_eq!(editor.status_text(), "Save aborted");
        assert!(editor.document().filename().is_none());
        assert!(editor.document().is_dirty());
    }

    #[test]
    fn test_delete_key_deletes_forward() {
        let store = InMemoryFileStore::new().with_file("a.txt", "abc\n");
        let mut editor = editor_with(&store);
        editor.open(PathBuf::from("a.txt"), Instant::now()).unwrap();
        editor.process_key(Key::Delete, Instant::now());
        assert_eq!(editor.document().row(0).unwrap().content(), b"bc");
        assert_eq!(editor.cursor().column, 0);
    }

    #[test]
    fn test_search_not_found_message() {
        let store = InMemoryFileStore::new().with_file("a.txt", "abc\n");
        let mut editor = editor_with(&store);
        editor.open(PathBuf::from("a.txt"), Instant::now()).unwrap();
        editor.process_key(Key::Byte(ctrl(b'f')), Instant::now());
        type_text(&mut editor, "zz");
        assert_eq!(
            editor.message_line(Instant::now()).as_deref(),
            Some("Search: zz (no match)")
        );
        editor.process_key(Key::Byte(ENTER), Instant::now());
        assert_eq!(editor.status_text(), "Not found: zz");
    }

    #[test]
    fn test_message_expires() {
        let start = Instant::now();
        let editor = Editor::new(
            &EditorConfig::default(),
            Box::new(InMemoryFileStore::new()),
            24,
            80,
            start,
        );
        assert!(editor.message_line(start).is_some());
        assert!(editor
            .message_line(start + Duration::from_secs(6))
            .is_none());
    }
}
