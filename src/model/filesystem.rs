//! File loading and saving
//!
//! The editor talks to storage through the [`FileStore`] trait so the
//! document model can be exercised without touching disk:
//! - `StdFileStore`: native filesystem using `std::fs`
//! - `InMemoryFileStore`: map-backed store for tests, with failure injection

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One line read from a file, with its terminator removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedLine {
    pub bytes: Vec<u8>,
    /// Whether the line was terminated by `\n` in the source
    pub had_newline: bool,
}

/// Split raw file bytes into lines.
///
/// Each line loses its trailing `\n` and any `\r` directly before it, so
/// CRLF files load as plain rows. A final unterminated line is kept; an empty
/// input yields no lines.
pub fn split_lines(data: &[u8]) -> Vec<LoadedLine> {
    let mut lines = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        let (line, had_newline, next) = match rest.iter().position(|&b| b == b'\n') {
            Some(pos) => (&rest[..pos], true, &rest[pos + 1..]),
            None => (rest, false, &rest[rest.len()..]),
        };
        let mut end = line.len();
        while end > 0 && matches!(line[end - 1], b'\r' | b'\n') {
            end -= 1;
        }
        lines.push(LoadedLine {
            bytes: line[..end].to_vec(),
            had_newline,
        });
        rest = next;
    }
    lines
}

/// Errors from loading or saving a file
#[derive(Debug)]
pub enum FileStoreError {
    NotFound(PathBuf),
    Io(io::Error),
}

impl std::fmt::Display for FileStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStoreError::NotFound(path) => write!(f, "{}: file not found", path.display()),
            FileStoreError::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FileStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileStoreError::Io(err) => Some(err),
            FileStoreError::NotFound(_) => None,
        }
    }
}

impl From<io::Error> for FileStoreError {
    fn from(err: io::Error) -> Self {
        FileStoreError::Io(err)
    }
}

/// Storage backend for documents
pub trait FileStore {
    /// Read `path` and split it into lines.
    fn load_lines(&self, path: &Path) -> Result<Vec<LoadedLine>, FileStoreError>;

    /// Replace the contents of `path` with `data`, creating it if needed.
    /// Returns the number of bytes written.
    fn save(&self, path: &Path, data: &[u8]) -> Result<usize, FileStoreError>;
}

/// Native filesystem store
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileStore;

impl FileStore for StdFileStore {
    fn load_lines(&self, path: &Path) -> Result<Vec<LoadedLine>, FileStoreError> {
        match std::fs::read(path) {
            Ok(data) => Ok(split_lines(&data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(FileStoreError::NotFound(path.to_path_buf()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, path: &Path, data: &[u8]) -> Result<usize, FileStoreError> {
        let mut options = std::fs::OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let mut file = options.open(path)?;
        // Truncate to the new length first, then overwrite in place
        file.set_len(data.len() as u64)?;
        file.write_all(data)?;
        file.flush()?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(data.len())
    }
}

/// In-memory store for tests.
///
/// Clones share the same contents, so a test can keep a handle while the
/// editor owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileStore {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    fail_saves: Arc<Mutex<Option<io::ErrorKind>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), data.into());
        }
    }

    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(path).cloned()
    }

    /// Make every following save fail with `kind`, or succeed again with `None`.
    pub fn fail_saves(&self, kind: Option<io::ErrorKind>) {
        if let Ok(mut fail) = self.fail_saves.lock() {
            *fail = kind;
        }
    }
}

impl FileStore for InMemoryFileStore {
    fn load_lines(&self, path: &Path) -> Result<Vec<LoadedLine>, FileStoreError> {
        let files = self
            .files
            .lock()
            .map_err(|_| io::Error::other("file store poisoned"))?;
        files
            .get(path)
            .map(|data| split_lines(data))
            .ok_or_else(|| FileStoreError::NotFound(path.to_path_buf()))
    }

    fn save(&self, path: &Path, data: &[u8]) -> Result<usize, FileStoreError> {
        if let Some(kind) = self.fail_saves.lock().ok().and_then(|f| *f) {
            return Err(io::Error::new(kind, "injected save failure").into());
        }
        self.insert(path, data);
        Ok(data.len())
    }
}
