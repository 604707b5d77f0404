// Test file fixtures

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Manages temporary test files
pub struct TestFixture {
    _temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestFixture {
    /// Create a new temporary file with given content
    pub fn new(filename: &str, content: &[u8]) -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join(filename);

        let mut file = fs::File::create(&path)?;
        file.write_all(content)?;
        file.flush()?;

        Ok(TestFixture {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// A path inside a fresh temporary directory that does not exist yet
    pub fn missing(filename: &str) -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join(filename);
        Ok(TestFixture {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// Read the current content of the file
    pub fn read_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}
