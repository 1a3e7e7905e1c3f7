//! [`TestDir`] for config scenarios on a real filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::TempDir;

/// A temporary directory with helpers for writing and inspecting files.
///
/// # Example
///
/// ```rust
/// use confkit_test_utils::TestDir;
///
/// let dir = TestDir::new();
/// dir.write("configs/project.yaml", "version: 1\n");
/// assert_eq!(dir.read("configs/project.yaml"), "version: 1\n");
/// ```
pub struct TestDir {
    temp_dir: TempDir,
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content`, creating parent directories as needed.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative))
            .unwrap_or_else(|e| panic!("TestDir::read: {relative}: {e}"))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.join(relative).exists()
    }

    pub fn modified(&self, relative: &str) -> SystemTime {
        fs::metadata(self.join(relative))
            .and_then(|m| m.modified())
            .unwrap_or_else(|e| panic!("TestDir::modified: {relative}: {e}"))
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.join(relative)).unwrap();
    }

    /// Panic with a helpful message if the file does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        assert!(
            self.exists(relative),
            "Expected file to exist: {}",
            self.join(relative).display()
        );
    }

    pub fn assert_file_missing(&self, relative: &str) {
        assert!(
            !self.exists(relative),
            "Expected file to be absent: {}",
            self.join(relative).display()
        );
    }
}
