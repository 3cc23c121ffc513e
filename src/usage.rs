//! Record of whether language features were exercised during a run.
//!
//! Scenario runners may execute hooks in separate processes, so the flag can
//! live in a file. It is passed explicitly to the session rather than kept
//! as global state. Failures to touch the file are logged and ignored: a
//! lost flag only changes the end-of-run summary.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Default flag file name inside the system temp directory
pub const DEFAULT_FLAG_FILE_NAME: &str = "behave_language_features.flag";

const FLAG_CONTENTS: &str = "True";

pub trait UsageFlag: Send + Sync {
    fn mark(&self);
    fn is_marked(&self) -> bool;
    fn clear(&self);
}

/// Flag held in memory; enough when the whole run lives in one process.
#[derive(Debug, Default)]
pub struct MemoryUsageFlag {
    marked: AtomicBool,
}

impl MemoryUsageFlag {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UsageFlag for MemoryUsageFlag {
    fn mark(&self) {
        self.marked.store(true, Ordering::Relaxed);
    }

    fn is_marked(&self) -> bool {
        self.marked.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.marked.store(false, Ordering::Relaxed);
    }
}

/// Flag persisted as a small file so separate processes can share it.
#[derive(Debug, Clone)]
pub struct FileUsageFlag {
    path: PathBuf,
}

impl FileUsageFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Flag file in the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join(DEFAULT_FLAG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageFlag for FileUsageFlag {
    fn mark(&self) {
        if let Err(e) = std::fs::write(&self.path, FLAG_CONTENTS) {
            debug!("Could not write language flag {}: {}", self.path.display(), e);
        }
    }

    fn is_marked(&self) -> bool {
        std::fs::read_to_string(&self.path)
            .map(|contents| contents.trim() == FLAG_CONTENTS)
            .unwrap_or(false)
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => debug!("Could not remove language flag {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_flag_lifecycle() {
        let flag = MemoryUsageFlag::new();
        assert!(!flag.is_marked());

        flag.mark();
        assert!(flag.is_marked());

        flag.clear();
        assert!(!flag.is_marked());
    }

    #[test]
    fn test_file_flag_lifecycle() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let flag = FileUsageFlag::new(dir.path().join("language.flag"));
        assert!(!flag.is_marked());

        flag.mark();
        assert!(flag.is_marked());
        assert_eq!(
            std::fs::read_to_string(flag.path()).expect("flag file"),
            "True"
        );

        flag.clear();
        assert!(!flag.is_marked());
        assert!(!flag.path().exists());
    }

    #[test]
    fn test_file_flag_shared_between_handles() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("language.flag");

        FileUsageFlag::new(&path).mark();
        assert!(FileUsageFlag::new(&path).is_marked());
    }

    #[test]
    fn test_file_flag_ignores_unexpected_contents() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let flag = FileUsageFlag::new(dir.path().join("language.flag"));
        std::fs::write(flag.path(), "False").expect("write");

        assert!(!flag.is_marked());
    }

    #[test]
    fn test_file_flag_unwritable_path_is_ignored() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let flag = FileUsageFlag::new(dir.path().join("missing").join("language.flag"));

        flag.mark();
        flag.clear();
        assert!(!flag.is_marked());
    }

    #[test]
    fn test_in_temp_dir_path() {
        let flag = FileUsageFlag::in_temp_dir();
        assert!(flag.path().ends_with(DEFAULT_FLAG_FILE_NAME));
    }
}
