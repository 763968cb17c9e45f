//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use keel_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KeelError, KeelResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> KeelResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> KeelResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KeelError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_into_nested_directories() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = temp.path().join(".projen");

        fs.create_dir_all(&dir).unwrap();
        fs.write_file(&dir.join("tasks.json"), "{}\n").unwrap();

        assert!(fs.exists(&dir.join("tasks.json")));
        assert_eq!(
            std::fs::read_to_string(dir.join("tasks.json")).unwrap(),
            "{}\n"
        );
    }

    #[test]
    fn write_without_parent_is_a_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&temp.path().join("missing/nx.json"), "{}")
            .unwrap_err();
        assert!(matches!(
            err,
            KeelError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
