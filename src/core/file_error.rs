//! Structured file system error handling
//!
//! Captures context at the operation site (what was read, why, and by whom) rather
//! than parsing error messages afterwards.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Types of file operations
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Expanding a glob pattern
    Glob,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Glob => write!(f, "expanding pattern"),
        }
    }
}

/// File operation error with full context
#[derive(Error, Debug)]
#[error("File operation failed: {operation} {}", file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// What code initiated the operation
    pub caller: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Get a user-friendly error message with context
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "Failed {} '{}' for {} ({})",
            self.operation,
            self.file_path.display(),
            self.purpose,
            self.caller
        );

        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                message.push_str("\n\nThe file does not exist at the specified path.");
            }
            std::io::ErrorKind::PermissionDenied => {
                message.push_str(&format!(
                    "\n\nPermission denied. Check file permissions for: {}",
                    self.file_path.display()
                ));
            }
            std::io::ErrorKind::InvalidData => {
                message.push_str("\n\nThe file contains invalid data or encoding.");
                message.push_str("\nEnsure the file contains valid UTF-8 text.");
            }
            _ => {
                message.push_str(&format!("\n\nError details: {}", self.source));
            }
        }

        message
    }
}

/// Extension trait for Result types to add file operation context
pub trait FileResultExt<T> {
    /// Add file operation context to a Result
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|source| FileOperationError {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            caller: caller.into(),
            source,
        })
    }
}

/// Read a UTF-8 file, attaching operation context on failure.
///
/// Reads are synchronous and never retried: a missing manifest aborts resolution.
pub fn read_to_string(path: &Path, purpose: &str, caller: &str) -> Result<String, FileOperationError> {
    std::fs::read_to_string(path).with_file_context(FileOperation::Read, path, purpose, caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_not_found_message() {
        let result: Result<(), std::io::Error> = Err(Error::new(ErrorKind::NotFound, "missing"));
        let error = result
            .with_file_context(FileOperation::Read, "/tmp/app.yaml", "reading manifest", "resources")
            .unwrap_err();

        let message = error.user_message();
        assert!(message.contains("Failed reading '/tmp/app.yaml' for reading manifest (resources)"));
        assert!(message.contains("does not exist"));
    }

    #[test]
    fn test_read_to_string_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("absent.yaml");

        let error = read_to_string(&path, "reading manifest", "test").unwrap_err();
        assert_eq!(error.operation, FileOperation::Read);
        assert_eq!(error.file_path, path);
        assert_eq!(error.source.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_read_to_string_success() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("present.yaml");
        std::fs::write(&path, "kind: ConfigMap\n").unwrap();

        assert_eq!(read_to_string(&path, "reading manifest", "test").unwrap(), "kind: ConfigMap\n");
    }
}
