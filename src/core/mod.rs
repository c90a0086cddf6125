//! Core types and error handling shared by every phase of workload resolution.
//!
//! - [`error`] - [`WorkloadError`] kinds and the CLI-facing [`ErrorContext`]
//! - [`file_error`] - file operations with structured context

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, WorkloadError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
