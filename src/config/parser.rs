//! Generic YAML configuration parsing.
//!
//! Reads a file and deserializes it into any [`serde::de::DeserializeOwned`] type. Read
//! failures surface as [`FileOperationError`](crate::core::FileOperationError) and
//! syntax or schema failures as [`WorkloadError::ConfigParse`], both naming the file.
//!
//! ```rust,no_run
//! use workload_resolver::config::parse_config;
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct MyConfig {
//!     name: String,
//! }
//!
//! # fn example() -> anyhow::Result<()> {
//! let config: MyConfig = parse_config(Path::new("workload.yaml"))?;
//! println!("Config: {}", config.name);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::core::WorkloadError;
use crate::core::file_error::read_to_string;

/// Parse a YAML configuration file into `T`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize into `T`.
pub fn parse_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string(path, "reading workload config", "parse_config")?;
    parse_config_str(&content, &path.display().to_string()).map_err(Into::into)
}

/// Parse YAML text into `T`; `file` only names the source in errors.
pub fn parse_config_str<T: DeserializeOwned>(content: &str, file: &str) -> Result<T, WorkloadError> {
    serde_yaml::from_str(content).map_err(|e| WorkloadError::ConfigParse {
        file: file.to_string(),
        reason: e.to_string(),
    })
}
