//! Configuration loading for workload resolution.
//!
//! Workloads are described by YAML config files, one per workload. A collection
//! config points at the config files of its components.
//!
//! # Modules
//!
//! - `parser` - generic YAML parsing with file context in errors
//! - `workload` - the workload config schema and loaders
//!
//! # Path resolution
//!
//! Manifest entries (`resources`) and component entries (`componentFiles`) are
//! resolved relative to the directory of the config file listing them, never the
//! current working directory. Entries may be glob patterns; matches are sorted.

pub mod parser;
pub mod workload;

pub use parser::{parse_config, parse_config_str};
pub use workload::{WorkloadConfig, WorkloadConfigSpec, load_components, load_workload};
