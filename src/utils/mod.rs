//! Small helpers shared across modules.
//!
//! - [`naming`] - package, file, identifier and plural names derived from
//!   workload names and Kubernetes kinds

pub mod naming;
