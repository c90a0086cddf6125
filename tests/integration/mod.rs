//! Integration test suite for workload-resolver
//!
//! End-to-end tests that lay out workload configs and manifests in a temporary
//! directory, then run the resolution pipeline through the library or the binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! RUST_LOG=debug cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **standalone**: standalone workloads through the library API
//! - **collection**: collections with components, field merging and ordering
//! - **cli**: the `resolve`, `rbac` and `validate` commands
//! - **error_scenarios**: failures and how they are reported

mod common;

mod cli;
mod collection;
mod error_scenarios;
mod standalone;
