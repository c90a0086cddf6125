//! workload-resolver - resolve operator workload configs into a typed model
//!
//! Reads a workload config and the Kubernetes manifests it lists, lexes the
//! `+operator-builder` field markers embedded in YAML comments and produces the
//! model an operator code generator needs: spec fields of the custom resource,
//! per-manifest source files with child constructors, RBAC and ownership rules,
//! and components ordered by their dependencies.
//!
//! # Workload variants
//!
//! - **`StandaloneWorkload`**: one custom resource managing its own children
//! - **`WorkloadCollection`**: a custom resource owning components, and optionally
//!   children of its own
//! - **`ComponentWorkload`**: a collection member that may depend on siblings and
//!   reference the collection's spec through `collection:field` markers
//!
//! # Markers
//!
//! ```yaml
//! spec:
//!   replicas: 2  # +operator-builder:field:name=webStoreReplicas,default=2,type=int
//!   # +operator-builder:field:name=webStoreImage,type=string,description="Image to run"
//!   image: nginx:1.17
//! ```
//!
//! A trailing marker annotates the scalar on its own line; a head marker annotates
//! the next code line. The annotated value is replaced by a reference to the
//! generated spec field.
//!
//! # Modules
//!
//! - [`cli`] - command-line interface
//! - [`config`] - workload config loading
//! - [`constants`] - marker prefixes, default descriptions and verbs
//! - [`core`] - error types and user-facing error rendering
//! - [`markers`] - marker parsing and manifest lexing
//! - [`resolver`] - the resolution pipeline and component dependency graph
//! - [`utils`] - naming helpers
//! - [`workload`] - the workload model
//!
//! # Example
//!
//! ```rust,no_run
//! use workload_resolver::resolver::resolve_workload;
//! use workload_resolver::workload::WorkloadBuilder;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let workload = resolve_workload(Path::new("workload.yaml"))?;
//! let (create, init) = workload.func_names();
//! println!("{} constructors, {} run at init", create.len(), init.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod markers;
pub mod resolver;
pub mod utils;
pub mod workload;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
