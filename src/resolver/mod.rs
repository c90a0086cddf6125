//! Workload resolution pipeline.
//!
//! Turns a workload config file into a fully resolved [`Workload`]: every manifest
//! lexed, spec fields merged, RBAC and ownership rules extracted and components
//! ordered by their dependencies.
//!
//! # Phases
//!
//! Phases run in a fixed order and the first failure aborts the run; nothing is
//! written anywhere, so a failed resolution leaves no partial output.
//!
//! 1. **Load**: parse the config file (and, for a collection, every component config)
//! 2. **Validate**: check name and API identity of every workload
//! 3. **Components**: attach components to the collection in dependency order
//! 4. **Names**: derive package names and companion CLI command names
//! 5. **Resources**: lex manifests into source files, spec fields and rules
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
//! for line in workload.rbac_marker_lines() {
//!     println!("// {line}");
//! }
//! println!("{} spec fields", workload.api_spec_fields().len());
//! # Ok(())
//! # }
//! ```

pub mod dependency_graph;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{load_components, load_workload};
use crate::workload::{Workload, WorkloadBuilder};

/// Load and fully resolve the workload described by the config at `path`.
pub fn resolve_workload(path: &Path) -> Result<Workload> {
    tracing::debug!(config = %path.display(), "resolving workload");

    let mut workload = load_workload(path)?;
    workload.validate().with_context(|| format!("Invalid workload config {}", path.display()))?;

    if let Workload::Collection(collection) = &mut workload {
        let components = load_components(path, &collection.component_files)
            .with_context(|| format!("Failed to load components of collection '{}'", collection.shared.name))?;

        for component in &components {
            component.validate().with_context(|| {
                format!("Invalid component config {}", component.shared.config_path.display())
            })?;
        }

        collection
            .set_components(components)
            .with_context(|| format!("Failed to order components of collection '{}'", collection.shared.name))?;
    }

    workload.set_names();
    workload.set_resources(path)?;

    tracing::info!(
        workload = %workload.name(),
        kind = %workload.workload_kind(),
        source_files = workload.source_files().len(),
        spec_fields = workload.api_spec_fields().len(),
        components = workload.components().len(),
        "resolved workload"
    );

    Ok(workload)
}
