//! Workload config descriptors.
//!
//! A workload config names one workload and lists the manifests it manages:
//!
//! ```yaml
//! name: webstore
//! kind: StandaloneWorkload
//! spec:
//!   api:
//!     domain: acme.com
//!     group: apps
//!     version: v1alpha1
//!     kind: WebStore
//!     clusterScoped: false
//!   companionCliRootcmd:
//!     name: webstorectl
//!   resources:
//!     - app.yaml
//! ```
//!
//! Collections list their component configs under `componentFiles`; components list
//! sibling component names under `dependencies`. Every path is relative to the file
//! that lists it.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::core::WorkloadError;
use crate::workload::resources::{config_dir, expand_resources};
use crate::workload::{
    APISpec, CliCommand, ComponentWorkload, StandaloneWorkload, Workload, WorkloadBuilder, WorkloadCollection,
    WorkloadKind,
};

use super::parser::parse_config;

/// Deserialized workload config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadConfig {
    /// Workload name
    #[serde(default)]
    pub name: String,
    /// Workload variant
    pub kind: WorkloadKind,
    /// Everything else
    #[serde(default)]
    pub spec: WorkloadConfigSpec,
}

/// The `spec` section of a workload config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadConfigSpec {
    /// API identity of the custom resource
    #[serde(default)]
    pub api: APISpec,
    /// Companion CLI root command (standalone and collection)
    #[serde(default)]
    pub companion_cli_rootcmd: CliCommand,
    /// Companion CLI subcommand (collection and component)
    #[serde(default)]
    pub companion_cli_subcmd: CliCommand,
    /// Manifest paths or glob patterns
    #[serde(default)]
    pub resources: Vec<String>,
    /// Component config paths or glob patterns (collection)
    #[serde(default)]
    pub component_files: Vec<String>,
    /// Names of sibling components (component)
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl WorkloadConfig {
    /// Build the workload this config describes. `path` is the config file.
    pub fn into_workload(self, path: &Path) -> Workload {
        let spec = self.spec;

        match self.kind {
            WorkloadKind::Standalone => {
                warn_ignored(path, "componentFiles", !spec.component_files.is_empty());
                warn_ignored(path, "dependencies", !spec.dependencies.is_empty());
                warn_ignored(path, "companionCliSubcmd", spec.companion_cli_subcmd.has_name());

                let mut workload = StandaloneWorkload::new(self.name, spec.api, path);
                workload.root_command = spec.companion_cli_rootcmd;
                workload.resources = spec.resources;
                workload.into()
            }
            WorkloadKind::Collection => {
                warn_ignored(path, "dependencies", !spec.dependencies.is_empty());

                let mut workload = WorkloadCollection::new(self.name, spec.api, path);
                workload.root_command = spec.companion_cli_rootcmd;
                workload.sub_command = spec.companion_cli_subcmd;
                workload.resources = spec.resources;
                workload.component_files = spec.component_files;
                workload.into()
            }
            WorkloadKind::Component => {
                warn_ignored(path, "componentFiles", !spec.component_files.is_empty());
                warn_ignored(path, "companionCliRootcmd", spec.companion_cli_rootcmd.has_name());

                let mut workload = ComponentWorkload::new(self.name, spec.api, path);
                workload.sub_command = spec.companion_cli_subcmd;
                workload.resources = spec.resources;
                workload.dependencies = spec.dependencies;
                workload.into()
            }
        }
    }
}

fn warn_ignored(path: &Path, field: &str, present: bool) {
    if present {
        tracing::warn!(config = %path.display(), field, "field is ignored for this workload kind");
    }
}

/// Load the workload described by the config file at `path`.
pub fn load_workload(path: &Path) -> Result<Workload> {
    let config: WorkloadConfig = parse_config(path)?;
    tracing::debug!(config = %path.display(), kind = %config.kind, name = %config.name, "loaded workload config");
    Ok(config.into_workload(path))
}

/// Load the component configs listed by a collection.
///
/// `entries` are paths or glob patterns relative to the collection config at
/// `collection_path`. Every file must describe a `ComponentWorkload`.
pub fn load_components(collection_path: &Path, entries: &[String]) -> Result<Vec<ComponentWorkload>> {
    let base_dir = config_dir(collection_path);

    expand_resources(base_dir, entries)?
        .into_iter()
        .map(|path| load_component(&path))
        .collect()
}

fn load_component(path: &Path) -> Result<ComponentWorkload> {
    let workload = load_workload(path).with_context(|| format!("Failed to load component {}", path.display()))?;

    match workload {
        Workload::Component(component) => Ok(component),
        other => Err(WorkloadError::ConfigParse {
            file: path.display().to_string(),
            reason: format!(
                "expected kind ComponentWorkload, found {}",
                other.workload_kind().config_name()
            ),
        }
        .into()),
    }
}
