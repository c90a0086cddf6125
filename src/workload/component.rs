//! Component workloads: members of a collection.
//!
//! A component manages its own children like a standalone workload, but its manifests
//! may also use collection field markers. Those become `collection.Spec` references
//! and the fields are merged into the owning collection's API.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_COMPONENT_SUBCOMMAND_DESCRIPTION;
use crate::core::WorkloadError;
use crate::utils::naming::to_package_name;

use super::rbac::{collection_read_rule, own_resource_rules};
use super::resources::{MarkerOptions, config_dir, process_markers};
use super::{
    APISpec, APISpecField, CliCommand, OwnershipRules, RBACRules, SourceFile, WorkloadBuilder, WorkloadKind,
    WorkloadShared,
};

/// A workload owned by a [`WorkloadCollection`](super::WorkloadCollection).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentWorkload {
    /// Name, kind and package name
    #[serde(flatten)]
    pub shared: WorkloadShared,
    /// API identity
    pub api: APISpec,
    /// Companion CLI subcommand
    pub sub_command: CliCommand,
    /// Manifest paths or patterns from the config
    #[serde(skip)]
    pub resources: Vec<String>,
    /// Names of sibling components that must be created first
    pub dependencies: Vec<String>,
    /// Name of the owning collection, once attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// API identity of the owning collection, once attached
    #[serde(skip)]
    pub collection_api: Option<APISpec>,
    /// Directory of the owning collection's config; manifest sources are reported relative to it
    #[serde(skip)]
    pub collection_dir: Option<PathBuf>,
    /// Position in the collection config's component list
    #[serde(skip)]
    pub declaration_index: usize,
    /// Generated source files
    pub source_files: Vec<SourceFile>,
    /// Spec fields of the component's own custom resource
    pub api_spec_fields: Vec<APISpecField>,
    /// Fields this component declares on the collection's API
    #[serde(skip)]
    pub collection_fields: Vec<APISpecField>,
    /// Permissions the controller needs
    pub rbac_rules: RBACRules,
    /// Kinds the controller owns
    pub ownership_rules: OwnershipRules,
    /// Constructor names for every child
    pub create_func_names: Vec<String>,
    /// Constructor names that also run at init
    pub init_func_names: Vec<String>,
}

impl ComponentWorkload {
    /// Empty component loaded from `config_path`.
    pub fn new(name: impl Into<String>, api: APISpec, config_path: impl Into<PathBuf>) -> Self {
        Self {
            shared: WorkloadShared::new(name, WorkloadKind::Component, config_path),
            api,
            sub_command: CliCommand::default(),
            resources: Vec::new(),
            dependencies: Vec::new(),
            collection: None,
            collection_api: None,
            collection_dir: None,
            declaration_index: 0,
            source_files: Vec::new(),
            api_spec_fields: Vec::new(),
            collection_fields: Vec::new(),
            rbac_rules: RBACRules::new(),
            ownership_rules: OwnershipRules::new(),
            create_func_names: Vec::new(),
            init_func_names: Vec::new(),
        }
    }

    /// Record the owning collection and the directory of its config file.
    pub fn set_collection(&mut self, name: impl Into<String>, api: APISpec, config_dir: impl Into<PathBuf>) {
        self.collection = Some(name.into());
        self.collection_api = Some(api);
        self.collection_dir = Some(config_dir.into());
    }

    /// Default the subcommand name to the lowercased kind when none is configured.
    pub(crate) fn default_sub_command_name(&mut self) {
        if !self.sub_command.has_name() {
            self.sub_command.name = self.api.kind.to_lowercase();
        }
    }
}

impl WorkloadBuilder for ComponentWorkload {
    fn shared(&self) -> &WorkloadShared {
        &self.shared
    }

    fn api(&self) -> &APISpec {
        &self.api
    }

    fn root_command(&self) -> Option<&CliCommand> {
        None
    }

    fn sub_command(&self) -> Option<&CliCommand> {
        Some(&self.sub_command)
    }

    fn subcommands(&self) -> Vec<&CliCommand> {
        Vec::new()
    }

    fn set_resources(&mut self, workload_path: &Path) -> Result<()> {
        let root_dir = self.collection_dir.as_deref().unwrap_or_else(|| config_dir(workload_path));
        let processed = process_markers(workload_path, root_dir, &self.resources, MarkerOptions::COMPONENT)
            .with_context(|| format!("Failed to process resources for component '{}'", self.shared.name))?;

        let mut rbac_rules = RBACRules::new();
        rbac_rules.extend(own_resource_rules(&self.api));
        if let Some(collection_api) = &self.collection_api {
            rbac_rules.add(collection_read_rule(collection_api));
        }
        rbac_rules.extend(processed.rbac_rules.as_slice().iter().cloned());

        self.source_files = processed.source_files;
        self.api_spec_fields = processed.fields;
        self.collection_fields = processed.collection_fields;
        self.rbac_rules = rbac_rules;
        self.ownership_rules = processed.ownership_rules;
        (self.create_func_names, self.init_func_names) = self.func_names();

        Ok(())
    }

    fn set_components(&mut self, _components: Vec<ComponentWorkload>) -> Result<(), WorkloadError> {
        Err(WorkloadError::UnsupportedOperation {
            operation: "set components".to_string(),
            variant: WorkloadKind::Component,
        })
    }

    fn components(&self) -> &[ComponentWorkload] {
        &[]
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn resources(&self) -> &[String] {
        &self.resources
    }

    fn api_spec_fields(&self) -> &[APISpecField] {
        &self.api_spec_fields
    }

    fn rbac_rules(&self) -> &RBACRules {
        &self.rbac_rules
    }

    fn ownership_rules(&self) -> &OwnershipRules {
        &self.ownership_rules
    }

    fn source_files(&self) -> &[SourceFile] {
        &self.source_files
    }

    fn set_names(&mut self) {
        self.shared.package_name = to_package_name(&self.shared.name);

        if !self.sub_command.has_name() {
            return;
        }

        self.sub_command.set_common_values(&self.api.kind, DEFAULT_COMPONENT_SUBCOMMAND_DESCRIPTION);
    }
}
