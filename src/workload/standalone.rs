//! Standalone workloads: a single custom resource managing its own children.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_STANDALONE_DESCRIPTION;
use crate::core::WorkloadError;
use crate::utils::naming::to_package_name;

use super::rbac::own_resource_rules;
use super::resources::{MarkerOptions, config_dir, process_markers};
use super::{
    APISpec, APISpecField, CliCommand, ComponentWorkload, OwnershipRules, RBACRules, SourceFile,
    WorkloadBuilder, WorkloadKind, WorkloadShared,
};

/// A workload that never owns components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneWorkload {
    /// Name, kind and package name
    #[serde(flatten)]
    pub shared: WorkloadShared,
    /// API identity
    pub api: APISpec,
    /// Companion CLI root command
    pub root_command: CliCommand,
    /// Manifest paths or patterns from the config
    #[serde(skip)]
    pub resources: Vec<String>,
    /// Generated source files
    pub source_files: Vec<SourceFile>,
    /// Spec fields of the custom resource
    pub api_spec_fields: Vec<APISpecField>,
    /// Permissions the controller needs
    pub rbac_rules: RBACRules,
    /// Kinds the controller owns
    pub ownership_rules: OwnershipRules,
    /// Constructor names for every child
    pub create_func_names: Vec<String>,
    /// Constructor names that also run at init
    pub init_func_names: Vec<String>,
}

impl StandaloneWorkload {
    /// Empty standalone workload loaded from `config_path`.
    pub fn new(name: impl Into<String>, api: APISpec, config_path: impl Into<PathBuf>) -> Self {
        Self {
            shared: WorkloadShared::new(name, WorkloadKind::Standalone, config_path),
            api,
            root_command: CliCommand::default(),
            resources: Vec::new(),
            source_files: Vec::new(),
            api_spec_fields: Vec::new(),
            rbac_rules: RBACRules::new(),
            ownership_rules: OwnershipRules::new(),
            create_func_names: Vec::new(),
            init_func_names: Vec::new(),
        }
    }
}

impl WorkloadBuilder for StandaloneWorkload {
    fn shared(&self) -> &WorkloadShared {
        &self.shared
    }

    fn api(&self) -> &APISpec {
        &self.api
    }

    fn root_command(&self) -> Option<&CliCommand> {
        Some(&self.root_command)
    }

    fn sub_command(&self) -> Option<&CliCommand> {
        None
    }

    fn subcommands(&self) -> Vec<&CliCommand> {
        Vec::new()
    }

    fn set_resources(&mut self, workload_path: &Path) -> Result<()> {
        let processed =
            process_markers(workload_path, config_dir(workload_path), &self.resources, MarkerOptions::STANDALONE)
            .with_context(|| format!("Failed to process resources for workload '{}'", self.shared.name))?;

        let mut rbac_rules = RBACRules::new();
        rbac_rules.extend(own_resource_rules(&self.api));
        rbac_rules.extend(processed.rbac_rules.as_slice().iter().cloned());

        self.source_files = processed.source_files;
        self.api_spec_fields = processed.fields;
        self.rbac_rules = rbac_rules;
        self.ownership_rules = processed.ownership_rules;
        (self.create_func_names, self.init_func_names) = self.func_names();

        Ok(())
    }

    fn set_components(&mut self, _components: Vec<ComponentWorkload>) -> Result<(), WorkloadError> {
        Err(WorkloadError::UnsupportedOperation {
            operation: "set components".to_string(),
            variant: WorkloadKind::Standalone,
        })
    }

    fn components(&self) -> &[ComponentWorkload] {
        &[]
    }

    fn dependencies(&self) -> &[String] {
        &[]
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

        // CLI values only matter when a companion CLI is generated
        if !self.root_command.has_name() {
            return;
        }

        self.root_command.set_common_values(&self.api.kind, DEFAULT_STANDALONE_DESCRIPTION);
    }
}
