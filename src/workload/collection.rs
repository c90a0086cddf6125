//! Workload collections: a custom resource that owns a set of components.
//!
//! The collection's API carries the fields declared in its own manifests plus every
//! collection field marker found in its components' manifests. Components are kept in
//! dependency order so the generated controller creates them in a valid sequence.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_COLLECTION_ROOTCOMMAND_DESCRIPTION, DEFAULT_COLLECTION_SUBCOMMAND_DESCRIPTION,
    DEFAULT_COLLECTION_SUBCOMMAND_NAME,
};
use crate::core::WorkloadError;
use crate::resolver::dependency_graph::ComponentGraph;
use crate::utils::naming::to_package_name;

use super::api_fields::merge_fields;
use super::rbac::own_resource_rules;
use super::resources::{MarkerOptions, config_dir, process_markers};
use super::{
    APISpec, APISpecField, CliCommand, ComponentWorkload, OwnershipRules, RBACRules, SourceFile,
    WorkloadBuilder, WorkloadKind, WorkloadShared,
};

/// A workload owning component workloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadCollection {
    /// Name, kind and package name
    #[serde(flatten)]
    pub shared: WorkloadShared,
    /// API identity
    pub api: APISpec,
    /// Companion CLI root command
    pub root_command: CliCommand,
    /// Companion CLI subcommand for the collection's own resources
    pub sub_command: CliCommand,
    /// Manifest paths or patterns from the config
    #[serde(skip)]
    pub resources: Vec<String>,
    /// Component config paths or patterns from the config
    #[serde(skip)]
    pub component_files: Vec<String>,
    /// Owned components in dependency order
    pub components: Vec<ComponentWorkload>,
    /// Generated source files for the collection's own children
    pub source_files: Vec<SourceFile>,
    /// Merged spec fields of the collection's custom resource
    pub api_spec_fields: Vec<APISpecField>,
    /// Permissions the collection's controller needs
    pub rbac_rules: RBACRules,
    /// Kinds the collection's controller owns
    pub ownership_rules: OwnershipRules,
    /// Constructor names for every child
    pub create_func_names: Vec<String>,
    /// Constructor names that also run at init
    pub init_func_names: Vec<String>,
}

impl WorkloadCollection {
    /// Empty collection loaded from `config_path`.
    pub fn new(name: impl Into<String>, api: APISpec, config_path: impl Into<PathBuf>) -> Self {
        Self {
            shared: WorkloadShared::new(name, WorkloadKind::Collection, config_path),
            api,
            root_command: CliCommand::default(),
            sub_command: CliCommand::default(),
            resources: Vec::new(),
            component_files: Vec::new(),
            components: Vec::new(),
            source_files: Vec::new(),
            api_spec_fields: Vec::new(),
            rbac_rules: RBACRules::new(),
            ownership_rules: OwnershipRules::new(),
            create_func_names: Vec::new(),
            init_func_names: Vec::new(),
        }
    }

    /// Component by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&ComponentWorkload> {
        self.components.iter().find(|component| component.shared.name == name)
    }
}

impl WorkloadBuilder for WorkloadCollection {
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
        Some(&self.sub_command)
    }

    fn subcommands(&self) -> Vec<&CliCommand> {
        let mut commands = Vec::new();

        // The collection is only a subcommand of itself when it manages children
        if self.has_child_resources() {
            commands.push(&self.sub_command);
        }

        commands.extend(
            self.components
                .iter()
                .filter(|component| component.has_sub_cmd_name())
                .map(|component| &component.sub_command),
        );

        commands
    }

    fn set_resources(&mut self, workload_path: &Path) -> Result<()> {
        let processed =
            process_markers(workload_path, config_dir(workload_path), &self.resources, MarkerOptions::COLLECTION)
                .with_context(|| format!("Failed to process resources for collection '{}'", self.shared.name))?;

        for component in &mut self.components {
            let config_path = component.shared.config_path.clone();
            component.set_resources(&config_path)?;
        }

        // Earlier declarations fix defaults and docs, whatever the dependency order
        let mut declared: Vec<&ComponentWorkload> = self.components.iter().collect();
        declared.sort_by_key(|component| component.declaration_index);

        let mut fields = processed.fields;
        for component in declared {
            fields = merge_fields(fields, component.collection_fields.clone()).with_context(|| {
                format!("Failed to merge collection fields of component '{}'", component.shared.name)
            })?;
        }

        let mut rbac_rules = RBACRules::new();
        rbac_rules.extend(own_resource_rules(&self.api));
        rbac_rules.extend(processed.rbac_rules.as_slice().iter().cloned());

        self.source_files = processed.source_files;
        self.api_spec_fields = fields;
        self.rbac_rules = rbac_rules;
        self.ownership_rules = processed.ownership_rules;
        (self.create_func_names, self.init_func_names) = self.func_names();

        if self.components.is_empty() && !self.has_child_resources() {
            tracing::warn!(collection = %self.shared.name, "collection has no components and no resources");
        }

        Ok(())
    }

    fn set_components(&mut self, components: Vec<ComponentWorkload>) -> Result<(), WorkloadError> {
        let mut seen = HashSet::new();
        for component in &components {
            if !seen.insert(component.shared.name.as_str()) {
                return Err(WorkloadError::DuplicateComponent {
                    name: component.shared.name.clone(),
                });
            }
        }

        let names: Vec<String> = components.iter().map(|c| c.shared.name.clone()).collect();
        let dependencies: Vec<Vec<String>> = components.iter().map(|c| c.dependencies.clone()).collect();
        let order = ComponentGraph::new(&names, &dependencies)?.order()?;

        let collection_dir = config_dir(&self.shared.config_path).to_path_buf();
        let mut slots: Vec<Option<ComponentWorkload>> = components.into_iter().map(Some).collect();
        self.components = order
            .into_iter()
            .filter_map(|i| slots[i].take().map(|component| (i, component)))
            .map(|(i, mut component)| {
                component.declaration_index = i;
                component.set_collection(&self.shared.name, self.api.clone(), &collection_dir);
                component
            })
            .collect();

        tracing::debug!(
            collection = %self.shared.name,
            order = ?self.components.iter().map(|c| c.shared.name.as_str()).collect::<Vec<_>>(),
            "ordered components"
        );

        Ok(())
    }

    fn components(&self) -> &[ComponentWorkload] {
        &self.components
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

        let has_root = self.root_command.has_name();
        for component in &mut self.components {
            if has_root {
                component.default_sub_command_name();
            }
            component.set_names();
        }

        // CLI values only matter when a companion CLI is generated
        if !has_root {
            return;
        }

        self.root_command.set_common_values(&self.api.kind, DEFAULT_COLLECTION_ROOTCOMMAND_DESCRIPTION);

        if !self.sub_command.has_name() {
            self.sub_command.name = DEFAULT_COLLECTION_SUBCOMMAND_NAME.to_string();
        }
        self.sub_command.set_common_values(&self.api.kind, DEFAULT_COLLECTION_SUBCOMMAND_DESCRIPTION);
    }
}
