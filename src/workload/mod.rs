//! Workload model: the three workload variants and the contract they share.
//!
//! A workload is the unit an operator manages: one custom resource kind plus the
//! Kubernetes objects (children) created for it. Workloads come in three variants:
//!
//! - [`StandaloneWorkload`] - one custom resource managing its own children
//! - [`WorkloadCollection`] - a custom resource owning a set of components and
//!   optionally children of its own
//! - [`ComponentWorkload`] - a member of a collection that may depend on sibling
//!   components and reference the collection's spec fields
//!
//! Each variant implements [`WorkloadBuilder`]. The [`Workload`] enum wraps the
//! variants and delegates to them, so callers can handle any config uniformly.
//!
//! # Resolution order
//!
//! 1. [`WorkloadBuilder::validate`] checks the API identity
//! 2. [`WorkloadBuilder::set_components`] attaches and orders components (collections)
//! 3. [`WorkloadBuilder::set_names`] derives package and command names
//! 4. [`WorkloadBuilder::set_resources`] lexes manifests into source files, spec
//!    fields, RBAC and ownership rules

pub mod api_fields;
pub mod cli_command;
pub mod collection;
pub mod component;
pub mod rbac;
pub mod resources;
pub mod source;
pub mod standalone;

#[cfg(test)]
mod standalone_tests;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::WorkloadError;
use crate::utils::naming::to_plural;

pub use api_fields::{APISpecField, FieldType};
pub use cli_command::CliCommand;
pub use collection::WorkloadCollection;
pub use component::ComponentWorkload;
pub use rbac::{OwnershipRule, OwnershipRules, RBACRule, RBACRules};
pub use source::{ChildResource, SourceFile};
pub use standalone::StandaloneWorkload;

/// Variant of a workload, as named by the `kind` of its config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadKind {
    /// `StandaloneWorkload`
    #[serde(rename = "StandaloneWorkload")]
    Standalone,
    /// `WorkloadCollection`
    #[serde(rename = "WorkloadCollection")]
    Collection,
    /// `ComponentWorkload`
    #[serde(rename = "ComponentWorkload")]
    Component,
}

impl WorkloadKind {
    /// The `kind` value used in workload config files.
    #[must_use]
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Standalone => "StandaloneWorkload",
            Self::Collection => "WorkloadCollection",
            Self::Component => "ComponentWorkload",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::Collection => write!(f, "collection"),
            Self::Component => write!(f, "component"),
        }
    }
}

/// API identity of a workload's custom resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APISpec {
    /// API domain, e.g. `acme.com`
    #[serde(default)]
    pub domain: String,
    /// API group, e.g. `apps`
    #[serde(default)]
    pub group: String,
    /// API version, e.g. `v1alpha1`
    #[serde(default)]
    pub version: String,
    /// Custom resource kind, e.g. `WebStore`
    #[serde(default)]
    pub kind: String,
    /// Whether the custom resource is cluster scoped
    #[serde(default)]
    pub cluster_scoped: bool,
}

impl APISpec {
    /// Fully qualified API group (`apps.acme.com`).
    #[must_use]
    pub fn resource_group(&self) -> String {
        format!("{}.{}", self.group, self.domain)
    }

    /// Plural resource name of the custom resource.
    #[must_use]
    pub fn plural(&self) -> String {
        to_plural(&self.kind)
    }
}

/// Fields every workload variant carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadShared {
    /// Workload name from the config
    pub name: String,
    /// Variant
    pub kind: WorkloadKind,
    /// Go package name, derived by `set_names`
    pub package_name: String,
    /// Config file this workload was loaded from
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl WorkloadShared {
    /// Shared fields for a workload loaded from `config_path`.
    pub fn new(name: impl Into<String>, kind: WorkloadKind, config_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            package_name: String::new(),
            config_path: config_path.into(),
        }
    }
}

/// Contract shared by every workload variant.
///
/// Accessors have default implementations in terms of [`shared`](Self::shared) and
/// [`api`](Self::api); variants implement the operations that differ.
pub trait WorkloadBuilder {
    /// Shared name and kind fields.
    fn shared(&self) -> &WorkloadShared;

    /// API identity.
    fn api(&self) -> &APISpec;

    /// Check that name and API identity are present.
    ///
    /// Every missing field is reported in a single [`WorkloadError::Validation`].
    fn validate(&self) -> Result<(), WorkloadError> {
        let api = self.api();
        let missing: Vec<String> = [
            ("name", self.name()),
            ("spec.api.domain", api.domain.as_str()),
            ("spec.api.group", api.group.as_str()),
            ("spec.api.version", api.version.as_str()),
            ("spec.api.kind", api.kind.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field.to_string())
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(WorkloadError::Validation {
                workload: self.name().to_string(),
                missing,
            })
        }
    }

    /// Variant of this workload.
    fn workload_kind(&self) -> WorkloadKind {
        self.shared().kind
    }

    /// Workload name.
    fn name(&self) -> &str {
        &self.shared().name
    }

    /// Go package name; empty until [`set_names`](Self::set_names) runs.
    fn package_name(&self) -> &str {
        &self.shared().package_name
    }

    /// API domain.
    fn api_domain(&self) -> &str {
        &self.api().domain
    }

    /// API group.
    fn api_group(&self) -> &str {
        &self.api().group
    }

    /// API version.
    fn api_version(&self) -> &str {
        &self.api().version
    }

    /// Custom resource kind.
    fn api_kind(&self) -> &str {
        &self.api().kind
    }

    /// Whether the custom resource is cluster scoped.
    fn is_cluster_scoped(&self) -> bool {
        self.api().cluster_scoped
    }

    /// Companion CLI root command, for variants that have one.
    fn root_command(&self) -> Option<&CliCommand>;

    /// Companion CLI subcommand, for variants that have one.
    fn sub_command(&self) -> Option<&CliCommand>;

    /// Subcommands generated under the root command.
    fn subcommands(&self) -> Vec<&CliCommand>;

    /// Whether a root command name was configured.
    fn has_root_cmd_name(&self) -> bool {
        self.root_command().is_some_and(CliCommand::has_name)
    }

    /// Whether a subcommand name was configured or defaulted.
    fn has_sub_cmd_name(&self) -> bool {
        self.sub_command().is_some_and(CliCommand::has_name)
    }

    /// Lex the workload's manifests. `workload_path` is its config file.
    fn set_resources(&mut self, workload_path: &Path) -> Result<()>;

    /// Attach components; only collections accept them.
    fn set_components(&mut self, components: Vec<ComponentWorkload>) -> Result<(), WorkloadError>;

    /// Owned components in dependency order.
    fn components(&self) -> &[ComponentWorkload];

    /// Names of sibling components this workload depends on.
    fn dependencies(&self) -> &[String];

    /// Manifest paths or patterns listed in the config.
    fn resources(&self) -> &[String];

    /// Merged spec fields of the custom resource.
    fn api_spec_fields(&self) -> &[APISpecField];

    /// Permissions the controller needs.
    fn rbac_rules(&self) -> &RBACRules;

    /// Kinds the controller owns.
    fn ownership_rules(&self) -> &OwnershipRules;

    /// Generated source files.
    fn source_files(&self) -> &[SourceFile];

    /// Create and init constructor names across all source files.
    fn func_names(&self) -> (Vec<String>, Vec<String>) {
        source::func_names(self.source_files())
    }

    /// Whether the workload manages children of its own, judged by its config.
    fn has_child_resources(&self) -> bool {
        !self.resources().is_empty()
    }

    /// Derive the package name and companion CLI names. Idempotent.
    fn set_names(&mut self);

    /// Whether this is a standalone workload.
    fn is_standalone(&self) -> bool {
        self.workload_kind() == WorkloadKind::Standalone
    }

    /// Whether this is a collection.
    fn is_collection(&self) -> bool {
        self.workload_kind() == WorkloadKind::Collection
    }

    /// Whether this is a component.
    fn is_component(&self) -> bool {
        self.workload_kind() == WorkloadKind::Component
    }
}

/// Any workload variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Workload {
    /// A standalone workload
    Standalone(StandaloneWorkload),
    /// A collection of components
    Collection(WorkloadCollection),
    /// A single component
    Component(ComponentWorkload),
}

macro_rules! delegate {
    ($self:ident, $inner:ident => $call:expr) => {
        match $self {
            Workload::Standalone($inner) => $call,
            Workload::Collection($inner) => $call,
            Workload::Component($inner) => $call,
        }
    };
}

impl Workload {
    /// The collection, when this is one.
    #[must_use]
    pub fn as_collection(&self) -> Option<&WorkloadCollection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Own-resource rules followed by child rules, rendered as marker lines.
    ///
    /// For a collection, component rules follow in component order.
    #[must_use]
    pub fn rbac_marker_lines(&self) -> Vec<String> {
        let mut rules = self.rbac_rules().clone();
        for component in self.components() {
            rules.extend(component.rbac_rules().as_slice().iter().cloned());
        }
        rules.marker_lines()
    }
}

impl WorkloadBuilder for Workload {
    fn shared(&self) -> &WorkloadShared {
        delegate!(self, w => w.shared())
    }

    fn api(&self) -> &APISpec {
        delegate!(self, w => w.api())
    }

    fn validate(&self) -> Result<(), WorkloadError> {
        delegate!(self, w => w.validate())
    }

    fn root_command(&self) -> Option<&CliCommand> {
        delegate!(self, w => w.root_command())
    }

    fn sub_command(&self) -> Option<&CliCommand> {
        delegate!(self, w => w.sub_command())
    }

    fn subcommands(&self) -> Vec<&CliCommand> {
        delegate!(self, w => w.subcommands())
    }

    fn set_resources(&mut self, workload_path: &Path) -> Result<()> {
        delegate!(self, w => w.set_resources(workload_path))
    }

    fn set_components(&mut self, components: Vec<ComponentWorkload>) -> Result<(), WorkloadError> {
        delegate!(self, w => w.set_components(components))
    }

    fn components(&self) -> &[ComponentWorkload] {
        delegate!(self, w => w.components())
    }

    fn dependencies(&self) -> &[String] {
        delegate!(self, w => w.dependencies())
    }

    fn resources(&self) -> &[String] {
        delegate!(self, w => w.resources())
    }

    fn api_spec_fields(&self) -> &[APISpecField] {
        delegate!(self, w => w.api_spec_fields())
    }

    fn rbac_rules(&self) -> &RBACRules {
        delegate!(self, w => w.rbac_rules())
    }

    fn ownership_rules(&self) -> &OwnershipRules {
        delegate!(self, w => w.ownership_rules())
    }

    fn source_files(&self) -> &[SourceFile] {
        delegate!(self, w => w.source_files())
    }

    fn has_child_resources(&self) -> bool {
        delegate!(self, w => w.has_child_resources())
    }

    fn set_names(&mut self) {
        delegate!(self, w => w.set_names());
    }
}

impl From<StandaloneWorkload> for Workload {
    fn from(workload: StandaloneWorkload) -> Self {
        Self::Standalone(workload)
    }
}

impl From<WorkloadCollection> for Workload {
    fn from(workload: WorkloadCollection) -> Self {
        Self::Collection(workload)
    }
}

impl From<ComponentWorkload> for Workload {
    fn from(workload: ComponentWorkload) -> Self {
        Self::Component(workload)
    }
}
