//! Companion CLI commands generated for a workload.

use serde::{Deserialize, Serialize};

use crate::utils::naming::{describe, to_file_name, to_var_name};

/// A root command or subcommand of the companion CLI.
///
/// Only `name` and `description` come from the workload config; `var_name` and
/// `file_name` are derived by [`CliCommand::set_common_values`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliCommand {
    /// Command name as typed by users
    #[serde(default)]
    pub name: String,
    /// Help text
    #[serde(default)]
    pub description: String,
    /// Exported identifier of the generated command
    #[serde(default, skip_deserializing)]
    pub var_name: String,
    /// File name stem of the generated command
    #[serde(default, skip_deserializing)]
    pub file_name: String,
}

impl CliCommand {
    /// Command with a name and no description.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether a command name was given.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Fill the description from `template` when empty and derive the identifiers.
    pub fn set_common_values(&mut self, kind: &str, template: &str) {
        if self.description.is_empty() {
            self.description = describe(template, kind);
        }
        self.var_name = to_var_name(&self.name);
        self.file_name = to_file_name(&self.name);
    }
}
