//! Print the RBAC marker lines for a workload.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::resolver::resolve_workload;

/// `rbac <config>`
#[derive(Args, Debug)]
pub struct RbacCommand {
    /// Workload config file
    pub config: PathBuf,
}

impl RbacCommand {
    /// Print one `// +kubebuilder:rbac` line per rule, own-resource rules first.
    pub fn execute(self) -> Result<()> {
        let workload = resolve_workload(&self.config)?;
        for line in workload.rbac_marker_lines() {
            println!("// {line}");
        }
        Ok(())
    }
}
