//! Check that a workload config resolves cleanly.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::resolver::resolve_workload;
use crate::workload::WorkloadBuilder;

/// `validate <config>`
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Workload config file
    pub config: PathBuf,
}

impl ValidateCommand {
    /// Run the full pipeline and print a summary.
    pub fn execute(self) -> Result<()> {
        let workload = resolve_workload(&self.config)?;

        println!(
            "{} {} workload '{}' is valid",
            "✓".green(),
            workload.workload_kind(),
            workload.name()
        );
        println!("  Spec fields: {}", workload.api_spec_fields().len());
        println!("  Source files: {}", workload.source_files().len());
        if workload.is_collection() {
            println!("  Components: {}", workload.components().len());
        }
        println!("  RBAC rules: {}", workload.rbac_marker_lines().len());

        Ok(())
    }
}
