//! Resolve a workload config and print the resolved model.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::resolver::resolve_workload;
use crate::workload::Workload;

/// Serialization format of the resolved model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// YAML document
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// `resolve <config> [--format yaml|json]`
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Workload config file
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

impl ResolveCommand {
    /// Resolve the config and print the model to stdout.
    pub fn execute(self) -> Result<()> {
        let workload = resolve_workload(&self.config)?;
        print!("{}", render(&workload, self.format)?);
        Ok(())
    }
}

/// Serialize `workload` in `format`, always ending with a newline.
pub fn render(workload: &Workload, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(workload).context("Failed to serialize workload as YAML"),
        OutputFormat::Json => serde_json::to_string_pretty(workload)
            .map(|json| json + "\n")
            .context("Failed to serialize workload as JSON"),
    }
}
