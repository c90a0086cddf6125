//! Command-line interface for the workload resolver.
//!
//! Each subcommand lives in its own module with an argument struct and an
//! `execute()` method:
//!
//! - `resolve` - resolve a workload config and print the model as YAML or JSON
//! - `rbac` - print the `+kubebuilder:rbac` marker lines the controller needs
//! - `validate` - run the full pipeline and report success
//!
//! # Usage
//!
//! ```bash
//! workload-resolver resolve workload.yaml --format json
//! workload-resolver rbac collection.yaml
//! workload-resolver --verbose validate workload.yaml
//! ```
//!
//! # Logging
//!
//! `--verbose` selects `debug`, `--quiet` selects `error`. Without either flag
//! `RUST_LOG` is honored when set, otherwise `info` is used. Logs go to stderr so
//! they never mix with the printed model.

mod rbac;
mod resolve;
mod validate;

pub use rbac::RbacCommand;
pub use resolve::{OutputFormat, ResolveCommand};
pub use validate::ValidateCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Explicit tracing filter; `None` defers to `RUST_LOG`
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Configuration with no log level override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Resolve operator workload configs into a generator-ready model.
#[derive(Parser, Debug)]
#[command(name = "workload-resolver", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a workload config and print the resolved model
    Resolve(ResolveCommand),

    /// Print the RBAC marker lines for a workload
    Rbac(RbacCommand),

    /// Check that a workload config resolves cleanly
    Validate(ValidateCommand),
}

impl Cli {
    /// Build a [`CliConfig`] from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig { log_level }
    }

    /// Initialize logging and run the selected subcommand.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Run the selected subcommand with an explicit configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(),
            Commands::Rbac(cmd) => cmd.execute(),
            Commands::Validate(cmd) => cmd.execute(),
        }
    }
}
