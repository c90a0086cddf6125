//! workload-resolver CLI entry point
//!
//! Parses arguments, runs the selected command and renders errors with context
//! and suggestions:
//! - `resolve` - print the resolved workload model
//! - `rbac` - print the RBAC marker lines
//! - `validate` - check that a workload config resolves

use clap::Parser;
use workload_resolver::cli;
use workload_resolver::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
