//! llvm-setup - LLVM source tree provisioning
//!
//! Downloads LLVM release archives or checks out trunk, and assembles the
//! core and its sub-projects into one resumable source tree per version.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod acquire;
mod catalog;
mod cli;
mod commands;
mod config;
mod error;
mod handler;
mod layout;
mod ledger;
mod orchestrator;
mod progress;
mod protocol;
#[cfg(test)]
mod test_fixtures;
mod version;

use cli::{Cli, Commands};

/// Environment variable holding the log filter
const LOG_ENV: &str = "LLVM_SETUP_LOG";

fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("warn,llvm_setup=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Setup(args) => commands::setup::run(cli.config.as_deref(), cli.quiet, args),
        Commands::Status(args) => commands::status::run(args),
        Commands::Components => commands::components::run(),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
