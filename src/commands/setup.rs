//! Setup command implementation
//!
//! Resolves configuration, builds the production toolset and hands the
//! request to the orchestrator. Prints one summary line per version.

use std::path::Path;

use console::Style;

use crate::acquire::Toolset;
use crate::cli::SetupArgs;
use crate::config::SetupConfig;
use crate::error::Result;
use crate::orchestrator::{self, SetupRequest, VersionReport};
use crate::progress::ProgressDisplay;

/// Run setup command
pub fn run(config_path: Option<&Path>, quiet: bool, args: SetupArgs) -> Result<()> {
    let config = SetupConfig::discover(config_path)?;
    let tools = Toolset::system()?;
    let request = SetupRequest {
        target: args.target_directory,
        versions: args.versions,
        protocol: args.protocol,
        components: args.components,
    };

    let progress = if quiet {
        ProgressDisplay::hidden()
    } else {
        ProgressDisplay::new(0)
    };

    match orchestrator::provision(&request, &tools, &config, &progress) {
        Ok(reports) => {
            progress.finish();
            for report in &reports {
                print_report(report);
            }
            Ok(())
        }
        Err(e) => {
            progress.abandon();
            Err(e)
        }
    }
}

fn print_report(report: &VersionReport) {
    println!(
        "{} {} {}",
        Style::new().green().bold().apply_to("Ready"),
        Style::new().bold().apply_to(report.version.as_str()),
        Style::new().dim().apply_to(report.root.display())
    );
    println!("  {}", report.installed.join(", "));
}
