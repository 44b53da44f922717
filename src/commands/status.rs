//! Status command implementation

use console::Style;

use crate::cli::StatusArgs;
use crate::error::Result;
use crate::orchestrator::{self, RootStatus};

/// Run status command
pub fn run(args: StatusArgs) -> Result<()> {
    let roots = orchestrator::status(&args.target_directory, &args.versions)?;

    if roots.is_empty() {
        println!("No managed roots found.");
        return Ok(());
    }

    for root in &roots {
        display_root(root);
        println!();
    }
    Ok(())
}

fn display_root(status: &RootStatus) {
    println!(
        "{} {}",
        Style::new().bold().yellow().apply_to(&status.version),
        Style::new().dim().apply_to(status.root.display())
    );

    if !status.exists {
        println!("    not set up");
        return;
    }

    let installed = if status.installed.is_empty() {
        "-".to_string()
    } else {
        status.installed.join(", ")
    };
    println!(
        "    {} {}",
        Style::new().bold().apply_to("Installed:"),
        installed
    );
    if !status.missing.is_empty() {
        println!(
            "    {} {}",
            Style::new().bold().apply_to("Missing:"),
            status.missing.join(", ")
        );
    }
}
