//! Version command: build version and the defaults this build works with

use console::style;

use crate::catalog;
use crate::config::{self, SetupConfig};
use crate::error::Result;
use crate::layout::LEDGER_FILE;

fn report() -> Vec<String> {
    let defaults = SetupConfig::default();
    let config_path = config::default_config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "none (no user config directory)".to_string());

    vec![
        format!("  Config file: {config_path}"),
        format!("  Config override: --config or {}", crate::cli::CONFIG_ENV),
        format!("  Log filter: {}", crate::LOG_ENV),
        format!("  Ledger file: <target>/<version>/{LEDGER_FILE}"),
        format!("  Trunk protocol: {}", defaults.protocol),
        format!("  Release archives: {}", defaults.release_url),
        format!(
            "  Components: {} ({} + {} satellites)",
            catalog::all().len(),
            catalog::CORE,
            catalog::SATELLITES.len()
        ),
    ]
}

pub fn run() -> Result<()> {
    println!(
        "{} {}",
        style("llvm-setup").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Defaults:");
    for line in report() {
        println!("{line}");
    }
    Ok(())
}
