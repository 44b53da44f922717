//! Components command implementation
//!
//! Prints the catalog: where each component lands under `src/` and what it
//! needs installed first.

use console::Style;

use crate::catalog::{self, ComponentSpec};
use crate::error::Result;

/// Run components command
pub fn run() -> Result<()> {
    println!("Known components ({}):", catalog::all().len());
    println!();
    for spec in catalog::all() {
        println!("{}", describe(spec));
    }
    Ok(())
}

fn describe(spec: &ComponentSpec) -> String {
    let name = Style::new().bold().yellow().apply_to(format!("{:<18}", spec.name));
    let placement = match spec.placement {
        Some(placement) => format!("src/{}", placement.relative_path().display()),
        None => "src/".to_string(),
    };
    let mut line = format!("  {name} {placement}");
    if !spec.dependencies.is_empty() {
        line.push_str(&format!(
            " {} {}",
            Style::new().dim().apply_to("needs"),
            spec.dependencies.join(", ")
        ));
    }
    line
}
