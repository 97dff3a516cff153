//! Implementation of the `modplan check` command.
//!
//! Validates the module graph (unknown references, duplicates, cycles)
//! without printing a plan. Exits non-zero on any configuration defect;
//! a broken graph must be fixed at the source, never worked around.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use modplan_lib::manifest::discover_modules;
use modplan_lib::resolve::resolve;

pub fn cmd_check(root: &Path) -> Result<()> {
  let store = discover_modules(root)
    .with_context(|| format!("Failed to load module manifests under {}", root.display()))?;

  match resolve(&store) {
    Ok(plan) => {
      println!("{} module graph OK ({} module(s))", "✓".green(), plan.len());
      Ok(())
    }
    Err(err) => {
      eprintln!("{} {}", "✗".red(), err);
      std::process::exit(1);
    }
  }
}
