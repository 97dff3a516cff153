//! Implementation of the `modplan plan` command.
//!
//! Discovers every module manifest under the given root, resolves the
//! dependency graph, and prints the compilation order together with each
//! module's PCH group and effective public dependencies.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use modplan_lib::manifest::discover_modules;
use modplan_lib::resolve::resolve;

pub fn cmd_plan(root: &Path, json: bool) -> Result<()> {
  let store = discover_modules(root)
    .with_context(|| format!("Failed to load module manifests under {}", root.display()))?;

  let plan = resolve(&store).context("Failed to resolve module graph")?;

  if json {
    let out = serde_json::to_string_pretty(&plan).context("Failed to serialize build plan")?;
    println!("{}", out);
    return Ok(());
  }

  println!("{} {} module(s)", "Plan:".bold(), plan.len());
  for module in plan.modules() {
    let group = module
      .pch_group
      .map(|g| g.to_string())
      .unwrap_or_else(|| "-".to_string());

    let deps = module
      .effective_public_dependencies
      .iter()
      .map(|d| d.as_str())
      .collect::<Vec<_>>()
      .join(", ");

    println!(
      "{:>4}  {:<24} {:<8} {} {}",
      module.compile_order_index,
      module.name.to_string(),
      group,
      "→".dimmed(),
      if deps.is_empty() { "(no public deps)".to_string() } else { deps },
    );
  }

  Ok(())
}
