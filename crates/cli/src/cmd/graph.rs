//! Implementation of the `modplan graph` command.
//!
//! Prints each module's direct dependency edges. Works on cyclic graphs too
//! (only unknown references fail here), which makes it the tool to reach for
//! when `check` reports a cycle.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use modplan_lib::descriptor::{DepKind, ModuleName};
use modplan_lib::graph::ModuleGraph;
use modplan_lib::manifest::discover_modules;
use modplan_lib::store::DescriptorStore;

pub fn cmd_graph(root: &Path) -> Result<()> {
  let store = discover_modules(root)
    .with_context(|| format!("Failed to load module manifests under {}", root.display()))?;

  let graph = ModuleGraph::from_store(&store).context("Failed to build module graph")?;

  println!(
    "{} {} module(s), {} edge(s)",
    "Graph:".bold(),
    graph.module_count(),
    graph.edge_count()
  );

  for name in graph.module_names() {
    let mode = pch_mode_of(&store, name);
    println!("{} {}", name.to_string().bold(), format!("({mode})").dimmed());

    for (dep, kind) in graph.direct_dependencies(name) {
      let visibility = match kind {
        DepKind::Public => "public",
        DepKind::Private => "private",
      };
      println!("  {} {} [{}]", "→".dimmed(), dep, visibility);
    }
  }

  Ok(())
}

fn pch_mode_of(store: &DescriptorStore, name: &ModuleName) -> String {
  store
    .get_module(name)
    .map(|d| d.pch_mode().to_string())
    .unwrap_or_else(|_| "?".to_string())
}
