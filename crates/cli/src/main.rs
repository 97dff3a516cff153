use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

/// modplan - module dependency resolver for build manifests
#[derive(Parser)]
#[command(name = "modplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve module manifests and print the ordered build plan
  Plan {
    /// Root directory to scan for *.module.json manifests
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Emit the plan as JSON
    #[arg(long)]
    json: bool,
  },

  /// Validate module manifests without printing a plan
  Check {
    /// Root directory to scan for *.module.json manifests
    #[arg(default_value = ".")]
    root: PathBuf,
  },

  /// Print each module's direct dependency edges
  Graph {
    /// Root directory to scan for *.module.json manifests
    #[arg(default_value = ".")]
    root: PathBuf,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Plan { root, json } => cmd::cmd_plan(&root, json),
    Commands::Check { root } => cmd::cmd_check(&root),
    Commands::Graph { root } => cmd::cmd_graph(&root),
  }
}
