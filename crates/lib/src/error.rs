//! Errors raised during registration and resolution.
//!
//! A malformed module graph is a configuration defect: every error here
//! aborts resolution outright, no partial plan is produced and nothing is
//! retried.

use thiserror::Error;

use crate::descriptor::ModuleName;

/// Errors from the descriptor store and the graph resolver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
  /// Two descriptors in the same build share a name.
  #[error("duplicate module: {0}")]
  DuplicateModule(ModuleName),

  /// A descriptor references a dependency with no registered descriptor.
  #[error("module {module} depends on unknown module {dependency}")]
  UnknownModule {
    module: ModuleName,
    dependency: ModuleName,
  },

  /// A name was looked up that has no registered descriptor.
  #[error("module not registered: {0}")]
  ModuleNotFound(ModuleName),

  /// The dependency graph contains a cycle.
  ///
  /// The path lists the modules along the cycle in "depends on" order, with
  /// the entry module repeated at the end (`A -> B -> A`).
  #[error("dependency cycle detected: {}", cycle_path(.cycle))]
  CyclicDependency { cycle: Vec<ModuleName> },
}

fn cycle_path(cycle: &[ModuleName]) -> String {
  cycle
    .iter()
    .map(ModuleName::as_str)
    .collect::<Vec<_>>()
    .join(" -> ")
}
