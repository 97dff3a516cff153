//! Resolved build plan types.
//!
//! A [`BuildPlan`] is the resolver's only output: pure data, fully
//! serializable, safe to hand to a compiler driver or to another thread.
//! Field spellings in the JSON form are camelCase
//! (`compileOrderIndex`, `effectivePublicDependencies`, `pchGroup`).

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::descriptor::ModuleName;

/// Identifier of a precompiled-header sharing group.
///
/// Every module in one group may reuse the same precompiled header. Group
/// ids are assigned deterministically, in ascending name order of each
/// group's first member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PchGroup(pub usize);

impl std::fmt::Display for PchGroup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "pch#{}", self.0)
  }
}

/// Per-module output of resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedModule {
  pub name: ModuleName,

  /// Position in the plan's topological order.
  pub compile_order_index: usize,

  /// Transitive closure over public dependency edges only: every module
  /// whose interface is visible to dependents of this one. Dependencies
  /// reachable only through private edges are excluded.
  pub effective_public_dependencies: BTreeSet<ModuleName>,

  /// PCH sharing group, or `None` for modules that use no precompiled
  /// header.
  pub pch_group: Option<PchGroup>,
}

/// The resolver's output: modules in a valid compilation order.
///
/// For every dependency edge A → B, B appears before A. Recomputed from
/// scratch on every resolution pass; never mutated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildPlan {
  modules: Vec<ResolvedModule>,
  #[serde(skip)]
  index: HashMap<ModuleName, usize>,
}

impl BuildPlan {
  pub(crate) fn new(modules: Vec<ResolvedModule>) -> Self {
    let index = modules.iter().enumerate().map(|(i, m)| (m.name.clone(), i)).collect();
    Self { modules, index }
  }

  /// All resolved modules in compile order.
  pub fn modules(&self) -> &[ResolvedModule] {
    &self.modules
  }

  pub fn get(&self, name: &ModuleName) -> Option<&ResolvedModule> {
    self.index.get(name).map(|&i| &self.modules[i])
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  /// Members of one PCH group, in compile order.
  pub fn pch_group_members(&self, group: PchGroup) -> Vec<&ModuleName> {
    self
      .modules
      .iter()
      .filter(|m| m.pch_group == Some(group))
      .map(|m| &m.name)
      .collect()
  }
}
