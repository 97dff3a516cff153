//! Dependency resolution: validation, ordering, visibility, PCH grouping.
//!
//! [`resolve`] is the single entry point. It consumes a descriptor store as
//! an immutable snapshot and either produces a complete [`BuildPlan`] or
//! fails with a structured error; there is no partial output. Resolution is
//! pure in-memory graph computation with no I/O and no external waits.

use std::collections::{BTreeSet, HashMap};

use petgraph::unionfind::UnionFind;
use tracing::debug;

use crate::descriptor::{ModuleName, PchMode};
use crate::error::ResolveError;
use crate::graph::ModuleGraph;
use crate::plan::{BuildPlan, PchGroup, ResolvedModule};
use crate::store::DescriptorStore;

/// Resolve a store of module descriptors into an ordered build plan.
///
/// Steps, in order:
/// 1. Build the dependency graph, validating that every referenced name has
///    a descriptor.
/// 2. Reject cycles, reporting the full cycle path.
/// 3. Compute the deterministic topological order; each module's
///    `compile_order_index` is its position in it.
/// 4. Propagate effective public dependencies along that order.
/// 5. Assign PCH sharing groups.
///
/// An empty store resolves to an empty plan.
///
/// # Errors
///
/// Any [`ResolveError`] from the validation steps aborts resolution.
pub fn resolve(store: &DescriptorStore) -> Result<BuildPlan, ResolveError> {
  let graph = ModuleGraph::from_store(store)?;
  graph.check_acyclic()?;
  let order = graph.topo_order()?;

  debug!(
    modules = order.len(),
    edges = graph.edge_count(),
    "module graph validated and ordered"
  );

  let mut closures = public_closures(store, &order)?;
  let groups = pch_groups(store, &graph)?;

  let modules = order
    .into_iter()
    .enumerate()
    .map(|(i, name)| ResolvedModule {
      effective_public_dependencies: closures.remove(&name).unwrap_or_default(),
      pch_group: groups.get(&name).copied().flatten(),
      compile_order_index: i,
      name,
    })
    .collect();

  Ok(BuildPlan::new(modules))
}

/// Transitive closure over public edges, one pass in topological order.
///
/// closure(M) = union over M's direct public dependencies D of
/// ({D} ∪ closure(D)). Dependencies come earlier in the order, so each
/// module's closure is complete when it is reached; total cost is linear in
/// edges plus closure sizes, not a full graph walk per module.
fn public_closures(
  store: &DescriptorStore,
  order: &[ModuleName],
) -> Result<HashMap<ModuleName, BTreeSet<ModuleName>>, ResolveError> {
  let mut closures: HashMap<ModuleName, BTreeSet<ModuleName>> = HashMap::with_capacity(order.len());

  for name in order {
    let descriptor = store.get_module(name)?;
    let mut closure = BTreeSet::new();

    for dep in descriptor.public_dependencies() {
      closure.insert(dep.clone());
      if let Some(dep_closure) = closures.get(dep) {
        closure.extend(dep_closure.iter().cloned());
      }
    }

    closures.insert(name.clone(), closure);
  }

  Ok(closures)
}

/// Assign PCH sharing groups.
///
/// Union-find over dependency edges whose endpoints are both
/// sharing-compatible (`UseSharedPCH` or `UseExplicitOrSharedPCH`); each
/// resulting connected component becomes one group. `UseExplicitPCH` modules
/// get a singleton group no other module uses; `None` modules get no group.
/// Ids are handed out in one ascending-name pass, so every group is numbered
/// by its first member in name order.
fn pch_groups(
  store: &DescriptorStore,
  graph: &ModuleGraph,
) -> Result<HashMap<ModuleName, Option<PchGroup>>, ResolveError> {
  // Graph node order is ascending name order.
  let names = graph.module_names();
  let slot: HashMap<&ModuleName, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();

  let mut components: UnionFind<usize> = UnionFind::new(names.len());
  for (dep, dependent, _) in graph.edges() {
    let dep_mode = store.get_module(dep)?.pch_mode();
    let dependent_mode = store.get_module(dependent)?.pch_mode();
    if dep_mode.is_sharing_compatible() && dependent_mode.is_sharing_compatible() {
      components.union(slot[dep], slot[dependent]);
    }
  }

  let mut groups = HashMap::with_capacity(names.len());
  let mut by_representative: HashMap<usize, PchGroup> = HashMap::new();
  let mut next_id = 0;
  let mut fresh = || {
    let id = PchGroup(next_id);
    next_id += 1;
    id
  };

  for name in names {
    let mode = store.get_module(name)?.pch_mode();
    let group = match mode {
      PchMode::None => None,
      PchMode::UseExplicitPch => Some(fresh()),
      PchMode::UseSharedPch | PchMode::UseExplicitOrSharedPch => {
        let representative = components.find(slot[name]);
        Some(*by_representative.entry(representative).or_insert_with(&mut fresh))
      }
    };
    groups.insert(name.clone(), group);
  }

  Ok(groups)
}
