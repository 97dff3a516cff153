//! Directed dependency graph over registered module descriptors.
//!
//! This module provides a read-only graph view built from a descriptor store
//! snapshot, with structural validation, cycle detection, and deterministic
//! topological ordering. Edges run from dependency to dependent, so a
//! topological order of the graph is a valid compilation order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::descriptor::{DepKind, ModuleName};
use crate::error::ResolveError;
use crate::store::DescriptorStore;

/// Three-color marking for the cycle-detection DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
  Unvisited,
  InProgress,
  Done,
}

/// A read-only dependency graph built from every descriptor in a store.
///
/// The graph owns no descriptors; it only records names and dependency
/// edges. Nodes are inserted in ascending name order so node indices (and
/// everything derived from them) do not depend on registration order.
#[derive(Debug)]
pub struct ModuleGraph {
  graph: DiGraph<ModuleName, DepKind>,
  nodes: HashMap<ModuleName, NodeIndex>,
}

impl ModuleGraph {
  /// Build the graph from every registered descriptor.
  ///
  /// Every dependency name a descriptor references must have a descriptor of
  /// its own. Both public and private dependencies become edges; a module
  /// listed in both lists of one descriptor has already been collapsed to a
  /// single public entry by the descriptor constructor.
  ///
  /// # Errors
  ///
  /// Returns [`ResolveError::UnknownModule`] naming the referencing module
  /// and the missing dependency.
  pub fn from_store(store: &DescriptorStore) -> Result<Self, ResolveError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    let mut names: Vec<&ModuleName> = store.all_modules().map(|d| d.name()).collect();
    names.sort();
    for name in names {
      let idx = graph.add_node(name.clone());
      nodes.insert(name.clone(), idx);
    }

    for descriptor in store.all_modules() {
      let dependent = nodes[descriptor.name()];

      for (dep, kind) in descriptor.dependencies() {
        let Some(&dep_idx) = nodes.get(dep) else {
          return Err(ResolveError::UnknownModule {
            module: descriptor.name().clone(),
            dependency: dep.clone(),
          });
        };
        // Edge from dependency to dependent.
        graph.add_edge(dep_idx, dependent, kind);
      }
    }

    Ok(Self { graph, nodes })
  }

  /// Verify that the graph is acyclic.
  ///
  /// Runs a three-color depth-first traversal over all dependency edges
  /// (public and private alike). Roots and children are visited in ascending
  /// name order, so the reported cycle is the same for the same input. On a
  /// back edge the full cycle path is reconstructed, in "depends on" order
  /// with the entry module repeated at the end.
  ///
  /// # Errors
  ///
  /// Returns [`ResolveError::CyclicDependency`] carrying the cycle path. A
  /// cycle is a hard configuration error; no edge is ever dropped to break
  /// it.
  pub fn check_acyclic(&self) -> Result<(), ResolveError> {
    let mut marks = vec![Mark::Unvisited; self.graph.node_count()];
    let mut path = Vec::new();

    // Nodes were inserted in name order, so index order is name order.
    for root in self.graph.node_indices() {
      if marks[root.index()] == Mark::Unvisited {
        self.visit(root, &mut marks, &mut path)?;
      }
    }
    Ok(())
  }

  fn visit(&self, node: NodeIndex, marks: &mut [Mark], path: &mut Vec<NodeIndex>) -> Result<(), ResolveError> {
    marks[node.index()] = Mark::InProgress;
    path.push(node);

    // Walking incoming edges steps from a module to its dependencies, so the
    // recorded path reads in "depends on" order.
    let mut deps: Vec<NodeIndex> = self.graph.neighbors_directed(node, Direction::Incoming).collect();
    deps.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
    deps.dedup();

    for dep in deps {
      match marks[dep.index()] {
        Mark::Done => {}
        Mark::InProgress => {
          // Back edge: the cycle is the path suffix from the first visit of
          // `dep`, closed by repeating it.
          let start = path.iter().position(|&n| n == dep).unwrap_or(0);
          let mut cycle: Vec<ModuleName> = path[start..].iter().map(|&n| self.graph[n].clone()).collect();
          cycle.push(self.graph[dep].clone());
          return Err(ResolveError::CyclicDependency { cycle });
        }
        Mark::Unvisited => self.visit(dep, marks, path)?,
      }
    }

    path.pop();
    marks[node.index()] = Mark::Done;
    Ok(())
  }

  /// Compute a deterministic topological order of all modules.
  ///
  /// Kahn's algorithm over the combined public+private edge set, selecting
  /// among ready modules by ascending name. The same descriptor set yields
  /// the same order regardless of registration order; reproducible builds
  /// depend on this.
  ///
  /// # Errors
  ///
  /// Returns [`ResolveError::CyclicDependency`] if any modules cannot be
  /// ordered, with the cycle path from the DFS check.
  pub fn topo_order(&self) -> Result<Vec<ModuleName>, ResolveError> {
    let mut in_degree: HashMap<NodeIndex, usize> = HashMap::new();
    let mut ready = BinaryHeap::new();

    for idx in self.graph.node_indices() {
      let degree = self.graph.neighbors_directed(idx, Direction::Incoming).count();
      in_degree.insert(idx, degree);
      if degree == 0 {
        ready.push(Reverse((self.graph[idx].clone(), idx)));
      }
    }

    let mut order = Vec::with_capacity(self.graph.node_count());
    while let Some(Reverse((name, idx))) = ready.pop() {
      order.push(name);

      for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
        if let Some(degree) = in_degree.get_mut(&dependent) {
          *degree = degree.saturating_sub(1);
          if *degree == 0 {
            ready.push(Reverse((self.graph[dependent].clone(), dependent)));
          }
        }
      }
    }

    if order.len() != self.graph.node_count() {
      // Unordered modules remain, so the DFS must find a cycle to report.
      self.check_acyclic()?;
    }

    Ok(order)
  }

  pub fn contains(&self, name: &ModuleName) -> bool {
    self.nodes.contains_key(name)
  }

  pub fn module_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  /// All module names in ascending order.
  pub fn module_names(&self) -> Vec<&ModuleName> {
    self.graph.node_indices().map(|idx| &self.graph[idx]).collect()
  }

  /// A module's direct dependencies with their visibility, name-ascending.
  pub fn direct_dependencies(&self, name: &ModuleName) -> Vec<(&ModuleName, DepKind)> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };

    let mut deps: Vec<(&ModuleName, DepKind)> = self
      .graph
      .edges_directed(idx, Direction::Incoming)
      .map(|edge| (&self.graph[edge.source()], *edge.weight()))
      .collect();
    deps.sort_by(|a, b| a.0.cmp(b.0));
    deps
  }

  /// A module's direct public dependencies, name-ascending.
  pub fn public_dependencies(&self, name: &ModuleName) -> Vec<&ModuleName> {
    self
      .direct_dependencies(name)
      .into_iter()
      .filter(|(_, kind)| *kind == DepKind::Public)
      .map(|(dep, _)| dep)
      .collect()
  }

  /// Modules that directly depend on the given module, name-ascending.
  pub fn dependents(&self, name: &ModuleName) -> Vec<&ModuleName> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };

    let mut out: Vec<&ModuleName> = self
      .graph
      .neighbors_directed(idx, Direction::Outgoing)
      .map(|dep_idx| &self.graph[dep_idx])
      .collect();
    out.sort();
    out.dedup();
    out
  }

  /// Every dependency edge as (dependency, dependent, kind).
  pub fn edges(&self) -> impl Iterator<Item = (&ModuleName, &ModuleName, DepKind)> {
    self
      .graph
      .edge_references()
      .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()], *edge.weight()))
  }
}
