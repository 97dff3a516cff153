//! End-to-end resolution tests over whole descriptor sets.
//!
//! The property tests generate layered dependency graphs (edges only point
//! at lower-numbered modules, so they are acyclic by construction) and check
//! the ordering, visibility and determinism guarantees of `resolve`.

use std::collections::BTreeSet;

use proptest::prelude::*;

use modplan_lib::descriptor::{ModuleDescriptor, ModuleName, PchMode};
use modplan_lib::resolve::resolve;
use modplan_lib::store::DescriptorStore;

/// Raw generated module: PCH mode selector plus (dep, is_public) picks.
type RawModule = (u8, Vec<(usize, bool)>);

fn pch_mode(selector: u8) -> PchMode {
  match selector % 4 {
    0 => PchMode::None,
    1 => PchMode::UseSharedPch,
    2 => PchMode::UseExplicitPch,
    _ => PchMode::UseExplicitOrSharedPch,
  }
}

fn module_name(i: usize) -> ModuleName {
  ModuleName::new(format!("M{i:02}"))
}

/// Turn raw generated modules into descriptors with edges to lower indices.
fn descriptors(raw: &[RawModule]) -> Vec<ModuleDescriptor> {
  raw
    .iter()
    .enumerate()
    .map(|(i, (selector, picks))| {
      let mut public = Vec::new();
      let mut private = Vec::new();
      if i > 0 {
        for (dep, is_public) in picks {
          let name = module_name(dep % i);
          if *is_public {
            public.push(name);
          } else {
            private.push(name);
          }
        }
      }
      ModuleDescriptor::new(module_name(i), pch_mode(*selector), public, private)
    })
    .collect()
}

fn store_in_order(modules: &[ModuleDescriptor], order: &[usize]) -> DescriptorStore {
  let mut store = DescriptorStore::new();
  for &i in order {
    store.add_module(modules[i].clone()).unwrap();
  }
  store
}

fn arb_modules_with_shuffle() -> impl Strategy<Value = (Vec<RawModule>, Vec<usize>)> {
  prop::collection::vec((any::<u8>(), prop::collection::vec((any::<usize>(), any::<bool>()), 0..4)), 1..12)
    .prop_flat_map(|raw| {
      let order: Vec<usize> = (0..raw.len()).collect();
      (Just(raw), Just(order).prop_shuffle())
    })
}

proptest! {
  #[test]
  fn every_dependency_compiles_before_its_dependent((raw, _) in arb_modules_with_shuffle()) {
    let modules = descriptors(&raw);
    let order: Vec<usize> = (0..modules.len()).collect();
    let plan = resolve(&store_in_order(&modules, &order)).unwrap();

    for descriptor in &modules {
      let dependent = plan.get(descriptor.name()).unwrap();
      for (dep, _) in descriptor.dependencies() {
        let dep = plan.get(dep).unwrap();
        prop_assert!(dep.compile_order_index < dependent.compile_order_index);
      }
    }
  }

  #[test]
  fn plans_are_identical_across_registration_orders((raw, shuffle) in arb_modules_with_shuffle()) {
    let modules = descriptors(&raw);
    let in_order: Vec<usize> = (0..modules.len()).collect();

    let a = resolve(&store_in_order(&modules, &in_order)).unwrap();
    let b = resolve(&store_in_order(&modules, &shuffle)).unwrap();
    prop_assert_eq!(a, b);
  }

  #[test]
  fn closure_satisfies_its_recurrence((raw, _) in arb_modules_with_shuffle()) {
    let modules = descriptors(&raw);
    let order: Vec<usize> = (0..modules.len()).collect();
    let plan = resolve(&store_in_order(&modules, &order)).unwrap();

    for descriptor in &modules {
      let resolved = plan.get(descriptor.name()).unwrap();

      let mut expected = BTreeSet::new();
      for dep in descriptor.public_dependencies() {
        expected.insert(dep.clone());
        expected.extend(plan.get(dep).unwrap().effective_public_dependencies.iter().cloned());
      }

      prop_assert_eq!(&resolved.effective_public_dependencies, &expected);

      // Nothing reachable only through private edges leaks in.
      for dep in descriptor.private_dependencies() {
        if !expected.contains(dep) {
          prop_assert!(!resolved.effective_public_dependencies.contains(dep));
        }
      }
    }
  }

  #[test]
  fn sharing_incompatible_modules_never_share_groups((raw, _) in arb_modules_with_shuffle()) {
    let modules = descriptors(&raw);
    let order: Vec<usize> = (0..modules.len()).collect();
    let plan = resolve(&store_in_order(&modules, &order)).unwrap();

    for descriptor in &modules {
      let resolved = plan.get(descriptor.name()).unwrap();
      match descriptor.pch_mode() {
        PchMode::None => prop_assert!(resolved.pch_group.is_none()),
        PchMode::UseExplicitPch => {
          let group = resolved.pch_group.unwrap();
          prop_assert_eq!(plan.pch_group_members(group).len(), 1);
        }
        _ => prop_assert!(resolved.pch_group.is_some()),
      }
    }
  }
}

#[test]
fn engine_style_module_set_resolves_end_to_end() {
  let mut store = DescriptorStore::new();
  let modules: [(&str, PchMode, Vec<&str>, Vec<&str>); 6] = [
    ("Core", PchMode::UseSharedPch, vec![], vec![]),
    ("CoreUObject", PchMode::UseSharedPch, vec!["Core"], vec![]),
    ("Engine", PchMode::UseSharedPch, vec!["Core", "CoreUObject"], vec![]),
    ("InputCore", PchMode::UseSharedPch, vec!["Core"], vec![]),
    ("EnhancedInput", PchMode::UseSharedPch, vec!["Core", "InputCore"], vec![]),
    (
      "Addon",
      PchMode::UseExplicitOrSharedPch,
      vec!["Core", "CoreUObject", "Engine", "InputCore", "EnhancedInput"],
      vec![],
    ),
  ];
  for (name, mode, public, private) in modules {
    let public = public.into_iter().map(ModuleName::from).collect();
    let private = private.into_iter().map(ModuleName::from).collect();
    store.add_module(ModuleDescriptor::new(name, mode, public, private)).unwrap();
  }

  let plan = resolve(&store).unwrap();
  assert_eq!(plan.len(), 6);

  let addon = plan.get(&"Addon".into()).unwrap();
  assert_eq!(addon.compile_order_index, plan.len() - 1);
  assert_eq!(addon.effective_public_dependencies.len(), 5);

  // Everything here is sharing-compatible and connected: one PCH group.
  let group = addon.pch_group.unwrap();
  assert_eq!(plan.pch_group_members(group).len(), 6);
}
