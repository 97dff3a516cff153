//! Registry of module descriptors for one build configuration.

use std::collections::HashMap;

use crate::descriptor::{ModuleDescriptor, ModuleName};
use crate::error::ResolveError;

/// Holds every module descriptor registered for one build.
///
/// Registration must complete before resolution begins: the resolver takes
/// the store by shared reference and treats it as an immutable snapshot.
/// Independent builds (e.g. per target platform) each use their own store;
/// there is no process-wide registry.
#[derive(Debug, Default)]
pub struct DescriptorStore {
  modules: Vec<ModuleDescriptor>,
  index: HashMap<ModuleName, usize>,
}

impl DescriptorStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a descriptor.
  ///
  /// # Errors
  ///
  /// Returns [`ResolveError::DuplicateModule`] if a descriptor with the same
  /// name was already registered in this build.
  pub fn add_module(&mut self, descriptor: ModuleDescriptor) -> Result<(), ResolveError> {
    if self.index.contains_key(descriptor.name()) {
      return Err(ResolveError::DuplicateModule(descriptor.name().clone()));
    }

    self.index.insert(descriptor.name().clone(), self.modules.len());
    self.modules.push(descriptor);
    Ok(())
  }

  /// Look up a descriptor by name.
  ///
  /// # Errors
  ///
  /// Returns [`ResolveError::ModuleNotFound`] if no descriptor with that
  /// name was registered.
  pub fn get_module(&self, name: &ModuleName) -> Result<&ModuleDescriptor, ResolveError> {
    self
      .index
      .get(name)
      .map(|&i| &self.modules[i])
      .ok_or_else(|| ResolveError::ModuleNotFound(name.clone()))
  }

  pub fn contains(&self, name: &ModuleName) -> bool {
    self.index.contains_key(name)
  }

  /// All registered descriptors in insertion order.
  ///
  /// The iterator is restartable; insertion order is not significant to
  /// resolution.
  pub fn all_modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
    self.modules.iter()
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::descriptor::PchMode;

  fn descriptor(name: &str) -> ModuleDescriptor {
    ModuleDescriptor::new(name, PchMode::None, vec![], vec![])
  }

  #[test]
  fn add_and_get_roundtrip() {
    let mut store = DescriptorStore::new();
    store.add_module(descriptor("Core")).unwrap();

    let found = store.get_module(&"Core".into()).unwrap();
    assert_eq!(found.name(), &ModuleName::from("Core"));
    assert!(store.contains(&"Core".into()));
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn duplicate_name_is_rejected() {
    let mut store = DescriptorStore::new();
    store.add_module(descriptor("Core")).unwrap();

    let err = store.add_module(descriptor("Core")).unwrap_err();
    assert_eq!(err, ResolveError::DuplicateModule("Core".into()));
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn missing_module_is_reported() {
    let store = DescriptorStore::new();
    let err = store.get_module(&"Ghost".into()).unwrap_err();
    assert_eq!(err, ResolveError::ModuleNotFound("Ghost".into()));
  }

  #[test]
  fn all_modules_is_insertion_ordered_and_restartable() {
    let mut store = DescriptorStore::new();
    store.add_module(descriptor("Engine")).unwrap();
    store.add_module(descriptor("Addon")).unwrap();
    store.add_module(descriptor("Core")).unwrap();

    let first: Vec<_> = store.all_modules().map(|d| d.name().as_str()).collect();
    let second: Vec<_> = store.all_modules().map(|d| d.name().as_str()).collect();
    assert_eq!(first, vec!["Engine", "Addon", "Core"]);
    assert_eq!(first, second);
  }
}
