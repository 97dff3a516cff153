//! Module descriptor types.
//!
//! A descriptor is the parsed form of one build manifest: the module's name,
//! its precompiled-header policy, and its declared dependency lists. The
//! manifest loader (or any other collaborator) creates descriptors once per
//! build configuration; they are never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A module's unique name within one build configuration.
///
/// Name ordering (ascending, byte-wise) is the deterministic tie-break used
/// throughout resolution, so the same descriptor set always produces the
/// same plan.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(pub String);

impl ModuleName {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for ModuleName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for ModuleName {
  fn from(name: &str) -> Self {
    Self(name.to_string())
  }
}

impl From<String> for ModuleName {
  fn from(name: String) -> Self {
    Self(name)
  }
}

/// Precompiled-header policy declared by a module.
///
/// The serialized spellings match the manifest format
/// (`"UseSharedPCH"` etc.); a manifest that omits the field gets
/// [`PchMode::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PchMode {
  /// The module does not use a precompiled header.
  #[default]
  None,
  /// The module reuses a header shared with compatible neighbours.
  #[serde(rename = "UseSharedPCH")]
  UseSharedPch,
  /// The module supplies its own header and never shares it.
  #[serde(rename = "UseExplicitPCH")]
  UseExplicitPch,
  /// The module prefers its own header but accepts a shared one.
  #[serde(rename = "UseExplicitOrSharedPCH")]
  UseExplicitOrSharedPch,
}

impl PchMode {
  /// Whether a module with this mode may join a shared PCH group.
  pub fn is_sharing_compatible(self) -> bool {
    matches!(self, PchMode::UseSharedPch | PchMode::UseExplicitOrSharedPch)
  }
}

impl std::fmt::Display for PchMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      PchMode::None => "None",
      PchMode::UseSharedPch => "UseSharedPCH",
      PchMode::UseExplicitPch => "UseExplicitPCH",
      PchMode::UseExplicitOrSharedPch => "UseExplicitOrSharedPCH",
    };
    write!(f, "{}", s)
  }
}

/// Visibility of a declared dependency.
///
/// A public dependency is re-exported to the declaring module's own
/// dependents; a private one is visible only inside the declaring module.
/// Both kinds constrain compilation order identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepKind {
  Public,
  Private,
}

/// One module's build manifest, parsed and normalized.
///
/// The constructor collapses duplicate names within each dependency list
/// (keeping first-occurrence order) and drops from the private list any name
/// already declared public, so each referenced module contributes exactly
/// one dependency edge with the stronger visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
  name: ModuleName,
  pch_mode: PchMode,
  public_dependencies: Vec<ModuleName>,
  private_dependencies: Vec<ModuleName>,
}

impl ModuleDescriptor {
  pub fn new(
    name: impl Into<ModuleName>,
    pch_mode: PchMode,
    public_dependencies: Vec<ModuleName>,
    private_dependencies: Vec<ModuleName>,
  ) -> Self {
    let public_dependencies = dedup_in_order(public_dependencies);
    let mut private_dependencies = dedup_in_order(private_dependencies);
    private_dependencies.retain(|d| !public_dependencies.contains(d));

    Self {
      name: name.into(),
      pch_mode,
      public_dependencies,
      private_dependencies,
    }
  }

  pub fn name(&self) -> &ModuleName {
    &self.name
  }

  pub fn pch_mode(&self) -> PchMode {
    self.pch_mode
  }

  pub fn public_dependencies(&self) -> &[ModuleName] {
    &self.public_dependencies
  }

  pub fn private_dependencies(&self) -> &[ModuleName] {
    &self.private_dependencies
  }

  /// All declared dependencies with their visibility, public first.
  ///
  /// This is the combined edge set used for ordering and cycle detection.
  pub fn dependencies(&self) -> impl Iterator<Item = (&ModuleName, DepKind)> {
    self
      .public_dependencies
      .iter()
      .map(|n| (n, DepKind::Public))
      .chain(self.private_dependencies.iter().map(|n| (n, DepKind::Private)))
  }
}

/// Drop repeated names, keeping the first occurrence of each.
fn dedup_in_order(names: Vec<ModuleName>) -> Vec<ModuleName> {
  let mut seen = std::collections::HashSet::new();
  names.into_iter().filter(|n| seen.insert(n.clone())).collect()
}
