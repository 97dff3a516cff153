//! Descriptor manifest files and source-tree discovery.
//!
//! One module is declared per `<Name>.module.json` file. The file name
//! carries the module's identity, mirroring the one-manifest-per-module
//! convention of the build trees this tool consumes, so a mismatch between
//! file stem and declared name is a configuration defect.
//!
//! # Format
//!
//! ```json
//! {
//!   "module": "Addon",
//!   "pchUsage": "UseExplicitOrSharedPCH",
//!   "publicDependencies": ["Core", "Engine"],
//!   "privateDependencies": ["InputCore"]
//! }
//! ```
//!
//! `pchUsage` and both dependency lists are optional; they default to
//! `"None"` and empty.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::descriptor::{ModuleDescriptor, ModuleName, PchMode};
use crate::error::ResolveError;
use crate::store::DescriptorStore;

/// File name suffix that marks a module manifest.
pub const MANIFEST_SUFFIX: &str = ".module.json";

/// Errors raised while loading descriptor manifests from disk.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read {path}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// The manifest's file stem disagrees with the module name it declares.
  #[error("manifest {path} is named {stem} but declares module {declared}")]
  NameMismatch {
    path: PathBuf,
    stem: String,
    declared: ModuleName,
  },

  #[error(transparent)]
  Walk(#[from] walkdir::Error),

  /// Registration failed, e.g. two manifests declare the same module.
  #[error(transparent)]
  Resolve(#[from] ResolveError),
}

/// On-disk shape of one module manifest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ManifestFile {
  module: ModuleName,
  #[serde(default)]
  pch_usage: PchMode,
  #[serde(default)]
  public_dependencies: Vec<ModuleName>,
  #[serde(default)]
  private_dependencies: Vec<ModuleName>,
}

/// Load a single module manifest.
///
/// When the file name ends in [`MANIFEST_SUFFIX`], the stem must match the
/// declared module name; files loaded directly under other names skip that
/// check.
pub fn load_descriptor(path: &Path) -> Result<ModuleDescriptor, LoadError> {
  let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
    path: path.to_path_buf(),
    source,
  })?;

  let file: ManifestFile = serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  if let Some(stem) = manifest_stem(path)
    && stem != file.module.as_str()
  {
    return Err(LoadError::NameMismatch {
      path: path.to_path_buf(),
      stem: stem.to_string(),
      declared: file.module,
    });
  }

  Ok(ModuleDescriptor::new(
    file.module,
    file.pch_usage,
    file.public_dependencies,
    file.private_dependencies,
  ))
}

/// Walk `root` and load every `*.module.json` into a fresh store.
///
/// Paths are visited in sorted order so registration order (and therefore
/// any error reported first) is stable across runs.
pub fn discover_modules(root: &Path) -> Result<DescriptorStore, LoadError> {
  let mut paths = Vec::new();
  for entry in WalkDir::new(root) {
    let entry = entry?;
    if entry.file_type().is_file() && manifest_stem(entry.path()).is_some() {
      paths.push(entry.into_path());
    }
  }
  paths.sort();

  let mut store = DescriptorStore::new();
  for path in &paths {
    let descriptor = load_descriptor(path)?;
    store.add_module(descriptor)?;
  }

  debug!(root = %root.display(), modules = store.len(), "discovered module manifests");
  Ok(store)
}

/// The module name encoded in a manifest file name, if it has one.
fn manifest_stem(path: &Path) -> Option<&str> {
  path
    .file_name()
    .and_then(|n| n.to_str())
    .and_then(|n| n.strip_suffix(MANIFEST_SUFFIX))
    .filter(|stem| !stem.is_empty())
}
