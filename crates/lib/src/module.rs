//! Data-mapper module discovery.
//!
//! Every immediate subdirectory of the data-mapper root is one buildable module.
//! Discovery does not descend further; nested directories belong to the module
//! that contains them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::util::fs::is_source_file;

#[derive(Debug, Error)]
pub enum ScanError {
  #[error("failed to read data mapper directory {}: {source}", path.display())]
  ReadDir { path: PathBuf, source: io::Error },
}

/// A single data-mapper module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
  /// Module name, taken from the directory name.
  pub name: String,
  /// The module's source directory. Collected bundles are written here.
  pub dir: PathBuf,
}

impl Module {
  pub fn new(dir: impl Into<PathBuf>) -> Option<Self> {
    let dir = dir.into();
    let name = dir.file_name()?.to_str()?.to_string();
    Some(Self { name, dir })
  }

  /// Source files of this module, relative to the module directory, in walk order.
  ///
  /// Symlinked files count when their target is a regular file; symlinked
  /// directories are not descended into. Entries that cannot be read are
  /// logged and skipped.
  pub fn source_files(&self) -> Vec<PathBuf> {
    WalkDir::new(&self.dir)
      .sort_by_file_name()
      .into_iter()
      .filter_map(|e| match e {
        Ok(entry) => Some(entry),
        Err(e) => {
          warn!(module = %self.name, error = %e, "failed to read data mapper source entry");
          None
        }
      })
      .filter(|e| e.path().is_file() && is_source_file(e.path()))
      .filter_map(|e| e.path().strip_prefix(&self.dir).ok().map(Path::to_path_buf))
      .collect()
  }
}

/// List the modules under `root`, sorted by name.
pub fn try_scan_modules(root: &Path) -> Result<Vec<Module>, ScanError> {
  let entries = fs::read_dir(root).map_err(|source| ScanError::ReadDir {
    path: root.to_path_buf(),
    source,
  })?;

  let mut modules = Vec::new();
  for entry in entries.flatten() {
    let path = entry.path();
    if !path.is_dir() || path == root {
      continue;
    }

    match Module::new(&path) {
      Some(module) => modules.push(module),
      None => debug!(path = %path.display(), "skipping directory with non UTF-8 name"),
    }
  }

  modules.sort_by(|a, b| a.name.cmp(&b.name));
  Ok(modules)
}

/// List the modules under `root`, treating any read failure as "no modules".
pub fn scan_modules(root: &Path) -> Vec<Module> {
  match try_scan_modules(root) {
    Ok(modules) => {
      debug!(root = %root.display(), count = modules.len(), "discovered data mappers");
      modules
    }
    Err(e) => {
      error!(error = %e, "failed to find data mapper directories");
      Vec::new()
    }
  }
}
