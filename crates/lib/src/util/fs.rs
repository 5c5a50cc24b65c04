//! Filesystem helpers.

use std::path::{Path, PathBuf};

use crate::consts::SOURCE_EXTENSION;

/// Returns true if `path` names a file with the recognized source extension.
pub fn is_source_file(path: &Path) -> bool {
  path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Joins `path` onto `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    base.join(path)
  }
}
