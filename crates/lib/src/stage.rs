//! Moving files between a module directory and the staging workspace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::module::Module;

#[derive(Debug, Error)]
pub enum StageError {
  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: io::Error,
  },

  #[error("bundle path has no file name: {}", path.display())]
  NoFileName { path: PathBuf },
}

/// Outcome of staging one module's sources.
#[derive(Debug, Default)]
pub struct StageReport {
  /// Staged files, relative to the staging directory.
  pub copied: Vec<PathBuf>,
  pub failed: Vec<StageError>,
}

impl StageReport {
  pub fn is_complete(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Copy every source file of `module` into `staging_dir`, keeping module-relative paths.
///
/// Existing files are overwritten. A failed copy is logged and recorded, and
/// the remaining files are still staged.
pub fn stage_in(module: &Module, staging_dir: &Path) -> StageReport {
  let mut report = StageReport::default();

  for relative in module.source_files() {
    let from = module.dir.join(&relative);
    let to = staging_dir.join(&relative);

    match copy_file(&from, &to) {
      Ok(()) => {
        debug!(module = %module.name, file = %relative.display(), "staged source file");
        report.copied.push(relative);
      }
      Err(e) => {
        error!(module = %module.name, error = %e, "failed to copy data mapper file");
        report.failed.push(e);
      }
    }
  }

  report
}

/// Copy the produced bundle into the module directory under the bundle's file name.
pub fn collect_out(bundle_path: &Path, module: &Module) -> Result<PathBuf, StageError> {
  info!(module = %module.name, bundle = %bundle_path.display(), "copying bundled js file");

  let file_name = bundle_path.file_name().ok_or_else(|| StageError::NoFileName {
    path: bundle_path.to_path_buf(),
  })?;
  let dest = module.dir.join(file_name);

  copy_file(bundle_path, &dest)?;
  Ok(dest)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), StageError> {
  let wrap = |source| StageError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  };

  if let Some(parent) = to.parent() {
    fs::create_dir_all(parent).map_err(wrap)?;
  }
  fs::copy(from, to).map_err(wrap)?;
  Ok(())
}
