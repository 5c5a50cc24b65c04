//! Removal of transient build files.
//!
//! Two sweeps exist. [`clean_module`] runs between modules and empties the
//! staging directory of sources and output so the next module starts clean.
//! [`clean_all`] removes everything the run created. Both are best-effort:
//! a failed deletion is logged and recorded, and the sweep moves on.
//!
//! [`CleanupGuard`] ties [`clean_all`] to a scope so it runs on every exit path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::util::fs::is_source_file;
use crate::workspace::Workspace;

#[derive(Debug, Error)]
#[error("failed to delete {}: {source}", path.display())]
pub struct CleanupError {
  pub path: PathBuf,
  #[source]
  pub source: io::Error,
}

#[derive(Debug, Default)]
pub struct CleanupReport {
  /// Files and directories deleted.
  pub removed: Vec<PathBuf>,
  /// Paths that did not exist.
  pub missing: Vec<PathBuf>,
  pub failed: Vec<CleanupError>,
}

impl CleanupReport {
  pub fn is_clean(&self) -> bool {
    self.failed.is_empty()
  }

  pub fn stats(&self) -> CleanupStats {
    CleanupStats {
      removed: self.removed.len(),
      missing: self.missing.len(),
      failed: self.failed.len(),
    }
  }

  fn record(&mut self, path: &Path, result: io::Result<()>) {
    match result {
      Ok(()) => self.removed.push(path.to_path_buf()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "nothing to delete");
        self.missing.push(path.to_path_buf());
      }
      Err(source) => {
        warn!(path = %path.display(), error = %source, "failed to delete");
        self.failed.push(CleanupError {
          path: path.to_path_buf(),
          source,
        });
      }
    }
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanupStats {
  pub removed: usize,
  pub missing: usize,
  pub failed: usize,
}

/// Delete `path` and, for directories, everything below it, children first.
///
/// Symlinks are removed, never followed. Each entry is deleted independently
/// so one failure does not stop the rest.
pub fn remove_recursive(path: &Path, report: &mut CleanupReport) {
  let metadata = match fs::symlink_metadata(path) {
    Ok(m) => m,
    Err(e) => {
      report.record(path, Err(e));
      return;
    }
  };

  if !metadata.is_dir() {
    report.record(path, fs::remove_file(path));
    return;
  }

  match fs::read_dir(path) {
    Ok(entries) => {
      for entry in entries {
        match entry {
          Ok(entry) => remove_recursive(&entry.path(), report),
          Err(e) => report.record(path, Err(e)),
        }
      }
    }
    Err(e) => report.record(path, Err(e)),
  }

  report.record(path, fs::remove_dir(path));
}

/// Clear the staging directory after one module's build.
///
/// Removes staged sources, the staged bundle and the per-module bundler
/// config. Subdirectories left empty by the sweep are kept.
pub fn clean_module(workspace: &Workspace) -> CleanupReport {
  let mut report = CleanupReport::default();
  let staging = workspace.staging_dir();

  let staged: Vec<PathBuf> = WalkDir::new(&staging)
    .into_iter()
    .filter_map(|e| match e {
      Ok(entry) => Some(entry),
      Err(e) => {
        warn!(error = %e, "error while removing data mapper source files");
        None
      }
    })
    .filter(|e| !e.file_type().is_dir() && is_source_file(e.path()))
    .map(|e| e.into_path())
    .collect();

  for file in staged {
    report.record(&file, fs::remove_file(&file));
  }

  let bundle = workspace.bundle_path();
  report.record(&bundle, fs::remove_file(&bundle));

  let bundler_config = workspace.bundler_config_path();
  report.record(&bundler_config, fs::remove_file(&bundler_config));

  debug!(
    removed = report.removed.len(),
    failed = report.failed.len(),
    "cleared staging directory"
  );
  report
}

/// Remove every transient path the pipeline may have created.
pub fn clean_all(workspace: &Workspace) -> CleanupReport {
  info!(root = %workspace.root().display(), "cleaning up data mapper bundling artifacts");

  let mut report = CleanupReport::default();
  for path in workspace.transient_paths() {
    remove_recursive(&path, &mut report);
  }

  if !report.is_clean() {
    warn!(failed = report.failed.len(), "some bundling artifacts could not be removed");
  }
  report
}

/// Runs [`clean_all`] when dropped.
pub struct CleanupGuard<'a> {
  workspace: &'a Workspace,
  armed: bool,
}

impl<'a> CleanupGuard<'a> {
  pub fn new(workspace: &'a Workspace) -> Self {
    Self { workspace, armed: true }
  }

  /// Run the final cleanup now and return its report.
  pub fn finish(mut self) -> CleanupReport {
    self.armed = false;
    clean_all(self.workspace)
  }
}

impl Drop for CleanupGuard<'_> {
  fn drop(&mut self) {
    if self.armed {
      clean_all(self.workspace);
    }
  }
}
