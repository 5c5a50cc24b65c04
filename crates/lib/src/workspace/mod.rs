//! Transient build workspace.
//!
//! The workspace is the working directory the toolchain runs in. This module
//! owns its path layout and writes the generated configuration files:
//! - `package.json` declaring the toolchain dependencies and `build` script
//! - `tsconfig.json` scoping compilation to the staging directory
//! - `webpack.config.js`, regenerated for every module
//!
//! Writes are reported as errors but the pipeline does not stop on them; a
//! missing file surfaces later as a failed build step.

mod templates;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{
  BUNDLED_JS_FILE_NAME, NODE_DIR_NAME, NODE_MODULES_DIR_NAME, PACKAGE_JSON_FILE_NAME, PACKAGE_LOCK_FILE_NAME,
  POM_FILE_NAME, STAGING_DIR_NAME, TARGET_DIR_NAME, TS_CONFIG_FILE_NAME, WEBPACK_CONFIG_FILE_NAME,
};

pub use templates::{WEBPACK_CONFIG_TEMPLATE, package_json, tsconfig_json, webpack_config};

#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },

  #[error("failed to render {}: {source}", path.display())]
  Render { path: PathBuf, source: serde_json::Error },
}

/// Path layout of the build workspace, rooted at the toolchain's working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
  root: PathBuf,
}

impl Workspace {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// The Maven build descriptor the toolchain is invoked against.
  pub fn build_descriptor(&self) -> PathBuf {
    self.root.join(POM_FILE_NAME)
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.root.join(PACKAGE_JSON_FILE_NAME)
  }

  pub fn lock_file_path(&self) -> PathBuf {
    self.root.join(PACKAGE_LOCK_FILE_NAME)
  }

  pub fn compiler_config_path(&self) -> PathBuf {
    self.root.join(TS_CONFIG_FILE_NAME)
  }

  pub fn bundler_config_path(&self) -> PathBuf {
    self.root.join(WEBPACK_CONFIG_FILE_NAME)
  }

  /// Shared directory holding the sources of the module currently being built.
  pub fn staging_dir(&self) -> PathBuf {
    self.root.join(STAGING_DIR_NAME)
  }

  /// Where the bundler writes its single output file.
  pub fn bundle_path(&self) -> PathBuf {
    self.staging_dir().join(BUNDLED_JS_FILE_NAME)
  }

  /// Local Node/npm install created by the bootstrap step.
  pub fn runtime_dir(&self) -> PathBuf {
    self.root.join(NODE_DIR_NAME)
  }

  pub fn dependency_dir(&self) -> PathBuf {
    self.root.join(NODE_MODULES_DIR_NAME)
  }

  /// Compiler output directory (`outDir` in tsconfig).
  pub fn output_dir(&self) -> PathBuf {
    self.root.join(TARGET_DIR_NAME)
  }

  /// Every path the pipeline may leave behind, in final-cleanup order.
  pub fn transient_paths(&self) -> Vec<PathBuf> {
    vec![
      self.manifest_path(),
      self.compiler_config_path(),
      self.bundler_config_path(),
      self.lock_file_path(),
      self.staging_dir(),
      self.runtime_dir(),
      self.dependency_dir(),
      self.output_dir(),
    ]
  }

  /// Create the staging directory if it does not exist yet.
  pub fn ensure_staging_dir(&self) -> Result<(), WorkspaceError> {
    let staging = self.staging_dir();
    if staging.is_dir() {
      return Ok(());
    }

    fs::create_dir_all(&staging).map_err(|source| WorkspaceError::CreateDir { path: staging, source })
  }

  pub fn write_manifest(&self) -> Result<PathBuf, WorkspaceError> {
    let path = self.manifest_path();
    write_json(&path, &package_json())?;
    Ok(path)
  }

  pub fn write_compiler_config(&self) -> Result<PathBuf, WorkspaceError> {
    let path = self.compiler_config_path();
    write_json(&path, &tsconfig_json())?;
    Ok(path)
  }

  /// Write the bundler config targeting `<staging>/<module_name>.ts`.
  pub fn write_bundler_config(&self, module_name: &str) -> Result<PathBuf, WorkspaceError> {
    let path = self.bundler_config_path();
    write_file(&path, &webpack_config(module_name))?;
    debug!(module = %module_name, path = %path.display(), "wrote bundler config");
    Ok(path)
  }

  /// Create the staging directory and the run-wide config files.
  ///
  /// Every step is attempted; the errors of those that failed are returned.
  pub fn prepare(&self) -> Vec<WorkspaceError> {
    info!(root = %self.root.display(), "creating data mapper artifacts");

    [
      self.ensure_staging_dir(),
      self.write_manifest().map(drop),
      self.write_compiler_config().map(drop),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
  }
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<(), WorkspaceError> {
  let content = serde_json::to_string_pretty(value).map_err(|source| WorkspaceError::Render {
    path: path.to_path_buf(),
    source,
  })?;
  write_file(path, &content)
}

fn write_file(path: &Path, content: &str) -> Result<(), WorkspaceError> {
  fs::write(path, content).map_err(|source| WorkspaceError::WriteFile {
    path: path.to_path_buf(),
    source,
  })
}
