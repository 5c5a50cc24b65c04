//! Bundle orchestration.
//!
//! This module provides the high-level `bundle` function that runs the full
//! pipeline:
//!
//! 1. Locate the toolchain installation
//! 2. Create the staging directory and run-wide config files
//! 3. Install Node and npm
//! 4. Install npm dependencies
//! 5. For each data mapper: stage sources, write the bundler config, build,
//!    collect the bundle and clear the staging directory
//! 6. Remove every transient file
//!
//! Modules are built one at a time; they share the staging directory and the
//! bundle output path. Step 6 runs on every exit path once step 1 succeeds.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::cleanup::{CleanupGuard, CleanupStats, clean_module};
use crate::consts::DATA_MAPPER_DIR_PATH;
use crate::module::{Module, scan_modules};
use crate::stage::{StageError, collect_out, stage_in};
use crate::toolchain::{BuildRunner, StepError, Toolchain, locate_toolchain_home};
use crate::util::fs::resolve_against;
use crate::workspace::Workspace;

/// What to do when a module fails to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
  /// Stop at the first failing module. Later modules are not attempted.
  #[default]
  Abort,
  /// Record the failure and carry on with the next module.
  Continue,
}

/// Options for a bundling run.
#[derive(Debug, Clone)]
pub struct BundleOptions {
  /// Directory the toolchain runs in; holds `pom.xml` and all transient files.
  pub working_dir: PathBuf,
  /// Resources root containing the `datamapper` directory. Relative paths
  /// resolve against `working_dir`.
  pub resources_dir: PathBuf,
  pub on_failure: FailurePolicy,
}

impl BundleOptions {
  pub fn new(working_dir: impl Into<PathBuf>, resources_dir: impl Into<PathBuf>) -> Self {
    Self {
      working_dir: working_dir.into(),
      resources_dir: resources_dir.into(),
      on_failure: FailurePolicy::default(),
    }
  }

  pub fn with_failure_policy(mut self, on_failure: FailurePolicy) -> Self {
    self.on_failure = on_failure;
    self
  }

  /// Directory whose subdirectories are the data-mapper modules.
  pub fn modules_root(&self) -> PathBuf {
    resolve_against(&self.working_dir, &self.resources_dir).join(DATA_MAPPER_DIR_PATH)
  }
}

/// Why one module did not produce a bundle.
#[derive(Debug, Error)]
pub enum ModuleError {
  #[error(transparent)]
  Build(#[from] StepError),

  #[error("failed to collect bundle: {0}")]
  Collect(#[from] StageError),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BundleOutcome {
  /// Every discovered module was attempted.
  Completed,
  ToolchainNotFound,
  BootstrapFailed { error: String },
  DependencyInstallFailed { error: String },
  /// A module failed and the run stopped there.
  ModuleFailed { module: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BundledModule {
  pub name: String,
  /// Where the bundle was collected to.
  pub bundle: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedModule {
  pub name: String,
  pub error: String,
}

/// Result of a bundling run.
#[derive(Debug, Serialize)]
pub struct BundleReport {
  pub outcome: BundleOutcome,
  pub toolchain_home: Option<PathBuf>,
  pub bundled: Vec<BundledModule>,
  pub failed: Vec<FailedModule>,
  /// Modules never attempted because an earlier module failed.
  pub skipped: Vec<String>,
  /// Final cleanup totals; `None` if the run stopped before creating anything.
  pub cleanup: Option<CleanupStats>,
}

impl BundleReport {
  fn new() -> Self {
    Self {
      outcome: BundleOutcome::Completed,
      toolchain_home: None,
      bundled: Vec::new(),
      failed: Vec::new(),
      skipped: Vec::new(),
      cleanup: None,
    }
  }

  /// Returns true if the run completed and every module was bundled.
  pub fn is_success(&self) -> bool {
    self.outcome == BundleOutcome::Completed && self.failed.is_empty()
  }
}

/// Bundle every data mapper under `options.modules_root()`.
///
/// Never fails as a whole: problems are logged and reflected in the report.
pub async fn bundle<T: Toolchain>(options: &BundleOptions, toolchain: &T) -> BundleReport {
  info!("bundling data mapper");
  let mut report = BundleReport::new();

  let Some(home) = locate_toolchain_home(toolchain).await else {
    error!("could not determine maven home");
    report.outcome = BundleOutcome::ToolchainNotFound;
    return report;
  };
  report.toolchain_home = Some(home.clone());

  let workspace = Workspace::new(&options.working_dir);
  let guard = CleanupGuard::new(&workspace);

  let outcome = run_pipeline(options, &workspace, toolchain, home, &mut report).await;
  report.outcome = outcome;

  report.cleanup = Some(guard.finish().stats());
  report
}

async fn run_pipeline<T: Toolchain>(
  options: &BundleOptions,
  workspace: &Workspace,
  toolchain: &T,
  home: PathBuf,
  report: &mut BundleReport,
) -> BundleOutcome {
  for e in workspace.prepare() {
    error!(error = %e, "failed to create data mapper artifact");
  }

  let runner = BuildRunner::new(
    toolchain,
    home,
    workspace.root().to_path_buf(),
    workspace.build_descriptor(),
  );

  info!("installing node and npm");
  if let Err(e) = runner.bootstrap().await {
    error!(error = %e, "node and npm installation failed");
    return BundleOutcome::BootstrapFailed { error: e.to_string() };
  }

  info!("running npm install");
  if let Err(e) = runner.install_dependencies().await {
    error!(error = %e, "npm install failed");
    return BundleOutcome::DependencyInstallFailed { error: e.to_string() };
  }

  info!("start bundling data mappers");
  let modules = scan_modules(&options.modules_root());
  let mut pending = modules.iter();

  while let Some(module) = pending.next() {
    match bundle_module(module, workspace, &runner).await {
      Ok(bundle) => {
        report.bundled.push(BundledModule {
          name: module.name.clone(),
          bundle,
        });
      }
      Err(e) => {
        error!(module = %module.name, error = %e, "failed to bundle data mapper");
        report.failed.push(FailedModule {
          name: module.name.clone(),
          error: e.to_string(),
        });

        if options.on_failure == FailurePolicy::Abort {
          report.skipped = pending.by_ref().map(|m| m.name.clone()).collect();
          return BundleOutcome::ModuleFailed {
            module: module.name.clone(),
          };
        }
      }
    }
  }

  info!(
    bundled = report.bundled.len(),
    failed = report.failed.len(),
    "data mapper bundling completed"
  );
  BundleOutcome::Completed
}

/// Run one module's full cycle. The staging directory is cleared afterwards
/// whether or not the build succeeded.
async fn bundle_module<T: Toolchain>(
  module: &Module,
  workspace: &Workspace,
  runner: &BuildRunner<'_, T>,
) -> Result<PathBuf, ModuleError> {
  let staged = stage_in(module, &workspace.staging_dir());
  info!(module = %module.name, files = staged.copied.len(), "bundling data mapper");

  if let Err(e) = workspace.write_bundler_config(&module.name) {
    error!(module = %module.name, error = %e, "failed to create bundler config");
  }

  let result = build_and_collect(module, &workspace.bundle_path(), runner).await;

  let cleanup = clean_module(workspace);
  if !cleanup.is_clean() {
    warn!(module = %module.name, failed = cleanup.failed.len(), "staging directory not fully cleared");
  }

  result
}

async fn build_and_collect<T: Toolchain>(
  module: &Module,
  bundle_path: &Path,
  runner: &BuildRunner<'_, T>,
) -> Result<PathBuf, ModuleError> {
  runner.bundle().await?;
  info!(module = %module.name, "bundle completed for data mapper");

  Ok(collect_out(bundle_path, module)?)
}
