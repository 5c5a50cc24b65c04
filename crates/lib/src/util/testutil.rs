//! Test utilities for dmbundle-lib.
//!
//! [`FakeToolchain`] stands in for Maven. It mimics the filesystem effects of
//! each step (runtime dir, dependency cache, bundle output) so the pipeline can
//! be exercised end to end without Node or Maven installed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use walkdir::WalkDir;

use crate::consts::{
  BUNDLED_JS_FILE_NAME, NODE_DIR_NAME, NODE_MODULES_DIR_NAME, PACKAGE_LOCK_FILE_NAME, STAGING_DIR_NAME,
  WEBPACK_CONFIG_FILE_NAME,
};
use crate::toolchain::{InvocationRequest, InvocationResult, StepKind, Toolchain, ToolchainError};
use crate::util::fs::is_source_file;

pub const FAKE_MAVEN_HOME: &str = "/opt/fake-maven";

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
  pub kind: StepKind,
  pub home: PathBuf,
  pub working_dir: PathBuf,
  pub build_descriptor: PathBuf,
  /// Module targeted by the bundler config, for bundle steps.
  pub module: Option<String>,
  /// Source files present in the staging directory when the step ran.
  pub staged: Vec<PathBuf>,
}

pub struct FakeToolchain {
  version_output: Option<String>,
  failing_steps: HashSet<StepKind>,
  unreachable_steps: HashSet<StepKind>,
  failing_modules: HashSet<String>,
  silent_modules: HashSet<String>,
  calls: Mutex<Vec<Call>>,
}

impl Default for FakeToolchain {
  fn default() -> Self {
    Self::new()
  }
}

impl FakeToolchain {
  pub fn new() -> Self {
    Self {
      version_output: Some(format!("Apache Maven 3.9.6\nMaven home: {}\n", FAKE_MAVEN_HOME)),
      failing_steps: HashSet::new(),
      unreachable_steps: HashSet::new(),
      failing_modules: HashSet::new(),
      silent_modules: HashSet::new(),
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn with_version_output(mut self, output: &str) -> Self {
    self.version_output = Some(output.to_string());
    self
  }

  /// The version probe errors, as if `mvn` were not installed.
  pub fn without_toolchain(mut self) -> Self {
    self.version_output = None;
    self
  }

  /// Every step of `kind` exits with code 1.
  pub fn fail_step(mut self, kind: StepKind) -> Self {
    self.failing_steps.insert(kind);
    self
  }

  /// Every step of `kind` fails to launch.
  pub fn unreachable_step(mut self, kind: StepKind) -> Self {
    self.unreachable_steps.insert(kind);
    self
  }

  /// The bundle step for `module` exits with code 1.
  pub fn fail_module(mut self, module: &str) -> Self {
    self.failing_modules.insert(module.to_string());
    self
  }

  /// The bundle step for `module` succeeds without writing a bundle.
  pub fn silent_module(mut self, module: &str) -> Self {
    self.silent_modules.insert(module.to_string());
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  /// Modules that reached the bundle step, in order.
  pub fn bundled_modules(&self) -> Vec<String> {
    self.calls().into_iter().filter_map(|c| c.module).collect()
  }

  fn apply_effects(&self, request: &InvocationRequest, module: Option<&str>) -> InvocationResult {
    let root = &request.working_dir;
    match request.step.kind {
      StepKind::Bootstrap => {
        fs::create_dir_all(root.join(NODE_DIR_NAME)).unwrap();
      }
      StepKind::InstallDependencies => {
        fs::create_dir_all(root.join(NODE_MODULES_DIR_NAME).join("typescript")).unwrap();
        fs::write(root.join(PACKAGE_LOCK_FILE_NAME), "{}").unwrap();
      }
      StepKind::Bundle => {
        let Some(module) = module else {
          return InvocationResult::failure(2, "no entry point configured");
        };
        if self.failing_modules.contains(module) {
          return InvocationResult::failure(1, format!("compilation of {} failed", module));
        }
        let staging = root.join(STAGING_DIR_NAME);
        if !staging.join(format!("{}.ts", module)).exists() {
          return InvocationResult::failure(2, format!("entry point for {} not staged", module));
        }
        if !self.silent_modules.contains(module) {
          let staged = staged_sources(&staging);
          let content = format!(
            "// bundle of {}\n{}\n",
            module,
            staged
              .iter()
              .map(|p| p.to_string_lossy().to_string())
              .collect::<Vec<_>>()
              .join("\n")
          );
          fs::write(staging.join(BUNDLED_JS_FILE_NAME), content).unwrap();
        }
      }
    }
    InvocationResult::success()
  }
}

impl Toolchain for FakeToolchain {
  async fn version_info(&self) -> Result<String, ToolchainError> {
    self
      .version_output
      .clone()
      .ok_or_else(|| ToolchainError::Invocation("mvn: command not found".to_string()))
  }

  async fn invoke(&self, home: &Path, request: &InvocationRequest) -> Result<InvocationResult, ToolchainError> {
    let kind = request.step.kind;
    let module = match kind {
      StepKind::Bundle => configured_entry(&request.working_dir),
      _ => None,
    };

    self.calls.lock().unwrap().push(Call {
      kind,
      home: home.to_path_buf(),
      working_dir: request.working_dir.clone(),
      build_descriptor: request.build_descriptor.clone(),
      module: module.clone(),
      staged: staged_sources(&request.working_dir.join(STAGING_DIR_NAME)),
    });

    if self.unreachable_steps.contains(&kind) {
      return Err(ToolchainError::Invocation(format!("cannot launch {}", kind)));
    }
    if self.failing_steps.contains(&kind) {
      return Ok(InvocationResult::failure(1, format!("{} failed", kind)));
    }

    Ok(self.apply_effects(request, module.as_deref()))
  }
}

/// Source files under `staging`, relative and sorted.
pub fn staged_sources(staging: &Path) -> Vec<PathBuf> {
  let mut files: Vec<_> = WalkDir::new(staging)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file() && is_source_file(e.path()))
    .filter_map(|e| e.path().strip_prefix(staging).ok().map(Path::to_path_buf))
    .collect();
  files.sort();
  files
}

/// Module name from the `entry:` line of the generated bundler config.
fn configured_entry(working_dir: &Path) -> Option<String> {
  let config = fs::read_to_string(working_dir.join(WEBPACK_CONFIG_FILE_NAME)).ok()?;
  let line = config.lines().find(|l| l.trim_start().starts_with("entry:"))?;
  let entry = line.split('"').nth(1)?;
  let file = entry.rsplit('/').next()?;
  file.strip_suffix(".ts").map(str::to_string)
}

/// Create `<root>/<module>/<file>` for each entry, returning the module root.
pub fn write_module(root: &Path, module: &str, files: &[(&str, &str)]) -> PathBuf {
  let dir = root.join(module);
  fs::create_dir_all(&dir).unwrap();
  for (file, content) in files {
    let path = dir.join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }
  dir
}
