//! External toolchain invocation.
//!
//! The toolchain is reached through the [`Toolchain`] trait: a version probe used
//! to locate its installation, and a step invoker that runs one goal to
//! completion and reports its exit status. [`MavenToolchain`] is the process
//! backed implementation; [`BuildRunner`] turns raw invocation results into
//! pass/fail for the orchestrator.
//!
//! # Submodules
//!
//! - [`maven`] - spawns `mvn` with output discarded
//! - [`probe`] - extracts the installation directory from `mvn -v` output

pub mod maven;
pub mod probe;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::consts::{
  EXEC_GOAL, INSTALL_NODE_AND_NPM_GOAL, NODE_VERSION, NPM_COMMAND, NPM_GOAL, NPM_INSTALL, NPM_VERSION, RUN_BUILD,
};

pub use maven::MavenToolchain;
pub use probe::{locate_toolchain_home, parse_toolchain_home};

/// Invocation-level failures: the step could not be run at all.
#[derive(Debug, Error)]
pub enum ToolchainError {
  #[error("failed to spawn {program}: {source}")]
  Spawn { program: String, source: io::Error },

  #[error("toolchain invocation failed: {0}")]
  Invocation(String),
}

/// A build step that did not succeed.
#[derive(Debug, Error)]
pub enum StepError {
  #[error("{kind} exited with code {code}{}", diagnostic_suffix(.message))]
  Exited {
    kind: StepKind,
    code: i32,
    message: Option<String>,
  },

  #[error("{kind} could not be invoked: {source}")]
  Invocation {
    kind: StepKind,
    #[source]
    source: ToolchainError,
  },
}

fn diagnostic_suffix(message: &Option<String>) -> String {
  message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default()
}

/// The three kinds of toolchain invocation, in the order a run issues them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
  /// Install the pinned Node and npm versions.
  Bootstrap,
  /// `npm install` against the generated manifest.
  InstallDependencies,
  /// Compile and bundle the staged module.
  Bundle,
}

impl fmt::Display for StepKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StepKind::Bootstrap => write!(f, "node and npm installation"),
      StepKind::InstallDependencies => write!(f, "npm install"),
      StepKind::Bundle => write!(f, "npm run build"),
    }
  }
}

/// One toolchain invocation: a goal plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
  pub kind: StepKind,
  pub goal: String,
  pub properties: BTreeMap<String, String>,
}

impl BuildStep {
  fn new(kind: StepKind, goal: &str, properties: &[(&str, &str)]) -> Self {
    Self {
      kind,
      goal: goal.to_string(),
      properties: properties
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    }
  }

  pub fn bootstrap() -> Self {
    Self::new(
      StepKind::Bootstrap,
      INSTALL_NODE_AND_NPM_GOAL,
      &[("nodeVersion", NODE_VERSION), ("npmVersion", NPM_VERSION)],
    )
  }

  pub fn install_dependencies() -> Self {
    Self::new(StepKind::InstallDependencies, NPM_GOAL, &[("arguments", NPM_INSTALL)])
  }

  pub fn bundle() -> Self {
    Self::new(
      StepKind::Bundle,
      EXEC_GOAL,
      &[("exec.executable", NPM_COMMAND), ("exec.args", RUN_BUILD)],
    )
  }
}

/// Everything a toolchain needs to run one step.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
  pub working_dir: PathBuf,
  pub build_descriptor: PathBuf,
  pub step: BuildStep,
}

/// Exit status of an invocation, plus an optional diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
  pub exit_code: i32,
  pub message: Option<String>,
}

impl InvocationResult {
  pub fn success() -> Self {
    Self {
      exit_code: 0,
      message: None,
    }
  }

  pub fn failure(exit_code: i32, message: impl Into<String>) -> Self {
    Self {
      exit_code,
      message: Some(message.into()),
    }
  }

  pub fn is_success(&self) -> bool {
    self.exit_code == 0
  }
}

/// An external build toolchain.
///
/// Invocations block until the external process exits. Output is not
/// captured; only the exit status is reported.
pub trait Toolchain {
  /// Raw text printed by the toolchain's version query.
  fn version_info(&self) -> impl Future<Output = Result<String, ToolchainError>> + Send;

  /// Run one step using the installation at `home`.
  fn invoke(
    &self,
    home: &Path,
    request: &InvocationRequest,
  ) -> impl Future<Output = Result<InvocationResult, ToolchainError>> + Send;
}

/// Runs build steps against a located toolchain installation.
pub struct BuildRunner<'a, T> {
  toolchain: &'a T,
  home: PathBuf,
  working_dir: PathBuf,
  build_descriptor: PathBuf,
}

impl<'a, T: Toolchain> BuildRunner<'a, T> {
  pub fn new(toolchain: &'a T, home: PathBuf, working_dir: PathBuf, build_descriptor: PathBuf) -> Self {
    Self {
      toolchain,
      home,
      working_dir,
      build_descriptor,
    }
  }

  pub fn home(&self) -> &Path {
    &self.home
  }

  /// Run `step` to completion.
  ///
  /// Failures are logged with the step's diagnostic before being returned.
  pub async fn run(&self, step: BuildStep) -> Result<(), StepError> {
    let kind = step.kind;
    debug!(goal = %step.goal, properties = ?step.properties, "invoking toolchain");

    let request = InvocationRequest {
      working_dir: self.working_dir.clone(),
      build_descriptor: self.build_descriptor.clone(),
      step,
    };

    let err = match self.toolchain.invoke(&self.home, &request).await {
      Ok(result) if result.is_success() => return Ok(()),
      Ok(result) => StepError::Exited {
        kind,
        code: result.exit_code,
        message: result.message,
      },
      Err(source) => StepError::Invocation { kind, source },
    };

    error!(step = %kind, error = %err, "toolchain step failed");
    Err(err)
  }

  pub async fn bootstrap(&self) -> Result<(), StepError> {
    self.run(BuildStep::bootstrap()).await
  }

  pub async fn install_dependencies(&self) -> Result<(), StepError> {
    self.run(BuildStep::install_dependencies()).await
  }

  pub async fn bundle(&self) -> Result<(), StepError> {
    self.run(BuildStep::bundle()).await
  }
}
