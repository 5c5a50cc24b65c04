//! Maven-backed toolchain.
//!
//! Every step is a separate `mvn` process run against the workspace's
//! `pom.xml`. Output is discarded so the toolchain does not flood the log; only
//! exit codes come back.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::consts::MVN_ENV_VAR;
use crate::toolchain::{InvocationRequest, InvocationResult, Toolchain, ToolchainError};

#[cfg(windows)]
const MVN_BIN: &str = "mvn.cmd";
#[cfg(not(windows))]
const MVN_BIN: &str = "mvn";

/// Drives the Node/npm build through Maven.
#[derive(Debug, Clone, Default)]
pub struct MavenToolchain {
  executable: Option<PathBuf>,
}

impl MavenToolchain {
  /// Use `mvn` from `PATH` for probing and `<home>/bin/mvn` for steps.
  pub fn new() -> Self {
    Self::default()
  }

  /// Use a specific `mvn` executable for both probing and steps.
  pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
    Self {
      executable: Some(executable.into()),
    }
  }

  /// Honour `DMBUNDLE_MVN` if set, otherwise behave like [`MavenToolchain::new`].
  pub fn from_env() -> Self {
    match std::env::var_os(MVN_ENV_VAR) {
      Some(exe) if !exe.is_empty() => Self::with_executable(exe),
      _ => Self::new(),
    }
  }

  /// The executable used for the version probe.
  fn probe_executable(&self) -> String {
    match &self.executable {
      Some(exe) => exe.to_string_lossy().to_string(),
      None => MVN_BIN.to_string(),
    }
  }

  /// `<exe> -v` for an explicit executable; otherwise `mvn -v` through the
  /// shell so `PATH` lookup matches an interactive session.
  fn probe_command(&self) -> Command {
    match &self.executable {
      Some(exe) => {
        let mut cmd = Command::new(exe);
        cmd.arg("-v");
        cmd
      }
      None => {
        let (shell, args) = get_shell();
        let mut cmd = Command::new(shell);
        cmd.args(args).arg(format!("{} -v", MVN_BIN));
        cmd
      }
    }
  }

  /// The executable used to run steps for the installation at `home`.
  pub fn step_executable(&self, home: &Path) -> PathBuf {
    match &self.executable {
      Some(exe) => exe.clone(),
      None => home.join("bin").join(MVN_BIN),
    }
  }
}

impl Toolchain for MavenToolchain {
  async fn version_info(&self) -> Result<String, ToolchainError> {
    let program = self.probe_executable();

    let output = self
      .probe_command()
      .stdin(Stdio::null())
      .stderr(Stdio::null())
      .output()
      .await
      .map_err(|source| ToolchainError::Spawn { program, source })?;

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  async fn invoke(&self, home: &Path, request: &InvocationRequest) -> Result<InvocationResult, ToolchainError> {
    let program = self.step_executable(home);
    let args = maven_args(request);

    debug!(program = %program.display(), args = ?args, cwd = %request.working_dir.display(), "spawning maven");

    let status = Command::new(&program)
      .args(&args)
      .current_dir(&request.working_dir)
      .env("MAVEN_HOME", home)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .await
      .map_err(|source| ToolchainError::Spawn {
        program: program.to_string_lossy().to_string(),
        source,
      })?;

    if status.success() {
      return Ok(InvocationResult::success());
    }

    // A missing code means the process was killed by a signal.
    Ok(match status.code() {
      Some(code) => InvocationResult::failure(code, format!("{} exited with status {}", request.step.goal, code)),
      None => InvocationResult::failure(-1, format!("{} was terminated by a signal", request.step.goal)),
    })
  }
}

/// Command-line arguments for one step: descriptor, goal, then `-Dkey=value` properties.
fn maven_args(request: &InvocationRequest) -> Vec<String> {
  let mut args = vec![
    "-f".to_string(),
    request.build_descriptor.to_string_lossy().to_string(),
    "--batch-mode".to_string(),
    request.step.goal.clone(),
  ];
  args.extend(
    request
      .step
      .properties
      .iter()
      .map(|(key, value)| format!("-D{}={}", key, value)),
  );
  args
}

#[cfg(unix)]
fn get_shell() -> (&'static str, [&'static str; 1]) {
  ("/bin/sh", ["-c"])
}

#[cfg(windows)]
fn get_shell() -> (&'static str, [&'static str; 1]) {
  ("cmd.exe", ["/C"])
}
