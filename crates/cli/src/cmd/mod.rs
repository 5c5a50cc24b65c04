mod bundle;
mod clean;
mod probe;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use bundle::cmd_bundle;
pub use clean::cmd_clean;
pub use probe::cmd_probe;

/// Resolve the working directory, defaulting to the current directory.
fn working_dir(dir: Option<&Path>) -> Result<PathBuf> {
  let dir = match dir {
    Some(dir) => dir.to_path_buf(),
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };
  dunce::canonicalize(&dir).with_context(|| format!("Working directory not found: {}", dir.display()))
}
