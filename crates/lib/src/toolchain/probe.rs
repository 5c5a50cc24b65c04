//! Locating the toolchain installation.

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::consts::MAVEN_HOME_MARKER;
use crate::toolchain::Toolchain;

/// Extract the installation directory from version-query output.
///
/// Returns the trimmed text following the first `Maven home: ` marker, or
/// `None` if no line carries one.
pub fn parse_toolchain_home(output: &str) -> Option<PathBuf> {
  output
    .lines()
    .filter_map(|line| line.split_once(MAVEN_HOME_MARKER))
    .map(|(_, rest)| rest.trim())
    .find(|home| !home.is_empty())
    .map(PathBuf::from)
}

/// Query the toolchain's version and resolve its installation directory.
pub async fn locate_toolchain_home<T: Toolchain>(toolchain: &T) -> Option<PathBuf> {
  info!("finding maven home");

  let output = match toolchain.version_info().await {
    Ok(output) => output,
    Err(e) => {
      error!(error = %e, "failed to find maven home");
      return None;
    }
  };

  let home = parse_toolchain_home(&output);
  match &home {
    Some(home) => debug!(home = %home.display(), "resolved maven home"),
    None => debug!(output = %output, "no maven home in version output"),
  }
  home
}
