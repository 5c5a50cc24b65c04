//! Implementation of the `dmbundle clean` command.

use std::path::Path;

use anyhow::{Result, bail};

use dmbundle_lib::cleanup::clean_all;
use dmbundle_lib::workspace::Workspace;

use super::working_dir;
use crate::output::{OutputFormat, print_cleanup_report, print_json};

/// Remove every transient bundling file from the working directory.
///
/// Safe to run repeatedly; paths that are already gone are not errors.
pub fn cmd_clean(working_dir_arg: Option<&Path>, output: OutputFormat) -> Result<()> {
  let workspace = Workspace::new(working_dir(working_dir_arg)?);
  let report = clean_all(&workspace);

  if output.is_json() {
    let failed: Vec<_> = report
      .failed
      .iter()
      .map(|e| serde_json::json!({ "path": e.path, "error": e.source.to_string() }))
      .collect();
    print_json(&serde_json::json!({
      "stats": report.stats(),
      "removed": report.removed,
      "failed": failed,
    }))?;
  } else {
    print_cleanup_report(&report);
  }

  if !report.is_clean() {
    bail!("Some bundling artifacts could not be removed");
  }

  Ok(())
}
