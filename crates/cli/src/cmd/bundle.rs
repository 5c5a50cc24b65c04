//! Implementation of the `dmbundle bundle` command.
//!
//! Runs the full pipeline against the Maven toolchain and prints a summary of
//! which data mappers were bundled, which failed and which were never reached.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::debug;

use dmbundle_lib::bundle::{BundleOptions, FailurePolicy, bundle};
use dmbundle_lib::toolchain::MavenToolchain;

use super::working_dir;
use crate::output::{OutputFormat, format_duration, print_bundle_report, print_json, print_stat};

pub fn cmd_bundle(
  resources: &Path,
  working_dir_arg: Option<&Path>,
  on_failure: FailurePolicy,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();
  let working_dir = working_dir(working_dir_arg)?;

  let options = BundleOptions::new(working_dir, resources).with_failure_policy(on_failure);
  let toolchain = MavenToolchain::from_env();
  debug!(
    working_dir = %options.working_dir.display(),
    modules_root = %options.modules_root().display(),
    on_failure = ?on_failure,
    "starting bundle"
  );

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(bundle(&options, &toolchain));

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_bundle_report(&report);
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  if !report.is_success() {
    bail!("Data mapper bundling failed");
  }

  Ok(())
}
