use anyhow::{Context, Result, bail};

use dmbundle_lib::toolchain::{MavenToolchain, locate_toolchain_home};

use crate::output::{OutputFormat, print_json, print_success};

pub fn cmd_probe(output: OutputFormat) -> Result<()> {
  let toolchain = MavenToolchain::from_env();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let Some(home) = rt.block_on(locate_toolchain_home(&toolchain)) else {
    bail!("Could not determine Maven home");
  };

  if output.is_json() {
    print_json(&serde_json::json!({ "maven_home": home }))?;
  } else {
    print_success(&format!("Maven home: {}", home.display()));
  }

  Ok(())
}
