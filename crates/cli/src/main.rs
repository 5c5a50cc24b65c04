//! dmbundle - bundle TypeScript data mappers with the Maven/npm toolchain.

mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use dmbundle_lib::bundle::FailurePolicy;

use crate::cmd::{cmd_bundle, cmd_clean, cmd_probe};
use crate::output::OutputFormat;

/// Resources root used when `--resources` is not given.
const DEFAULT_RESOURCES_DIR: &str = "src/main/resources";

/// Bundle data-mapper modules into single-file JavaScript bundles
#[derive(Parser)]
#[command(name = "dmbundle")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every data mapper and copy its bundle into the module directory
  Bundle {
    /// Resources root containing the `datamapper` directory (relative to the working directory)
    #[arg(short, long, default_value = DEFAULT_RESOURCES_DIR)]
    resources: PathBuf,

    /// Directory holding pom.xml; transient files are created here (default: current directory)
    #[arg(short = 'C', long)]
    working_dir: Option<PathBuf>,

    /// What to do when a data mapper fails to build
    #[arg(long, value_enum, default_value_t = OnFailure::Abort)]
    on_failure: OnFailure,
  },

  /// Remove transient files left behind by an interrupted run
  Clean {
    /// Directory to clean (default: current directory)
    #[arg(short = 'C', long)]
    working_dir: Option<PathBuf>,
  },

  /// Print the Maven installation directory that bundling would use
  Probe,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnFailure {
  /// Stop at the first failing data mapper
  Abort,
  /// Keep building the remaining data mappers
  Continue,
}

impl From<OnFailure> for FailurePolicy {
  fn from(value: OnFailure) -> Self {
    match value {
      OnFailure::Abort => FailurePolicy::Abort,
      OnFailure::Continue => FailurePolicy::Continue,
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  // RUST_LOG takes precedence over --verbose
  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Bundle {
      resources,
      working_dir,
      on_failure,
    } => cmd_bundle(&resources, working_dir.as_deref(), on_failure.into(), cli.output),
    Commands::Clean { working_dir } => cmd_clean(working_dir.as_deref(), cli.output),
    Commands::Probe => cmd_probe(cli.output),
  }
}
