//! Terminal rendering for dmbundle.
//!
//! Colored status lines and stats, plus the text summaries of bundle and
//! cleanup reports. JSON output bypasses all of this via [`print_json`].

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use dmbundle_lib::bundle::{BundleOutcome, BundleReport};
use dmbundle_lib::cleanup::CleanupReport;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Severity of a report's headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Success,
  Warning,
  Error,
}

/// One-line verdict for a bundle run.
pub fn bundle_headline(report: &BundleReport) -> (Status, String) {
  match &report.outcome {
    BundleOutcome::Completed if report.failed.is_empty() => {
      (Status::Success, "Data mapper bundling complete!".to_string())
    }
    BundleOutcome::Completed => (
      Status::Warning,
      format!("Data mapper bundling finished with {} failure(s)", report.failed.len()),
    ),
    BundleOutcome::ToolchainNotFound => (Status::Error, "Could not determine Maven home".to_string()),
    BundleOutcome::BootstrapFailed { error } => (Status::Error, format!("Node and npm installation failed: {}", error)),
    BundleOutcome::DependencyInstallFailed { error } => (Status::Error, format!("npm install failed: {}", error)),
    BundleOutcome::ModuleFailed { module } => (Status::Error, format!("Failed to bundle data mapper: {}", module)),
  }
}

fn print_status(status: Status, message: &str) {
  match status {
    Status::Success => print_success(message),
    Status::Warning => print_warning(message),
    Status::Error => print_error(message),
  }
}

pub fn print_bundle_report(report: &BundleReport) {
  println!();
  let (status, headline) = bundle_headline(report);
  print_status(status, &headline);

  if let Some(home) = &report.toolchain_home {
    print_stat("Maven home", &home.display().to_string());
  }
  print_stat("Bundled", &report.bundled.len().to_string());
  for module in &report.bundled {
    println!(
      "    {} {} {} {}",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      module.name,
      symbols::ARROW,
      module.bundle.display()
    );
  }

  if !report.failed.is_empty() {
    print_stat("Failed", &report.failed.len().to_string());
    for module in &report.failed {
      println!(
        "    {} {}: {}",
        symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
        module.name,
        module.error
      );
    }
  }

  if !report.skipped.is_empty() {
    print_stat("Skipped", &report.skipped.join(", "));
  }

  if report.cleanup.is_some_and(|c| c.failed > 0) {
    print_info("Some transient files could not be removed; run 'dmbundle clean'");
  }
}

pub fn print_cleanup_report(report: &CleanupReport) {
  println!();
  if report.is_clean() {
    print_success("Cleanup complete!");
  } else {
    for e in &report.failed {
      print_error(&e.to_string());
    }
  }
  let stats = report.stats();
  print_stat("Removed", &stats.removed.to_string());
  print_stat("Failed", &stats.failed.to_string());
}
