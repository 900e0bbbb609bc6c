//! Implementation of the default `gocross` run.
//!
//! Builds the native executable, then every cross-compilation target, and
//! prints a summary of the artifacts.

use anyhow::Result;
use tracing::debug;

use gocross_lib::build::{self, BuildKind, BuildReport, Progress, Stage};
use gocross_lib::config::{BuildConfig, ConfigOptions};
use gocross_lib::toolchain::GoToolchain;

use crate::output::{
  OutputFormat, format_bytes, format_duration, print_info, print_json, print_stat, print_step, print_success, symbols,
};

/// Execute a full build run.
///
/// Toolchain output is streamed through as it happens. The first failing step
/// aborts the run and its error is returned to `main`.
pub fn cmd_build(options: ConfigOptions, format: OutputFormat) -> Result<()> {
  let config = BuildConfig::resolve(options)?;
  let toolchain = if format.is_json() {
    GoToolchain::new(&config.toolchain).build_stdout_to_stderr()
  } else {
    GoToolchain::new(&config.toolchain)
  };
  debug!(toolchain = %toolchain.program().display(), project = %config.project_name, "starting run");

  let report = build::run(&config, &toolchain, |event| {
    if !format.is_json() {
      print_progress(event);
    }
  })?;

  if format.is_json() {
    print_json(&report)?;
  } else {
    print_summary(&report);
  }

  Ok(())
}

fn print_progress(event: Progress<'_>) {
  match event {
    Progress::Stage(stage) => {
      if let Some(header) = stage_header(stage) {
        print_info(header);
      }
    }
    Progress::Started { target, path, .. } => print_step(&target.to_string(), &path.display().to_string()),
    _ => {}
  }
}

/// Header printed when a stage starts. The native header comes before the
/// toolchain is queried, so anything `go env` prints lands beneath it.
fn stage_header(stage: Stage) -> Option<&'static str> {
  match stage {
    Stage::DetectNativePlatform => Some("Building native executable..."),
    Stage::BuildCross => Some("Starting cross-compilation..."),
    _ => None,
  }
}

fn print_summary(report: &BuildReport) {
  println!();
  print_success("Build complete.");
  print_stat("Project", &report.project_name);
  print_stat("Output", &report.output_dir.display().to_string());
  print_stat("Native", &report.native.to_string());
  print_stat("Duration", &format_duration(report.duration));
  println!();

  for artifact in &report.artifacts {
    let name = artifact
      .path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| artifact.path.display().to_string());
    let kind = match artifact.kind {
      BuildKind::Native => "native",
      BuildKind::Cross => "cross",
    };
    let size = artifact.size.map(format_bytes).unwrap_or_else(|| "-".to_string());
    println!("  {} {} ({}, {})", symbols::INFO, name, kind, size);
  }

  println!();
  print_stat("Total size", &format_bytes(report.total_size()));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn native_header_precedes_platform_detection() {
    assert_eq!(
      stage_header(Stage::DetectNativePlatform),
      Some("Building native executable...")
    );
    assert_eq!(stage_header(Stage::BuildNative), None);
    assert_eq!(stage_header(Stage::BuildCross), Some("Starting cross-compilation..."));
    assert_eq!(stage_header(Stage::CreateOutputDir), None);
  }
}
