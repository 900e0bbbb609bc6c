//! Implementation of `gocross --dry-run`.
//!
//! Resolves configuration and asks the toolchain for the native platform, then
//! lists the executables a real run would produce without building anything.

use anyhow::Result;
use tracing::debug;

use gocross_lib::build::{self, BuildKind};
use gocross_lib::config::{BuildConfig, ConfigOptions};
use gocross_lib::toolchain::GoToolchain;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_step};

pub fn cmd_plan(options: ConfigOptions, format: OutputFormat) -> Result<()> {
  let config = BuildConfig::resolve(options)?;
  let toolchain = GoToolchain::new(&config.toolchain);
  debug!(toolchain = %toolchain.program().display(), "planning builds");

  let plan = build::plan(&config, &toolchain)?;

  if format.is_json() {
    return print_json(&plan);
  }

  print_info(&format!("Would build {} executable(s)", plan.builds.len()));
  print_stat("Project", &plan.project_name);
  print_stat("Output", &plan.output_dir.display().to_string());
  println!();
  for planned in &plan.builds {
    let label = match planned.kind {
      BuildKind::Native => format!("{} (native)", planned.target),
      BuildKind::Cross => planned.target.to_string(),
    };
    print_step(&label, &planned.path.display().to_string());
  }

  Ok(())
}
