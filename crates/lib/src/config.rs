//! Build configuration resolution.
//!
//! Turns the raw command-line options into a [`BuildConfig`]: the project name
//! (falling back to the working directory's base name), the output directory,
//! the toolchain program and the ordered list of cross-compilation targets.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_OUTPUT_DIR, DEFAULT_TARGETS, DEFAULT_TOOLCHAIN, TOOLCHAIN_ENV_VAR};
use crate::platform::Target;

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The current working directory could not be read.
  #[error("failed to get current directory: {0}")]
  CurrentDir(#[source] io::Error),

  /// The working directory has no final component to name the project after.
  #[error("cannot derive a project name from {}", .0.display())]
  NoProjectName(PathBuf),

  /// The output directory could not be created.
  #[error("failed to create output directory {}: {source}", .path.display())]
  CreateOutputDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Raw options as given on the command line.
#[derive(Debug, Clone)]
pub struct ConfigOptions {
  /// Project name; `None` or empty means derive it from the working directory.
  pub project: Option<String>,
  pub output: PathBuf,
  /// Toolchain program; `None` means consult `GOCROSS_TOOLCHAIN`, then `go`.
  pub toolchain: Option<PathBuf>,
  /// Cross-compilation targets as `os/arch`; empty means the default list.
  pub targets: Vec<String>,
}

impl Default for ConfigOptions {
  fn default() -> Self {
    Self {
      project: None,
      output: PathBuf::from(DEFAULT_OUTPUT_DIR),
      toolchain: None,
      targets: Vec::new(),
    }
  }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
  pub project_name: String,
  pub output_dir: PathBuf,
  pub toolchain: PathBuf,
  /// Raw `os/arch` specifiers, validated when the orchestrator reaches them.
  pub targets: Vec<String>,
}

impl BuildConfig {
  /// Resolve options against the process environment and working directory.
  pub fn resolve(options: ConfigOptions) -> Result<Self, ConfigError> {
    let project_name = resolve_project_name(options.project.as_deref())?;
    let toolchain = toolchain_program(options.toolchain.as_deref());
    let targets = if options.targets.is_empty() {
      default_targets()
    } else {
      options.targets
    };

    debug!(
      project = %project_name,
      output = %options.output.display(),
      toolchain = %toolchain.display(),
      targets = ?targets,
      "resolved configuration"
    );

    Ok(Self {
      project_name,
      output_dir: options.output,
      toolchain,
      targets,
    })
  }

  /// Path of the executable built for `target`.
  pub fn artifact_path(&self, target: &Target) -> PathBuf {
    self.output_dir.join(target.artifact_name(&self.project_name))
  }
}

/// The default cross-compilation list as owned specifiers.
pub fn default_targets() -> Vec<String> {
  DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect()
}

/// Use the explicit project name if non-empty, else the working directory's base name.
pub fn resolve_project_name(explicit: Option<&str>) -> Result<String, ConfigError> {
  match explicit {
    Some(name) if !name.is_empty() => Ok(name.to_string()),
    _ => {
      let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
      project_name_from_dir(&cwd)
    }
  }
}

/// Base name of `dir`, used as the project name.
pub fn project_name_from_dir(dir: &Path) -> Result<String, ConfigError> {
  dir
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .filter(|name| !name.is_empty())
    .ok_or_else(|| ConfigError::NoProjectName(dir.to_path_buf()))
}

/// Returns the toolchain program: explicit value, then `GOCROSS_TOOLCHAIN`, then `go`.
pub fn toolchain_program(explicit: Option<&Path>) -> PathBuf {
  if let Some(program) = explicit {
    return program.to_path_buf();
  }
  std::env::var(TOOLCHAIN_ENV_VAR)
    .ok()
    .filter(|v| !v.is_empty())
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOLCHAIN))
}

/// Create the output directory and any missing parents.
///
/// Succeeds if the directory already exists. New directories get mode `0755` on Unix.
pub fn ensure_output_dir(path: &Path) -> Result<(), ConfigError> {
  let mut builder = std::fs::DirBuilder::new();
  builder.recursive(true);

  #[cfg(unix)]
  {
    use std::os::unix::fs::DirBuilderExt;
    builder.mode(0o755);
  }

  builder.create(path).map_err(|source| ConfigError::CreateOutputDir {
    path: path.to_path_buf(),
    source,
  })?;

  debug!(path = %path.display(), "output directory ready");
  Ok(())
}
