//! Types for build orchestration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::ConfigError;
use crate::platform::{Target, TargetParseError};
use crate::toolchain::ToolchainError;

/// Whether a build targets the host platform or a cross-compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildKind {
  Native,
  Cross,
}

impl fmt::Display for BuildKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildKind::Native => write!(f, "native build"),
      BuildKind::Cross => write!(f, "cross-compilation"),
    }
  }
}

/// Stages of a run, in the order the orchestrator enters them.
///
/// Any error ends the run from whichever stage it occurs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  CreateOutputDir,
  DetectNativePlatform,
  BuildNative,
  BuildCross,
  Done,
}

/// Progress notifications emitted while a run proceeds.
#[derive(Debug)]
pub enum Progress<'a> {
  /// The run entered a new stage.
  Stage(Stage),
  /// A toolchain build is about to start.
  Started {
    target: &'a Target,
    kind: BuildKind,
    path: &'a Path,
  },
  /// A toolchain build completed successfully.
  Finished(&'a Artifact),
}

/// A successfully built executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub target: Target,
  pub kind: BuildKind,
  pub path: PathBuf,
  /// Size in bytes, if the toolchain left a file at `path`.
  pub size: Option<u64>,
  #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
  pub duration: Duration,
}

/// Summary of a fully successful run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
  pub project_name: String,
  pub output_dir: PathBuf,
  pub native: Target,
  /// Artifacts in build order: native first, then each cross target.
  pub artifacts: Vec<Artifact>,
  #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
  pub duration: Duration,
}

impl BuildReport {
  pub fn total_size(&self) -> u64 {
    self.artifacts.iter().filter_map(|a| a.size).sum()
  }
}

/// A build that a dry run would perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedBuild {
  pub target: Target,
  pub kind: BuildKind,
  pub path: PathBuf,
}

/// The builds a run would perform, without performing them.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
  pub project_name: String,
  pub output_dir: PathBuf,
  pub native: Target,
  pub builds: Vec<PlannedBuild>,
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// The toolchain could not report the host OS or architecture.
  #[error("failed to get native {key}: {source}")]
  Detect {
    key: &'static str,
    #[source]
    source: ToolchainError,
  },

  /// A target specifier is not of the form `os/arch`.
  #[error("invalid platform configuration: {0}")]
  InvalidTarget(#[from] TargetParseError),

  /// The toolchain failed to build a target.
  #[error("{kind} failed for {target}: {source}")]
  Build {
    target: Target,
    kind: BuildKind,
    #[source]
    source: ToolchainError,
  },
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_u64(duration.as_millis() as u64)
}
