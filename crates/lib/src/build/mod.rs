//! Build orchestration.
//!
//! A run is strictly sequential:
//! 1. Create the output directory
//! 2. Ask the toolchain for the native OS and architecture
//! 3. Build the native executable
//! 4. Build each cross-compilation target in list order
//!
//! The first failure ends the run; nothing after the failing step is attempted.

mod types;

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{BuildConfig, ensure_output_dir};
use crate::consts::{ARCH_ENV_KEY, OS_ENV_KEY};
use crate::platform::Target;
use crate::toolchain::Toolchain;

pub use types::{
  Artifact, BuildError, BuildKind, BuildPlan, BuildReport, PlannedBuild, Progress, Stage,
};

/// Ask the toolchain which platform it targets by default.
///
/// Queries the OS first, then the architecture; each is a separate invocation.
pub fn detect_native<T: Toolchain>(toolchain: &T) -> Result<Target, BuildError> {
  let os = toolchain.env(OS_ENV_KEY).map_err(|source| BuildError::Detect {
    key: OS_ENV_KEY,
    source,
  })?;
  let arch = toolchain.env(ARCH_ENV_KEY).map_err(|source| BuildError::Detect {
    key: ARCH_ENV_KEY,
    source,
  })?;

  let native = Target::new(os, arch);
  debug!(native = %native, "detected native platform");
  Ok(native)
}

/// Build the native executable and every configured cross target.
///
/// `progress` is called on each stage transition and around each build, so
/// callers can print status between the toolchain's own streamed output.
pub fn run<T, F>(config: &BuildConfig, toolchain: &T, mut progress: F) -> Result<BuildReport, BuildError>
where
  T: Toolchain,
  F: FnMut(Progress<'_>),
{
  let started = Instant::now();

  progress(Progress::Stage(Stage::CreateOutputDir));
  ensure_output_dir(&config.output_dir)?;

  progress(Progress::Stage(Stage::DetectNativePlatform));
  let native = detect_native(toolchain)?;

  let mut artifacts = Vec::with_capacity(config.targets.len() + 1);

  progress(Progress::Stage(Stage::BuildNative));
  artifacts.push(build_target(config, toolchain, &native, BuildKind::Native, &mut progress)?);

  progress(Progress::Stage(Stage::BuildCross));
  for spec in &config.targets {
    let target: Target = spec.parse()?;
    artifacts.push(build_target(config, toolchain, &target, BuildKind::Cross, &mut progress)?);
  }

  progress(Progress::Stage(Stage::Done));

  let output_dir = dunce::canonicalize(&config.output_dir).unwrap_or_else(|_| config.output_dir.clone());
  let duration = started.elapsed();
  info!(
    project = %config.project_name,
    artifacts = artifacts.len(),
    duration_ms = duration.as_millis() as u64,
    "build complete"
  );

  Ok(BuildReport {
    project_name: config.project_name.clone(),
    output_dir,
    native,
    artifacts,
    duration,
  })
}

/// Resolve every build a run would perform without building anything.
///
/// Still queries the toolchain for the native platform and validates every
/// target specifier, but never creates the output directory.
pub fn plan<T: Toolchain>(config: &BuildConfig, toolchain: &T) -> Result<BuildPlan, BuildError> {
  let native = detect_native(toolchain)?;

  let mut builds = Vec::with_capacity(config.targets.len() + 1);
  builds.push(PlannedBuild {
    path: config.artifact_path(&native),
    target: native.clone(),
    kind: BuildKind::Native,
  });
  for spec in &config.targets {
    let target: Target = spec.parse()?;
    builds.push(PlannedBuild {
      path: config.artifact_path(&target),
      target,
      kind: BuildKind::Cross,
    });
  }

  Ok(BuildPlan {
    project_name: config.project_name.clone(),
    output_dir: config.output_dir.clone(),
    native,
    builds,
  })
}

fn build_target<T, F>(
  config: &BuildConfig,
  toolchain: &T,
  target: &Target,
  kind: BuildKind,
  progress: &mut F,
) -> Result<Artifact, BuildError>
where
  T: Toolchain,
  F: FnMut(Progress<'_>),
{
  let path = config.artifact_path(target);
  progress(Progress::Started {
    target,
    kind,
    path: &path,
  });

  let started = Instant::now();
  toolchain.build(target, &path).map_err(|source| BuildError::Build {
    target: target.clone(),
    kind,
    source,
  })?;

  let artifact = Artifact {
    target: target.clone(),
    kind,
    size: file_size(&path),
    path,
    duration: started.elapsed(),
  };
  debug!(target = %target, path = %artifact.path.display(), "built artifact");

  progress(Progress::Finished(&artifact));
  Ok(artifact)
}

fn file_size(path: &Path) -> Option<u64> {
  std::fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len())
}
