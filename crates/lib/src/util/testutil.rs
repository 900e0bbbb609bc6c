//! Test utilities for gocross-lib.
//!
//! Provides an in-memory [`Toolchain`] that records its calls, and a fake `go`
//! shell script for tests that need a real subprocess.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::platform::Target;
use crate::toolchain::{Toolchain, ToolchainError};

/// A toolchain call as seen by [`RecordingToolchain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Env(String),
  Build(Target, PathBuf),
}

/// In-memory toolchain that records calls and writes placeholder artifacts.
pub struct RecordingToolchain {
  os: String,
  arch: String,
  fail_env: Option<String>,
  fail_build: Option<Target>,
  write_artifacts: bool,
  calls: RefCell<Vec<Call>>,
}

impl RecordingToolchain {
  pub fn new(os: &str, arch: &str) -> Self {
    Self {
      os: os.to_string(),
      arch: arch.to_string(),
      fail_env: None,
      fail_build: None,
      write_artifacts: true,
      calls: RefCell::new(Vec::new()),
    }
  }

  /// Fail the environment query for `key`.
  pub fn fail_env(mut self, key: &str) -> Self {
    self.fail_env = Some(key.to_string());
    self
  }

  /// Fail the build for `target` (given as `os/arch`).
  pub fn fail_build(mut self, target: &str) -> Self {
    self.fail_build = Some(target.parse().unwrap());
    self
  }

  /// Report success without writing any files.
  pub fn without_artifacts(mut self) -> Self {
    self.write_artifacts = false;
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  /// Targets passed to `build`, in call order.
  pub fn built_targets(&self) -> Vec<String> {
    self
      .calls
      .borrow()
      .iter()
      .filter_map(|call| match call {
        Call::Build(target, _) => Some(target.to_string()),
        Call::Env(_) => None,
      })
      .collect()
  }
}

impl Toolchain for RecordingToolchain {
  fn env(&self, key: &str) -> Result<String, ToolchainError> {
    self.calls.borrow_mut().push(Call::Env(key.to_string()));
    let command = format!("go env {}", key);

    if self.fail_env.as_deref() == Some(key) {
      return Err(ToolchainError::Failed { command, code: Some(1) });
    }
    match key {
      "GOOS" => Ok(self.os.clone()),
      "GOARCH" => Ok(self.arch.clone()),
      _ => Err(ToolchainError::EmptyOutput { command }),
    }
  }

  fn build(&self, target: &Target, output: &Path) -> Result<(), ToolchainError> {
    self
      .calls
      .borrow_mut()
      .push(Call::Build(target.clone(), output.to_path_buf()));

    if self.fail_build.as_ref() == Some(target) {
      return Err(ToolchainError::Failed {
        command: format!("go build -o {}", output.display()),
        code: Some(1),
      });
    }
    if self.write_artifacts {
      std::fs::write(output, format!("{}\n", target)).unwrap();
    }
    Ok(())
  }
}

/// Builder for a `/bin/sh` script that mimics `go env` and `go build`.
///
/// `env GOOS`/`env GOARCH` print the configured values; `build -o <path>`
/// writes `$GOOS/$GOARCH` into `<path>`, unless that pair is the configured
/// failing target, in which case it exits 1.
#[cfg(unix)]
pub struct FakeGoScript {
  os: String,
  arch: String,
  fail_on: Option<String>,
}

#[cfg(unix)]
impl FakeGoScript {
  pub fn new(os: &str, arch: &str) -> Self {
    Self {
      os: os.to_string(),
      arch: arch.to_string(),
      fail_on: None,
    }
  }

  pub fn fail_on(mut self, target: &str) -> Self {
    self.fail_on = Some(target.to_string());
    self
  }

  /// Write the script into `dir` as an executable named `go` and return its path.
  pub fn write(&self, dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
      r#"#!/bin/sh
case "$1" in
  env)
    case "$2" in
      GOOS) echo "{os}" ;;
      GOARCH) echo "{arch}" ;;
      *) echo "unknown key: $2" >&2; exit 2 ;;
    esac
    ;;
  build)
    if [ "$GOOS/$GOARCH" = "{fail_on}" ]; then
      echo "fake build failed for $GOOS/$GOARCH" >&2
      exit 1
    fi
    echo "$GOOS/$GOARCH" > "$3"
    ;;
  *)
    exit 2
    ;;
esac
"#,
      os = self.os,
      arch = self.arch,
      fail_on = self.fail_on.as_deref().unwrap_or(""),
    );

    let path = dir.join("go");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }
}
