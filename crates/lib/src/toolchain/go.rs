//! `go` command toolchain.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::{Toolchain, ToolchainError};
use crate::consts::{ARCH_ENV_KEY, DEFAULT_TOOLCHAIN, OS_ENV_KEY};
use crate::platform::Target;

/// Drives the Go toolchain via `go env` and `go build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoToolchain {
  program: PathBuf,
  build_stdout_to_stderr: bool,
}

impl GoToolchain {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      build_stdout_to_stderr: false,
    }
  }

  /// Send `go build` stdout to our stderr, keeping our stdout free for machine-readable output.
  pub fn build_stdout_to_stderr(mut self) -> Self {
    self.build_stdout_to_stderr = true;
    self
  }

  pub fn program(&self) -> &Path {
    &self.program
  }

  fn describe(&self, args: &[&str]) -> String {
    let mut command = self.program.display().to_string();
    for arg in args {
      command.push(' ');
      command.push_str(arg);
    }
    command
  }
}

impl Default for GoToolchain {
  fn default() -> Self {
    Self::new(DEFAULT_TOOLCHAIN)
  }
}

impl Toolchain for GoToolchain {
  fn env(&self, key: &str) -> Result<String, ToolchainError> {
    let args = ["env", key];
    let command = self.describe(&args);
    debug!(command = %command, "querying toolchain environment");

    // stderr goes straight to the user; only stdout is captured
    let output = Command::new(&self.program)
      .args(args)
      .stdin(Stdio::null())
      .stderr(Stdio::inherit())
      .output()
      .map_err(|source| ToolchainError::Spawn {
        command: command.clone(),
        source,
      })?;

    if !output.status.success() {
      return Err(ToolchainError::Failed {
        command,
        code: output.status.code(),
      });
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() {
      return Err(ToolchainError::EmptyOutput { command });
    }

    debug!(key = %key, value = %value, "toolchain environment value");
    Ok(value)
  }

  fn build(&self, target: &Target, output: &Path) -> Result<(), ToolchainError> {
    let output_arg = output.display().to_string();
    let command = self.describe(&["build", "-o", &output_arg]);
    info!(target = %target, output = %output.display(), "running toolchain build");

    let stdout = if self.build_stdout_to_stderr {
      Stdio::from(std::io::stderr())
    } else {
      Stdio::inherit()
    };

    let status = Command::new(&self.program)
      .arg("build")
      .arg("-o")
      .arg(output)
      .env(OS_ENV_KEY, &target.os)
      .env(ARCH_ENV_KEY, &target.arch)
      .stdin(Stdio::null())
      .stdout(stdout)
      .stderr(Stdio::inherit())
      .status()
      .map_err(|source| ToolchainError::Spawn {
        command: command.clone(),
        source,
      })?;

    if !status.success() {
      return Err(ToolchainError::Failed {
        command,
        code: status.code(),
      });
    }

    Ok(())
  }
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;
  use crate::util::testutil::FakeGoScript;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  #[serial]
  fn env_returns_trimmed_value() {
    let temp = TempDir::new().unwrap();
    let script = FakeGoScript::new("freebsd", "riscv64").write(temp.path());
    let go = GoToolchain::new(&script);

    assert_eq!(go.env("GOOS").unwrap(), "freebsd");
    assert_eq!(go.env("GOARCH").unwrap(), "riscv64");
  }

  #[test]
  #[serial]
  fn env_unknown_key_fails() {
    let temp = TempDir::new().unwrap();
    let script = FakeGoScript::new("linux", "amd64").write(temp.path());
    let go = GoToolchain::new(&script);

    let err = go.env("GOFLAGS").unwrap_err();
    assert!(matches!(err, ToolchainError::Failed { code: Some(2), .. }));
  }

  #[test]
  #[serial]
  fn env_empty_value_fails() {
    let temp = TempDir::new().unwrap();
    let script = FakeGoScript::new("", "amd64").write(temp.path());
    let go = GoToolchain::new(&script);

    assert!(matches!(go.env("GOOS"), Err(ToolchainError::EmptyOutput { .. })));
  }

  #[test]
  #[serial]
  fn missing_program_is_spawn_error() {
    let go = GoToolchain::new("/nonexistent/toolchain/go");
    let err = go.env("GOOS").unwrap_err();

    assert!(matches!(err, ToolchainError::Spawn { .. }));
    assert!(err.to_string().contains("/nonexistent/toolchain/go env GOOS"));
  }

  #[test]
  #[serial]
  fn build_passes_target_environment() {
    let temp = TempDir::new().unwrap();
    let script = FakeGoScript::new("linux", "amd64").write(temp.path());
    let go = GoToolchain::new(&script);
    let out = temp.path().join("app-windows-386.exe");

    go.build(&Target::new("windows", "386"), &out).unwrap();

    // The fake toolchain writes the GOOS/GOARCH it saw into the artifact
    assert_eq!(std::fs::read_to_string(&out).unwrap().trim(), "windows/386");
  }

  #[test]
  #[serial]
  fn build_failure_reports_exit_code() {
    let temp = TempDir::new().unwrap();
    let script = FakeGoScript::new("linux", "amd64")
      .fail_on("windows/amd64")
      .write(temp.path());
    let go = GoToolchain::new(&script);
    let out = temp.path().join("app-windows-amd64.exe");

    let err = go.build(&Target::new("windows", "amd64"), &out).unwrap_err();

    assert!(matches!(err, ToolchainError::Failed { code: Some(1), .. }));
    assert!(!out.exists());
  }

  #[test]
  fn describe_joins_program_and_args() {
    let go = GoToolchain::default();
    assert_eq!(go.describe(&["env", "GOOS"]), "go env GOOS");
    assert_eq!(go.program(), Path::new("go"));
  }
}
