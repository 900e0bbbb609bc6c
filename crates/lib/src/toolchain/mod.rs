//! The build toolchain seam.
//!
//! The orchestrator only needs two things from a toolchain: print one of its
//! environment values, and build the project for a target into a given path.
//! [`GoToolchain`] provides both by shelling out to the `go` command.

mod go;

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::platform::Target;

pub use go::GoToolchain;

/// Errors from a single toolchain invocation.
#[derive(Debug, Error)]
pub enum ToolchainError {
  /// The process could not be started.
  #[error("failed to run `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },

  /// The process ran but exited unsuccessfully.
  #[error("`{command}` failed with exit code {}", display_code(.code))]
  Failed { command: String, code: Option<i32> },

  /// An environment query printed nothing.
  #[error("`{command}` printed an empty value")]
  EmptyOutput { command: String },
}

fn display_code(code: &Option<i32>) -> String {
  match code {
    Some(code) => code.to_string(),
    None => "none (terminated by signal)".to_string(),
  }
}

/// A build toolchain driven as an opaque external process.
pub trait Toolchain {
  /// Returns the trimmed value of a toolchain environment key (e.g. `GOOS`).
  fn env(&self, key: &str) -> Result<String, ToolchainError>;

  /// Builds the project for `target`, writing the executable to `output`.
  ///
  /// Toolchain output is streamed to the caller's stdout and stderr.
  fn build(&self, target: &Target, output: &Path) -> Result<(), ToolchainError>;
}
