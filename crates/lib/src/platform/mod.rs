//! Target platform identifiers.
//!
//! A [`Target`] is an operating system and architecture pair as the toolchain
//! names them (e.g. `linux/amd64`, `windows/386`). Targets are parsed from
//! `os/arch` specifiers and determine the file name of each build artifact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{EXE_SUFFIX, WINDOWS_OS};

/// Errors from parsing an `os/arch` specifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetParseError {
  /// The specifier does not split into exactly two components on `/`.
  #[error("invalid platform specifier '{0}': expected <os>/<arch>")]
  Malformed(String),

  /// One of the two components is empty.
  #[error("invalid platform specifier '{0}': os and arch must not be empty")]
  EmptyComponent(String),
}

/// An operating system and architecture pair to build for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
  pub os: String,
  pub arch: String,
}

impl Target {
  pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
    Self {
      os: os.into(),
      arch: arch.into(),
    }
  }

  pub fn is_windows(&self) -> bool {
    self.os == WINDOWS_OS
  }

  /// File name of the executable built for this target.
  ///
  /// The name is `{project}-{os}-{arch}`, with `.exe` appended only for the
  /// Windows OS identifier.
  pub fn artifact_name(&self, project: &str) -> String {
    let mut name = format!("{}-{}-{}", project, self.os, self.arch);
    if self.is_windows() {
      name.push_str(EXE_SUFFIX);
    }
    name
  }
}

impl FromStr for Target {
  type Err = TargetParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let parts: Vec<&str> = s.split('/').collect();
    let [os, arch] = parts.as_slice() else {
      return Err(TargetParseError::Malformed(s.to_string()));
    };
    if os.is_empty() || arch.is_empty() {
      return Err(TargetParseError::EmptyComponent(s.to_string()));
    }
    Ok(Self::new(*os, *arch))
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}
