//! gocross-lib: cross-compilation orchestration for Go projects
//!
//! This crate provides the pieces behind the `gocross` command:
//! - `config`: resolving the project name, output directory and toolchain
//! - `platform`: `os/arch` target parsing and artifact naming
//! - `toolchain`: the seam to the external build toolchain
//! - `build`: the sequential native + cross build run

pub mod build;
pub mod config;
pub mod consts;
pub mod platform;
pub mod toolchain;
pub mod util;
