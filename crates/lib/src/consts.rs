/// Output directory used when `--output` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "bin";

/// Toolchain program used when neither `--toolchain` nor `GOCROSS_TOOLCHAIN` is set.
pub const DEFAULT_TOOLCHAIN: &str = "go";

/// Environment variable that overrides the toolchain program.
pub const TOOLCHAIN_ENV_VAR: &str = "GOCROSS_TOOLCHAIN";

/// Toolchain environment key holding the target operating system.
pub const OS_ENV_KEY: &str = "GOOS";

/// Toolchain environment key holding the target architecture.
pub const ARCH_ENV_KEY: &str = "GOARCH";

/// OS identifier whose executables carry an `.exe` suffix.
pub const WINDOWS_OS: &str = "windows";

pub const EXE_SUFFIX: &str = ".exe";

/// Cross-compilation targets built after the native one, in order.
pub const DEFAULT_TARGETS: &[&str] = &["windows/amd64", "windows/386", "linux/amd64"];
