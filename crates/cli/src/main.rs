mod cmd;
mod output;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gocross_lib::config::ConfigOptions;
use gocross_lib::consts::DEFAULT_OUTPUT_DIR;

use crate::cmd::{cmd_build, cmd_plan};
use crate::output::{OutputFormat, print_error};

/// Long flags that may also be spelled with a single dash (`-project myapp`).
const SINGLE_DASH_FLAGS: &[&str] = &["project", "output"];

/// gocross - build a Go project for the host platform and a list of cross targets
#[derive(Parser, Debug)]
#[command(name = "gocross")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project name used in executable names (default: current directory name)
  #[arg(short, long)]
  project: Option<String>,

  /// Directory the executables are written to
  #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
  output: PathBuf,

  /// Toolchain program to invoke (default: $GOCROSS_TOOLCHAIN, then `go`)
  #[arg(long)]
  toolchain: Option<PathBuf>,

  /// Cross-compilation target as os/arch; repeat to replace the default list
  #[arg(short, long = "target", value_name = "OS/ARCH")]
  targets: Vec<String>,

  /// Show the executables that would be built without building them
  #[arg(long)]
  dry_run: bool,

  /// Output format for the summary
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse_from(normalize_args(std::env::args_os()));
  init_logging(cli.verbose);

  let options = ConfigOptions {
    project: cli.project,
    output: cli.output,
    toolchain: cli.toolchain,
    targets: cli.targets,
  };

  let result = if cli.dry_run {
    cmd_plan(options, cli.format)
  } else {
    cmd_build(options, cli.format)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&err.to_string());
      ExitCode::FAILURE
    }
  }
}

fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

/// Rewrite `-project`/`-output` (and their `=value` forms) to double-dash long flags.
///
/// Arguments after a bare `--` are left untouched.
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
  let mut end_of_flags = false;
  args
    .into_iter()
    .map(|arg| {
      if end_of_flags {
        return arg;
      }
      match arg.to_str() {
        Some("--") => {
          end_of_flags = true;
          arg
        }
        Some(s) if is_single_dash_long_flag(s) => OsString::from(format!("-{}", s)),
        _ => arg,
      }
    })
    .collect()
}

fn is_single_dash_long_flag(arg: &str) -> bool {
  let Some(rest) = arg.strip_prefix('-') else {
    return false;
  };
  if rest.starts_with('-') {
    return false;
  }
  let name = rest.split_once('=').map_or(rest, |(name, _)| name);
  SINGLE_DASH_FLAGS.contains(&name)
}
