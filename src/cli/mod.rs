// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, StrategyType};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// This function parses the process arguments into a `CliArgs` struct. If
/// parsing fails (unknown flag, missing input path, non-numeric amount) or
/// `--help` is given, clap prints the error or help text and exits.
///
/// # Returns
///
/// Returns a `CliArgs` struct with the parsed command-line arguments.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
