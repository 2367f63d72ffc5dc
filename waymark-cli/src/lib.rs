//! Command-line interface for waymark's place searches.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod acquire;
mod client;
mod error;
mod search;

use acquire::{AcquireArgs, run_acquire};
pub use error::CliError;
use search::{SearchArgs, run_search};

pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ARG_LOCATION: &str = "location";
pub(crate) const ARG_LOCATIONS: &str = "locations";
pub(crate) const ARG_OUTPUT_DIR: &str = "output-dir";
pub(crate) const ARG_RADIUS_METERS: &str = "radius-meters";
pub(crate) const ARG_RESULTS: &str = "results";
pub(crate) const ARG_PAGE_DELAY_SECS: &str = "page-delay-secs";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_KEEP_GOING: &str = "keep-going";
pub(crate) const ARG_START_INDEX: &str = "start-index";
pub(crate) const ARG_STOP_INDEX: &str = "stop-index";
pub(crate) const ENV_SEARCH_QUERY: &str = "WAYMARK_CMDS_SEARCH_QUERY";
pub(crate) const ENV_SEARCH_LOCATION: &str = "WAYMARK_CMDS_SEARCH_LOCATION";
pub(crate) const ENV_ACQUIRE_QUERY: &str = "WAYMARK_CMDS_ACQUIRE_QUERY";
pub(crate) const ENV_ACQUIRE_LOCATIONS: &str = "WAYMARK_CMDS_ACQUIRE_LOCATIONS";
pub(crate) const ENV_ACQUIRE_OUTPUT_DIR: &str = "WAYMARK_CMDS_ACQUIRE_OUTPUT_DIR";

/// Run the waymark CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, or when
/// the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Search(args) => run_search(args),
        Command::Acquire(args) => run_acquire(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Capped Google Maps place searches, one-off or across many locations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search around one location and print the results.
    Search(SearchArgs),
    /// Search around every location in a file and store the results.
    Acquire(AcquireArgs),
}

#[cfg(test)]
mod tests;
