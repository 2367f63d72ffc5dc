//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;
use waymark_cli::CliError;

fn main() -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match waymark_cli::run() {
        // Help, version and usage errors print through clap with its exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        outcome => Ok(outcome?),
    }
}
