//! `acquire` command: one search per listed location, stored as JSON files.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{AcquireOptions, BatchLocationAcquirer, ErrorRecord, LineProgress, Location};
use waymark_data::JsonDirSink;
use waymark_fs::PathKind;

use crate::client::{ClientBuilder, ClientConfig, DefaultClientBuilder, search_settings};
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_KEEP_GOING, ARG_LOCATIONS, ARG_OUTPUT_DIR,
    ARG_PAGE_DELAY_SECS, ARG_QUERY, ARG_RADIUS_METERS, ARG_RESULTS, ARG_START_INDEX,
    ARG_STOP_INDEX, CliError, ENV_ACQUIRE_LOCATIONS, ENV_ACQUIRE_OUTPUT_DIR, ENV_ACQUIRE_QUERY,
};

/// CLI arguments for the `acquire` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run the same text search around every location listed in a \
                 file (one place name or latitude,longitude pair per line) and \
                 write each result list to <output-dir>/<location>.json. \
                 Progress goes to stderr; failures are reported on stdout as \
                 a JSON array.",
    about = "Search around many locations and store the results"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct AcquireArgs {
    /// Free-text search, e.g. "bakery".
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// File listing one location per line.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Directory receiving one JSON file per location.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// Search radius in metres (default 50000).
    #[arg(long = ARG_RADIUS_METERS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius_meters: Option<u32>,
    /// Maximum number of results per location (default 10).
    #[arg(long = ARG_RESULTS, value_name = "count")]
    #[serde(default)]
    pub(crate) results: Option<usize>,
    /// Seconds to wait before each follow-up page (default 2).
    #[arg(long = ARG_PAGE_DELAY_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) page_delay_secs: Option<u64>,
    /// Record failures and carry on instead of stopping at the first one.
    #[arg(
        long = ARG_KEEP_GOING,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) keep_going: Option<bool>,
    /// First line position to process, counting non-empty lines from 0.
    #[arg(long = ARG_START_INDEX, value_name = "index")]
    #[serde(default)]
    pub(crate) start_index: Option<usize>,
    /// Line position at which to stop (exclusive).
    #[arg(long = ARG_STOP_INDEX, value_name = "index")]
    #[serde(default)]
    pub(crate) stop_index: Option<usize>,
    /// API key, "$VAR" to read one from the environment, or "" for none.
    #[arg(long = ARG_API_KEY, value_name = "key|$VAR")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Root URL of the Google Maps web services.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
}

impl AcquireArgs {
    pub(crate) fn into_config(self) -> Result<AcquireConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AcquireConfig::try_from(merged)
    }
}

/// Resolved `acquire` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AcquireConfig {
    pub(crate) query: String,
    pub(crate) locations: Utf8PathBuf,
    pub(crate) output_dir: Utf8PathBuf,
    pub(crate) options: AcquireOptions,
    pub(crate) client: ClientConfig,
}

impl AcquireConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let kind = waymark_fs::path_kind(&self.locations).map_err(|source| {
            CliError::ReadSource {
                field: ARG_LOCATIONS,
                path: self.locations.clone(),
                source,
            }
        })?;
        match kind {
            PathKind::File => Ok(()),
            PathKind::NotFile => Err(CliError::SourcePathNotFile {
                field: ARG_LOCATIONS,
                path: self.locations.clone(),
            }),
            PathKind::Missing => Err(CliError::MissingSourceFile {
                field: ARG_LOCATIONS,
                path: self.locations.clone(),
            }),
        }
    }
}

impl TryFrom<AcquireArgs> for AcquireConfig {
    type Error = CliError;

    fn try_from(args: AcquireArgs) -> Result<Self, Self::Error> {
        let query = args.query.ok_or(CliError::MissingArgument {
            field: ARG_QUERY,
            env: ENV_ACQUIRE_QUERY,
        })?;
        let locations = args.locations.ok_or(CliError::MissingArgument {
            field: ARG_LOCATIONS,
            env: ENV_ACQUIRE_LOCATIONS,
        })?;
        let output_dir = args.output_dir.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT_DIR,
            env: ENV_ACQUIRE_OUTPUT_DIR,
        })?;
        let settings = search_settings(args.radius_meters, args.results, args.page_delay_secs)?;
        let options = AcquireOptions::default()
            .with_settings(settings)
            .with_raise_on_error(!args.keep_going.unwrap_or(false))
            .with_range(args.start_index.unwrap_or(0), args.stop_index);
        Ok(Self {
            query,
            locations,
            output_dir,
            options,
            client: ClientConfig::new(args.api_key, args.base_url),
        })
    }
}

/// One failure in the report printed after a run.
#[derive(Debug, Serialize)]
struct FailureReport {
    index: usize,
    query: String,
    location: Option<String>,
    message: String,
}

impl From<&ErrorRecord> for FailureReport {
    fn from(record: &ErrorRecord) -> Self {
        Self {
            index: record.index,
            query: record.query.clone(),
            location: record.location.as_ref().map(ToString::to_string),
            message: record.error.to_string(),
        }
    }
}

pub(crate) fn run_acquire(args: AcquireArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    run_acquire_with(args, &DefaultClientBuilder, &mut stdout, &mut stderr)
}

pub(crate) fn run_acquire_with(
    args: AcquireArgs,
    builder: &dyn ClientBuilder,
    writer: &mut dyn Write,
    progress: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let locations = load_locations(&config.locations)?;
    debug!("loaded {} locations from {}", locations.len(), config.locations);

    let client = builder.build(&config.client)?;
    let mut sink =
        JsonDirSink::create(&config.output_dir).map_err(|source| CliError::OpenOutput {
            path: config.output_dir.clone(),
            source,
        })?;
    let errors = BatchLocationAcquirer::for_locations(client.as_ref(), config.query.as_str())
        .with_options(config.options)
        .acquire(locations, &mut sink, &mut LineProgress::new(progress))
        .map_err(CliError::Acquire)?;
    info!(
        "stored results under {} with {} failures",
        config.output_dir,
        errors.len()
    );
    write_report(writer, &errors)
}

/// Non-empty lines of `path`, each parsed as a place name or `lat,lng`.
pub(crate) fn load_locations(path: &Utf8Path) -> Result<Vec<Location>, CliError> {
    let text = waymark_fs::read_to_string(path).map_err(|source| CliError::ReadSource {
        field: ARG_LOCATIONS,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let Ok(location) = line.parse::<Location>();
            location
        })
        .collect())
}

fn write_report(writer: &mut dyn Write, errors: &[ErrorRecord]) -> Result<(), CliError> {
    let report: Vec<FailureReport> = errors.iter().map(FailureReport::from).collect();
    let payload = serde_json::to_string_pretty(&report).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AcquireConfig, CliError> {
    let merged = AcquireArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AcquireConfig::try_from(merged)
}
