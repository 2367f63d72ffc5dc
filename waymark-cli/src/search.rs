//! `search` command: one capped search printed as JSON.

use std::io::Write;

use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{Location, PlaceRecord, SearchSettings};

use crate::client::{ClientBuilder, ClientConfig, DefaultClientBuilder, search_settings};
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_LOCATION, ARG_PAGE_DELAY_SECS, ARG_QUERY, ARG_RADIUS_METERS,
    ARG_RESULTS, CliError, ENV_SEARCH_LOCATION, ENV_SEARCH_QUERY,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run one text search centred on a place name or a \
                 latitude,longitude pair, following result pages until the \
                 requested number of results is collected, and print them \
                 as a JSON array.",
    about = "Search for places around one location"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct SearchArgs {
    /// Free-text search, e.g. "bakery".
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Place name or "lat,lng" to centre the search on.
    #[arg(long = ARG_LOCATION, value_name = "place|lat,lng")]
    #[serde(default)]
    pub(crate) location: Option<String>,
    /// Search radius in metres (default 50000).
    #[arg(long = ARG_RADIUS_METERS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius_meters: Option<u32>,
    /// Maximum number of results (default 10).
    #[arg(long = ARG_RESULTS, value_name = "count")]
    #[serde(default)]
    pub(crate) results: Option<usize>,
    /// Seconds to wait before each follow-up page (default 2).
    #[arg(long = ARG_PAGE_DELAY_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) page_delay_secs: Option<u64>,
    /// API key, "$VAR" to read one from the environment, or "" for none.
    #[arg(long = ARG_API_KEY, value_name = "key|$VAR")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Root URL of the Google Maps web services.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchConfig {
    pub(crate) query: String,
    pub(crate) location: Location,
    pub(crate) settings: SearchSettings,
    pub(crate) client: ClientConfig,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let query = args.query.ok_or(CliError::MissingArgument {
            field: ARG_QUERY,
            env: ENV_SEARCH_QUERY,
        })?;
        let location_text = args.location.ok_or(CliError::MissingArgument {
            field: ARG_LOCATION,
            env: ENV_SEARCH_LOCATION,
        })?;
        let Ok(location) = location_text.parse::<Location>();
        let settings = search_settings(args.radius_meters, args.results, args.page_delay_secs)?;
        Ok(Self {
            query,
            location,
            settings,
            client: ClientConfig::new(args.api_key, args.base_url),
        })
    }
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_search_with(args, &DefaultClientBuilder, &mut stdout)
}

pub(crate) fn run_search_with(
    args: SearchArgs,
    builder: &dyn ClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let client = builder.build(&config.client)?;
    let records = waymark_core::search(
        client.as_ref(),
        &config.query,
        &config.location,
        config.settings,
    )
    .map_err(CliError::Search)?;
    info!(
        "found {} results for {:?} around {}",
        records.len(),
        config.query,
        config.location
    );
    write_records(writer, &records)
}

fn write_records(writer: &mut dyn Write, records: &[PlaceRecord]) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(records).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
