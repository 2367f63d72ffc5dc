//! Search client construction and the settings shared by every subcommand.

use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

use waymark_core::{SearchClient, SearchSettings};
use waymark_data::{ClientSpec, DEFAULT_BASE_URL, PlacesClientConfig};

use crate::{ARG_RADIUS_METERS, ARG_RESULTS, CliError};

/// How to reach the remote search service.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct ClientConfig {
    /// Credential spec: a literal key, `$VAR`, or empty for none.
    pub(crate) api_key: Option<String>,
    /// Root URL of the Google Maps web services.
    pub(crate) base_url: String,
}

impl ClientConfig {
    pub(crate) fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
        }
    }

    /// Credential spec, defaulting to `$GOOGLE_API_KEY` when none was given.
    pub(crate) fn client_spec(&self) -> ClientSpec {
        match self.api_key.as_deref() {
            Some(text) => {
                let Ok(spec) = text.parse::<ClientSpec>();
                spec
            }
            None => ClientSpec::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.client_spec())
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builds a search client for the current invocation.
pub(crate) trait ClientBuilder {
    fn build(&self, config: &ClientConfig) -> Result<Box<dyn SearchClient>, CliError>;
}

pub(crate) struct DefaultClientBuilder;

impl ClientBuilder for DefaultClientBuilder {
    fn build(&self, config: &ClientConfig) -> Result<Box<dyn SearchClient>, CliError> {
        config
            .client_spec()
            .into_client(PlacesClientConfig::new(config.base_url.clone()))
            .map_err(|source| CliError::BuildClient {
                base_url: config.base_url.clone(),
                source,
            })
    }
}

/// Search settings from optional flag values, keeping defaults for unset ones.
pub(crate) fn search_settings(
    radius_meters: Option<u32>,
    results: Option<usize>,
    page_delay_secs: Option<u64>,
) -> Result<SearchSettings, CliError> {
    let mut settings = SearchSettings::default();
    if let Some(value) = radius_meters {
        let radius = NonZeroU32::new(value).ok_or(CliError::ZeroValue {
            field: ARG_RADIUS_METERS,
        })?;
        settings = settings.with_radius_meters(radius);
    }
    if let Some(value) = results {
        let cap = NonZeroUsize::new(value).ok_or(CliError::ZeroValue { field: ARG_RESULTS })?;
        settings = settings.with_result_cap(cap);
    }
    if let Some(secs) = page_delay_secs {
        settings = settings.with_page_delay(Duration::from_secs(secs));
    }
    Ok(settings)
}
