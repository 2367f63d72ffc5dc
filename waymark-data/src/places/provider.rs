//! Blocking [`SearchClient`] over the Google Geocoding and Places APIs.
//!
//! The [`SearchClient`] trait is synchronous so the search core stays usable
//! from plain threads. This client bridges to async `reqwest` by blocking on
//! a Tokio runtime it owns, or on the caller's multi-threaded runtime when
//! there is one.

use std::future::Future;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;
use waymark_core::{GeocodeCandidate, RemoteError, ResultPage, SearchClient, TextSearchRequest};

use super::google::{GeocodeResponse, TextSearchResponse};

/// Error type for [`HttpPlacesClient`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[source] url::ParseError),
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default root of the Google Maps web service APIs.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default user agent for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = "waymark-places/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const GEOCODE_PATH: &str = "geocode/json";
const TEXT_SEARCH_PATH: &str = "place/textsearch/json";

/// Configuration for [`HttpPlacesClient`].
#[derive(Clone)]
pub struct PlacesClientConfig {
    /// Root URL the endpoint paths are appended to.
    pub base_url: String,
    /// API key sent as the `key` query parameter, if any.
    pub api_key: Option<String>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Preferred result language, sent as `language`.
    pub language: Option<String>,
}

impl std::fmt::Debug for PlacesClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("language", &self.language)
            .finish()
    }
}

impl Default for PlacesClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            language: None,
        }
    }
}

impl PlacesClientConfig {
    /// Create a configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the preferred result language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// HTTP [`SearchClient`] for Google Maps.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, requests run on the client's own
/// `current_thread` runtime. Inside a multi-threaded runtime the caller's
/// handle is used through [`tokio::task::block_in_place`]. Inside a
/// `current_thread` runtime the client falls back to its own runtime, which
/// blocks the caller's executor for the duration of the request.
pub struct HttpPlacesClient {
    client: Client,
    config: PlacesClientConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpPlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlacesClient")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpPlacesClient {
    /// Create a client for the public Google endpoint with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(PlacesClientConfig::default().with_api_key(api_key))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not absolute, or if the HTTP
    /// client or Tokio runtime fails to build.
    pub fn with_config(config: PlacesClientConfig) -> Result<Self, ProviderBuildError> {
        Url::parse(&config.base_url).map_err(ProviderBuildError::BaseUrl)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &PlacesClientConfig {
        &self.config
    }

    /// Endpoint URL without query string, safe to log.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Full request URL including credentials.
    fn request_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, RemoteError> {
        let endpoint = self.endpoint(path);
        let credentials = self
            .config
            .api_key
            .iter()
            .map(|key| ("key", key.as_str()));
        let language = self
            .config
            .language
            .iter()
            .map(|language| ("language", language.as_str()));
        let pairs = params
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .chain(language)
            .chain(credentials);
        Url::parse_with_params(&endpoint, pairs).map_err(|err| RemoteError::Network {
            endpoint,
            message: err.to_string(),
        })
    }

    fn text_search_params(request: &TextSearchRequest<'_>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", request.query.to_owned()),
            ("location", request.location.to_string()),
            ("radius", request.radius_meters.to_string()),
        ];
        if let Some(token) = request.page_token {
            params.push(("pagetoken", token.as_str().to_owned()));
        }
        params
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let endpoint = self.endpoint(path);
        let url = self.request_url(path, params)?;
        debug!("GET {endpoint}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &endpoint))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err, &endpoint))?;

        response.json().await.map_err(|err| RemoteError::Parse {
            message: err.without_url().to_string(),
        })
    }

    /// Convert a reqwest error to a [`RemoteError`], dropping the URL so the
    /// API key never reaches error messages.
    fn convert_reqwest_error(&self, error: reqwest::Error, endpoint: &str) -> RemoteError {
        let error = error.without_url();
        if error.is_timeout() {
            return RemoteError::Timeout {
                endpoint: endpoint.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RemoteError::Http {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RemoteError::Network {
            endpoint: endpoint.to_owned(),
            message: error.to_string(),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl SearchClient for HttpPlacesClient {
    fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>, RemoteError> {
        let params = [("address", query.to_owned())];
        let response: GeocodeResponse = self.block_on(self.fetch(GEOCODE_PATH, &params))?;
        response.into_candidates()
    }

    fn text_search(&self, request: &TextSearchRequest<'_>) -> Result<ResultPage, RemoteError> {
        let params = Self::text_search_params(request);
        let response: TextSearchResponse = self.block_on(self.fetch(TEXT_SEARCH_PATH, &params))?;
        response.into_page()
    }
}
