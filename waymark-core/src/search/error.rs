use thiserror::Error;

/// Failures surfaced by a [`crate::search::SearchClient`].
///
/// Messages name the endpoint that failed but never the request's query
/// string, which carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request exceeded the configured timeout.
    #[error("request to {endpoint} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was contacted.
        endpoint: String,
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {endpoint} failed with status {status}: {message}")]
    Http {
        /// Endpoint that was contacted.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Transport-level description.
        message: String,
    },
    /// The request never produced a response.
    #[error("network error contacting {endpoint}: {message}")]
    Network {
        /// Endpoint that was contacted.
        endpoint: String,
        /// Transport-level description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response: {message}")]
    Parse {
        /// Decoder description.
        message: String,
    },
    /// The service decoded fine but reported a failure status, e.g. an
    /// exhausted quota or a rejected key.
    #[error("service reported {status}: {message}")]
    Service {
        /// Provider status code, e.g. `"OVER_QUERY_LIMIT"`.
        status: String,
        /// Provider-supplied explanation, possibly empty.
        message: String,
    },
}

/// Errors from resolving a search centre or running a paginated search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Geocoding returned no candidate for a place name.
    #[error("could not find location for {query:?}")]
    LocationNotFound {
        /// The place name that was geocoded.
        query: String,
    },
    /// A coordinate pair contained a non-numeric element.
    #[error("coordinates must be numeric values, got {value}")]
    InvalidCoordinates {
        /// Rendering of the rejected pair.
        value: String,
    },
    /// The location was neither a place name nor a coordinate pair.
    #[error("location must be a place name or a (latitude, longitude) pair, got {found}")]
    UnsupportedLocationType {
        /// Short description of the rejected shape.
        found: String,
    },
    /// The remote service failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
