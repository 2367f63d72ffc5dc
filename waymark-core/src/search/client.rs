//! The capability a search needs from a remote place-search service.

use std::fmt;

use serde_json::Value;

use crate::LatLng;

use super::error::RemoteError;

/// A provider-defined result record.
///
/// Records are passed through untouched; nothing in this crate inspects
/// their fields.
pub type PlaceRecord = Value;

/// Opaque continuation token returned by the provider.
///
/// Tokens must be echoed back verbatim to fetch the following page.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PageToken(String);

impl PageToken {
    /// Wrap a provider-issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token exactly as the provider issued it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens can be long; logs only need to know one exists.
impl fmt::Debug for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageToken({} chars)", self.0.len())
    }
}

/// One page of results as returned by a single remote fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    /// Records in provider order.
    pub results: Vec<PlaceRecord>,
    /// Present when the provider has more results.
    pub next_page_token: Option<PageToken>,
}

impl ResultPage {
    /// A page with no continuation.
    #[must_use]
    pub const fn last(results: Vec<PlaceRecord>) -> Self {
        Self {
            results,
            next_page_token: None,
        }
    }

    /// A page followed by another one reachable through `token`.
    #[must_use]
    pub const fn with_next(results: Vec<PlaceRecord>, token: PageToken) -> Self {
        Self {
            results,
            next_page_token: Some(token),
        }
    }
}

/// A geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Position of the match.
    pub location: LatLng,
    /// Human-readable address, when the provider supplies one.
    pub formatted_address: Option<String>,
}

/// Parameters of one text-search request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSearchRequest<'a> {
    /// Free-text query.
    pub query: &'a str,
    /// Centre that biases the search.
    pub location: LatLng,
    /// Bias radius in metres.
    pub radius_meters: u32,
    /// Continuation token; `None` for the first page.
    pub page_token: Option<&'a PageToken>,
}

/// Remote geocoding and paginated text search.
///
/// The trait is synchronous: implementations block the calling thread until
/// the remote service answers. A single client is reused for every page and
/// every location of a run, so implementations must not keep per-query
/// state.
///
/// # Examples
///
/// ```
/// use waymark_core::{
///     GeocodeCandidate, LatLng, RemoteError, ResultPage, SearchClient, TextSearchRequest,
/// };
///
/// struct Nowhere;
///
/// impl SearchClient for Nowhere {
///     fn geocode(&self, _query: &str) -> Result<Vec<GeocodeCandidate>, RemoteError> {
///         Ok(Vec::new())
///     }
///
///     fn text_search(&self, _request: &TextSearchRequest<'_>) -> Result<ResultPage, RemoteError> {
///         Ok(ResultPage::default())
///     }
/// }
///
/// assert!(Nowhere.geocode("Atlantis")?.is_empty());
/// # Ok::<(), RemoteError>(())
/// ```
pub trait SearchClient {
    /// Resolve a free-text place to candidate coordinates, best match first.
    ///
    /// An empty list means the place was not found.
    fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>, RemoteError>;

    /// Fetch one page of text-search results.
    fn text_search(&self, request: &TextSearchRequest<'_>) -> Result<ResultPage, RemoteError>;
}
