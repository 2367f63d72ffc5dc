//! Deterministic test doubles for the search and acquisition seams.
//!
//! Nothing here touches the network or sleeps. Every double records what it
//! was asked to do so tests can assert on call order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use serde_json::json;

use crate::acquire::{AcquireError, ProgressReporter};
use crate::{
    GeocodeCandidate, LatLng, PageToken, Pause, PlaceRecord, RemoteError, ResultPage,
    SearchClient, TextSearchRequest,
};

/// A request observed by [`ScriptedSearchClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    /// A geocoding request for the given text.
    Geocode(String),
    /// A text-search request.
    TextSearch {
        /// Query text.
        query: String,
        /// Search centre.
        location: LatLng,
        /// Bias radius.
        radius_meters: u32,
        /// Continuation token, absent for the first page.
        page_token: Option<PageToken>,
    },
}

#[derive(Debug, Clone)]
enum PageScript {
    Fixed(Vec<usize>),
    Endless(usize),
}

/// Scripted [`SearchClient`] returning generated records.
///
/// Page `p` holds records `{"name": "place-p-i"}` and, unless it is the
/// last scripted page, a continuation token `page-{p + 1}`. The script does
/// not depend on the query or centre, so repeated walks are identical.
#[derive(Debug)]
pub struct ScriptedSearchClient {
    pages: PageScript,
    geocodes: HashMap<String, Vec<LatLng>>,
    geocode_failure: Option<RemoteError>,
    text_search_failure: Option<RemoteError>,
    failing_queries: HashMap<String, RemoteError>,
    calls: RefCell<Vec<ClientCall>>,
}

impl ScriptedSearchClient {
    /// Serve pages of the given sizes, in order.
    #[must_use]
    pub fn with_page_sizes(sizes: &[usize]) -> Self {
        Self::from_script(PageScript::Fixed(sizes.to_vec()))
    }

    /// Serve pages of `page_size` records, always with a continuation token.
    #[must_use]
    pub fn endless(page_size: usize) -> Self {
        Self::from_script(PageScript::Endless(page_size))
    }

    fn from_script(pages: PageScript) -> Self {
        Self {
            pages,
            geocodes: HashMap::new(),
            geocode_failure: None,
            text_search_failure: None,
            failing_queries: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Answer geocoding requests for `place` with `candidates`.
    ///
    /// Unknown places geocode to an empty list.
    #[must_use]
    pub fn with_geocode(mut self, place: &str, candidates: &[LatLng]) -> Self {
        self.geocodes.insert(place.to_owned(), candidates.to_vec());
        self
    }

    /// Fail every geocoding request with `error`.
    #[must_use]
    pub fn failing_geocode(mut self, error: RemoteError) -> Self {
        self.geocode_failure = Some(error);
        self
    }

    /// Fail every text-search request with `error`.
    #[must_use]
    pub fn failing_text_search(mut self, error: RemoteError) -> Self {
        self.text_search_failure = Some(error);
        self
    }

    /// Fail text searches centred on `location` with `error`.
    #[must_use]
    pub fn failing_at(mut self, location: LatLng, error: RemoteError) -> Self {
        self.failing_queries.insert(location.to_string(), error);
        self
    }

    /// The record served at position `index` of page `page`.
    #[must_use]
    pub fn record(page: usize, index: usize) -> PlaceRecord {
        json!({ "name": format!("place-{page}-{index}") })
    }

    /// Every request observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.borrow().clone()
    }

    /// Number of text-search requests observed so far.
    #[must_use]
    pub fn text_search_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, ClientCall::TextSearch { .. }))
            .count()
    }

    fn page_index(token: Option<&PageToken>) -> Result<usize, RemoteError> {
        let Some(token) = token else {
            return Ok(0);
        };
        token
            .as_str()
            .strip_prefix("page-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| RemoteError::Service {
                status: "INVALID_REQUEST".into(),
                message: format!("unknown page token {}", token.as_str()),
            })
    }

    fn page(&self, index: usize) -> Result<ResultPage, RemoteError> {
        let (size, has_next) = match &self.pages {
            PageScript::Endless(size) => (*size, true),
            PageScript::Fixed(sizes) => {
                let size = sizes.get(index).copied().ok_or_else(|| RemoteError::Service {
                    status: "INVALID_REQUEST".into(),
                    message: format!("no page {index}"),
                })?;
                (size, index + 1 < sizes.len())
            }
        };
        let results = (0..size).map(|i| Self::record(index, i)).collect();
        Ok(if has_next {
            ResultPage::with_next(results, PageToken::new(format!("page-{}", index + 1)))
        } else {
            ResultPage::last(results)
        })
    }
}

impl SearchClient for ScriptedSearchClient {
    fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>, RemoteError> {
        self.calls
            .borrow_mut()
            .push(ClientCall::Geocode(query.to_owned()));
        if let Some(error) = &self.geocode_failure {
            return Err(error.clone());
        }
        Ok(self
            .geocodes
            .get(query)
            .map(|coords| {
                coords
                    .iter()
                    .map(|location| GeocodeCandidate {
                        location: *location,
                        formatted_address: Some(query.to_owned()),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn text_search(&self, request: &TextSearchRequest<'_>) -> Result<ResultPage, RemoteError> {
        self.calls.borrow_mut().push(ClientCall::TextSearch {
            query: request.query.to_owned(),
            location: request.location,
            radius_meters: request.radius_meters,
            page_token: request.page_token.cloned(),
        });
        if let Some(error) = &self.text_search_failure {
            return Err(error.clone());
        }
        if let Some(error) = self.failing_queries.get(&request.location.to_string()) {
            return Err(error.clone());
        }
        self.page(Self::page_index(request.page_token)?)
    }
}

/// [`Pause`] that records durations instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingPause {
    pauses: RefCell<Vec<Duration>>,
}

impl RecordingPause {
    /// Every pause requested so far.
    #[must_use]
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}

/// [`ProgressReporter`] that keeps every event for later inspection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingProgress {
    /// `(index, key)` for every element that started processing.
    pub items: Vec<(usize, String)>,
    /// Indices of elements whose failure was captured.
    pub failures: Vec<usize>,
    /// Error count reported at the end of a completed run.
    pub finished: Option<usize>,
}

impl ProgressReporter for RecordingProgress {
    fn item(&mut self, index: usize, key: &str) {
        self.items.push((index, key.to_owned()));
    }

    fn failed(&mut self, index: usize, _error: &AcquireError) {
        self.failures.push(index);
    }

    fn finished(&mut self, error_count: usize) {
        self.finished = Some(error_count);
    }
}
