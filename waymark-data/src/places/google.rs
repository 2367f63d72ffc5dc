//! Google Maps Platform response types for Geocoding and Places Text Search.
//!
//! Both APIs wrap their payload in an envelope carrying a `status` string.
//! `OK` and `ZERO_RESULTS` are successes; anything else (`OVER_QUERY_LIMIT`,
//! `REQUEST_DENIED`, `INVALID_REQUEST`, ...) is a service-level failure even
//! though the HTTP status is 200.
//!
//! See: <https://developers.google.com/maps/documentation/places/web-service/search-text>

use serde::Deserialize;
use waymark_core::{GeocodeCandidate, LatLng, PageToken, PlaceRecord, RemoteError, ResultPage};

/// Envelope status shared by both endpoints.
#[derive(Debug, Deserialize)]
pub struct Status {
    /// Provider status code.
    pub status: String,
    /// Explanation supplied with failure statuses.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Status {
    /// Whether the request succeeded, possibly with no results.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }

    fn check(self) -> Result<(), RemoteError> {
        if self.is_ok() {
            return Ok(());
        }
        Err(RemoteError::Service {
            status: self.status,
            message: self.error_message.unwrap_or_default(),
        })
    }
}

/// Geocoding API response.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

/// One geocoding candidate.
#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

impl GeocodeResponse {
    /// Candidates in provider order.
    pub fn into_candidates(self) -> Result<Vec<GeocodeCandidate>, RemoteError> {
        self.status.check()?;
        Ok(self
            .results
            .into_iter()
            .map(|result| GeocodeCandidate {
                location: result.geometry.location,
                formatted_address: result.formatted_address,
            })
            .collect())
    }
}

/// Places Text Search response.
#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default)]
    pub results: Vec<PlaceRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl TextSearchResponse {
    pub fn into_page(self) -> Result<ResultPage, RemoteError> {
        self.status.check()?;
        Ok(match self.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) => ResultPage::with_next(self.results, PageToken::new(token)),
            None => ResultPage::last(self.results),
        })
    }
}
