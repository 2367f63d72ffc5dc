//! Capped, paginated place search around a resolved centre.
//!
//! A search runs in three steps, all on the calling thread:
//!
//! 1. The [`Location`] is resolved to a centre once, before any text-search
//!    request: place names through [`SearchClient::geocode`], coordinate
//!    pairs directly.
//! 2. A [`PagedSearchCursor`] walks the provider's pages, pausing before
//!    each continuation.
//! 3. Pages are flattened in emission order and truncated to the result cap.
//!
//! Errors are never suppressed here; batch-level tolerance lives in
//! [`crate::acquire`].

mod client;
mod cursor;
mod error;
mod pause;
mod query;

use log::debug;

use crate::location::{Centre, Location};
use crate::LatLng;

pub use client::{
    GeocodeCandidate, PageToken, PlaceRecord, ResultPage, SearchClient, TextSearchRequest,
};
pub use cursor::{PagedSearchCursor, collect_capped, fetch_first_page, fetch_next_page};
pub use error::{RemoteError, SearchError};
pub use pause::{Pause, ThreadSleep};
pub use query::{
    DEFAULT_PAGE_DELAY, DEFAULT_RADIUS_METERS, DEFAULT_RESULT_CAP, SearchQuery, SearchSettings,
};

/// Geocode `place` and return the best candidate's coordinates.
///
/// # Errors
///
/// Returns [`SearchError::LocationNotFound`] when the provider has no
/// candidate, or [`SearchError::Remote`] when the request fails.
pub fn locate<C>(client: &C, place: &str) -> Result<LatLng, SearchError>
where
    C: SearchClient + ?Sized,
{
    let candidates = client.geocode(place)?;
    candidates
        .into_iter()
        .next()
        .map(|candidate| candidate.location)
        .ok_or_else(|| SearchError::LocationNotFound {
            query: place.to_owned(),
        })
}

/// Turn a caller-supplied location into a search centre.
///
/// Coordinates never trigger a geocoding request.
pub fn resolve_centre<C>(client: &C, location: &Location) -> Result<LatLng, SearchError>
where
    C: SearchClient + ?Sized,
{
    match location.centre()? {
        Centre::Fixed(coords) => Ok(coords),
        Centre::Geocode(place) => {
            let coords = locate(client, &place)?;
            debug!("geocoded {place:?} to {coords}");
            Ok(coords)
        }
    }
}

/// A search client paired with the pause and settings used for every query.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use waymark_core::test_support::{RecordingPause, ScriptedSearchClient};
/// use waymark_core::{LatLng, Location, PlaceSearch, SearchSettings};
///
/// let client = ScriptedSearchClient::with_page_sizes(&[2, 2]);
/// let settings = SearchSettings::default().with_result_cap(NonZeroUsize::new(3).unwrap());
/// let search = PlaceSearch::new(&client)
///     .with_pause(RecordingPause::default())
///     .with_settings(settings);
///
/// let records = search.search("bakery", &Location::from(LatLng::new(48.8566, 2.3522)))?;
/// assert_eq!(records.len(), 3);
/// # Ok::<(), waymark_core::SearchError>(())
/// ```
#[derive(Debug)]
pub struct PlaceSearch<'a, C: ?Sized, P = ThreadSleep> {
    client: &'a C,
    pause: P,
    settings: SearchSettings,
}

impl<'a, C> PlaceSearch<'a, C>
where
    C: SearchClient + ?Sized,
{
    /// Search with default settings, sleeping the thread between pages.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self {
            client,
            pause: ThreadSleep,
            settings: SearchSettings {
                radius_meters: DEFAULT_RADIUS_METERS,
                result_cap: DEFAULT_RESULT_CAP,
                page_delay: DEFAULT_PAGE_DELAY,
            },
        }
    }
}

impl<'a, C, P> PlaceSearch<'a, C, P>
where
    C: SearchClient + ?Sized,
    P: Pause,
{
    /// Replace the inter-page pause.
    #[must_use]
    pub fn with_pause<Q: Pause>(self, pause: Q) -> PlaceSearch<'a, C, Q> {
        PlaceSearch {
            client: self.client,
            pause,
            settings: self.settings,
        }
    }

    /// Replace the search settings.
    #[must_use]
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Settings applied to every query.
    #[must_use]
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Build the query for `text` around `location`, resolving the centre.
    pub fn prepare(&self, text: &str, location: &Location) -> Result<SearchQuery, SearchError> {
        let centre = resolve_centre(self.client, location)?;
        Ok(SearchQuery::new(text, centre, self.settings))
    }

    /// A fresh cursor over the pages of `query`.
    #[must_use]
    pub fn pages<'q>(&'q self, query: &'q SearchQuery) -> PagedSearchCursor<'q, C, P> {
        PagedSearchCursor::new(self.client, &self.pause, query)
    }

    /// Run a capped search for `text` around `location`.
    ///
    /// Returns once the result cap is reached or the provider runs out of
    /// pages, whichever comes first.
    pub fn search(&self, text: &str, location: &Location) -> Result<Vec<PlaceRecord>, SearchError> {
        let query = self.prepare(text, location)?;
        let records = collect_capped(self.pages(&query), query.result_cap())?;
        debug!(
            "collected {} records for {text:?} around {}",
            records.len(),
            query.centre()
        );
        Ok(records)
    }
}

/// Run one capped search, sleeping the thread between pages.
///
/// Shorthand for [`PlaceSearch::search`] with the given settings.
pub fn search<C>(
    client: &C,
    text: &str,
    location: &Location,
    settings: SearchSettings,
) -> Result<Vec<PlaceRecord>, SearchError>
where
    C: SearchClient + ?Sized,
{
    PlaceSearch::new(client)
        .with_settings(settings)
        .search(text, location)
}

#[cfg(test)]
mod tests;
