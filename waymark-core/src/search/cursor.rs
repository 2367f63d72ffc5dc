//! Forward-only walk over a paginated text search.
//!
//! [`PagedSearchCursor`] yields one [`ResultPage`] per remote fetch and
//! follows continuation tokens until the provider stops issuing them. Only
//! the latest token is retained, so at most one page is ever buffered and a
//! consumed cursor cannot be rewound; searching again means building a new
//! cursor. The cursor pauses before every continuation fetch and never
//! before the first one.

use log::debug;

use super::client::{PageToken, PlaceRecord, ResultPage, SearchClient, TextSearchRequest};
use super::error::RemoteError;
use super::pause::Pause;
use super::query::SearchQuery;

/// Issue the initial request of a search.
pub fn fetch_first_page<C>(client: &C, query: &SearchQuery) -> Result<ResultPage, RemoteError>
where
    C: SearchClient + ?Sized,
{
    client.text_search(&request(query, None))
}

/// Wait out the page delay, then fetch the page behind `token`.
pub fn fetch_next_page<C, P>(
    client: &C,
    pause: &P,
    query: &SearchQuery,
    token: &PageToken,
) -> Result<ResultPage, RemoteError>
where
    C: SearchClient + ?Sized,
    P: Pause + ?Sized,
{
    pause.pause(query.page_delay());
    client.text_search(&request(query, Some(token)))
}

fn request<'a>(query: &'a SearchQuery, page_token: Option<&'a PageToken>) -> TextSearchRequest<'a> {
    TextSearchRequest {
        query: query.text(),
        location: query.centre(),
        radius_meters: query.radius_meters(),
        page_token,
    }
}

#[derive(Debug)]
enum CursorState {
    Start,
    Continue(PageToken),
    Exhausted,
}

/// Lazy sequence of result pages for one query.
///
/// Iteration stops after the first page without a continuation token, or
/// after the first error.
///
/// # Examples
///
/// ```
/// use waymark_core::test_support::{RecordingPause, ScriptedSearchClient};
/// use waymark_core::{LatLng, PagedSearchCursor, SearchQuery, SearchSettings};
///
/// let client = ScriptedSearchClient::with_page_sizes(&[2, 1]);
/// let pause = RecordingPause::default();
/// let query = SearchQuery::new("bakery", LatLng::new(48.8566, 2.3522), SearchSettings::default());
///
/// let sizes: Vec<usize> = PagedSearchCursor::new(&client, &pause, &query)
///     .map(|page| page.map(|p| p.results.len()))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(sizes, vec![2, 1]);
/// assert_eq!(pause.pauses().len(), 1);
/// # Ok::<(), waymark_core::RemoteError>(())
/// ```
pub struct PagedSearchCursor<'a, C: ?Sized, P: ?Sized> {
    client: &'a C,
    pause: &'a P,
    query: &'a SearchQuery,
    state: CursorState,
    pages_fetched: usize,
}

impl<'a, C, P> PagedSearchCursor<'a, C, P>
where
    C: SearchClient + ?Sized,
    P: Pause + ?Sized,
{
    /// Prepare a cursor; nothing is fetched until the first `next()`.
    #[must_use]
    pub const fn new(client: &'a C, pause: &'a P, query: &'a SearchQuery) -> Self {
        Self {
            client,
            pause,
            query,
            state: CursorState::Start,
            pages_fetched: 0,
        }
    }

    /// Whether another fetch may still produce a page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        !matches!(self.state, CursorState::Exhausted)
    }

    /// Number of remote fetches issued so far, including failed ones.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page, or `None` once the provider has no more.
    pub fn fetch_next(&mut self) -> Option<Result<ResultPage, RemoteError>> {
        let outcome = match std::mem::replace(&mut self.state, CursorState::Exhausted) {
            CursorState::Exhausted => return None,
            CursorState::Start => fetch_first_page(self.client, self.query),
            CursorState::Continue(token) => {
                fetch_next_page(self.client, self.pause, self.query, &token)
            }
        };
        self.pages_fetched += 1;

        if let Ok(page) = &outcome {
            debug!(
                "fetched page {} for {:?} ({} records, more: {})",
                self.pages_fetched,
                self.query.text(),
                page.results.len(),
                page.next_page_token.is_some()
            );
            if let Some(token) = &page.next_page_token {
                self.state = CursorState::Continue(token.clone());
            }
        }
        Some(outcome)
    }
}

impl<C, P> Iterator for PagedSearchCursor<'_, C, P>
where
    C: SearchClient + ?Sized,
    P: Pause + ?Sized,
{
    type Item = Result<ResultPage, RemoteError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fetch_next()
    }
}

impl<C, P> std::iter::FusedIterator for PagedSearchCursor<'_, C, P>
where
    C: SearchClient + ?Sized,
    P: Pause + ?Sized,
{
}

/// Concatenate pages in emission order and keep the first `cap` records.
///
/// Pages are pulled only while fewer than `cap` records have been
/// collected, so an endless cursor is never driven past the page that
/// fills the cap. Surplus records from that page are discarded.
pub fn collect_capped<I>(pages: I, cap: usize) -> Result<Vec<PlaceRecord>, RemoteError>
where
    I: IntoIterator<Item = Result<ResultPage, RemoteError>>,
{
    let mut records = Vec::new();
    let mut pages = pages.into_iter();
    while records.len() < cap {
        let Some(outcome) = pages.next() else {
            break;
        };
        let page = outcome?;
        let room = cap - records.len();
        // Grow by what the page delivers; the cap may be far larger.
        records.reserve(page.results.len().min(room));
        records.extend(page.results.into_iter().take(room));
    }
    Ok(records)
}
