use std::error::Error as StdError;

use log::{error, info, warn};
use thiserror::Error;

use super::progress::{LineProgress, ProgressReporter};
use super::sink::{KvSink, SinkError};
use crate::search::{
    PlaceRecord, PlaceSearch, Pause, SearchClient, SearchError, SearchSettings, ThreadSleep,
};
use crate::Location;

/// Failure raised by a caller-supplied extraction function.
pub type ExtractError = Box<dyn StdError + Send + Sync>;

type LocationFn<'a, S> = Box<dyn Fn(&S) -> Result<Location, ExtractError> + 'a>;
type KeyFn<'a, S> = Box<dyn Fn(&S) -> Result<String, ExtractError> + 'a>;

/// Why processing a single location source failed.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The location extractor rejected the source.
    #[error("could not extract a location: {0}")]
    Location(#[source] ExtractError),
    /// The key extractor rejected the source.
    #[error("could not extract a key: {0}")]
    Key(#[source] ExtractError),
    /// Resolving the centre or running the search failed.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// The sink refused the results.
    #[error("could not persist results for {key:?}: {source}")]
    Persist {
        /// Key the results were written under.
        key: String,
        /// Sink failure.
        #[source]
        source: SinkError,
    },
}

/// A failure captured instead of aborting the batch.
#[derive(Debug)]
pub struct ErrorRecord {
    /// Zero-based position of the source in the input sequence.
    pub index: usize,
    /// Search text the batch was running.
    pub query: String,
    /// Location extracted for this source, if extraction got that far.
    pub location: Option<Location>,
    /// The captured failure.
    pub error: AcquireError,
}

/// Run-level options for [`BatchLocationAcquirer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Settings applied to every per-location search.
    pub settings: SearchSettings,
    /// Abort on the first failure instead of recording it.
    pub raise_on_error: bool,
    /// First input position processed (inclusive).
    pub start_index: usize,
    /// Input position at which processing stops (exclusive).
    pub stop_index: Option<usize>,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            settings: SearchSettings::default(),
            raise_on_error: true,
            start_index: 0,
            stop_index: None,
        }
    }
}

impl AcquireOptions {
    /// Set the per-location search settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Choose between aborting and recording on failure.
    #[must_use]
    pub const fn with_raise_on_error(mut self, raise_on_error: bool) -> Self {
        self.raise_on_error = raise_on_error;
        self
    }

    /// Restrict processing to input positions `start..stop`.
    #[must_use]
    pub const fn with_range(mut self, start_index: usize, stop_index: Option<usize>) -> Self {
        self.start_index = start_index;
        self.stop_index = stop_index;
        self
    }

    fn window(&self) -> usize {
        self.stop_index
            .map_or(usize::MAX, |stop| stop.saturating_sub(self.start_index))
    }
}

/// Runs one capped search per location source and persists each result list.
///
/// Sources are consumed lazily and strictly in order; one is fully resolved,
/// searched and persisted before the next is pulled. Keys default to the
/// textual form of the extracted [`Location`].
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use waymark_core::test_support::{RecordingPause, ScriptedSearchClient};
/// use waymark_core::{BatchLocationAcquirer, MapSink, SilentProgress};
///
/// let client = ScriptedSearchClient::with_page_sizes(&[2]);
/// let acquirer = BatchLocationAcquirer::for_locations(&client, "bakery")
///     .with_pause(RecordingPause::default());
///
/// let mut results = BTreeMap::new();
/// let errors = acquirer.acquire(
///     [(48.8566, 2.3522), (45.76, 4.83)],
///     &mut MapSink::new(&mut results),
///     &mut SilentProgress,
/// )?;
/// assert!(errors.is_empty());
/// assert_eq!(results.keys().collect::<Vec<_>>(), ["45.76,4.83", "48.8566,2.3522"]);
/// # Ok::<(), waymark_core::AcquireError>(())
/// ```
pub struct BatchLocationAcquirer<'a, S, C: ?Sized, P = ThreadSleep> {
    client: &'a C,
    pause: P,
    query: String,
    get_location: LocationFn<'a, S>,
    get_key: Option<KeyFn<'a, S>>,
    options: AcquireOptions,
}

impl<'a, S, C> BatchLocationAcquirer<'a, S, C>
where
    C: SearchClient + ?Sized,
{
    /// Acquire results for `query`, extracting each location with
    /// `get_location`.
    pub fn new<F>(client: &'a C, query: impl Into<String>, get_location: F) -> Self
    where
        F: Fn(&S) -> Result<Location, ExtractError> + 'a,
    {
        Self {
            client,
            pause: ThreadSleep,
            query: query.into(),
            get_location: Box::new(get_location),
            get_key: None,
            options: AcquireOptions::default(),
        }
    }
}

impl<'a, S, C> BatchLocationAcquirer<'a, S, C>
where
    C: SearchClient + ?Sized,
    S: Clone + Into<Location> + 'a,
{
    /// Acquire results for `query` where every source already is a location.
    pub fn for_locations(client: &'a C, query: impl Into<String>) -> Self {
        Self::new(client, query, |source: &S| Ok(source.clone().into()))
    }
}

impl<'a, S, C, P> BatchLocationAcquirer<'a, S, C, P>
where
    C: SearchClient + ?Sized,
    P: Pause,
{
    /// Derive persistence keys with `get_key` instead of the location text.
    #[must_use]
    pub fn with_key<F>(mut self, get_key: F) -> Self
    where
        F: Fn(&S) -> Result<String, ExtractError> + 'a,
    {
        self.get_key = Some(Box::new(get_key));
        self
    }

    /// Replace the run options.
    #[must_use]
    pub fn with_options(mut self, options: AcquireOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the inter-page pause.
    #[must_use]
    pub fn with_pause<Q: Pause>(self, pause: Q) -> BatchLocationAcquirer<'a, S, C, Q> {
        BatchLocationAcquirer {
            client: self.client,
            pause,
            query: self.query,
            get_location: self.get_location,
            get_key: self.get_key,
            options: self.options,
        }
    }

    /// Options applied to the next run.
    #[must_use]
    pub const fn options(&self) -> &AcquireOptions {
        &self.options
    }

    /// Process every source in the configured index window.
    ///
    /// Returns the failures recorded along the way, in input order. The list
    /// is always empty when `raise_on_error` is set.
    ///
    /// # Errors
    ///
    /// With `raise_on_error` set, the first failure aborts the run and is
    /// returned as is. Writes already made to `sink` are kept.
    pub fn acquire<I, K>(
        &self,
        sources: I,
        sink: &mut K,
        progress: &mut dyn ProgressReporter,
    ) -> Result<Vec<ErrorRecord>, AcquireError>
    where
        I: IntoIterator<Item = S>,
        K: KvSink<String, Vec<PlaceRecord>> + ?Sized,
    {
        let search = PlaceSearch::new(self.client)
            .with_pause(&self.pause)
            .with_settings(self.options.settings);
        let window = sources
            .into_iter()
            .enumerate()
            .skip(self.options.start_index)
            .take(self.options.window());

        let mut errors = Vec::new();
        let mut processed = 0_usize;
        for (index, source) in window {
            processed += 1;
            let mut location = None;
            let outcome = self.process(&search, index, &source, &mut location, sink, progress);
            let Err(err) = outcome else {
                continue;
            };
            if self.options.raise_on_error {
                error!("aborting batch for {:?} at index {index}: {err}", self.query);
                return Err(err);
            }
            warn!("index {index} failed for {:?}: {err}", self.query);
            progress.failed(index, &err);
            errors.push(ErrorRecord {
                index,
                query: self.query.clone(),
                location,
                error: err,
            });
        }

        progress.finished(errors.len());
        info!(
            "batch for {:?} processed {processed} sources with {} errors",
            self.query,
            errors.len()
        );
        Ok(errors)
    }

    fn process<Q, K>(
        &self,
        search: &PlaceSearch<'_, C, Q>,
        index: usize,
        source: &S,
        location: &mut Option<Location>,
        sink: &mut K,
        progress: &mut dyn ProgressReporter,
    ) -> Result<(), AcquireError>
    where
        Q: Pause,
        K: KvSink<String, Vec<PlaceRecord>> + ?Sized,
    {
        let resolved = location.insert((self.get_location)(source).map_err(AcquireError::Location)?);
        let key = match &self.get_key {
            Some(get_key) => get_key(source).map_err(AcquireError::Key)?,
            None => resolved.to_string(),
        };
        progress.item(index, &key);

        let records = search.search(&self.query, resolved)?;
        sink.write(key.clone(), records)
            .map_err(|source| AcquireError::Persist { key, source })
    }
}

impl<S, C: ?Sized, P> std::fmt::Debug for BatchLocationAcquirer<'_, S, C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLocationAcquirer")
            .field("query", &self.query)
            .field("custom_key", &self.get_key.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Acquire results for `query` at every location, reporting progress on
/// standard error.
///
/// Keys are the textual form of each location.
///
/// # Errors
///
/// See [`BatchLocationAcquirer::acquire`].
pub fn acquire_from_locations<C, I, K>(
    client: &C,
    query: &str,
    locations: I,
    sink: &mut K,
    options: AcquireOptions,
) -> Result<Vec<ErrorRecord>, AcquireError>
where
    C: SearchClient + ?Sized,
    I: IntoIterator,
    I::Item: Clone + Into<Location>,
    K: KvSink<String, Vec<PlaceRecord>> + ?Sized,
{
    BatchLocationAcquirer::for_locations(client, query)
        .with_options(options)
        .acquire(locations, sink, &mut LineProgress::stderr())
}
