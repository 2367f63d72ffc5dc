//! Property-based tests for capped paginated searches.
//!
//! # Invariants tested
//!
//! - **Cap:** a search returns `min(cap, total available)` records.
//! - **Order:** records follow page order, then intra-page order.
//! - **Laziness:** no page beyond the one that fills the cap is fetched.
//! - **Pauses:** exactly one pause precedes every continuation fetch.
//! - **Determinism:** identical walks yield identical results.

use std::num::NonZeroUsize;
use std::time::Duration;

use proptest::prelude::*;
use waymark_core::test_support::{RecordingPause, ScriptedSearchClient};
use waymark_core::{LatLng, Location, PlaceRecord, PlaceSearch, SearchSettings};

/// Every record the scripted pages hold, in emission order.
fn all_records(sizes: &[usize]) -> Vec<PlaceRecord> {
    sizes
        .iter()
        .enumerate()
        .flat_map(|(page, size)| (0..*size).map(move |i| ScriptedSearchClient::record(page, i)))
        .collect()
}

/// Pages a lazy walk must fetch before holding `cap` records.
fn pages_needed(sizes: &[usize], cap: usize) -> usize {
    let mut collected = 0;
    for (fetched, size) in sizes.iter().enumerate() {
        collected += size;
        if collected >= cap {
            return fetched + 1;
        }
    }
    sizes.len()
}

fn settings(cap: NonZeroUsize) -> SearchSettings {
    SearchSettings::default()
        .with_result_cap(cap)
        .with_page_delay(Duration::from_millis(1))
}

fn page_sizes() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0_usize..6, 1..6)
}

fn cap() -> impl Strategy<Value = NonZeroUsize> {
    (1_usize..30).prop_map(|n| NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: the result is the first `cap` records in page order.
    #[test]
    fn capped_prefix_of_all_records(sizes in page_sizes(), cap in cap()) {
        let client = ScriptedSearchClient::with_page_sizes(&sizes);
        let pause = RecordingPause::default();
        let search = PlaceSearch::new(&client).with_pause(&pause).with_settings(settings(cap));

        let records = search
            .search("bakery", &Location::from(LatLng::new(48.8566, 2.3522)))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let everything = all_records(&sizes);
        let expected_len = cap.get().min(everything.len());
        prop_assert_eq!(records.len(), expected_len);
        prop_assert_eq!(&records[..], &everything[..expected_len]);
    }

    /// Property: fetching stops at the page that fills the cap, with one
    /// pause before each continuation.
    #[test]
    fn fetches_only_needed_pages(sizes in page_sizes(), cap in cap()) {
        let client = ScriptedSearchClient::with_page_sizes(&sizes);
        let pause = RecordingPause::default();
        let search = PlaceSearch::new(&client).with_pause(&pause).with_settings(settings(cap));

        search
            .search("bakery", &Location::from((1.0, 2.0)))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let fetched = pages_needed(&sizes, cap.get());
        prop_assert_eq!(client.text_search_count(), fetched);
        prop_assert_eq!(pause.pauses().len(), fetched - 1);
    }

    /// Property: an endless provider never drags the walk past the cap.
    #[test]
    fn endless_pages_stop_at_cap(page_size in 1_usize..8, cap in cap()) {
        let client = ScriptedSearchClient::endless(page_size);
        let pause = RecordingPause::default();
        let search = PlaceSearch::new(&client).with_pause(&pause).with_settings(settings(cap));

        let records = search
            .search("bakery", &Location::from((1.0, 2.0)))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(records.len(), cap.get());
        prop_assert_eq!(client.text_search_count(), cap.get().div_ceil(page_size));
    }

    /// Property: repeating a search against the same script is idempotent.
    #[test]
    fn repeated_walks_match(sizes in page_sizes(), cap in cap()) {
        let client = ScriptedSearchClient::with_page_sizes(&sizes);
        let pause = RecordingPause::default();
        let search = PlaceSearch::new(&client).with_pause(&pause).with_settings(settings(cap));
        let centre = Location::from((1.0, 2.0));

        let first = search.search("cafe", &centre).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let second = search.search("cafe", &centre).map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(first, second);
    }
}
