//! Unit tests for centre resolution and capped searches.

use std::num::NonZeroUsize;
use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::test_support::{ClientCall, RecordingPause, ScriptedSearchClient};

fn capped(cap: usize) -> SearchSettings {
    SearchSettings::default()
        .with_result_cap(NonZeroUsize::new(cap).expect("non-zero cap"))
        .with_page_delay(Duration::from_secs(2))
}

#[fixture]
fn pause() -> RecordingPause {
    RecordingPause::default()
}

#[rstest]
fn coordinates_skip_geocoding(pause: RecordingPause) {
    let client = ScriptedSearchClient::with_page_sizes(&[1]);
    let search = PlaceSearch::new(&client).with_pause(&pause);

    search
        .search("bakery", &Location::Raw(json!(["48.8566", 2.3522])))
        .expect("search should succeed");

    let calls = client.calls();
    assert!(
        calls
            .iter()
            .all(|call| !matches!(call, ClientCall::Geocode(_))),
        "coordinates must not be geocoded: {calls:?}"
    );
    match calls.first() {
        Some(ClientCall::TextSearch { location, .. }) => {
            assert_eq!(*location, LatLng::new(48.8566, 2.3522));
        }
        other => panic!("expected a text search, got {other:?}"),
    }
}

#[rstest]
fn place_names_use_first_candidate(pause: RecordingPause) {
    let client = ScriptedSearchClient::with_page_sizes(&[1])
        .with_geocode("Aix-en-Provence", &[LatLng::new(43.5297, 5.4474), LatLng::new(0.0, 0.0)]);
    let search = PlaceSearch::new(&client).with_pause(&pause);

    let query = search
        .prepare("meditation", &Location::from("Aix-en-Provence"))
        .expect("centre should resolve");

    assert_eq!(query.centre(), LatLng::new(43.5297, 5.4474));
    assert_eq!(client.calls(), vec![ClientCall::Geocode("Aix-en-Provence".into())]);
}

#[rstest]
fn unknown_place_fails_before_searching(pause: RecordingPause) {
    let client = ScriptedSearchClient::with_page_sizes(&[1]);
    let search = PlaceSearch::new(&client).with_pause(&pause);

    let err = search
        .search("bakery", &Location::from("Atlantis"))
        .expect_err("unknown place should fail");

    assert_eq!(
        err,
        SearchError::LocationNotFound {
            query: "Atlantis".into()
        }
    );
    assert_eq!(client.text_search_count(), 0);
}

#[rstest]
fn invalid_shapes_fail_before_any_request(pause: RecordingPause) {
    let client = ScriptedSearchClient::with_page_sizes(&[1]);
    let search = PlaceSearch::new(&client).with_pause(&pause);

    let err = search
        .search("bakery", &Location::Raw(json!({"lat": 1})))
        .expect_err("objects are unsupported");

    assert!(matches!(err, SearchError::UnsupportedLocationType { .. }));
    assert!(client.calls().is_empty());
}

#[rstest]
fn geocoding_failures_propagate(pause: RecordingPause) {
    let failure = RemoteError::Network {
        endpoint: "https://maps.example/geocode/json".into(),
        message: "connection refused".into(),
    };
    let client = ScriptedSearchClient::with_page_sizes(&[1]).failing_geocode(failure.clone());
    let search = PlaceSearch::new(&client).with_pause(&pause);

    let err = search
        .search("bakery", &Location::from("Paris"))
        .expect_err("geocoding should fail");

    assert_eq!(err, SearchError::Remote(failure));
}

#[rstest]
fn bakery_scenario_spans_two_pages(pause: RecordingPause) {
    let client = ScriptedSearchClient::with_page_sizes(&[2, 2]);
    let settings = capped(3).with_radius_meters(std::num::NonZeroU32::new(1_000).expect("radius"));
    let search = PlaceSearch::new(&client)
        .with_pause(&pause)
        .with_settings(settings);

    let records = search
        .search("bakery", &Location::from((48.8566, 2.3522)))
        .expect("search should succeed");

    assert_eq!(
        records,
        vec![
            ScriptedSearchClient::record(0, 0),
            ScriptedSearchClient::record(0, 1),
            ScriptedSearchClient::record(1, 0),
        ]
    );
    assert_eq!(client.text_search_count(), 2);
    assert_eq!(pause.pauses(), vec![Duration::from_secs(2)]);
}

#[rstest]
fn repeated_searches_are_identical(pause: RecordingPause) {
    let client = ScriptedSearchClient::with_page_sizes(&[3, 3, 3]);
    let search = PlaceSearch::new(&client)
        .with_pause(&pause)
        .with_settings(capped(7));
    let centre = Location::from((1.0, 2.0));

    let first = search.search("cafe", &centre).expect("first search");
    let second = search.search("cafe", &centre).expect("second search");

    assert_eq!(first, second);
    assert_eq!(first.len(), 7);
}

#[rstest]
fn unbounded_cap_returns_every_available_record(pause: RecordingPause) {
    let client = ScriptedSearchClient::with_page_sizes(&[2, 1]);
    let search = PlaceSearch::new(&client)
        .with_pause(&pause)
        .with_settings(SearchSettings::default().with_result_cap(NonZeroUsize::MAX));

    let records = search
        .search("bakery", &Location::from((48.8566, 2.3522)))
        .expect("search should succeed");

    assert_eq!(records.len(), 3);
    assert_eq!(client.text_search_count(), 2);
}

#[rstest]
fn locate_returns_best_candidate() {
    let client = ScriptedSearchClient::with_page_sizes(&[]).with_geocode("Lyon", &[LatLng::new(45.76, 4.83)]);

    assert_eq!(locate(&client, "Lyon"), Ok(LatLng::new(45.76, 4.83)));
    assert!(matches!(
        locate(&client, "Nowhere"),
        Err(SearchError::LocationNotFound { .. })
    ));
}
