//! Facade crate for waymark's capped Google Maps place searches.
//!
//! This crate re-exports the domain types from `waymark-core` and, behind the
//! default `http` feature, the Google Maps adapters from `waymark-data`.

#![forbid(unsafe_code)]

pub use waymark_core::{
    AcquireError, AcquireOptions, BatchLocationAcquirer, ErrorRecord, FnSink, KvSink, LatLng,
    LineProgress, Location, MapSink, PagedSearchCursor, PlaceRecord, PlaceSearch,
    ProgressReporter, RemoteError, SearchClient, SearchError, SearchSettings, SilentProgress,
    SinkError, acquire_from_locations, haversine_distance, locate, search,
};

#[cfg(feature = "http")]
pub use waymark_data::{
    ClientSpec, HttpPlacesClient, JsonDirSink, MapLinkOptions, MapQuery, PlacesClientConfig,
    ProviderBuildError, forms, google_maps_url, links,
};
