//! Core domain logic for waymark.
//!
//! This crate owns everything that does not talk to the network: search
//! centres, the [`SearchClient`] seam, the paginated cursor and capped search
//! built on it, and the batch driver that repeats a search across many
//! locations. Adapters for real providers live in `waymark-data`.

pub mod acquire;
mod distance;
mod location;
pub mod search;
#[doc(hidden)]
pub mod test_support;

pub use acquire::{
    AcquireError, AcquireOptions, BatchLocationAcquirer, ErrorRecord, FnSink, KvSink,
    LineProgress, MapSink, ProgressReporter, SilentProgress, SinkError, acquire_from_locations,
};
pub use distance::haversine_distance;
pub use location::{LatLng, Location};
pub use search::{
    GeocodeCandidate, PageToken, PagedSearchCursor, Pause, PlaceRecord, PlaceSearch,
    RemoteError, ResultPage, SearchClient, SearchError, SearchQuery, SearchSettings,
    TextSearchRequest, ThreadSleep, locate, search,
};
