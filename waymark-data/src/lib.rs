//! Adapters between the waymark domain and the outside world.
//!
//! Responsibilities:
//! - Talk to Google's Geocoding and Places Text Search APIs ([`places`]).
//! - Decide which client and API key a run uses ([`credentials`]).
//! - Persist acquired results as JSON files ([`sink`]).
//! - Build Google Maps links ([`links`]) and Google Forms request bodies
//!   ([`forms`]).
//!
//! Boundaries:
//! - Do not encode search or batching rules (live in `waymark-core`).
//! - Expose blocking interfaces; async I/O stays behind an owned runtime.
#![deny(missing_docs)]

pub mod credentials;
pub mod forms;
pub mod links;
pub mod places;
pub mod sink;

pub use credentials::{ClientSpec, DEFAULT_API_KEY_VAR};
pub use links::{MapLinkOptions, MapQuery, google_maps_url};
pub use places::{DEFAULT_BASE_URL, HttpPlacesClient, PlacesClientConfig, ProviderBuildError};
pub use sink::JsonDirSink;
