//! HTTP search client for Google Maps geocoding and Places text search.
//!
//! [`HttpPlacesClient`] implements [`waymark_core::SearchClient`], so it can
//! drive the paginated cursor and batch acquirer directly.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use waymark_core::{Location, SearchSettings, search};
//! use waymark_data::places::{HttpPlacesClient, PlacesClientConfig};
//!
//! let config = PlacesClientConfig::default()
//!     .with_api_key("my-key")
//!     .with_timeout(Duration::from_secs(10));
//! let client = HttpPlacesClient::with_config(config)?;
//!
//! let records = search(
//!     &client,
//!     "meditation",
//!     &Location::from("Aix-en-Provence"),
//!     SearchSettings::default(),
//! )?;
//! println!("{} places", records.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod google;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpPlacesClient, PlacesClientConfig, ProviderBuildError,
};
