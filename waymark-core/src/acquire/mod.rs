//! Batch acquisition: one capped search per location, persisted by key.
//!
//! [`BatchLocationAcquirer`] walks a sequence of caller-defined sources,
//! extracts a [`crate::Location`] and a key from each, runs a capped
//! [`crate::PlaceSearch`] and hands the records to a [`KvSink`]. Failures
//! either abort the run or become [`ErrorRecord`]s, depending on
//! [`AcquireOptions::raise_on_error`].

mod driver;
mod progress;
mod sink;

pub use driver::{
    AcquireError, AcquireOptions, BatchLocationAcquirer, ErrorRecord, ExtractError,
    acquire_from_locations,
};
pub use progress::{LineProgress, ProgressReporter, SilentProgress};
pub use sink::{FnSink, KvSink, MapSink, SinkError};
