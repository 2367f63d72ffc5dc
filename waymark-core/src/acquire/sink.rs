//! Write-only key/value destinations for acquired results.
//!
//! The batch driver only ever calls [`KvSink::write`]. Callers holding a
//! collection wrap it in [`MapSink`]; callers holding a closure wrap it in
//! [`FnSink`]. Anything else implements the trait directly.

use std::error::Error as StdError;

use thiserror::Error;

/// Failure reported by a sink.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SinkError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl SinkError {
    /// A failure described only by `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A failure caused by `source`.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Destination for `(key, value)` pairs.
///
/// Writes happen once per key per run and never concurrently. Writing an
/// existing key overwrites it.
pub trait KvSink<K, V> {
    /// Store `value` under `key`.
    fn write(&mut self, key: K, value: V) -> Result<(), SinkError>;
}

impl<K, V, S> KvSink<K, V> for &mut S
where
    S: KvSink<K, V> + ?Sized,
{
    fn write(&mut self, key: K, value: V) -> Result<(), SinkError> {
        (**self).write(key, value)
    }
}

/// Adapts any collection that can be extended with pairs.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use waymark_core::{KvSink, MapSink};
///
/// let mut map = BTreeMap::new();
/// MapSink::new(&mut map).write("paris".to_owned(), 3)?;
/// assert_eq!(map.get("paris"), Some(&3));
/// # Ok::<(), waymark_core::SinkError>(())
/// ```
#[derive(Debug)]
pub struct MapSink<'a, M: ?Sized> {
    map: &'a mut M,
}

impl<'a, M: ?Sized> MapSink<'a, M> {
    /// Wrap `map`.
    pub const fn new(map: &'a mut M) -> Self {
        Self { map }
    }
}

impl<K, V, M> KvSink<K, V> for MapSink<'_, M>
where
    M: Extend<(K, V)> + ?Sized,
{
    fn write(&mut self, key: K, value: V) -> Result<(), SinkError> {
        self.map.extend(std::iter::once((key, value)));
        Ok(())
    }
}

/// Adapts a two-argument closure.
#[derive(Debug, Clone, Copy)]
pub struct FnSink<F>(pub F);

impl<K, V, F> KvSink<K, V> for FnSink<F>
where
    F: FnMut(K, V) -> Result<(), SinkError>,
{
    fn write(&mut self, key: K, value: V) -> Result<(), SinkError> {
        (self.0)(key, value)
    }
}
