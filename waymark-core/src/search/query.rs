//! Search parameters: the tunable settings and the immutable per-call query.

use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

use crate::LatLng;

/// Default search radius in metres.
#[expect(clippy::expect_used, reason = "the literal is non-zero")]
pub const DEFAULT_RADIUS_METERS: NonZeroU32 = NonZeroU32::new(50_000).expect("non-zero literal");

/// Default number of records a search returns.
#[expect(clippy::expect_used, reason = "the literal is non-zero")]
pub const DEFAULT_RESULT_CAP: NonZeroUsize = NonZeroUsize::new(10).expect("non-zero literal");

/// Default pause before each continuation request.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// Tunable parameters shared by every search in a run.
///
/// # Examples
///
/// ```
/// use std::num::{NonZeroU32, NonZeroUsize};
/// use std::time::Duration;
/// use waymark_core::SearchSettings;
///
/// let settings = SearchSettings::default()
///     .with_radius_meters(NonZeroU32::new(1_000).unwrap())
///     .with_result_cap(NonZeroUsize::new(3).unwrap())
///     .with_page_delay(Duration::ZERO);
/// assert_eq!(settings.radius_meters.get(), 1_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Radius around the centre that biases the search.
    pub radius_meters: NonZeroU32,
    /// Maximum number of records collected per search.
    pub result_cap: NonZeroUsize,
    /// Blocking pause before every continuation request.
    pub page_delay: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_METERS,
            result_cap: DEFAULT_RESULT_CAP,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }
}

impl SearchSettings {
    /// Set the search radius.
    #[must_use]
    pub const fn with_radius_meters(mut self, radius_meters: NonZeroU32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    /// Set the result cap.
    #[must_use]
    pub const fn with_result_cap(mut self, result_cap: NonZeroUsize) -> Self {
        self.result_cap = result_cap;
        self
    }

    /// Set the inter-page delay.
    #[must_use]
    pub const fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }
}

/// One fully resolved search: text, centre and settings.
///
/// Built fresh for every call and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    text: String,
    centre: LatLng,
    settings: SearchSettings,
}

impl SearchQuery {
    /// Construct a query around an already resolved centre.
    #[must_use]
    pub fn new(text: impl Into<String>, centre: LatLng, settings: SearchSettings) -> Self {
        Self {
            text: text.into(),
            centre,
            settings,
        }
    }

    /// Free-text query.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolved search centre.
    #[must_use]
    pub const fn centre(&self) -> LatLng {
        self.centre
    }

    /// Search radius in metres.
    #[must_use]
    pub const fn radius_meters(&self) -> u32 {
        self.settings.radius_meters.get()
    }

    /// Maximum number of records to collect.
    #[must_use]
    pub const fn result_cap(&self) -> usize {
        self.settings.result_cap.get()
    }

    /// Pause before each continuation request.
    #[must_use]
    pub const fn page_delay(&self) -> Duration {
        self.settings.page_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_documented_values() {
        let settings = SearchSettings::default();
        assert_eq!(settings.radius_meters.get(), 50_000);
        assert_eq!(settings.result_cap.get(), 10);
        assert_eq!(settings.page_delay, Duration::from_secs(2));
    }

    #[rstest]
    fn query_exposes_settings() {
        let settings = SearchSettings::default()
            .with_result_cap(NonZeroUsize::new(3).expect("non-zero"))
            .with_page_delay(Duration::from_millis(5));
        let query = SearchQuery::new("bakery", LatLng::new(48.8566, 2.3522), settings);

        assert_eq!(query.text(), "bakery");
        assert_eq!(query.centre(), LatLng::new(48.8566, 2.3522));
        assert_eq!(query.radius_meters(), 50_000);
        assert_eq!(query.result_cap(), 3);
        assert_eq!(query.page_delay(), Duration::from_millis(5));
    }
}
