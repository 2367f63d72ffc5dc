use geo::{Distance, Haversine, Point};

use crate::LatLng;

/// Great-circle distance between two coordinates in metres.
///
/// # Examples
///
/// ```
/// use waymark_core::{LatLng, haversine_distance};
///
/// let paris = LatLng::new(48.8566, 2.3522);
/// assert_eq!(haversine_distance(paris, paris), 0.0);
/// ```
#[must_use]
pub fn haversine_distance(a: LatLng, b: LatLng) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}
