//! Search centres and the loosely-typed input they are resolved from.
//!
//! A [`Location`] is what callers hand to a search: a place name that still
//! needs geocoding, a coordinate pair that can be used directly, or a raw JSON
//! value whose shape is only inspected at resolution time. Resolution never
//! touches the network here; geocoding is the search client's job.

use std::fmt;
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::search::SearchError;

/// A WGS84 coordinate pair in decimal degrees.
///
/// # Examples
///
/// ```
/// use waymark_core::LatLng;
///
/// let paris = LatLng::new(48.8566, 2.3522);
/// assert_eq!(paris.to_string(), "48.8566,2.3522");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl LatLng {
    /// Construct a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// `geo` stores points as `x = longitude`, `y = latitude`.
impl From<LatLng> for Point<f64> {
    fn from(value: LatLng) -> Self {
        Self::new(value.lng, value.lat)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Where a search should be centred.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Free-text place name, resolved through geocoding.
    Place(String),
    /// Coordinates used as given.
    Coordinates(LatLng),
    /// Untyped input, classified when the search centre is resolved.
    ///
    /// A JSON string is treated as a place name and a two-element array as a
    /// `[latitude, longitude]` pair whose elements may be numbers or numeric
    /// strings. Any other shape is rejected.
    Raw(Value),
}

/// How a [`Location`] turns into a search centre.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Centre {
    Geocode(String),
    Fixed(LatLng),
}

impl Location {
    /// Classify the location without consulting any remote service.
    pub(crate) fn centre(&self) -> Result<Centre, SearchError> {
        match self {
            Self::Place(name) => Ok(Centre::Geocode(name.clone())),
            Self::Coordinates(coords) => Ok(Centre::Fixed(*coords)),
            Self::Raw(value) => classify_value(value),
        }
    }
}

fn classify_value(value: &Value) -> Result<Centre, SearchError> {
    match value {
        Value::String(name) => Ok(Centre::Geocode(name.clone())),
        Value::Array(items) => match items.as_slice() {
            [lat, lng] => parse_pair(lat, lng).map(Centre::Fixed),
            _ => Err(unsupported(value)),
        },
        _ => Err(unsupported(value)),
    }
}

fn parse_pair(lat: &Value, lng: &Value) -> Result<LatLng, SearchError> {
    match (coordinate(lat), coordinate(lng)) {
        (Some(lat_deg), Some(lng_deg)) => Ok(LatLng::new(lat_deg, lng_deg)),
        _ => Err(SearchError::InvalidCoordinates {
            value: format!("[{lat}, {lng}]"),
        }),
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn unsupported(value: &Value) -> SearchError {
    let found = match value {
        Value::Null => "null".to_owned(),
        Value::Bool(_) => "boolean".to_owned(),
        Value::Number(_) => "number".to_owned(),
        Value::String(_) => "string".to_owned(),
        Value::Array(items) => format!("array of {} elements", items.len()),
        Value::Object(_) => "object".to_owned(),
    };
    SearchError::UnsupportedLocationType { found }
}

/// Renders the form used as a persistence key when no key function is set.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place(name) => f.write_str(name),
            Self::Coordinates(coords) => coords.fmt(f),
            Self::Raw(Value::String(name)) => f.write_str(name),
            Self::Raw(value) => value.fmt(f),
        }
    }
}

impl From<String> for Location {
    fn from(value: String) -> Self {
        Self::Place(value)
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Self::Place(value.to_owned())
    }
}

impl From<LatLng> for Location {
    fn from(value: LatLng) -> Self {
        Self::Coordinates(value)
    }
}

impl From<(f64, f64)> for Location {
    fn from(value: (f64, f64)) -> Self {
        Self::Coordinates(value.into())
    }
}

impl From<Value> for Location {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

/// Parses `"lat,lng"` as coordinates and anything else as a place name.
///
/// # Examples
///
/// ```
/// use waymark_core::{LatLng, Location};
///
/// let coords: Location = "43.53,5.42".parse().unwrap();
/// assert_eq!(coords, Location::Coordinates(LatLng::new(43.53, 5.42)));
///
/// let place: Location = "Aix-en-Provence".parse().unwrap();
/// assert_eq!(place, Location::Place("Aix-en-Provence".into()));
/// ```
impl FromStr for Location {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let parsed = text.split_once(',').and_then(|(lat, lng)| {
            let lat_deg = lat.trim().parse::<f64>().ok()?;
            let lng_deg = lng.trim().parse::<f64>().ok()?;
            Some(LatLng::new(lat_deg, lng_deg))
        });
        Ok(parsed.map_or_else(|| Self::Place(text.to_owned()), Self::Coordinates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn place_names_need_geocoding() {
        let centre = Location::from("Aix-en-Provence")
            .centre()
            .expect("place should classify");
        assert_eq!(centre, Centre::Geocode("Aix-en-Provence".into()));
    }

    #[rstest]
    #[case(json!([43.53, 5.42]))]
    #[case(json!(["43.53", "5.42"]))]
    #[case(json!([" 43.53 ", 5.42]))]
    fn numeric_pairs_are_used_directly(#[case] value: Value) {
        let centre = Location::Raw(value).centre().expect("pair should classify");
        assert_eq!(centre, Centre::Fixed(LatLng::new(43.53, 5.42)));
    }

    #[rstest]
    fn raw_strings_are_place_names() {
        let centre = Location::Raw(json!("Lyon"))
            .centre()
            .expect("string should classify");
        assert_eq!(centre, Centre::Geocode("Lyon".into()));
    }

    #[rstest]
    #[case(json!(["north", 5.42]))]
    #[case(json!([43.53, null]))]
    #[case(json!([true, 5.42]))]
    fn non_numeric_pairs_are_invalid(#[case] value: Value) {
        let err = Location::Raw(value).centre().expect_err("pair should fail");
        assert!(
            matches!(err, SearchError::InvalidCoordinates { .. }),
            "expected InvalidCoordinates, got {err:?}"
        );
    }

    #[rstest]
    #[case(json!(42))]
    #[case(json!(null))]
    #[case(json!([1.0, 2.0, 3.0]))]
    #[case(json!({"lat": 1.0, "lng": 2.0}))]
    fn other_shapes_are_unsupported(#[case] value: Value) {
        let err = Location::Raw(value).centre().expect_err("shape should fail");
        assert!(
            matches!(err, SearchError::UnsupportedLocationType { .. }),
            "expected UnsupportedLocationType, got {err:?}"
        );
    }

    #[rstest]
    #[case(Location::from("Paris"), "Paris")]
    #[case(Location::from((48.5, 2.25)), "48.5,2.25")]
    #[case(Location::Raw(json!("Nice")), "Nice")]
    #[case(Location::Raw(json!([1, 2])), "[1,2]")]
    fn display_renders_key_form(#[case] location: Location, #[case] expected: &str) {
        assert_eq!(location.to_string(), expected);
    }

    #[rstest]
    #[case("48.8566, 2.3522", Location::Coordinates(LatLng::new(48.8566, 2.3522)))]
    #[case("Paris, France", Location::Place("Paris, France".into()))]
    #[case("  Lyon ", Location::Place("Lyon".into()))]
    fn parses_from_text(#[case] text: &str, #[case] expected: Location) {
        let Ok(parsed) = text.parse::<Location>();
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn geo_points_use_longitude_as_x() {
        let point: Point<f64> = LatLng::new(51.5, -0.1).into();
        assert_eq!(point.x(), -0.1);
        assert_eq!(point.y(), 51.5);
    }
}
