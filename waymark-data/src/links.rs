//! Google Maps URLs for places, map views and directions.
//!
//! Links are assembled locally; nothing here talks to Google.

use std::fmt;

use url::form_urlencoded;
use waymark_core::LatLng;

const MAPS_URL: &str = "https://www.google.com/maps";
const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

/// Default zoom level of map views.
pub const DEFAULT_ZOOM: u8 = 15;

/// What a map view is centred on.
#[derive(Debug, Clone, PartialEq)]
pub enum MapQuery {
    /// Address or free-text place.
    Text(String),
    /// Coordinate pair, rendered as `lat,lng`.
    Coordinates(LatLng),
}

impl From<&str> for MapQuery {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MapQuery {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<LatLng> for MapQuery {
    fn from(value: LatLng) -> Self {
        Self::Coordinates(value)
    }
}

impl From<(f64, f64)> for MapQuery {
    fn from(value: (f64, f64)) -> Self {
        Self::Coordinates(value.into())
    }
}

impl fmt::Display for MapQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Coordinates(point) => point.fmt(f),
        }
    }
}

/// Base map style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapType {
    /// Standard street map (`m`).
    #[default]
    Roadmap,
    /// Aerial imagery (`k`).
    Satellite,
    /// Imagery with street labels (`h`).
    Hybrid,
    /// Relief shading (`p`).
    Terrain,
    /// Google Earth view (`e`).
    GoogleEarth,
}

impl MapType {
    const fn code(self) -> &'static str {
        match self {
            Self::Roadmap => "m",
            Self::Satellite => "k",
            Self::Hybrid => "h",
            Self::Terrain => "p",
            Self::GoogleEarth => "e",
        }
    }
}

/// Overlay drawn on top of the base map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Cycle lanes and paths (`c`).
    Bicycling,
    /// Live traffic (`t`).
    Traffic,
    /// Public transport lines (`p`).
    Transit,
}

impl Layer {
    const fn code(self) -> &'static str {
        match self {
            Self::Bicycling => "c",
            Self::Traffic => "t",
            Self::Transit => "p",
        }
    }
}

/// Means of transport for directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    /// By car.
    Driving,
    /// On foot.
    Walking,
    /// By bicycle.
    Bicycling,
    /// By public transport.
    Transit,
}

impl TravelMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
        }
    }
}

/// Street View camera orientation in degrees; unset angles render as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreetView {
    /// Compass direction the camera faces.
    pub heading: Option<f64>,
    /// Camera tilt above or below the horizon.
    pub pitch: Option<f64>,
}

/// Optional parts of a Google Maps link.
///
/// Setting any of origin, destination, travel mode or waypoints produces a
/// directions link, in which case the map-view options are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLinkOptions {
    /// Zoom level (`z`), 15 by default.
    pub zoom: u8,
    /// Base map style (`t`).
    pub map_type: MapType,
    /// Start of a route.
    pub origin: Option<String>,
    /// End of a route.
    pub destination: Option<String>,
    /// Means of transport for a route.
    pub travel_mode: Option<TravelMode>,
    /// Intermediate stops, joined with `|`.
    pub waypoints: Vec<String>,
    /// Overlay layer.
    pub layer: Option<Layer>,
    /// Replaces the query, zoom and map type when set.
    pub place_id: Option<String>,
    /// Opens Street View at the query location.
    pub street_view: Option<StreetView>,
    /// Interface language (`hl`).
    pub language: Option<String>,
    /// Request the embeddable page (`output=embed`).
    pub embed: bool,
    /// Info-window anchor (`iwloc`).
    pub iwloc: Option<String>,
}

impl Default for MapLinkOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            map_type: MapType::default(),
            origin: None,
            destination: None,
            travel_mode: None,
            waypoints: Vec::new(),
            layer: None,
            place_id: None,
            street_view: None,
            language: None,
            embed: false,
            iwloc: None,
        }
    }
}

impl MapLinkOptions {
    /// Set the zoom level.
    #[must_use]
    pub const fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the base map style.
    #[must_use]
    pub const fn with_map_type(mut self, map_type: MapType) -> Self {
        self.map_type = map_type;
        self
    }

    /// Draw `layer` over the map.
    #[must_use]
    pub const fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Route from `origin` to `destination`.
    #[must_use]
    pub fn with_route(mut self, origin: impl Into<String>, destination: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self.destination = Some(destination.into());
        self
    }

    /// Set the means of transport for directions.
    #[must_use]
    pub const fn with_travel_mode(mut self, mode: TravelMode) -> Self {
        self.travel_mode = Some(mode);
        self
    }

    /// Stop at `waypoints`, in order, along the route.
    #[must_use]
    pub fn with_waypoints<I, S>(mut self, waypoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.waypoints = waypoints.into_iter().map(Into::into).collect();
        self
    }

    /// Point at a specific place by its Google place id.
    #[must_use]
    pub fn with_place_id(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    /// Open Street View with the given camera angles.
    #[must_use]
    pub const fn with_street_view(mut self, heading: Option<f64>, pitch: Option<f64>) -> Self {
        self.street_view = Some(StreetView { heading, pitch });
        self
    }

    /// Set the interface language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Choose whether to request the embeddable page.
    #[must_use]
    pub const fn with_embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }

    /// Set the info-window anchor.
    #[must_use]
    pub fn with_iwloc(mut self, iwloc: impl Into<String>) -> Self {
        self.iwloc = Some(iwloc.into());
        self
    }

    fn wants_directions(&self) -> bool {
        self.origin.is_some()
            || self.destination.is_some()
            || self.travel_mode.is_some()
            || !self.waypoints.is_empty()
    }
}

/// Build a Google Maps link for `query`.
///
/// # Examples
///
/// ```
/// use waymark_data::links::{google_maps_url, Layer, MapLinkOptions, MapType};
///
/// let options = MapLinkOptions::default()
///     .with_zoom(16)
///     .with_map_type(MapType::Satellite)
///     .with_layer(Layer::Traffic);
/// assert_eq!(
///     google_maps_url((43.5300401, 5.4229452), &options),
///     "https://www.google.com/maps?q=43.5300401,5.4229452&z=16&t=k&layer=t",
/// );
/// ```
#[must_use]
pub fn google_maps_url(query: impl Into<MapQuery>, options: &MapLinkOptions) -> String {
    let query = query.into().to_string();
    let mut params: Vec<(&str, String)> = Vec::new();

    let base = if options.wants_directions() {
        params.push(("api", "1".to_owned()));
        if let Some(origin) = &options.origin {
            params.push(("origin", origin.clone()));
        }
        if let Some(destination) = &options.destination {
            params.push(("destination", destination.clone()));
        }
        if let Some(mode) = options.travel_mode {
            params.push(("travelmode", mode.as_str().to_owned()));
        }
        if !options.waypoints.is_empty() {
            params.push(("waypoints", options.waypoints.join("|")));
        }
        DIRECTIONS_URL
    } else {
        if let Some(place_id) = &options.place_id {
            params.push(("place_id", place_id.clone()));
        } else {
            params.push(("q", query.clone()));
            params.push(("z", options.zoom.to_string()));
            params.push(("t", options.map_type.code().to_owned()));
            if let Some(layer) = options.layer {
                params.push(("layer", layer.code().to_owned()));
            }
            if let Some(view) = options.street_view {
                params.push(("cbll", query));
                params.push((
                    "cbp",
                    format!(
                        "12,{},{},0,5,0",
                        view.heading.unwrap_or_default(),
                        view.pitch.unwrap_or_default()
                    ),
                ));
            }
        }
        MAPS_URL
    };

    if let Some(language) = &options.language {
        params.push(("hl", language.clone()));
    }
    if options.embed {
        params.push(("output", "embed".to_owned()));
    }
    if let Some(iwloc) = &options.iwloc {
        params.push(("iwloc", iwloc.clone()));
    }

    let encoded = params
        .iter()
        .map(|(name, value)| format!("{name}={}", encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{encoded}")
}

/// Form-encode `value`, leaving `,` `|` and `~` literal and escaping `*`.
fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace("%2C", ",")
        .replace("%7C", "|")
        .replace("%7E", "~")
        .replace('*', "%2A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn coordinates_render_as_a_pair() {
        assert_eq!(
            google_maps_url(LatLng::new(43.530_040_1, 5.422_945_2), &MapLinkOptions::default()),
            "https://www.google.com/maps?q=43.5300401,5.4229452&z=15&t=m"
        );
    }

    #[rstest]
    fn street_view_repeats_the_query() {
        let options = MapLinkOptions::default().with_street_view(Some(90.0), None);
        assert_eq!(
            google_maps_url("some address", &options),
            "https://www.google.com/maps?q=some+address&z=15&t=m&cbll=some+address&cbp=12,90,0,0,5,0"
        );
    }

    #[rstest]
    #[case(MapType::Hybrid, "h")]
    #[case(MapType::Terrain, "p")]
    #[case(MapType::GoogleEarth, "e")]
    fn map_types_use_single_letter_codes(#[case] map_type: MapType, #[case] code: &str) {
        let url = google_maps_url("Lyon", &MapLinkOptions::default().with_map_type(map_type));
        assert!(url.ends_with(&format!("&t={code}")), "{url}");
    }

    #[rstest]
    fn directions_ignore_the_map_view() {
        let options = MapLinkOptions::default()
            .with_route("Paris", "Lyon, France")
            .with_travel_mode(TravelMode::Driving)
            .with_waypoints(["Dijon", "Beaune"])
            .with_layer(Layer::Transit);
        assert_eq!(
            google_maps_url("ignored", &options),
            "https://www.google.com/maps/dir/?api=1&origin=Paris&destination=Lyon,+France\
             &travelmode=driving&waypoints=Dijon|Beaune"
        );
    }

    #[rstest]
    fn place_ids_replace_the_query() {
        let options = MapLinkOptions::default()
            .with_place_id("ChIJD7fiBh9u5kcRYJSMaMOCCwQ")
            .with_language("fr")
            .with_embed(true)
            .with_iwloc("A");
        assert_eq!(
            google_maps_url("Paris", &options),
            "https://www.google.com/maps?place_id=ChIJD7fiBh9u5kcRYJSMaMOCCwQ&hl=fr&output=embed&iwloc=A"
        );
    }

    #[rstest]
    #[case("café & bar", "caf%C3%A9+%26+bar")]
    #[case("a~b*c", "a~b%2Ac")]
    fn queries_are_form_encoded(#[case] raw: &str, #[case] encoded: &str) {
        assert_eq!(encode(raw), encoded);
    }
}
