//! Place resolution: free-text city (and optional state) to coordinates.
//!
//! The lookup goes through the geocoding service; choosing among its
//! candidates is [`select_candidate`], which needs no network.

mod client;

pub use client::{GeocodeClient, SERVICE};

use serde::Deserialize;

/// Administrative region component type carrying the state name.
const STATE_COMPONENT: &str = "administrative_area_level_1";

/// What the user asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceQuery {
    pub city: String,
    pub state: Option<String>,
}

/// Where the query landed.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub state: Option<String>,
}

/// Geocoding response body.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    /// Absent on some partial matches; such candidates are never chosen.
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl PlaceQuery {
    /// Normalizes both names to title case.
    pub fn new(city: &str, state: Option<&str>) -> Self {
        Self {
            city: title_case(city.trim()),
            state: state
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(title_case),
        }
    }

    /// Address string sent to the geocoder.
    pub fn address(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}", self.city, state),
            None => self.city.clone(),
        }
    }
}

impl GeocodeResult {
    /// `long_name` of the state-level administrative component, if any.
    pub fn state_name(&self) -> Option<&str> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == STATE_COMPONENT))
            .map(|c| c.long_name.as_str())
    }

    fn to_location(&self) -> Option<ResolvedLocation> {
        let location = &self.geometry.as_ref()?.location;
        Some(ResolvedLocation {
            latitude: location.lat,
            longitude: location.lng,
            state: self.state_name().map(str::to_string),
        })
    }
}

/// Pick the candidate for `query`.
///
/// With a state, the first candidate whose state component matches it
/// (after title-casing both) wins. Without one, the first candidate wins
/// outright, even if a later one would fit better. Candidates without
/// coordinates are skipped in both cases.
pub fn select_candidate(query: &PlaceQuery, results: &[GeocodeResult]) -> Option<ResolvedLocation> {
    let mut located = results.iter().filter(|r| r.geometry.is_some());
    let chosen = match &query.state {
        None => located.next(),
        Some(wanted) => {
            let wanted = title_case(wanted);
            located.find(|r| r.state_name().map(title_case).as_deref() == Some(wanted.as_str()))
        }
    }?;
    chosen.to_location()
}

/// Capitalize the first letter of each alphabetic run and lowercase the
/// rest: `"new york"` and `"NEW YORK"` both become `"New York"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}
