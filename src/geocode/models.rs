use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Geocoding API result (direct city lookup)
#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    pub state: Option<String>,
}

impl GeoLocation {
    /// "Name, State, Country", skipping absent parts
    pub fn display_name(&self) -> String {
        let mut display = self.name.clone();
        for part in [self.state.as_deref(), Some(self.country.as_str())]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
        {
            display.push_str(", ");
            display.push_str(part);
        }
        display
    }
}

/// Response from ZIP code geocoding API (different format than city)
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ZipGeoLocation {
    pub zip: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
}

impl From<ZipGeoLocation> for GeoLocation {
    fn from(z: ZipGeoLocation) -> Self {
        GeoLocation {
            name: z.name,
            lat: z.lat,
            lon: z.lon,
            country: z.country,
            state: None,
        }
    }
}

/// A place the other endpoints can fetch weather for
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationInfo {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl From<GeoLocation> for LocationInfo {
    fn from(geo: GeoLocation) -> Self {
        LocationInfo {
            name: geo.display_name(),
            lat: geo.lat,
            lon: geo.lon,
            country: Some(geo.country),
            state: geo.state,
        }
    }
}

/// Where to fetch weather: coordinates plus a display name when known
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
}

impl From<&GeoLocation> for ResolvedLocation {
    fn from(geo: &GeoLocation) -> Self {
        ResolvedLocation {
            lat: geo.lat,
            lon: geo.lon,
            name: Some(geo.display_name()),
        }
    }
}
