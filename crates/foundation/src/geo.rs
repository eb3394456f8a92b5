use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
///
/// GeoJSON stores positions as `[lon, lat]`; this type keeps the two named so
/// callers never have to remember the axis order.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a position from GeoJSON axis order.
    pub const fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lng: lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Returns `[lon, lat]`, the GeoJSON coordinate order.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}
