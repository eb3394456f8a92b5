use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// Geographic bounding box described by its south-west and north-east corners.
///
/// This is the shape map widgets report for the visible viewport. No
/// antimeridian handling: `south_west.lng` may exceed `north_east.lng` only if
/// the caller passed it that way.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl GeoBounds {
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    pub const fn from_edges(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut out = Self::new(first, first);
        for p in points {
            out.extend(p);
        }
        Some(out)
    }

    pub fn min_lat(&self) -> f64 {
        self.south_west.lat
    }

    pub fn max_lat(&self) -> f64 {
        self.north_east.lat
    }

    pub fn min_lon(&self) -> f64 {
        self.south_west.lng
    }

    pub fn max_lon(&self) -> f64 {
        self.north_east.lng
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    /// Finite corners with south-west not north of north-east.
    pub fn is_valid(&self) -> bool {
        self.south_west.is_finite()
            && self.north_east.is_finite()
            && self.south_west.lat <= self.north_east.lat
    }
}

#[cfg(test)]
mod tests {
    use super::GeoBounds;
    use crate::geo::LatLng;

    #[test]
    fn edges_map_to_corners() {
        let b = GeoBounds::from_edges(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.min_lat(), 10.0);
        assert_eq!(b.min_lon(), 20.0);
        assert_eq!(b.max_lat(), 30.0);
        assert_eq!(b.max_lon(), 40.0);
    }

    #[test]
    fn from_points_covers_every_point() {
        let pts = [
            LatLng::new(1.0, 5.0),
            LatLng::new(-2.0, 3.0),
            LatLng::new(4.0, -1.0),
        ];
        let b = GeoBounds::from_points(pts).expect("bounds");
        assert_eq!(b, GeoBounds::from_edges(-2.0, -1.0, 4.0, 5.0));
        assert!(GeoBounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn extend_and_validity() {
        let mut a = GeoBounds::from_edges(0.0, 0.0, 1.0, 1.0);
        a.extend(LatLng::new(5.0, -3.0));
        assert_eq!(a, GeoBounds::from_edges(0.0, -3.0, 5.0, 1.0));
        assert!(a.is_valid());
        assert!(!GeoBounds::from_edges(5.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!GeoBounds::from_edges(f64::NAN, 0.0, 1.0, 1.0).is_valid());
    }

    #[test]
    fn serializes_corners_in_camel_case() {
        let b = GeoBounds::from_edges(10.0, 20.0, 30.0, 40.0);
        let json = serde_json::to_value(b).expect("serialize");
        assert_eq!(json["southWest"]["lat"], 10.0);
        assert_eq!(json["northEast"]["lng"], 40.0);
    }
}
