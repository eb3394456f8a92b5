use foundation::LatLng;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A ring of positions (the closing duplicate, if any, is kept as given).
pub type Ring = Vec<LatLng>;

/// Geometries the map panel can draw. Everything else GeoJSON allows is
/// reported as [`GeometryError::Unsupported`].
///
/// Only `[lon, lat]` is kept per position: an altitude (third coordinate) is
/// ignored, and members other than `type` and `coordinates` (such as `bbox`)
/// are not carried over, so [`Geometry::to_geojson_value`] emits a 2D document.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LatLng),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum GeometryKind {
    Point,
    Polygon,
    MultiPolygon,
}

impl GeometryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }

    pub fn is_area(self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    Json(String),
    NotAnObject,
    MissingType,
    /// A well-formed document whose `type` the panel does not draw.
    Unsupported(String),
    InvalidCoordinates(String),
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::Json(msg) => write!(f, "JSON parse error: {msg}"),
            GeometryError::NotAnObject => write!(f, "geometry must be an object"),
            GeometryError::MissingType => write!(f, "geometry missing type"),
            GeometryError::Unsupported(ty) => write!(f, "unsupported geometry type: {ty}"),
            GeometryError::InvalidCoordinates(msg) => write!(f, "invalid coordinates: {msg}"),
        }
    }
}

impl std::error::Error for GeometryError {}

impl Geometry {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeometryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeometryError::Json(e.to_string()))?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeometryError> {
        let obj = value.as_object().ok_or(GeometryError::NotAnObject)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeometryError::MissingType)?;

        // The type check comes first so that e.g. a `LineString` is reported as
        // unsupported even when its coordinates would not parse as ours.
        let kind = match ty {
            "Point" => GeometryKind::Point,
            "Polygon" => GeometryKind::Polygon,
            "MultiPolygon" => GeometryKind::MultiPolygon,
            other => return Err(GeometryError::Unsupported(other.to_string())),
        };

        let coords = obj.get("coordinates").ok_or_else(|| {
            GeometryError::InvalidCoordinates("geometry missing coordinates".to_string())
        })?;

        let parsed = match kind {
            GeometryKind::Point => parse_position(coords).map(Geometry::Point),
            GeometryKind::Polygon => parse_polygon(coords).map(Geometry::Polygon),
            GeometryKind::MultiPolygon => parse_multi_polygon(coords).map(Geometry::MultiPolygon),
        };
        parsed.map_err(GeometryError::InvalidCoordinates)
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Every position of the geometry, rings flattened in document order.
    pub fn positions(&self) -> Vec<LatLng> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::Polygon(rings) => rings.iter().flatten().copied().collect(),
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().copied().collect(),
        }
    }

    pub fn to_geojson_value(&self) -> Value {
        let coords = match self {
            Geometry::Point(p) => position_value(p),
            Geometry::Polygon(rings) => polygon_value(rings),
            Geometry::MultiPolygon(polys) => {
                Value::Array(polys.iter().map(|p| polygon_value(p)).collect())
            }
        };

        let mut obj = Map::new();
        obj.insert(
            "type".to_string(),
            Value::String(self.kind().as_str().to_string()),
        );
        obj.insert("coordinates".to_string(), coords);
        Value::Object(obj)
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_geojson_value().serialize(serializer)
    }
}

fn position_value(p: &LatLng) -> Value {
    let [lon, lat] = p.to_lon_lat();
    Value::Array(vec![Value::from(lon), Value::from(lat)])
}

fn polygon_value(rings: &[Ring]) -> Value {
    Value::Array(
        rings
            .iter()
            .map(|ring| Value::Array(ring.iter().map(position_value).collect()))
            .collect(),
    )
}

fn parse_position(coords: &Value) -> Result<LatLng, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(LatLng::from_lon_lat(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    arr.iter().map(parse_position).collect()
}

fn parse_polygon(coords: &Value) -> Result<Vec<Ring>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_ring).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Ring>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}

#[cfg(test)]
mod tests {
    use super::{Geometry, GeometryError, GeometryKind};
    use foundation::LatLng;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_point_in_lon_lat_order() {
        let g = Geometry::from_geojson_str(r#"{"type":"Point","coordinates":[1,2]}"#)
            .expect("point");
        assert_eq!(g, Geometry::Point(LatLng::new(2.0, 1.0)));
        assert_eq!(g.kind(), GeometryKind::Point);
    }

    #[test]
    fn altitude_and_bbox_are_dropped() {
        let g = Geometry::from_geojson_str(
            r#"{"type":"Point","coordinates":[1,2,300],"bbox":[1,2,1,2]}"#,
        )
        .expect("point");
        assert_eq!(g, Geometry::Point(LatLng::new(2.0, 1.0)));
        assert_eq!(
            g.to_geojson_value(),
            json!({"type": "Point", "coordinates": [1.0, 2.0]})
        );
    }

    #[test]
    fn parses_polygon_and_multipolygon() {
        let poly = Geometry::from_geojson_str(
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#,
        )
        .expect("polygon");
        assert_eq!(poly.kind(), GeometryKind::Polygon);
        assert_eq!(poly.positions().len(), 4);

        let multi = Geometry::from_geojson_str(
            r#"{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[0,1]]],[[[5,5],[6,5],[5,6]]]]}"#,
        )
        .expect("multipolygon");
        assert!(multi.kind().is_area());
        assert_eq!(multi.positions().len(), 6);
    }

    #[test]
    fn reports_unsupported_types() {
        let err = Geometry::from_geojson_str(r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#)
            .unwrap_err();
        assert_eq!(err, GeometryError::Unsupported("LineString".to_string()));

        let err = Geometry::from_geojson_str(
            r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[0,0]}}"#,
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::Unsupported("Feature".to_string()));
    }

    #[test]
    fn reports_malformed_documents() {
        assert!(matches!(
            Geometry::from_geojson_str("{not json").unwrap_err(),
            GeometryError::Json(_)
        ));
        assert_eq!(
            Geometry::from_geojson_str("[1,2]").unwrap_err(),
            GeometryError::NotAnObject
        );
        assert_eq!(
            Geometry::from_geojson_str(r#"{"coordinates":[1,2]}"#).unwrap_err(),
            GeometryError::MissingType
        );
        assert!(matches!(
            Geometry::from_geojson_str(r#"{"type":"Point","coordinates":[1]}"#).unwrap_err(),
            GeometryError::InvalidCoordinates(_)
        ));
        assert!(matches!(
            Geometry::from_geojson_str(r#"{"type":"Polygon"}"#).unwrap_err(),
            GeometryError::InvalidCoordinates(_)
        ));
    }

    #[test]
    fn serializes_back_to_geojson() {
        let payload = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1]]]}"#;
        let g = Geometry::from_geojson_str(payload).expect("polygon");
        assert_eq!(
            serde_json::to_value(&g).expect("serialize"),
            json!({"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]})
        );
    }
}
