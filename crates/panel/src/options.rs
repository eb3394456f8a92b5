use foundation::LatLng;
use serde::{Deserialize, Serialize};

/// Panel configuration as stored by the dashboard host.
///
/// Every field has a default, so a partial (or empty) options document is
/// valid. The panel never caches these: each render reads the current value.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelOptions {
    pub map: MapOptions,
    pub marker: MarkerOptions,
    pub area: AreaOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: f64,
    /// Publish the visible bounds as `minLat`/`maxLat`/`minLon`/`maxLon`.
    pub use_bounds_in_query: bool,
    /// Ask the renderer to fit the view to the drawn features.
    pub zoom_to_data_bounds: bool,
    pub tile_server_url: String,
    pub tile_attribution: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center_latitude: 40.0,
            center_longitude: -98.0,
            zoom: 3.0,
            use_bounds_in_query: false,
            zoom_to_data_bounds: false,
            tile_server_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution:
                "&copy; <a href=\"http://osm.org/copyright\">OpenStreetMap</a> contributors"
                    .to_string(),
        }
    }
}

impl MapOptions {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.center_latitude, self.center_longitude)
    }
}

/// Icon sizes in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerOptions {
    pub size: f64,
    pub highlight_size: f64,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            size: 25.0,
            highlight_size: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AreaOptions {
    pub stroke_color: String,
    pub stroke_width: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub highlight_color: String,
    pub highlight_opacity: f64,
}

impl Default for AreaOptions {
    fn default() -> Self {
        Self {
            stroke_color: "#006600".to_string(),
            stroke_width: 1.0,
            fill_color: "#00cc99".to_string(),
            fill_opacity: 0.4,
            highlight_color: "#00cc99".to_string(),
            highlight_opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    Json(String),
    Invalid { path: &'static str, reason: String },
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsError::Json(msg) => write!(f, "invalid panel options: {msg}"),
            OptionsError::Invalid { path, reason } => write!(f, "invalid option {path}: {reason}"),
        }
    }
}

impl std::error::Error for OptionsError {}

impl PanelOptions {
    /// Decodes an options document. Only malformed JSON or a mistyped field
    /// fails; values are passed through as the host stored them.
    pub fn from_json_str(payload: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(payload).map_err(|e| OptionsError::Json(e.to_string()))
    }

    /// Reports the first value outside its usual range. Rendering never
    /// depends on this; hosts and tools call it to warn about suspicious
    /// configuration.
    pub fn validate(&self) -> Result<(), OptionsError> {
        check_range("map.centerLatitude", self.map.center_latitude, -90.0, 90.0)?;
        check_range("map.centerLongitude", self.map.center_longitude, -180.0, 180.0)?;
        check_non_negative("map.zoom", self.map.zoom)?;
        check_non_negative("marker.size", self.marker.size)?;
        check_non_negative("marker.highlightSize", self.marker.highlight_size)?;
        check_non_negative("area.strokeWidth", self.area.stroke_width)?;
        check_range("area.fillOpacity", self.area.fill_opacity, 0.0, 1.0)?;
        check_range("area.highlightOpacity", self.area.highlight_opacity, 0.0, 1.0)?;
        Ok(())
    }
}

fn check_range(path: &'static str, v: f64, lo: f64, hi: f64) -> Result<(), OptionsError> {
    if v.is_finite() && v >= lo && v <= hi {
        return Ok(());
    }
    Err(OptionsError::Invalid {
        path,
        reason: format!("{v} is outside [{lo}, {hi}]"),
    })
}

fn check_non_negative(path: &'static str, v: f64) -> Result<(), OptionsError> {
    if v.is_finite() && v >= 0.0 {
        return Ok(());
    }
    Err(OptionsError::Invalid {
        path,
        reason: format!("{v} must be a non-negative number"),
    })
}
