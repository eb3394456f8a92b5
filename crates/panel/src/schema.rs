use serde::Serialize;
use serde_json::Value;

use crate::options::PanelOptions;

/// Editor widget a host should use for an option.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionKind {
    Number,
    Boolean,
    Text,
    Color,
}

/// One editable option, addressed by its dotted path in the options document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionField {
    pub path: &'static str,
    pub name: &'static str,
    pub kind: OptionKind,
    pub default_value: Value,
}

const FIELDS: &[(&str, &str, OptionKind)] = &[
    ("map.centerLatitude", "Map center initial latitude", OptionKind::Number),
    ("map.centerLongitude", "Map center initial longitude", OptionKind::Number),
    ("map.zoom", "Initial map zoom", OptionKind::Number),
    ("map.useBoundsInQuery", "Set map bounds as variables", OptionKind::Boolean),
    ("map.zoomToDataBounds", "Zoom to data bounds", OptionKind::Boolean),
    ("map.tileServerUrl", "Tileserver url", OptionKind::Text),
    ("map.tileAttribution", "Tile Attribution Note", OptionKind::Text),
    ("marker.size", "Size of point markers", OptionKind::Number),
    ("marker.highlightSize", "Size of highlighted point markers", OptionKind::Number),
    ("area.fillColor", "Area fill color", OptionKind::Color),
    ("area.fillOpacity", "Area fill opacity", OptionKind::Number),
    ("area.highlightColor", "Area highlight fill color", OptionKind::Color),
    ("area.highlightOpacity", "Area highlight fill opacity", OptionKind::Number),
    ("area.strokeColor", "Area stroke color", OptionKind::Color),
    ("area.strokeWidth", "Area stroke width", OptionKind::Number),
];

/// The option fields in editor order, with defaults read from
/// [`PanelOptions::default`].
pub fn options_schema() -> Vec<OptionField> {
    let defaults = serde_json::to_value(PanelOptions::default()).unwrap_or(Value::Null);
    FIELDS
        .iter()
        .map(|&(path, name, kind)| OptionField {
            path,
            name,
            kind,
            default_value: default_at(&defaults, path),
        })
        .collect()
}

fn default_at(defaults: &Value, path: &str) -> Value {
    let pointer = format!("/{}", path.replace('.', "/"));
    defaults.pointer(&pointer).cloned().unwrap_or(Value::Null)
}
