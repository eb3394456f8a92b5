use formats::{Column, ColumnSet, FromCell, Geometry, GeometryError, GeometryKind};
use foundation::GeoBounds;
use runtime::VariableValue;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Logical columns the panel reads from query results.
pub const LOCATION_COLUMN: &str = "location";
pub const DESC_COLUMN: &str = "desc";
pub const ID_COLUMN: &str = "id";
pub const MARKER_COLUMN: &str = "marker";

/// Identifier cell of a row. Only text ids take part in selection; numeric
/// ids are still written back when their feature is clicked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureId {
    Text(String),
    Number(f64),
}

impl FeatureId {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureId::Text(s) => Some(s),
            FeatureId::Number(_) => None,
        }
    }

    pub fn to_variable(&self) -> VariableValue {
        match self {
            FeatureId::Text(s) => VariableValue::text(s.as_str()),
            FeatureId::Number(n) => VariableValue::Number(*n),
        }
    }
}

impl FromCell<'_> for FeatureId {
    fn from_cell(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(FeatureId::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(FeatureId::Number),
            _ => None,
        }
    }
}

/// A drawable row: geometry plus the annotations the renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Source row in the query result.
    pub row: usize,
    pub geometry: Geometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    pub selected: bool,
    /// 0 selects the primary marker icon, anything else the secondary one.
    pub marker_class: f64,
}

impl Feature {
    /// Text id, the only form compared against the selected id.
    pub fn text_id(&self) -> Option<&str> {
        self.id.as_ref().and_then(FeatureId::as_text)
    }

    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum SkipReason {
    /// The location cell is not a string.
    NotText,
    Malformed(String),
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Features in source row order plus the rows that were left out.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub features: Vec<Feature>,
    pub skipped: Vec<SkippedRow>,
}

impl BuildReport {
    /// Bounding box over every feature position.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.features.iter().flat_map(|f| f.geometry.positions()))
    }

    pub fn selected(&self) -> Option<&Feature> {
        self.features.iter().find(|f| f.selected)
    }
}

/// The four logical columns, each resolved independently.
#[derive(Debug, Clone, Copy)]
pub struct FeatureColumns<'a> {
    pub location: Option<Column<'a, &'a str>>,
    pub desc: Option<Column<'a, &'a str>>,
    pub id: Option<Column<'a, FeatureId>>,
    pub marker: Option<Column<'a, f64>>,
}

impl<'a> FeatureColumns<'a> {
    pub fn resolve(set: &'a ColumnSet) -> Self {
        Self {
            location: Column::named(set, LOCATION_COLUMN),
            desc: Column::named(set, DESC_COLUMN),
            id: Column::named(set, ID_COLUMN),
            marker: Column::named(set, MARKER_COLUMN),
        }
    }
}

/// Turns query results into features, marking the one whose id equals
/// `selected_id`.
///
/// Rows with unparsable or undrawable locations are skipped; the result holds
/// one feature per remaining row, in row order.
pub fn build_features(set: &ColumnSet, selected_id: &str) -> BuildReport {
    let columns = FeatureColumns::resolve(set);
    let mut report = BuildReport::default();

    let Some(locations) = columns.location else {
        debug!("no location column; nothing to draw");
        return report;
    };

    for (row, cell) in locations.iter().enumerate() {
        let geometry = match cell
            .ok_or(SkipReason::NotText)
            .and_then(|text| Geometry::from_geojson_str(text).map_err(skip_reason))
        {
            Ok(g) => g,
            Err(reason) => {
                debug!(row, ?reason, "skipping location");
                report.skipped.push(SkippedRow { row, reason });
                continue;
            }
        };

        let id = columns.id.and_then(|c| c.get(row));
        let selected = id.as_ref().and_then(FeatureId::as_text) == Some(selected_id);
        report.features.push(Feature {
            row,
            geometry,
            popup: columns.desc.and_then(|c| c.get(row)).map(str::to_string),
            id,
            selected,
            marker_class: columns.marker.and_then(|c| c.get(row)).unwrap_or(0.0),
        });
    }

    report
}

fn skip_reason(err: GeometryError) -> SkipReason {
    match err {
        GeometryError::Unsupported(ty) => SkipReason::Unsupported(ty),
        other => SkipReason::Malformed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureId, SkipReason, build_features};
    use formats::{ColumnSet, Field, GeometryKind, Series};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    const POINT: &str = r#"{"type":"Point","coordinates":[1,2]}"#;
    const POLY: &str = r#"{"type":"Polygon","coordinates":[[[0,0],[4,0],[4,3],[0,0]]]}"#;
    const LINE: &str = r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#;

    fn named(name: &str, values: Vec<Value>) -> Series {
        Series::new(Some(name), vec![Field::new("Value", values)])
    }

    #[test]
    fn single_selected_point() {
        let set = ColumnSet::new(vec![
            named("location", vec![json!(POINT)]),
            named("id", vec![json!("a")]),
            named("marker", vec![json!(0)]),
        ]);
        let report = build_features(&set, "a");
        assert_eq!(report.features.len(), 1);
        let f = &report.features[0];
        assert!(f.selected);
        assert_eq!(f.marker_class, 0.0);
        assert_eq!(f.kind(), GeometryKind::Point);
        assert_eq!(f.text_id(), Some("a"));
        assert_eq!(f.popup, None);
    }

    #[test]
    fn unsupported_and_malformed_rows_are_skipped_in_order() {
        let set = ColumnSet::new(vec![
            named(
                "location",
                vec![json!(POINT), json!(LINE), json!("{oops"), json!(POLY), json!(7)],
            ),
            named("id", vec![json!("a"), json!("b"), json!("c"), json!("d"), json!("e")]),
        ]);
        let report = build_features(&set, "");
        let rows: Vec<usize> = report.features.iter().map(|f| f.row).collect();
        assert_eq!(rows, vec![0, 3]);
        let ids: Vec<&str> = report.features.iter().filter_map(|f| f.text_id()).collect();
        assert_eq!(ids, vec!["a", "d"]);

        assert_eq!(report.skipped.len(), 3);
        assert_eq!(report.skipped[0].row, 1);
        assert_eq!(report.skipped[0].reason, SkipReason::Unsupported("LineString".to_string()));
        assert!(matches!(report.skipped[1].reason, SkipReason::Malformed(_)));
        assert_eq!(report.skipped[2].reason, SkipReason::NotText);
    }

    #[test]
    fn selection_is_exact_string_equality() {
        let set = ColumnSet::new(vec![
            named("location", vec![json!(POINT), json!(POINT), json!(POINT)]),
            named("id", vec![json!("1"), json!(1), json!("1 ")]),
        ]);
        let report = build_features(&set, "1");
        let selected: Vec<bool> = report.features.iter().map(|f| f.selected).collect();
        assert_eq!(selected, vec![true, false, false]);
        // A numeric id never matches, but it is kept for write-back.
        assert_eq!(report.features[1].id, Some(FeatureId::Number(1.0)));
        assert_eq!(report.features[1].text_id(), None);
    }

    #[test]
    fn missing_id_column_selects_nothing() {
        let set = ColumnSet::new(vec![named("location", vec![json!(POINT), json!(POLY)])]);
        for selected_id in ["", "a", "$selected"] {
            let report = build_features(&set, selected_id);
            assert_eq!(report.features.len(), 2);
            assert!(report.features.iter().all(|f| !f.selected && f.id.is_none()));
            assert!(report.selected().is_none());
        }
    }

    #[test]
    fn missing_location_column_yields_nothing() {
        let set = ColumnSet::new(vec![named("id", vec![json!("a")])]);
        assert_eq!(build_features(&set, "a").features.len(), 0);
        assert_eq!(build_features(&ColumnSet::default(), "a").features.len(), 0);
    }

    #[test]
    fn short_columns_leave_values_absent() {
        let set = ColumnSet::new(vec![
            named("location", vec![json!(POINT), json!(POLY), json!(POINT)]),
            named("desc", vec![json!("first")]),
            named("id", vec![json!("a"), json!("b")]),
            named("marker", vec![json!(2)]),
        ]);
        let report = build_features(&set, "c");
        let f = &report.features;
        assert_eq!(f.len(), 3);
        assert_eq!(f[0].popup.as_deref(), Some("first"));
        assert_eq!(f[1].popup, None);
        assert_eq!(f[2].id, None);
        assert_eq!(f[0].marker_class, 2.0);
        assert_eq!(f[1].marker_class, 0.0);
        assert!(f.iter().all(|f| !f.selected));
    }

    #[test]
    fn first_series_fields_are_the_fallback() {
        let set = ColumnSet::new(vec![Series::new(
            None,
            vec![
                Field::new("location", vec![json!(POLY), json!(POINT)]),
                Field::new("desc", vec![json!("area"), json!("spot")]),
                Field::new("id", vec![json!("x"), json!("y")]),
                Field::new("marker", vec![json!(0), json!(1)]),
            ],
        )]);
        let report = build_features(&set, "y");
        assert_eq!(report.features.len(), 2);
        assert_eq!(report.features[0].kind(), GeometryKind::Polygon);
        assert_eq!(report.features[1].popup.as_deref(), Some("spot"));
        assert_eq!(report.selected().map(|f| f.row), Some(1));
        assert_eq!(report.features[1].marker_class, 1.0);
    }

    #[test]
    fn building_twice_gives_identical_output() {
        let set = ColumnSet::new(vec![
            named("location", vec![json!(POLY), json!(POINT), json!(LINE)]),
            named("id", vec![json!("a"), json!("b"), json!("c")]),
        ]);
        assert_eq!(build_features(&set, "b"), build_features(&set, "b"));
    }

    #[test]
    fn bounds_cover_all_features() {
        let set = ColumnSet::new(vec![named("location", vec![json!(POINT), json!(POLY)])]);
        let b = build_features(&set, "").bounds().expect("bounds");
        assert_eq!((b.min_lat(), b.max_lat()), (0.0, 3.0));
        assert_eq!((b.min_lon(), b.max_lon()), (0.0, 4.0));
    }
}
