use formats::ColumnSet;
use foundation::{GeoBounds, LatLng};
use runtime::{VariableSource, interpolate};
use serde::Serialize;

use crate::bridge::SELECTED_VAR;
use crate::features::{BuildReport, Feature, SkippedRow, build_features};
use crate::options::PanelOptions;
use crate::style::{LayerStyle, resolve_style};

/// Zoom levels snap to half steps.
pub const ZOOM_SNAP: f64 = 0.5;

/// How layer keys treat the selected feature.
///
/// Some map widgets suppress popups when a mounted layer changes style in
/// place; giving the selected feature a key outside `0..len` forces the widget
/// to mount it fresh instead.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum RemountPolicy {
    #[default]
    ShiftSelectedKey,
    Stable,
}

impl RemountPolicy {
    pub fn key(self, position: usize, len: usize, selected: bool) -> usize {
        match self {
            RemountPolicy::ShiftSelectedKey if selected => position + len,
            _ => position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: LatLng,
    pub zoom: f64,
    pub zoom_snap: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_bounds: Option<GeoBounds>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

/// One draw call for the map widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub key: usize,
    pub feature: Feature,
    pub style: LayerStyle,
}

/// Everything the map widget needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelFrame {
    pub view: MapView,
    pub tiles: TileLayer,
    pub layers: Vec<MapLayer>,
    pub skipped: Vec<SkippedRow>,
}

impl PanelFrame {
    pub fn selected(&self) -> Option<&MapLayer> {
        self.layers.iter().find(|l| l.feature.selected)
    }
}

/// Resolves the current selected id, `$selected` left verbatim when unset.
pub fn selected_id<S: VariableSource + ?Sized>(variables: &S) -> String {
    interpolate(&format!("${SELECTED_VAR}"), variables)
}

pub fn render_frame<S: VariableSource + ?Sized>(
    data: &ColumnSet,
    variables: &S,
    options: &PanelOptions,
) -> PanelFrame {
    render_frame_with(data, &selected_id(variables), options, RemountPolicy::default())
}

pub fn render_frame_with(
    data: &ColumnSet,
    selected_id: &str,
    options: &PanelOptions,
    policy: RemountPolicy,
) -> PanelFrame {
    let report = build_features(data, selected_id);
    let fit_bounds = if options.map.zoom_to_data_bounds {
        report.bounds()
    } else {
        None
    };

    let BuildReport { features, skipped } = report;
    let len = features.len();
    let layers = features
        .into_iter()
        .enumerate()
        .map(|(position, feature)| MapLayer {
            key: policy.key(position, len, feature.selected),
            style: resolve_style(&feature, options),
            feature,
        })
        .collect();

    PanelFrame {
        view: MapView {
            center: options.map.center(),
            zoom: options.map.zoom,
            zoom_snap: ZOOM_SNAP,
            fit_bounds,
        },
        tiles: TileLayer {
            url: options.map.tile_server_url.clone(),
            attribution: options.map.tile_attribution.clone(),
        },
        layers,
        skipped,
    }
}
