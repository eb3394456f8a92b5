use serde::Serialize;

use crate::features::Feature;
use crate::options::{AreaOptions, MarkerOptions, PanelOptions};

/// Which of the two marker images a point uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerIcon {
    Primary,
    Secondary,
}

impl MarkerIcon {
    pub fn for_class(marker_class: f64) -> Self {
        if marker_class == 0.0 {
            MarkerIcon::Primary
        } else {
            MarkerIcon::Secondary
        }
    }
}

/// Point marker appearance, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconStyle {
    pub icon: MarkerIcon,
    pub size: f64,
    /// Bottom centre of the icon sits on the point.
    pub anchor: [f64; 2],
    pub popup_anchor: [f64; 2],
}

impl IconStyle {
    pub fn new(icon: MarkerIcon, size: f64) -> Self {
        Self {
            icon,
            size,
            anchor: [size * 0.5, size],
            popup_anchor: [0.0, -size],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaStyle {
    pub stroke_color: String,
    pub stroke_width: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerStyle {
    Icon(IconStyle),
    Area(AreaStyle),
}

pub fn icon_style(marker_class: f64, selected: bool, options: &MarkerOptions) -> IconStyle {
    let size = if selected {
        options.highlight_size
    } else {
        options.size
    };
    IconStyle::new(MarkerIcon::for_class(marker_class), size)
}

pub fn area_style(selected: bool, options: &AreaOptions) -> AreaStyle {
    let (fill_color, fill_opacity) = if selected {
        (&options.highlight_color, options.highlight_opacity)
    } else {
        (&options.fill_color, options.fill_opacity)
    };
    AreaStyle {
        stroke_color: options.stroke_color.clone(),
        stroke_width: options.stroke_width,
        fill_color: fill_color.clone(),
        fill_opacity,
    }
}

/// Points get an icon, polygons get an area style.
pub fn resolve_style(feature: &Feature, options: &PanelOptions) -> LayerStyle {
    if feature.kind().is_area() {
        LayerStyle::Area(area_style(feature.selected, &options.area))
    } else {
        LayerStyle::Icon(icon_style(
            feature.marker_class,
            feature.selected,
            &options.marker,
        ))
    }
}
