//! Magnitude encoding: maps an earthquake magnitude to the radius, color and
//! fill opacity of its map marker.
//!
//! Color bands use strict `<` and opacity bands use `<=`, so the two disagree
//! at integer boundaries (a magnitude of exactly 2.0 is colored `#fff600` but
//! gets opacity 0.4). Both operators are kept as they are.

use serde::{Serialize, Serializer};

/// Scale factor from magnitude to marker radius.
pub const RADIUS_SCALE: f64 = 10.0;

/// Smallest radius handed to the renderer.
pub const MIN_RENDER_RADIUS: f64 = 1.0;

/// Marker hue for a magnitude band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Lime,
    YellowGreen,
    Yellow,
    Amber,
    Orange,
    OrangeRed,
    Red,
}

impl Color {
    pub fn hex(self) -> &'static str {
        match self {
            Color::Lime => "#7cff00",
            Color::YellowGreen => "#c2ff00",
            Color::Yellow => "#fff600",
            Color::Amber => "#ffd300",
            Color::Orange => "#ff8c00",
            Color::OrangeRed => "#ff4600",
            Color::Red => "#ff0000",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// Upper bounds (exclusive) of the color bands, lowest first. Anything not
/// below the last bound is `Color::Red`.
pub const COLOR_BANDS: [(f64, Color); 6] = [
    (1.0, Color::Lime),
    (2.0, Color::YellowGreen),
    (3.0, Color::Yellow),
    (4.0, Color::Amber),
    (5.0, Color::Orange),
    (6.0, Color::OrangeRed),
];

/// Upper bounds (inclusive) of the opacity bands, lowest first.
pub const OPACITY_BANDS: [(f64, f64); 3] = [(2.0, 0.4), (4.0, 0.6), (6.0, 0.8)];

/// Opacity for magnitudes above every opacity band.
pub const MAX_OPACITY: f64 = 1.0;

pub fn radius_for(magnitude: f64) -> f64 {
    magnitude * RADIUS_SCALE
}

pub fn color_for(magnitude: f64) -> Color {
    COLOR_BANDS
        .iter()
        .find(|(upper, _)| magnitude < *upper)
        .map(|(_, color)| *color)
        .unwrap_or(Color::Red)
}

pub fn opacity_for(magnitude: f64) -> f64 {
    OPACITY_BANDS
        .iter()
        .find(|(upper, _)| magnitude <= *upper)
        .map(|(_, opacity)| *opacity)
        .unwrap_or(MAX_OPACITY)
}

/// Radius actually sent to the map. Non-positive and NaN radii collapse to
/// `MIN_RENDER_RADIUS`.
pub fn render_radius(radius: f64) -> f64 {
    // f64::max returns the non-NaN operand
    radius.max(MIN_RENDER_RADIUS)
}

/// The three visual parameters of one marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub color: Color,
    pub fill_opacity: f64,
}

/// Encoding seam between feed features and the render call site.
pub trait MagnitudeEncoding {
    fn radius_for(&self, magnitude: f64) -> f64;
    fn color_for(&self, magnitude: f64) -> Color;
    fn opacity_for(&self, magnitude: f64) -> f64;

    fn encode(&self, magnitude: f64) -> MarkerStyle {
        MarkerStyle {
            radius: self.radius_for(magnitude),
            color: self.color_for(magnitude),
            fill_opacity: self.opacity_for(magnitude),
        }
    }
}

/// The fixed band table above.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEncoding;

impl MagnitudeEncoding for StandardEncoding {
    fn radius_for(&self, magnitude: f64) -> f64 {
        radius_for(magnitude)
    }

    fn color_for(&self, magnitude: f64) -> Color {
        color_for(magnitude)
    }

    fn opacity_for(&self, magnitude: f64) -> f64 {
        opacity_for(magnitude)
    }
}

pub fn encode(magnitude: f64) -> MarkerStyle {
    StandardEncoding.encode(magnitude)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: Color,
    pub label: String,
}

/// Legend rows in band order: `<1`, `1-2` .. `5-6`, `>6`.
pub fn legend_entries() -> Vec<LegendEntry> {
    let mut entries = Vec::with_capacity(COLOR_BANDS.len() + 1);
    let mut lower: Option<f64> = None;

    for (upper, color) in COLOR_BANDS {
        let label = match lower {
            None => format!("<{}", upper),
            Some(lower) => format!("{}-{}", lower, upper),
        };
        entries.push(LegendEntry { color, label });
        lower = Some(upper);
    }

    let (last, _) = COLOR_BANDS[COLOR_BANDS.len() - 1];
    entries.push(LegendEntry {
        color: Color::Red,
        label: format!(">{}", last),
    });
    entries
}
