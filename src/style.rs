//! Magnitude to visual encoding: marker color, marker radius and the legend.

use serde::Serialize;

use crate::constants::{ORANGE_MAGNITUDE, RED_MAGNITUDE, YELLOW_MAGNITUDE};

/// Marker color band, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Yellow,
    Orange,
    Red,
}

impl MarkerColor {
    /// All bands from least to most severe.
    pub const ALL: [MarkerColor; 4] = [
        MarkerColor::Green,
        MarkerColor::Yellow,
        MarkerColor::Orange,
        MarkerColor::Red,
    ];

    /// Thresholds are checked from the top down, first match wins.
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= RED_MAGNITUDE {
            MarkerColor::Red
        } else if magnitude >= ORANGE_MAGNITUDE {
            MarkerColor::Orange
        } else if magnitude >= YELLOW_MAGNITUDE {
            MarkerColor::Yellow
        } else {
            MarkerColor::Green
        }
    }

    /// CSS color name used by the page.
    pub fn css(&self) -> &'static str {
        match self {
            MarkerColor::Green => "green",
            MarkerColor::Yellow => "yellow",
            MarkerColor::Orange => "orange",
            MarkerColor::Red => "red",
        }
    }

    /// Legend caption for the band.
    pub fn legend_label(&self) -> &'static str {
        match self {
            MarkerColor::Green => "Magnitude <2",
            MarkerColor::Yellow => "Magnitude >2, <3",
            MarkerColor::Orange => "Magnitude >3, <4",
            MarkerColor::Red => "Magnitude >4",
        }
    }
}

/// `round(magnitude) * scale`, never below zero.
///
/// Rounds half away from zero, so 2.5 becomes 3 and -0.5 becomes -1 (and then 0).
pub fn marker_radius(magnitude: f64, scale: f64) -> f64 {
    (magnitude.round() * scale).max(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: &'static str,
    pub position: &'static str,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn magnitude_bands() -> Self {
        Self {
            title: "Earthquake Categories",
            position: "bottomright",
            entries: MarkerColor::ALL
                .iter()
                .map(|color| LegendEntry {
                    color: color.css(),
                    label: color.legend_label(),
                })
                .collect(),
        }
    }
}
