//! Turns earthquake features into styled circle markers.

use serde::Serialize;

use crate::error::MalformedFeature;
use crate::geojson::{EarthquakeFeature, Feature};
use crate::popup::PopupStyle;
use crate::style::{marker_radius, MarkerColor};

/// One circle marker ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledMarker {
    /// `[latitude, longitude]`
    pub position: [f64; 2],
    pub color: MarkerColor,
    pub radius: f64,
    pub popup_html: String,
    pub magnitude: f64,
}

/// Markers built from a feed plus the features that were rejected.
#[derive(Debug, Clone, Default)]
pub struct LayerBuild {
    pub markers: Vec<StyledMarker>,
    pub skipped: Vec<MalformedFeature>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthquakeLayerBuilder {
    scale_factor: f64,
    popup_style: PopupStyle,
}

impl EarthquakeLayerBuilder {
    pub fn new(scale_factor: f64, popup_style: PopupStyle) -> Self {
        Self {
            scale_factor,
            popup_style,
        }
    }

    pub fn marker(&self, quake: &EarthquakeFeature) -> StyledMarker {
        StyledMarker {
            position: quake.coordinates.lat_lng(),
            color: MarkerColor::from_magnitude(quake.magnitude),
            radius: marker_radius(quake.magnitude, self.scale_factor),
            popup_html: self.popup_style.render(quake),
            magnitude: quake.magnitude,
        }
    }

    /// One marker per validated feature, in input order.
    pub fn build_validated(&self, quakes: &[EarthquakeFeature]) -> Vec<StyledMarker> {
        quakes.iter().map(|quake| self.marker(quake)).collect()
    }

    /// Validates and styles raw feed features. A malformed feature is logged,
    /// recorded in [`LayerBuild::skipped`] and does not stop the rest.
    pub fn build(&self, features: &[Feature]) -> LayerBuild {
        let mut quakes = Vec::with_capacity(features.len());
        let mut skipped = Vec::new();

        for (index, feature) in features.iter().enumerate() {
            match EarthquakeFeature::from_feature(index, feature) {
                Ok(quake) => quakes.push(quake),
                Err(err) => {
                    tracing::warn!(
                        index = err.index,
                        id = %err.id,
                        reason = %err.reason,
                        "Skipping malformed feature"
                    );
                    skipped.push(err);
                }
            }
        }

        let layer = LayerBuild {
            markers: self.build_validated(&quakes),
            skipped,
        };

        tracing::debug!(
            markers = layer.markers.len(),
            skipped = layer.skipped.len(),
            scale = self.scale_factor,
            "Earthquake layer built"
        );
        layer
    }
}
