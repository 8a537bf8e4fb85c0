//! Map composition: base tiles, overlays, legend and initial view.
//!
//! The result is a plain serializable description. The embedded page turns it
//! into Leaflet layers and controls.

use serde::Serialize;

use crate::constants::{MAP_CENTER, MAP_ZOOM, MAX_ZOOM, POPUP_OFFSET};
use crate::error::FetchError;
use crate::feed::{FeedClient, FeedSource};
use crate::geojson::FeatureCollection;
use crate::layer::{EarthquakeLayerBuilder, StyledMarker};
use crate::settings::{FeedVariant, Settings};
use crate::style::Legend;

const MAPBOX_ATTRIBUTION: &str = "© <a href='https://www.mapbox.com/about/maps/'>Mapbox</a> © <a href='http://www.openstreetmap.org/copyright'>OpenStreetMap</a> <strong><a href='https://www.mapbox.com/map-feedback/' target='_blank'>Improve this map</a></strong>";
const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const CARTO_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

/// One selectable background layer, in Leaflet `tileLayer` terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayerSpec {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_offset: Option<i32>,
}

impl TileLayerSpec {
    fn mapbox(name: &str, style_id: &str, token: &str, large_tiles: bool) -> Self {
        Self {
            name: name.to_string(),
            url_template: format!(
                "https://api.mapbox.com/styles/v1/{}/tiles/{{z}}/{{x}}/{{y}}?access_token={}",
                style_id, token
            ),
            attribution: MAPBOX_ATTRIBUTION.to_string(),
            max_zoom: MAX_ZOOM,
            tile_size: large_tiles.then_some(512),
            zoom_offset: large_tiles.then_some(-1),
        }
    }

    fn plain(name: &str, url_template: &str, attribution: &str) -> Self {
        Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
            max_zoom: MAX_ZOOM,
            tile_size: None,
            zoom_offset: None,
        }
    }
}

/// Street and dark backgrounds. Mapbox styles need the access token; without
/// one the keyless OpenStreetMap and CARTO tiles stand in.
pub fn base_layers(mapbox_token: Option<&str>) -> Vec<TileLayerSpec> {
    match mapbox_token {
        Some(token) => vec![
            TileLayerSpec::mapbox("Street Map", "mapbox/streets-v11", token, true),
            TileLayerSpec::mapbox("Dark Map", "mapbox/dark-v10", token, false),
        ],
        None => vec![
            TileLayerSpec::plain(
                "Street Map",
                "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                OSM_ATTRIBUTION,
            ),
            TileLayerSpec::plain(
                "Dark Map",
                "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
                CARTO_ATTRIBUTION,
            ),
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeOverlay {
    pub name: &'static str,
    pub markers: Vec<StyledMarker>,
    pub popup_offset: [i32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatesOverlay {
    pub name: &'static str,
    pub boundaries: FeatureCollection,
}

/// Everything the page needs to draw one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapComposition {
    pub feed: FeedVariant,
    pub feed_url: String,
    pub view: MapView,
    pub base_layers: Vec<TileLayerSpec>,
    pub earthquakes: EarthquakeOverlay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tectonic_plates: Option<PlatesOverlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    /// Features dropped by validation.
    pub skipped_features: usize,
    /// Non-fatal problems the page should mention.
    pub warnings: Vec<String>,
}

pub struct MapComposer<'a> {
    settings: &'a Settings,
    client: &'a FeedClient,
}

impl<'a> MapComposer<'a> {
    pub fn new(settings: &'a Settings, client: &'a FeedClient) -> Self {
        Self { settings, client }
    }

    /// Fetches the feed (and the plates document when enabled) and builds the
    /// map. Both requests are awaited before anything is composed. A failed
    /// earthquake feed fails the whole map; a failed plates document only
    /// drops that overlay.
    pub async fn compose(&self) -> Result<MapComposition, FetchError> {
        let feed_url = self.settings.feed_url();
        let plates = self.plates_source();

        let (quakes, plates) = tokio::join!(self.client.fetch(feed_url), async {
            match &plates {
                Some(Ok(source)) => Some(self.client.load(source).await),
                Some(Err(message)) => Some(Err(FetchError::Parse {
                    source_name: self.settings.plates_source.clone(),
                    message: message.clone(),
                })),
                None => None,
            }
        });

        let quakes = quakes?;
        let mut warnings = Vec::new();

        let tectonic_plates = match plates {
            Some(Ok(boundaries)) => Some(PlatesOverlay {
                name: "Tectonic Plates",
                boundaries,
            }),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "Tectonic plates overlay unavailable");
                warnings.push(format!("Tectonic plates overlay unavailable: {}", err));
                None
            }
            None => None,
        };

        let builder =
            EarthquakeLayerBuilder::new(self.settings.radius_scale(), self.settings.popup_style);
        let layer = builder.build(&quakes.features);
        if !layer.skipped.is_empty() {
            warnings.push(format!(
                "{} malformed earthquake record(s) were skipped",
                layer.skipped.len()
            ));
        }

        tracing::info!(
            markers = layer.markers.len(),
            skipped = layer.skipped.len(),
            plates = tectonic_plates.is_some(),
            "Map composed"
        );

        Ok(MapComposition {
            feed: self.settings.feed,
            feed_url: feed_url.to_string(),
            view: MapView::default(),
            base_layers: base_layers(self.settings.mapbox_token.as_deref()),
            earthquakes: EarthquakeOverlay {
                name: "Earthquakes",
                markers: layer.markers,
                popup_offset: POPUP_OFFSET,
            },
            tectonic_plates,
            legend: self.settings.legend_enabled().then(Legend::magnitude_bands),
            skipped_features: layer.skipped.len(),
            warnings,
        })
    }

    fn plates_source(&self) -> Option<Result<FeedSource, String>> {
        self.settings
            .plates_enabled()
            .then(|| self.settings.plates_source.parse::<FeedSource>())
    }
}
