//! GeoJSON wire types and validation of earthquake features.
//!
//! The wire types are loose: each entry of `features` is read from raw JSON
//! whatever its shape, so one bad record never fails the whole document.
//! [`EarthquakeFeature::from_feature`] does the per-feature checks.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{MalformedFeature, MalformedReason};

fn feature_collection_type() -> String {
    "FeatureCollection".to_string()
}

fn feature_type() -> String {
    "Feature".to_string()
}

/// Root GeoJSON document as returned by the USGS feeds and the plates file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn is_feature_collection(&self) -> bool {
        self.kind == "FeatureCollection"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub properties: Option<Map<String, Value>>,
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// Reads a feature from any JSON value. Members with the wrong shape
    /// come back as `None` and are rejected later by validation.
    pub fn from_value(value: &Value) -> Self {
        let member = |key: &str| value.get(key).filter(|v| !v.is_null());

        Self {
            kind: member("type")
                .and_then(Value::as_str)
                .map(|s| s.to_string())
                .unwrap_or_else(feature_type),
            id: member("id").cloned(),
            properties: member("properties").and_then(Value::as_object).cloned(),
            geometry: member("geometry")
                .filter(|g| g.is_object())
                .map(|g| Geometry {
                    kind: g
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    coordinates: g.get("coordinates").cloned().unwrap_or(Value::Null),
                }),
        }
    }
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Feature::from_value(&value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Value,
}

/// Longitude-first position, as GeoJSON stores it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
    pub depth: Option<f64>,
}

impl Coordinates {
    /// Latitude-first pair for map consumers.
    pub fn lat_lng(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// One validated earthquake event.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeFeature {
    pub id: Option<String>,
    pub magnitude: f64,
    pub place: String,
    pub time_epoch_millis: Option<i64>,
    pub detail_url: Option<String>,
    pub coordinates: Coordinates,
}

impl EarthquakeFeature {
    /// Validates a raw feature. `index` is its position in the collection and
    /// is only used for error reporting.
    pub fn from_feature(index: usize, feature: &Feature) -> Result<Self, MalformedFeature> {
        let id = feature.id.as_ref().map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        let malformed = |reason: MalformedReason| MalformedFeature {
            index,
            id: id.clone().unwrap_or_else(|| "no id".to_string()),
            reason,
        };

        let empty = Map::new();
        let props = feature.properties.as_ref().unwrap_or(&empty);

        let magnitude = props
            .get("mag")
            .and_then(Value::as_f64)
            .ok_or_else(|| malformed(MalformedReason::MissingMagnitude))?;

        let place = props
            .get("place")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(MalformedReason::MissingPlace))?
            .to_string();

        let coordinates = feature
            .geometry
            .as_ref()
            .ok_or_else(|| malformed(MalformedReason::MissingCoordinates))
            .and_then(|geometry| parse_point(&geometry.coordinates).map_err(malformed))?;

        Ok(Self {
            id,
            magnitude,
            place,
            time_epoch_millis: props.get("time").and_then(Value::as_i64),
            detail_url: props
                .get("url")
                .and_then(Value::as_str)
                .map(|s| s.to_string()),
            coordinates,
        })
    }
}

fn parse_point(raw: &Value) -> Result<Coordinates, MalformedReason> {
    let values = raw.as_array().ok_or(MalformedReason::MissingCoordinates)?;
    if values.len() < 2 {
        return Err(MalformedReason::MissingCoordinates);
    }

    let longitude = values[0].as_f64().ok_or(MalformedReason::InvalidCoordinates)?;
    let latitude = values[1].as_f64().ok_or(MalformedReason::InvalidCoordinates)?;
    if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
        return Err(MalformedReason::InvalidCoordinates);
    }

    Ok(Coordinates {
        longitude,
        latitude,
        depth: values.get(2).and_then(Value::as_f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(value: Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_usgs_feature_is_validated() {
        let raw = feature(json!({
            "type": "Feature",
            "id": "ak0249ua3lvb",
            "properties": {
                "mag": 1.7,
                "place": "42 km W of Cantwell, Alaska",
                "time": 1716206612345_i64,
                "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ak0249ua3lvb",
                "tsunami": 0
            },
            "geometry": { "type": "Point", "coordinates": [-149.7, 63.4, 88.2] }
        }));

        let quake = EarthquakeFeature::from_feature(0, &raw).unwrap();
        assert_eq!(quake.id.as_deref(), Some("ak0249ua3lvb"));
        assert_eq!(quake.magnitude, 1.7);
        assert_eq!(quake.place, "42 km W of Cantwell, Alaska");
        assert_eq!(quake.time_epoch_millis, Some(1716206612345));
        assert_eq!(quake.coordinates.lat_lng(), [63.4, -149.7]);
        assert_eq!(quake.coordinates.depth, Some(88.2));
    }

    #[test]
    fn test_optional_time_and_url() {
        let raw = feature(json!({
            "properties": { "mag": -0.4, "place": "Somewhere" },
            "geometry": { "type": "Point", "coordinates": [10, 20] }
        }));

        let quake = EarthquakeFeature::from_feature(0, &raw).unwrap();
        assert_eq!(quake.magnitude, -0.4);
        assert!(quake.time_epoch_millis.is_none());
        assert!(quake.detail_url.is_none());
        assert!(quake.coordinates.depth.is_none());
    }

    #[test]
    fn test_null_magnitude_is_malformed() {
        let raw = feature(json!({
            "id": "nc123",
            "properties": { "mag": null, "place": "X" },
            "geometry": { "type": "Point", "coordinates": [10, 20] }
        }));

        let err = EarthquakeFeature::from_feature(4, &raw).unwrap_err();
        assert_eq!(err.index, 4);
        assert_eq!(err.id, "nc123");
        assert_eq!(err.reason, MalformedReason::MissingMagnitude);
    }

    #[test]
    fn test_missing_place_and_geometry() {
        let no_place = feature(json!({
            "properties": { "mag": 2.0 },
            "geometry": { "type": "Point", "coordinates": [10, 20] }
        }));
        assert_eq!(
            EarthquakeFeature::from_feature(0, &no_place).unwrap_err().reason,
            MalformedReason::MissingPlace
        );

        let no_geometry = feature(json!({ "properties": { "mag": 2.0, "place": "X" } }));
        assert_eq!(
            EarthquakeFeature::from_feature(0, &no_geometry).unwrap_err().reason,
            MalformedReason::MissingCoordinates
        );

        let short = feature(json!({
            "properties": { "mag": 2.0, "place": "X" },
            "geometry": { "type": "Point", "coordinates": [10] }
        }));
        assert_eq!(
            EarthquakeFeature::from_feature(0, &short).unwrap_err().reason,
            MalformedReason::MissingCoordinates
        );
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let raw = feature(json!({
            "properties": { "mag": 2.0, "place": "X" },
            "geometry": { "type": "Point", "coordinates": [20, 95] }
        }));
        assert_eq!(
            EarthquakeFeature::from_feature(0, &raw).unwrap_err().reason,
            MalformedReason::InvalidCoordinates
        );
    }

    #[test]
    fn test_collection_defaults_and_type_check() {
        let collection: FeatureCollection =
            serde_json::from_value(json!({ "type": "FeatureCollection" })).unwrap();
        assert!(collection.is_feature_collection());
        assert!(collection.features.is_empty());

        let topology: FeatureCollection =
            serde_json::from_value(json!({ "type": "Topology", "features": [] })).unwrap();
        assert!(!topology.is_feature_collection());
    }

    #[test]
    fn test_misshapen_features_still_deserialize() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                null,
                { "id": "a", "properties": [], "geometry": { "type": "Point", "coordinates": [1, 2] } },
                { "id": "b", "properties": { "mag": 1.0, "place": "B" }, "geometry": "Point" },
                { "id": "c", "properties": { "mag": 1.0, "place": "C" }, "geometry": { "coordinates": [3, 4] } }
            ]
        }))
        .unwrap();
        assert_eq!(collection.features.len(), 4);

        let reasons: Vec<_> = collection
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| EarthquakeFeature::from_feature(i, f).map_err(|e| e.reason))
            .collect();
        assert_eq!(reasons[0], Err(MalformedReason::MissingMagnitude));
        assert_eq!(reasons[1], Err(MalformedReason::MissingMagnitude));
        assert_eq!(reasons[2], Err(MalformedReason::MissingCoordinates));

        let untyped = reasons[3].as_ref().unwrap();
        assert_eq!(untyped.coordinates.lat_lng(), [4.0, 3.0]);
        assert_eq!(collection.features[3].geometry.as_ref().unwrap().kind, "");
    }
}
