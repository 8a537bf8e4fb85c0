use std::time::Duration;

// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// USGS summary feeds (all magnitudes 1.0+)
pub const PAST_WEEK_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/1.0_week.geojson";
pub const PAST_HOUR_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/1.0_hour.geojson";

// PB2002 plate boundary model (Bird, 2003), GeoJSON conversion by fraxen
pub const DEFAULT_PLATES_SOURCE: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_plates.json";

// Marker radius multipliers per feed
pub const PAST_WEEK_RADIUS_SCALE: f64 = 5.0;
pub const PAST_HOUR_RADIUS_SCALE: f64 = 3.0;

// Magnitude thresholds, lower bound inclusive
pub const RED_MAGNITUDE: f64 = 4.0;
pub const ORANGE_MAGNITUDE: f64 = 3.0;
pub const YELLOW_MAGNITUDE: f64 = 2.0;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// Initial view: continental United States
pub const MAP_CENTER: [f64; 2] = [37.09, -95.71];
pub const MAP_ZOOM: u8 = 5;
pub const MAX_ZOOM: u8 = 18;

// Popup placement, matches the marker anchor offset of the page
pub const POPUP_OFFSET: [i32; 2] = [0, -20];

pub const MAPBOX_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";
pub const CONFIG_PATH_ENV: &str = "QUAKEMAP_CONFIG";
pub const CONFIG_FILE_NAME: &str = "quakemap.ini";
