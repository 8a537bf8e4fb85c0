//! QuakeMap: earthquake feed to styled Leaflet map.
//!
//! Per page load the server fetches the USGS feed, validates each feature,
//! styles it by magnitude ([`style`]), attaches a popup ([`popup`]) and composes
//! the result with tile layers, the plates overlay and a legend ([`map`]).

pub mod constants;
pub mod error;
pub mod feed;
pub mod geojson;
pub mod layer;
pub mod map;
pub mod popup;
pub mod server;
pub mod settings;
pub mod style;

pub use error::{FetchError, MalformedFeature};
pub use feed::{FeedClient, FeedSource};
pub use layer::{EarthquakeLayerBuilder, StyledMarker};
pub use map::{MapComposer, MapComposition};
pub use settings::Settings;
