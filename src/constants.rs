// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// Public feeds
pub const EARTHQUAKE_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
pub const FAULT_LINES_FEED_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_plates.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Tile provider
pub const TILE_URL_TEMPLATE: &str =
    "https://api.mapbox.com/styles/v1/mapbox/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}";
pub const TILE_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, Imagery © <a href=\"https://www.mapbox.com/\">Mapbox</a>";
pub const TILE_MAX_ZOOM: u8 = 18;

// Initial view
pub const MAP_CENTER: [f64; 2] = [37.09, -95.71];
pub const MAP_ZOOM: u8 = 5;

// Fault line overlay style
pub const FAULT_LINE_COLOR: &str = "orange";

// Environment overrides
pub const API_KEY_ENV: &str = "QUAKEMAP_API_KEY";
pub const PORT_ENV: &str = "QUAKEMAP_PORT";
