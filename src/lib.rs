//! quakemap: fetches the USGS earthquake feed, encodes each event's magnitude
//! as a marker radius, color and opacity, and serves a Leaflet map of the
//! result with an optional tectonic plate overlay.

pub mod constants;
pub mod database;
pub mod encoder;
pub mod feed;
pub mod html_template;
pub mod processing;
pub mod server;
pub mod settings;
pub mod utils;
