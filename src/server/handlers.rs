use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use rust_embed::RustEmbed;
use serde_json::{json, Value};

use crate::database::LayerStatuses;
use crate::html_template::{get_map_html, Legend};
use crate::settings::Settings;

use super::state::AppState;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

fn embedded(path: &str, content_type: &'static str) -> Result<Response, StatusCode> {
    let file = Asset::get(path).ok_or_else(|| {
        tracing::error!("Embedded asset missing: {}", path);
        StatusCode::NOT_FOUND
    })?;
    Ok((
        [(header::CONTENT_TYPE, content_type)],
        file.data.into_owned(),
    )
        .into_response())
}

pub async fn index_html(State(state): State<AppState>) -> Html<String> {
    get_map_html(&state.settings)
}

pub async fn style_css() -> Result<Response, StatusCode> {
    embedded("style.css", "text/css")
}

pub async fn map_js() -> Result<Response, StatusCode> {
    embedded("map.js", "application/javascript")
}

/// Styled earthquake markers as a GeoJSON FeatureCollection.
pub async fn get_earthquakes(State(state): State<AppState>) -> Json<Value> {
    let features: Vec<Value> = state
        .db
        .earthquakes()
        .iter()
        .map(|marker| marker.to_geojson())
        .collect();

    Json(json!({ "type": "FeatureCollection", "features": features }))
}

pub async fn get_fault_lines(State(state): State<AppState>) -> Json<Value> {
    Json(state.db.fault_lines())
}

pub async fn get_legend(State(state): State<AppState>) -> Json<Legend> {
    Json(Legend::for_variant(state.settings.variant))
}

pub async fn get_layer_status(State(state): State<AppState>) -> Json<LayerStatuses> {
    Json(state.db.layer_status())
}

// API endpoint to get current settings, API key masked
pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings.redacted())
}
