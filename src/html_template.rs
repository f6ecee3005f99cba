use axum::response::Html;
use serde::Serialize;

use crate::constants::{
    FAULT_LINE_COLOR, MAP_CENTER, MAP_ZOOM, TILE_ATTRIBUTION, TILE_MAX_ZOOM, TILE_URL_TEMPLATE,
};
use crate::encoder::{legend_entries, LegendEntry};
use crate::settings::{Settings, Variant};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMap {
    pub name: &'static str,
    pub style_id: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub name: &'static str,
    pub url: &'static str,
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: &'static str,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn for_variant(variant: Variant) -> Self {
        let title = match variant {
            Variant::Basic => "Earthquake Magnitude",
            Variant::Tectonic => "Magnitude",
        };
        Legend {
            title,
            entries: legend_entries(),
        }
    }
}

/// Everything the page needs to build its layers, injected as JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub api_key: String,
    pub tile_url: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
    pub center: [f64; 2],
    pub zoom: u8,
    pub base_maps: Vec<BaseMap>,
    pub overlays: Vec<Overlay>,
    pub fault_line_color: &'static str,
    pub legend: Legend,
}

impl MapConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut base_maps = vec![
            BaseMap { name: "Light Map", style_id: "light-v10" },
            BaseMap { name: "Dark Map", style_id: "dark-v10" },
        ];
        let mut overlays = vec![Overlay {
            name: "Earthquakes",
            url: "/api/earthquakes",
            kind: "earthquakes",
        }];

        if settings.variant.has_fault_lines() {
            base_maps.push(BaseMap { name: "Satellite Map", style_id: "satellite-v9" });
            overlays.push(Overlay {
                name: "Fault Lines",
                url: "/api/fault-lines",
                kind: "fault_lines",
            });
        }

        MapConfig {
            api_key: settings.api_key.clone(),
            tile_url: TILE_URL_TEMPLATE,
            attribution: TILE_ATTRIBUTION,
            max_zoom: TILE_MAX_ZOOM,
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            base_maps,
            overlays,
            fault_line_color: FAULT_LINE_COLOR,
            legend: Legend::for_variant(settings.variant),
        }
    }
}

pub fn get_map_html(settings: &Settings) -> Html<String> {
    Html(render_map_html(&MapConfig::from_settings(settings)))
}

pub fn render_map_html(config: &MapConfig) -> String {
    // `</` would close the inline script early
    let config_json = serde_json::to_string(config)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    let api_key_warning = if config.api_key.is_empty() {
        r#"<div class="notice">No tile API key configured: set QUAKEMAP_API_KEY or api_key in quakemap.ini</div>"#
    } else {
        ""
    };

    MAP_HTML
        .replace("/*MAP_CONFIG*/null", &config_json)
        .replace("<!-- API_KEY_WARNING_PLACEHOLDER -->", api_key_warning)
}

// HTML template for the map page
const MAP_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>QuakeMap</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <link rel="stylesheet" href="/style.css" />
</head>
<body>
    <!-- API_KEY_WARNING_PLACEHOLDER -->
    <div id="feed-notice" class="notice" style="display: none;"></div>
    <div id="map"></div>

    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script>
        window.QUAKEMAP_CONFIG = /*MAP_CONFIG*/null;
    </script>
    <script src="/map.js"></script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_variant_has_two_base_maps_and_no_fault_lines() {
        let settings = Settings { variant: Variant::Basic, ..Settings::default() };
        let config = MapConfig::from_settings(&settings);
        let names: Vec<&str> = config.base_maps.iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Light Map", "Dark Map"]);
        assert_eq!(config.overlays.len(), 1);
        assert_eq!(config.legend.title, "Earthquake Magnitude");
    }

    #[test]
    fn tectonic_variant_adds_satellite_and_fault_lines() {
        let config = MapConfig::from_settings(&Settings::default());
        assert_eq!(config.base_maps.last().map(|b| b.style_id), Some("satellite-v9"));
        assert_eq!(config.overlays[1].name, "Fault Lines");
        assert_eq!(config.legend.title, "Magnitude");
    }

    #[test]
    fn page_embeds_config_and_warns_without_key() {
        let html = render_map_html(&MapConfig::from_settings(&Settings::default()));
        assert!(html.contains("window.QUAKEMAP_CONFIG = {"));
        assert!(html.contains("\"legend\""));
        assert!(html.contains("No tile API key configured"));
        assert!(!html.contains("/*MAP_CONFIG*/"));
    }

    #[test]
    fn config_cannot_break_out_of_script() {
        let settings = Settings { api_key: "</script><b>".into(), ..Settings::default() };
        let html = get_map_html(&settings).0;
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("<\\/script><b>"));
    }
}
