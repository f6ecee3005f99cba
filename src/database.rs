use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};

use crate::encoder::{render_radius, MagnitudeEncoding, MarkerStyle};
use crate::feed::Feature;
use crate::utils::escape_html;

// One earthquake, styled and ready for the map
#[derive(Debug, Clone, Serialize)]
pub struct QuakeMarker {
    pub id: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Magnitude as published; `None` when the feed sent `null`.
    pub mag: Option<f64>,
    pub place: Option<String>,
    pub time: Option<i64>,
    pub style: MarkerStyle,
    pub render_radius: f64,
    pub popup: String,
}

impl QuakeMarker {
    /// Returns `None` when the feature has no usable coordinate.
    pub fn from_feature<E: MagnitudeEncoding>(feature: &Feature, encoding: &E) -> Option<Self> {
        let (lat, lng) = feature.geometry.as_ref()?.lat_lng()?;
        let props = &feature.properties;
        let style = encoding.encode(props.magnitude());

        Some(QuakeMarker {
            id: feature.id.clone(),
            lat,
            lng,
            mag: props.mag,
            place: props.place.clone(),
            time: props.time,
            style,
            render_radius: render_radius(style.radius),
            popup: popup_html(props.place.as_deref(), props.time, props.mag),
        })
    }

    /// GeoJSON point feature whose properties carry the Leaflet circle options.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "id": self.id,
            "geometry": {
                "type": "Point",
                "coordinates": [self.lng, self.lat],
            },
            "properties": {
                "mag": self.mag,
                "place": self.place,
                "time": self.time,
                "radius": self.render_radius,
                "color": self.style.color,
                "fillOpacity": self.style.fill_opacity,
                "popup": self.popup,
            },
        })
    }
}

/// `<h3>place</h3><hr><p>time<hr></p> Magnitude: mag`
pub fn popup_html(place: Option<&str>, time_ms: Option<i64>, mag: Option<f64>) -> String {
    let place = escape_html(place.unwrap_or("Unknown location"));
    let time = time_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%a %b %d %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown time".to_string());
    let mag = mag.map(|m| m.to_string()).unwrap_or_else(|| "null".to_string());

    format!("<h3>{}</h3><hr><p>{}<hr></p> Magnitude: {}", place, time, mag)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Earthquakes,
    FaultLines,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LayerStatus {
    Pending,
    Loaded { count: usize },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerStatuses {
    pub earthquakes: LayerStatus,
    pub fault_lines: LayerStatus,
}

struct EarthquakeGroup {
    markers: Vec<QuakeMarker>,
    status: LayerStatus,
}

struct FaultLineGroup {
    geojson: Option<Value>,
    status: LayerStatus,
}

// Shared layer groups. Each group is written by exactly one fetch.
#[derive(Clone)]
pub struct Database {
    earthquakes: Arc<RwLock<EarthquakeGroup>>,
    fault_lines: Arc<RwLock<FaultLineGroup>>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Database {
            earthquakes: Arc::new(RwLock::new(EarthquakeGroup {
                markers: Vec::new(),
                status: LayerStatus::Pending,
            })),
            fault_lines: Arc::new(RwLock::new(FaultLineGroup {
                geojson: None,
                status: LayerStatus::Pending,
            })),
        }
    }

    pub fn replace_earthquakes(&self, markers: Vec<QuakeMarker>) -> usize {
        let mut group = self.earthquakes.write().unwrap_or_else(|e| e.into_inner());
        let count = markers.len();
        group.markers = markers;
        group.status = LayerStatus::Loaded { count };
        count
    }

    pub fn set_fault_lines(&self, geojson: Value) -> usize {
        let count = geojson
            .get("features")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let mut group = self.fault_lines.write().unwrap_or_else(|e| e.into_inner());
        group.geojson = Some(geojson);
        group.status = LayerStatus::Loaded { count };
        count
    }

    /// Records a failed fetch. The group's data is left as it was.
    pub fn mark_unavailable(&self, layer: Layer, reason: impl Into<String>) {
        let status = LayerStatus::Unavailable { reason: reason.into() };
        match layer {
            Layer::Earthquakes => {
                self.earthquakes.write().unwrap_or_else(|e| e.into_inner()).status = status;
            }
            Layer::FaultLines => {
                self.fault_lines.write().unwrap_or_else(|e| e.into_inner()).status = status;
            }
        }
    }

    pub fn earthquakes(&self) -> Vec<QuakeMarker> {
        self.earthquakes.read().unwrap_or_else(|e| e.into_inner()).markers.clone()
    }

    pub fn earthquakes_count(&self) -> usize {
        self.earthquakes.read().unwrap_or_else(|e| e.into_inner()).markers.len()
    }

    /// Stored fault-line GeoJSON, or an empty collection while nothing has loaded.
    pub fn fault_lines(&self) -> Value {
        self.fault_lines
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .geojson
            .clone()
            .unwrap_or_else(empty_feature_collection)
    }

    pub fn layer_status(&self) -> LayerStatuses {
        LayerStatuses {
            earthquakes: self.earthquakes.read().unwrap_or_else(|e| e.into_inner()).status.clone(),
            fault_lines: self.fault_lines.read().unwrap_or_else(|e| e.into_inner()).status.clone(),
        }
    }
}

pub fn empty_feature_collection() -> Value {
    json!({ "type": "FeatureCollection", "features": [] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{Color, StandardEncoding, MIN_RENDER_RADIUS};
    use crate::feed::{PointGeometry, QuakeProperties};
    use pretty_assertions::assert_eq;

    fn feature(mag: Option<f64>, coords: Vec<f64>) -> Feature {
        Feature {
            id: Some("us7000abcd".into()),
            properties: QuakeProperties {
                mag,
                place: Some("<script> near Anchorage".into()),
                time: Some(0),
            },
            geometry: Some(PointGeometry { coordinates: coords }),
        }
    }

    #[test]
    fn marker_carries_encoded_style() {
        let marker =
            QuakeMarker::from_feature(&feature(Some(4.5), vec![-149.9, 61.2, 10.0]), &StandardEncoding)
                .unwrap();
        assert_eq!((marker.lat, marker.lng), (61.2, -149.9));
        assert_eq!(marker.style.radius, 45.0);
        assert_eq!(marker.style.color, Color::Orange);
        assert_eq!(marker.style.fill_opacity, 0.8);
        assert_eq!(marker.render_radius, 45.0);
    }

    #[test]
    fn negative_magnitude_keeps_raw_radius_but_renders_minimum() {
        let marker =
            QuakeMarker::from_feature(&feature(Some(-0.5), vec![0.0, 0.0]), &StandardEncoding).unwrap();
        assert_eq!(marker.style.radius, -5.0);
        assert_eq!(marker.render_radius, MIN_RENDER_RADIUS);
    }

    #[test]
    fn null_magnitude_encodes_as_zero() {
        let marker =
            QuakeMarker::from_feature(&feature(None, vec![0.0, 0.0]), &StandardEncoding).unwrap();
        assert_eq!(marker.mag, None);
        assert_eq!(marker.style.color, Color::Lime);
        assert_eq!(marker.style.fill_opacity, 0.4);
        assert!(marker.popup.ends_with("Magnitude: null"));

        // the feed's null survives into the served properties
        let value = marker.to_geojson();
        assert_eq!(value["properties"]["mag"], Value::Null);
        assert_eq!(value["properties"]["radius"], json!(MIN_RENDER_RADIUS));
    }

    #[test]
    fn feature_without_position_is_skipped() {
        assert!(QuakeMarker::from_feature(&feature(Some(3.0), vec![]), &StandardEncoding).is_none());
    }

    #[test]
    fn popup_escapes_place_and_formats_time() {
        let popup = popup_html(Some("<script>"), Some(0), Some(2.5));
        assert_eq!(
            popup,
            "<h3>&lt;script&gt;</h3><hr><p>Thu Jan 01 1970 00:00:00 UTC<hr></p> Magnitude: 2.5"
        );
        assert!(popup_html(None, None, None).contains("Unknown time"));
    }

    #[test]
    fn geojson_properties_match_leaflet_options() {
        let marker =
            QuakeMarker::from_feature(&feature(Some(1.0), vec![10.0, 20.0]), &StandardEncoding).unwrap();
        let value = marker.to_geojson();
        assert_eq!(value["geometry"]["coordinates"], json!([10.0, 20.0]));
        assert_eq!(value["properties"]["color"], "#c2ff00");
        assert_eq!(value["properties"]["radius"], 10.0);
        assert_eq!(value["properties"]["fillOpacity"], 0.4);
    }

    #[test]
    fn groups_track_status_independently() {
        let db = Database::new();
        assert_eq!(db.layer_status().earthquakes, LayerStatus::Pending);
        assert_eq!(db.fault_lines(), empty_feature_collection());

        db.set_fault_lines(json!({"type": "FeatureCollection", "features": [{}, {}]}));
        db.mark_unavailable(Layer::Earthquakes, "HTTP 503");

        let status = db.layer_status();
        assert_eq!(status.fault_lines, LayerStatus::Loaded { count: 2 });
        assert_eq!(status.earthquakes, LayerStatus::Unavailable { reason: "HTTP 503".into() });
        assert_eq!(db.earthquakes_count(), 0);
    }
}
