//! HTTP client for the two public GeoJSON feeds and the typed schema of the
//! earthquake feed.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("invalid GeoJSON: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Clone, Deserialize)]
pub struct EarthquakeCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: QuakeProperties,
    pub geometry: Option<PointGeometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuakeProperties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub time: Option<i64>,
}

impl QuakeProperties {
    /// USGS publishes `null` for some events; those plot like magnitude 0.
    pub fn magnitude(&self) -> f64 {
        self.mag.unwrap_or(0.0)
    }
}

/// `[lng, lat]` or `[lng, lat, depth]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PointGeometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl PointGeometry {
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lng, lat, ..] => Some((*lat, *lng)),
            _ => None,
        }
    }
}

pub fn parse_earthquakes(body: &[u8]) -> Result<EarthquakeCollection> {
    Ok(serde_json::from_slice(body)?)
}

pub fn parse_fault_lines(body: &[u8]) -> Result<serde_json::Value> {
    Ok(serde_json::from_slice(body)?)
}

/// One GET per feed, no retries.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client })
    }

    pub async fn fetch_earthquakes(&self, url: &str) -> Result<EarthquakeCollection> {
        let body = self.get_bytes(url).await?;
        parse_earthquakes(&body)
    }

    pub async fn fetch_fault_lines(&self, url: &str) -> Result<serde_json::Value> {
        let body = self.get_bytes(url).await?;
        parse_fault_lines(&body)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}
