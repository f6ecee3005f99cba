use tokio::task::JoinHandle;

use crate::database::{Database, Layer, QuakeMarker};
use crate::encoder::MagnitudeEncoding;
use crate::feed::{EarthquakeCollection, FeedClient};

/// Styles every feature in one pass. Features without a position are dropped.
pub fn build_markers<E: MagnitudeEncoding>(
    collection: &EarthquakeCollection,
    encoding: &E,
) -> Vec<QuakeMarker> {
    collection
        .features
        .iter()
        .filter_map(|feature| QuakeMarker::from_feature(feature, encoding))
        .collect()
}

/// Fetches the earthquake feed and fills the earthquake group. A failed fetch
/// leaves the group empty and marks it unavailable.
pub async fn load_earthquakes<E: MagnitudeEncoding>(
    db: &Database,
    client: &FeedClient,
    url: &str,
    encoding: &E,
) -> usize {
    match client.fetch_earthquakes(url).await {
        Ok(collection) => {
            let markers = build_markers(&collection, encoding);
            let skipped = collection.features.len() - markers.len();
            if skipped > 0 {
                tracing::debug!("Skipped {} features without coordinates", skipped);
            }
            let count = db.replace_earthquakes(markers);
            tracing::info!("Loaded {} earthquakes", count);
            count
        }
        Err(e) => {
            tracing::warn!("Earthquake feed unavailable: {}", e);
            db.mark_unavailable(Layer::Earthquakes, e.to_string());
            0
        }
    }
}

/// Fire-and-forget fetch of the plate boundary feed into its own group.
pub fn spawn_fault_lines(db: Database, client: FeedClient, url: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        match client.fetch_fault_lines(&url).await {
            Ok(geojson) => {
                let count = db.set_fault_lines(geojson);
                tracing::info!("Loaded {} plate boundaries", count);
            }
            Err(e) => {
                tracing::warn!("Fault line feed unavailable: {}", e);
                db.mark_unavailable(Layer::FaultLines, e.to_string());
            }
        }
    })
}

/// Detaches `handle`, logging a panic or cancellation instead of dropping it.
pub fn log_task_outcome(name: &'static str, handle: JoinHandle<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = handle.await {
            tracing::error!("{} task failed: {}", name, e);
        }
    })
}
