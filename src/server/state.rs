use std::sync::Arc;
use crate::database::Database;
use crate::settings::Settings;

// Application state for sharing layer groups and settings
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Arc<Settings>,
}
