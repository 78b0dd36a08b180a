//! Application state shared across handlers.

use crate::auth::AccessGate;
use geotask_core::config::AppConfig;
use geotask_service::TaskService;
use geotask_store::{GeoIndex, RecordStore, StoreHandles};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Task service over the two store adapters.
    pub service: Arc<TaskService>,
    /// Record store handle, kept for health checks.
    pub records: Arc<dyn RecordStore>,
    /// Geo index handle, kept for health checks.
    pub geo: Arc<dyn GeoIndex>,
    /// Access gate.
    pub gate: Arc<dyn AccessGate>,
}

impl AppState {
    /// Create application state from configuration, store handles and gate.
    pub fn new(config: AppConfig, handles: StoreHandles, gate: Arc<dyn AccessGate>) -> Self {
        let service = Arc::new(TaskService::new(handles.records.clone(), handles.geo.clone()));
        Self {
            config: Arc::new(config),
            service,
            records: handles.records,
            geo: handles.geo,
            gate,
        }
    }
}
