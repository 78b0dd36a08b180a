//! Record store and geo index adapters for the geotask service.
//!
//! This crate provides the data plane:
//! - `RecordStore`: one key-value entry per task
//! - `GeoIndex`: one shared geospatial structure over task identifiers
//! - Redis and in-memory backends implementing both

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::{MemoryBackend, RedisBackend};
pub use error::{StoreError, StoreResult};
pub use traits::{GeoIndex, RecordStore};

use geotask_core::config::StoreConfig;
use std::sync::Arc;

/// Handles for the two store adapters.
///
/// Both may point at the same backend instance; they are kept as separate
/// handles so the service layer depends on the traits, not the backend.
#[derive(Clone)]
pub struct StoreHandles {
    /// Primary record store.
    pub records: Arc<dyn RecordStore>,
    /// Secondary geo index.
    pub geo: Arc<dyn GeoIndex>,
}

/// Create store handles from configuration.
pub async fn from_config(config: &StoreConfig) -> StoreResult<StoreHandles> {
    match config {
        StoreConfig::Redis { url, key_prefix } => {
            tracing::info!("Connecting to Redis store backend");
            let backend = RedisBackend::new(url).await?;
            let backend = match key_prefix {
                Some(prefix) => backend.with_prefix(prefix.clone()),
                None => backend,
            };
            let backend = Arc::new(backend);
            Ok(StoreHandles {
                records: backend.clone(),
                geo: backend,
            })
        }
        StoreConfig::Memory => {
            let backend = Arc::new(MemoryBackend::new());
            Ok(StoreHandles {
                records: backend.clone(),
                geo: backend,
            })
        }
    }
}
