//! In-process memory backend.
//!
//! Backs `StoreConfig::Memory` and the test suites. The geo index does a
//! linear haversine scan; fine for the task counts this backend is meant
//! for.

use crate::error::StoreResult;
use crate::traits::{GeoIndex, RecordStore};
use async_trait::async_trait;
use geotask_core::{GeoPoint, Task, TaskId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Memory-backed record store and geo index.
#[derive(Default)]
pub struct MemoryBackend {
    records: RwLock<HashMap<TaskId, Task>>,
    geo: RwLock<HashMap<TaskId, GeoPoint>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryBackend {
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, task: &Task) -> StoreResult<()> {
        self.records.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl GeoIndex for MemoryBackend {
    async fn upsert(&self, id: &TaskId, position: GeoPoint) -> StoreResult<()> {
        self.geo.write().await.insert(*id, position);
        Ok(())
    }

    async fn remove(&self, id: &TaskId) -> StoreResult<()> {
        // No-op when the member is absent.
        self.geo.write().await.remove(id);
        Ok(())
    }

    async fn query_radius(&self, center: GeoPoint, radius_km: f64) -> StoreResult<Vec<TaskId>> {
        let geo = self.geo.read().await;
        let mut hits: Vec<(TaskId, f64)> = geo
            .iter()
            .filter_map(|(id, position)| {
                let distance = center.distance_km(position);
                (distance <= radius_km).then_some((*id, distance))
            })
            .collect();
        // Nearest first; ties broken by id for a deterministic order.
        hits.sort_by(|a, b| {
            a.1.total_cmp(&b.1)
                .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
        });
        Ok(hits.into_iter().map(|(id, _)| id).collect())
    }

    async fn position_of(&self, id: &TaskId) -> StoreResult<Option<GeoPoint>> {
        Ok(self.geo.read().await.get(id).copied())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
