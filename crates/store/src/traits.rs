//! Store trait definitions.
//!
//! Two independent adapters over the same backend: the record store owns the
//! task records, the geo index holds a back-reference per positioned task.
//! Keeping the two coherent is the job of the service layer, not of these
//! traits; each operation here is a single round-trip with no retries.

use crate::error::StoreResult;
use async_trait::async_trait;
use geotask_core::{GeoPoint, Task, TaskId};

/// Primary record store: one key per task, canonical JSON value, no TTL.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Fetch a task record by identifier.
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>>;

    /// Write (create or overwrite) a task record.
    async fn put(&self, task: &Task) -> StoreResult<()>;

    /// Delete a task record. Returns whether a record was removed.
    async fn delete(&self, id: &TaskId) -> StoreResult<bool>;

    /// Static identifier for the backend type, used for logging and health.
    fn backend_name(&self) -> &'static str;

    /// Verify backend connectivity. Called during server startup and by the
    /// health endpoint.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Secondary geospatial index: one shared structure for the whole task set,
/// mapping task identifier to position.
#[async_trait]
pub trait GeoIndex: Send + Sync + 'static {
    /// Insert or replace the entry for a task.
    async fn upsert(&self, id: &TaskId, position: GeoPoint) -> StoreResult<()>;

    /// Remove the entry for a task.
    ///
    /// Must succeed as a no-op when no entry exists; callers invoke it
    /// unconditionally during update and delete.
    async fn remove(&self, id: &TaskId) -> StoreResult<()>;

    /// Identifiers of all entries within `radius_km` of `center`,
    /// nearest first.
    async fn query_radius(&self, center: GeoPoint, radius_km: f64) -> StoreResult<Vec<TaskId>>;

    /// Current indexed position for a task, if any.
    async fn position_of(&self, id: &TaskId) -> StoreResult<Option<GeoPoint>>;

    /// Static identifier for the backend type, used for logging and health.
    fn backend_name(&self) -> &'static str;

    /// Verify backend connectivity.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
