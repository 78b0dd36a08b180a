//! Test doubles for the service tests.
//!
//! Both doubles delegate to a shared `MemoryBackend` so test assertions can
//! inspect the real stored state, while the wrappers inject failures or
//! count calls at the adapter boundary.

use async_trait::async_trait;
use geotask_core::{GeoPoint, Task, TaskId};
use geotask_store::{GeoIndex, MemoryBackend, RecordStore, StoreError, StoreResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Record store wrapper that counts calls, records put identifiers, and can
/// be told to fail writes.
pub struct TrackingRecordStore {
    inner: Arc<MemoryBackend>,
    calls: AtomicUsize,
    fail_puts: AtomicBool,
    put_ids: Mutex<Vec<TaskId>>,
}

#[allow(dead_code)]
impl TrackingRecordStore {
    pub fn new(inner: Arc<MemoryBackend>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            fail_puts: AtomicBool::new(false),
            put_ids: Mutex::new(Vec::new()),
        }
    }

    /// A store whose writes always fail.
    pub fn failing(inner: Arc<MemoryBackend>) -> Self {
        let store = Self::new(inner);
        store.fail_puts.store(true, Ordering::SeqCst);
        store
    }

    /// Total operations seen, reads included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Identifiers of successfully written records, in write order.
    pub fn put_ids(&self) -> Vec<TaskId> {
        self.put_ids.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for TrackingRecordStore {
    async fn get(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn put(&self, task: &Task) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected record write failure".to_string()));
        }
        self.inner.put(task).await?;
        self.put_ids.lock().unwrap().push(task.id);
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }

    fn backend_name(&self) -> &'static str {
        "tracking"
    }
}

/// Geo index wrapper with switchable upsert failure.
pub struct FailingGeoIndex {
    inner: Arc<MemoryBackend>,
    fail_upserts: AtomicBool,
}

#[allow(dead_code)]
impl FailingGeoIndex {
    pub fn new(inner: Arc<MemoryBackend>) -> Self {
        Self {
            inner,
            fail_upserts: AtomicBool::new(false),
        }
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl GeoIndex for FailingGeoIndex {
    async fn upsert(&self, id: &TaskId, position: GeoPoint) -> StoreResult<()> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected geo index failure".to_string()));
        }
        self.inner.upsert(id, position).await
    }

    async fn remove(&self, id: &TaskId) -> StoreResult<()> {
        self.inner.remove(id).await
    }

    async fn query_radius(&self, center: GeoPoint, radius_km: f64) -> StoreResult<Vec<TaskId>> {
        self.inner.query_radius(center, radius_km).await
    }

    async fn position_of(&self, id: &TaskId) -> StoreResult<Option<GeoPoint>> {
        self.inner.position_of(id).await
    }

    fn backend_name(&self) -> &'static str {
        "failing-geo"
    }
}
