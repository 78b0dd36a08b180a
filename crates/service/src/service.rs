//! Task service: create/update/delete/search over the two store adapters.
//!
//! The service enforces the index-coherence contract: every task with a
//! position has exactly one geo index entry with matching coordinates, and
//! tasks without a position (or deleted tasks) have none. The two stores are
//! updated by independent calls with no transaction across them; the one
//! tolerated divergence is a stale index entry for a missing record, which
//! search filters out.

use crate::error::{ServiceError, ServiceResult};
use geotask_core::{validate_radius_km, GeoPoint, Task, TaskId};
use geotask_store::{GeoIndex, RecordStore, StoreHandles};
use std::sync::Arc;

/// Fields for a task to be created.
#[derive(Clone, Debug)]
pub struct NewTask {
    pub text: String,
    pub done: bool,
    pub position: Option<GeoPoint>,
}

/// Replacement fields for an existing task.
///
/// There is no "leave unchanged" sentinel: text, done and position are all
/// overwritten with what the caller supplies, including `position: None`
/// clearing a previously set position.
#[derive(Clone, Debug)]
pub struct TaskUpdate {
    pub text: String,
    pub done: bool,
    pub position: Option<GeoPoint>,
}

/// Orchestrates the record store and geo index.
pub struct TaskService {
    records: Arc<dyn RecordStore>,
    geo: Arc<dyn GeoIndex>,
}

impl TaskService {
    /// Create a service over explicitly injected store adapters.
    pub fn new(records: Arc<dyn RecordStore>, geo: Arc<dyn GeoIndex>) -> Self {
        Self { records, geo }
    }

    /// Create a service from store handles.
    pub fn from_handles(handles: StoreHandles) -> Self {
        Self::new(handles.records, handles.geo)
    }

    /// Create a task. The record is written first; the index entry follows
    /// iff the task carries a position.
    ///
    /// A failed record write aborts before any index mutation. A failed
    /// index write after a successful record write is surfaced as an error
    /// while the record stays in place: the task then exists but is
    /// unreachable by proximity search until a later update re-syncs it.
    pub async fn create(&self, new: NewTask) -> ServiceResult<Task> {
        let task = Task {
            id: TaskId::generate(),
            text: new.text,
            done: new.done,
            position: new.position,
        };

        self.records.put(&task).await?;

        if let Some(position) = task.position {
            if let Err(e) = self.geo.upsert(&task.id, position).await {
                tracing::warn!(
                    task_id = %task.id,
                    error = %e,
                    "record written but geo index insert failed; task unreachable by search"
                );
                return Err(e.into());
            }
        }

        tracing::debug!(task_id = %task.id, has_position = task.position.is_some(), "task created");
        Ok(task)
    }

    /// Fetch a single task.
    pub async fn get(&self, id: &TaskId) -> ServiceResult<Task> {
        self.records
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound(*id))
    }

    /// Replace a task's fields and re-sync its index entry.
    ///
    /// The index entry is unconditionally removed and, when the new position
    /// exists, re-inserted. Remove-then-add rather than move-in-place: the
    /// index keys entries by member and requires explicit deletion before
    /// re-insertion. The remove is a no-op for tasks that had no position.
    pub async fn update(&self, id: &TaskId, update: TaskUpdate) -> ServiceResult<Task> {
        let mut task = self.get(id).await?;
        task.text = update.text;
        task.done = update.done;
        task.position = update.position;

        self.records.put(&task).await?;

        self.geo.remove(id).await?;
        if let Some(position) = task.position {
            if let Err(e) = self.geo.upsert(id, position).await {
                tracing::warn!(
                    task_id = %id,
                    error = %e,
                    "record updated but geo index insert failed; task unreachable by search"
                );
                return Err(e.into());
            }
        }

        tracing::debug!(task_id = %id, "task updated");
        Ok(task)
    }

    /// Delete a task record, then its index entry.
    ///
    /// Record-then-index order: a crash between the two leaves a dangling
    /// index entry, which search filters out.
    pub async fn delete(&self, id: &TaskId) -> ServiceResult<()> {
        if !self.records.delete(id).await? {
            return Err(ServiceError::NotFound(*id));
        }
        self.geo.remove(id).await?;

        tracing::debug!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Proximity query: tasks within `radius_km` of `center`, nearest first.
    ///
    /// Candidates come from the geo index; each is resolved through the
    /// record store, and identifiers that no longer resolve are silently
    /// skipped. That skip is the designed reconciliation for stale index
    /// entries, not an error condition.
    pub async fn search(&self, center: GeoPoint, radius_km: f64) -> ServiceResult<Vec<Task>> {
        let radius_km = validate_radius_km(radius_km)?;

        let candidates = self.geo.query_radius(center, radius_km).await?;
        let mut tasks = Vec::with_capacity(candidates.len());
        for id in candidates {
            match self.records.get(&id).await? {
                Some(task) => tasks.push(task),
                None => {
                    tracing::debug!(task_id = %id, "skipping stale geo index entry");
                }
            }
        }
        Ok(tasks)
    }
}
