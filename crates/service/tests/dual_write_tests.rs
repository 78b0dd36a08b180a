//! Dual-write consistency tests for the task service.
//!
//! The contract under test: after every operation that completes without a
//! store error, each task with a position has exactly one matching geo index
//! entry, and each task without a position (or deleted) has none. Failure
//! injection covers the one documented asymmetric mode, where the record
//! write lands and the index write does not.

mod common;

use common::{FailingGeoIndex, TrackingRecordStore};
use geotask_core::{GeoPoint, TaskId};
use geotask_service::{NewTask, ServiceError, TaskService, TaskUpdate};
use geotask_store::{GeoIndex, MemoryBackend, RecordStore};
use std::sync::Arc;

fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng).unwrap()
}

fn new_task(text: &str, position: Option<GeoPoint>) -> NewTask {
    NewTask {
        text: text.to_string(),
        done: false,
        position,
    }
}

fn service_over(backend: Arc<MemoryBackend>) -> TaskService {
    TaskService::new(backend.clone(), backend)
}

#[tokio::test]
async fn create_with_position_indexes_matching_coordinates() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service_over(backend.clone());

    let task = service
        .create(new_task("buy milk", Some(point(35.0, 139.0))))
        .await
        .unwrap();

    let indexed = backend.position_of(&task.id).await.unwrap();
    assert_eq!(indexed, task.position);
}

#[tokio::test]
async fn create_without_position_leaves_index_untouched() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service_over(backend.clone());

    let task = service.create(new_task("no position", None)).await.unwrap();

    assert_eq!(backend.position_of(&task.id).await.unwrap(), None);
    assert_eq!(service.get(&task.id).await.unwrap(), task);
}

#[tokio::test]
async fn update_moves_the_index_entry() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service_over(backend.clone());

    let task = service
        .create(new_task("movable", Some(point(35.0, 139.0))))
        .await
        .unwrap();

    let updated = service
        .update(
            &task.id,
            TaskUpdate {
                text: "moved".to_string(),
                done: true,
                position: Some(point(40.0, -74.0)),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.text, "moved");
    assert!(updated.done);
    assert_eq!(
        backend.position_of(&task.id).await.unwrap(),
        Some(point(40.0, -74.0))
    );
    // Exactly one entry: the old location no longer matches.
    let near_old = backend.query_radius(point(35.0, 139.0), 1.0).await.unwrap();
    assert!(near_old.is_empty());
}

#[tokio::test]
async fn update_clearing_position_removes_the_entry() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service_over(backend.clone());

    let task = service
        .create(new_task("placed", Some(point(35.0, 139.0))))
        .await
        .unwrap();

    service
        .update(
            &task.id,
            TaskUpdate {
                text: "unplaced".to_string(),
                done: false,
                position: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(backend.position_of(&task.id).await.unwrap(), None);
}

#[tokio::test]
async fn update_missing_task_is_not_found() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service_over(backend);

    let err = service
        .update(
            &TaskId::generate(),
            TaskUpdate {
                text: "ghost".to_string(),
                done: false,
                position: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_record_and_index_entry() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service_over(backend.clone());

    let task = service
        .create(new_task("short-lived", Some(point(35.0, 139.0))))
        .await
        .unwrap();

    service.delete(&task.id).await.unwrap();

    assert!(matches!(
        service.get(&task.id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert_eq!(backend.position_of(&task.id).await.unwrap(), None);

    let err = service.delete(&task.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn search_skips_stale_index_entries() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service_over(backend.clone());

    let kept = service
        .create(new_task("kept", Some(point(35.0, 139.0))))
        .await
        .unwrap();
    let dropped = service
        .create(new_task("dropped out of band", Some(point(35.001, 139.001))))
        .await
        .unwrap();

    // Delete the record without touching the index, as an out-of-band
    // mutation or a crash between the two delete steps would.
    assert!(backend.delete(&dropped.id).await.unwrap());
    assert!(backend.position_of(&dropped.id).await.unwrap().is_some());

    let results = service.search(point(35.0, 139.0), 5.0).await.unwrap();
    assert_eq!(results, vec![kept]);
}

#[tokio::test]
async fn search_preserves_index_order() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service_over(backend);

    let center = point(0.0, 0.0);
    let far = service
        .create(new_task("far", Some(point(0.0, 0.4))))
        .await
        .unwrap();
    let near = service
        .create(new_task("near", Some(point(0.0, 0.05))))
        .await
        .unwrap();

    let results = service.search(center, 100.0).await.unwrap();
    let ids: Vec<_> = results.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![near.id, far.id]);
}

#[tokio::test]
async fn search_with_invalid_radius_touches_no_store() {
    let backend = Arc::new(MemoryBackend::new());
    let records = Arc::new(TrackingRecordStore::new(backend.clone()));
    let service = TaskService::new(records.clone(), backend);

    for radius in [0.0, -3.0, f64::NAN] {
        let err = service.search(point(35.0, 139.0), radius).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
    assert_eq!(records.calls(), 0);
}

#[tokio::test]
async fn failed_index_write_surfaces_error_but_keeps_record() {
    let backend = Arc::new(MemoryBackend::new());
    let records = Arc::new(TrackingRecordStore::new(backend.clone()));
    let geo = Arc::new(FailingGeoIndex::new(backend.clone()));
    let service = TaskService::new(records.clone(), geo.clone());

    geo.fail_upserts(true);
    let err = service
        .create(new_task("orphaned", Some(point(35.0, 139.0))))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));

    // The record landed even though the operation reported failure; it is
    // unreachable by search until re-synced.
    let ids = records.put_ids();
    assert_eq!(ids.len(), 1);
    let orphan = ids[0];
    assert_eq!(backend.position_of(&orphan).await.unwrap(), None);
    assert!(service.search(point(35.0, 139.0), 5.0).await.unwrap().is_empty());

    // A later update with a healthy index re-syncs the entry.
    geo.fail_upserts(false);
    service
        .update(
            &orphan,
            TaskUpdate {
                text: "repaired".to_string(),
                done: false,
                position: Some(point(35.0, 139.0)),
            },
        )
        .await
        .unwrap();
    let results = service.search(point(35.0, 139.0), 5.0).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, orphan);
}

#[tokio::test]
async fn failed_record_write_leaves_index_untouched() {
    let backend = Arc::new(MemoryBackend::new());
    let records = Arc::new(TrackingRecordStore::failing(backend.clone()));
    let service = TaskService::new(records, backend.clone());

    let err = service
        .create(new_task("never stored", Some(point(35.0, 139.0))))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));

    // Nothing to clean up: the index was never reached.
    assert!(backend
        .query_radius(point(35.0, 139.0), 5.0)
        .await
        .unwrap()
        .is_empty());
}
