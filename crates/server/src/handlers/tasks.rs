//! Task CRUD and proximity search handlers.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use geotask_core::{parse_latitude, parse_longitude, parse_radius_km, GeoPoint, Task, TaskId};
use geotask_service::{NewTask, TaskUpdate};
use serde::{Deserialize, Serialize};

/// Request body for creating or replacing a task.
///
/// `lat` and `lng` are optional but must be supplied together.
#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    pub text: String,
    #[serde(default)]
    pub done: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl TaskPayload {
    fn position(&self) -> ApiResult<Option<GeoPoint>> {
        Ok(GeoPoint::from_parts(self.lat, self.lng)?)
    }
}

/// Query parameters for proximity search, kept textual so validation owns
/// the parse and its error message.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

fn require_param<'a>(value: &'a Option<String>, name: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest(format!("missing query parameter: {name}")))
}

/// Response body for a confirmed deletion.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// POST /v1/tasks - Create a task.
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let position = payload.position()?;
    let task = state
        .service
        .create(NewTask {
            text: payload.text,
            done: payload.done,
            position,
        })
        .await?;

    metrics::TASKS_CREATED.inc();
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /v1/tasks/{task_id} - Fetch a single task.
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = TaskId::parse(&task_id)?;
    let task = state.service.get(&id).await?;
    Ok(Json(task))
}

/// PUT /v1/tasks/{task_id} - Replace a task's fields.
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> ApiResult<Json<Task>> {
    let id = TaskId::parse(&task_id)?;
    let position = payload.position()?;
    let task = state
        .service
        .update(
            &id,
            TaskUpdate {
                text: payload.text,
                done: payload.done,
                position,
            },
        )
        .await?;

    metrics::TASKS_UPDATED.inc();
    Ok(Json(task))
}

/// DELETE /v1/tasks/{task_id} - Delete a task.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = TaskId::parse(&task_id)?;
    state.service.delete(&id).await?;

    metrics::TASKS_DELETED.inc();
    Ok(Json(DeleteResponse { deleted: true }))
}

/// GET /v1/tasks/search?lat=&lng=&radius= - Proximity search.
///
/// All three parameters are textual and validated before any store call;
/// the radius unit is kilometers.
pub async fn search_tasks(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let lat = parse_latitude(require_param(&params.lat, "lat")?)?;
    let lng = parse_longitude(require_param(&params.lng, "lng")?)?;
    let radius_km = parse_radius_km(require_param(&params.radius, "radius")?)?;
    let center = GeoPoint::new(lat, lng)?;

    let tasks = state.service.search(center, radius_km).await?;

    metrics::SEARCHES_SERVED.inc();
    Ok(Json(tasks))
}
