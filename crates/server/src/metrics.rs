//! Prometheus metrics for the geotask server.
//!
//! The `/metrics` endpoint is unauthenticated to allow Prometheus scraping;
//! restrict it to authorized scraper IPs at the infrastructure level.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static TASKS_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("geotask_tasks_created_total", "Total number of tasks created")
        .expect("metric creation failed")
});

pub static TASKS_UPDATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("geotask_tasks_updated_total", "Total number of tasks updated")
        .expect("metric creation failed")
});

pub static TASKS_DELETED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("geotask_tasks_deleted_total", "Total number of tasks deleted")
        .expect("metric creation failed")
});

pub static SEARCHES_SERVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "geotask_searches_served_total",
        "Total number of proximity searches served",
    )
    .expect("metric creation failed")
});

/// Register all metrics with the global registry. Idempotent.
pub fn register_metrics() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(TASKS_CREATED.clone()))
            .expect("failed to register tasks_created");
        REGISTRY
            .register(Box::new(TASKS_UPDATED.clone()))
            .expect("failed to register tasks_updated");
        REGISTRY
            .register(Box::new(TASKS_DELETED.clone()))
            .expect("failed to register tasks_deleted");
        REGISTRY
            .register(Box::new(SEARCHES_SERVED.clone()))
            .expect("failed to register searches_served");
    });
}

/// GET /metrics - Prometheus exposition format.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, String::new()).into_response();
    }
    (
        StatusCode::OK,
        [("content-type", encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}
