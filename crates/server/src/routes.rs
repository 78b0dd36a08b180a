//! Route configuration.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // Every task route sits behind the access gate.
    let task_routes = Router::new()
        .route(
            "/v1/tasks",
            axum::routing::post(handlers::create_task),
        )
        .route("/v1/tasks/search", get(handlers::search_tasks))
        .route(
            "/v1/tasks/{task_id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Health stays unauthenticated for load balancers and probes.
    let mut router = Router::new()
        .merge(task_routes)
        .route("/v1/health", get(handlers::health_check));

    // Conditionally expose metrics based on config. When enabled, restrict
    // the endpoint to authorized Prometheus scraper IPs at the
    // infrastructure level.
    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
