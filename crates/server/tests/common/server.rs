//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use geotask_core::config::AppConfig;
use geotask_server::{create_router, AppState, StaticTokenGate};
use geotask_store::{GeoIndex, MemoryBackend, RecordStore, StoreHandles};
use std::sync::Arc;
use tower::ServiceExt;

/// Raw credential matching `AuthConfig::for_testing()`.
pub const TEST_TOKEN: &str = "test-gate-token";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    backend: Arc<MemoryBackend>,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server over a fresh memory backend.
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let handles = StoreHandles {
            records: backend.clone(),
            geo: backend.clone(),
        };

        let config = AppConfig::for_testing();
        let gate = Arc::new(
            StaticTokenGate::from_config(&config.auth).expect("test auth config is valid"),
        );

        let state = AppState::new(config, handles, gate);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            backend,
        }
    }

    /// Direct record store access, for out-of-band mutations.
    pub fn records(&self) -> Arc<dyn RecordStore> {
        self.backend.clone()
    }

    /// Direct geo index access, for coherence assertions.
    pub fn geo(&self) -> Arc<dyn GeoIndex> {
        self.backend.clone()
    }
}

/// Make a JSON request against the router, authorized with `TEST_TOKEN`
/// unless `auth_token` overrides it.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    auth_token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = auth_token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, body_json)
}

/// Authorized JSON request with the standard test credential.
#[allow(dead_code)]
pub async fn authed_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    json_request(router, method, uri, body, Some(TEST_TOKEN)).await
}
