//! Access gate middleware.
//!
//! The gate is an opaque capability from the core's point of view: it maps a
//! bearer credential to a verified subject or rejects the request before any
//! handler runs. The one shipped implementation compares SHA-256 digests
//! against a configured hash; the trait seam exists so deployments can slot
//! in a real identity provider.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use geotask_core::config::AuthConfig;
use sha2::{Digest, Sha256};
use tracing::Instrument;
use uuid::Uuid;

/// Maximum length for trace IDs.
/// Longer trace IDs are truncated to prevent log bloat and log injection.
const MAX_TRACE_ID_LEN: usize = 128;

/// Trace ID for request correlation.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a trace ID from a client-provided value, sanitized to
    /// printable ASCII and truncated to `MAX_TRACE_ID_LEN` characters.
    pub fn from_client(value: &str) -> Self {
        let sanitized: String = value
            .chars()
            .take(MAX_TRACE_ID_LEN)
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        if sanitized.is_empty() {
            Self::new()
        } else {
            Self(sanitized)
        }
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verified subject identifier produced by the access gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated request extension.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    /// The verified subject.
    pub user_id: UserId,
}

/// Maps a bearer credential to a verified subject, or rejects.
#[async_trait]
pub trait AccessGate: Send + Sync + 'static {
    /// Verify a credential. `Err(Unauthorized)` for anything not accepted.
    async fn verify(&self, credential: &str) -> ApiResult<UserId>;
}

/// Gate accepting the single credential whose SHA-256 digest is configured.
pub struct StaticTokenGate {
    token_hash: String,
    subject: String,
}

impl StaticTokenGate {
    /// Build the gate from configuration, validating the hash shape.
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        // Normalize to lowercase to match hash_credential(), which encodes
        // lowercase hex.
        let hash = config
            .token_hash
            .strip_prefix("sha256:")
            .unwrap_or(&config.token_hash)
            .to_lowercase();
        if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("invalid auth token_hash: expected 64 hex chars");
        }
        Ok(Self {
            token_hash: hash,
            subject: config.subject.clone(),
        })
    }
}

#[async_trait]
impl AccessGate for StaticTokenGate {
    async fn verify(&self, credential: &str) -> ApiResult<UserId> {
        if hash_credential(credential) == self.token_hash {
            Ok(UserId(self.subject.clone()))
        } else {
            Err(ApiError::Unauthorized("invalid credential".to_string()))
        }
    }
}

/// Extract bearer token from the Authorization header.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive.
fn extract_bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            if v.len() >= 7 && v[..7].eq_ignore_ascii_case("bearer ") {
                Some(&v[7..])
            } else {
                None
            }
        })
}

/// Extract trace ID from the X-Trace-Id header or generate a new one.
fn extract_or_generate_trace_id(req: &Request) -> TraceId {
    req.headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(TraceId::from_client)
        .unwrap_or_else(TraceId::new)
}

/// Hash a credential for comparison against the configured digest.
fn hash_credential(credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credential.as_bytes());
    hex::encode(hasher.finalize())
}

/// Middleware gating every task route: validates the credential and runs the
/// request inside a tracing span carrying the trace ID.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let trace_id = extract_or_generate_trace_id(&req);
    let trace_id_str = trace_id.0.clone();
    req.extensions_mut().insert(trace_id);

    let credential = extract_bearer_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))?;

    let user_id = state.gate.verify(credential).await?;
    tracing::debug!(user_id = %user_id, "request authorized");
    req.extensions_mut().insert(AuthenticatedUser { user_id });

    let response = next
        .run(req)
        .instrument(tracing::info_span!("request", trace_id = %trace_id_str))
        .await;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_gate_accepts_configured_credential() {
        let gate = StaticTokenGate::from_config(&AuthConfig::for_testing()).unwrap();
        let user = gate.verify("test-gate-token").await.unwrap();
        assert_eq!(user, UserId("test-user".to_string()));
    }

    #[tokio::test]
    async fn static_gate_rejects_other_credentials() {
        let gate = StaticTokenGate::from_config(&AuthConfig::for_testing()).unwrap();
        assert!(matches!(
            gate.verify("wrong-token").await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn hash_credential_encodes_lowercase_hex() {
        // echo -n "test-gate-token" | sha256sum
        assert_eq!(
            hash_credential("test-gate-token"),
            "ab12f5589085c6c4087de69927de9edc90898e0c38e17a97fc72e9944940712c"
        );
    }

    #[test]
    fn from_config_accepts_sha256_prefix_and_uppercase() {
        let mut config = AuthConfig::for_testing();
        config.token_hash = format!("sha256:{}", config.token_hash.to_uppercase());
        assert!(StaticTokenGate::from_config(&config).is_ok());
    }

    #[test]
    fn from_config_rejects_malformed_hash() {
        let mut config = AuthConfig::for_testing();
        config.token_hash = "not-a-hash".to_string();
        assert!(StaticTokenGate::from_config(&config).is_err());
    }

    #[test]
    fn trace_id_sanitizes_client_values() {
        let id = TraceId::from_client("abc\ndef");
        assert_eq!(id.0, "abcdef");
        let id = TraceId::from_client(&"x".repeat(500));
        assert_eq!(id.0.len(), MAX_TRACE_ID_LEN);
        // Entirely unprintable input falls back to a generated ID.
        let id = TraceId::from_client("\u{7}\u{8}");
        assert!(!id.0.is_empty());
    }
}
