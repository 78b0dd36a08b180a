//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    /// When enabled, restrict the endpoint to authorized scraper IPs at the
    /// infrastructure level.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

/// Store backend configuration.
///
/// Both the record store and the geo index live in the same backend; one
/// configured backend serves both adapters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Redis backend (records as JSON strings, geo index as one sorted set).
    Redis {
        /// Connection URL, e.g. "redis://127.0.0.1:6379".
        url: String,
        /// Key prefix for namespace isolation (default: "geotask").
        key_prefix: Option<String>,
    },
    /// In-process memory backend (testing and embedded use).
    Memory,
}

/// Access gate configuration.
///
/// The gate maps a bearer credential to a verified subject. Configuration
/// stores only a SHA-256 digest of the credential, never the credential
/// itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Pre-computed hash of the accepted credential (SHA-256 hex, 64 chars).
    /// Generate with: `echo -n "your-secret-token" | sha256sum`
    pub token_hash: String,
    /// Subject returned for a verified credential (default: "service-user").
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_subject() -> String {
    "service-user".to_string()
}

impl AuthConfig {
    /// Create a test configuration with a dummy token hash.
    ///
    /// **For testing only.** The hash is deterministic but not a real secret.
    pub fn for_testing() -> Self {
        Self {
            // SHA-256 of "test-gate-token"
            token_hash: "ab12f5589085c6c4087de69927de9edc90898e0c38e17a97fc72e9944940712c"
                .to_string(),
            subject: "test-user".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store backend settings.
    pub store: StoreConfig,
    /// Access gate settings.
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Create a test configuration backed by the memory store.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::Memory,
            auth: AuthConfig::for_testing(),
        }
    }
}
