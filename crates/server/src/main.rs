//! Geotask server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use geotask_core::config::AppConfig;
use geotask_server::{create_router, AppState, StaticTokenGate};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Geotask - a task-list service with proximity search
#[derive(Parser, Debug)]
#[command(name = "geotaskd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "GEOTASK_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Geotask v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();

    if has_config_file {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with("GEOTASK_") && key != "GEOTASK_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: geotaskd --config /path/to/config.toml\n  \
             2. Environment variables: GEOTASK_STORE__TYPE=redis \
             GEOTASK_STORE__URL=redis://127.0.0.1:6379 \
             GEOTASK_AUTH__TOKEN_HASH=sha256:YOUR_TOKEN_HASH_HERE geotaskd\n\n\
             Set GEOTASK_CONFIG to specify a default config file path."
        );
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("GEOTASK_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Register Prometheus metrics
    geotask_server::metrics::register_metrics();

    // Initialize store backend
    let handles = geotask_store::from_config(&config.store)
        .await
        .context("failed to initialize store backend")?;
    tracing::info!(backend = handles.records.backend_name(), "Store backend initialized");

    // Verify connectivity before accepting requests.
    handles
        .records
        .health_check()
        .await
        .context("record store health check failed")?;
    handles
        .geo
        .health_check()
        .await
        .context("geo index health check failed")?;
    tracing::info!("Store connectivity verified");

    // Build the access gate
    let gate = Arc::new(StaticTokenGate::from_config(&config.auth)?);

    // Create application state and router
    let bind = config.server.bind.clone();
    let state = AppState::new(config, handles, gate);
    let app = create_router(state);

    let addr: SocketAddr = bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
