//! # InkQuote Estimate API
//!
//! HTTP server for print-job estimates.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tracing ──► ServerConfig::load ──► CatalogStore::open(rules/)          │
//! │                                          │ error: exit, serve nothing   │
//! │                                          ▼                              │
//! │                     router ──► bind ──► serve until Ctrl+C / SIGTERM    │
//! │                                                                         │
//! │  SIGHUP ──► CatalogStore::reload (old catalog kept on failure)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inkquote_api::{build_app_router, AppState, CatalogStore, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("inkquote_api=info,inkquote_rules=info,tower_http=info")),
        )
        .with_target(true)
        .init();

    info!("Starting InkQuote estimate server...");

    // Load configuration
    let config = ServerConfig::load().context("Invalid configuration")?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        rules_dir = %config.rules.dir.display(),
        tax_rate_bps = config.pricing.tax_rate_bps,
        "Configuration loaded"
    );

    // A broken catalog must never serve traffic
    let store = CatalogStore::open(config.rules.dir.clone()).with_context(|| {
        format!("Failed to load rule catalog from {}", config.rules.dir.display())
    })?;
    let store = Arc::new(store);

    #[cfg(unix)]
    spawn_reload_on_hangup(Arc::clone(&store))?;

    let app = build_app_router(AppState::new(Arc::clone(&store), &config), &config);

    let addr = config.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Reloads the rule catalog on every SIGHUP.
#[cfg(unix)]
fn spawn_reload_on_hangup(store: Arc<CatalogStore>) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!(dir = %store.rules_dir().display(), "SIGHUP received, reloading rules");
            // Failures are logged by the store; the current catalog stays live.
            let _ = store.reload().await;
        }
    });
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
