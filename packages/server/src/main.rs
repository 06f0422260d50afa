use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use common::BackendKind;
use common::backend::memory::InMemoryBackend;
use common::backend::supabase::SupabaseBackend;
use portal_server::build_router;
use portal_server::config::AppConfig;
use portal_server::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{Level, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    let level = Level::from_str(&config.log.level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = match config.backend.kind {
        BackendKind::Supabase => {
            if config.backend.anon_key.is_empty() {
                warn!("backend.anon_key is empty; the hosted service will refuse most calls");
            }
            let backend = SupabaseBackend::new(&config.backend)
                .context("Failed to build the backend HTTP client")?;
            info!(url = %config.backend.url, "Using hosted backend");
            AppState::from_backend(Arc::new(backend), config)
        }
        BackendKind::Memory => {
            warn!("Using the in-memory backend; all data is lost on exit");
            let backend = InMemoryBackend::new(format!("http://{addr}"));
            AppState::from_backend(Arc::new(backend), config)
        }
    };

    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
