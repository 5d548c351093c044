//! Quire server entry point.
//!
//! Bootstraps the document store, credential store, and session store,
//! then starts the Axum HTTP server with graceful shutdown. A background
//! session sweep worker runs alongside the server and is cancelled on
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use quire_core::auth::AuthGate;
use quire_core::credentials::CredentialStore;
use quire_core::document::DocumentStore;
use quire_core::session::SessionStore;
use quire_storage::FsBackend;

use quire_server::config::ServerConfig;
use quire_server::routes;
use quire_server::state::AppState;

use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        documents = %config.documents_dir.display(),
        credentials = %config.credentials_path.display(),
        "Quire starting"
    );

    let state = build_app_state(&config).await?;

    // Shutdown signal channel.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn the expired-session sweep worker.
    let sweep_handle = {
        let sessions = Arc::clone(&state.sessions);
        let mut rx = shutdown_rx.clone();
        let interval_secs = config.session_sweep_interval_secs;
        tokio::spawn(async move {
            session_sweep_worker(sessions, &mut rx, interval_secs).await;
        })
    };

    let app = build_router(Arc::clone(&state));

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Quire server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    // Wait for the background worker to finish (with timeout).
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;

    info!("Quire server stopped");
    Ok(())
}

/// Build the shared application state.
async fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let backend = FsBackend::open(&config.documents_dir)
        .await
        .context("failed to open documents directory")?;
    info!(dir = %config.documents_dir.display(), "using filesystem document store");

    let documents = DocumentStore::new(Arc::new(backend));
    let credentials = Arc::new(CredentialStore::new(&config.credentials_path));
    let sessions = Arc::new(SessionStore::new(chrono::Duration::seconds(
        config.session_ttl_secs,
    )));
    let auth = AuthGate::new(Arc::clone(&sessions), Arc::clone(&credentials));

    Ok(Arc::new(AppState {
        documents,
        credentials,
        sessions,
        auth,
    }))
}

/// Build the application router with tracing and hardening headers.
fn build_router(state: Arc<AppState>) -> Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// Background worker that periodically drops expired sessions.
async fn session_sweep_worker(
    sessions: Arc<SessionStore>,
    shutdown: &mut watch::Receiver<bool>,
    interval_secs: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    info!(interval_secs, "session sweep worker started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let dropped = sessions.purge_expired().await;
                if dropped > 0 {
                    info!(dropped, "session sweep tick complete");
                }
            }
            _ = shutdown.changed() => {
                info!("session sweep worker shutting down");
                return;
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM, then broadcast shutdown.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
