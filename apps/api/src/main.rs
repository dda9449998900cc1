mod agent;
mod chat_log;
mod config;
mod errors;
mod models;
mod resume_store;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::acquirer::SignalAcquirer;
use crate::agent::browser::http::HttpBrowserLauncher;
use crate::agent::browser::BrowserSession;
use crate::agent::company::CompanyDetector;
use crate::agent::orchestrator::Agent;
use crate::chat_log::ChatLog;
use crate::config::Config;
use crate::resume_store::ResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio Agent API v{}", env!("CARGO_PKG_VERSION"));

    // The browser itself is launched lazily on the first company question
    let launcher = Arc::new(HttpBrowserLauncher::new(
        config.scraper.user_agent.clone(),
        config.scraper.navigation_timeout,
    ));
    let acquirer = SignalAcquirer::new(BrowserSession::new(launcher), config.scraper.clone());

    let store = ResumeStore::new(&config.resume_path);
    info!("Résumé source: {}", store.path().display());

    let agent = Arc::new(Agent::new(store, CompanyDetector::default(), acquirer));
    let chat_log = ChatLog::new(&config.chat_log_dir);
    info!("Chat logs written to {}", config.chat_log_dir);

    let state = AppState {
        agent: agent.clone(),
        chat_log,
    };

    let origin: HeaderValue = config
        .allowed_origin
        .parse()
        .with_context(|| format!("ALLOWED_ORIGIN is not a valid origin: {}", config.allowed_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, closing browser session");
    agent.shutdown().await;

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
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

    info!("Shutdown signal received");
}
