mod auth;
mod config;
mod db;
mod errors;
mod models;
mod profile;
mod repo;
mod resumes;
mod routes;
mod state;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::mailer::{LogMailer, ResetMailer, WebhookMailer};
use crate::auth::revocation::RedisRevocation;
use crate::auth::tokens::SessionKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::repo::postgres::{PgResumeRepository, PgUserRepository};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    let mailer: Arc<dyn ResetMailer> = match &config.mail_webhook_url {
        Some(url) => {
            info!("Password reset mail goes to webhook");
            Arc::new(WebhookMailer::new(url.clone()))
        }
        None => {
            info!("No MAIL_WEBHOOK_URL set; password reset links will be logged");
            Arc::new(LogMailer)
        }
    };

    let sessions = SessionKeys::new(config.jwt_secret.as_bytes(), config.session_ttl());
    info!("Session lifetime: {}h", config.session_ttl_hours);

    // Build app state
    let state = AppState {
        users: Arc::new(PgUserRepository::new(db.clone())),
        resumes: Arc::new(PgResumeRepository::new(db)),
        revocations: Arc::new(RedisRevocation::new(redis)),
        mailer,
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Permissive in development; production only admits the frontend origin, with credentials.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    if !config.is_production() {
        return Ok(CorsLayer::permissive());
    }

    let origin: HeaderValue = config.app_base_url.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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
