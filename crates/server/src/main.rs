//! KasiLink API server.
//!
//! Serves the marketplace REST API: shops, products, community tasks,
//! orders with transport, and the admin surface.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in / JSON out
//! - `PostgreSQL` via sqlx for durable state, or an in-memory store for
//!   local development when no database is configured
//! - Bearer-token identity verified against an external provider's
//!   userinfo endpoint (static dev tokens in development)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kasilink_server::config::ServerConfig;
use kasilink_server::db::{self, MemoryStorage, PgStorage, Storage};
use kasilink_server::services::identity::{IdentityVerifier, StaticVerifier, UserinfoVerifier};
use kasilink_server::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // .env is optional; real deployments set variables directly
    dotenvy::dotenv().ok();

    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kasilink_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Select the storage backend
    let storage: Arc<dyn Storage> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            // NOTE: Migrations are NOT run automatically on startup.
            // Run them explicitly via: cargo run -p kasilink-cli -- migrate
            Arc::new(PgStorage::new(pool))
        }
        None => {
            tracing::warn!("KASILINK_DATABASE_URL not set, using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    };

    // Select the identity verifier
    let verifier: Arc<dyn IdentityVerifier> = match &config.identity_userinfo_url {
        Some(endpoint) => Arc::new(UserinfoVerifier::new(endpoint.clone())),
        None => {
            tracing::warn!("IDENTITY_USERINFO_URL not set, using static dev tokens");
            Arc::new(StaticVerifier::dev_fixture())
        }
    };

    let state = AppState::new(storage, verifier);
    let app = kasilink_server::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("kasilink-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
