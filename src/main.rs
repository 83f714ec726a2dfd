//! Glossa Server
//!
//! A self-hosted reading and annotation server for versioned legal
//! texts. Bodies come pre-formatted from an upstream corpus provider;
//! annotations are stored as position-independent fingerprints and
//! re-anchored into every render.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glossa_server::assist::AssistService;
use glossa_server::config::Config;
use glossa_server::corpus::{BodyCache, CorpusService, HttpCorpusClient};
use glossa_server::db;
use glossa_server::routes;
use glossa_server::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glossa_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting Glossa Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Corpus provider: {}", config.corpus.base_url);

    // Initialize database
    let db_pool = db::create_pool(&config.database.url)
        .await
        .expect("Failed to initialize database");
    db::ensure_default_user(&db_pool)
        .await
        .expect("Failed to seed default user");
    tracing::info!("Database initialized at {}", config.database.url);

    // Corpus and assist services
    let corpus = CorpusService::new(
        Arc::new(HttpCorpusClient::new(&config.corpus.base_url)),
        BodyCache::new(config.corpus.cache_capacity),
    );
    let assist = AssistService::from_config(&config.assist);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .expect("Invalid server address");
    let app_state = AppState::new(config, db_pool, corpus, assist);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/documents", routes::documents::router())
        .nest("/api/annotations", routes::annotations::router())
        .nest("/api/users", routes::users::router())
        .nest("/api/bookmarks", routes::bookmarks::router())
        .nest("/api/assist", routes::assist::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    // Start server with graceful shutdown
    tracing::info!("Glossa Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
