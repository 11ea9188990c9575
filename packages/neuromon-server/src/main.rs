use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use neuromon_server::{
    config::ServerConfig,
    handlers::{
        buffer_stats, eeg_status, health_check, monitor_ws, receive_eeg_stream, session_ws,
    },
    state::ServerState,
    storage::{EegRecordStore, PostgresEegStore},
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neuromon_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;

    info!("Starting NeuroMon server v{}", VERSION);
    info!("   Port: {}", config.port);
    info!("   Bind address: {}", config.bind_addr);
    info!("   Buffer max size: {}", config.buffer_max_size);
    info!("   Buffer max time: {} ms", config.buffer_max_time_ms);
    info!("   Session stale timeout: {} s", config.session_stale_seconds);

    // Connect to database and initialize schema
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let store = Arc::new(PostgresEegStore::new(pool.clone()));
    store.initialize().await?;
    info!("Database connected and schema initialized");

    // Create server state; the batch writer persists through the store
    let state = Arc::new(ServerState::new(config.clone(), store));
    state.writer.start();

    // Spawn background task to prune stale session liveness entries
    {
        let sessions = state.sessions.clone();
        let stale_timeout = config.session_stale_seconds;
        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                let removed = sessions.cleanup_stale(stale_timeout);
                if removed > 0 {
                    info!("Pruned {} stale EEG sessions", removed);
                }
            }
        });
    }

    // CORS configuration - configurable via CORS_ORIGINS env var
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/eeg/stream", post(receive_eeg_stream))
        .route("/eeg/status", get(eeg_status))
        .route("/eeg/buffer/stats", get(buffer_stats))
        .route("/ws/session/{session_id}", get(session_ws))
        .route("/ws/monitor", get(monitor_ws))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state.clone());

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Listening on http://{}", addr);
    info!("Ingestion endpoint: http://{}/eeg/stream", addr);
    info!("WebSocket endpoint: ws://{}/ws/session/{{session_id}}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the batch writer last so buffered records reach the store
    match state.writer.stop().await {
        Ok(flushed) => info!("Final flush wrote {} records", flushed),
        Err(err) => error!("Final flush failed: {}", err),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
