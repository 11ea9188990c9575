use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::ServerState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
    pub connected_subscribers: usize,
    pub uptime_seconds: u64,
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<ServerState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.active_count(),
        connected_subscribers: state.bus.counts().total,
        uptime_seconds: state.uptime_seconds(),
    };

    (StatusCode::OK, Json(response))
}
