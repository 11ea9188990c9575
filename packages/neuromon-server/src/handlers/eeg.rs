use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::buffer::BufferStats;
use crate::schemas::{EegStreamData, StreamAccepted};
use crate::state::ServerState;
use crate::storage::EegRecord;

/// Oldest acceptable record age relative to server time.
const MAX_PAST_SECONDS: i64 = 60;
/// Largest acceptable clock skew into the future.
const MAX_FUTURE_SECONDS: i64 = 10;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    fn validation(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(Self {
                error: message.into(),
                code: "VALIDATION_ERROR".to_string(),
            }),
        )
    }
}

/// Reject timestamps drifting too far from the server clock: more than
/// 60 s in the past or 10 s in the future.
fn validate_timestamp(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let timestamp = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))?
        .with_timezone(&Utc);

    if now - timestamp > ChronoDuration::seconds(MAX_PAST_SECONDS) {
        return Err(format!(
            "timestamp {} is more than {}s in the past",
            raw, MAX_PAST_SECONDS
        ));
    }
    if timestamp - now > ChronoDuration::seconds(MAX_FUTURE_SECONDS) {
        return Err(format!(
            "timestamp {} is more than {}s in the future",
            raw, MAX_FUTURE_SECONDS
        ));
    }
    Ok(timestamp)
}

/// Receive one real-time EEG record from the producer middleware, relay
/// it to the session's subscribers, and optionally queue it for
/// persistence.
///
/// Retries are accepted as-is: a duplicate (session_id, timestamp) is
/// broadcast again and deduplication is the consumer's concern.
pub async fn receive_eeg_stream(
    State(state): State<Arc<ServerState>>,
    Json(data): Json<EegStreamData>,
) -> Result<Json<StreamAccepted>, (StatusCode, Json<ErrorResponse>)> {
    if data.sample_rate <= 0 {
        return Err(ErrorResponse::validation(format!(
            "sample_rate must be positive, got {}",
            data.sample_rate
        )));
    }

    let timestamp =
        validate_timestamp(&data.timestamp, Utc::now()).map_err(ErrorResponse::validation)?;

    state.sessions.touch(data.session_id);

    let record = data.to_relay_record();
    let clients_notified = state.bus.broadcast(data.session_id, &record).await;

    // Persistence happens off the request path; failures are logged and
    // the producer still sees "received"
    if data.save_to_db {
        let writer = state.writer.clone();
        let row = EegRecord::from_stream(&data, timestamp);
        let session_id = data.session_id;
        tokio::spawn(async move {
            if let Err(err) = writer.add(row).await {
                warn!(%session_id, %err, "failed to buffer EEG record");
            }
        });
    }

    Ok(Json(StreamAccepted {
        status: "received".to_string(),
        timestamp: data.timestamp,
        clients_notified,
    }))
}

/// Status of the EEG data flow
#[derive(Debug, Serialize)]
pub struct EegStatusResponse {
    pub status: String,
    pub active_eeg_sessions: usize,
    pub sessions: Vec<Uuid>,
    pub websocket: WebSocketStats,
    pub last_activity: HashMap<Uuid, String>,
}

#[derive(Debug, Serialize)]
pub struct WebSocketStats {
    pub total_connections: usize,
    pub session_connections: HashMap<Uuid, usize>,
}

/// Report active sessions, subscriber counts, and last-seen timestamps.
pub async fn eeg_status(State(state): State<Arc<ServerState>>) -> Json<EegStatusResponse> {
    let liveness = state.sessions.snapshot();
    let counts = state.bus.counts();

    Json(EegStatusResponse {
        status: "operational".to_string(),
        active_eeg_sessions: liveness.len(),
        sessions: liveness.keys().copied().collect(),
        websocket: WebSocketStats {
            total_connections: counts.total,
            session_connections: counts.per_session,
        },
        last_activity: liveness
            .into_iter()
            .map(|(id, ts)| (id, ts.to_rfc3339()))
            .collect(),
    })
}

/// Buffer statistics envelope
#[derive(Debug, Serialize)]
pub struct BufferStatsResponse {
    pub status: String,
    pub buffer: BufferStats,
}

/// Report batch writer statistics for monitoring and debugging.
pub async fn buffer_stats(State(state): State<Arc<ServerState>>) -> Json<BufferStatsResponse> {
    Json(BufferStatsResponse {
        status: "success".to_string(),
        buffer: state.writer.stats().await,
    })
}
