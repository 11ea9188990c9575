use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::relay::ChannelSubscriber;
use crate::Subscriber;
use crate::state::ServerState;

/// Outbound records queued per subscriber before backpressure kicks in.
const SUBSCRIBER_QUEUE: usize = 64;

/// Attach a WebSocket client to one session's data feed.
pub async fn session_ws(
    ws: WebSocketUpgrade,
    Path(session_id): Path<Uuid>,
    State(state): State<Arc<ServerState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, Some(session_id)))
}

/// Attach a WebSocket client to the session-less monitor pool.
pub async fn monitor_ws(ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, None))
}

async fn handle_socket(socket: WebSocket, state: Arc<ServerState>, session_id: Option<Uuid>) {
    let (subscriber, mut records) = ChannelSubscriber::new(SUBSCRIBER_QUEUE);
    match session_id {
        Some(id) => state.bus.attach(id, subscriber.clone()),
        None => state.bus.attach_monitor(subscriber.clone()),
    }
    info!(?session_id, subscriber_id = %subscriber.id(), "WebSocket subscriber attached");

    let (mut sender, mut receiver) = socket.split();

    let greeting = json!({
        "type": "connection",
        "session_id": session_id,
        "timestamp": Utc::now().to_rfc3339(),
    });
    if sender
        .send(Message::Text(greeting.to_string().into()))
        .await
        .is_err()
    {
        cleanup(&state, session_id, subscriber.id());
        return;
    }

    loop {
        tokio::select! {
            // Relayed records flowing out to the client
            record = records.recv() => {
                match record {
                    Some(text) => {
                        if let Err(e) = sender.send(Message::Text(text.into())).await {
                            error!("Failed to send record: {}", e);
                            break;
                        }
                    }
                    None => break,
                }
            }
            // Control messages flowing in from the client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let is_ping = serde_json::from_str::<serde_json::Value>(&text)
                            .ok()
                            .and_then(|v| v.get("type").and_then(|t| t.as_str().map(String::from)))
                            .is_some_and(|t| t == "ping");
                        if is_ping {
                            let pong = json!({
                                "type": "pong",
                                "timestamp": Utc::now().to_rfc3339(),
                            });
                            if sender.send(Message::Text(pong.to_string().into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    cleanup(&state, session_id, subscriber.id());
    info!(?session_id, "WebSocket subscriber detached");
}

fn cleanup(state: &Arc<ServerState>, session_id: Option<Uuid>, subscriber_id: Uuid) {
    match session_id {
        Some(id) => state.bus.detach(id, subscriber_id),
        None => state.bus.detach_monitor(subscriber_id),
    }
}
