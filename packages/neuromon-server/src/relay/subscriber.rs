use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Soft per-delivery timeout; exceeding it counts as a failed delivery.
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(500);

/// Delivery failure reported by a subscriber sink.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("subscriber channel closed")]
    Closed,
    #[error("delivery timed out")]
    Timeout,
}

/// Capability interface for anything that can receive relayed records.
///
/// A subscriber that fails a delivery is detached from the bus before the
/// next publish for its session.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Stable identity used for idempotent attach/detach.
    fn id(&self) -> Uuid;

    /// Deliver one JSON-shaped record.
    async fn deliver(&self, record: &serde_json::Value) -> Result<(), DeliveryError>;

    /// Cheap liveness probe checked before delivery is attempted.
    fn is_alive(&self) -> bool;
}

/// Subscriber backed by an mpsc channel whose receiving end feeds a
/// WebSocket writer task.
pub struct ChannelSubscriber {
    id: Uuid,
    tx: mpsc::Sender<String>,
    send_timeout: Duration,
}

impl ChannelSubscriber {
    /// Create the subscriber and hand back the receiving end for the
    /// writer task.
    pub fn new(capacity: usize) -> (Arc<Self>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Arc::new(Self {
                id: Uuid::new_v4(),
                tx,
                send_timeout: DEFAULT_SEND_TIMEOUT,
            }),
            rx,
        )
    }
}

#[async_trait]
impl Subscriber for ChannelSubscriber {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn deliver(&self, record: &serde_json::Value) -> Result<(), DeliveryError> {
        let text = record.to_string();
        match tokio::time::timeout(self.send_timeout, self.tx.send(text)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(DeliveryError::Closed),
            Err(_) => Err(DeliveryError::Timeout),
        }
    }

    fn is_alive(&self) -> bool {
        !self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_deliver_and_receive() {
        let (sub, mut rx) = ChannelSubscriber::new(4);
        sub.deliver(&json!({"type": "eeg_data"})).await.unwrap();

        let text = rx.recv().await.unwrap();
        assert!(text.contains("eeg_data"));
    }

    #[tokio::test]
    async fn test_closed_receiver_fails_delivery() {
        let (sub, rx) = ChannelSubscriber::new(4);
        drop(rx);
        assert!(!sub.is_alive());
        assert!(sub.deliver(&json!({})).await.is_err());
    }
}
