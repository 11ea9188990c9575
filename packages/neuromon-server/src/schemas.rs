//! Wire schemas for the EEG ingestion surface.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

fn default_sample_rate() -> i32 {
    256
}

/// One reduced sample per electrode of the Muse headband.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelValues {
    #[serde(rename = "TP9")]
    pub tp9: f64,
    #[serde(rename = "AF7")]
    pub af7: f64,
    #[serde(rename = "AF8")]
    pub af8: f64,
    #[serde(rename = "TP10")]
    pub tp10: f64,
}

/// Metrics the producer pre-computed for this frame, all optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta_alpha_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_alpha_ratio: Option<f64>,
    /// EEG fatigue score, 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eeg_fatigue_score: Option<f64>,
    /// Signal quality, 0-1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_quality: Option<f64>,
    /// One of "alert", "drowsy", "fatigued"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_state: Option<String>,
}

/// Inbound stream message from the producer middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EegStreamData {
    /// Active monitoring session UUID
    pub session_id: Uuid,
    /// ISO-8601 timestamp with offset, validated server-side
    pub timestamp: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: i32,
    pub channels: ChannelValues,
    #[serde(default)]
    pub processed: ProcessedMetrics,
    #[serde(default)]
    pub save_to_db: bool,
}

impl EegStreamData {
    /// Egress record relayed to every subscriber of the session.
    pub fn to_relay_record(&self) -> serde_json::Value {
        json!({
            "type": "eeg_data",
            "session_id": self.session_id,
            "timestamp": self.timestamp,
            "sample_rate": self.sample_rate,
            "channels": self.channels,
            "processed": self.processed,
        })
    }
}

/// Acknowledgement returned to the producer.
#[derive(Debug, Serialize, Deserialize)]
pub struct StreamAccepted {
    pub status: String,
    pub timestamp: String,
    pub clients_notified: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_data_roundtrip() {
        let raw = r#"{
            "session_id": "123e4567-e89b-12d3-a456-426614174000",
            "timestamp": "2026-01-19T12:00:00.123Z",
            "sample_rate": 256,
            "channels": {"TP9": 0.123, "AF7": 0.456, "AF8": 0.789, "TP10": 0.234},
            "processed": {"theta_power": 0.45, "alpha_power": 0.67, "theta_alpha_ratio": 0.67},
            "save_to_db": false
        }"#;
        let data: EegStreamData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.sample_rate, 256);
        assert_eq!(data.channels.af8, 0.789);
        assert_eq!(data.processed.theta_power, Some(0.45));
        assert!(data.processed.cognitive_state.is_none());
        assert!(!data.save_to_db);
    }

    #[test]
    fn test_missing_channel_rejected() {
        let raw = r#"{
            "session_id": "123e4567-e89b-12d3-a456-426614174000",
            "timestamp": "2026-01-19T12:00:00Z",
            "channels": {"TP9": 0.1, "AF7": 0.2, "AF8": 0.3}
        }"#;
        assert!(serde_json::from_str::<EegStreamData>(raw).is_err());
    }

    #[test]
    fn test_relay_record_shape() {
        let raw = r#"{
            "session_id": "123e4567-e89b-12d3-a456-426614174000",
            "timestamp": "2026-01-19T12:00:00Z",
            "channels": {"TP9": 0.1, "AF7": 0.2, "AF8": 0.3, "TP10": 0.4}
        }"#;
        let data: EegStreamData = serde_json::from_str(raw).unwrap();
        let record = data.to_relay_record();
        assert_eq!(record["type"], "eeg_data");
        assert_eq!(record["channels"]["TP10"], 0.4);
    }
}
