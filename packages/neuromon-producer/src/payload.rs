//! Wire payloads posted to the backend ingestion endpoint.

use eeg_rs::{stats, AnalysisResult, CognitiveState, FeatureSet, Frame};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fatigue score above which a non-fatigue state still reads as drowsy.
const DROWSY_SCORE_THRESHOLD: f64 = 40.0;

/// One reduced sample per electrode.
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedPayload {
    pub theta_power: f64,
    pub alpha_power: f64,
    pub beta_power: f64,
    pub gamma_power: f64,
    pub theta_alpha_ratio: f64,
    pub beta_alpha_ratio: f64,
    /// 0-100
    pub eeg_fatigue_score: f64,
    /// 0-1
    pub signal_quality: f64,
    /// "alert" | "drowsy" | "fatigued"
    pub cognitive_state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EegStreamPayload {
    pub session_id: Uuid,
    pub timestamp: String,
    pub sample_rate: i32,
    pub channels: ChannelValues,
    pub processed: ProcessedPayload,
    pub save_to_db: bool,
}

/// Backend acknowledgement.
#[derive(Debug, Deserialize)]
pub struct StreamResponse {
    pub status: String,
    pub clients_notified: usize,
}

/// Project the analyzer's state onto the coarse wire vocabulary.
pub fn wire_cognitive_state(state: CognitiveState, fatigue_score: f64) -> &'static str {
    match state {
        CognitiveState::Fatigue => "fatigued",
        _ if fatigue_score >= DROWSY_SCORE_THRESHOLD => "drowsy",
        _ => "alert",
    }
}

/// Assemble the stream payload for one processed chunk.
pub fn build_payload(
    session_id: Uuid,
    save_to_db: bool,
    frame: &Frame,
    features: &FeatureSet,
    result: &AnalysisResult,
) -> EegStreamPayload {
    let means = frame.channel_means();
    let channel = |i: usize| means.get(i).copied().unwrap_or(0.0);

    let fatigue_score = result.scores.map(|s| s.fatigue * 100.0).unwrap_or(0.0);

    EegStreamPayload {
        session_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
        sample_rate: frame.sample_rate as i32,
        channels: ChannelValues {
            tp9: channel(0),
            af7: channel(1),
            af8: channel(2),
            tp10: channel(3),
        },
        processed: ProcessedPayload {
            theta_power: stats::mean(&features.bands.theta),
            alpha_power: stats::mean(&features.bands.alpha),
            beta_power: stats::mean(&features.bands.beta),
            gamma_power: stats::mean(&features.bands.gamma),
            theta_alpha_ratio: result.metrics.theta_alpha,
            beta_alpha_ratio: result.metrics.beta_alpha,
            eeg_fatigue_score: fatigue_score,
            signal_quality: result.quality,
            cognitive_state: wire_cognitive_state(result.state, fatigue_score).to_string(),
        },
        save_to_db,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_projection() {
        assert_eq!(wire_cognitive_state(CognitiveState::Fatigue, 90.0), "fatigued");
        assert_eq!(wire_cognitive_state(CognitiveState::Normal, 55.0), "drowsy");
        assert_eq!(wire_cognitive_state(CognitiveState::Focused, 5.0), "alert");
        assert_eq!(wire_cognitive_state(CognitiveState::Unknown, 0.0), "alert");
    }

    #[test]
    fn test_payload_serializes_channel_labels() {
        let payload = EegStreamPayload {
            session_id: Uuid::new_v4(),
            timestamp: "2026-01-19T12:00:00Z".to_string(),
            sample_rate: 256,
            channels: ChannelValues {
                tp9: 0.1,
                af7: 0.2,
                af8: 0.3,
                tp10: 0.4,
            },
            processed: ProcessedPayload {
                theta_power: 0.5,
                alpha_power: 0.6,
                beta_power: 0.4,
                gamma_power: 0.1,
                theta_alpha_ratio: 0.83,
                beta_alpha_ratio: 0.66,
                eeg_fatigue_score: 12.0,
                signal_quality: 0.95,
                cognitive_state: "alert".to_string(),
            },
            save_to_db: false,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["channels"].get("TP9").is_some());
        assert!(json["channels"].get("TP10").is_some());
        assert_eq!(json["processed"]["cognitive_state"], "alert");
    }
}
