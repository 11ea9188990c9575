use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schemas::EegStreamData;

/// Persistable projection of one ingested frame: one row in the
/// `eeg_data` hypertable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EegRecord {
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub tp9: f64,
    pub af7: f64,
    pub af8: f64,
    pub tp10: f64,
    pub sample_rate: i32,
    pub theta_power: Option<f64>,
    pub alpha_power: Option<f64>,
    pub beta_power: Option<f64>,
    pub gamma_power: Option<f64>,
    pub theta_alpha_ratio: Option<f64>,
    pub beta_alpha_ratio: Option<f64>,
    pub fatigue_score: Option<f64>,
    pub cognitive_state: Option<String>,
    pub signal_quality: Option<f64>,
}

impl EegRecord {
    /// Build the row from an accepted stream message and its validated
    /// timestamp.
    pub fn from_stream(data: &EegStreamData, timestamp: DateTime<Utc>) -> Self {
        Self {
            session_id: data.session_id,
            timestamp,
            tp9: data.channels.tp9,
            af7: data.channels.af7,
            af8: data.channels.af8,
            tp10: data.channels.tp10,
            sample_rate: data.sample_rate,
            theta_power: data.processed.theta_power,
            alpha_power: data.processed.alpha_power,
            beta_power: data.processed.beta_power,
            gamma_power: data.processed.gamma_power,
            theta_alpha_ratio: data.processed.theta_alpha_ratio,
            beta_alpha_ratio: data.processed.beta_alpha_ratio,
            fatigue_score: data.processed.eeg_fatigue_score,
            cognitive_state: data.processed.cognitive_state.clone(),
            signal_quality: data.processed.signal_quality,
        }
    }
}
