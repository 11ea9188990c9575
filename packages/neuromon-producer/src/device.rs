//! Frame acquisition.
//!
//! The physical headset driver lives outside this crate; the producer
//! only depends on the `FrameSource` capability. The bundled synthetic
//! source generates band-limited activity for development and testing.

use async_trait::async_trait;
use eeg_rs::Frame;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::time::Duration;
use thiserror::Error;

/// Muse electrode labels in wire order.
pub const CHANNEL_LABELS: [&str; 4] = ["TP9", "AF7", "AF8", "TP10"];

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device stream not connected")]
    NotConnected,
    #[error("no samples received within {0:?}")]
    Timeout(Duration),
    #[error("device failure: {0}")]
    Other(String),
}

/// Capability interface for anything that can produce EEG frames.
#[async_trait]
pub trait FrameSource: Send {
    fn label(&self) -> &str;

    fn sample_rate(&self) -> f64;

    /// Pull roughly `duration` seconds of samples. Blocks (cooperatively)
    /// until the chunk is ready.
    async fn pull_chunk(&mut self, duration: f64) -> Result<Frame, DeviceError>;

    fn close(&mut self);
}

/// Synthetic four-channel headset.
///
/// Produces theta/alpha/beta mixtures whose balance drifts with a slow
/// random walk over a simulated fatigue level, paced in real time so the
/// producer loop behaves like it would against hardware.
pub struct SyntheticHeadset {
    sample_rate: f64,
    fatigue_level: f64,
    sample_index: u64,
    rng: StdRng,
    connected: bool,
}

impl SyntheticHeadset {
    pub fn new(sample_rate: f64, seed: u64) -> Self {
        Self {
            sample_rate,
            fatigue_level: 0.0,
            sample_index: 0,
            rng: StdRng::seed_from_u64(seed),
            connected: true,
        }
    }
}

#[async_trait]
impl FrameSource for SyntheticHeadset {
    fn label(&self) -> &str {
        "synthetic"
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    async fn pull_chunk(&mut self, duration: f64) -> Result<Frame, DeviceError> {
        if !self.connected {
            return Err(DeviceError::NotConnected);
        }

        // Pace like a real stream
        tokio::time::sleep(Duration::from_secs_f64(duration)).await;

        // Fatigue drifts slowly and stays in [0, 1]
        self.fatigue_level =
            (self.fatigue_level + self.rng.gen_range(-0.05..0.08)).clamp(0.0, 1.0);

        let theta_amp = 1.0 + 2.0 * self.fatigue_level;
        let alpha_amp = 1.5 - 0.8 * self.fatigue_level;
        let beta_amp = 1.0 - 0.3 * self.fatigue_level;

        let n = (self.sample_rate * duration) as usize;
        let mut data = Array2::zeros((n, CHANNEL_LABELS.len()));
        for i in 0..n {
            let t = (self.sample_index + i as u64) as f64 / self.sample_rate;
            for ch in 0..CHANNEL_LABELS.len() {
                let phase = ch as f64 * 0.41;
                let theta = theta_amp * (2.0 * PI * 6.0 * t + phase).sin();
                let alpha = alpha_amp * (2.0 * PI * 10.0 * t + phase).sin();
                let beta = beta_amp * (2.0 * PI * 21.0 * t + phase).sin();
                let noise: f64 = self.rng.gen_range(-0.2..0.2);
                data[[i, ch]] = theta + alpha + beta + noise;
            }
        }
        self.sample_index += n as u64;

        Ok(Frame::new(data, self.sample_rate))
    }

    fn close(&mut self) {
        self.connected = false;
        log::info!("Synthetic headset closed");
    }
}
