use ndarray::Array2;

use crate::error::{ProcessingError, Result};

/// One chunk of multichannel EEG, shape `[samples x channels]`.
///
/// The channel count is fixed for the lifetime of a session; frames are
/// consumed exactly once by the pipeline and never persisted in raw form.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Array2<f64>,
    pub sample_rate: f64,
}

impl Frame {
    pub fn new(data: Array2<f64>, sample_rate: f64) -> Self {
        Self { data, sample_rate }
    }

    /// Frame with zero samples, used by sources that timed out.
    pub fn empty(num_channels: usize, sample_rate: f64) -> Self {
        Self {
            data: Array2::zeros((0, num_channels)),
            sample_rate,
        }
    }

    pub fn num_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn num_channels(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reject frames carrying NaN or infinite samples before they enter
    /// the filter bank.
    pub fn validate(&self) -> Result<()> {
        if self.data.iter().any(|v| !v.is_finite()) {
            return Err(ProcessingError::NonFiniteData);
        }
        Ok(())
    }

    /// Enforce the fixed per-session channel count.
    pub fn check_channels(&self, expected: usize) -> Result<()> {
        if self.num_channels() != expected {
            return Err(ProcessingError::ChannelMismatch {
                expected,
                got: self.num_channels(),
            });
        }
        Ok(())
    }

    /// Per-channel mean of the raw samples, used when reducing a frame to
    /// one scalar per channel for transport.
    pub fn channel_means(&self) -> Vec<f64> {
        if self.is_empty() {
            return vec![0.0; self.num_channels()];
        }
        (0..self.num_channels())
            .map(|ch| self.data.column(ch).mean().unwrap_or(0.0))
            .collect()
    }
}

/// Output of the filter + attenuation stages: same shape as the input
/// frame plus a scalar signal-quality score in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct CleanFrame {
    pub data: Array2<f64>,
    pub sample_rate: f64,
    pub quality: f64,
}

impl CleanFrame {
    pub fn num_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn num_channels(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
