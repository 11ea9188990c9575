//! Artifact attenuation and signal-quality scoring.
//!
//! Extreme samples are compressed, never rejected; the monitoring stream
//! must stay continuous. Quality is scored before attenuation and travels
//! with the frame for confidence weighting downstream.

use ndarray::Array2;

use crate::frame::{CleanFrame, Frame};
use crate::stats::{mad, mean, median, std_dev, MAD_SCALE};

/// Std threshold below which a channel counts as flat (loose electrode).
const FLAT_CHANNEL_STD: f64 = 0.1;
/// MAD multiples beyond which a sample counts as an outlier for scoring.
const OUTLIER_FACTOR: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct AttenuatorConfig {
    /// MAD multiples at which soft clipping begins.
    pub clip_threshold: f64,
    /// Kernel width of the moving-median smoother (odd).
    pub smooth_kernel: usize,
}

impl Default for AttenuatorConfig {
    fn default() -> Self {
        Self {
            clip_threshold: 3.0,
            smooth_kernel: 3,
        }
    }
}

/// Soft-clips outliers per channel and reports a scalar quality score.
#[derive(Debug, Clone, Default)]
pub struct ArtifactAttenuator {
    config: AttenuatorConfig,
}

impl ArtifactAttenuator {
    pub fn new(config: AttenuatorConfig) -> Self {
        Self { config }
    }

    /// Full attenuation pass: quality scoring, soft clipping, moving-median
    /// smoothing, robust normalization. Output shape equals input shape and
    /// no sample is ever removed.
    pub fn process(&self, frame: &Frame) -> CleanFrame {
        if frame.is_empty() {
            return CleanFrame {
                data: frame.data.clone(),
                sample_rate: frame.sample_rate,
                quality: 0.0,
            };
        }

        let quality = self.signal_quality(&frame.data);

        let mut data = frame.data.clone();
        self.soft_clip(&mut data);
        self.smooth(&mut data);
        self.normalize(&mut data);

        CleanFrame {
            data,
            sample_rate: frame.sample_rate,
            quality,
        }
    }

    /// Quality score in [0, 1] computed without rejecting any data.
    ///
    /// Three penalties: flat channels, excessive sample-to-sample noise,
    /// and the per-channel outlier fraction.
    pub fn signal_quality(&self, data: &Array2<f64>) -> f64 {
        if data.is_empty() {
            return 0.0;
        }

        let num_channels = data.ncols();
        let mut quality = 1.0;

        let std_per_channel: Vec<f64> = (0..num_channels)
            .map(|ch| std_dev(&data.column(ch).to_vec()))
            .collect();

        // Flat line detection
        let flat = std_per_channel
            .iter()
            .filter(|s| **s < FLAT_CHANNEL_STD)
            .count();
        quality -= (flat as f64 / num_channels as f64) * 0.3;

        // Excessive high-frequency noise: first differences vs expected scale
        let mut diffs = Vec::with_capacity(data.len());
        for ch in 0..num_channels {
            let col = data.column(ch);
            for i in 1..col.len() {
                diffs.push((col[i] - col[i - 1]).abs());
            }
        }
        let noise_level = mean(&diffs);
        let expected_noise = median(&std_per_channel) * 0.5;
        if expected_noise > 0.0 {
            let noise_ratio = (noise_level / expected_noise).min(2.0) - 1.0;
            quality -= noise_ratio.max(0.0) * 0.2;
        }

        // Outlier proportion per channel
        for ch in 0..num_channels {
            let col: Vec<f64> = data.column(ch).to_vec();
            let med = median(&col);
            let channel_mad = mad(&col, med);
            if channel_mad > 0.0 {
                let threshold = OUTLIER_FACTOR * channel_mad * MAD_SCALE;
                let outliers = col.iter().filter(|v| (**v - med).abs() > threshold).count();
                quality -= (outliers as f64 / col.len() as f64) * 0.1;
            }
        }

        quality.clamp(0.0, 1.0)
    }

    /// Compress samples beyond `clip_threshold` MADs with a tanh taper.
    /// Channels with zero MAD are left untouched.
    fn soft_clip(&self, data: &mut Array2<f64>) {
        for mut col in data.columns_mut() {
            let values: Vec<f64> = col.to_vec();
            let med = median(&values);
            let channel_mad = mad(&values, med);
            if channel_mad == 0.0 {
                continue;
            }

            let threshold = self.config.clip_threshold * channel_mad * MAD_SCALE;
            let upper = med + threshold;
            let lower = med - threshold;

            for v in col.iter_mut() {
                if *v > upper {
                    *v = upper + ((*v - upper) / threshold).tanh() * threshold * 0.5;
                } else if *v < lower {
                    *v = lower - ((lower - *v) / threshold).tanh() * threshold * 0.5;
                }
            }
        }
    }

    /// Moving median along time, zero-padded at the edges.
    fn smooth(&self, data: &mut Array2<f64>) {
        let kernel = self.config.smooth_kernel | 1; // force odd
        if kernel <= 1 {
            return;
        }
        let half = kernel / 2;
        let n = data.nrows();

        for mut col in data.columns_mut() {
            let original: Vec<f64> = col.to_vec();
            let mut window = Vec::with_capacity(kernel);
            for i in 0..n {
                window.clear();
                for offset in 0..kernel {
                    let idx = i as isize + offset as isize - half as isize;
                    if idx >= 0 && (idx as usize) < n {
                        window.push(original[idx as usize]);
                    } else {
                        window.push(0.0);
                    }
                }
                col[i] = median(&window);
            }
        }
    }

    /// Subtract the per-channel median and divide by the scaled MAD.
    fn normalize(&self, data: &mut Array2<f64>) {
        for mut col in data.columns_mut() {
            let values: Vec<f64> = col.to_vec();
            let med = median(&values);
            let channel_mad = mad(&values, med);
            let denom = if channel_mad == 0.0 {
                1.0
            } else {
                channel_mad * MAD_SCALE
            };
            for v in col.iter_mut() {
                *v = (*v - med) / denom;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn noisy_frame(num_samples: usize, num_channels: usize) -> Frame {
        // Deterministic pseudo-noise, no rand dependency in the hot path
        let mut data = Array2::zeros((num_samples, num_channels));
        let mut seed: u64 = 0x5eed;
        for i in 0..num_samples {
            for ch in 0..num_channels {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let noise = ((seed >> 33) as f64 / (1u64 << 31) as f64) - 1.0;
                data[[i, ch]] = (i as f64 * 0.1).sin() + 0.3 * noise;
            }
        }
        Frame::new(data, 256.0)
    }

    #[test]
    fn test_shape_preserved() {
        let attenuator = ArtifactAttenuator::default();
        let frame = noisy_frame(256, 4);
        let clean = attenuator.process(&frame);
        assert_eq!(clean.data.dim(), frame.data.dim());
    }

    #[test]
    fn test_quality_in_range() {
        let attenuator = ArtifactAttenuator::default();
        let frame = noisy_frame(256, 4);
        let clean = attenuator.process(&frame);
        assert!((0.0..=1.0).contains(&clean.quality));
    }

    #[test]
    fn test_flat_frame_penalized() {
        let attenuator = ArtifactAttenuator::default();
        let frame = Frame::new(Array2::from_elem((256, 4), 1.0), 256.0);
        let clean = attenuator.process(&frame);
        // All channels flat: quality must be strictly below 1
        assert!(clean.quality < 1.0);
        assert!((clean.quality - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_empty_frame_zero_quality() {
        let attenuator = ArtifactAttenuator::default();
        let frame = Frame::empty(4, 256.0);
        let clean = attenuator.process(&frame);
        assert!(clean.is_empty());
        assert_eq!(clean.quality, 0.0);
    }

    #[test]
    fn test_outlier_attenuated_not_removed() {
        let attenuator = ArtifactAttenuator::default();
        let mut frame = noisy_frame(256, 1);
        let spike_value = 1000.0;
        frame.data[[100, 0]] = spike_value;

        let n_before = frame.num_samples();
        // Inspect the clip in isolation from smoothing/normalization
        let mut data = frame.data.clone();
        attenuator.soft_clip(&mut data);

        assert_eq!(data.nrows(), n_before);
        let col: Vec<f64> = frame.data.column(0).to_vec();
        let med = median(&col);
        let channel_mad = mad(&col, med);
        let threshold = 3.0 * channel_mad * MAD_SCALE;
        // tanh compression bounds the spike at upper + threshold/2
        assert!(data[[100, 0]] < spike_value);
        assert!(data[[100, 0]] <= med + threshold + threshold * 0.5 + 1e-9);
    }

    #[test]
    fn test_pure_function() {
        let attenuator = ArtifactAttenuator::default();
        let frame = noisy_frame(128, 2);
        let a = attenuator.process(&frame);
        let b = attenuator.process(&frame);
        assert_eq!(a.quality, b.quality);
        assert_eq!(a.data, b.data);
    }
}
