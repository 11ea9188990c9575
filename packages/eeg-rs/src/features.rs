//! Spectral feature extraction: Welch band powers and cognitive ratios.
//!
//! The PSD estimator follows the common Welch parameterization (periodic
//! Hann window, 50% overlap, per-segment constant detrend, density
//! scaling) so band powers line up with reference implementations.

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::frame::CleanFrame;

/// Additive epsilon keeping ratio denominators away from zero.
const RATIO_EPS: f64 = 1e-8;

/// Canonical EEG bands in Hz: (low, high) inclusive.
pub const DELTA_BAND: (f64, f64) = (1.0, 4.0);
pub const THETA_BAND: (f64, f64) = (4.0, 8.0);
pub const ALPHA_BAND: (f64, f64) = (8.0, 13.0);
pub const BETA_BAND: (f64, f64) = (13.0, 30.0);
pub const GAMMA_BAND: (f64, f64) = (30.0, 45.0);

/// Per-band power, one entry per channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandPowers {
    pub delta: Vec<f64>,
    pub theta: Vec<f64>,
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
    pub gamma: Vec<f64>,
}

/// Ratio features derived from band powers, one entry per channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioFeatures {
    /// Drowsiness indicator
    pub theta_alpha: Vec<f64>,
    /// Engagement index
    pub beta_alpha: Vec<f64>,
    /// Relaxation index
    pub alpha_beta: Vec<f64>,
}

/// Complete feature set for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub bands: BandPowers,
    pub ratios: RatioFeatures,
}

impl FeatureSet {
    /// True for the feature set of an empty frame.
    pub fn is_empty(&self) -> bool {
        self.bands.alpha.is_empty()
    }

    pub fn num_channels(&self) -> usize {
        self.bands.alpha.len()
    }
}

/// Welch-based spectral feature extractor.
pub struct FeatureExtractor {
    sample_rate: f64,
    nperseg: usize,
    planner: FftPlanner<f64>,
}

impl FeatureExtractor {
    pub fn new(sample_rate: f64, nperseg: usize) -> Self {
        Self {
            sample_rate,
            nperseg,
            planner: FftPlanner::new(),
        }
    }

    /// Extractor with the default 256-sample Welch segment.
    pub fn with_defaults(sample_rate: f64) -> Self {
        Self::new(sample_rate, 256)
    }

    /// Band powers and ratios for every channel of a clean frame.
    /// An empty frame yields an empty feature set, not an error.
    pub fn extract(&mut self, frame: &CleanFrame) -> FeatureSet {
        if frame.is_empty() {
            return FeatureSet::default();
        }

        let num_channels = frame.num_channels();
        let mut bands = BandPowers::default();

        for ch in 0..num_channels {
            let signal: Vec<f64> = frame.data.column(ch).to_vec();
            let (freqs, psd) = self.welch(&signal);

            bands.delta.push(band_power(&freqs, &psd, DELTA_BAND));
            bands.theta.push(band_power(&freqs, &psd, THETA_BAND));
            bands.alpha.push(band_power(&freqs, &psd, ALPHA_BAND));
            bands.beta.push(band_power(&freqs, &psd, BETA_BAND));
            bands.gamma.push(band_power(&freqs, &psd, GAMMA_BAND));
        }

        let ratios = compute_ratios(&bands);
        FeatureSet { bands, ratios }
    }

    /// Welch PSD of one channel: averaged periodograms of detrended,
    /// Hann-windowed, half-overlapping segments, density-scaled and
    /// one-sided.
    fn welch(&mut self, signal: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = signal.len();
        if n == 0 {
            return (Vec::new(), Vec::new());
        }

        let nperseg = self.nperseg.min(n);
        let noverlap = nperseg / 2;
        let step = (nperseg - noverlap).max(1);

        // Periodic Hann window
        let window: Vec<f64> = (0..nperseg)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / nperseg as f64).cos()))
            .collect();
        let win_sumsq: f64 = window.iter().map(|w| w * w).sum();
        let scale = 1.0 / (self.sample_rate * win_sumsq);

        let num_bins = nperseg / 2 + 1;
        let mut psd = vec![0.0; num_bins];
        let fft = self.planner.plan_fft_forward(nperseg);
        let mut buffer: Vec<Complex<f64>> = vec![Complex::new(0.0, 0.0); nperseg];

        let mut num_segments = 0usize;
        let mut start = 0usize;
        while start + nperseg <= n {
            let segment = &signal[start..start + nperseg];
            let seg_mean: f64 = segment.iter().sum::<f64>() / nperseg as f64;

            for (i, (&x, &w)) in segment.iter().zip(window.iter()).enumerate() {
                buffer[i] = Complex::new((x - seg_mean) * w, 0.0);
            }
            fft.process(&mut buffer);

            for (k, acc) in psd.iter_mut().enumerate() {
                *acc += buffer[k].norm_sqr() * scale;
            }

            num_segments += 1;
            start += step;
        }

        if num_segments == 0 {
            return (Vec::new(), Vec::new());
        }

        for acc in psd.iter_mut() {
            *acc /= num_segments as f64;
        }
        // One-sided spectrum: double everything except DC and Nyquist
        let has_nyquist = nperseg % 2 == 0;
        for (k, acc) in psd.iter_mut().enumerate() {
            if k > 0 && !(has_nyquist && k == num_bins - 1) {
                *acc *= 2.0;
            }
        }

        let freqs: Vec<f64> = (0..num_bins)
            .map(|k| k as f64 * self.sample_rate / nperseg as f64)
            .collect();

        (freqs, psd)
    }
}

/// Integrate the PSD over a band with the trapezoidal rule.
fn band_power(freqs: &[f64], psd: &[f64], band: (f64, f64)) -> f64 {
    let indices: Vec<usize> = freqs
        .iter()
        .enumerate()
        .filter(|(_, f)| **f >= band.0 && **f <= band.1)
        .map(|(i, _)| i)
        .collect();

    if indices.len() < 2 {
        return 0.0;
    }

    let mut power = 0.0;
    for pair in indices.windows(2) {
        let (i, j) = (pair[0], pair[1]);
        power += (freqs[j] - freqs[i]) * (psd[i] + psd[j]) / 2.0;
    }
    power
}

/// Elementwise cognitive ratios with an epsilon-guarded denominator.
fn compute_ratios(bands: &BandPowers) -> RatioFeatures {
    let div = |num: &[f64], den: &[f64]| -> Vec<f64> {
        num.iter()
            .zip(den.iter())
            .map(|(n, d)| n / (d + RATIO_EPS))
            .collect()
    };

    RatioFeatures {
        theta_alpha: div(&bands.theta, &bands.alpha),
        beta_alpha: div(&bands.beta, &bands.alpha),
        alpha_beta: div(&bands.alpha, &bands.beta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn sine_clean_frame(freq: f64, sample_rate: f64, seconds: f64) -> CleanFrame {
        let n = (sample_rate * seconds) as usize;
        let mut data = Array2::zeros((n, 1));
        for i in 0..n {
            data[[i, 0]] = (2.0 * PI * freq * i as f64 / sample_rate).sin();
        }
        CleanFrame {
            data,
            sample_rate,
            quality: 1.0,
        }
    }

    #[test]
    fn test_empty_frame_empty_features() {
        let mut extractor = FeatureExtractor::with_defaults(256.0);
        let frame = CleanFrame {
            data: Array2::zeros((0, 4)),
            sample_rate: 256.0,
            quality: 0.0,
        };
        let features = extractor.extract(&frame);
        assert!(features.is_empty());
    }

    #[test]
    fn test_alpha_sine_concentrates_in_alpha() {
        let mut extractor = FeatureExtractor::with_defaults(256.0);
        let frame = sine_clean_frame(10.0, 256.0, 4.0);
        let features = extractor.extract(&frame);

        let alpha = features.bands.alpha[0];
        assert!(alpha > features.bands.delta[0]);
        assert!(alpha > features.bands.theta[0]);
        assert!(alpha > features.bands.beta[0]);
        assert!(alpha > features.bands.gamma[0]);
    }

    #[test]
    fn test_sine_power_matches_parseval() {
        // A unit sine has total power 0.5; the density integral over its
        // band should recover most of it.
        let mut extractor = FeatureExtractor::with_defaults(256.0);
        let frame = sine_clean_frame(10.0, 256.0, 8.0);
        let features = extractor.extract(&frame);
        assert!(
            (features.bands.alpha[0] - 0.5).abs() < 0.05,
            "alpha power was {}",
            features.bands.alpha[0]
        );
    }

    #[test]
    fn test_ratios_guard_zero_denominator() {
        let bands = BandPowers {
            delta: vec![0.0],
            theta: vec![1.0],
            alpha: vec![0.0],
            beta: vec![0.0],
            gamma: vec![0.0],
        };
        let ratios = compute_ratios(&bands);
        assert!(ratios.theta_alpha[0].is_finite());
        assert!(ratios.beta_alpha[0].is_finite());
        assert!(ratios.alpha_beta[0].is_finite());
    }

    #[test]
    fn test_deterministic() {
        let mut extractor = FeatureExtractor::with_defaults(256.0);
        let frame = sine_clean_frame(6.0, 256.0, 2.0);
        let a = extractor.extract(&frame);
        let b = extractor.extract(&frame);
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_frame_clamps_segment() {
        // Frames shorter than nperseg still produce features
        let mut extractor = FeatureExtractor::with_defaults(256.0);
        let frame = sine_clean_frame(10.0, 256.0, 0.5);
        let features = extractor.extract(&frame);
        assert_eq!(features.num_channels(), 1);
        assert!(features.bands.alpha[0] > 0.0);
    }
}
