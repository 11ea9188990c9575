//! IIR filter bank for EEG preprocessing.
//!
//! A Butterworth bandpass (drift + EMG removal) and a powerline notch,
//! both built from cascaded second-order sections via the bilinear
//! transform and applied forward-backward for zero phase distortion.

use ndarray::Array2;
use std::f64::consts::PI;

use crate::error::{ProcessingError, Result};
use crate::frame::Frame;

/// Second-order section in Direct Form II Transposed.
/// Transfer function: H(z) = (b0 + b1 z^-1 + b2 z^-2) / (1 + a1 z^-1 + a2 z^-2)
#[derive(Debug, Clone, Copy)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// Run the section over a signal in place, starting from rest.
    fn run(&self, signal: &mut [f64]) {
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        for x in signal.iter_mut() {
            let y = self.b0 * *x + z1;
            z1 = self.b1 * *x - self.a1 * y + z2;
            z2 = self.b2 * *x - self.a2 * y;
            *x = y;
        }
    }
}

/// Butterworth pole pairs mapped to digital sections.
///
/// `wn` is the prewarped analog cutoff `tan(pi * f / fs)`. For odd orders
/// the final section is first-order.
fn butter_sections(wn: f64, order: usize, highpass: bool) -> Vec<Biquad> {
    let num_sections = order.div_ceil(2);
    let mut sections = Vec::with_capacity(num_sections);

    for k in 0..num_sections {
        if order % 2 == 1 && k == num_sections - 1 {
            // First-order section
            let denom = 1.0 + wn;
            let (b0, b1) = if highpass {
                (1.0 / denom, -1.0 / denom)
            } else {
                (wn / denom, wn / denom)
            };
            sections.push(Biquad {
                b0,
                b1,
                b2: 0.0,
                a1: (wn - 1.0) / denom,
                a2: 0.0,
            });
        } else {
            // Pole pair at angle phi from the negative real axis gives the
            // damping term 2*sin(phi) of the analog prototype s^2 + 2 sin(phi) s + 1.
            let phi = PI * (2.0 * k as f64 + 1.0) / (2.0 * order as f64);
            let damp = 2.0 * phi.sin();

            let wn2 = wn * wn;
            let denom = 1.0 + damp * wn + wn2;

            let (b0, b1, b2) = if highpass {
                (1.0 / denom, -2.0 / denom, 1.0 / denom)
            } else {
                (wn2 / denom, 2.0 * wn2 / denom, wn2 / denom)
            };

            sections.push(Biquad {
                b0,
                b1,
                b2,
                a1: 2.0 * (wn2 - 1.0) / denom,
                a2: (1.0 - damp * wn + wn2) / denom,
            });
        }
    }

    sections
}

/// Digital notch section at `center` Hz with the given quality factor.
fn notch_section(center: f64, sample_rate: f64, q: f64) -> Biquad {
    let w0 = 2.0 * PI * center / sample_rate;
    let alpha = w0.sin() / (2.0 * q);
    let cos_w0 = w0.cos();
    let a0 = 1.0 + alpha;

    Biquad {
        b0: 1.0 / a0,
        b1: -2.0 * cos_w0 / a0,
        b2: 1.0 / a0,
        a1: -2.0 * cos_w0 / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Zero-phase forward-backward filtering with odd reflection padding.
///
/// Padding keeps the startup transient of the causal passes outside the
/// window; it is trimmed before returning.
fn filtfilt(sections: &[Biquad], signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 || sections.is_empty() {
        return signal.to_vec();
    }

    let pad = (3 * (2 * sections.len() + 1)).min(n - 1);
    let mut ext = Vec::with_capacity(n + 2 * pad);
    let first = signal[0];
    let last = signal[n - 1];
    for i in (1..=pad).rev() {
        ext.push(2.0 * first - signal[i]);
    }
    ext.extend_from_slice(signal);
    for i in 1..=pad {
        ext.push(2.0 * last - signal[n - 1 - i]);
    }

    for section in sections {
        section.run(&mut ext);
    }
    ext.reverse();
    for section in sections {
        section.run(&mut ext);
    }
    ext.reverse();

    ext[pad..pad + n].to_vec()
}

/// Filter bank configuration.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Low cutoff frequency (Hz)
    pub lowcut: f64,
    /// High cutoff frequency (Hz)
    pub highcut: f64,
    /// Powerline frequency to notch out (50 or 60 Hz), None to disable
    pub notch: Option<f64>,
    /// Notch quality factor (higher = narrower)
    pub notch_q: f64,
    /// Butterworth order for each half of the bandpass
    pub order: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            lowcut: 1.0,
            highcut: 30.0,
            notch: Some(50.0),
            notch_q: 30.0,
            order: 4,
        }
    }
}

impl FilterConfig {
    /// Driving-mode profile: 30 Hz ceiling keeps muscle artifacts out of
    /// the beta band.
    pub fn driving() -> Self {
        Self::default()
    }

    /// Lab profile with the wider 40 Hz passband.
    pub fn standard() -> Self {
        Self {
            highcut: 40.0,
            ..Self::default()
        }
    }
}

/// Bandpass + notch filter bank for one sample rate.
///
/// Coefficients are designed once at construction; applying the bank is
/// deterministic and allocates only the padded per-channel work buffer.
/// Callers should size frames well above `8 * order` samples so filter
/// ringing does not dominate the window.
#[derive(Debug, Clone)]
pub struct FilterBank {
    bandpass: Vec<Biquad>,
    notch: Option<Biquad>,
}

impl FilterBank {
    pub fn new(sample_rate: f64, config: &FilterConfig) -> Result<Self> {
        let nyquist = sample_rate / 2.0;

        if config.lowcut <= 0.0 {
            return Err(ProcessingError::InvalidCutoff(format!(
                "low cutoff must be positive, got {} Hz",
                config.lowcut
            )));
        }
        if config.highcut >= nyquist {
            return Err(ProcessingError::InvalidCutoff(format!(
                "high cutoff ({} Hz) must be below Nyquist ({} Hz)",
                config.highcut, nyquist
            )));
        }
        if config.lowcut >= config.highcut {
            return Err(ProcessingError::InvalidCutoff(format!(
                "low cutoff ({} Hz) must be below high cutoff ({} Hz)",
                config.lowcut, config.highcut
            )));
        }
        if let Some(freq) = config.notch {
            if freq >= nyquist {
                return Err(ProcessingError::InvalidCutoff(format!(
                    "notch frequency ({} Hz) must be below Nyquist ({} Hz)",
                    freq, nyquist
                )));
            }
        }

        // Bandpass as a highpass/lowpass cascade of equal order.
        let wn_low = (PI * config.lowcut / sample_rate).tan();
        let wn_high = (PI * config.highcut / sample_rate).tan();
        let mut bandpass = butter_sections(wn_low, config.order, true);
        bandpass.extend(butter_sections(wn_high, config.order, false));

        let notch = config
            .notch
            .map(|freq| notch_section(freq, sample_rate, config.notch_q));

        Ok(Self { bandpass, notch })
    }

    /// Apply the bank to every channel of a frame. Output shape equals
    /// input shape; an empty frame passes through unchanged.
    pub fn apply(&self, frame: &Frame) -> Frame {
        if frame.is_empty() {
            return frame.clone();
        }

        let mut out = Array2::zeros(frame.data.raw_dim());
        for ch in 0..frame.num_channels() {
            let column: Vec<f64> = frame.data.column(ch).to_vec();
            let mut filtered = filtfilt(&self.bandpass, &column);
            if let Some(notch) = self.notch {
                filtered = filtfilt(&[notch], &filtered);
            }
            for (i, v) in filtered.into_iter().enumerate() {
                out[[i, ch]] = v;
            }
        }

        Frame::new(out, frame.sample_rate)
    }
}
