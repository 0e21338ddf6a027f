//! Summary statistics of a sampled signal.

use serde::{Deserialize, Serialize};

/// Amplitude statistics of one signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    /// `max |y[i]|`
    pub max_amplitude: f64,
    /// `sqrt(mean(y[i]^2))`
    pub rms: f64,
    pub mean: f64,
    /// `max(y) - min(y)`
    pub peak_to_peak: f64,
}

impl SignalStats {
    /// Measure a signal. Every field is 0 for an empty slice.
    ///
    /// RMS and mean are accumulated on samples scaled by the largest
    /// magnitude, so they stay finite whenever every sample is finite.
    /// `peak_to_peak` can still overflow when samples of opposite sign sit
    /// near `f64::MAX`; check [`SignalStats::is_finite`].
    pub fn measure(signal: &[f64]) -> Self {
        if signal.is_empty() {
            return SignalStats::default();
        }

        let peak = max_amplitude(signal);
        let (min, max) = signal
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });

        SignalStats {
            max_amplitude: peak,
            rms: scaled_rms(signal, peak),
            mean: scaled_mean(signal, peak),
            peak_to_peak: max - min,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.max_amplitude.is_finite()
            && self.rms.is_finite()
            && self.mean.is_finite()
            && self.peak_to_peak.is_finite()
    }
}

/// Root mean square, `sqrt(mean(x^2))`, computed as
/// `m * sqrt(mean((x / m)^2))` with `m = max |x|`. 0 for an empty slice.
pub fn rms(signal: &[f64]) -> f64 {
    scaled_rms(signal, max_amplitude(signal))
}

/// Largest absolute sample value. 0 for an empty slice.
pub fn max_amplitude(signal: &[f64]) -> f64 {
    signal.iter().fold(0.0, |acc: f64, &x| acc.max(x.abs()))
}

fn scaled_rms(signal: &[f64], peak: f64) -> f64 {
    if signal.is_empty() || peak == 0.0 {
        return 0.0;
    }
    let sum_squares: f64 = signal
        .iter()
        .map(|&x| {
            let s = x / peak;
            s * s
        })
        .sum();
    peak * (sum_squares / signal.len() as f64).sqrt()
}

fn scaled_mean(signal: &[f64], peak: f64) -> f64 {
    if signal.is_empty() || peak == 0.0 {
        return 0.0;
    }
    let sum: f64 = signal.iter().map(|&x| x / peak).sum();
    peak * (sum / signal.len() as f64)
}
