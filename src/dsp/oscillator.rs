//! Sinusoid synthesis over a uniform time grid.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;

/// One sinusoid, `amplitude * sin(2π * frequency * t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSpec {
    pub amplitude: f64,
    /// Frequency in Hz.
    pub frequency: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

/// Wire names of the per-signal fields, indexed by channel (0 → x1, 1 → x2).
const AMPLITUDE_FIELDS: [&str; 2] = ["a1", "a2"];
const FREQUENCY_FIELDS: [&str; 2] = ["f1", "f2"];
const PHASE_FIELDS: [&str; 2] = ["phi1", "phi2"];

impl SignalSpec {
    pub fn new(amplitude: f64, frequency: f64, phase: f64) -> Self {
        SignalSpec {
            amplitude,
            frequency,
            phase,
        }
    }

    /// Value of the sinusoid at time `t` (seconds).
    pub fn sample_at(&self, t: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency * t + self.phase).sin()
    }

    /// Evaluate the sinusoid at every point of `time`.
    pub fn synthesize(&self, time: &[f64]) -> Vec<f64> {
        time.iter().map(|&t| self.sample_at(t)).collect()
    }

    /// Reject non-finite or non-positive amplitude/frequency and non-finite phase.
    /// `channel` selects the wire names used in the error (0 or 1).
    pub fn validate(&self, channel: usize) -> Result<(), ProcessError> {
        let channel = channel.min(1);
        positive_finite(AMPLITUDE_FIELDS[channel], self.amplitude)?;
        positive_finite(FREQUENCY_FIELDS[channel], self.frequency)?;
        if !self.phase.is_finite() {
            return Err(ProcessError::invalid_parameter(
                PHASE_FIELDS[channel],
                format!("must be finite, got {}", self.phase),
            ));
        }
        Ok(())
    }
}

/// Time stamps `t[i] = i / sample_rate` for `i` in `[0, samples)`.
pub fn time_vector(samples: usize, sample_rate: f64) -> Vec<f64> {
    (0..samples).map(|n| n as f64 / sample_rate).collect()
}

pub(crate) fn positive_finite(field: &'static str, value: f64) -> Result<(), ProcessError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProcessError::invalid_parameter(
            field,
            format!("must be a finite number greater than 0, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_vector_spacing() {
        let t = time_vector(10, 1000.0);
        assert_eq!(t.len(), 10);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[1], 0.001);
        assert!((t[9] - 0.009).abs() < 1e-12);
    }

    #[test]
    fn time_vector_empty() {
        assert!(time_vector(0, 1000.0).is_empty());
    }

    #[test]
    fn sine_starts_at_zero() {
        let spec = SignalSpec::new(1.0, 5.0, 0.0);
        assert!(spec.sample_at(0.0).abs() < 1e-12);
    }

    #[test]
    fn quarter_period_hits_amplitude() {
        let spec = SignalSpec::new(2.5, 1.0, 0.0);
        let t = [0.0, 0.25, 0.5, 0.75];
        let x = spec.synthesize(&t);
        assert!((x[1] - 2.5).abs() < 1e-12, "peak should be 2.5, got {}", x[1]);
        assert!(x[2].abs() < 1e-12);
        assert!((x[3] + 2.5).abs() < 1e-12);
    }

    #[test]
    fn phase_shifts_to_cosine() {
        let spec = SignalSpec::new(1.0, 3.0, PI / 2.0);
        for &t in &[0.0, 0.01, 0.1, 0.37] {
            let expected = (2.0 * PI * 3.0 * t).cos();
            assert!((spec.sample_at(t) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn validate_names_channel_fields() {
        let err = SignalSpec::new(0.0, 5.0, 0.0).validate(0).unwrap_err();
        assert_eq!(err.field(), Some("a1"));

        let err = SignalSpec::new(1.0, -5.0, 0.0).validate(1).unwrap_err();
        assert_eq!(err.field(), Some("f2"));

        let err = SignalSpec::new(1.0, 5.0, f64::NAN).validate(1).unwrap_err();
        assert_eq!(err.field(), Some("phi2"));
    }

    #[test]
    fn negative_phase_is_valid() {
        assert!(SignalSpec::new(1.0, 5.0, -PI).validate(0).is_ok());
    }
}
