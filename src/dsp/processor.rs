//! Synthesize two sinusoids, combine them, and measure the result.
//!
//! `process` is a pure function of its request: no state survives between
//! calls, so it can run on any thread for any number of concurrent requests.

use serde::{Deserialize, Serialize};

use super::combine::Operation;
use super::oscillator::{SignalSpec, positive_finite, time_vector};
use super::stats::SignalStats;
use crate::error::ProcessError;

/// Largest `sample_count` accepted by [`process`]. Four arrays of this length
/// take 512 MiB; servers narrow it further with their own limit.
pub const MAX_SAMPLE_COUNT: usize = 1 << 24;

/// A complete, typed combination request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub signal1: SignalSpec,
    pub signal2: SignalSpec,
    pub operation: Operation,
    pub sample_count: usize,
    /// Sampling frequency in Hz.
    pub sample_rate: f64,
}

/// Time grid, both inputs, the combined output and its statistics.
///
/// All four vectors have exactly `sample_count` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub t: Vec<f64>,
    pub x1: Vec<f64>,
    pub x2: Vec<f64>,
    pub y: Vec<f64>,
    pub stats: SignalStats,
}

impl ProcessRequest {
    pub fn validate(&self) -> Result<(), ProcessError> {
        if self.sample_count == 0 {
            return Err(ProcessError::invalid_parameter(
                "samples",
                "must be greater than 0, got 0",
            ));
        }
        if self.sample_count > MAX_SAMPLE_COUNT {
            return Err(ProcessError::invalid_parameter(
                "samples",
                format!(
                    "must not exceed {MAX_SAMPLE_COUNT}, got {}",
                    self.sample_count
                ),
            ));
        }
        positive_finite("fs", self.sample_rate)?;
        self.signal1.validate(0)?;
        self.signal2.validate(1)?;
        Ok(())
    }
}

impl ProcessResult {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Validate `request`, then synthesize, combine and measure.
///
/// Parameters that pass validation can still leave the f64 range (a tiny
/// `fs` pushes `t` to infinity, a huge `f * t` makes the sine argument
/// infinite, large amplitudes overflow the product). Such requests are
/// rejected rather than returning non-finite samples.
pub fn process(request: &ProcessRequest) -> Result<ProcessResult, ProcessError> {
    request.validate()?;

    let t = time_vector(request.sample_count, request.sample_rate);
    ensure_finite(&t, "fs", "time grid i / fs overflows")?;
    let x1 = request.signal1.synthesize(&t);
    ensure_finite(&x1, "f1", "phase 2π·f1·t + phi1 overflows")?;
    let x2 = request.signal2.synthesize(&t);
    ensure_finite(&x2, "f2", "phase 2π·f2·t + phi2 overflows")?;
    let y = request.operation.combine(&x1, &x2);
    let reason = format!("{} of the two signals overflows; reduce a1 or a2", request.operation);
    ensure_finite(&y, "a1", &reason)?;
    let stats = SignalStats::measure(&y);
    if !stats.is_finite() {
        return Err(ProcessError::invalid_parameter("a1", reason));
    }

    Ok(ProcessResult { t, x1, x2, y, stats })
}

fn ensure_finite(samples: &[f64], field: &'static str, reason: &str) -> Result<(), ProcessError> {
    match samples.iter().position(|x| !x.is_finite()) {
        None => Ok(()),
        Some(i) => Err(ProcessError::invalid_parameter(
            field,
            format!("{reason} (non-finite sample at index {i})"),
        )),
    }
}
