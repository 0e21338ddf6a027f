//! JSON bodies exchanged on `POST /process`.
//!
//! These mirror the flat field names front-ends already send
//! (`a1`, `f1`, `phi1`, ...). Conversion to the typed core request is where
//! operation tags and sample counts are checked.

use serde::{Deserialize, Serialize};

use crate::dsp::combine::Operation;
use crate::dsp::oscillator::SignalSpec;
use crate::dsp::processor::{MAX_SAMPLE_COUNT, ProcessRequest, ProcessResult};
use crate::error::ProcessError;

/// Request body for `POST /process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessParams {
    pub a1: f64,
    pub f1: f64,
    pub phi1: f64,
    pub a2: f64,
    pub f2: f64,
    pub phi2: f64,
    /// `"add"`, `"subtract"` or `"multiply"`.
    pub operation: String,
    /// Signed so that negative counts surface as a parameter error.
    pub samples: i64,
    pub fs: f64,
}

impl ProcessParams {
    /// Convert into a typed request. Numeric ranges are checked later by
    /// [`ProcessRequest::validate`]; only the tag and the sample count sign
    /// are checked here.
    pub fn to_request(&self) -> Result<ProcessRequest, ProcessError> {
        let operation: Operation = self.operation.parse()?;
        if self.samples <= 0 {
            return Err(ProcessError::invalid_parameter(
                "samples",
                format!("must be greater than 0, got {}", self.samples),
            ));
        }
        let sample_count = usize::try_from(self.samples).map_err(|_| {
            ProcessError::invalid_parameter(
                "samples",
                format!("must not exceed {MAX_SAMPLE_COUNT}, got {}", self.samples),
            )
        })?;

        Ok(ProcessRequest {
            signal1: SignalSpec::new(self.a1, self.f1, self.phi1),
            signal2: SignalSpec::new(self.a2, self.f2, self.phi2),
            operation,
            sample_count,
            sample_rate: self.fs,
        })
    }
}

impl From<&ProcessRequest> for ProcessParams {
    fn from(req: &ProcessRequest) -> Self {
        ProcessParams {
            a1: req.signal1.amplitude,
            f1: req.signal1.frequency,
            phi1: req.signal1.phase,
            a2: req.signal2.amplitude,
            f2: req.signal2.frequency,
            phi2: req.signal2.phase,
            operation: req.operation.as_str().to_string(),
            samples: req.sample_count as i64,
            fs: req.sample_rate,
        }
    }
}

/// Response body for a successful `POST /process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalData {
    pub t: Vec<f64>,
    pub x1: Vec<f64>,
    pub x2: Vec<f64>,
    pub y: Vec<f64>,
    pub max_amplitude: f64,
    pub rms: f64,
    #[serde(default)]
    pub mean: f64,
    #[serde(default)]
    pub peak_to_peak: f64,
}

impl SignalData {
    /// True when all four sample arrays have the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.t.len();
        self.x1.len() == n && self.x2.len() == n && self.y.len() == n
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

impl From<ProcessResult> for SignalData {
    fn from(result: ProcessResult) -> Self {
        SignalData {
            t: result.t,
            x1: result.x1,
            x2: result.x2,
            y: result.y,
            max_amplitude: result.stats.max_amplitude,
            rms: result.stats.rms,
            mean: result.stats.mean,
            peak_to_peak: result.stats.peak_to_peak,
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable tag, e.g. `"invalid_parameter"`.
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorBody {
            error: error.into(),
            message: message.into(),
            field: None,
        }
    }
}

impl From<&ProcessError> for ErrorBody {
    fn from(err: &ProcessError) -> Self {
        ErrorBody {
            error: err.kind().to_string(),
            message: err.to_string(),
            field: err.field().map(str::to_string),
        }
    }
}
