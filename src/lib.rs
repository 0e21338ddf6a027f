pub mod dsp;
pub mod error;
pub mod wire;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod logging;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub mod client;

pub use crate::dsp::combine::Operation;
pub use crate::dsp::oscillator::SignalSpec;
pub use crate::dsp::processor::{MAX_SAMPLE_COUNT, ProcessRequest, ProcessResult, process};
pub use crate::dsp::stats::SignalStats;
pub use crate::error::ProcessError;
pub use crate::wire::{ErrorBody, ProcessParams, SignalData};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the signal_combiner version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Run a wire-format request (`{a1, f1, phi1, a2, f2, phi2, operation, samples, fs}`)
/// and return the wire-format response.
pub fn process_params(params: &ProcessParams) -> Result<SignalData, ProcessError> {
    let request = params.to_request()?;
    Ok(process(&request)?.into())
}

/// WASM-exposed: same contract as `POST /process`, computed in the browser.
/// Errors are returned as the JSON error body.
#[wasm_bindgen]
pub fn process_signals(params: JsValue) -> Result<JsValue, JsValue> {
    let params: ProcessParams = serde_wasm_bindgen::from_value(params).map_err(|e| {
        error_value(&ErrorBody::new("malformed_request", e.to_string()))
    })?;
    let data = process_params(&params).map_err(|e| error_value(&ErrorBody::from(&e)))?;
    serde_wasm_bindgen::to_value(&data).map_err(|e| JsValue::from_str(&format!("{e}")))
}

fn error_value(body: &ErrorBody) -> JsValue {
    serde_wasm_bindgen::to_value(body).unwrap_or_else(|_| JsValue::from_str(&body.message))
}
