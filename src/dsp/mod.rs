//! DSP core — sinusoid synthesis, signal combination and statistics.
//!
//! Everything here is pure arithmetic over owned `Vec<f64>` buffers. The
//! HTTP server, the client and the WASM bindings all call into
//! [`processor::process`].

pub mod combine;
pub mod oscillator;
pub mod processor;
pub mod stats;
