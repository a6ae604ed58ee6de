//! Low-level signal primitives embedded in voices.
//!
//! Allocation-free and realtime-safe: both types advance one sample at a
//! time with nothing but arithmetic, so they can live inside the audio
//! callback. Orchestration (which notes sound, when voices die) stays in
//! the `synth` module.

/// Fixed-shape pluck amplitude envelope.
pub mod envelope;
/// Phase-accumulator oscillator and waveform shapes.
pub mod oscillator;

pub use envelope::PluckEnvelope;
pub use oscillator::{Oscillator, Waveform};
