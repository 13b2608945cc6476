//! Low-level DSP primitives used by the piano voices.
//!
//! Plain functions and small state structs, allocation-free and safe to call
//! from the audio callback.

/// Cubic waveshaper.
pub mod distortion;
/// Per-key level envelope that gates the release tail.
pub mod envelope;
/// Decaying-accumulation stereo mixing.
pub mod mix;
/// Additive decaying-sine partials and key tuning.
pub mod oscillator;

pub use envelope::Envelope;
