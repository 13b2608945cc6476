//! Waveshaping
//!
//! A waveshaper applies a transfer function to each sample. The cubic
//! shaper used by the piano voice is
//!
//!   f(x) = x + x³
//!
//! Small signals pass almost unchanged; near full scale the cube term adds a
//! third harmonic and boosts the peaks, thickening the attack of loud notes.
//! It is not bounded, so the caller scales the result down afterwards.

/// Cubic saturation, `x + x³`.
#[inline]
pub fn cubic_saturate(sample: f64) -> f64 {
    sample + sample * sample * sample
}
