/*
Key Envelope
============

Each piano key carries a single continuous level in [0, 1] that follows the
key: it climbs while the key is held and falls away once it is released.
The synthesizer uses the level only as a gate for the release tail; the
visual side reads it to draw how far a key is pressed down.

Vocabulary
----------

  level       Current value, 0.0 (at rest) to 1.0 (fully down).

  gate        Key held (high) or released (low).

  threshold   Below this level a released key is considered silent and
              stops producing samples.


The Shape
---------

  Level
    1.0 ┐      ┌──────────┐
        │     ╱            ╲
        │    ╱              ╲
        │   ╱                 ╲_
    0.0 └──╱─────────────────────‾‾──→ Time
         gate on           gate off
         (linear rise)     (geometric fall)

Rise: +0.25 every 1/60 s, i.e. full level after 4/60 s (~67 ms).
Fall: ×0.25 every 1/60 s. From 1.0 it crosses the 0.005 threshold after
about four of those steps (~64 ms).

Both steps are rescaled to one sample at the running sample rate:

    rise per sample = 0.25 · 60 / sample_rate
    fall per sample = 0.25 ^ (60 / sample_rate)
*/

/// Level below which a released key stops sounding.
pub const RELEASE_THRESHOLD: f64 = 0.005;

/// Envelope steps per second of the reference shape.
const STEP_RATE: f64 = 60.0;
/// Level gained per step while held.
const RISE_STEP: f64 = 0.25;
/// Fraction kept per step after release.
const FALL_STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Low,
    High,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    gate: Gate,
    level: f64,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            gate: Gate::Low,
            level: 0.0,
        }
    }

    /// Gate high. Restarts from zero.
    pub fn note_on(&mut self) {
        self.gate = Gate::High;
        self.level = 0.0;
    }

    /// Gate low. Falls from wherever the level is.
    pub fn note_off(&mut self) {
        self.gate = Gate::Low;
    }

    /// Advance by one sample.
    pub fn next_sample(&mut self, sample_rate: u32) {
        let steps = STEP_RATE / f64::from(sample_rate.max(1));
        match self.gate {
            Gate::High => {
                self.level = (self.level + RISE_STEP * steps).min(1.0);
            }
            Gate::Low => {
                self.level *= FALL_STEP.powf(steps);
            }
        }
        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    /// True while held or while the release tail is above the threshold.
    pub fn is_active(&self) -> bool {
        self.gate == Gate::High || self.level >= RELEASE_THRESHOLD
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
