use std::f64::consts::PI;

/*
Additive Piano Oscillator
=========================

A struck string does not sound like a single sine: it rings at its
fundamental plus a set of overtones, and the higher overtones die away
faster than the low ones. We model that with a handful of decaying sine
partials summed together.

Vocabulary
----------

  phase       Radians travelled by the fundamental since the note started.
              For sample n at frequency f and rate r:

                  phase = 2π · f · n / r

  partial     One sine component. Described by its harmonic number h (the
              multiple of the fundamental), a decay rate d and a weight w:

                  partial(phase) = sin(h · phase) · exp(−d · phase) · w

  decay       Because decay is expressed per radian of the fundamental,
              high notes (more radians per second) fade faster than low
              notes, just like real strings.


The Partials
------------

    h     d       w
    1   0.001    1/2     fundamental
    2   0.002    1/4     octave
    4   0.003    1/8     two octaves
    8   0.004    1/16    three octaves

Only octave harmonics are used. The result is soft and organ-like at the
attack and thins out towards a pure fundamental as it rings.

The weights sum to 15/16, so the raw sum stays inside [-1, 1]. It is then
pushed through a cubic saturator (see `distortion`) and scaled down before
being converted to 16-bit.
*/

/// One decaying sine component of the additive model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub harmonic: f64,
    pub decay: f64,
    pub weight: f64,
}

pub const PIANO_PARTIALS: [Partial; 4] = [
    Partial { harmonic: 1.0, decay: 0.001, weight: 1.0 / 2.0 },
    Partial { harmonic: 2.0, decay: 0.002, weight: 1.0 / 4.0 },
    Partial { harmonic: 4.0, decay: 0.003, weight: 1.0 / 8.0 },
    Partial { harmonic: 8.0, decay: 0.004, weight: 1.0 / 16.0 },
];

/// Phase in radians of the fundamental after `samples` samples.
#[inline]
pub fn phase_at(frequency: f64, samples: u64, sample_rate: u32) -> f64 {
    2.0 * PI * frequency * samples as f64 / f64::from(sample_rate)
}

/// Sum of the partials at `phase`.
#[inline]
pub fn additive(phase: f64, partials: &[Partial]) -> f64 {
    partials
        .iter()
        .map(|p| (p.harmonic * phase).sin() * (-p.decay * phase).exp() * p.weight)
        .sum()
}

/// Tuning frequency of a keyboard key. Key 48 is A4 (440 Hz).
pub fn key_frequency(key_index: usize) -> f64 {
    440.0 * ((key_index as f64 - 48.0) / 12.0).exp2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_temperament() {
        assert!((key_frequency(48) - 440.0).abs() < 1e-9);
        assert!((key_frequency(60) - 880.0).abs() < 1e-9);
        assert!((key_frequency(0) - 27.5).abs() < 1e-9);
        assert!((key_frequency(39) - 261.625_565).abs() < 1e-3);
    }

    #[test]
    fn starts_silent() {
        assert_eq!(additive(0.0, &PIANO_PARTIALS), 0.0);
    }

    #[test]
    fn stays_within_unit_range() {
        for n in 0..10_000 {
            let value = additive(phase_at(440.0, n, 44_100), &PIANO_PARTIALS);
            assert!(value.abs() <= 15.0 / 16.0 + 1e-9);
        }
    }

    #[test]
    fn decays_over_time() {
        let peak = |start: u64| {
            (start..start + 200)
                .map(|n| additive(phase_at(440.0, n, 44_100), &PIANO_PARTIALS).abs())
                .fold(0.0, f64::max)
        };
        assert!(peak(44_100) < peak(0) / 4.0);
    }
}
