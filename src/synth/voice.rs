use crate::dsp::{
    distortion::cubic_saturate,
    envelope::Envelope,
    mix::{mix_decaying, StereoFrame},
    oscillator::{additive, key_frequency, phase_at, PIANO_PARTIALS},
};

/// Fixed peak gain applied after saturation.
const PEAK_GAIN: f64 = 0.3;
/// Note traces kept per key for the visual side.
pub const TRACE_HISTORY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Off, // Key up; may still be ringing out
    On,  // Key held
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColor {
    White,
    Black,
}

/// A played note as seen by the visual side: start tick, end tick once
/// released, and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trace {
    pub start: u64,
    pub end: Option<u64>,
    pub velocity: u8,
}

/// One persistent piano key.
pub struct Voice {
    key_index: usize,
    color: KeyColor,
    frequency: f64,
    state: VoiceState,
    velocity: u8,
    /// Samples rendered since the last note-on.
    phase: u64,
    /// Track that triggered the note; picks the output channel.
    source: usize,
    envelope: Envelope,
    traces: Vec<Trace>,
}

impl Voice {
    pub fn new(key_index: usize, color: KeyColor) -> Self {
        Self {
            key_index,
            color,
            frequency: key_frequency(key_index),
            state: VoiceState::Off,
            velocity: 0,
            phase: 0,
            source: 0,
            envelope: Envelope::new(),
            traces: Vec::with_capacity(TRACE_HISTORY),
        }
    }

    /// Press the key. Ignored while already held.
    pub fn on(&mut self, source: usize, time: u64, velocity: u8) {
        if self.state == VoiceState::On {
            return;
        }
        self.state = VoiceState::On;
        self.velocity = velocity;
        self.phase = 0;
        self.source = source;
        self.envelope.note_on();

        if self.traces.len() == TRACE_HISTORY {
            let oldest_closed = self.traces.iter().position(|t| t.end.is_some()).unwrap_or(0);
            self.traces.remove(oldest_closed);
        }
        self.traces.push(Trace {
            start: time,
            end: None,
            velocity,
        });
    }

    /// Release the key. Ignored while already up.
    pub fn off(&mut self, time: u64) {
        if self.state == VoiceState::Off {
            return;
        }
        self.state = VoiceState::Off;
        self.envelope.note_off();
        if let Some(trace) = self.traces.iter_mut().rev().find(|t| t.end.is_none()) {
            trace.end = Some(time);
        }
    }

    /// Produce the next sample and advance the phase.
    pub fn sample(&mut self, sample_rate: u32) -> i16 {
        let phase = phase_at(self.frequency, self.phase, sample_rate);
        let shaped = cubic_saturate(additive(phase, &PIANO_PARTIALS)) * PEAK_GAIN;
        self.phase += 1;
        // `as` saturates at the i16 bounds.
        (shaped * f64::from(self.velocity) * f64::from(i16::MAX) / 127.0) as i16
    }

    /// Mix one sample into the frame if the key is held or still ringing.
    pub fn play(&mut self, frame: &mut StereoFrame, sample_rate: u32) {
        if !self.is_sounding() {
            return;
        }
        let sample = self.sample(sample_rate);
        mix_decaying(&mut frame[self.source % 2], sample);
        self.envelope.next_sample(sample_rate);
    }

    pub fn is_sounding(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn color(&self) -> KeyColor {
        self.color
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Envelope level (0.0 - 1.0), for visualization.
    pub fn level(&self) -> f64 {
        self.envelope.level()
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }
}
