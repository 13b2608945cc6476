use crate::dsp::mix::StereoFrame;
use crate::engine::allocator::VoiceAllocator;
use crate::synth::voice::{KeyColor, Voice};

/// Number of keys on the instrument.
pub const KEY_COUNT: usize = 88;
/// MIDI note of the lowest key (A0).
pub const LOWEST_NOTE: u8 = 21;
/// MIDI note of the highest key (C8).
pub const HIGHEST_NOTE: u8 = LOWEST_NOTE + KEY_COUNT as u8 - 1;

/// Key colour by semitone above C.
const SEMITONE_COLORS: [KeyColor; 12] = [
    KeyColor::White, // C
    KeyColor::Black, // C#
    KeyColor::White, // D
    KeyColor::Black, // D#
    KeyColor::White, // E
    KeyColor::White, // F
    KeyColor::Black, // F#
    KeyColor::White, // G
    KeyColor::Black, // G#
    KeyColor::White, // A
    KeyColor::Black, // A#
    KeyColor::White, // B
];

/// Key index for a MIDI note, if the note is on the keyboard.
pub fn key_index(note: u8) -> Option<usize> {
    (LOWEST_NOTE..=HIGHEST_NOTE)
        .contains(&note)
        .then(|| usize::from(note - LOWEST_NOTE))
}

/// Colour of a key, looked up from its semitone position.
pub fn key_color(key_index: usize) -> KeyColor {
    SEMITONE_COLORS[(key_index + usize::from(LOWEST_NOTE)) % 12]
}

/// Row and column of a key in a 9 × 12 octave grid: row 0 holds A0 - B0,
/// the column is the semitone above C.
pub fn grid_slot(key_index: usize) -> (usize, usize) {
    let note = key_index + usize::from(LOWEST_NOTE);
    (note / 12 - 1, note % 12)
}

/// The full 88-key instrument: one persistent voice per key.
pub struct Keyboard {
    voices: Vec<Voice>,
}

impl Keyboard {
    pub fn new() -> Self {
        let voices = (0..KEY_COUNT).map(|i| Voice::new(i, key_color(i))).collect();
        Self { voices }
    }

    /// Voices in ascending key order, for visualization.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice(&self, note: u8) -> Option<&Voice> {
        key_index(note).map(|i| &self.voices[i])
    }

    fn voice_mut(&mut self, note: u8) -> Option<&mut Voice> {
        key_index(note).map(move |i| &mut self.voices[i])
    }

    pub fn sounding_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_sounding()).count()
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceAllocator for Keyboard {
    fn note_on(&mut self, source: usize, note: u8, time: u64, velocity: u8) {
        if let Some(voice) = self.voice_mut(note) {
            voice.on(source, time, velocity);
        }
    }

    fn note_off(&mut self, note: u8, time: u64) {
        if let Some(voice) = self.voice_mut(note) {
            voice.off(time);
        }
    }

    fn mix_frame(&mut self, frame: &mut StereoFrame, sample_rate: u32) {
        for voice in &mut self.voices {
            voice.play(frame, sample_rate);
        }
    }

    fn is_sounding(&self) -> bool {
        self.voices.iter().any(Voice::is_sounding)
    }
}
