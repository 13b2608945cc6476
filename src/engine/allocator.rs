use crate::dsp::mix::StereoFrame;
use crate::model::{Event, Status};

/// Where the scheduler sends due events and pulls audio from.
pub trait VoiceAllocator {
    /// Press `note`. `source` is the index of the track that played it.
    fn note_on(&mut self, source: usize, note: u8, time: u64, velocity: u8);

    fn note_off(&mut self, note: u8, time: u64);

    /// Fold every sounding voice into `frame`.
    fn mix_frame(&mut self, frame: &mut StereoFrame, sample_rate: u32);

    /// True while any voice is held or still ringing out.
    fn is_sounding(&self) -> bool;

    /// Apply a decoded event. Only note messages change voice state.
    fn handle_event(&mut self, source: usize, event: &Event) {
        match event.status() {
            Status::NoteOn => {
                let velocity = event.value().unwrap_or(0);
                self.note_on(source, event.data(), event.time(), velocity);
            }
            Status::NoteOff => self.note_off(event.data(), event.time()),
            _ => {}
        }
    }
}
