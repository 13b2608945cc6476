//! Decoded Standard MIDI File contents.
//!
//! A [`Context`] is built once by the decoder and is read-only afterwards.
//! Everything here is plain data plus pure derivations used for diagnostics;
//! none of it is needed to synthesize audio.

mod event;
pub mod names;

pub use event::{Event, MetaKind, Status};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Track layout declared in the file header.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Format 0: a single multi-channel track
    SingleTrack,
    /// Format 1: tracks played together
    Simultaneous,
    /// Format 2: independent sequences
    SequentiallyIndependent,
    /// Anything else the header claimed
    Unknown(u16),
}

impl From<u16> for Format {
    fn from(value: u16) -> Self {
        match value {
            0 => Format::SingleTrack,
            1 => Format::Simultaneous,
            2 => Format::SequentiallyIndependent,
            other => Format::Unknown(other),
        }
    }
}

/// One `MTrk` chunk.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    size: u32,
    time: u64,
    events: Vec<Event>,
}

impl Track {
    pub(crate) fn new(size: u32, time: u64, events: Vec<Event>) -> Self {
        Self { size, time, events }
    }

    /// Chunk size as declared in the file. Never checked against the bytes
    /// actually consumed.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Absolute time of the last event, in ticks.
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Text of the first track-name meta event.
    pub fn name(&self) -> Option<String> {
        self.events
            .iter()
            .find(|e| e.meta_kind() == Some(MetaKind::TrackName))
            .map(|e| e.text().into_owned())
    }
}

/// A fully decoded file.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    format: u16,
    track_count: u16,
    division: u16,
    tracks: Vec<Track>,
    duration: u64,
}

impl Context {
    pub(crate) fn new(
        format: u16,
        track_count: u16,
        division: u16,
        tracks: Vec<Track>,
        duration: u64,
    ) -> Self {
        Self {
            format,
            track_count,
            division,
            tracks,
            duration,
        }
    }

    /// Raw format word from the header.
    pub fn format(&self) -> u16 {
        self.format
    }

    pub fn format_kind(&self) -> Format {
        Format::from(self.format)
    }

    /// Number of tracks the header announced. The decoder keeps reading
    /// chunks until the stream ends, so this may differ from
    /// `tracks().len()`.
    pub fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Ticks per quarter note.
    pub fn division(&self) -> u16 {
        self.division
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Latest end-of-track time over all tracks, in ticks.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Tempo of the first tempo event in any track, in beats per minute.
    ///
    /// Informational only: playback runs at a fixed tick scale.
    pub fn initial_tempo_bpm(&self) -> Option<u32> {
        self.tracks
            .iter()
            .flat_map(|t| t.events())
            .filter(|e| e.meta_kind() == Some(MetaKind::Tempo))
            .min_by_key(|e| e.time())
            .and_then(Event::tempo_bpm)
    }
}
