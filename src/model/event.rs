use std::borrow::Cow;
use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::names::{controller_name, NOTE_NAMES};

/// The high nibble of a status byte.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Status {
    NoteOff = 0x8,
    NoteOn = 0x9,
    Polyphonic = 0xA,
    Control = 0xB,
    Program = 0xC,
    /// Channel pressure (aftertouch)
    Channel = 0xD,
    PitchBend = 0xE,
    /// Meta event (status `0xFF`)
    Meta = 0xF,
}

impl Status {
    /// Status of a byte with the high bit set. Every such byte has a high
    /// nibble of 0x8 - 0xF, so only data bytes (high bit clear) give `None`.
    pub fn from_status_byte(byte: u8) -> Option<Status> {
        if byte & 0x80 == 0 {
            return None;
        }
        Status::try_from(byte >> 4).ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::NoteOff => "NoteOff",
            Status::NoteOn => "NoteOn",
            Status::Polyphonic => "Polyphonic",
            Status::Control => "Control",
            Status::Program => "Program",
            Status::Channel => "Channel",
            Status::PitchBend => "PitchBend",
            Status::Meta => "#",
        }
    }
}

/// Meta event subtypes, identified by the byte after `0xFF`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MetaKind {
    SequenceNumber = 0x00,
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ProgramName = 0x08,
    DeviceName = 0x09,
    /// Text types 0x0A..=0x0F reserved by the standard.
    #[num_enum(alternatives = [0x0B, 0x0C, 0x0D, 0x0E, 0x0F])]
    ReservedText = 0x0A,
    ChannelPrefix = 0x20,
    PortNumber = 0x21,
    EndOfTrack = 0x2F,
    Tempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

impl MetaKind {
    /// Payload length the file must carry for fixed-size subtypes.
    pub const fn expected_len(self) -> Option<usize> {
        match self {
            MetaKind::SequenceNumber => Some(2),
            MetaKind::ChannelPrefix | MetaKind::PortNumber => Some(1),
            MetaKind::Tempo => Some(3),
            MetaKind::SmpteOffset => Some(5),
            MetaKind::TimeSignature => Some(4),
            MetaKind::KeySignature => Some(2),
            _ => None,
        }
    }

    pub const fn is_text(self) -> bool {
        matches!(
            self,
            MetaKind::Text
                | MetaKind::Copyright
                | MetaKind::TrackName
                | MetaKind::InstrumentName
                | MetaKind::Lyric
                | MetaKind::Marker
                | MetaKind::CuePoint
                | MetaKind::ProgramName
                | MetaKind::DeviceName
        )
    }

    /// Name used in event descriptions. Reserved text types have none.
    pub const fn name(self) -> Option<&'static str> {
        let name = match self {
            MetaKind::SequenceNumber => "Sequence",
            MetaKind::Text => "Text",
            MetaKind::Copyright => "Copyright",
            MetaKind::TrackName => "Name",
            MetaKind::InstrumentName => "Instrument",
            MetaKind::Lyric => "Lyric",
            MetaKind::Marker => "Marker",
            MetaKind::CuePoint => "CuePoint",
            MetaKind::ProgramName => "ProgramName",
            MetaKind::DeviceName => "DeviceName",
            MetaKind::ReservedText => return None,
            MetaKind::ChannelPrefix => "ChannelPrefix",
            MetaKind::PortNumber => "PortNumber",
            MetaKind::EndOfTrack => "EndOfTrack",
            MetaKind::Tempo => "Tempo",
            MetaKind::SmpteOffset => "SMPTEOffset",
            MetaKind::TimeSignature => "TimeSignature",
            MetaKind::KeySignature => "KeySignature",
            MetaKind::SequencerSpecific => "Sequencer",
        };
        Some(name)
    }
}

#[doc = r#"
A single decoded track event.

Times are in ticks. `data` is the first data byte: the note number for note
messages, the controller for control changes, the program for program changes
and the subtype for meta events.
"#]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    time: u64,
    delta: u64,
    status: Status,
    channel: u8,
    data: u8,
    value: Option<u8>,
    payload: Vec<u8>,
}

impl Event {
    pub(crate) fn new(time: u64, delta: u64, status: Status, channel: u8, data: u8) -> Self {
        Self {
            time,
            delta,
            status,
            channel: channel & 0x0F,
            data,
            value: None,
            payload: Vec::new(),
        }
    }

    pub(crate) fn with_value(mut self, value: u8) -> Self {
        self.value = Some(value);
        // A note-on with zero velocity is a note-off.
        if self.status == Status::NoteOn && value == 0 {
            self.status = Status::NoteOff;
        }
        self
    }

    pub(crate) fn with_payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    /// Absolute time in ticks from the start of the track.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Ticks since the previous event on the same track.
    pub fn delta(&self) -> u64 {
        self.delta
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Low nibble of the status byte. `0xF` for meta events.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn data(&self) -> u8 {
        self.data
    }

    /// Second data byte (velocity, pressure, controller value...).
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    /// Meta payload. Empty for channel messages.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn meta_kind(&self) -> Option<MetaKind> {
        if self.status != Status::Meta || self.channel != 0x0F {
            return None;
        }
        MetaKind::try_from(self.data).ok()
    }

    pub fn is_end_of_track(&self) -> bool {
        self.meta_kind() == Some(MetaKind::EndOfTrack)
    }

    /// Position of the note within its octave, `0` being C.
    pub fn key(&self) -> u8 {
        self.data % 12
    }

    /// Octave of the note. Note 60 is octave 3.
    pub fn octave(&self) -> i16 {
        i16::from(self.data / 12) - 2
    }

    pub fn note_name(&self) -> String {
        format!("{}{}", NOTE_NAMES[usize::from(self.key())], self.octave())
    }

    pub fn controller_name(&self) -> Option<&'static str> {
        controller_name(self.data)
    }

    /// Microseconds per quarter note carried by a tempo event.
    pub fn micros_per_quarter(&self) -> Option<u32> {
        match (self.meta_kind(), self.payload.as_slice()) {
            (Some(MetaKind::Tempo), &[a, b, c]) => Some(u32::from_be_bytes([0, a, b, c])),
            _ => None,
        }
    }

    /// Tempo in beats per minute, truncated.
    pub fn tempo_bpm(&self) -> Option<u32> {
        self.micros_per_quarter()
            .filter(|&micros| micros > 0)
            .map(|micros| 60_000_000 / micros)
    }

    /// Payload as text with surrounding whitespace removed.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.payload.trim_ascii())
    }

    pub fn sequence_number(&self) -> Option<u16> {
        match (self.meta_kind(), self.payload.as_slice()) {
            (Some(MetaKind::SequenceNumber), &[hi, lo]) => Some(u16::from_be_bytes([hi, lo])),
            _ => None,
        }
    }

    pub fn channel_prefix(&self) -> Option<u8> {
        match self.meta_kind() {
            Some(MetaKind::ChannelPrefix) => self.payload.first().map(|b| b & 0x0F),
            _ => None,
        }
    }

    pub fn port(&self) -> Option<u8> {
        match self.meta_kind() {
            Some(MetaKind::PortNumber) => self.payload.first().map(|b| b & 0x7F),
            _ => None,
        }
    }
}

/// Renders `{time +delta 0xT CC TypeName fields}` for diagnostics.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{} +{} 0x{:X} {:02} {}",
            self.time,
            self.delta,
            u8::from(self.status),
            self.channel,
            self.status.name()
        )?;

        match self.status {
            Status::NoteOn | Status::NoteOff => {
                write!(f, " {}", self.note_name())?;
                if let Some(velocity) = self.value.filter(|&v| v > 0) {
                    write!(f, ":{velocity}")?;
                }
            }
            Status::Control => {
                match self.controller_name() {
                    Some(name) => write!(f, " {name}")?,
                    None => write!(f, " Control0x{:x}", self.data)?,
                }
                write!(f, " {}", self.value.unwrap_or(0))?;
            }
            Status::Program => write!(f, " {}", self.data)?,
            Status::Meta if self.channel == 0x0F => self.fmt_meta(f)?,
            _ => {}
        }

        write!(f, "}}")
    }
}

impl Event {
    fn fmt_meta(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.meta_kind();
        match kind.and_then(MetaKind::name) {
            Some(name) => write!(f, " {name}")?,
            None => write!(f, " Event0x{:x}", self.data)?,
        }

        let Some(kind) = kind else {
            return Ok(());
        };
        match kind {
            MetaKind::SequenceNumber => {
                if let Some(n) = self.sequence_number() {
                    write!(f, " {n}")?;
                }
            }
            k if k.is_text() => write!(f, " <{}>", self.text())?,
            MetaKind::ChannelPrefix => {
                if let Some(channel) = self.channel_prefix() {
                    write!(f, " {channel}")?;
                }
            }
            MetaKind::PortNumber => {
                if let Some(port) = self.port() {
                    write!(f, " {port}")?;
                }
            }
            MetaKind::Tempo => {
                if let Some(bpm) = self.tempo_bpm() {
                    write!(f, " {bpm}")?;
                }
            }
            MetaKind::SmpteOffset
            | MetaKind::TimeSignature
            | MetaKind::KeySignature
            | MetaKind::SequencerSpecific => {
                write!(f, " [")?;
                for (i, byte) in self.payload.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{byte}")?;
                }
                write!(f, "]")?;
            }
            _ => {}
        }
        Ok(())
    }
}
