//! Standard MIDI File decoder.
//!
//! Single pass over the input: the header chunk, then `MTrk` chunks until the
//! bytes run out. Each track is decoded by an explicit loop with its own
//! [`TrackState`], so no decoder state outlives the call and pathological
//! tracks cannot exhaust the stack.

use std::io::Read;

use log::debug;

use super::error::{DecodeErrorKind, DecodeResult};
use super::reader::ByteReader;
use crate::model::{Context, Event, MetaKind, Status, Track};

pub const HEADER_MAGIC: [u8; 4] = *b"MThd";
pub const TRACK_MAGIC: [u8; 4] = *b"MTrk";
pub const HEADER_LEN: u32 = 6;

const SYSEX: u8 = 0xF0;
const SYSEX_ESCAPE: u8 = 0xF7;

/// Per-track parse state, discarded when the track ends.
#[derive(Default)]
struct TrackState {
    time: u64,
    /// Status of the previous event, reused by running status.
    running: Option<(Status, u8)>,
    events: Vec<Event>,
}

/// What the event loop should do after an event.
enum Step {
    Continue,
    EndOfTrack,
}

impl Context {
    /// Decode a complete Standard MIDI File held in memory.
    pub fn decode(bytes: &[u8]) -> DecodeResult<Context> {
        Decoder::new(bytes).run()
    }

    /// Read `source` to the end and decode it.
    pub fn read_from<R: Read>(mut source: R) -> DecodeResult<Context> {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|e| super::error::DecodeError::new(0, DecodeErrorKind::Io(e.kind())))?;
        Self::decode(&bytes)
    }
}

struct Decoder<'a> {
    reader: ByteReader<'a>,
    tracks: Vec<Track>,
    duration: u64,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: ByteReader::new(bytes),
            tracks: Vec::new(),
            duration: 0,
        }
    }

    fn run(mut self) -> DecodeResult<Context> {
        let magic = self.reader.read_magic()?;
        if magic != HEADER_MAGIC {
            return Err(self
                .reader
                .error(DecodeErrorKind::Header(format!("header not supported {magic:02X?}"))));
        }
        let header_len = self.reader.read_u32_be()?;
        if header_len != HEADER_LEN {
            return Err(self.reader.error(DecodeErrorKind::Header(format!(
                "expected header size to be {HEADER_LEN}, was {header_len}"
            ))));
        }
        let format = self.reader.read_u16_be()?;
        let track_count = self.reader.read_u16_be()?;
        let division = self.reader.read_u16_be()?;
        debug!("header: format {format}, {track_count} tracks, division {division}");

        // Running out of bytes exactly where a chunk would start is the
        // normal way a file ends.
        while !self.reader.is_empty() {
            let track = self.read_track()?;
            debug!(
                "track {}: {} events, {} ticks, declared size {}",
                self.tracks.len(),
                track.event_count(),
                track.time(),
                track.size()
            );
            self.tracks.push(track);
        }

        Ok(Context::new(
            format,
            track_count,
            division,
            self.tracks,
            self.duration,
        ))
    }

    fn read_track(&mut self) -> DecodeResult<Track> {
        let magic = self.reader.read_magic()?;
        if magic != TRACK_MAGIC {
            return Err(self.reader.error(DecodeErrorKind::Track(magic)));
        }
        // Advisory only; the event loop decides where the track ends.
        let size = self.reader.read_u32_be()?;

        let mut state = TrackState::default();
        while let Step::Continue = self.read_event(&mut state)? {}

        Ok(Track::new(size, state.time, state.events))
    }

    fn read_event(&mut self, state: &mut TrackState) -> DecodeResult<Step> {
        let delta = self.reader.read_vlq()?;
        let status = self.reader.read_u8()?;

        if status == SYSEX || status == SYSEX_ESCAPE {
            let len = self.reader.read_vlq()?;
            self.reader.skip(len)?;
            return Ok(Step::Continue);
        }

        let (kind, channel, data) = match Status::from_status_byte(status) {
            Some(kind) => {
                let data = self.reader.read_u8()?;
                (kind, status & 0x0F, data)
            }
            // A data byte: running status.
            None => {
                let (kind, channel) = state
                    .running
                    .ok_or_else(|| self.reader.error(DecodeErrorKind::Format))?;
                (kind, channel, status)
            }
        };

        state.time = state.time.saturating_add(delta);
        state.running = Some((kind, channel));
        let event = Event::new(state.time, delta, kind, channel, data);

        let (event, step) = match kind {
            Status::NoteOn
            | Status::NoteOff
            | Status::Polyphonic
            | Status::Control
            | Status::PitchBend => {
                let value = self.reader.read_u8()?;
                (event.with_value(value), Step::Continue)
            }
            Status::Program | Status::Channel => (event, Step::Continue),
            Status::Meta => self.read_meta(event, state.time)?,
        };
        state.events.push(event);
        Ok(step)
    }

    fn read_meta(&mut self, event: Event, track_time: u64) -> DecodeResult<(Event, Step)> {
        if event.channel() != 0x0F {
            return Err(self
                .reader
                .error(DecodeErrorKind::UnknownSystemEventType(event.channel())));
        }

        let len = self.reader.read_vlq()?;
        let payload = self.reader.read_bytes(len)?;
        let kind = MetaKind::try_from(event.data())
            .map_err(|_| self.reader.error(DecodeErrorKind::UnknownMetaEventType(event.data())))?;

        if let Some(expected) = kind.expected_len() {
            if len != expected as u64 {
                return Err(self.reader.error(DecodeErrorKind::MetaLengthMismatch {
                    kind,
                    expected,
                    actual: len,
                }));
            }
        }

        let step = if kind == MetaKind::EndOfTrack {
            self.duration = self.duration.max(track_time);
            Step::EndOfTrack
        } else {
            Step::Continue
        };
        Ok((event.with_payload(payload), step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: [u8; 14] = [
        0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x01, 0x00, 0x60,
    ];

    fn file_with_track(body: &[u8]) -> Vec<u8> {
        let mut bytes = HEADER.to_vec();
        bytes.extend_from_slice(&TRACK_MAGIC);
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(body);
        bytes
    }

    fn decode_err(bytes: &[u8]) -> DecodeErrorKind {
        Context::decode(bytes).unwrap_err().kind().clone()
    }

    #[test]
    fn header_without_tracks() {
        let context = Context::decode(&HEADER).unwrap();
        assert_eq!(context.format(), 1);
        assert_eq!(context.track_count(), 1);
        assert_eq!(context.division(), 0x60);
        assert!(context.tracks().is_empty());
        assert_eq!(context.duration(), 0);
    }

    #[test]
    fn rejects_bad_header_magic() {
        let mut bytes = HEADER;
        bytes[3] = b'x';
        assert!(matches!(decode_err(&bytes), DecodeErrorKind::Header(_)));
    }

    #[test]
    fn rejects_bad_header_length() {
        let mut bytes = HEADER;
        bytes[7] = 7;
        assert!(matches!(decode_err(&bytes), DecodeErrorKind::Header(_)));
    }

    #[test]
    fn rejects_bad_track_magic() {
        let mut bytes = file_with_track(&[0x00, 0xFF, 0x2F, 0x00]);
        bytes[14..18].copy_from_slice(b"MTrx");
        assert_eq!(decode_err(&bytes), DecodeErrorKind::Track(*b"MTrx"));
    }

    #[test]
    fn partial_chunk_magic_is_end_of_stream() {
        let mut bytes = file_with_track(&[0x00, 0xFF, 0x2F, 0x00]);
        bytes.extend_from_slice(b"MT");
        assert_eq!(decode_err(&bytes), DecodeErrorKind::EndOfStream);
    }

    #[test]
    fn running_status_reuses_previous_status() {
        let bytes = file_with_track(&[
            0x00, 0x91, 60, 100, // note on, channel 1
            0x10, 64, 90, // running status
            0x00, 0xFF, 0x2F, 0x00,
        ]);
        let context = Context::decode(&bytes).unwrap();
        let events = context.tracks()[0].events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].status(), Status::NoteOn);
        assert_eq!(events[1].channel(), 1);
        assert_eq!(events[1].data(), 64);
        assert_eq!(events[1].value(), Some(90));
        assert_eq!(events[1].time(), 0x10);
    }

    #[test]
    fn running_status_without_predecessor_fails() {
        let bytes = file_with_track(&[0x00, 60, 100]);
        assert_eq!(decode_err(&bytes), DecodeErrorKind::Format);
    }

    #[test]
    fn zero_velocity_is_normalized() {
        let bytes = file_with_track(&[
            0x00, 0x90, 60, 100, //
            0x60, 0x90, 60, 0x00, //
            0x00, 0xFF, 0x2F, 0x00,
        ]);
        let context = Context::decode(&bytes).unwrap();
        assert_eq!(context.tracks()[0].events()[1].status(), Status::NoteOff);
    }

    #[test]
    fn sysex_is_skipped() {
        let bytes = file_with_track(&[
            0x00, 0xF0, 0x03, 0x7E, 0x7F, 0xF7, //
            0x00, 0xF7, 0x01, 0x00, //
            0x00, 0xC0, 0x05, // program change, no value byte
            0x00, 0xFF, 0x2F, 0x00,
        ]);
        let context = Context::decode(&bytes).unwrap();
        let events = context.tracks()[0].events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status(), Status::Program);
        assert_eq!(events[0].value(), None);
    }

    #[test]
    fn tempo_meta_must_be_three_bytes() {
        let bytes = file_with_track(&[0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1]);
        assert_eq!(
            decode_err(&bytes),
            DecodeErrorKind::MetaLengthMismatch {
                kind: MetaKind::Tempo,
                expected: 3,
                actual: 2,
            }
        );

        let bytes = file_with_track(&[
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
            0x00, 0xFF, 0x2F, 0x00,
        ]);
        let context = Context::decode(&bytes).unwrap();
        assert_eq!(context.tracks()[0].events()[0].tempo_bpm(), Some(120));
        assert_eq!(context.initial_tempo_bpm(), Some(120));
    }

    #[test]
    fn unknown_meta_subtype_fails() {
        let bytes = file_with_track(&[0x00, 0xFF, 0x60, 0x00]);
        assert_eq!(decode_err(&bytes), DecodeErrorKind::UnknownMetaEventType(0x60));
    }

    #[test]
    fn system_common_status_is_not_meta() {
        let bytes = file_with_track(&[0x00, 0xF2, 0x00, 0x00]);
        assert_eq!(decode_err(&bytes), DecodeErrorKind::UnknownSystemEventType(0x2));
    }

    #[test]
    fn missing_end_of_track_is_end_of_stream() {
        let bytes = file_with_track(&[0x00, 0x90, 60, 100]);
        assert_eq!(decode_err(&bytes), DecodeErrorKind::EndOfStream);
    }

    #[test]
    fn declared_size_is_not_checked() {
        let mut bytes = file_with_track(&[0x00, 0xFF, 0x2F, 0x00]);
        bytes[18..22].copy_from_slice(&1000u32.to_be_bytes());
        let context = Context::decode(&bytes).unwrap();
        assert_eq!(context.tracks()[0].size(), 1000);
    }

    #[test]
    fn duration_is_the_longest_track() {
        let mut bytes = file_with_track(&[0x83, 0x60, 0xFF, 0x2F, 0x00]);
        bytes.extend_from_slice(&TRACK_MAGIC);
        bytes.extend_from_slice(&5u32.to_be_bytes());
        bytes.extend_from_slice(&[0x81, 0x00, 0xFF, 0x2F, 0x00]);

        let context = Context::decode(&bytes).unwrap();
        assert_eq!(context.tracks().len(), 2);
        assert_eq!(context.tracks()[0].time(), 480);
        assert_eq!(context.tracks()[1].time(), 128);
        assert_eq!(context.duration(), 480);
    }

    #[test]
    fn reads_from_any_source() {
        let bytes = file_with_track(&[0x00, 0xFF, 0x2F, 0x00]);
        let context = Context::read_from(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(context.tracks().len(), 1);
    }
}
