use thiserror::Error;

use crate::model::MetaKind;

#[doc = r#"
An error raised while decoding a Standard MIDI File.

Every decode error is fatal: the decoder never hands back a partially built
[`Context`](crate::model::Context).
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decoding at byte {position}: {kind}")]
pub struct DecodeError {
    position: usize,
    kind: DecodeErrorKind,
}

/// The kind of failure behind a [`DecodeError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// The byte source ran out in the middle of a structure.
    #[error("unexpected end of stream")]
    EndOfStream,
    /// A variable-length quantity was longer than ten bytes or its tenth
    /// byte carried more than a single bit.
    #[error("variable-length quantity overflow")]
    Overflow,
    /// The file does not start with an `MThd` chunk of length 6.
    #[error("bad header: {0}")]
    Header(String),
    /// A track chunk did not start with `MTrk`.
    #[error("track not supported: {0:02X?}")]
    Track([u8; 4]),
    /// Running status was used before any event on the track.
    #[error("running status without a previous event")]
    Format,
    #[error("unknown system event type 0x{0:X}")]
    UnknownSystemEventType(u8),
    #[error("{kind:?} length not {expected} as expected but {actual}")]
    MetaLengthMismatch {
        kind: MetaKind,
        expected: usize,
        actual: u64,
    },
    #[error("unknown meta event type 0x{0:02X}")]
    UnknownMetaEventType(u8),
    /// Reading the source into memory failed.
    #[error("I/O error: {0}")]
    Io(std::io::ErrorKind),
}

impl DecodeError {
    pub const fn new(position: usize, kind: DecodeErrorKind) -> Self {
        Self { position, kind }
    }

    /// Byte offset at which decoding stopped.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// True when the input was simply too short.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::EndOfStream)
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
