// Purpose - external interfaces: SMF decoding in, PCM files out

pub mod error;
pub mod midi;
pub mod reader;
pub mod wav;

pub use error::{DecodeError, DecodeErrorKind, DecodeResult};
pub use reader::ByteReader;
