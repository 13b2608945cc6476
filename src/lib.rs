pub mod config; // Player settings
pub mod dsp;
pub mod engine; // Frame-accurate playback
pub mod io;
pub mod model; // Decoded file: context, tracks, events
pub mod synth; // Per-key piano voices

pub use config::PlayerConfig;
pub use engine::scheduler::{PlaybackError, Scheduler, StreamStatus};
pub use model::{Context, Event};

/// Bytes per output frame: two little-endian i16 samples.
pub const FRAME_BYTES: usize = 4;
