//! Scheduler - sample-accurate playback of a decoded file
//!
//! Pulled once per stereo output frame. Each pull dispatches every event
//! that has come due to the voice allocator and the notification queue,
//! then mixes one frame.
//!
//! Ticks are mapped to frames at a fixed scale of `4 × division` ticks per
//! second. Tempo events are decoded but never rescale playback.

use std::io;
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use super::allocator::VoiceAllocator;
use super::notify::{self, Notification, Publisher, Subscriber};
use crate::config::PlayerConfig;
use crate::dsp::mix::{frame_to_le_bytes, StereoFrame};
use crate::model::Context;
use crate::synth::keyboard::Keyboard;
use crate::FRAME_BYTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("division is zero, ticks cannot be mapped to frames")]
    ZeroDivision,
    #[error("sample rate is zero")]
    ZeroSampleRate,
}

/// Result of one pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Playing,  // A frame was written
    Finished, // Nothing written; stop pulling
}

pub struct Scheduler<A: VoiceAllocator = Keyboard> {
    context: Arc<Context>,
    allocator: A,
    publisher: Option<Publisher>,
    /// Next event per track
    cursors: Vec<usize>,
    sample_rate: u32,
    /// Ticks per second
    tick_unit: u64,
    /// Frames produced so far
    frame: u64,
    /// Playback position in ticks
    time: u64,
    finished: bool,
}

impl Scheduler<Keyboard> {
    /// Play `context` on a fresh 88-key keyboard.
    pub fn new(context: Arc<Context>, sample_rate: u32) -> Result<Self, PlaybackError> {
        Self::with_allocator(context, sample_rate, Keyboard::new())
    }

    /// Build a scheduler and its notification queue from `config`.
    pub fn from_config(
        context: Arc<Context>,
        config: &PlayerConfig,
    ) -> Result<(Self, Subscriber), PlaybackError> {
        let (publisher, subscriber) = notify::channel(config.queue_capacity);
        let scheduler = Self::new(context, config.sample_rate)?.with_publisher(publisher);
        Ok((scheduler, subscriber))
    }
}

impl<A: VoiceAllocator> Scheduler<A> {
    pub fn with_allocator(
        context: Arc<Context>,
        sample_rate: u32,
        allocator: A,
    ) -> Result<Self, PlaybackError> {
        if context.division() == 0 {
            return Err(PlaybackError::ZeroDivision);
        }
        if sample_rate == 0 {
            return Err(PlaybackError::ZeroSampleRate);
        }
        let tick_unit = 4 * u64::from(context.division());
        debug!(
            "scheduler: {} tracks, {} ticks at {} ticks/s, {} Hz",
            context.tracks().len(),
            context.duration(),
            tick_unit,
            sample_rate
        );

        Ok(Self {
            cursors: vec![0; context.tracks().len()],
            context,
            allocator,
            publisher: None,
            sample_rate,
            tick_unit,
            frame: 0,
            time: 0,
            finished: false,
        })
    }

    /// Publish every dispatched event to `publisher`.
    pub fn with_publisher(mut self, publisher: Publisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Produce the next frame, or `None` once playback has finished.
    pub fn next_frame(&mut self) -> Option<StereoFrame> {
        if self.finished {
            return None;
        }
        if self.time > self.context.duration()
            && self.all_dispatched()
            && !self.allocator.is_sounding()
        {
            self.finished = true;
            return None;
        }

        self.dispatch_due();

        self.frame += 1;
        self.time = self.ticks_at(self.frame);

        let mut frame = [0; 2];
        self.allocator.mix_frame(&mut frame, self.sample_rate);
        Some(frame)
    }

    /// Pull callback: write one little-endian stereo frame into `out`.
    pub fn process_frame(&mut self, out: &mut [u8; FRAME_BYTES]) -> StreamStatus {
        match self.next_frame() {
            Some(frame) => {
                *out = frame_to_le_bytes(frame);
                StreamStatus::Playing
            }
            None => StreamStatus::Finished,
        }
    }

    /// Render interleaved samples until playback finishes or `max_frames`
    /// frames have been produced.
    pub fn render_to_end(&mut self, max_frames: usize) -> Vec<i16> {
        let mut samples = Vec::new();
        for _ in 0..max_frames {
            let Some([left, right]) = self.next_frame() else {
                break;
            };
            samples.push(left);
            samples.push(right);
        }
        samples
    }

    fn dispatch_due(&mut self) {
        let rate = u128::from(self.sample_rate);
        let now = u128::from(self.frame) * u128::from(self.tick_unit);

        for (track_index, track) in self.context.tracks().iter().enumerate() {
            let cursor = &mut self.cursors[track_index];
            let events = track.events();

            while let Some(event) = events.get(*cursor) {
                if u128::from(event.time()) * rate > now {
                    break;
                }
                self.allocator.handle_event(track_index, event);
                if let Some(publisher) = self.publisher.as_mut() {
                    publisher.publish(Notification::new(track_index, *cursor));
                }
                *cursor += 1;
            }
        }
    }

    /// True once every track's cursor has passed its last event.
    fn all_dispatched(&self) -> bool {
        self.cursors
            .iter()
            .zip(self.context.tracks())
            .all(|(&cursor, track)| cursor >= track.events().len())
    }

    /// Frames needed for playback to reach `ticks`, rounded up.
    pub fn frames_until(&self, ticks: u64) -> u64 {
        let rate = u128::from(self.sample_rate);
        let frames = (u128::from(ticks) * rate).div_ceil(u128::from(self.tick_unit));
        u64::try_from(frames).unwrap_or(u64::MAX)
    }

    fn ticks_at(&self, frame: u64) -> u64 {
        let ticks = u128::from(frame) * u128::from(self.tick_unit) / u128::from(self.sample_rate);
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames produced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current position in ticks.
    pub fn playback_time(&self) -> u64 {
        self.time
    }

    /// Length of the file in ticks.
    pub fn duration(&self) -> u64 {
        self.context.duration()
    }

    /// Position through the file, 0.0 - 1.0.
    pub fn progress(&self) -> f64 {
        let duration = self.duration();
        if duration == 0 {
            return 1.0;
        }
        (self.time as f64 / duration as f64).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Notifications lost to a full queue.
    pub fn dropped_notifications(&self) -> u64 {
        self.publisher.as_ref().map_or(0, Publisher::dropped)
    }
}

/// Streams the rendered PCM. Reads whole frames only and returns `Ok(0)`
/// once playback has finished.
impl<A: VoiceAllocator> io::Read for Scheduler<A> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !buf.is_empty() && buf.len() < FRAME_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer smaller than one frame",
            ));
        }

        let mut written = 0;
        for chunk in buf.chunks_exact_mut(FRAME_BYTES) {
            let Some(frame) = self.next_frame() else {
                break;
            };
            chunk.copy_from_slice(&frame_to_le_bytes(frame));
            written += FRAME_BYTES;
        }
        Ok(written)
    }
}
