//! Hosts for the scheduler: the default audio device, or a WAV file

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};

use pianola::dsp::mix::StereoFrame;
use pianola::engine::Subscriber;
use pianola::io::wav::write_wav_stereo16;
use pianola::{Context, PlayerConfig, Scheduler};

/// Log target for played events.
const EVENT_TARGET: &str = "pianola::events";
/// How often the main thread drains notifications.
const POLL_INTERVAL: Duration = Duration::from_millis(16);
/// Longest release tail an offline render waits for after the last tick.
const MAX_TAIL_SECONDS: u64 = 10;

/// State the audio callback reports back to the main thread
#[derive(Default)]
struct PlaybackStatus {
    finished: AtomicBool,
    failed: AtomicBool,
    dropped: AtomicU64,
}

impl PlaybackStatus {
    /// `Ok(true)` once the file has finished, an error once the stream has
    /// failed.
    fn poll(&self) -> EyreResult<bool> {
        if self.failed.load(Ordering::Acquire) {
            return Err(eyre!("audio stream failed, playback stopped"));
        }
        Ok(self.finished.load(Ordering::Acquire))
    }
}

/// Play through the default output device at its native rate, blocking
/// until the file has finished.
pub fn play(context: Arc<Context>, config: PlayerConfig) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let channels = usize::from(supported.channels());
    let config = config.sample_rate(supported.sample_rate().0);
    info!("output: {} Hz, {} channels", config.sample_rate, channels);

    let (mut scheduler, mut subscriber) = Scheduler::from_config(Arc::clone(&context), &config)?;
    let status = Arc::new(PlaybackStatus::default());
    let callback_status = Arc::clone(&status);
    let error_status = Arc::clone(&status);

    let stream = device.build_output_stream(
        &supported.into(),
        move |data: &mut [f32], _| {
            for out in data.chunks_mut(channels) {
                match scheduler.next_frame() {
                    Some(frame) => write_frame(out, frame),
                    None => out.fill(0.0),
                }
            }
            if scheduler.is_finished() {
                callback_status
                    .dropped
                    .store(scheduler.dropped_notifications(), Ordering::Relaxed);
                callback_status.finished.store(true, Ordering::Release);
            }
        },
        move |err| {
            log::error!("audio stream error: {err}");
            error_status.failed.store(true, Ordering::Release);
        },
        None,
    )?;

    stream.play().wrap_err("failed to start audio stream")?;
    info!("playing... press Ctrl+C to stop");

    loop {
        std::thread::sleep(POLL_INTERVAL);
        drain_events(&mut subscriber, &context, config.log_events);
        if status.poll()? {
            break;
        }
    }
    drain_events(&mut subscriber, &context, config.log_events);
    drop(stream);

    report_dropped(status.dropped.load(Ordering::Relaxed));
    info!("finished");
    Ok(())
}

/// Render the whole file offline at the configured rate and write it to
/// `path`.
pub fn render(context: Arc<Context>, config: &PlayerConfig, path: &Path) -> EyreResult<()> {
    let (mut scheduler, mut subscriber) = Scheduler::from_config(Arc::clone(&context), config)?;
    let rate = u64::from(config.sample_rate);
    let limit = scheduler
        .frames_until(context.duration())
        .saturating_add(rate * MAX_TAIL_SECONDS);

    let mut samples = Vec::new();
    while !scheduler.is_finished() && scheduler.frame() < limit {
        // Drain between chunks so the queue never fills.
        let chunk = (limit - scheduler.frame()).min(rate / 10 + 1);
        samples.extend(scheduler.render_to_end(chunk as usize));
        drain_events(&mut subscriber, &context, config.log_events);
    }
    if !scheduler.is_finished() {
        warn!(
            "stopped after {} frames with notes still sounding",
            scheduler.frame()
        );
    }

    write_wav_stereo16(path, &samples, config.sample_rate)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    info!(
        "wrote {} frames ({:.1} s) to {}",
        scheduler.frame(),
        scheduler.frame() as f64 / rate as f64,
        path.display()
    );
    report_dropped(scheduler.dropped_notifications());
    Ok(())
}

fn write_frame(out: &mut [f32], [left, right]: StereoFrame) {
    let left = f32::from(left) / 32_768.0;
    let right = f32::from(right) / 32_768.0;
    match out {
        [mono] => *mono = (left + right) * 0.5,
        _ => {
            for (channel, sample) in out.iter_mut().enumerate() {
                *sample = if channel % 2 == 0 { left } else { right };
            }
        }
    }
}

fn drain_events(subscriber: &mut Subscriber, context: &Context, enabled: bool) {
    for notification in subscriber.drain() {
        if !enabled {
            continue;
        }
        if let Some(event) = notification.event(context) {
            info!(target: EVENT_TARGET, "track {} {}", notification.track, event);
        }
    }
}

fn report_dropped(dropped: u64) {
    if dropped > 0 {
        warn!("{dropped} event notifications dropped, queue was full");
    }
}
