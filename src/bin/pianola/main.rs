//! pianola - play a Standard MIDI File
//!
//! Run with: cargo run -- song.mid

mod app;
mod cli;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use env_logger::Env;
use log::info;
use std::sync::Arc;

use pianola::Context;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::Args::parse();

    let level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let bytes = std::fs::read(&args.file)
        .wrap_err_with(|| format!("failed to read {}", args.file.display()))?;
    let context = Context::decode(&bytes)
        .wrap_err_with(|| format!("failed to decode {}", args.file.display()))?;

    info!(
        "{}: format {}, {} tracks, division {}, {} ticks",
        args.file.display(),
        context.format(),
        context.tracks().len(),
        context.division(),
        context.duration()
    );
    for (index, track) in context.tracks().iter().enumerate() {
        info!(
            "  track {index}: {} events, {} ticks{}",
            track.event_count(),
            track.time(),
            track.name().map(|n| format!(" \"{n}\"")).unwrap_or_default()
        );
    }
    if let Some(bpm) = context.initial_tempo_bpm() {
        info!("  tempo {bpm} BPM (not applied)");
    }

    let context = Arc::new(context);
    let config = args.player_config();
    match &args.wav {
        Some(path) => app::render(context, &config, path),
        None => app::play(context, config),
    }
}
