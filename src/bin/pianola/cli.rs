use std::path::PathBuf;

use clap::Parser;
use pianola::PlayerConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a Standard MIDI File on a synthesized piano", long_about = None)]
pub struct Args {
    /// MIDI file to play
    pub file: PathBuf,

    /// Log every event as it is played
    #[arg(short, long)]
    pub verbose: bool,

    /// Output sample rate for offline rendering
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Render to a WAV file instead of the audio device
    #[arg(long, value_name = "OUT")]
    pub wav: Option<PathBuf>,

    /// Capacity of the event notification queue
    #[arg(long, value_name = "N")]
    pub queue: Option<usize>,
}

impl Args {
    pub fn player_config(&self) -> PlayerConfig {
        let mut config = PlayerConfig::new().log_events(self.verbose);
        if let Some(rate) = self.sample_rate {
            config = config.sample_rate(rate);
        }
        if let Some(capacity) = self.queue {
            config = config.queue_capacity(capacity);
        }
        config
    }
}
