//! Player settings shared by the library and the `pianola` binary.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::notify::DEFAULT_CAPACITY;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Output frames per second
    pub sample_rate: u32,
    /// Notifications the outward queue holds before dropping
    pub queue_capacity: usize,
    /// Log every dispatched event
    pub log_events: bool,
}

impl PlayerConfig {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            queue_capacity: DEFAULT_CAPACITY,
            log_events: false,
        }
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new()
    }
}
