pub mod allocator;
pub mod notify;
pub mod scheduler;

pub use allocator::VoiceAllocator;
pub use notify::{Notification, Publisher, Subscriber};
pub use scheduler::{PlaybackError, Scheduler, StreamStatus};
