//! Outward event notifications.
//!
//! The audio callback publishes every dispatched event into a bounded
//! single-producer single-consumer ring. A notification is only a pair of
//! indices into the shared [`Context`], so publishing never allocates; the
//! consumer resolves it back to the [`Event`] on its own thread.

use rtrb::{Consumer, Producer, RingBuffer};

use crate::model::{Context, Event};

/// Default ring size.
pub const DEFAULT_CAPACITY: usize = 1024;

/// A dispatched event, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Notification {
    pub track: usize,
    pub index: usize,
}

impl Notification {
    pub fn new(track: usize, index: usize) -> Self {
        Self { track, index }
    }

    /// The event this notification points at, if `context` has it.
    pub fn event<'a>(&self, context: &'a Context) -> Option<&'a Event> {
        context.tracks().get(self.track)?.events().get(self.index)
    }
}

/// Create a connected publisher/subscriber pair holding up to `capacity`
/// notifications. Dropping both ends frees the queue.
pub fn channel(capacity: usize) -> (Publisher, Subscriber) {
    let (tx, rx) = RingBuffer::new(capacity);
    let publisher = Publisher {
        tx,
        capacity,
        dropped: 0,
    };
    (publisher, Subscriber { rx })
}

/// Audio-thread end of the queue.
pub struct Publisher {
    tx: Producer<Notification>,
    capacity: usize,
    dropped: u64,
}

impl Publisher {
    /// Push without blocking. When the queue is full the notification is
    /// discarded and counted.
    pub fn publish(&mut self, notification: Notification) -> bool {
        match self.tx.push(notification) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Notifications lost to a full queue so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once the subscriber has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_abandoned()
    }
}

/// Consumer end of the queue, read by the diagnostics side.
pub struct Subscriber {
    rx: Consumer<Notification>,
}

impl Subscriber {
    pub fn pop(&mut self) -> Option<Notification> {
        self.rx.pop().ok()
    }

    /// Everything currently queued, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Notification> + '_ {
        std::iter::from_fn(move || self.pop())
    }

    pub fn len(&self) -> usize {
        self.rx.slots()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// True once the publisher has been dropped. Anything still queued can
    /// be drained.
    pub fn is_abandoned(&self) -> bool {
        self.rx.is_abandoned()
    }
}
