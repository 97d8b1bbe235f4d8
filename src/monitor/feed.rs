//! Change feed.
//!
//! The engine publishes one event per committed version. Publishing never
//! blocks the writer: a subscriber whose buffer is full misses the event and
//! the drop is counted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Sender, TrySendError};

use super::events::{SceneEvent, SubscriptionId};
use super::stream::SceneEventStream;

#[derive(Debug)]
pub(crate) struct FeedShared {
    subscribers: Mutex<HashMap<SubscriptionId, Sender<SceneEvent>>>,
}

impl FeedShared {
    pub(crate) fn unregister(&self, id: SubscriptionId) {
        // A poisoned map only means a publisher panicked; removal is still safe.
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.remove(&id);
    }
}

/// Fan-out of scene events to subscribers.
#[derive(Debug)]
pub struct ChangeFeed {
    shared: Arc<FeedShared>,
    stream_capacity: usize,
    dropped_events: AtomicU64,
    published: AtomicU64,
}

impl ChangeFeed {
    /// Creates a feed whose subscribers buffer up to `stream_capacity` events.
    #[must_use]
    pub fn new(stream_capacity: usize) -> Self {
        Self {
            shared: Arc::new(FeedShared {
                subscribers: Mutex::new(HashMap::new()),
            }),
            stream_capacity: stream_capacity.max(1),
            dropped_events: AtomicU64::new(0),
            published: AtomicU64::new(0),
        }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> SceneEventStream {
        let id = SubscriptionId::new();
        let (tx, rx) = bounded(self.stream_capacity);
        let mut subscribers = match self.shared.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.insert(id, tx);
        tracing::debug!(subscription = %id, "change feed subscribed");
        SceneEventStream::new(id, rx, Arc::downgrade(&self.shared))
    }

    /// Delivers an event to every subscriber without blocking.
    pub fn publish(&self, event: &SceneEvent) {
        self.published.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = match self.shared.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.retain(|id, tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped_events.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    subscription = %id,
                    version = event.version,
                    "subscriber buffer full, dropping scene event"
                );
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        match self.shared.subscribers.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Events dropped because a subscriber buffer was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Events published since creation.
    #[must_use]
    pub fn published_events(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(1024)
    }
}
