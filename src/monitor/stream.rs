use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::error::{BrickError, BrickResult, ExecutionError};

use super::events::{SceneEvent, SubscriptionId};
use super::feed::FeedShared;

/// A subscription stream of scene events.
///
/// Dropping this stream unsubscribes.
#[derive(Debug)]
pub struct SceneEventStream {
    subscription_id: SubscriptionId,
    rx: Receiver<SceneEvent>,
    feed: Weak<FeedShared>,
    unregistered: AtomicBool,
}

fn disconnected() -> BrickError {
    BrickError::Execution(ExecutionError::Disconnected {
        path: "scene_event_stream".to_string(),
    })
}

impl SceneEventStream {
    pub(crate) fn new(
        subscription_id: SubscriptionId,
        rx: Receiver<SceneEvent>,
        feed: Weak<FeedShared>,
    ) -> Self {
        Self {
            subscription_id,
            rx,
            feed,
            unregistered: AtomicBool::new(false),
        }
    }

    /// The subscription id backing this stream.
    #[must_use]
    pub const fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    /// Explicit unregistration. Idempotent.
    ///
    /// Events already buffered can still be received.
    pub fn unsubscribe(&self) {
        if self.unregistered.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(feed) = self.feed.upgrade() {
            feed.unregister(self.subscription_id);
        }
    }

    /// Receive the next event (blocking).
    ///
    /// # Errors
    /// `Disconnected` once the feed is gone and the buffer is drained.
    pub fn recv(&self) -> BrickResult<SceneEvent> {
        self.rx.recv().map_err(|_| disconnected())
    }

    /// Receive the next event with a timeout.
    ///
    /// # Errors
    /// `Timeout` if nothing arrives in time, `Disconnected` if the feed is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> BrickResult<SceneEvent> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => BrickError::Execution(ExecutionError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            RecvTimeoutError::Disconnected => disconnected(),
        })
    }

    /// Receive a buffered event without blocking.
    ///
    /// # Errors
    /// `Disconnected` if the feed is gone and the buffer is drained.
    pub fn try_recv(&self) -> BrickResult<Option<SceneEvent>> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(disconnected()),
        }
    }

    /// Drains every buffered event.
    pub fn drain(&self) -> Vec<SceneEvent> {
        self.rx.try_iter().collect()
    }
}

impl Drop for SceneEventStream {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
