//! Batch placement types.
//!
//! A batch is placed brick by brick in ascending `y`, one commit each. A
//! failed candidate is recorded and skipped. Cancellation is observed between
//! candidates; bricks committed before it stay in the scene.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::BrickError;
use crate::ir::PlacePayload;
use crate::scene::BrickInstance;

/// Shared cancellation flag for a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once `cancel` has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Progress report passed to the batch observer after every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Candidates attempted so far.
    pub processed: usize,
    /// Candidates in the batch.
    pub total: usize,
    /// Candidates committed so far.
    pub committed: usize,
    /// Candidates rejected so far.
    pub failed: usize,
}

/// A rejected batch candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position of the candidate in the submitted batch.
    pub index: usize,
    /// The candidate as submitted.
    pub payload: PlacePayload,
    /// Why it was rejected.
    pub error: BrickError,
}

/// Result of a batch placement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Committed bricks in commit order.
    pub committed: Vec<BrickInstance>,
    /// Rejected candidates in attempt order.
    pub failures: Vec<BatchFailure>,
    /// True if the batch stopped early on cancellation.
    pub cancelled: bool,
    /// Scene version after the last commit.
    pub version: u64,
}

impl BatchOutcome {
    /// Candidates neither committed nor rejected because the batch was cancelled.
    #[must_use]
    pub fn skipped(&self, total: usize) -> usize {
        total.saturating_sub(self.committed.len() + self.failures.len())
    }
}
