// src/crawl/termination.rs
// =============================================================================
// Decides, between rounds, whether the crawl is finished.
//
// The crawl is quiescent when no task is in flight AND the frontier is empty.
// The order of the two reads matters: tasks offer their links BEFORE they
// leave the in-flight count, and only the control loop submits new tasks.
// So once in_flight reads zero, everything those tasks will ever offer is
// already in the frontier, and the frontier read that follows sees it.
//
// A negative probe is still confirmed by a second probe after a short grace
// delay before the crawl is declared done.
// =============================================================================

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::pool::WorkerPool;
use super::queue::Frontier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// There is (or may soon be) more work
    Continue,
    /// Two probes agreed that nothing is queued or running
    Quiescent,
    /// Cancelled during the grace delay
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct TerminationDetector {
    grace_delay: Duration,
}

impl TerminationDetector {
    pub fn new(grace_delay: Duration) -> Self {
        Self { grace_delay }
    }

    // One snapshot: in-flight first, then the frontier
    pub fn has_pending_work(frontier: &Frontier, pool: &WorkerPool) -> bool {
        pool.in_flight() > 0 || !frontier.is_empty()
    }

    pub async fn evaluate(
        &self,
        frontier: &Frontier,
        pool: &WorkerPool,
        cancel: &CancellationToken,
    ) -> Verdict {
        if Self::has_pending_work(frontier, pool) {
            return Verdict::Continue;
        }

        tokio::select! {
            _ = cancel.cancelled() => return Verdict::Interrupted,
            _ = tokio::time::sleep(self.grace_delay) => {}
        }

        if Self::has_pending_work(frontier, pool) {
            debug!("work appeared during grace delay");
            Verdict::Continue
        } else {
            Verdict::Quiescent
        }
    }
}
