// src/crawl/engine.rs
// =============================================================================
// This module drives a whole crawl.
//
// How it works:
// 1. Validate the request (nothing is created if it's bad)
// 2. Seed the frontier with the base URL and start the clock
// 3. Loop: run one dispatcher round, then ask the termination detector
//    whether we're done
// 4. Copy the visited set into a CrawlResult
//
// The loop runs until the detector reports quiescence. Cancellation (Ctrl-C)
// ends it early; the result then holds whatever was visited so far.
// That's a normal return, not an error.
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::dispatcher::{BatchDispatcher, CrawlContext, RoundOutcome};
use super::model::{CrawlRequest, CrawlResult};
use super::pool::WorkerPool;
use super::termination::{TerminationDetector, Verdict};
use crate::config::CrawlerConfig;
use crate::error::ValidationError;
use crate::fetch::PageFetcher;

pub struct CrawlEngine {
    config: CrawlerConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl CrawlEngine {
    pub fn new(config: CrawlerConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { config, fetcher }
    }

    // Crawls from request.base_url until quiescent or cancelled
    //
    // Returns: Err only for an invalid request. Fetch failures and
    // cancellation still produce Ok(CrawlResult).
    pub async fn crawl(
        &self,
        request: CrawlRequest,
        cancel: CancellationToken,
    ) -> Result<CrawlResult, ValidationError> {
        request.validate()?;
        debug!(?request, "starting crawl");

        let request = Arc::new(request);
        let ctx = Arc::new(CrawlContext::new(
            Arc::clone(&request),
            Arc::clone(&self.fetcher),
        ));
        ctx.frontier.offer(request.base_url.clone());

        let dispatcher = BatchDispatcher::new(
            Arc::clone(&ctx),
            WorkerPool::new(&self.config.pool),
            self.config.round_timeout,
        );
        let detector = TerminationDetector::new(self.config.grace_delay);

        let start = Instant::now();
        let mut rounds = 0;

        let interrupted = loop {
            if cancel.is_cancelled() {
                break true;
            }

            rounds += 1;
            match dispatcher.run_round(&cancel).await {
                RoundOutcome::Interrupted { submitted, pending } => {
                    debug!(submitted, pending, "round interrupted");
                    break true;
                }
                RoundOutcome::Completed { submitted } => {
                    debug!(submitted, "round completed");
                }
                RoundOutcome::TimedOut { submitted, pending } => {
                    debug!(submitted, pending, "round timed out");
                }
                // Every URL bounced off a full pool: wait for a slot to free up
                RoundOutcome::Saturated { rejected } => {
                    debug!(rejected, "pool saturated, waiting for a task to finish");
                    self.wait_for_progress(dispatcher.pool(), &cancel).await;
                }
                // Nothing to dispatch but tasks from an earlier round are still
                // running: wait for one of them instead of spinning
                RoundOutcome::Idle if dispatcher.pool().in_flight() > 0 => {
                    self.wait_for_progress(dispatcher.pool(), &cancel).await;
                }
                RoundOutcome::Idle => {}
            }

            debug!(
                frontier = ctx.frontier.len(),
                in_flight = dispatcher.pool().in_flight(),
                active = dispatcher.pool().active_count(),
                visited = ctx.visited.len(),
                "round finished"
            );

            match detector.evaluate(&ctx.frontier, dispatcher.pool(), &cancel).await {
                Verdict::Continue => {}
                Verdict::Quiescent => break false,
                Verdict::Interrupted => break true,
            }
        };

        let duration = start.elapsed();
        if interrupted {
            info!(visited = ctx.visited.len(), "crawl interrupted, returning partial result");
        }

        let failed = ctx.failed.iter().map(|url| url.key().clone()).collect();
        let result = CrawlResult::new(ctx.visited.snapshot(), failed, duration, interrupted);
        Ok(result.with_rounds(rounds))
    }

    // Blocks until a pool task finishes, the crawl is cancelled, or a round
    // timeout passes, whichever comes first
    async fn wait_for_progress(&self, pool: &WorkerPool, cancel: &CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = pool.task_finished() => {}
            _ = tokio::time::sleep(self.config.round_timeout) => {}
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn PageFetcher>?
//    - The engine doesn't care HOW pages are fetched
//    - main() passes an HttpFetcher, the tests pass an in-memory graph
//    - Arc lets every worker task share the same fetcher
//
// 2. What is CancellationToken?
//    - A cheap, cloneable "stop" flag from tokio-util
//    - main() cancels it on Ctrl-C; the engine checks it between rounds
//      and while it is waiting
//
// 3. Why is validation an Err but cancellation isn't?
//    - A bad request means there's nothing to report
//    - A cancelled crawl still visited pages, and the operator wants to see them
// -----------------------------------------------------------------------------
