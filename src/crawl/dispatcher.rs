// src/crawl/dispatcher.rs
// =============================================================================
// Runs one "round" of the crawl.
//
// Per round:
// 1. batch = min(max_concurrent, frontier size); nothing to do if zero
// 2. Pull that many URLs off the frontier
// 3. Submit one task per URL to the worker pool
// 4. Wait until every task in the round is done, the round timeout expires,
//    or the crawl is cancelled
//
// Each task claims its URL, fetches the page, and offers the links worth
// following back to the frontier. A failed fetch is logged and recorded;
// it never escapes the task.
//
// When the wait times out (or is cancelled) the remaining tasks are detached,
// not aborted. They keep running and may still add to the shared state, so
// rounds can overlap and more than max_concurrent fetches may be in flight.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::domain::same_domain;
use super::model::CrawlRequest;
use super::pool::WorkerPool;
use super::queue::{Frontier, VisitedSet};
use crate::fetch::{is_valid_url, PageFetcher};

/// Shared state for a single crawl, handed to every task through an Arc.
pub struct CrawlContext {
    pub request: Arc<CrawlRequest>,
    pub frontier: Frontier,
    pub visited: VisitedSet,
    pub failed: DashSet<String>,
    pub fetcher: Arc<dyn PageFetcher>,
}

impl CrawlContext {
    pub fn new(request: Arc<CrawlRequest>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            request,
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            failed: DashSet::new(),
            fetcher,
        }
    }

    // Decides whether a discovered link goes back on the frontier
    fn should_follow(&self, link: &str) -> bool {
        if link.is_empty() || !is_valid_url(link) {
            return false;
        }
        if self.request.same_domain_only && !same_domain(link, &self.request.base_url) {
            return false;
        }
        !self.visited.contains(link)
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Frontier was empty, nothing submitted
    Idle,
    /// Every submitted task finished
    Completed { submitted: usize },
    /// The timeout expired first; `pending` tasks were left running
    TimedOut { submitted: usize, pending: usize },
    /// Cancelled while waiting; `pending` tasks were left running
    Interrupted { submitted: usize, pending: usize },
    /// The pool rejected every task; the URLs went back on the frontier
    Saturated { rejected: usize },
}

// Internal: what the barrier wait observed
enum Barrier {
    Done,
    TimedOut,
    Cancelled,
}

pub struct BatchDispatcher {
    ctx: Arc<CrawlContext>,
    pool: WorkerPool,
    round_timeout: Duration,
}

impl BatchDispatcher {
    pub fn new(ctx: Arc<CrawlContext>, pool: WorkerPool, round_timeout: Duration) -> Self {
        Self {
            ctx,
            pool,
            round_timeout,
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub async fn run_round(&self, cancel: &CancellationToken) -> RoundOutcome {
        let batch_size = self
            .ctx
            .request
            .max_concurrent
            .min(self.ctx.frontier.len());
        if batch_size == 0 {
            return RoundOutcome::Idle;
        }

        let mut tasks = JoinSet::new();
        let mut submitted = 0;
        let mut rejected = 0;

        for url in self.ctx.frontier.poll_up_to(batch_size) {
            let ctx = Arc::clone(&self.ctx);
            // Cloned up front because `url` moves into the task
            let retry = url.clone();

            match self.pool.submit(&mut tasks, process_url(ctx, url)) {
                Ok(()) => submitted += 1,
                Err(e) => {
                    // Not claimed yet, so putting it back loses nothing
                    warn!(url = %retry, error = %e, "task rejected, re-queueing");
                    self.ctx.frontier.offer(retry);
                    rejected += 1;
                }
            }
        }

        // Nothing to wait for; the caller has to wait for the pool to drain
        if submitted == 0 {
            return RoundOutcome::Saturated { rejected };
        }

        let barrier = {
            let join_all = async {
                while let Some(joined) = tasks.join_next().await {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            error!(error = %e, "page task panicked");
                        }
                    }
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => Barrier::Cancelled,
                waited = tokio::time::timeout(self.round_timeout, join_all) => match waited {
                    Ok(()) => Barrier::Done,
                    Err(_) => Barrier::TimedOut,
                },
            }
        };

        match barrier {
            Barrier::Done => RoundOutcome::Completed { submitted },
            Barrier::TimedOut => {
                let pending = tasks.len();
                warn!(
                    pending,
                    timeout_secs = self.round_timeout.as_secs(),
                    "round timed out, leaving tasks running"
                );
                tasks.detach_all();
                RoundOutcome::TimedOut { submitted, pending }
            }
            Barrier::Cancelled => {
                let pending = tasks.len();
                tasks.detach_all();
                RoundOutcome::Interrupted { submitted, pending }
            }
        }
    }
}

// The body of one page task
async fn process_url(ctx: Arc<CrawlContext>, url: String) {
    // Someone else already owns this URL
    if !ctx.visited.claim(&url) {
        return;
    }

    debug!(%url, "processing URL");

    let links = match ctx.fetcher.fetch_links(&url).await {
        Ok(links) => links,
        Err(e) => {
            error!(%url, error = %e, "error processing URL");
            ctx.failed.insert(url);
            return;
        }
    };

    let mut new_urls = 0;
    for link in links {
        if ctx.should_follow(&link) {
            ctx.frontier.offer(link);
            new_urls += 1;
        }
    }

    debug!(%url, new_urls, "found new URLs");
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does tokio::select! do?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first; the others are dropped
//    - Here: "cancelled" vs "all tasks done (or timed out)"
//
// 2. Why detach_all() instead of just dropping the JoinSet?
//    - Dropping a JoinSet ABORTS its tasks
//    - A fetch that is half done should still finish and record its links,
//      so we let go of the handles and let the tasks run on
//
// 3. Why is `barrier` computed inside its own block?
//    - join_all borrows `tasks` mutably
//    - The block ends that borrow, so we can call tasks.len()/detach_all()
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::crawl::test_support::GraphFetcher;

    fn dispatcher(
        request: CrawlRequest,
        fetcher: Arc<GraphFetcher>,
        round_timeout: Duration,
    ) -> BatchDispatcher {
        dispatcher_with_pool(request, fetcher, round_timeout, PoolConfig::default())
    }

    fn dispatcher_with_pool(
        request: CrawlRequest,
        fetcher: Arc<GraphFetcher>,
        round_timeout: Duration,
        pool: PoolConfig,
    ) -> BatchDispatcher {
        let ctx = Arc::new(CrawlContext::new(Arc::new(request), fetcher));
        BatchDispatcher::new(ctx, WorkerPool::new(&pool), round_timeout)
    }

    #[tokio::test]
    async fn test_empty_frontier_is_idle() {
        let fetcher = Arc::new(GraphFetcher::new());
        let d = dispatcher(
            CrawlRequest::new("https://a.test/", false, 3),
            fetcher,
            Duration::from_secs(5),
        );
        assert_eq!(
            d.run_round(&CancellationToken::new()).await,
            RoundOutcome::Idle
        );
    }

    #[tokio::test]
    async fn test_batch_never_exceeds_max_concurrent() {
        let fetcher = Arc::new(GraphFetcher::new());
        let d = dispatcher(
            CrawlRequest::new("https://a.test/", false, 2),
            fetcher.clone(),
            Duration::from_secs(5),
        );
        for i in 0..5 {
            d.ctx.frontier.offer(format!("https://a.test/{}", i));
        }

        let outcome = d.run_round(&CancellationToken::new()).await;
        assert_eq!(outcome, RoundOutcome::Completed { submitted: 2 });
        assert_eq!(d.ctx.frontier.len(), 3);
        assert_eq!(fetcher.total_calls(), 2);
    }

    #[tokio::test]
    async fn test_filters_discovered_links() {
        let fetcher = Arc::new(
            GraphFetcher::new().page(
                "https://a.test/",
                &[
                    "https://a.test/p2",
                    "https://b.test/",
                    "mailto:x@a.test",
                    "",
                    "https://a.test/",
                ],
            ),
        );
        let d = dispatcher(
            CrawlRequest::new("https://a.test/", true, 1),
            fetcher,
            Duration::from_secs(5),
        );
        d.ctx.frontier.offer("https://a.test/".to_string());

        d.run_round(&CancellationToken::new()).await;

        // Only p2 survives: b.test is off-domain, mailto is invalid,
        // the empty link is skipped and the seed is already visited
        assert_eq!(d.ctx.frontier.poll_up_to(10), vec!["https://a.test/p2"]);
    }

    #[tokio::test]
    async fn test_duplicate_urls_in_one_batch_fetch_once() {
        let fetcher = Arc::new(GraphFetcher::new());
        let d = dispatcher(
            CrawlRequest::new("https://a.test/", false, 4),
            fetcher.clone(),
            Duration::from_secs(5),
        );
        for _ in 0..4 {
            d.ctx.frontier.offer("https://a.test/dup".to_string());
        }

        d.run_round(&CancellationToken::new()).await;
        assert_eq!(fetcher.calls("https://a.test/dup"), 1);
        assert_eq!(d.ctx.visited.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_recorded_and_still_visited() {
        let fetcher = Arc::new(GraphFetcher::new().failing("https://a.test/broken"));
        let d = dispatcher(
            CrawlRequest::new("https://a.test/", false, 1),
            fetcher,
            Duration::from_secs(5),
        );
        d.ctx.frontier.offer("https://a.test/broken".to_string());

        let outcome = d.run_round(&CancellationToken::new()).await;
        assert_eq!(outcome, RoundOutcome::Completed { submitted: 1 });
        assert!(d.ctx.visited.contains("https://a.test/broken"));
        assert!(d.ctx.failed.contains("https://a.test/broken"));
        assert!(d.ctx.frontier.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_detaches_slow_tasks() {
        let fetcher = Arc::new(GraphFetcher::new().with_delay(Duration::from_millis(300)));
        let d = dispatcher(
            CrawlRequest::new("https://a.test/", false, 1),
            fetcher.clone(),
            Duration::from_millis(20),
        );
        d.ctx.frontier.offer("https://a.test/slow".to_string());

        let outcome = d.run_round(&CancellationToken::new()).await;
        assert_eq!(
            outcome,
            RoundOutcome::TimedOut {
                submitted: 1,
                pending: 1
            }
        );

        // The detached task still finishes on its own
        tokio::time::timeout(Duration::from_secs(2), async {
            while d.pool().in_flight() > 0 {
                d.pool().task_finished().await;
            }
        })
        .await
        .expect("detached task should finish");
        assert_eq!(fetcher.calls("https://a.test/slow"), 1);
    }

    #[tokio::test]
    async fn test_rejected_url_goes_back_on_frontier() {
        let fetcher = Arc::new(GraphFetcher::new());
        let d = dispatcher_with_pool(
            CrawlRequest::new("https://a.test/", false, 1),
            fetcher.clone(),
            Duration::from_secs(5),
            PoolConfig {
                core_workers: 1,
                max_workers: 1,
                queue_capacity: 0,
                thread_name_prefix: "test-".to_string(),
            },
        );

        // Occupy the only slot in the pool
        let mut held = JoinSet::new();
        let gate = Arc::new(tokio::sync::Notify::new());
        let waiter = Arc::clone(&gate);
        d.pool()
            .submit(&mut held, async move { waiter.notified().await })
            .unwrap();

        d.ctx.frontier.offer("https://a.test/".to_string());
        let outcome = d.run_round(&CancellationToken::new()).await;

        assert_eq!(outcome, RoundOutcome::Saturated { rejected: 1 });
        assert_eq!(d.ctx.frontier.poll_up_to(10), vec!["https://a.test/"]);
        assert!(!d.ctx.visited.contains("https://a.test/"));
        assert_eq!(fetcher.total_calls(), 0);

        gate.notify_one();
        while held.join_next().await.is_some() {}
    }
}
