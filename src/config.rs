// src/config.rs
// =============================================================================
// Tunables for the crawler that are NOT part of the per-run request.
//
// The request (base URL, same-domain flag, max concurrent) comes from the
// command line. Everything here is fixed for the process: how big the worker
// pool is, how long we wait for a round, how long a fetch may take, etc.
//
// Note that `max_concurrent` (per request) and the pool size (here) are
// deliberately separate: max_concurrent caps how many tasks ONE round submits,
// the pool caps how many tasks run at once across all rounds.
// =============================================================================

use std::time::Duration;

/// Sizing of the worker pool that executes page tasks.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of runtime worker threads
    pub core_workers: usize,
    /// Maximum number of tasks executing at the same time
    pub max_workers: usize,
    /// Maximum number of tasks waiting for a free worker
    pub queue_capacity: usize,
    /// Prefix for worker thread names ("crawler-1", "crawler-2", ...)
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            core_workers: 5,
            max_workers: 10,
            queue_capacity: 25,
            thread_name_prefix: "crawler-".to_string(),
        }
    }
}

impl PoolConfig {
    // Total number of tasks the pool accepts before rejecting new ones
    pub fn capacity(&self) -> usize {
        self.max_workers + self.queue_capacity
    }
}

/// Process-wide crawler settings.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub pool: PoolConfig,
    /// How long the control loop waits for one round before moving on
    pub round_timeout: Duration,
    /// Delay before the second quiescence probe
    pub grace_delay: Duration,
    /// Per-request HTTP timeout
    pub fetch_timeout: Duration,
    /// User-Agent header sent with every fetch
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            round_timeout: Duration::from_secs(30),
            grace_delay: Duration::from_millis(100),
            fetch_timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0 (compatible; FastCrawler/1.0)".to_string(),
        }
    }
}
