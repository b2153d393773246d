// src/crawl/queue.rs
// =============================================================================
// The two pieces of shared state every worker touches:
//
// - Frontier: URLs waiting to be fetched. A lock-free FIFO queue.
//   It may hold the same URL twice (two pages can link to the same
//   unclaimed URL); that's fine, the VisitedSet sorts it out.
// - VisitedSet: URLs that have been claimed. `claim` is an atomic
//   insert-if-absent, so exactly one worker wins each URL.
//
// Both are owned by one CrawlEngine run and handed to workers through an
// Arc. Neither needs an outside lock: every operation is atomic on its own.
// =============================================================================

use std::collections::BTreeSet;

use crossbeam::queue::SegQueue;
use dashmap::DashSet;

/// Unbounded FIFO of URLs awaiting a fetch attempt.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: SegQueue<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Appends a URL; never blocks, never rejects
    pub fn offer(&self, url: String) {
        self.queue.push(url);
    }

    // Removes and returns up to `n` URLs that are in the queue right now
    //
    // Returns fewer than `n` (possibly none) if the queue runs dry.
    pub fn poll_up_to(&self, n: usize) -> Vec<String> {
        let mut batch = Vec::with_capacity(n.min(self.queue.len()));
        while batch.len() < n {
            match self.queue.pop() {
                Some(url) => batch.push(url),
                None => break,
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Set of URLs that have been claimed for processing. Only ever grows.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true for the first caller with this URL, false for everyone after.
    pub fn claim(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    // Copies the current contents out in sorted order
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.urls.iter().map(|entry| entry.key().clone()).collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is SegQueue?
//    - A lock-free, unbounded queue from the crossbeam crate
//    - Many threads can push and pop at the same time without a Mutex
//    - push() appends to the back, pop() takes from the front (FIFO)
//
// 2. What is DashSet?
//    - A concurrent HashSet from the dashmap crate
//    - Internally split into shards, each with its own lock
//    - insert() returns true if the value was NOT already present,
//      which is exactly the "claim" we need, done atomically
//
// 3. Why &self instead of &mut self?
//    - Both types use interior mutability (they manage their own locking)
//    - So we can share them with Arc<Frontier> across tasks and still mutate
//
// 4. Why does snapshot() return a BTreeSet?
//    - BTreeSet keeps its items sorted
//    - The final report lists URLs in lexicographic order
// -----------------------------------------------------------------------------
