// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Rounds of at most `max_concurrent` page fetches, run on a worker pool
// - Every URL fetched at most once (atomic claim on a shared visited set)
// - Optional same-domain restriction (subdomains included)
// - Stops when nothing is queued or running, or when cancelled
//
// Submodules, leaf first:
// - queue: Frontier (pending URLs) and VisitedSet (claimed URLs)
// - domain: same-domain check
// - model: CrawlRequest / CrawlResult
// - pool: fixed-size worker pool
// - dispatcher: one round of fetches
// - termination: quiescence check between rounds
// - engine: the round loop
// =============================================================================

mod dispatcher;
mod domain;
mod engine;
mod model;
mod pool;
mod queue;
mod termination;

#[cfg(test)]
mod test_support;

pub use engine::CrawlEngine;
pub use model::{CrawlRequest, CrawlResult};
