// src/crawl/pool.rs
// =============================================================================
// A fixed-size worker pool for page tasks.
//
// The pool is sized by PoolConfig, independently of the request's
// max_concurrent:
// - at most `max_workers` tasks execute at once (a Semaphore hands out permits)
// - at most `queue_capacity` more may wait for a permit
// - anything beyond that is rejected, and the caller decides what to do
//
// The pool also keeps two counters:
// - in_flight: submitted and not yet finished (waiting OR running)
// - active: currently holding a permit (running)
// Both are decremented by drop guards, so a task that panics or gets
// aborted still gives its slot back.
// =============================================================================

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinSet;

use crate::config::PoolConfig;
use crate::error::PoolError;

#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    finished: Arc<Notify>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(config.max_workers.max(1))),
            in_flight: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(Notify::new()),
            capacity: config.capacity().max(1),
        }
    }

    // Spawns `task` into `tasks`, or rejects it if the pool is full
    //
    // The in-flight counter is bumped here, before the task is spawned,
    // so an observer never sees zero while a submitted task is pending.
    pub fn submit<F>(&self, tasks: &mut JoinSet<()>, task: F) -> Result<(), PoolError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let outstanding = self.in_flight.fetch_add(1, Ordering::SeqCst);
        if outstanding >= self.capacity {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Err(PoolError::Rejected {
                outstanding,
                capacity: self.capacity,
            });
        }

        let in_flight = CountGuard {
            counter: Arc::clone(&self.in_flight),
            notify: Some(Arc::clone(&self.finished)),
        };
        let permits = Arc::clone(&self.permits);
        let active = Arc::clone(&self.active);

        tasks.spawn(async move {
            let _in_flight = in_flight;

            // The semaphore is never closed, so this only fails if it is
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };

            active.fetch_add(1, Ordering::SeqCst);
            let _active = CountGuard {
                counter: active,
                notify: None,
            };

            task.await;
        });

        Ok(())
    }

    /// Tasks submitted and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Tasks currently executing.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    // Resolves the next time any task finishes
    //
    // Notify stores one wake-up if nobody is waiting, so a task that finished
    // just before this call still wakes us (at worst one spurious wake).
    pub async fn task_finished(&self) {
        self.finished.notified().await;
    }
}

// Decrements a counter when dropped
#[derive(Debug)]
struct CountGuard {
    counter: Arc<AtomicUsize>,
    notify: Option<Arc<Notify>>,
}

impl Drop for CountGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
        if let Some(notify) = &self.notify {
            notify.notify_one();
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a Semaphore?
//    - A counter of "permits"
//    - acquire() takes one (waiting if none are left), dropping the permit
//      gives it back
//    - Perfect for "no more than N at once"
//
// 2. What is JoinSet?
//    - A collection of spawned tasks you can await one by one
//    - join_next() returns each task's result as it completes
//    - The caller (the dispatcher) owns one JoinSet per round
//
// 3. Why the Drop guard?
//    - If we decremented the counter at the end of the async block, a panic
//      or abort would skip it and the crawl would never look idle
//    - Drop runs no matter how the task ends
//
// 4. What is `let Ok(x) = ... else { ... }`?
//    - "let-else": bind on success, otherwise run the else block, which
//      must leave the function (here: return)
// -----------------------------------------------------------------------------
