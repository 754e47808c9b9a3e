// vgfx/renderer/src/worker.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The worker pool (§5): a fixed set of threads that pull indices off a shared cursor,
//! never steal each other's work, and suspend only at `run`'s completion barrier.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-worker scratch reused across `run` calls, reset to a per-frame watermark rather than
/// freed, so the classifier's temporary vectors don't reallocate every path.
#[derive(Default)]
pub struct ScratchAllocator {
    pub(crate) curve_order: Vec<usize>,
    pub(crate) x_breaks: Vec<f32>,
}

impl ScratchAllocator {
    pub fn new() -> ScratchAllocator {
        ScratchAllocator::default()
    }

    /// Truncates back to the per-frame watermark without releasing the backing storage.
    pub fn reset(&mut self) {
        self.curve_order.clear();
        self.x_breaks.clear();
    }
}

/// A fixed-size pool of threads, each with its own `ScratchAllocator`, that services one
/// `run` at a time (§5: "no preemption between runs, only run's completion barrier
/// suspends").
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    worker_count: usize,
}

impl WorkerPool {
    pub fn new(worker_count: usize) -> WorkerPool {
        let worker_count = worker_count.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .build()
            .expect("failed to start worker pool");
        WorkerPool { pool, worker_count }
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs `body` once per index in `0..item_count`. Workers pull the next index from a
    /// shared atomic cursor rather than splitting the range up front, so a worker that
    /// finishes an expensive item immediately picks up the next cheap one instead of idling
    /// (§5: no work-stealing, just a shared cursor). Blocks until every index is done.
    pub fn run<F>(&self, item_count: usize, body: F)
    where
        F: Fn(usize, &mut ScratchAllocator) + Sync,
    {
        if item_count == 0 {
            return;
        }
        let cursor = AtomicUsize::new(0);
        let body = &body;
        let cursor = &cursor;
        self.pool.scope(|scope| {
            for _ in 0..self.worker_count {
                scope.spawn(move |_| {
                    let mut scratch = ScratchAllocator::new();
                    loop {
                        let index = cursor.fetch_add(1, Ordering::Relaxed);
                        if index >= item_count {
                            break;
                        }
                        scratch.reset();
                        body(index, &mut scratch);
                    }
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI64;

    #[test]
    fn run_visits_every_index_exactly_once() {
        let pool = WorkerPool::new(4);
        let seen = (0..37).map(|_| AtomicI64::new(0)).collect::<Vec<_>>();
        pool.run(37, |index, _scratch| {
            seen[index].fetch_add(1, Ordering::Relaxed);
        });
        assert!(seen.iter().all(|count| count.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn zero_items_is_a_no_op() {
        let pool = WorkerPool::new(2);
        let calls = AtomicUsize::new(0);
        pool.run(0, |_, _| {
            calls.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}
