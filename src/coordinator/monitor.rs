//! `ThreadMonitor`: the shared state workers and the coordinator both read
//! and write to coordinate restarts and the global incumbent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::stats::ThreadStats;

/// Tracks `{ stats[threadId], global_best_f, stagnation_threshold,
/// competitive_threshold }`. The seed selector itself lives on
/// [`crate::coordinator::Coordinator`] rather than here, since only the
/// coordinator calls it (monitor readers only need `should_restart`).
pub struct ThreadMonitor {
    stats: Mutex<Vec<(usize, Arc<ThreadStats>)>>,
    global_best_f_bits: AtomicU64,
    stagnation_threshold: u64,
    competitive_threshold: f64,
}

impl ThreadMonitor {
    pub fn new(stagnation_threshold: u64, competitive_threshold: f64) -> Self {
        ThreadMonitor {
            stats: Mutex::new(Vec::new()),
            global_best_f_bits: AtomicU64::new(f64::INFINITY.to_bits()),
            stagnation_threshold,
            competitive_threshold,
        }
    }

    /// Registers a worker's stats block, returning the `Arc` the worker
    /// itself should keep to call `record_iteration` etc. on.
    pub fn register(&self, thread_id: usize) -> Arc<ThreadStats> {
        let stats = Arc::new(ThreadStats::new());
        self.stats.lock().push((thread_id, stats.clone()));
        stats
    }

    pub fn deregister(&self, thread_id: usize) {
        self.stats.lock().retain(|(id, _)| *id != thread_id);
    }

    pub fn stats(&self, thread_id: usize) -> Option<Arc<ThreadStats>> {
        self.stats.lock().iter().find(|(id, _)| *id == thread_id).map(|(_, s)| s.clone())
    }

    pub fn global_best_f(&self) -> f64 {
        f64::from_bits(self.global_best_f_bits.load(Ordering::Acquire))
    }

    /// Monotonically non-increasing; a worse or equal `f` is
    /// silently ignored rather than erroring, since concurrent workers race
    /// to report and only the best result matters.
    pub fn update_global_best(&self, f: f64) {
        let mut current = self.global_best_f_bits.load(Ordering::Acquire);
        loop {
            let current_f = f64::from_bits(current);
            if f >= current_f {
                return;
            }
            match self.global_best_f_bits.compare_exchange_weak(current, f.to_bits(), Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// True once a worker has gone `stagnationThreshold` iterations without
    /// an elite insertion while sitting more than `competitiveThreshold`
    /// relative gap behind the global best.
    pub fn should_restart(&self, thread_id: usize) -> bool {
        let stats = match self.stats(thread_id) {
            Some(s) => s,
            None => return false,
        };
        if stats.iterations_since_insertion() < self.stagnation_threshold {
            return false;
        }
        let global_best = self.global_best_f();
        if !global_best.is_finite() || global_best == 0.0 {
            return false;
        }
        let gap = (stats.current_best_f() - global_best) / global_best;
        gap > self.competitive_threshold
    }

    /// Current best reported by any registered worker, used for the
    /// worker-to-main injection check.
    pub fn best_reporting_worker(&self) -> Option<(usize, f64)> {
        self.stats
            .lock()
            .iter()
            .map(|(id, s)| (*id, s.current_best_f()))
            .filter(|(_, f)| f.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
