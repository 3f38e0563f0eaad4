//! The elite set: a bounded, thread-safe pool of quality- and diversity-
//! scored solutions.
//!
//! One mutex guards the whole pool: a single `parking_lot::Mutex` around
//! small, frequently-touched shared state rather than finer-grained locking.

pub mod diversity;

use std::time::Instant;

use parking_lot::Mutex;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::solution::Solution;
use diversity::{diversity, edge_set, EdgeSet};

/// Where an elite entry's solution originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Ails,
    PathRelinking,
}

struct EliteEntry {
    solution: Solution,
    edges: EdgeSet,
    source: Source,
    usage_count: u64,
    insertion_timestamp: Instant,
}

impl EliteEntry {
    fn new(solution: Solution, source: Source) -> Self {
        let edges = edge_set(&solution);
        EliteEntry { solution, edges, source, usage_count: 0, insertion_timestamp: Instant::now() }
    }
}

/// A read-only summary of one pool entry, handed to a [`crate::seed::SeedSelector`].
#[derive(Debug, Clone, Copy)]
pub struct EliteEntrySummary {
    pub index: usize,
    pub source: Source,
    pub usage_count: u64,
    /// Combined quality+diversity score computed over the pool alone (no
    /// candidate involved), used by the default selector's tie-break.
    pub score: f64,
}

pub struct EliteSet {
    capacity: usize,
    beta: f64,
    min_diversity: f64,
    entries: Mutex<Vec<EliteEntry>>,
}

impl EliteSet {
    pub fn new(capacity: usize, beta: f64, min_diversity: f64) -> Self {
        EliteSet { capacity, beta, min_diversity, entries: Mutex::new(Vec::with_capacity(capacity)) }
    }

    /// Attempts to insert `solution` under the pool's acceptance policy.
    /// Returns whether it was accepted (either appended or swapped in for
    /// a displaced entry).
    pub fn try_insert(&self, solution: Solution, source: Source) -> bool {
        if !solution.is_feasible() {
            return false;
        }
        let edges = edge_set(&solution);
        let mut entries = self.entries.lock();

        if entries.is_empty() {
            entries.push(EliteEntry::new(solution, source));
            return true;
        }

        // Step 2: a too-similar existing entry beats an improving candidate,
        // or blocks a non-improving one.
        let mut rival: Option<usize> = None;
        let mut rival_diversity = f64::INFINITY;
        for (i, e) in entries.iter().enumerate() {
            let d = diversity(&edges, &e.edges);
            if d < self.min_diversity && d < rival_diversity {
                rival_diversity = d;
                rival = Some(i);
            }
        }
        if let Some(i) = rival {
            return if solution.objective() < entries[i].solution.objective() {
                entries[i] = EliteEntry::new(solution, source);
                true
            } else {
                false
            };
        }

        // Step 3: pool still has room.
        if entries.len() < self.capacity {
            entries.push(EliteEntry::new(solution, source));
            return true;
        }

        // Step 4: evict whichever of {pool ∪ candidate} scores lowest.
        let f_best = entries
            .iter()
            .map(|e| e.solution.objective())
            .fold(solution.objective(), f64::min);
        let f_worst = entries
            .iter()
            .map(|e| e.solution.objective())
            .fold(solution.objective(), f64::max);
        let score_of = |f: f64, min_div: f64| -> f64 {
            let q = if (f_worst - f_best).abs() < f64::EPSILON { 1.0 } else { (f_worst - f) / (f_worst - f_best) };
            (1.0 - self.beta) * q + self.beta * min_div
        };

        let cand_min_div = entries.iter().map(|e| diversity(&edges, &e.edges)).fold(f64::INFINITY, f64::min);
        let cand_score = score_of(solution.objective(), cand_min_div);

        let mut worst_idx: Option<usize> = None;
        let mut worst_score = cand_score;
        for i in 0..entries.len() {
            let mut min_div = entries
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, e)| diversity(&entries[i].edges, &e.edges))
                .fold(f64::INFINITY, f64::min);
            min_div = min_div.min(diversity(&entries[i].edges, &edges));
            let s = score_of(entries[i].solution.objective(), min_div);
            if s < worst_score {
                worst_score = s;
                worst_idx = Some(i);
            }
        }

        match worst_idx {
            Some(i) => {
                entries[i] = EliteEntry::new(solution, source);
                true
            }
            None => false,
        }
    }

    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// A consistent clone of every solution currently in the pool.
    pub fn snapshot(&self) -> Vec<Solution> {
        self.entries.lock().iter().map(|e| e.solution.clone()).collect()
    }

    /// Two distinct entries with matching route count, fairly sampled among
    /// route-count groups that have at least a pair, or `None` if no such
    /// group exists.
    pub fn sample_for_relinking<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(Solution, Solution)> {
        let entries = self.entries.lock();
        let mut groups: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for (i, e) in entries.iter().enumerate() {
            groups.entry(e.solution.num_routes()).or_default().push(i);
        }
        let mut eligible: Vec<&Vec<usize>> = groups.values().filter(|g| g.len() >= 2).collect();
        if eligible.is_empty() {
            return None;
        }
        eligible.sort_by_key(|g| g[0]);
        let group = eligible[rng.gen_range(0..eligible.len())];

        let i = rng.gen_range(0..group.len());
        let mut j = rng.gen_range(0..group.len() - 1);
        if j >= i {
            j += 1;
        }
        Some((entries[group[i]].solution.clone(), entries[group[j]].solution.clone()))
    }

    /// Hands the pool snapshot to `strategy`, bumps the chosen entry's usage
    /// count, and returns a clone of its solution. The bump happens while
    /// still holding the lock so two concurrent callers can never be handed
    /// the same entry without one seeing the other's bump.
    pub fn select_for_restart(&self, strategy: &dyn crate::seed::SeedSelector) -> Option<Solution> {
        let mut entries = self.entries.lock();
        if entries.is_empty() {
            return None;
        }
        let summaries = self.summarize(&entries);
        let chosen = strategy.select(&summaries)?;
        entries[chosen].usage_count += 1;
        Some(entries[chosen].solution.clone())
    }

    fn summarize(&self, entries: &[EliteEntry]) -> Vec<EliteEntrySummary> {
        let f_best = entries.iter().map(|e| e.solution.objective()).fold(f64::INFINITY, f64::min);
        let f_worst = entries.iter().map(|e| e.solution.objective()).fold(f64::NEG_INFINITY, f64::max);
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let min_div = entries
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, other)| diversity(&e.edges, &other.edges))
                    .fold(f64::INFINITY, f64::min);
                let min_div = if min_div.is_finite() { min_div } else { 1.0 };
                let q = if (f_worst - f_best).abs() < f64::EPSILON { 1.0 } else { (f_worst - e.solution.objective()) / (f_worst - f_best) };
                let score = (1.0 - self.beta) * q + self.beta * min_div;
                EliteEntrySummary { index: i, source: e.source, usage_count: e.usage_count, score }
            })
            .collect()
    }

    /// True iff every pairwise diversity in the pool is at or above the
    /// configured floor. Exposed for tests.
    pub fn satisfies_diversity_floor(&self) -> bool {
        let entries = self.entries.lock();
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                if diversity(&entries[i].edges, &entries[j].edges) < self.min_diversity {
                    return false;
                }
            }
        }
        true
    }
}
