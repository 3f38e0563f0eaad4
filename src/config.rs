//! Configuration inputs and their validation.

use std::time::Duration;

use crate::error::{AilsError, Result};

/// Path-relinking specific tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRelinkingConfig {
    /// Whether the path-relinking worker runs at all.
    pub enabled: bool,
    /// Iterations of the main worker to wait before activating.
    pub start_delay: usize,
    /// Trigger interval (in iterations of the PR worker itself).
    pub frequency: usize,
    /// Minimum elite pool size before a pair can be sampled.
    pub min_elite_for_pr: usize,
}

impl Default for PathRelinkingConfig {
    fn default() -> Self {
        PathRelinkingConfig { enabled: true, start_delay: 100, frequency: 50, min_elite_for_pr: 2 }
    }
}

impl PathRelinkingConfig {
    fn validate(&self) -> Result<()> {
        if self.min_elite_for_pr < 2 {
            return Err(AilsError::Configuration(
                "pr.minEliteForPR must be at least 2 (path-relinking needs a pair)".into(),
            ));
        }
        Ok(())
    }
}

/// Top-level coordinator configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AilsConfig {
    /// If false, the caller should run a single-threaded AILS and skip the
    /// coordinator entirely.
    pub enabled: bool,
    /// Count of restartable workers (ids `2..=numWorkerThreads+1`).
    pub num_worker_threads: usize,
    /// Elite pool size required before restartable workers are launched.
    pub min_elite_size_for_workers: usize,
    /// Iterations-without-insertion trigger for a restart.
    pub stagnation_threshold: u64,
    /// Relative gap from the global best that still allows a restart.
    pub competitive_threshold: f64,
    /// Whether worker -> main incumbent injection is enabled.
    pub notify_main_thread: bool,
    /// Bound on the elite pool size.
    pub elite_capacity: usize,
    /// Quality/diversity weight `beta` in the combined score.
    pub elite_beta: f64,
    /// Pairwise diversity floor.
    pub min_diversity: f64,
    /// Global wall-clock time budget.
    pub time_limit: Duration,
    /// Capacity-violation penalty weight used by `Solution::evaluate`.
    pub capacity_penalty_weight: f64,
    /// Base RNG seed; each thread seeds with `base_seed XOR thread_id`.
    pub base_seed: u64,
    /// Monitoring tick interval.
    pub monitor_tick: Duration,
    /// Bound on how long the coordinator waits for a worker to join.
    pub join_timeout: Duration,
    pub path_relinking: PathRelinkingConfig,
}

impl Default for AilsConfig {
    fn default() -> Self {
        AilsConfig {
            enabled: false,
            num_worker_threads: 2,
            min_elite_size_for_workers: 3,
            stagnation_threshold: 2000,
            competitive_threshold: 0.02,
            notify_main_thread: true,
            elite_capacity: 20,
            elite_beta: 0.3,
            min_diversity: 0.1,
            time_limit: Duration::from_secs(60),
            capacity_penalty_weight: 100.0,
            base_seed: 0,
            monitor_tick: Duration::from_millis(1000),
            join_timeout: Duration::from_secs(2),
            path_relinking: PathRelinkingConfig::default(),
        }
    }
}

impl AilsConfig {
    /// A config with `numWorkerThreads` sized to the host's hardware
    /// parallelism (one thread reserved for the coordinator, one for the
    /// main worker), defaulting to `num_cpus::get()` threads.
    pub fn with_hardware_parallelism(mut self) -> Self {
        self.num_worker_threads = num_cpus::get().saturating_sub(2).max(1);
        self
    }

    /// Validates all fields, surfacing the first violation as
    /// `AilsError::Configuration`.
    pub fn validate(&self) -> Result<()> {
        if self.min_elite_size_for_workers < 1 {
            return Err(AilsError::Configuration("minEliteSizeForWorkers must be >= 1".into()));
        }
        if self.stagnation_threshold < 1 {
            return Err(AilsError::Configuration("stagnationThreshold must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.competitive_threshold) {
            return Err(AilsError::Configuration("competitiveThreshold must be in [0,1]".into()));
        }
        if self.elite_capacity < 1 {
            return Err(AilsError::Configuration("eliteCapacity must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.elite_beta) {
            return Err(AilsError::Configuration("eliteBeta must be in [0,1]".into()));
        }
        if !(0.0..=1.0).contains(&self.min_diversity) {
            return Err(AilsError::Configuration("minDiversity must be in [0,1]".into()));
        }
        self.path_relinking.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AilsConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_competitive_threshold() {
        let mut config = AilsConfig::default();
        config.competitive_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_pr_min_elite_below_two() {
        let mut config = AilsConfig::default();
        config.path_relinking.min_elite_for_pr = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn hardware_parallelism_is_at_least_one() {
        let config = AilsConfig::default().with_hardware_parallelism();
        assert!(config.num_worker_threads >= 1);
    }
}
