//! The thread coordinator: launches, monitors, restarts, and stops workers
//! under a shared deadline.

pub mod monitor;

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::clock::GlobalClock;
use crate::config::AilsConfig;
use crate::elite::{EliteSet, Source};
use crate::error::{AilsError, Result};
use crate::instance::CvrpInstance;
use crate::local_search::LocalSearch;
use crate::relink::relink;
use crate::seed::SeedSelector;
use crate::solution::Solution;
use crate::stats::{ResultSink, RunResult, ThreadStatsSnapshot};
use crate::worker::{WorkerControl, WorkerHandle};
use monitor::ThreadMonitor;

/// Dedicated id for the path-relinking worker; never handed out to a
/// restartable worker (those start at `2`).
const PATH_RELINKING_THREAD_ID: usize = 0;
/// The protected main worker's id, never restarted.
const MAIN_THREAD_ID: usize = 1;

/// The per-worker constructor contract: `(threadId, initialSeed | none,
/// control, monitor) -> JoinHandle`. Instance/config/elite are expected to
/// already be captured by the closure;
/// the coordinator supplies only the per-launch arguments. The coordinator
/// always calls `monitor.register(threadId)` itself before invoking this
/// factory, so the factory should look its stats block up via
/// `monitor.stats(threadId)` rather than registering again.
pub type WorkerFactory = dyn Fn(usize, Option<Solution>, Arc<WorkerControl>, Arc<ThreadMonitor>) -> JoinHandle<()> + Send + Sync;

/// Orchestrates the full run lifecycle: launches workers, monitors them for
/// stagnation and injected incumbents, and stops everything at the deadline.
pub struct Coordinator {
    instance: Arc<dyn CvrpInstance>,
    config: AilsConfig,
    elite: Arc<EliteSet>,
    seed_selector: Arc<dyn SeedSelector>,
    local_search: Arc<dyn LocalSearch>,
    sink: Arc<dyn ResultSink>,
    spawn_worker: Arc<WorkerFactory>,
}

impl Coordinator {
    pub fn new(
        instance: Arc<dyn CvrpInstance>,
        config: AilsConfig,
        elite: Arc<EliteSet>,
        seed_selector: Arc<dyn SeedSelector>,
        local_search: Arc<dyn LocalSearch>,
        sink: Arc<dyn ResultSink>,
        spawn_worker: Arc<WorkerFactory>,
    ) -> Self {
        Coordinator { instance, config, elite, seed_selector, local_search, sink, spawn_worker }
    }

    /// Runs the coordinator to completion: startup, monitoring, shutdown.
    /// All workers are terminated and joined (best-effort, bounded by
    /// `join_timeout`) before this returns.
    pub fn run(&self) -> Result<RunResult> {
        self.config.validate()?;

        let clock = GlobalClock::start(self.config.time_limit);
        let monitor = Arc::new(ThreadMonitor::new(self.config.stagnation_threshold, self.config.competitive_threshold));

        log::info!("[coordinator] event:start deadline_ms:{}", self.config.time_limit.as_millis());

        // Startup step 2: launch the main worker with no seed.
        let main_control = Arc::new(WorkerControl::new(MAIN_THREAD_ID));
        monitor.register(MAIN_THREAD_ID);
        let main_join = (self.spawn_worker)(MAIN_THREAD_ID, None, main_control.clone(), monitor.clone());
        let mut main_handle = WorkerHandle::new(main_control, main_join);

        // Startup step 3: optional path-relinking worker.
        let pr_handle = if self.config.path_relinking.enabled {
            Some(self.spawn_path_relinking_worker(&clock, &monitor))
        } else {
            None
        };

        // Startup step 4: wait for the elite set to reach the floor. If the
        // deadline arrives first the floor was never reached, and restartable
        // workers never launch at all (a pool capacity below the configured
        // floor makes this permanent, not just slow).
        while self.elite.size() < self.config.min_elite_size_for_workers && !clock.is_past_deadline() {
            std::thread::sleep(Duration::from_millis(100));
        }

        // Startup step 5: launch restartable workers from elite seeds.
        let mut worker_handles: Vec<WorkerHandle> = Vec::with_capacity(self.config.num_worker_threads);
        if self.elite.size() >= self.config.min_elite_size_for_workers {
            log::info!("[coordinator] event:elite_floor_reached size:{}", self.elite.size());
            for thread_id in 2..(self.config.num_worker_threads + 2) {
                match self.elite.select_for_restart(self.seed_selector.as_ref()) {
                    Some(seed) => worker_handles.push(self.spawn_restartable_worker(thread_id, Some(seed), &monitor)),
                    None => log::info!("[coordinator] event:no_seed_available thread_id:{}", thread_id),
                }
            }
        } else {
            log::info!(
                "[coordinator] event:elite_floor_unreached size:{} required:{}",
                self.elite.size(),
                self.config.min_elite_size_for_workers
            );
        }

        self.monitor_loop(&clock, &monitor, &mut worker_handles, &main_handle);

        // Shutdown: signal everyone, join with the bounded timeout. The main
        // worker is joined first so a panic there is known before we report
        // a result, but the other workers still get their own bounded join
        // regardless of what happened to main.
        main_handle.control.mark_deadline_reached();
        let main_panic = join_with_timeout(&mut main_handle, self.config.join_timeout);
        for handle in worker_handles.iter_mut() {
            handle.control.mark_deadline_reached();
            join_with_timeout(handle, self.config.join_timeout);
        }
        let mut pr_handle = pr_handle;
        if let Some(handle) = pr_handle.as_mut() {
            handle.control.mark_deadline_reached();
            join_with_timeout(handle, self.config.join_timeout);
        }

        if let Some(message) = main_panic {
            log::error!("[coordinator] event:shutdown_after_main_panic message:{}", message);
            return Err(AilsError::WorkerPanicked { thread_id: MAIN_THREAD_ID, message });
        }

        let mut thread_stats: Vec<(usize, ThreadStatsSnapshot)> = Vec::new();
        if let Some(s) = monitor.stats(MAIN_THREAD_ID) {
            thread_stats.push((MAIN_THREAD_ID, s.snapshot()));
        }
        for handle in &worker_handles {
            if let Some(s) = monitor.stats(handle.thread_id()) {
                thread_stats.push((handle.thread_id(), s.snapshot()));
            }
        }

        let (best_solution, best_f) = self.best_known(&main_handle, &worker_handles)?;

        if let Some((thread_id, f)) = monitor.best_reporting_worker() {
            log::info!("[coordinator] event:best_reporting_worker thread_id:{} f:{}", thread_id, f);
        }

        let result = RunResult { best_solution, best_f, elapsed: clock.elapsed(), thread_stats };
        self.sink.report(&result);
        log::info!("[coordinator] event:done best_f:{} elapsed_ms:{}", result.best_f, result.elapsed.as_millis());
        Ok(result)
    }

    fn monitor_loop(&self, clock: &GlobalClock, monitor: &Arc<ThreadMonitor>, worker_handles: &mut Vec<WorkerHandle>, main_handle: &WorkerHandle) {
        while !clock.is_past_deadline() && !main_handle.has_finished() {
            std::thread::sleep(self.config.monitor_tick);

            for i in 0..worker_handles.len() {
                let thread_id = worker_handles[i].thread_id();

                // A restartable worker that already exited on its own, without
                // ever being told to, has panicked: recover the same way a
                // stagnation-triggered restart does.
                if worker_handles[i].has_finished() {
                    join_with_timeout(&mut worker_handles[i], self.config.join_timeout);
                    monitor.deregister(thread_id);
                    match self.elite.select_for_restart(self.seed_selector.as_ref()) {
                        Some(seed) => {
                            if let Some(stats) = monitor.stats(MAIN_THREAD_ID) {
                                stats.bump_restart_count();
                            }
                            worker_handles[i] = self.spawn_restartable_worker(thread_id, Some(seed), monitor);
                        }
                        None => log::info!("[coordinator] event:restart_skipped_no_seed thread_id:{}", thread_id),
                    }
                    continue;
                }

                if !monitor.should_restart(thread_id) {
                    continue;
                }
                log::info!("[coordinator] event:restart thread_id:{}", thread_id);
                worker_handles[i].terminate();
                join_with_timeout(&mut worker_handles[i], self.config.join_timeout);
                monitor.deregister(thread_id);

                match self.elite.select_for_restart(self.seed_selector.as_ref()) {
                    Some(seed) => {
                        if let Some(stats) = monitor.stats(MAIN_THREAD_ID) {
                            stats.bump_restart_count();
                        }
                        worker_handles[i] = self.spawn_restartable_worker(thread_id, Some(seed), monitor);
                    }
                    None => log::info!("[coordinator] event:restart_skipped_no_seed thread_id:{}", thread_id),
                }
            }

            if self.config.notify_main_thread {
                self.maybe_notify_main(worker_handles, main_handle);
            }
        }
    }

    fn maybe_notify_main(&self, worker_handles: &[WorkerHandle], main_handle: &WorkerHandle) {
        const EPSILON: f64 = 1e-9;
        let main_f = main_handle.control.best_solution().map(|(_, f)| f).unwrap_or(f64::INFINITY);
        for handle in worker_handles {
            if let Some((solution, f)) = handle.control.best_solution() {
                if f + EPSILON < main_f {
                    main_handle.control.notify_better_solution(solution, f);
                }
            }
        }
    }

    fn spawn_restartable_worker(&self, thread_id: usize, seed: Option<Solution>, monitor: &Arc<ThreadMonitor>) -> WorkerHandle {
        let control = Arc::new(WorkerControl::new(thread_id));
        monitor.register(thread_id);
        let join = (self.spawn_worker)(thread_id, seed, control.clone(), monitor.clone());
        WorkerHandle::new(control, join)
    }

    /// The path-relinking worker runs entirely inside the core (it only
    /// needs the caller's local-search hook for the polish step), so unlike
    /// AILS workers it isn't handed to `spawn_worker`.
    fn spawn_path_relinking_worker(&self, clock: &GlobalClock, monitor: &Arc<ThreadMonitor>) -> WorkerHandle {
        let control = Arc::new(WorkerControl::new(PATH_RELINKING_THREAD_ID));
        monitor.register(PATH_RELINKING_THREAD_ID);

        let instance = self.instance.clone();
        let elite = self.elite.clone();
        let local_search = self.local_search.clone();
        let pr_config = self.config.path_relinking;
        let capacity_penalty_weight = self.config.capacity_penalty_weight;
        let base_seed = self.config.base_seed;
        let clock = *clock;
        let worker_control = control.clone();
        let stats = monitor.stats(PATH_RELINKING_THREAD_ID).expect("just registered");
        let monitor = monitor.clone();

        let join = std::thread::Builder::new()
            .name("ails-pr".into())
            .spawn(move || {
                worker_control.mark_running();
                let mut rng = ChaChaRng::seed_from_u64(base_seed ^ PATH_RELINKING_THREAD_ID as u64);

                while monitor
                    .stats(MAIN_THREAD_ID)
                    .map(|s| s.iterations() < pr_config.start_delay as u64)
                    .unwrap_or(true)
                {
                    if worker_control.should_stop() || clock.is_past_deadline() {
                        worker_control.mark_terminated();
                        return;
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }

                let mut tick: usize = 0;
                while !worker_control.should_stop() && !clock.is_past_deadline() {
                    tick += 1;
                    stats.record_iteration();
                    if tick % pr_config.frequency != 0 || elite.size() < pr_config.min_elite_for_pr {
                        std::thread::sleep(Duration::from_millis(10));
                        continue;
                    }
                    if let Some((a, b)) = elite.sample_for_relinking(&mut rng) {
                        if let Some(best) = relink(&a, &b, instance.as_ref(), capacity_penalty_weight, local_search.as_ref(), &mut rng) {
                            let f = best.objective();
                            if best.is_feasible() && elite.try_insert(best.clone(), Source::PathRelinking) {
                                stats.record_elite_insertion();
                                worker_control.publish_best(best, f);
                            }
                        }
                    }
                }
                worker_control.mark_terminated();
            })
            .expect("spawning the path-relinking thread");

        WorkerHandle::new(control, join)
    }

    fn best_known(&self, main_handle: &WorkerHandle, worker_handles: &[WorkerHandle]) -> Result<(Solution, f64)> {
        let mut best: Option<(Solution, f64)> = main_handle.control.best_solution();
        for handle in worker_handles {
            if let Some((solution, f)) = handle.control.best_solution() {
                if best.as_ref().map(|(_, bf)| f < *bf).unwrap_or(true) {
                    best = Some((solution, f));
                }
            }
        }
        for solution in self.elite.snapshot() {
            let f = solution.objective();
            if best.as_ref().map(|(_, bf)| f < *bf).unwrap_or(true) {
                best = Some((solution, f));
            }
        }
        best.ok_or_else(|| AilsError::Configuration("no worker ever reported a best solution".into()))
    }
}

/// Bounded join: polls `is_finished` up to `timeout`, then
/// gives up and lets the worker exit on its own once it next observes the
/// deadline. Returns the worker's panic message, if the join completed and
/// the thread had panicked rather than returning normally.
fn join_with_timeout(handle: &mut WorkerHandle, timeout: Duration) -> Option<String> {
    let start = std::time::Instant::now();
    loop {
        if handle.join_if_finished() {
            return handle.take_panic();
        }
        if start.elapsed() >= timeout {
            log::info!("[coordinator] event:join_timeout thread_id:{}", handle.thread_id());
            return None;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elite::EliteSet;
    use crate::instance::StaticInstance;
    use crate::seed::QualitySeedSelector;
    use crate::stats::NullSink;
    use crate::worker::ThreadState;
    use parking_lot::Mutex;
    use std::time::Duration as StdDuration;

    fn small_instance() -> Arc<StaticInstance> {
        Arc::new(StaticInstance::from_coords(
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0), (1.0, 1.0)],
            vec![0, 1, 1, 1, 1],
            10,
        ))
    }

    /// A trivial worker: one iteration that seeds (or builds) a feasible
    /// solution, inserts it into the elite set, and publishes it as its
    /// best, then exits. Enough to exercise the coordinator's lifecycle
    /// without a real AILS loop.
    fn make_spawn_worker(instance: Arc<StaticInstance>, elite: Arc<EliteSet>) -> Arc<WorkerFactory> {
        Arc::new(move |thread_id, seed, control, monitor| {
            let instance = instance.clone();
            let elite = elite.clone();
            let stats = monitor.stats(thread_id).expect("coordinator registers before spawning");
            std::thread::Builder::new()
                .spawn(move || {
                    control.mark_running();
                    let mut sol = seed.unwrap_or_else(|| Solution::from_routes(&[vec![1, 2], vec![3, 4]], instance.as_ref()));
                    sol.evaluate(instance.as_ref(), 100.0);
                    stats.record_iteration();
                    stats.update_best(sol.objective());
                    if elite.try_insert(sol.clone(), Source::Ails) {
                        stats.record_elite_insertion();
                    }
                    control.publish_best(sol.clone(), sol.objective());
                    monitor.update_global_best(sol.objective());
                    while !control.should_stop() {
                        std::thread::sleep(StdDuration::from_millis(5));
                    }
                    control.mark_terminated();
                })
                .expect("spawning test worker")
        })
    }

    #[test]
    fn run_completes_and_reports_a_feasible_best() {
        let instance = small_instance();
        let elite = Arc::new(EliteSet::new(5, 0.3, 0.0));
        let spawn_worker = make_spawn_worker(instance.clone(), elite.clone());

        let mut config = AilsConfig::default();
        config.time_limit = StdDuration::from_millis(300);
        config.monitor_tick = StdDuration::from_millis(20);
        config.join_timeout = StdDuration::from_millis(100);
        config.num_worker_threads = 1;
        config.min_elite_size_for_workers = 1;
        config.path_relinking.enabled = false;

        let coordinator = Coordinator::new(
            instance,
            config,
            elite,
            Arc::new(QualitySeedSelector),
            Arc::new(|_: &mut Solution, _: &dyn CvrpInstance| {}),
            Arc::new(NullSink),
            spawn_worker,
        );

        let result = coordinator.run().expect("run succeeds");
        assert!(result.best_f.is_finite());
        assert!(!result.thread_stats.is_empty());
    }

    /// Like `make_spawn_worker`, but the thread with id `panic_on` panics
    /// immediately instead of running, to exercise panic recovery.
    fn make_selectively_panicking_spawn_worker(instance: Arc<StaticInstance>, elite: Arc<EliteSet>, panic_on: usize) -> Arc<WorkerFactory> {
        Arc::new(move |thread_id, seed, control, monitor| {
            let instance = instance.clone();
            let elite = elite.clone();
            let stats = monitor.stats(thread_id).expect("coordinator registers before spawning");
            std::thread::Builder::new()
                .spawn(move || {
                    control.mark_running();
                    if thread_id == panic_on {
                        panic!("simulated panic on thread {}", thread_id);
                    }
                    let mut sol = seed.unwrap_or_else(|| Solution::from_routes(&[vec![1, 2], vec![3, 4]], instance.as_ref()));
                    sol.evaluate(instance.as_ref(), 100.0);
                    stats.record_iteration();
                    stats.update_best(sol.objective());
                    if elite.try_insert(sol.clone(), Source::Ails) {
                        stats.record_elite_insertion();
                    }
                    control.publish_best(sol.clone(), sol.objective());
                    monitor.update_global_best(sol.objective());
                    while !control.should_stop() {
                        std::thread::sleep(StdDuration::from_millis(5));
                    }
                    control.mark_terminated();
                })
                .expect("spawning test worker")
        })
    }

    #[test]
    fn a_panicking_main_worker_surfaces_as_worker_panicked_and_stops_the_run() {
        let _ = env_logger::builder().is_test(true).try_init();
        let instance = small_instance();
        let elite = Arc::new(EliteSet::new(5, 0.3, 0.0));
        let spawn_worker = make_selectively_panicking_spawn_worker(instance.clone(), elite.clone(), MAIN_THREAD_ID);

        let mut config = AilsConfig::default();
        config.time_limit = StdDuration::from_millis(120);
        config.monitor_tick = StdDuration::from_millis(10);
        config.join_timeout = StdDuration::from_millis(50);
        config.num_worker_threads = 1;
        config.min_elite_size_for_workers = 1;
        config.path_relinking.enabled = false;

        let coordinator = Coordinator::new(
            instance,
            config,
            elite,
            Arc::new(QualitySeedSelector),
            Arc::new(|_: &mut Solution, _: &dyn CvrpInstance| {}),
            Arc::new(NullSink),
            spawn_worker,
        );

        match coordinator.run() {
            Err(AilsError::WorkerPanicked { thread_id, .. }) => assert_eq!(MAIN_THREAD_ID, thread_id),
            other => panic!("expected Err(WorkerPanicked), got {:?}", other),
        }
    }

    #[test]
    fn a_panicking_restartable_worker_is_recovered_without_failing_the_run() {
        let _ = env_logger::builder().is_test(true).try_init();
        let instance = small_instance();
        let elite = Arc::new(EliteSet::new(5, 0.3, 0.0));
        let spawn_worker = make_selectively_panicking_spawn_worker(instance.clone(), elite.clone(), 2);

        let mut config = AilsConfig::default();
        config.time_limit = StdDuration::from_millis(200);
        config.monitor_tick = StdDuration::from_millis(10);
        config.join_timeout = StdDuration::from_millis(50);
        config.num_worker_threads = 1;
        config.min_elite_size_for_workers = 1;
        config.path_relinking.enabled = false;

        let coordinator = Coordinator::new(
            instance,
            config,
            elite,
            Arc::new(QualitySeedSelector),
            Arc::new(|_: &mut Solution, _: &dyn CvrpInstance| {}),
            Arc::new(NullSink),
            spawn_worker,
        );

        let result = coordinator.run().expect("the main worker's success must not be affected by a worker panic");
        assert!(result.best_f.is_finite());
        let main_stats = result.thread_stats.iter().find(|(id, _)| *id == MAIN_THREAD_ID).expect("main thread reports stats");
        assert!(main_stats.1.restart_count > 0, "the panicking worker should have been restarted at least once");
    }

    #[test]
    fn zero_worker_threads_runs_as_a_single_protected_main() {
        let instance = small_instance();
        let elite = Arc::new(EliteSet::new(5, 0.3, 0.0));
        let spawn_worker = make_spawn_worker(instance.clone(), elite.clone());

        let mut config = AilsConfig::default();
        config.time_limit = StdDuration::from_millis(150);
        config.monitor_tick = StdDuration::from_millis(10);
        config.join_timeout = StdDuration::from_millis(50);
        config.num_worker_threads = 0;
        config.min_elite_size_for_workers = 1;
        config.path_relinking.enabled = false;

        let coordinator = Coordinator::new(
            instance,
            config,
            elite,
            Arc::new(QualitySeedSelector),
            Arc::new(|_: &mut Solution, _: &dyn CvrpInstance| {}),
            Arc::new(NullSink),
            spawn_worker,
        );

        let result = coordinator.run().expect("run succeeds with no restartable workers");
        assert_eq!(1, result.thread_stats.len(), "only the main worker should ever have reported stats");
        assert_eq!(MAIN_THREAD_ID, result.thread_stats[0].0);
    }

    #[test]
    fn min_elite_size_above_capacity_never_launches_workers_but_main_still_produces_a_result() {
        let instance = small_instance();
        let elite = Arc::new(EliteSet::new(2, 0.3, 0.0));
        let spawn_worker = make_spawn_worker(instance.clone(), elite.clone());

        let mut config = AilsConfig::default();
        config.time_limit = StdDuration::from_millis(150);
        config.monitor_tick = StdDuration::from_millis(10);
        config.join_timeout = StdDuration::from_millis(50);
        config.num_worker_threads = 2;
        config.elite_capacity = 2;
        config.min_elite_size_for_workers = 3;
        config.path_relinking.enabled = false;

        let coordinator = Coordinator::new(
            instance,
            config,
            elite,
            Arc::new(QualitySeedSelector),
            Arc::new(|_: &mut Solution, _: &dyn CvrpInstance| {}),
            Arc::new(NullSink),
            spawn_worker,
        );

        let result = coordinator.run().expect("main alone still produces a result");
        assert_eq!(1, result.thread_stats.len(), "restartable workers must never launch when the elite floor is unreachable");
        assert_eq!(MAIN_THREAD_ID, result.thread_stats[0].0);
    }

    #[test]
    fn a_zero_deadline_returns_a_result_without_errors() {
        let instance = small_instance();
        let elite = Arc::new(EliteSet::new(5, 0.3, 0.0));
        let spawn_worker = make_spawn_worker(instance.clone(), elite.clone());

        let mut config = AilsConfig::default();
        config.time_limit = StdDuration::ZERO;
        config.monitor_tick = StdDuration::from_millis(5);
        config.join_timeout = StdDuration::from_millis(50);
        config.num_worker_threads = 1;
        config.min_elite_size_for_workers = 1;
        config.path_relinking.enabled = false;

        let coordinator = Coordinator::new(
            instance,
            config,
            elite,
            Arc::new(QualitySeedSelector),
            Arc::new(|_: &mut Solution, _: &dyn CvrpInstance| {}),
            Arc::new(NullSink),
            spawn_worker,
        );

        assert!(coordinator.run().is_ok());
    }

    /// Like `make_spawn_worker`, but asserts any worker beyond the main
    /// thread only ever runs with a seed, and records every control block it
    /// creates so the caller can inspect final states.
    fn make_tracking_spawn_worker(
        instance: Arc<StaticInstance>,
        elite: Arc<EliteSet>,
        controls: Arc<Mutex<Vec<Arc<WorkerControl>>>>,
    ) -> Arc<WorkerFactory> {
        Arc::new(move |thread_id, seed, control, monitor| {
            controls.lock().push(control.clone());
            if thread_id > MAIN_THREAD_ID {
                assert!(seed.is_some(), "worker {} launched without a seed", thread_id);
            }
            let instance = instance.clone();
            let elite = elite.clone();
            let stats = monitor.stats(thread_id).expect("coordinator registers before spawning");
            std::thread::Builder::new()
                .spawn(move || {
                    control.mark_running();
                    let mut sol = seed.unwrap_or_else(|| Solution::from_routes(&[vec![1, 2], vec![3, 4]], instance.as_ref()));
                    sol.evaluate(instance.as_ref(), 100.0);
                    stats.record_iteration();
                    stats.update_best(sol.objective());
                    if elite.try_insert(sol.clone(), Source::Ails) {
                        stats.record_elite_insertion();
                    }
                    control.publish_best(sol.clone(), sol.objective());
                    monitor.update_global_best(sol.objective());
                    while !control.should_stop() {
                        std::thread::sleep(StdDuration::from_millis(5));
                    }
                    control.mark_terminated();
                })
                .expect("spawning test worker")
        })
    }

    #[test]
    fn restartable_workers_never_launch_without_a_seed() {
        let instance = small_instance();
        let elite = Arc::new(EliteSet::new(5, 0.3, 0.0));
        let controls = Arc::new(Mutex::new(Vec::new()));
        let spawn_worker = make_tracking_spawn_worker(instance.clone(), elite.clone(), controls.clone());

        let mut config = AilsConfig::default();
        config.time_limit = StdDuration::from_millis(200);
        config.monitor_tick = StdDuration::from_millis(10);
        config.join_timeout = StdDuration::from_millis(50);
        config.num_worker_threads = 3;
        config.min_elite_size_for_workers = 1;
        config.path_relinking.enabled = false;

        let coordinator = Coordinator::new(
            instance,
            config,
            elite,
            Arc::new(QualitySeedSelector),
            Arc::new(|_: &mut Solution, _: &dyn CvrpInstance| {}),
            Arc::new(NullSink),
            spawn_worker,
        );

        // The assertion inside the factory panics the calling thread (the
        // coordinator's own thread, since spawn_worker runs synchronously
        // from `run()`) if any worker id > 1 is ever launched seedless.
        let result = coordinator.run().expect("run succeeds");
        assert!(result.best_f.is_finite());
    }

    #[test]
    fn all_worker_threads_are_terminated_at_the_join_bound() {
        let instance = small_instance();
        let elite = Arc::new(EliteSet::new(5, 0.3, 0.0));
        let controls = Arc::new(Mutex::new(Vec::new()));
        let spawn_worker = make_tracking_spawn_worker(instance.clone(), elite.clone(), controls.clone());

        let mut config = AilsConfig::default();
        config.time_limit = StdDuration::from_millis(150);
        config.monitor_tick = StdDuration::from_millis(10);
        config.join_timeout = StdDuration::from_millis(50);
        config.num_worker_threads = 2;
        config.min_elite_size_for_workers = 1;
        config.path_relinking.enabled = false;

        let coordinator = Coordinator::new(
            instance,
            config,
            elite,
            Arc::new(QualitySeedSelector),
            Arc::new(|_: &mut Solution, _: &dyn CvrpInstance| {}),
            Arc::new(NullSink),
            spawn_worker,
        );

        let _ = coordinator.run().expect("run succeeds");

        let recorded = controls.lock();
        assert!(!recorded.is_empty(), "at least the main worker must have been tracked");
        for control in recorded.iter() {
            assert_eq!(ThreadState::Terminated, control.state(), "thread {} was not terminated by the join bound", control.thread_id());
        }
    }
}
