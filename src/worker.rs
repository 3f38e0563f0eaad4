//! The worker contract the coordinator manages.
//!
//! The core never runs a perturb/repair/local-search loop itself — that
//! loop is supplied by the caller. What lives
//! here is the lifecycle surface a caller's worker implementation must
//! honor, plus the shared control block the coordinator uses to start,
//! restart, and stop it: small mutex-guarded state plus atomics for the
//! scalar counters workers touch every iteration.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::solution::Solution;

/// `CREATED → RUNNING → {TERMINATING → TERMINATED | DEADLINE_REACHED → TERMINATED}`.
/// The main worker (thread id 1) never enters `Terminating` except via the
/// deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ThreadState {
    Created = 0,
    Running = 1,
    Terminating = 2,
    DeadlineReached = 3,
    Terminated = 4,
}

impl ThreadState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ThreadState::Created,
            1 => ThreadState::Running,
            2 => ThreadState::Terminating,
            3 => ThreadState::DeadlineReached,
            _ => ThreadState::Terminated,
        }
    }
}

/// Shared control block between a worker and the coordinator. The worker
/// checks `state()` at the head of every iteration; the coordinator drives the transitions.
pub struct WorkerControl {
    thread_id: usize,
    state: AtomicU8,
    /// Set by `best_solution()` callers' counterpart: the worker publishes
    /// its current incumbent here after every iteration that changes it.
    best: Mutex<Option<(Solution, f64)>>,
    /// An externally observed improving solution, injected by
    /// `notify_better_solution`; the worker adopts it before its next
    /// perturbation and clears the slot.
    injected: Mutex<Option<(Solution, f64)>>,
}

impl WorkerControl {
    pub fn new(thread_id: usize) -> Self {
        WorkerControl {
            thread_id,
            state: AtomicU8::new(ThreadState::Created as u8),
            best: Mutex::new(None),
            injected: Mutex::new(None),
        }
    }

    pub fn thread_id(&self) -> usize {
        self.thread_id
    }

    pub fn state(&self) -> ThreadState {
        ThreadState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ThreadState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Called once by the worker when it enters its iteration loop.
    pub fn mark_running(&self) {
        self.set_state(ThreadState::Running);
    }

    /// True once the worker should break out of its loop: either terminate()
    /// was called, or the global deadline passed.
    pub fn should_stop(&self) -> bool {
        matches!(self.state(), ThreadState::Terminating | ThreadState::DeadlineReached | ThreadState::Terminated)
    }

    /// External operation: cooperative termination signal.
    /// Observed at the next loop head, bounded latency of one perturb+repair
    /// cycle.
    pub fn terminate(&self) {
        if self.state() == ThreadState::Running {
            self.set_state(ThreadState::Terminating);
        }
    }

    /// Distinct from `terminate()`: the global deadline passed rather than a
    /// coordinator-issued restart signal, so `should_restart` logic upstream
    /// doesn't need to special-case it.
    pub fn mark_deadline_reached(&self) {
        if matches!(self.state(), ThreadState::Running | ThreadState::Terminating) {
            self.set_state(ThreadState::DeadlineReached);
        }
    }

    /// Called by the worker itself right before its thread function returns.
    pub fn mark_terminated(&self) {
        self.set_state(ThreadState::Terminated);
    }

    /// External operation: snapshot of the worker's current best. `None` before the worker's first iteration completes.
    pub fn best_solution(&self) -> Option<(Solution, f64)> {
        self.best.lock().clone()
    }

    /// Called by the worker after a global-best improvement to publish its
    /// new incumbent.
    pub fn publish_best(&self, solution: Solution, f: f64) {
        *self.best.lock() = Some((solution, f));
    }

    /// External operation: inject an improving solution observed elsewhere.
    /// The worker adopts it as its new incumbent before its next
    /// perturbation via `take_injected`.
    pub fn notify_better_solution(&self, solution: Solution, f: f64) {
        *self.injected.lock() = Some((solution, f));
    }

    /// Called by the worker at the head of an iteration to pick up (and
    /// clear) any pending injection.
    pub fn take_injected(&self) -> Option<(Solution, f64)> {
        self.injected.lock().take()
    }
}

/// Extracts a human-readable message from a `std::thread::Result` panic
/// payload, which is typically a `&'static str` or `String` depending on
/// whether the panic came from a literal or a formatted `panic!`.
fn panic_payload_message(payload: &(dyn std::any::Any + Send + 'static)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// What the coordinator holds for one running worker: the shared control
/// block plus the OS thread handle, if the worker runs on its own thread.
pub struct WorkerHandle {
    pub control: Arc<WorkerControl>,
    join_handle: Option<std::thread::JoinHandle<()>>,
    panic_message: Option<String>,
}

impl WorkerHandle {
    pub fn new(control: Arc<WorkerControl>, join_handle: std::thread::JoinHandle<()>) -> Self {
        WorkerHandle { control, join_handle: Some(join_handle), panic_message: None }
    }

    pub fn thread_id(&self) -> usize {
        self.control.thread_id()
    }

    pub fn terminate(&self) {
        self.control.terminate();
    }

    /// True once the underlying thread has exited, without consuming the
    /// `JoinHandle`. A worker finishing on its own before `terminate()`/the
    /// deadline was ever signaled almost always means it panicked.
    pub fn has_finished(&self) -> bool {
        match &self.join_handle {
            Some(h) => h.is_finished(),
            None => true,
        }
    }

    fn record_join_result(&mut self, result: std::thread::Result<()>) {
        if let Err(payload) = result {
            let message = panic_payload_message(payload.as_ref());
            log::error!("[worker] event:panic thread_id:{} message:{}", self.control.thread_id(), message);
            self.control.mark_terminated();
            self.panic_message = Some(message);
        }
    }

    /// Takes the panic message recorded by the last join, if the worker's
    /// thread panicked rather than returning normally. `None` after a clean
    /// join, or before any join has happened.
    pub fn take_panic(&mut self) -> Option<String> {
        self.panic_message.take()
    }

    /// Joins with a bounded wait. A
    /// real `JoinHandle::join` has no built-in timeout, so the coordinator
    /// only calls this after giving the worker a chance to observe
    /// `terminate()`/the deadline; if the thread hasn't exited in time this
    /// detaches it (it will still exit on its own once it next checks the
    /// deadline) and returns `false`.
    pub fn join_if_finished(&mut self) -> bool {
        match &self.join_handle {
            Some(h) if h.is_finished() => {
                if let Some(h) = self.join_handle.take() {
                    let result = h.join();
                    self.record_join_result(result);
                }
                true
            }
            Some(_) => false,
            None => true,
        }
    }

    /// Joins unconditionally, blocking until the thread exits. Used where a
    /// bounded wait isn't needed, e.g. tearing down a handle the caller
    /// already knows is done or is willing to wait on indefinitely.
    pub fn join_blocking(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let result = h.join();
            self.record_join_result(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_control_starts_created() {
        let control = WorkerControl::new(1);
        assert_eq!(ThreadState::Created, control.state());
        assert!(!control.should_stop());
    }

    #[test]
    fn terminate_only_takes_effect_while_running() {
        let control = WorkerControl::new(2);
        control.terminate();
        assert_eq!(ThreadState::Created, control.state(), "terminate before running is a no-op");

        control.mark_running();
        control.terminate();
        assert_eq!(ThreadState::Terminating, control.state());
        assert!(control.should_stop());
    }

    #[test]
    fn deadline_reached_overrides_terminating() {
        let control = WorkerControl::new(3);
        control.mark_running();
        control.mark_deadline_reached();
        assert_eq!(ThreadState::DeadlineReached, control.state());
    }

    #[test]
    fn injected_solution_is_consumed_once() {
        let control = WorkerControl::new(4);
        let instance = crate::instance::StaticInstance::from_coords(&[(0.0, 0.0), (1.0, 0.0)], vec![0, 1], 10);
        let sol = Solution::from_routes(&[vec![1]], &instance);
        control.notify_better_solution(sol, 5.0);
        assert!(control.take_injected().is_some());
        assert!(control.take_injected().is_none());
    }

    #[test]
    fn join_blocking_waits_for_a_clean_exit() {
        let control = Arc::new(WorkerControl::new(5));
        let worker_control = control.clone();
        let join = std::thread::Builder::new()
            .spawn(move || {
                worker_control.mark_running();
                worker_control.mark_terminated();
            })
            .expect("spawning worker thread");
        let mut handle = WorkerHandle::new(control.clone(), join);

        handle.join_blocking();

        assert_eq!(ThreadState::Terminated, control.state());
        assert!(handle.take_panic().is_none());
        assert!(handle.has_finished());
    }

    #[test]
    fn a_panicking_worker_is_logged_and_marked_terminated() {
        let control = Arc::new(WorkerControl::new(6));
        let worker_control = control.clone();
        let join = std::thread::Builder::new()
            .spawn(move || {
                worker_control.mark_running();
                panic!("simulated worker failure");
            })
            .expect("spawning worker thread");
        let mut handle = WorkerHandle::new(control.clone(), join);

        handle.join_blocking();

        assert_eq!(ThreadState::Terminated, control.state(), "a panic still leaves the control block TERMINATED");
        assert_eq!(Some("simulated worker failure".to_string()), handle.take_panic());
        assert!(handle.take_panic().is_none(), "the panic message is consumed once");
    }
}
