//! Crate-wide error taxonomy.
//!
//! Only failures that must be surfaced to the caller live here. Local,
//! recoverable conditions (pairing failure, no seed available) are modeled
//! as `Option::None` at their call sites instead, per the propagation policy.

use thiserror::Error;

/// Errors that can escape the coordinator's public API.
#[derive(Debug, Error)]
pub enum AilsError {
    /// An `AilsConfig` / `PathRelinkingConfig` field was out of its valid range.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The global deadline was reached before setup (elite seeding) completed.
    #[error("deadline reached during setup after {elapsed_ms} ms")]
    DeadlineDuringSetup { elapsed_ms: u64 },

    /// A worker thread panicked; `thread_id` identifies which one.
    #[error("worker {thread_id} panicked: {message}")]
    WorkerPanicked { thread_id: usize, message: String },
}

pub type Result<T> = std::result::Result<T, AilsError>;
