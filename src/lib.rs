pub mod clock;
pub mod config;
pub mod coordinator;
pub mod elite;
pub mod error;
pub mod instance;
pub mod local_search;
pub mod relink;
pub mod seed;
pub mod solution;
pub mod stats;
pub mod utils;
pub mod worker;

pub use clock::GlobalClock;
pub use config::{AilsConfig, PathRelinkingConfig};
pub use coordinator::monitor::ThreadMonitor;
pub use coordinator::Coordinator;
pub use elite::{EliteSet, Source};
pub use error::{AilsError, Result};
pub use instance::{CvrpInstance, StaticInstance};
pub use local_search::LocalSearch;
pub use relink::relink;
pub use seed::{QualitySeedSelector, SeedSelector};
pub use solution::{NodeId, Solution};
pub use stats::{NullSink, ResultSink, RunResult, ThreadStats, ThreadStatsSnapshot};
pub use worker::{ThreadState, WorkerControl, WorkerHandle};
