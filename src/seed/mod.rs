//! Pluggable seed selection.

pub mod quality;

use crate::elite::EliteEntrySummary;

/// A capability exposing `select(pool_snapshot) -> index | none`.
///
/// Distinct calls against the *same* pool snapshot (as `select_for_restart`
/// guarantees by locking across summarize-then-select) must return distinct
/// entries until all have been used once, so that concurrent restart
/// requests never duplicate a seed.
pub trait SeedSelector: Send + Sync {
    fn select(&self, entries: &[EliteEntrySummary]) -> Option<usize>;
}

pub use quality::QualitySeedSelector;
