//! The default seed selector: least-used first, ties broken by highest score.

use ordered_float::OrderedFloat;

use crate::elite::EliteEntrySummary;
use crate::seed::SeedSelector;

#[derive(Debug, Default, Clone, Copy)]
pub struct QualitySeedSelector;

impl SeedSelector for QualitySeedSelector {
    fn select(&self, entries: &[EliteEntrySummary]) -> Option<usize> {
        entries
            .iter()
            .min_by_key(|e| (e.usage_count, std::cmp::Reverse(OrderedFloat(e.score))))
            .map(|e| e.index)
    }
}
