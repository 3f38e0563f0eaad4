//! Pairwise structural diversity between solutions.

use rustc_hash::FxHashSet;

use crate::solution::Solution;

/// A solution's edge set, precomputed once so repeated pairwise diversity
/// checks against the pool don't re-walk its routes each time.
pub type EdgeSet = FxHashSet<(usize, usize)>;

pub fn edge_set(solution: &Solution) -> EdgeSet {
    solution.edges().into_iter().collect()
}

/// `1 - |common_edges(a,b)| / max(|edges(a)|, |edges(b)|)`, in `[0,1]`.
/// Two identical edge sets score `0`; disjoint ones score `1`.
pub fn diversity(a: &EdgeSet, b: &EdgeSet) -> f64 {
    let denom = a.len().max(b.len());
    if denom == 0 {
        return 0.0;
    }
    let common = a.intersection(b).count();
    1.0 - (common as f64 / denom as f64)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::instance::StaticInstance;
    use crate::solution::Solution;
    use proptest::prelude::*;

    fn instance() -> StaticInstance {
        StaticInstance::from_coords(
            &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 2.0), (2.0, 0.0)],
            vec![0, 1, 1, 1, 1, 1],
            10,
        )
    }

    fn arbitrary_partition() -> impl Strategy<Value = Vec<Vec<usize>>> {
        Just(vec![1usize, 2, 3, 4, 5]).prop_shuffle().prop_flat_map(|perm| {
            (1usize..=perm.len()).prop_map(move |split| {
                vec![perm[..split].to_vec(), perm[split..].to_vec()]
                    .into_iter()
                    .filter(|r| !r.is_empty())
                    .collect::<Vec<_>>()
            })
        })
    }

    proptest! {
        #[test]
        fn diversity_is_symmetric_for_arbitrary_partitions(a in arbitrary_partition(), b in arbitrary_partition()) {
            let instance = instance();
            let ea = edge_set(&Solution::from_routes(&a, &instance));
            let eb = edge_set(&Solution::from_routes(&b, &instance));
            prop_assert_eq!(diversity(&ea, &eb), diversity(&eb, &ea));
        }

        #[test]
        fn diversity_is_zero_reflexively(a in arbitrary_partition()) {
            let instance = instance();
            let ea = edge_set(&Solution::from_routes(&a, &instance));
            prop_assert_eq!(0.0, diversity(&ea, &ea));
        }
    }
}
