//! Route-pairing bijection φ between two equal-route-count solutions.

use rustc_hash::FxHashSet;

use crate::solution::Solution;

/// Greedy maximum-overlap matching: for each route `i` of `s_i` (in index
/// order), picks the unmatched route `j` of `s_g` sharing the most
/// customers, ties broken by lowest `j`. Returns `None` if the two
/// solutions don't have the same route count — a pairing failure,
/// recovered locally by the caller.
pub fn pair_routes(s_i: &Solution, s_g: &Solution) -> Option<Vec<usize>> {
    if s_i.num_routes() != s_g.num_routes() {
        return None;
    }
    let m = s_i.num_routes();

    let i_sets: Vec<FxHashSet<usize>> = (0..m).map(|i| s_i.route_customers(i).into_iter().collect()).collect();
    let g_sets: Vec<FxHashSet<usize>> = (0..m).map(|j| s_g.route_customers(j).into_iter().collect()).collect();

    let mut matched = vec![false; m];
    let mut phi = vec![0usize; m];

    for i in 0..m {
        let mut best_j = None;
        let mut best_overlap: i64 = -1;
        for j in 0..m {
            if matched[j] {
                continue;
            }
            let overlap = i_sets[i].intersection(&g_sets[j]).count() as i64;
            if overlap > best_overlap {
                best_overlap = overlap;
                best_j = Some(j);
            }
        }
        let j = best_j?;
        matched[j] = true;
        phi[i] = j;
    }

    if is_permutation(&phi) {
        Some(phi)
    } else {
        None
    }
}

fn is_permutation(phi: &[usize]) -> bool {
    let mut seen = vec![false; phi.len()];
    for &j in phi {
        if j >= phi.len() || seen[j] {
            return false;
        }
        seen[j] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::StaticInstance;

    fn instance() -> StaticInstance {
        StaticInstance::from_coords(
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 1.0)],
            vec![0, 1, 1, 1, 1, 1],
            10,
        )
    }

    #[test]
    fn self_pairing_is_identity() {
        let instance = instance();
        let s = Solution::from_routes(&[vec![1, 2, 3], vec![4, 5]], &instance);
        let phi = pair_routes(&s, &s).expect("equal route counts");
        assert_eq!(vec![0, 1], phi);
    }

    #[test]
    fn breaks_ties_by_lowest_unmatched_index() {
        let instance = instance();
        let s_i = Solution::from_routes(&[vec![1, 2, 3], vec![4, 5]], &instance);
        let s_g = Solution::from_routes(&[vec![1, 2, 4], vec![3, 5]], &instance);
        // route 0 of s_i ({1,2,3}) overlaps 2 with g-route 0 ({1,2,4}) and 1 with g-route 1 ({3,5})
        // route 1 of s_i ({4,5}) overlaps 1 with g-route 0 and 1 with g-route 1 (tie -> lowest j, but 0 already taken)
        let phi = pair_routes(&s_i, &s_g).expect("equal route counts");
        assert_eq!(vec![0, 1], phi);
    }

    #[test]
    fn mismatched_route_counts_fail_pairing() {
        let instance = instance();
        let s_i = Solution::from_routes(&[vec![1, 2, 3, 4, 5]], &instance);
        let s_g = Solution::from_routes(&[vec![1, 2], vec![3, 4, 5]], &instance);
        assert!(pair_routes(&s_i, &s_g).is_none());
    }
}
