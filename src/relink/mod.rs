//! The path-relinking engine: a structural crossover between two elite
//! solutions of equal route count.

pub mod criteria;
pub mod pairing;

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::instance::CvrpInstance;
use crate::local_search::LocalSearch;
use crate::solution::Solution;
use criteria::{MoveContext, PriorityCriterion};
use pairing::pair_routes;

/// Runs the full path-relinking procedure between `s_a` and `s_b`, returning
/// the best feasible solution encountered along the trajectory, polished by
/// `local_search`. Returns `None` on a pairing failure (route count
/// mismatch or a non-permutation φ) — the caller tries another pair.
pub fn relink<R: Rng + ?Sized>(
    s_a: &Solution,
    s_b: &Solution,
    instance: &dyn CvrpInstance,
    capacity_penalty_weight: f64,
    local_search: &dyn LocalSearch,
    rng: &mut R,
) -> Option<Solution> {
    // Step 1: role assignment.
    let (s_i, s_g) = if rng.gen_bool(0.5) { (s_a, s_b) } else { (s_b, s_a) };

    // Step 2: route pairing.
    let phi = pair_routes(s_i, s_g)?;
    let m = phi.len();

    let mut current = s_i.clone();
    let mut best = current.clone();

    // Step 3: NF set, recorded as (customer, origin_route) pairs so the
    // destination route φ(k) stays correct even once `current` mutates.
    let mut nf: Vec<(usize, usize)> = Vec::new();
    for k in 0..m {
        let g_customers: FxHashSet<usize> = s_g.route_customers(phi[k]).into_iter().collect();
        for v in s_i.route_customers(k) {
            if !g_customers.contains(&v) {
                nf.push((v, k));
            }
        }
    }

    if nf.is_empty() {
        return Some(current);
    }

    // Step 4: one priority criterion governs the whole transfer loop.
    let criterion = PriorityCriterion::sample(rng);

    // Step 5: transfer loop.
    while !nf.is_empty() {
        let mut best_idx = 0;
        let mut best_priority = f64::NEG_INFINITY;
        let mut best_cost = f64::INFINITY;

        for (idx, &(v, k)) in nf.iter().enumerate() {
            let origin = current.customer_route(v);
            let dest = phi[k];
            let demand = instance.demand(v) as f64;

            let o0 = current.route_is_capacity_feasible(origin, instance);
            let o1_demand = current.route_demand(origin) - instance.demand(v);
            let o1 = o1_demand <= instance.vehicle_capacity();
            let d0 = current.route_is_capacity_feasible(dest, instance);
            let d1_demand = current.route_demand(dest) + instance.demand(v);
            let d1 = d1_demand <= instance.vehicle_capacity();
            let (_, cost) = current.best_insertion_position(v, dest, instance);

            let ctx = MoveContext { o0, o1, d0, d1, demand, cost };
            let priority = criterion.evaluate(&ctx, rng);

            if priority > best_priority || (priority == best_priority && cost < best_cost) {
                best_priority = priority;
                best_cost = cost;
                best_idx = idx;
            }
        }

        let (v_hat, k) = nf.swap_remove(best_idx);
        current.remove_customer(v_hat, instance);
        current.insert_best_position(v_hat, phi[k], instance);

        current.evaluate(instance, capacity_penalty_weight);
        if current.is_feasible() && current.objective() < best.objective() {
            best = current.clone();
        }
    }

    // Step 6: polish.
    local_search(&mut best, instance);
    best.evaluate(instance, capacity_penalty_weight);

    // Step 7.
    Some(best)
}
