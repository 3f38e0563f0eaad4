//! The ten priority criteria used to pick which misplaced customer to
//! transfer next during path relinking.

use rand::Rng;

/// Feasibility/cost facts about moving one customer from its current route
/// to its paired destination route, gathered without mutating either.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    /// Origin route is capacity-feasible with the customer still in it.
    pub o0: bool,
    /// Origin route is capacity-feasible once the customer is removed.
    pub o1: bool,
    /// Destination route is capacity-feasible before the customer arrives.
    pub d0: bool,
    /// Destination route is capacity-feasible once the customer is inserted.
    pub d1: bool,
    pub demand: f64,
    /// Best-position insertion delta-cost into the destination route.
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityCriterion {
    C1,
    C2,
    C3,
    C4,
    C5,
    C6,
    C7,
    C8,
    C9,
    C10,
}

impl PriorityCriterion {
    /// Uniform pick among the ten criteria.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        use PriorityCriterion::*;
        match rng.gen_range(0..10u8) {
            0 => C1,
            1 => C2,
            2 => C3,
            3 => C4,
            4 => C5,
            5 => C6,
            6 => C7,
            7 => C8,
            8 => C9,
            _ => C10,
        }
    }

    /// Higher is better; the transfer loop always picks the max.
    pub fn evaluate<R: Rng + ?Sized>(&self, ctx: &MoveContext, rng: &mut R) -> f64 {
        use PriorityCriterion::*;

        // Base feasibility-repair signal: positive if removal fixes the
        // origin, negative if insertion breaks the destination.
        let repairs_origin = !ctx.o0 && ctx.o1;
        let breaks_destination = ctx.d0 && !ctx.d1;
        let c1 = if repairs_origin {
            1.0
        } else if breaks_destination {
            -1.0
        } else {
            0.0
        };

        match self {
            C1 => c1,
            C2 => -c1,
            C3 => {
                if ctx.o0 && ctx.o1 && ctx.d0 && ctx.d1 {
                    -ctx.cost
                } else {
                    1000.0 * c1
                }
            }
            C4 => ctx.demand,
            C5 => -ctx.demand,
            C6 => -ctx.cost,
            C7 => {
                if repairs_origin {
                    1.0
                } else {
                    0.0
                }
            }
            C8 => {
                if breaks_destination {
                    -1.0
                } else {
                    0.0
                }
            }
            C9 => rng.gen::<f64>(),
            C10 => 0.5 * c1 + 0.3 * (ctx.demand / 100.0) - 0.2 * (ctx.cost / 100.0),
        }
    }
}
