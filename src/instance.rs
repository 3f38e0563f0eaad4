//! The instance/objective interface the core depends on.
//!
//! Real file-format parsing is out of scope; this module only
//! specifies the trait the coordinator and workers consume, plus an
//! in-memory fixture implementation used by tests and by callers that
//! already have their instance data in hand.

use crate::utils::Matrix;

/// Read-only view of a CVRP instance, shared by reference across threads.
pub trait CvrpInstance: Send + Sync {
    /// Number of customers, excluding the depot.
    fn num_customers(&self) -> usize;

    /// Index of the depot node (conventionally `0`).
    fn depot(&self) -> usize;

    /// Demand of `customer` (1-indexed customer ids, depot excluded).
    fn demand(&self, customer: usize) -> u32;

    /// Travel cost between two node ids (depot included, so `0..=num_customers()`).
    fn distance(&self, a: usize, b: usize) -> f64;

    /// Capacity of a single vehicle.
    fn vehicle_capacity(&self) -> u32;
}

/// A plain in-memory instance backed by a dense distance matrix.
///
/// Node `0` is always the depot; customers are `1..=num_customers`.
#[derive(Debug, Clone)]
pub struct StaticInstance {
    distances: Matrix<f64>,
    demands: Vec<u32>,
    vehicle_capacity: u32,
}

impl StaticInstance {
    /// Builds an instance from a precomputed distance matrix and per-node
    /// demands (index 0 is the depot and its demand must be 0).
    pub fn new(distances: Matrix<f64>, demands: Vec<u32>, vehicle_capacity: u32) -> Self {
        assert_eq!(demands[0], 0, "depot demand must be zero");
        StaticInstance { distances, demands, vehicle_capacity }
    }

    /// Builds an instance from Euclidean coordinates; `coords[0]` is the depot.
    pub fn from_coords(coords: &[(f64, f64)], demands: Vec<u32>, vehicle_capacity: u32) -> Self {
        let n = coords.len();
        let mut distances = Matrix::new_default(n, n, 0.0_f64);
        for i in 0..n {
            for j in 0..n {
                let (xi, yi) = coords[i];
                let (xj, yj) = coords[j];
                distances[(i, j)] = ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt();
            }
        }
        StaticInstance::new(distances, demands, vehicle_capacity)
    }
}

impl CvrpInstance for StaticInstance {
    fn num_customers(&self) -> usize {
        self.demands.len() - 1
    }

    fn depot(&self) -> usize {
        0
    }

    fn demand(&self, customer: usize) -> u32 {
        self.demands[customer]
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        self.distances[(a, b)]
    }

    fn vehicle_capacity(&self) -> u32 {
        self.vehicle_capacity
    }
}
