//! The opaque local-search hook.
//!
//! Workers and the path-relinking polish step both take one of these by
//! trait object so the core never needs to know whether the caller plugged
//! in destroy/repair, 2-opt, or something else.

use crate::instance::CvrpInstance;
use crate::solution::Solution;

pub trait LocalSearch: Fn(&mut Solution, &dyn CvrpInstance) + Send + Sync {}

impl<T> LocalSearch for T where T: Fn(&mut Solution, &dyn CvrpInstance) + Send + Sync {}
