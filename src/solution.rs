//! Route representation: an arena of index-linked nodes forming, per route,
//! a doubly linked cyclic list anchored at the depot.
//!
//! Using indices into a `Vec` rather than `Rc`/raw pointers keeps route
//! mutation (removal, best-position insertion) to index rewiring with no
//! aliasing hazards: an arena of `NodeId` indices rather than `NodeId`/`EdgeId`
//! pointers into a graph of nodes and edges.

use crate::instance::CvrpInstance;

/// Index into a [`Solution`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct RouteNode {
    /// Customer id (the depot anchor's customer id equals `instance.depot()`).
    customer: usize,
    route: usize,
    prev: NodeId,
    next: NodeId,
}

/// An ordered partition of customers into routes, each an doubly linked
/// cycle anchored at the depot, plus the cached objective.
#[derive(Debug, Clone)]
pub struct Solution {
    nodes: Vec<RouteNode>,
    /// One anchor `NodeId` per route, in route order.
    anchors: Vec<NodeId>,
    /// `customer_node[c]` is the arena slot holding customer `c` (`None` for
    /// the depot id itself, which has one slot per route instead).
    customer_node: Vec<Option<NodeId>>,
    route_demand: Vec<u32>,
    /// Unlinked arena slots left behind by `remove_customer`, recycled by
    /// the next `insert_after` instead of growing the arena unboundedly.
    free: Vec<NodeId>,
    f: f64,
    feasible: bool,
}

impl Solution {
    /// Builds a solution from an explicit partition of customers into routes.
    /// `routes[i]` lists the customers visited by route `i`, in order.
    pub fn from_routes(routes: &[Vec<usize>], instance: &dyn CvrpInstance) -> Self {
        let depot = instance.depot();
        let mut nodes = Vec::new();
        let mut anchors = Vec::with_capacity(routes.len());
        let mut customer_node = vec![None; instance.num_customers() + 1];
        let mut route_demand = vec![0u32; routes.len()];

        for (route_idx, customers) in routes.iter().enumerate() {
            let anchor_id = NodeId(nodes.len());
            nodes.push(RouteNode { customer: depot, route: route_idx, prev: anchor_id, next: anchor_id });
            anchors.push(anchor_id);

            let mut tail = anchor_id;
            for &c in customers {
                let id = NodeId(nodes.len());
                nodes.push(RouteNode { customer: c, route: route_idx, prev: tail, next: anchor_id });
                nodes[tail.0].next = id;
                nodes[anchor_id.0].prev = id;
                customer_node[c] = Some(id);
                route_demand[route_idx] += instance.demand(c);
                tail = id;
            }
        }

        let mut sol = Solution { nodes, anchors, customer_node, route_demand, free: Vec::new(), f: 0.0, feasible: false };
        sol.evaluate(instance, 0.0);
        sol
    }

    pub fn num_routes(&self) -> usize {
        self.anchors.len()
    }

    pub fn objective(&self) -> f64 {
        self.f
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    pub fn route_demand(&self, route: usize) -> u32 {
        self.route_demand[route]
    }

    pub fn route_is_capacity_feasible(&self, route: usize, instance: &dyn CvrpInstance) -> bool {
        self.route_demand[route] <= instance.vehicle_capacity()
    }

    /// Which route currently holds `customer`.
    pub fn customer_route(&self, customer: usize) -> usize {
        let id = self.customer_node[customer].expect("customer must be present in the solution");
        self.nodes[id.0].route
    }

    /// Ordered list of customers in `route`, depot excluded.
    pub fn route_customers(&self, route: usize) -> Vec<usize> {
        let anchor = self.anchors[route];
        let mut out = Vec::new();
        let mut cur = self.nodes[anchor.0].next;
        while cur != anchor {
            out.push(self.nodes[cur.0].customer);
            cur = self.nodes[cur.0].next;
        }
        out
    }

    /// The unordered set of customer-adjacency edges across all routes.
    /// Depot edges are tagged with `instance.depot()` as one endpoint, so
    /// two depot-adjacent edges in different routes naturally compare equal
    /// when they share the same other endpoint.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &anchor in &self.anchors {
            let mut cur = anchor;
            loop {
                let next = self.nodes[cur.0].next;
                let a = self.nodes[cur.0].customer;
                let b = self.nodes[next.0].customer;
                out.push((a.min(b), a.max(b)));
                cur = next;
                if cur == anchor {
                    break;
                }
            }
        }
        out
    }

    /// Returns `(prev_customer, next_customer)` currently surrounding `customer`,
    /// using the depot id for an anchor neighbor.
    pub fn neighbors(&self, customer: usize) -> (usize, usize) {
        let id = self.customer_node[customer].expect("customer must be present in the solution");
        let node = &self.nodes[id.0];
        (self.nodes[node.prev.0].customer, self.nodes[node.next.0].customer)
    }

    /// Removes `customer` from its route, splicing its neighbors together.
    /// Returns the route it was removed from. The node slot is kept in the
    /// arena (but unlinked) so any previously captured indices compare
    /// harmlessly; callers address customers solely by id afterwards.
    pub fn remove_customer(&mut self, customer: usize, instance: &dyn CvrpInstance) -> usize {
        let id = self.customer_node[customer].expect("customer must be present in the solution");
        let (prev, next, route) = {
            let node = &self.nodes[id.0];
            (node.prev, node.next, node.route)
        };
        self.nodes[prev.0].next = next;
        self.nodes[next.0].prev = prev;
        self.customer_node[customer] = None;
        self.route_demand[route] -= instance.demand(customer);
        self.free.push(id);
        route
    }

    /// Inserts `customer` into `route` immediately after the node currently
    /// holding `after` (which may be the depot anchor itself).
    pub fn insert_after(&mut self, customer: usize, after: usize, route: usize, instance: &dyn CvrpInstance) {
        let after_id = if after == instance.depot() { self.anchors[route] } else { self.customer_node[after].expect("after must be present") };
        let next_id = self.nodes[after_id.0].next;
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = RouteNode { customer, route, prev: after_id, next: next_id };
                id
            }
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(RouteNode { customer, route, prev: after_id, next: next_id });
                id
            }
        };
        self.nodes[after_id.0].next = id;
        self.nodes[next_id.0].prev = id;
        self.customer_node[customer] = Some(id);
        self.route_demand[route] += instance.demand(customer);
    }

    /// The minimum-cost position to insert `customer` into `route`: the
    /// `(after_customer, delta_cost)` pair minimizing
    /// `d(prev,v) + d(v,next) - d(prev,next)` over all positions in the route.
    pub fn best_insertion_position(&self, customer: usize, route: usize, instance: &dyn CvrpInstance) -> (usize, f64) {
        let anchor = self.anchors[route];
        let mut cur = anchor;
        let mut best_after = instance.depot();
        let mut best_delta = f64::INFINITY;
        loop {
            let next = self.nodes[cur.0].next;
            let a = self.nodes[cur.0].customer;
            let b = self.nodes[next.0].customer;
            let delta = instance.distance(a, customer) + instance.distance(customer, b) - instance.distance(a, b);
            if delta < best_delta {
                best_delta = delta;
                best_after = a;
            }
            cur = next;
            if cur == anchor {
                break;
            }
        }
        (best_after, best_delta)
    }

    /// Inserts `customer` into `route` at its minimum-cost position.
    pub fn insert_best_position(&mut self, customer: usize, route: usize, instance: &dyn CvrpInstance) -> f64 {
        let (after, delta) = self.best_insertion_position(customer, route, instance);
        self.insert_after(customer, after, route, instance);
        delta
    }

    /// Recomputes `f` (route distance plus capacity penalty) and `feasible`.
    pub fn evaluate(&mut self, instance: &dyn CvrpInstance, capacity_penalty_weight: f64) {
        let mut total_distance = 0.0;
        for &anchor in &self.anchors {
            let mut cur = anchor;
            loop {
                let next = self.nodes[cur.0].next;
                total_distance += instance.distance(self.nodes[cur.0].customer, self.nodes[next.0].customer);
                cur = next;
                if cur == anchor {
                    break;
                }
            }
        }

        let capacity = instance.vehicle_capacity();
        let mut penalty = 0.0;
        let mut feasible = true;
        for &demand in &self.route_demand {
            if demand > capacity {
                feasible = false;
                penalty += (demand - capacity) as f64 * capacity_penalty_weight;
            }
        }

        self.f = total_distance + penalty;
        self.feasible = feasible;
    }
}
