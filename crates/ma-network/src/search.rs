//! Dijkstra primitives shared by the router and the matrix engine.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ma_core::NodeId;

use crate::network::TransportNetwork;

/// Heap entry.  Ordered so `BinaryHeap` pops the smallest cost first, with
/// the lower `NodeId` winning ties for deterministic settling order.
#[derive(Copy, Clone, PartialEq)]
pub(crate) struct State {
    pub(crate) cost: f64,
    pub(crate) node: NodeId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source distances from `source`, stopping early once every node
/// flagged in `is_target` has been settled.
///
/// `target_count` is the number of `true` entries in `is_target`.  Entries
/// for nodes never reached stay `f64::INFINITY`.
pub(crate) fn one_to_many(
    network:      &TransportNetwork,
    source:       NodeId,
    is_target:    &[bool],
    target_count: usize,
) -> Vec<f64> {
    let n = network.node_count();
    let mut dist    = vec![f64::INFINITY; n];
    let mut settled = vec![false; n];
    let mut remaining = target_count;

    dist[source.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: source });

    while let Some(State { cost, node }) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if is_target[node.index()] {
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }

        for edge in network.out_edges(node) {
            let next = network.edge_to[edge.index()];
            let new_cost = cost + network.edge_length_m[edge.index()];
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                heap.push(State { cost: new_cost, node: next });
            }
        }
    }

    dist
}
