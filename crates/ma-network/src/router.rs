//! Routing trait and default Dijkstra implementation.
//!
//! The matrix engine only needs distances; the router answers the follow-up
//! question of *how* a city pair is connected: which edges, and how many
//! metres of the path run on each transport mode.
//!
//! # Cost units
//!
//! All costs are geodesic metres (`f64`).

use std::collections::BinaryHeap;

use ma_core::{EdgeId, NodeId, TransportMode};

use crate::network::TransportNetwork;
use crate::search::State;
use crate::{NetworkError, NetworkResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A least-cost path between two nodes, with its length split by mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Edge sequence, source first.
    pub edges: Vec<EdgeId>,
    /// Sum of edge lengths in metres.
    pub total_length_m: f64,
    /// Metres per [`TransportMode::index`].
    pub length_by_mode: [f64; 3],
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn length_on(&self, mode: TransportMode) -> f64 {
        self.length_by_mode[mode.index()]
    }

    /// Modes with a non-zero share of the route, in `TransportMode::ALL` order.
    pub fn modes_used(&self) -> Vec<TransportMode> {
        TransportMode::ALL
            .into_iter()
            .filter(|m| self.length_on(*m) > 0.0)
            .collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Point-to-point path finding over a built network.
pub trait Router: Send + Sync {
    /// Compute the least-cost route from `from` to `to`.
    ///
    /// `from == to` is an empty route; a disconnected pair is
    /// [`NetworkError::NoRoute`].
    fn route(&self, network: &TransportNetwork, from: NodeId, to: NodeId) -> NetworkResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra search that stops as soon as `to` is popped.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &TransportNetwork, from: NodeId, to: NodeId) -> NetworkResult<Route> {
        for node in [from, to] {
            if !network.contains(node) {
                return Err(NetworkError::NodeNotFound(node));
            }
        }
        dijkstra(network, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(network: &TransportNetwork, from: NodeId, to: NodeId) -> NetworkResult<Route> {
    if from == to {
        return Ok(Route { edges: vec![], total_length_m: 0.0, length_by_mode: [0.0; 3] });
    }

    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    // Edge that last improved each node; INVALID at the source.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: from });

    while let Some(State { cost, node }) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, to, cost));
        }

        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let next = network.edge_to[edge.index()];
            let reached = cost + network.edge_length_m[edge.index()];
            if reached < dist[next.index()] {
                dist[next.index()] = reached;
                prev_edge[next.index()] = edge;
                heap.push(State { cost: reached, node: next });
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

fn reconstruct(network: &TransportNetwork, prev_edge: &[EdgeId], to: NodeId, total_length_m: f64) -> Route {
    let mut edges = Vec::new();
    let mut length_by_mode = [0.0; 3];
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        length_by_mode[network.edge_mode[e.index()].index()] += network.edge_length_m[e.index()];
        cur = network.edge_from[e.index()];
    }
    edges.reverse();
    Route { edges, total_length_m, length_by_mode }
}
