//! City-to-city least-cost distance matrix.
//!
//! Every edge is stored in both directions with the same length, so the
//! matrix is symmetric.  Row `i` runs one Dijkstra from city `i` that stops
//! once the nodes of cities `i+1..` are settled; each cost fills both
//! `(i, j)` and `(j, i)`, which keeps the two entries bit-identical.  Rows
//! are independent reads of the shared network; with the `parallel` feature
//! they run on the Rayon pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use ma_core::{CityId, NodeId};

use crate::matcher::CityMatches;
use crate::network::TransportNetwork;
use crate::search::one_to_many;
use crate::{NetworkError, NetworkResult};

/// Cost of a pair with no connecting path.
pub const UNREACHABLE: f64 = f64::INFINITY;

// ── CostMatrix ────────────────────────────────────────────────────────────────

/// Square matrix of least-cost distances (metres) between matched cities.
///
/// Row and column `i` both refer to `cities()[i]`, in ascending `CityId`
/// order.  The diagonal is `0.0`; unreachable pairs hold [`UNREACHABLE`].
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    cities: Vec<CityId>,
    nodes:  Vec<NodeId>,
    costs:  Vec<f64>, // row-major, len = n * n
}

impl CostMatrix {
    /// Number of rows (matched cities).
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn cities(&self) -> &[CityId] {
        &self.cities
    }

    /// Node of each row's city.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Row/column index of `city`, if it is in the matrix.
    pub fn position(&self, city: CityId) -> Option<usize> {
        self.cities.binary_search(&city).ok()
    }

    /// Cost at `(row, col)`.
    ///
    /// # Panics
    /// Panics if either index is `>= len()`.
    #[inline]
    pub fn cost(&self, row: usize, col: usize) -> f64 {
        let n = self.len();
        assert!(row < n && col < n, "({row}, {col}) out of range for {n}×{n} matrix");
        self.costs[row * n + col]
    }

    /// # Panics
    /// Panics if `row >= len()`.
    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.len();
        assert!(row < n, "row {row} out of range for {n}×{n} matrix");
        &self.costs[row * n..(row + 1) * n]
    }

    /// Cost from city `a` to city `b`; `None` if either was not matched.
    pub fn get(&self, a: CityId, b: CityId) -> Option<f64> {
        Some(self.cost(self.position(a)?, self.position(b)?))
    }

    /// Ordered pairs of distinct cities with a finite cost.
    pub fn reachable_pairs(&self) -> usize {
        let n = self.len();
        (0..n)
            .flat_map(|r| (0..n).map(move |c| (r, c)))
            .filter(|&(r, c)| r != c && self.cost(r, c).is_finite())
            .count()
    }

    /// Iterator over `(from, to, cost)` for every ordered pair, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (CityId, CityId, f64)> + '_ {
        let n = self.len();
        self.costs
            .iter()
            .enumerate()
            .map(move |(i, &c)| (self.cities[i / n], self.cities[i % n], c))
    }
}

// ── CostMatrixEngine ──────────────────────────────────────────────────────────

/// Computes [`CostMatrix`]es over one immutable network.
pub struct CostMatrixEngine<'a> {
    network: &'a TransportNetwork,
}

impl<'a> CostMatrixEngine<'a> {
    pub fn new(network: &'a TransportNetwork) -> Self {
        Self { network }
    }

    /// Matrix over the matched cities of `matches`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::NodeNotFound`] if a match refers to a node outside
    /// this network (matches computed against a different network).
    pub fn compute(&self, matches: &CityMatches) -> NetworkResult<CostMatrix> {
        let pairs: Vec<(CityId, NodeId)> = matches.matched.iter().map(|m| (m.city, m.node)).collect();
        self.compute_for(&pairs)
    }

    /// Matrix over explicit `(city, node)` pairs.  Pairs are sorted by
    /// `CityId`; a city listed twice keeps its first node.
    pub fn compute_for(&self, pairs: &[(CityId, NodeId)]) -> NetworkResult<CostMatrix> {
        let mut pairs = pairs.to_vec();
        pairs.sort_by_key(|&(city, _)| city);
        pairs.dedup_by_key(|&mut (city, _)| city);

        if let Some(&(_, node)) = pairs.iter().find(|&&(_, node)| !self.network.contains(node)) {
            return Err(NetworkError::NodeNotFound(node));
        }

        let nodes: Vec<NodeId> = pairs.iter().map(|&(_, node)| node).collect();
        let n = nodes.len();

        // Costs from city `i` to cities `i+1..`.
        let upper_row = |i: usize| -> Vec<f64> {
            let later = &nodes[i + 1..];
            if later.is_empty() {
                return Vec::new();
            }
            let mut is_target = vec![false; self.network.node_count()];
            let mut target_count = 0;
            for t in later {
                if !is_target[t.index()] {
                    is_target[t.index()] = true;
                    target_count += 1;
                }
            }
            let dist = one_to_many(self.network, nodes[i], &is_target, target_count);
            later.iter().map(|t| dist[t.index()]).collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = (0..n).into_par_iter().map(upper_row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (0..n).map(upper_row).collect();

        let mut costs = vec![0.0; n * n];
        for (i, row) in rows.iter().enumerate() {
            for (offset, &cost) in row.iter().enumerate() {
                let j = i + 1 + offset;
                costs[i * n + j] = cost;
                costs[j * n + i] = cost;
            }
        }

        let matrix = CostMatrix {
            cities: pairs.iter().map(|&(city, _)| city).collect(),
            nodes,
            costs,
        };
        log::info!(
            "cost matrix: {n} cities, {} of {} ordered pairs reachable",
            matrix.reachable_pairs(),
            n * n.saturating_sub(1),
        );
        Ok(matrix)
    }
}
