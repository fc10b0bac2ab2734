//! Multimodal transport network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`, `edge_mode`)
//! are sorted by `(from, to)` and indexed by `EdgeId`, so a node's outgoing
//! edges are a contiguous scan and `edge_between` is a binary search.
//!
//! Road, rail and sea line strings share one node space: a location that
//! appears in several collections is a single junction node through which
//! shortest paths can change mode.  Transfers cost nothing.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over `[lon, lat]` answers bounding-box queries.
//! It only produces candidates; callers rank them by geodesic distance.

use std::collections::hash_map::Entry;

use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use ma_core::{EdgeId, GeoPoint, GeodesicError, NetworkConfig, NodeId, TransportMode};

use crate::NetworkResult;
use crate::node_index::SpatialNodeIndex;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lon, lat]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lon, lat]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

// ── BuildStats ────────────────────────────────────────────────────────────────

/// Counters collected while building, reported once by [`NetworkBuilder::build`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Line strings offered, per [`TransportMode::index`].
    pub line_strings: [usize; 3],
    /// Line strings with fewer than two points.
    pub skipped_line_strings: usize,
    /// Adjacent point pairs examined.
    pub segments: usize,
    /// Pairs whose endpoints collapsed onto one node.
    pub degenerate_segments: usize,
    /// Pairs with a non-finite coordinate.
    pub invalid_segments: usize,
    /// Directed inserts that hit an existing `(from, to)` pair.
    pub merged_duplicates: usize,
    /// Segments whose Vincenty solution did not converge and were measured
    /// on the mean sphere instead.
    pub geodesic_fallbacks: usize,
}

// ── TransportNetwork ──────────────────────────────────────────────────────────

/// Directed multimodal graph in CSR format plus a spatial index over nodes.
///
/// Immutable once built and `Send + Sync`, so matching, routing and matrix
/// rows can share it across threads.  Do not construct directly; use
/// [`NetworkBuilder`].
pub struct TransportNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge, used for route reconstruction.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Geodesic length of each edge in metres.  The shortest-path cost.
    pub edge_length_m: Vec<f64>,

    /// Collection each edge came from.
    pub edge_mode: Vec<TransportMode>,

    stats: BuildStats,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl TransportNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        NetworkBuilder::default().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Position of `node`, or `None` if the id is out of range.
    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.node_pos.get(node.index()).copied()
    }

    /// Counters recorded while this network was built.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// A contiguous index range.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The directed edge `from → to`, if any.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains(from) {
            return None;
        }
        let start = self.node_out_start[from.index()] as usize;
        let end   = self.node_out_start[from.index() + 1] as usize;
        self.edge_to[start..end]
            .binary_search(&to)
            .ok()
            .map(|offset| EdgeId((start + offset) as u32))
    }

    /// Cost of travelling directly from `from` to `to`: `0.0` for the same
    /// node, the edge length if an edge exists, `f64::INFINITY` otherwise.
    pub fn direct_cost(&self, from: NodeId, to: NodeId) -> f64 {
        if from == to && self.contains(from) {
            return 0.0;
        }
        self.edge_between(from, to)
            .map(|e| self.edge_length_m[e.index()])
            .unwrap_or(f64::INFINITY)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nodes whose position lies inside the `[lon, lat]` box spanned by
    /// `min` and `max` (inclusive).
    pub fn nodes_in_bbox(&self, min: GeoPoint, max: GeoPoint) -> impl Iterator<Item = NodeId> + '_ {
        let envelope = AABB::from_corners([min.lon, min.lat], [max.lon, max.lat]);
        self.spatial_idx
            .locate_in_envelope(&envelope)
            .map(|e| e.id)
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`TransportNetwork`] from line-string collections, then call
/// [`build`](Self::build).
///
/// Every adjacent vertex pair of a line string becomes a pair of directed
/// edges weighted by the geodesic length of the segment.  Re-inserting an
/// existing `(from, to)` pair keeps the smaller weight.
///
/// # Example
///
/// ```
/// use ma_core::{GeoPoint, TransportMode};
/// use ma_network::NetworkBuilder;
///
/// let mut b = NetworkBuilder::default();
/// b.add_line_string(TransportMode::Road, &[GeoPoint::new(100.0, 13.0), GeoPoint::new(100.1, 13.0)]);
/// b.add_line_string(TransportMode::Rail, &[GeoPoint::new(100.1, 13.0), GeoPoint::new(100.1, 13.2)]);
/// let net = b.build();
/// assert_eq!(net.node_count(), 3); // shared junction at (100.1, 13.0)
/// assert_eq!(net.edge_count(), 4);
/// ```
pub struct NetworkBuilder {
    index:     SpatialNodeIndex,
    raw_edges: Vec<RawEdge>,
    edge_slot: FxHashMap<(NodeId, NodeId), usize>,
    stats:     BuildStats,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
    mode:     TransportMode,
}

impl NetworkBuilder {
    /// Builder using `config.coord_precision` for vertex deduplication.
    pub fn new(config: &NetworkConfig) -> NetworkResult<Self> {
        config.validate()?;
        Ok(Self::with_precision(config.coord_precision))
    }

    /// Builder keeping `precision` decimal digits in deduplication keys.
    pub fn with_precision(precision: u8) -> Self {
        Self {
            index:     SpatialNodeIndex::new(precision),
            raw_edges: Vec::new(),
            edge_slot: FxHashMap::default(),
            stats:     BuildStats::default(),
        }
    }

    /// Add one line string.  Fewer than two points contributes nothing.
    pub fn add_line_string(&mut self, mode: TransportMode, line: &[GeoPoint]) {
        let lengths = segment_lengths(line);
        self.integrate(mode, line, &lengths);
    }

    /// Add a whole collection of one mode.
    ///
    /// With the `parallel` feature the geodesic lengths are computed on the
    /// Rayon pool; node ids are still assigned in collection order.
    pub fn add_line_strings<L>(&mut self, mode: TransportMode, lines: &[L])
    where
        L: AsRef<[GeoPoint]> + Sync,
    {
        #[cfg(feature = "parallel")]
        let lengths: Vec<Vec<Result<f64, GeodesicError>>> =
            lines.par_iter().map(|l| segment_lengths(l.as_ref())).collect();
        #[cfg(not(feature = "parallel"))]
        let lengths: Vec<Vec<Result<f64, GeodesicError>>> =
            lines.iter().map(|l| segment_lengths(l.as_ref())).collect();

        for (line, seg) in lines.iter().zip(&lengths) {
            self.integrate(mode, line.as_ref(), seg);
        }

        log::debug!(
            "added {} {mode} line strings ({} nodes, {} directed edges so far)",
            lines.len(),
            self.node_count(),
            self.edge_count(),
        );
    }

    /// Insert both directions between `a` and `b` with an explicit length.
    ///
    /// Returns `false` (and inserts nothing) when `a == b`, either node is
    /// unknown, or `length_m` is negative or not finite.
    pub fn add_segment(&mut self, a: NodeId, b: NodeId, length_m: f64, mode: TransportMode) -> bool {
        let known = a.index() < self.index.len() && b.index() < self.index.len();
        if a == b || !known || !length_m.is_finite() || length_m < 0.0 {
            return false;
        }
        self.insert_directed(a, b, length_m, mode);
        self.insert_directed(b, a, length_m, mode);
        true
    }

    /// Resolve `point` to a node, creating it if needed.
    pub fn node_for(&mut self, point: GeoPoint) -> Option<NodeId> {
        self.index.get_or_create(point)
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.index.position(id)
    }

    pub fn node_count(&self) -> usize { self.index.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }
    pub fn stats(&self) -> &BuildStats { &self.stats }

    /// Consume the builder and produce a [`TransportNetwork`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> TransportNetwork {
        let node_pos   = self.index.into_points();
        let node_count = node_pos.len();
        let edge_count = self.raw_edges.len();

        // Sort by (from, to): CSR order plus binary-searchable rows.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| (e.from, e.to));

        let edge_from:     Vec<NodeId>        = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId>        = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>           = raw.iter().map(|e| e.length_m).collect();
        let edge_mode:     Vec<TransportMode> = raw.iter().map(|e| e.mode).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = node_pos
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry {
                point: [pos.lon, pos.lat],
                id:    NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let stats = self.stats;
        log::info!(
            "built network: {node_count} nodes, {edge_count} directed edges \
             (road/rail/sea line strings {:?}, skipped {}, degenerate {}, invalid {}, merged {}, fallbacks {})",
            stats.line_strings,
            stats.skipped_line_strings,
            stats.degenerate_segments,
            stats.invalid_segments,
            stats.merged_duplicates,
            stats.geodesic_fallbacks,
        );
        if stats.geodesic_fallbacks > 0 {
            log::warn!(
                "{} segments used the great-circle fallback (Vincenty did not converge)",
                stats.geodesic_fallbacks
            );
        }

        TransportNetwork {
            node_pos,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_mode,
            stats,
            spatial_idx,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Turn one line string and its precomputed segment lengths into edges.
    fn integrate(&mut self, mode: TransportMode, line: &[GeoPoint], lengths: &[Result<f64, GeodesicError>]) {
        self.stats.line_strings[mode.index()] += 1;
        if line.len() < 2 {
            self.stats.skipped_line_strings += 1;
            return;
        }

        for (pair, length) in line.windows(2).zip(lengths) {
            self.stats.segments += 1;
            let (prev, cur) = (pair[0], pair[1]);

            let length_m = match *length {
                Ok(d) => d,
                Err(GeodesicError::NonConvergent { .. }) => {
                    self.stats.geodesic_fallbacks += 1;
                    prev.great_circle_m(cur)
                }
                Err(GeodesicError::NonFinite { .. }) => {
                    self.stats.invalid_segments += 1;
                    continue;
                }
            };

            let (Some(a), Some(b)) = (self.index.get_or_create(prev), self.index.get_or_create(cur)) else {
                self.stats.invalid_segments += 1;
                continue;
            };
            if a == b {
                self.stats.degenerate_segments += 1;
                continue;
            }

            self.insert_directed(a, b, length_m, mode);
            self.insert_directed(b, a, length_m, mode);
        }
    }

    /// Keep-minimum insert of one directed edge.
    fn insert_directed(&mut self, from: NodeId, to: NodeId, length_m: f64, mode: TransportMode) {
        match self.edge_slot.entry((from, to)) {
            Entry::Occupied(slot) => {
                self.stats.merged_duplicates += 1;
                let edge = &mut self.raw_edges[*slot.get()];
                if length_m < edge.length_m {
                    edge.length_m = length_m;
                    edge.mode = mode;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(self.raw_edges.len());
                self.raw_edges.push(RawEdge { from, to, length_m, mode });
            }
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::with_precision(NetworkConfig::default().coord_precision)
    }
}

/// Vincenty length of every adjacent pair; empty for short lines.
fn segment_lengths(line: &[GeoPoint]) -> Vec<Result<f64, GeodesicError>> {
    line.windows(2).map(|w| w[0].vincenty_m(w[1])).collect()
}
