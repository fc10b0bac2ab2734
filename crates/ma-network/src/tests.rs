//! Unit tests for ma-network.
//!
//! All tests use hand-crafted line strings so they run without any GeoJSON.

#[cfg(test)]
mod helpers {
    use ma_core::{City, GeoPoint, TransportMode};
    use crate::{NetworkBuilder, TransportNetwork};

    pub fn pt(lon: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lon, lat)
    }

    /// A three-mode corridor plus a disconnected island.
    ///
    /// ```text
    ///   road: (0,0) ─ (1,0) ─ (2,0)
    ///   rail:                 (2,0) ─ (2,1)
    ///   sea:                          (2,1) ─ (3,1)
    ///   road (island): (50,50) ─ (50.1,50)
    /// ```
    ///
    /// Node ids follow first observation: 0:(0,0) 1:(1,0) 2:(2,0) 3:(2,1)
    /// 4:(3,1) 5:(50,50) 6:(50.1,50).
    pub fn corridor() -> TransportNetwork {
        let mut b = NetworkBuilder::default();
        b.add_line_strings(TransportMode::Road, &[vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)]]);
        b.add_line_strings(TransportMode::Rail, &[vec![pt(2.0, 0.0), pt(2.0, 1.0)]]);
        b.add_line_strings(TransportMode::Sea, &[vec![pt(2.0, 1.0), pt(3.0, 1.0)]]);
        b.add_line_string(TransportMode::Road, &[pt(50.0, 50.0), pt(50.1, 50.0)]);
        b.build()
    }

    /// A cyclic road mesh: 300 pseudo-random nodes in a 5°×5° box, each
    /// joined to 3 pseudo-random others.  Node `i` is the `i`-th point, so
    /// `NodeId(i)` is stable across runs.
    pub fn mesh() -> TransportNetwork {
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        let mut b = NetworkBuilder::default();
        let points: Vec<GeoPoint> = (0..300)
            .map(|_| {
                let lon = (next() % 5_000_000) as f64 * 1e-6;
                let lat = (next() % 5_000_000) as f64 * 1e-6;
                pt(lon, lat)
            })
            .collect();
        for &p in &points {
            b.node_for(p).unwrap();
        }
        for (i, &p) in points.iter().enumerate() {
            for _ in 0..3 {
                let j = (next() % points.len() as u64) as usize;
                if j != i {
                    b.add_line_string(TransportMode::Road, &[p, points[j]]);
                }
            }
        }
        b.build()
    }

    /// Cities around [`corridor`]: 0 on the road head, 1 about 111 m off the
    /// rail junction, 2 on the sea end, 3 on the island, 4 far from all.
    pub fn cities() -> Vec<City> {
        vec![
            City::new("Alpha", 100, pt(0.0, 0.0)),
            City::new("Bravo", 200, pt(2.0, 0.001)),
            City::new("Charlie", 300, pt(3.0, 1.0)),
            City::new("Delta", 400, pt(50.0, 50.0)),
            City::new("Echo", 500, pt(10.0, -10.0)),
        ]
    }
}

// ── Node index ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod node_index {
    use super::helpers::pt;
    use ma_core::NodeId;
    use crate::SpatialNodeIndex;

    #[test]
    fn ids_follow_first_observation() {
        let mut idx = SpatialNodeIndex::new(7);
        assert_eq!(idx.get_or_create(pt(5.0, 5.0)), Some(NodeId(0)));
        assert_eq!(idx.get_or_create(pt(1.0, 1.0)), Some(NodeId(1)));
        assert_eq!(idx.get_or_create(pt(5.0, 5.0)), Some(NodeId(0)));
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn sub_precision_noise_collapses() {
        let mut idx = SpatialNodeIndex::new(7);
        let a = idx.get_or_create(pt(100.123_456_7, 13.5)).unwrap();
        let b = idx.get_or_create(pt(100.123_456_700_000_1, 13.500_000_000_01)).unwrap();
        assert_eq!(a, b);
        // Position is the first raw point observed.
        assert_eq!(idx.position(a), Some(pt(100.123_456_7, 13.5)));
    }

    #[test]
    fn distinct_at_precision_stay_distinct() {
        let mut idx = SpatialNodeIndex::new(7);
        let a = idx.get_or_create(pt(0.0, 0.0));
        let b = idx.get_or_create(pt(0.000_001, 0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn non_finite_points_get_no_node() {
        let mut idx = SpatialNodeIndex::new(7);
        let origin = idx.get_or_create(pt(0.0, 3.0)).unwrap();
        assert_eq!(idx.key(pt(f64::NAN, 3.0)), None);
        assert_eq!(idx.get_or_create(pt(f64::NAN, 3.0)), None);
        assert_eq!(idx.get_or_create(pt(0.0, f64::INFINITY)), None);
        assert_eq!(idx.get_or_create(pt(0.0, 3.0)), Some(origin));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn get_does_not_insert() {
        let idx = SpatialNodeIndex::new(7);
        assert_eq!(idx.get(pt(1.0, 2.0)), None);
        assert_eq!(idx.get(pt(f64::NAN, 2.0)), None);
        assert!(idx.is_empty());
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::helpers::{corridor, pt};
    use ma_core::{NetworkConfig, NodeId, TransportMode};
    use crate::NetworkBuilder;

    #[test]
    fn empty_build() {
        let net = NetworkBuilder::default().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn single_two_point_line() {
        let (p0, p1) = (pt(100.5, 13.7), pt(100.6, 13.8));
        let mut b = NetworkBuilder::default();
        b.add_line_string(TransportMode::Road, &[p0, p1]);
        let net = b.build();

        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 2);
        let expected = p0.vincenty_m(p1).unwrap();
        for w in &net.edge_length_m {
            assert_eq!(*w, expected);
        }
        assert_eq!(net.edge_from[0], net.edge_to[1]);
        assert_eq!(net.edge_to[0], net.edge_from[1]);
    }

    #[test]
    fn shared_endpoint_is_one_node() {
        let mut b = NetworkBuilder::default();
        b.add_line_string(TransportMode::Road, &[pt(0.0, 0.0), pt(1.0, 0.0)]);
        b.add_line_string(TransportMode::Road, &[pt(1.0, 0.0), pt(1.0, 1.0)]);
        let net = b.build();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.out_degree(NodeId(1)), 2);
    }

    #[test]
    fn modes_meet_at_coincident_points() {
        let net = corridor();
        assert_eq!(net.node_count(), 7);
        assert_eq!(net.edge_count(), 10);

        let junction = NodeId(2);
        let modes: Vec<_> = net
            .out_edges(junction)
            .map(|e| net.edge_mode[e.index()])
            .collect();
        assert!(modes.contains(&TransportMode::Road));
        assert!(modes.contains(&TransportMode::Rail));
        assert_eq!(net.stats().line_strings, [2, 1, 1]);
    }

    #[test]
    fn short_line_strings_are_skipped() {
        let mut b = NetworkBuilder::default();
        b.add_line_strings::<Vec<_>>(TransportMode::Rail, &[vec![], vec![pt(1.0, 1.0)]]);
        let net = b.build();
        assert!(net.is_empty());
        assert_eq!(net.stats().skipped_line_strings, 2);
    }

    #[test]
    fn coincident_vertices_add_no_self_loop() {
        let mut b = NetworkBuilder::default();
        b.add_line_string(TransportMode::Road, &[pt(0.0, 0.0), pt(0.0, 0.0), pt(0.1, 0.0)]);
        let net = b.build();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.stats().degenerate_segments, 1);
        for e in 0..net.edge_count() {
            assert_ne!(net.edge_from[e], net.edge_to[e]);
        }
    }

    #[test]
    fn non_finite_vertex_drops_its_segments() {
        let mut b = NetworkBuilder::default();
        b.add_line_string(
            TransportMode::Road,
            &[pt(0.0, 0.0), pt(f64::NAN, 0.0), pt(0.2, 0.0), pt(0.3, 0.0)],
        );
        let net = b.build();
        assert_eq!(net.stats().invalid_segments, 2);
        assert_eq!(net.node_count(), 2);
        assert!(net.edge_length_m.iter().all(|w| w.is_finite() && *w >= 0.0));
    }

    #[test]
    fn non_convergent_segment_uses_great_circle() {
        let mut b = NetworkBuilder::default();
        b.add_line_string(TransportMode::Sea, &[pt(0.0, 0.0), pt(180.0, 0.0)]);
        let net = b.build();
        assert_eq!(net.stats().geodesic_fallbacks, 1);
        assert_eq!(net.edge_count(), 2);
        let half = std::f64::consts::PI * ma_core::geo::MEAN_RADIUS_M;
        assert!((net.edge_length_m[0] - half).abs() < 1e-3 * half);
        assert_eq!(net.edge_length_m[0], net.edge_length_m[1]);
    }

    #[test]
    fn duplicate_insert_keeps_minimum() {
        let mut b = NetworkBuilder::default();
        let a = b.node_for(pt(0.0, 0.0)).unwrap();
        let c = b.node_for(pt(0.0, 1.0)).unwrap();
        assert!(b.add_segment(a, c, 500.0, TransportMode::Road));
        assert!(b.add_segment(a, c, 300.0, TransportMode::Rail));
        assert!(b.add_segment(a, c, 800.0, TransportMode::Sea));
        assert_eq!(b.edge_count(), 2);
        assert_eq!(b.stats().merged_duplicates, 4);

        let net = b.build();
        let e = net.edge_between(a, c).unwrap();
        assert_eq!(net.edge_length_m[e.index()], 300.0);
        assert_eq!(net.edge_mode[e.index()], TransportMode::Rail);
        assert_eq!(net.direct_cost(c, a), 300.0);
    }

    #[test]
    fn add_segment_rejects_bad_input() {
        let mut b = NetworkBuilder::default();
        let a = b.node_for(pt(0.0, 0.0)).unwrap();
        let c = b.node_for(pt(0.0, 1.0)).unwrap();
        assert!(!b.add_segment(a, a, 10.0, TransportMode::Road));
        assert!(!b.add_segment(a, c, -1.0, TransportMode::Road));
        assert!(!b.add_segment(a, c, f64::NAN, TransportMode::Road));
        assert!(!b.add_segment(a, NodeId(9), 10.0, TransportMode::Road));
        assert_eq!(b.edge_count(), 0);
    }

    #[test]
    fn csr_rows_sorted_and_searchable() {
        let net = corridor();
        for n in 0..net.node_count() {
            let node = NodeId(n as u32);
            let targets: Vec<_> = net.out_edges(node).map(|e| net.edge_to[e.index()]).collect();
            assert!(targets.windows(2).all(|w| w[0] < w[1]));
            for e in net.out_edges(node) {
                assert_eq!(net.edge_from[e.index()], node);
                assert_eq!(net.edge_between(node, net.edge_to[e.index()]), Some(e));
            }
        }
        assert_eq!(net.edge_between(NodeId(0), NodeId(4)), None);
    }

    #[test]
    fn direct_cost_sentinels() {
        let net = corridor();
        assert_eq!(net.direct_cost(NodeId(3), NodeId(3)), 0.0);
        assert_eq!(net.direct_cost(NodeId(0), NodeId(5)), f64::INFINITY);
    }

    #[test]
    fn ids_identical_across_collection_and_single_adds() {
        let lines = vec![
            vec![pt(3.0, 3.0), pt(1.0, 1.0)],
            vec![pt(1.0, 1.0), pt(2.0, 2.0)],
        ];
        let mut batch = NetworkBuilder::default();
        batch.add_line_strings(TransportMode::Road, &lines);
        let mut single = NetworkBuilder::default();
        for l in &lines {
            single.add_line_string(TransportMode::Road, l);
        }
        let (a, b) = (batch.build(), single.build());
        assert_eq!(a.node_pos, b.node_pos);
        assert_eq!(a.edge_to, b.edge_to);
        assert_eq!(a.node_pos[0], pt(3.0, 3.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = NetworkConfig { coord_precision: 40, ..NetworkConfig::default() };
        assert!(NetworkBuilder::new(&cfg).is_err());
    }
}

// ── City snapping ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod matcher {
    use super::helpers::{cities, corridor, pt};
    use ma_core::{City, CityId, NodeId, TransportMode};
    use crate::matcher::search_boxes;
    use crate::{CityNodeMatcher, NetworkBuilder, TransportNetwork};

    #[test]
    fn snaps_within_radius_and_reports_the_rest() {
        let net = corridor();
        let m = CityNodeMatcher::new(5_000.0).unwrap().match_cities(&net, &cities());

        assert_eq!(m.city_count(), 5);
        assert_eq!(m.unmatched, vec![CityId(4)]);
        assert_eq!(m.node_of(CityId(0)), Some(NodeId(0)));
        assert_eq!(m.node_of(CityId(1)), Some(NodeId(2)));
        assert_eq!(m.node_of(CityId(2)), Some(NodeId(4)));
        assert_eq!(m.node_of(CityId(3)), Some(NodeId(5)));
        assert!(!m.is_matched(CityId(4)));

        assert_eq!(m.matched[0].snap_distance_m, 0.0);
        let off = m.matched[1].snap_distance_m;
        assert!((off - 110.6).abs() < 1.0, "got {off}");
    }

    #[test]
    fn zero_radius_only_matches_exact_positions() {
        let net = corridor();
        let m = CityNodeMatcher::new(0.0).unwrap().match_cities(&net, &cities());
        assert_eq!(m.unmatched, vec![CityId(1), CityId(4)]);
    }

    #[test]
    fn equidistant_nodes_pick_lowest_id() {
        for east_first in [true, false] {
            let (east, west) = (pt(0.01, 0.0), pt(-0.01, 0.0));
            let mut b = NetworkBuilder::default();
            let (first, second) = if east_first { (east, west) } else { (west, east) };
            b.add_line_string(TransportMode::Road, &[first, pt(first.lon, 1.0)]);
            b.add_line_string(TransportMode::Road, &[second, pt(second.lon, 1.0)]);
            let net = b.build();

            let (node, _) = CityNodeMatcher::new(5_000.0)
                .unwrap()
                .nearest_node(&net, pt(0.0, 0.0))
                .unwrap();
            assert_eq!(node, NodeId(0), "east_first = {east_first}");
        }
    }

    #[test]
    fn snaps_across_antimeridian() {
        let mut b = NetworkBuilder::default();
        b.add_line_string(TransportMode::Sea, &[pt(-179.99, 0.0), pt(-179.5, 0.0)]);
        let net = b.build();
        let found = CityNodeMatcher::new(5_000.0).unwrap().nearest_node(&net, pt(179.99, 0.0));
        let (node, d) = found.unwrap();
        assert_eq!(node, NodeId(0));
        assert!(d < 2_300.0, "got {d}");
    }

    #[test]
    fn agrees_with_brute_force() {
        let mut b = NetworkBuilder::default();
        for row in 0..10 {
            let line: Vec<_> = (0..10).map(|c| pt(30.0 + c as f64 * 0.013, 60.0 + row as f64 * 0.007)).collect();
            b.add_line_string(TransportMode::Road, &line);
        }
        let net = b.build();
        let matcher = CityNodeMatcher::new(3_000.0).unwrap();

        let brute = |net: &TransportNetwork, pos| {
            (0..net.node_count())
                .map(|i| (NodeId(i as u32), pt_dist(net.node_pos[i], pos)))
                .filter(|&(_, d)| d <= 3_000.0)
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        };

        for k in 0..25 {
            let pos = pt(29.98 + k as f64 * 0.0071, 59.99 + (k % 7) as f64 * 0.0113);
            assert_eq!(matcher.nearest_node(&net, pos), brute(&net, pos), "probe {pos}");
        }
    }

    fn pt_dist(a: ma_core::GeoPoint, b: ma_core::GeoPoint) -> f64 {
        a.distance_m(b)
    }

    #[test]
    fn empty_network_matches_nothing() {
        let net = TransportNetwork::empty();
        let m = CityNodeMatcher::new(1e6).unwrap().match_cities(&net, &[City::new("x", 1, pt(0.0, 0.0))]);
        assert!(m.matched.is_empty());
        assert_eq!(m.unmatched, vec![CityId(0)]);
    }

    #[test]
    fn rejects_invalid_radius() {
        assert!(CityNodeMatcher::new(-5.0).is_err());
        assert!(CityNodeMatcher::new(f64::INFINITY).is_err());
    }

    #[test]
    fn box_splits_at_antimeridian() {
        let boxes = search_boxes(pt(179.99, 0.0), 5_000.0);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[1].0.lon, -180.0);
        assert!(boxes[1].1.lon > -180.0 && boxes[1].1.lon < -179.9);
    }

    #[test]
    fn box_near_pole_covers_all_longitudes() {
        let boxes = search_boxes(pt(10.0, 89.99), 5_000.0);
        assert_eq!(boxes.len(), 1);
        assert_eq!((boxes[0].0.lon, boxes[0].1.lon), (-180.0, 180.0));
        assert_eq!(boxes[0].1.lat, 90.0);
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::helpers::{corridor, pt};
    use ma_core::{NodeId, TransportMode};
    use crate::{DijkstraRouter, NetworkError, Router};

    #[test]
    fn trivial_same_node() {
        let net = corridor();
        let r = DijkstraRouter.route(&net, NodeId(1), NodeId(1)).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.total_length_m, 0.0);
    }

    #[test]
    fn multimodal_path_breakdown() {
        let net = corridor();
        let r = DijkstraRouter.route(&net, NodeId(0), NodeId(4)).unwrap();
        assert_eq!(r.edges.len(), 4);

        let road = pt(0.0, 0.0).distance_m(pt(1.0, 0.0)) + pt(1.0, 0.0).distance_m(pt(2.0, 0.0));
        let rail = pt(2.0, 0.0).distance_m(pt(2.0, 1.0));
        let sea  = pt(2.0, 1.0).distance_m(pt(3.0, 1.0));
        assert!((r.length_on(TransportMode::Road) - road).abs() < 1e-6);
        assert!((r.length_on(TransportMode::Rail) - rail).abs() < 1e-6);
        assert!((r.length_on(TransportMode::Sea) - sea).abs() < 1e-6);
        assert!((r.total_length_m - (road + rail + sea)).abs() < 1e-6);
        assert_eq!(r.modes_used(), TransportMode::ALL.to_vec());

        // Edge sequence is connected.
        assert_eq!(net.edge_from[r.edges[0].index()], NodeId(0));
        for w in r.edges.windows(2) {
            assert_eq!(net.edge_to[w[0].index()], net.edge_from[w[1].index()]);
        }
        assert_eq!(net.edge_to[r.edges[3].index()], NodeId(4));
    }

    #[test]
    fn no_route_disconnected() {
        let net = corridor();
        let result = DijkstraRouter.route(&net, NodeId(0), NodeId(6));
        assert!(matches!(result, Err(NetworkError::NoRoute { .. })));
    }

    #[test]
    fn unknown_node() {
        let net = corridor();
        let result = DijkstraRouter.route(&net, NodeId(0), NodeId(99));
        assert!(matches!(result, Err(NetworkError::NodeNotFound(NodeId(99)))));
    }
}

// ── Cost matrix ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod matrix {
    use super::helpers::{cities, corridor, mesh, pt};
    use ma_core::{CityId, NodeId, TransportMode};
    use crate::{
        CityNodeMatcher, CostMatrix, CostMatrixEngine, DijkstraRouter, NetworkBuilder, NetworkError,
        Router, TransportNetwork, UNREACHABLE,
    };

    fn corridor_matrix() -> CostMatrix {
        let net = corridor();
        let matches = CityNodeMatcher::new(5_000.0).unwrap().match_cities(&net, &cities());
        CostMatrixEngine::new(&net).compute(&matches).unwrap()
    }

    #[test]
    fn only_matched_cities_appear() {
        let m = corridor_matrix();
        assert_eq!(m.len(), 4);
        assert_eq!(m.cities(), &[CityId(0), CityId(1), CityId(2), CityId(3)]);
        assert_eq!(m.get(CityId(0), CityId(4)), None);
        assert_eq!(m.get(CityId(4), CityId(4)), None);
    }

    #[test]
    fn diagonal_is_zero() {
        let m = corridor_matrix();
        for i in 0..m.len() {
            assert_eq!(m.cost(i, i), 0.0);
        }
    }

    /// Every fifth mesh node as a city: 60 cities.
    fn mesh_matrix() -> (TransportNetwork, CostMatrix) {
        let net = mesh();
        let pairs: Vec<(CityId, NodeId)> =
            (0..60u32).map(|i| (CityId(i), NodeId(i * 5))).collect();
        let m = CostMatrixEngine::new(&net).compute_for(&pairs).unwrap();
        (net, m)
    }

    fn assert_symmetric(m: &CostMatrix) {
        for a in 0..m.len() {
            for b in 0..m.len() {
                let (ab, ba) = (m.cost(a, b), m.cost(b, a));
                assert!(ab.to_bits() == ba.to_bits(), "{a}->{b}: {ab} vs {ba}");
            }
        }
    }

    #[test]
    fn symmetric() {
        assert_symmetric(&corridor_matrix());
    }

    #[test]
    fn symmetric_on_cyclic_graph() {
        let (net, m) = mesh_matrix();
        assert!(net.edge_count() > 2 * net.node_count(), "mesh should have cycles");
        assert!(m.reachable_pairs() > 0);
        assert_symmetric(&m);
    }

    #[test]
    fn triangle_inequality() {
        let (_, m) = mesh_matrix();
        let n = m.len();
        let mut checked = 0;
        for a in 0..n {
            for b in 0..n {
                for c in 0..n {
                    let (ab, bc, ac) = (m.cost(a, b), m.cost(b, c), m.cost(a, c));
                    if ab.is_finite() && bc.is_finite() {
                        assert!(ac <= (ab + bc) * (1.0 + 1e-12), "{a}->{c} = {ac} > {ab} + {bc}");
                        checked += 1;
                    }
                }
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn mesh_agrees_with_router() {
        let (net, m) = mesh_matrix();
        for (i, &a) in m.nodes().iter().enumerate().step_by(7) {
            for (j, &b) in m.nodes().iter().enumerate() {
                match DijkstraRouter.route(&net, a, b) {
                    Ok(r) => {
                        let c = m.cost(i, j);
                        assert!((r.total_length_m - c).abs() <= c * 1e-12, "{i}->{j}");
                    }
                    Err(_) => assert_eq!(m.cost(i, j), UNREACHABLE),
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn cost_rejects_row_out_of_range() {
        let m = corridor_matrix();
        m.cost(m.len(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn row_rejects_index_out_of_range() {
        let m = corridor_matrix();
        m.row(m.len());
    }

    #[test]
    fn disconnected_components_are_unreachable() {
        let m = corridor_matrix();
        assert_eq!(m.get(CityId(0), CityId(3)), Some(UNREACHABLE));
        assert_eq!(m.get(CityId(3), CityId(2)), Some(UNREACHABLE));
        // Alpha, Bravo, Charlie are mutually reachable: 3 * 2 ordered pairs.
        assert_eq!(m.reachable_pairs(), 6);
    }

    #[test]
    fn cost_is_sum_of_path_segments() {
        let m = corridor_matrix();
        let expected = pt(0.0, 0.0).distance_m(pt(1.0, 0.0))
            + pt(1.0, 0.0).distance_m(pt(2.0, 0.0))
            + pt(2.0, 0.0).distance_m(pt(2.0, 1.0))
            + pt(2.0, 1.0).distance_m(pt(3.0, 1.0));
        let got = m.get(CityId(0), CityId(2)).unwrap();
        assert!((got - expected).abs() < 1e-6, "got {got}, expected {expected}");
    }

    #[test]
    fn agrees_with_router() {
        let net = corridor();
        let matches = CityNodeMatcher::new(5_000.0).unwrap().match_cities(&net, &cities());
        let m = CostMatrixEngine::new(&net).compute(&matches).unwrap();
        for (i, &a) in m.nodes().iter().enumerate() {
            for (j, &b) in m.nodes().iter().enumerate() {
                match DijkstraRouter.route(&net, a, b) {
                    Ok(r) => assert!((r.total_length_m - m.cost(i, j)).abs() < 1e-6),
                    Err(_) => assert_eq!(m.cost(i, j), UNREACHABLE),
                }
            }
        }
    }

    #[test]
    fn shorter_mode_wins() {
        // Road detours via (1,1); rail goes straight.
        let mut b = NetworkBuilder::default();
        b.add_line_string(TransportMode::Road, &[pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 0.0)]);
        b.add_line_string(TransportMode::Rail, &[pt(0.0, 0.0), pt(2.0, 0.0)]);
        let net = b.build();
        let m = CostMatrixEngine::new(&net)
            .compute_for(&[(CityId(0), NodeId(0)), (CityId(1), NodeId(2))])
            .unwrap();
        let rail = pt(0.0, 0.0).distance_m(pt(2.0, 0.0));
        assert!((m.cost(0, 1) - rail).abs() < 1e-6);
    }

    #[test]
    fn cities_sharing_a_node_cost_nothing() {
        let net = corridor();
        let m = CostMatrixEngine::new(&net)
            .compute_for(&[(CityId(5), NodeId(1)), (CityId(2), NodeId(1))])
            .unwrap();
        assert_eq!(m.cities(), &[CityId(2), CityId(5)]);
        assert_eq!(m.cost(0, 1), 0.0);
        assert_eq!(m.iter().count(), 4);
    }

    #[test]
    fn foreign_node_is_an_error() {
        let net = corridor();
        let result = CostMatrixEngine::new(&net).compute_for(&[(CityId(0), NodeId(1_000))]);
        assert!(matches!(result, Err(NetworkError::NodeNotFound(_))));
    }

    #[test]
    fn empty_matches_give_empty_matrix() {
        let net = corridor();
        let m = CostMatrixEngine::new(&net).compute_for(&[]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.reachable_pairs(), 0);
    }
}
