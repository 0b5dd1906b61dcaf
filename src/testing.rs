/// Every graph representation should pass the same battery of tests
macro_rules! test_graph_ops {
    ($env:ident, $graph:ident, ($($trait:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{ops::*, repr::*, testing::test_graph_ops, *};
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;
            use itertools::Itertools;

            /// Creates a list of at most `m_ub` random directed edges with integral weights for nodes `0..n`
            fn random_edges<R: Rng>(rng: &mut R, n: NumNodes, m_ub: NumEdges) -> Vec<Edge> {
                let mut edges: Vec<Edge> = (0..m_ub).map(|_| {
                    let u = rng.random_range(0..n);
                    let v = rng.random_range(0..n);
                    Edge(u, v, rng.random_range(1..100) as Weight)
                }).collect_vec();
                edges.sort_unstable_by_key(|e| e.endpoints());
                edges.dedup_by_key(|e| e.endpoints());

                edges
            }

            $(
                test_graph_ops!($graph: $trait);
            )*
        }
    };
    ($graph:ident: GraphNew) => {
        #[test]
        fn graph_new() {
            for n in 1..50 {
                let graph = <$graph>::new(n);

                assert_eq!(graph.number_of_edges(), 0);
                assert_eq!(graph.number_of_nodes(), n);
                assert!(graph.is_directed());

                assert_eq!(graph.vertices().len(), n as usize);
                assert_eq!(graph.vertices().collect_vec(), (0..n).collect_vec());

                let isolated = <$graph>::new_undirected(n).isolated();
                assert!(isolated.is_undirected());
                assert_eq!(isolated.number_of_nodes(), n);
                assert_eq!(graph.isolated_with(n + 1).number_of_nodes(), n + 1);
            }
        }
    };
    ($graph:ident: WeightedAdjacencyList) => {
        #[test]
        fn test_weighted_adjacency_list() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [10 as NumNodes, 20, 50] {
                for m_ub in [n * 2, n * 5, n * 10] {
                    for _ in 0..10 {
                        let edges = random_edges(rng, n, m_ub as NumEdges);

                        let mut weights = vec![vec![None; n as usize]; n as usize];
                        let mut in_degrees = vec![0 as NumNodes; n as usize];
                        for &Edge(u, v, w) in &edges {
                            weights[u as usize][v as usize] = Some(w);
                            in_degrees[v as usize] += 1;
                        }

                        let graph = <$graph>::from_edges(n, edges.iter());

                        assert_eq!(graph.number_of_nodes(), n);
                        assert_eq!(graph.number_of_edges(), edges.len() as NumEdges);
                        assert_eq!(edges, graph.ordered_edges(false).collect_vec());

                        for u in 0..n {
                            let row = &weights[u as usize];
                            assert_eq!(
                                graph.out_degree_of(u),
                                row.iter().filter(|w| w.is_some()).count() as NumNodes
                            );
                            assert_eq!(graph.in_degree_of(u), in_degrees[u as usize]);
                            for v in 0..n {
                                assert_eq!(graph.edge_weight(u, v), row[v as usize]);
                            }
                            assert_eq!(
                                graph.out_weight_of(u),
                                row.iter().flatten().sum::<Weight>()
                            );
                        }
                    }
                }
            }
        }
    };
    ($graph:ident: WeightedEdgeEditing) => {
        #[test]
        fn test_weighted_edge_editing() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [10 as NumNodes, 20, 50] {
                for m_ub in [n * 2, n * 5, n * 10] {
                    let edges = random_edges(rng, n, m_ub as NumEdges);
                    let mut graph = <$graph>::new(n);

                    for &Edge(u, v, w) in &edges {
                        assert!(!graph.try_add_edge(u, v, w));
                        assert!(graph.try_add_edge(u, v, w + 1.0));
                        assert_eq!(graph.edge_weight(u, v), Some(w));
                    }

                    let mut m = graph.number_of_edges();
                    assert_eq!(m, edges.len() as NumEdges);

                    for (i, &Edge(u, v, w)) in edges.iter().enumerate() {
                        match i % 3 {
                            0 => {
                                assert_eq!(graph.try_remove_edge(u, v), Some(w));
                                assert_eq!(graph.try_remove_edge(u, v), None);
                                m -= 1;
                            }
                            1 => {
                                assert_eq!(graph.modify_edge_weight(u, v, -0.5), Some(w - 0.5));
                                assert_eq!(graph.edge_weight(u, v), Some(w - 0.5));
                            }
                            _ => {
                                assert_eq!(graph.set_edge_weight(u, v, 2.0 * w), Some(w));
                                assert_eq!(graph.edge_weight(u, v), Some(2.0 * w));
                            }
                        }
                        assert_eq!(m, graph.number_of_edges());
                    }

                    // modifying a missing edge leaves the graph untouched
                    let Edge(u, v, _) = edges[0];
                    assert_eq!(graph.modify_edge_weight(u, v, 1.0), None);
                    assert!(!graph.has_edge(u, v));

                    graph.clear_edges();
                    assert!(graph.is_singleton_graph());
                    assert!(graph.vertices().all(|u| graph.total_degree_of(u) == 0));
                }
            }
        }
    };
    ($graph:ident: Undirected) => {
        #[test]
        fn test_undirected() {
            let rng = &mut Pcg64Mcg::seed_from_u64(5);

            for n in [10 as NumNodes, 20] {
                let edges = random_edges(rng, n, 4 * n)
                    .into_iter()
                    .map(|e| if e.tail() <= e.head() { e } else { e.reverse() })
                    .sorted_by_key(|e| e.endpoints())
                    .dedup_by(|a, b| a.endpoints() == b.endpoints())
                    .collect_vec();

                let mut graph = <$graph>::from_edges_undirected(n, edges.iter());
                assert!(graph.is_undirected());
                assert_eq!(graph.number_of_edges(), edges.len() as NumEdges);
                assert_eq!(edges, graph.ordered_edges(true).collect_vec());

                for &Edge(u, v, w) in &edges {
                    assert_eq!(graph.edge_weight(v, u), Some(w));
                    assert!(graph.try_add_edge(v, u, w));
                }

                for u in graph.vertices() {
                    assert_eq!(graph.out_degree_of(u), graph.in_degree_of(u));
                }

                for &Edge(u, v, _) in &edges {
                    graph.set_edge_weight(v, u, 7.0);
                    assert_eq!(graph.edge_weight(u, v), Some(7.0));
                    assert_eq!(graph.try_remove_edge(v, u), Some(7.0));
                    assert!(!graph.has_edge(u, v));
                }

                assert!(graph.is_singleton_graph());
            }
        }
    };
}

pub(crate) use test_graph_ops;

#[cfg(test)]
pub(crate) mod flow {
    //! Helpers to validate the results of flow computations in tests.

    use crate::{ops::*, repr::*, *};
    use itertools::Itertools;
    use rand::Rng;

    /// Absolute tolerance used when comparing accumulated flow values
    pub const TOLERANCE: Weight = 1e-9;

    /// Creates a random directed network with integral capacities in `1..=max_capacity`.
    /// If `anti_parallel` is *false*, no pair of nodes is connected in both directions.
    pub fn random_network<R: Rng>(
        rng: &mut R,
        n: NumNodes,
        m: NumEdges,
        max_capacity: u32,
        anti_parallel: bool,
    ) -> AdjArray {
        random_network_with(rng, n, m, anti_parallel, |rng| {
            rng.random_range(1..=max_capacity) as Weight
        })
    }

    /// Creates a random directed network with capacities drawn uniformly from `(0, max_capacity)`
    pub fn random_fractional_network<R: Rng>(
        rng: &mut R,
        n: NumNodes,
        m: NumEdges,
        max_capacity: Weight,
        anti_parallel: bool,
    ) -> AdjArray {
        random_network_with(rng, n, m, anti_parallel, |rng| {
            rng.random_range(Weight::EPSILON..max_capacity)
        })
    }

    fn random_network_with<R: Rng>(
        rng: &mut R,
        n: NumNodes,
        m: NumEdges,
        anti_parallel: bool,
        mut capacity: impl FnMut(&mut R) -> Weight,
    ) -> AdjArray {
        let mut graph = AdjArray::new(n);
        for _ in 0..m {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            if u == v || graph.has_edge(u, v) || (!anti_parallel && graph.has_edge(v, u)) {
                continue;
            }
            let c = capacity(rng);
            graph.add_edge(u, v, c);
        }
        graph
    }

    /// Asserts that `flow` is a feasible `s-t` flow of value `value` in `capacity`:
    /// every capacity edge is present in the flow graph with `0 <= flow <= capacity`,
    /// there are no other edges and flow is conserved at every node other than `s` and `t`.
    pub fn assert_feasible_flow<G: FlowGraph>(capacity: &G, flow: &G, s: Node, t: Node, value: Weight) {
        assert_eq!(capacity.number_of_nodes(), flow.number_of_nodes());
        assert_eq!(capacity.number_of_edges(), flow.number_of_edges());

        for Edge(u, v, c) in capacity.edges(false) {
            let f = flow
                .edge_weight(u, v)
                .unwrap_or_else(|| panic!("flow graph misses edge ({u},{v})"));
            assert!(f >= 0.0, "negative flow {f} on ({u},{v})");
            assert!(f <= c + TOLERANCE, "flow {f} exceeds capacity {c} on ({u},{v})");
        }

        let mut balance = vec![0.0; capacity.len()];
        for Edge(u, v, f) in flow.edges(false) {
            balance[u as usize] -= f;
            balance[v as usize] += f;
        }

        for u in capacity.vertices().filter(|&u| u != s && u != t) {
            assert!(
                balance[u as usize].abs() <= TOLERANCE,
                "flow not conserved at {u}: {}",
                balance[u as usize]
            );
        }
        assert_close(-balance[s as usize], value);
        assert_close(balance[t as usize], value);
    }

    /// Capacity of the cut `(S, V \ S)` where `S` is given by `source_side`
    pub fn cut_capacity<G: FlowGraph>(capacity: &G, source_side: &[bool]) -> Weight {
        capacity
            .edges(false)
            .filter(|e| source_side[e.tail() as usize] && !source_side[e.head() as usize])
            .map(|e| e.weight())
            .sum()
    }

    /// Total cost `sum flow(e) * cost(e)` of a flow
    pub fn flow_cost<G: FlowGraph>(flow: &G, cost: &G) -> Weight {
        flow.edges(false)
            .map(|Edge(u, v, f)| f * cost.edge_weight(u, v).unwrap_or(0.0))
            .sum()
    }

    /// Minimum cut capacity by brute force over all node subsets containing `s` but not `t`
    pub fn brute_force_min_cut<G: FlowGraph>(capacity: &G, s: Node, t: Node) -> Weight {
        let free = capacity
            .vertices()
            .filter(|&u| u != s && u != t)
            .collect_vec();
        assert!(free.len() < 16);

        (0u32..(1 << free.len()))
            .map(|mask| {
                let mut side = vec![false; capacity.len()];
                side[s as usize] = true;
                for (i, &u) in free.iter().enumerate() {
                    side[u as usize] = (mask >> i) & 1 == 1;
                }
                cut_capacity(capacity, &side)
            })
            .fold(Weight::INFINITY, Weight::min)
    }

    /// Asserts that two flow values agree up to [`TOLERANCE`]
    pub fn assert_close(actual: Weight, expected: Weight) {
        assert!(
            (actual - expected).abs() <= TOLERANCE * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }
}
