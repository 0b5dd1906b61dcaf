/*!
# Maximum Flows

[`MaxFlow`] is the augmenting orchestrator: starting from the zero flow, it repeatedly asks its
[`AugmentingStrategy`] for an augmenting structure in the current residual graph and pushes it,
until the sink is unreachable. Depending on the strategy this is
- Edmonds-Karp ([`ShortestAugmentingPath`], the default),
- a widest path method ([`WidestAugmentingPath`], [`WidestShortestAugmentingPath`]),
- Dinic's method ([`DinicBlockingFlow`], [`MkmBlockingFlow`], [`DfsBlockingFlow`]).

Every maximum flow algorithm (including [`PushRelabel`]) implements [`MaxFlowStrategy`] so that
callers, e.g. [`MinCostFlow::solve_with`], can use them interchangeably.
*/

use log::{debug, trace};

use super::*;

/// Result of a maximum flow computation
#[derive(Debug, Clone)]
pub struct FlowResult<G> {
    /// Net flow leaving the source
    pub value: Weight,
    /// Every edge of the capacity graph weighted by the flow it carries (possibly `0`)
    pub flow: G,
}

/// Computes maximum flows
pub trait MaxFlowStrategy<G: FlowGraph> {
    /// Returns a maximum `s-t` flow of `capacity`
    fn solve(&self, capacity: &G, s: Node, t: Node) -> Result<FlowResult<G>>;
}

impl<G, F> MaxFlowStrategy<G> for F
where
    G: FlowGraph,
    F: Fn(&G, Node, Node) -> Result<FlowResult<G>>,
{
    fn solve(&self, capacity: &G, s: Node, t: Node) -> Result<FlowResult<G>> {
        self(capacity, s, t)
    }
}

/// A minimum `s-t` cut
#[derive(Debug, Clone, PartialEq)]
pub struct MinCut {
    /// Capacity of the cut, equal to the value of a maximum flow
    pub value: Weight,
    /// `source_side[u]` is *true* if `u` is on the side of the source
    pub source_side: Vec<bool>,
}

impl MinCut {
    /// Returns the capacity edges leaving the source side
    pub fn cut_edges<'a, G: FlowGraph>(
        &'a self,
        capacity: &'a G,
    ) -> impl Iterator<Item = Edge> + 'a {
        capacity.edges(false).filter(|e| {
            self.source_side[e.tail() as usize] && !self.source_side[e.head() as usize]
        })
    }
}

/// Augmenting maximum flow with a configurable [`AugmentingStrategy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFlow<A = ShortestAugmentingPath> {
    strategy: A,
}

impl MaxFlow {
    /// Edmonds-Karp: augments along shortest paths
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A> MaxFlow<A> {
    /// Augments with a custom strategy
    pub fn with_strategy(strategy: A) -> Self {
        Self { strategy }
    }

    /// Returns the configured strategy
    pub fn strategy(&self) -> &A {
        &self.strategy
    }

    /// Computes a maximum `s-t` flow of `capacity`.
    ///
    /// Fails if `capacity` is undirected, if `s == t`, if `s` or `t` are out of range or if any
    /// capacity is negative.
    pub fn run<G>(&self, capacity: &G, s: Node, t: Node) -> Result<FlowResult<G>>
    where
        G: FlowGraph,
        A: AugmentingStrategy<G>,
    {
        let mut network = FlowNetwork::new(capacity, s, t)?;
        self.saturate(&mut network);
        Ok(network.into_result())
    }

    /// Augments the flow of `network` until it is maximum and returns the number of augmentations
    pub fn saturate<G>(&self, network: &mut FlowNetwork<'_, G>) -> usize
    where
        G: FlowGraph,
        A: AugmentingStrategy<G>,
    {
        let (s, t) = (network.source(), network.sink());
        debug!(
            "max flow from {s} to {t} on {} nodes and {} edges",
            network.capacity().number_of_nodes(),
            network.capacity().number_of_edges()
        );

        let mut augmentations = 0;
        while let Some(augmenting) = self.strategy.find(network.residual(), s, t) {
            if !(augmenting.value > 0.0) {
                break;
            }

            trace!(
                "augmenting by {} over {} edges",
                augmenting.value,
                augmenting.flow.number_of_edges()
            );
            network.augment(&augmenting);
            augmentations += 1;
        }

        debug!(
            "max flow of value {} after {augmentations} augmentations",
            network.value()
        );
        augmentations
    }

    /// Computes a minimum `s-t` cut of `capacity`: the nodes reachable from `s` in the residual
    /// graph of a maximum flow.
    pub fn min_st_cut<G>(&self, capacity: &G, s: Node, t: Node) -> Result<MinCut>
    where
        G: FlowGraph,
        A: AugmentingStrategy<G>,
    {
        let mut network = FlowNetwork::new(capacity, s, t)?;
        self.saturate(&mut network);
        Ok(MinCut {
            value: network.value(),
            source_side: network.min_cut_source_side(),
        })
    }
}

impl<G, A> MaxFlowStrategy<G> for MaxFlow<A>
where
    G: FlowGraph,
    A: AugmentingStrategy<G>,
{
    fn solve(&self, capacity: &G, s: Node, t: Node) -> Result<FlowResult<G>> {
        self.run(capacity, s, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flow::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn example() -> AdjArray {
        AdjArray::from_edges(
            4,
            [(0, 1, 3.0), (0, 2, 2.0), (1, 3, 2.0), (2, 3, 3.0), (1, 2, 1.0)],
        )
    }

    /// Runs every augmenting strategy and push-relabel
    fn all_max_flows<G: FlowGraph>(
        capacity: &G,
        s: Node,
        t: Node,
    ) -> Vec<(&'static str, FlowResult<G>)> {
        vec![
            ("shortest", MaxFlow::new().solve(capacity, s, t)),
            (
                "widest",
                MaxFlow::with_strategy(WidestAugmentingPath).solve(capacity, s, t),
            ),
            (
                "widest-shortest",
                MaxFlow::with_strategy(WidestShortestAugmentingPath).solve(capacity, s, t),
            ),
            (
                "dinic",
                MaxFlow::with_strategy(DinicBlockingFlow).solve(capacity, s, t),
            ),
            (
                "mkm",
                MaxFlow::with_strategy(MkmBlockingFlow).solve(capacity, s, t),
            ),
            (
                "dfs",
                MaxFlow::with_strategy(DfsBlockingFlow).solve(capacity, s, t),
            ),
            ("push-relabel", PushRelabel::new().solve(capacity, s, t)),
        ]
        .into_iter()
        .map(|(name, result)| (name, result.unwrap()))
        .collect()
    }

    #[test]
    fn example_value() {
        let capacity = example();
        // both edges leaving the source are saturated, hence the flow is unique
        for (name, result) in all_max_flows(&capacity, 0, 3) {
            assert_eq!(result.value, 5.0, "{name}");
            assert_feasible_flow(&capacity, &result.flow, 0, 3, 5.0);

            assert_eq!(result.flow.edge_weight(0, 1), Some(3.0));
            assert_eq!(result.flow.edge_weight(1, 3), Some(2.0));
            assert_eq!(result.flow.edge_weight(1, 2), Some(1.0));
            assert_eq!(result.flow.edge_weight(0, 2), Some(2.0));
            assert_eq!(result.flow.edge_weight(2, 3), Some(3.0));
        }
    }

    #[test]
    fn diamond_bottleneck() {
        // the middle edge is the only connection between both halves
        let capacity = AdjMatrix::from_edges(
            6,
            [
                (0, 1, 10.0),
                (0, 2, 10.0),
                (1, 3, 10.0),
                (2, 3, 10.0),
                (3, 4, 1.0),
                (4, 5, 10.0),
            ],
        );
        for (name, result) in all_max_flows(&capacity, 0, 5) {
            assert_eq!(result.value, 1.0, "{name}");
            assert_feasible_flow(&capacity, &result.flow, 0, 5, 1.0);
        }

        let cut = MaxFlow::new().min_st_cut(&capacity, 0, 5).unwrap();
        assert_eq!(cut.value, 1.0);
        assert_eq!(
            cut.cut_edges(&capacity).map(|e| e.endpoints()).collect_vec(),
            vec![(3, 4)]
        );
    }

    #[test]
    fn unreachable_sink_is_zero_flow() {
        let capacity = SparseAdjArray::from_edges(4, [(0, 1, 1.0), (2, 3, 1.0), (1, 0, 2.0)]);
        for (name, result) in all_max_flows(&capacity, 0, 3) {
            assert_eq!(result.value, 0.0, "{name}");
            assert_eq!(result.flow.number_of_edges(), 3);
            assert!(result.flow.edges(false).all(|e| e.weight() == 0.0));
        }
    }

    #[test]
    fn strategies_agree_on_random_networks() {
        let rng = &mut Pcg64Mcg::seed_from_u64(17);

        for n in [5 as NumNodes, 10, 30] {
            for anti_parallel in [false, true] {
                for _ in 0..15 {
                    let capacity = random_network(rng, n, 3 * n, 20, anti_parallel);
                    let results = all_max_flows(&capacity, 0, n - 1);
                    let expected = results[0].1.value;

                    for (name, result) in &results {
                        assert_close(result.value, expected);
                        assert_feasible_flow(&capacity, &result.flow, 0, n - 1, result.value);
                        assert!(result.value >= 0.0, "{name}");
                    }
                }
            }
        }
    }

    #[test]
    fn strategies_agree_on_fractional_capacities() {
        let rng = &mut Pcg64Mcg::seed_from_u64(41);

        for n in [5 as NumNodes, 12, 25] {
            for _ in 0..15 {
                let capacity = random_fractional_network(rng, n, 3 * n, 10.0, true);
                let results = all_max_flows(&capacity, 0, n - 1);
                let expected = results[0].1.value;

                for (_, result) in &results {
                    assert_close(result.value, expected);
                    assert_feasible_flow(&capacity, &result.flow, 0, n - 1, result.value);
                }
            }
        }
    }

    #[test]
    fn max_flow_min_cut_duality() {
        let rng = &mut Pcg64Mcg::seed_from_u64(23);

        for n in [4 as NumNodes, 8, 12] {
            for _ in 0..20 {
                let capacity = random_network(rng, n, 3 * n, 9, true);
                let expected = brute_force_min_cut(&capacity, 0, 1);

                let cut = MaxFlow::with_strategy(DinicBlockingFlow)
                    .min_st_cut(&capacity, 0, 1)
                    .unwrap();
                assert_close(cut.value, expected);
                assert!(cut.source_side[0]);
                assert!(!cut.source_side[1]);
                assert_close(cut_capacity(&capacity, &cut.source_side), expected);
            }
        }
    }

    #[test]
    fn residual_of_maximum_flow_admits_no_more_flow() {
        let rng = &mut Pcg64Mcg::seed_from_u64(29);

        for _ in 0..20 {
            let capacity = random_network(rng, 12, 40, 15, true);
            let result = MaxFlow::with_strategy(MkmBlockingFlow)
                .run(&capacity, 0, 11)
                .unwrap();

            let network = FlowNetwork::with_flow(&capacity, &result.flow, 0, 11).unwrap();
            assert_close(network.value(), result.value);

            let again = MaxFlow::new().run(network.residual(), 0, 11).unwrap();
            assert_eq!(again.value, 0.0);
        }
    }

    #[test]
    fn closures_are_strategies() {
        let capacity = example();
        let dinic =
            |c: &AdjArray, s: Node, t: Node| MaxFlow::with_strategy(DinicBlockingFlow).run(c, s, t);
        assert_eq!(dinic.solve(&capacity, 0, 3).unwrap().value, 5.0);

        let augmenting = |r: &AdjArray, s: Node, t: Node| ShortestAugmentingPath.find(r, s, t);
        let result = MaxFlow::with_strategy(augmenting).run(&capacity, 0, 3).unwrap();
        assert_eq!(result.value, 5.0);
    }

    #[test]
    fn invalid_arguments() {
        let capacity = example();
        assert_eq!(
            MaxFlow::new().run(&capacity, 2, 2).unwrap_err(),
            FlowError::SourceIsSink(2)
        );
        assert!(MaxFlow::new().run(&capacity, 0, 9).unwrap_err().is_invalid_argument());
    }
}
