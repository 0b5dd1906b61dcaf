/*!
# Push-Relabel

FIFO push-relabel maximum flow. Heights start as the hop-distance towards the sink in the
residual graph (`0` if the sink is unreachable), the source starts at height `n` and every edge
leaving the source is saturated. Active nodes (positive excess) are discharged in FIFO order:
a node pushes along admissible residual edges (`h(u) = h(v) + 1`) and, if excess remains, is
relabeled to one more than its lowest residual neighbor and enqueued again.

Excess is accumulated in `f64`. All sums stay exact as long as they remain below `2^53`, so
capacities leaving the source beyond `2^53 / n` are rejected with
[`FlowError::CapacityOverflow`]. The same error is raised if an excess update is lost to
rounding. Augmenting path based algorithms ([`MaxFlow`]) have no such limitation.

With fractional capacities, excess drifts from the flow by rounding. Excess and residual
capacities up to a tolerance of a few ulps of the total source capacity (per node and edge) are
treated as zero. Should a node still end up with excess it cannot route (no residual edge or a
height beyond `2n - 1`), [`FlowError::PrecisionLoss`] is returned.
*/

use std::collections::VecDeque;

use itertools::Itertools;
use log::debug;

use super::*;

/// Largest `f64` below which all integers are representable
const EXACT_INTEGER_LIMIT: Weight = (1u64 << Weight::MANTISSA_DIGITS) as Weight;

/// FIFO push-relabel maximum flow
#[derive(Debug, Clone, Copy, Default)]
pub struct PushRelabel;

impl PushRelabel {
    /// FIFO push-relabel; it has no options
    pub fn new() -> Self {
        Self
    }

    /// Largest capacity of an edge leaving the source accepted in a network of `n` nodes
    pub fn capacity_limit(n: NumNodes) -> Weight {
        EXACT_INTEGER_LIMIT / n.max(1) as Weight
    }

    /// Excess and residual capacities up to this value count as zero
    fn tolerance<G: FlowGraph>(capacity: &G, s: Node) -> Weight {
        let operands = capacity.number_of_nodes() as Weight + capacity.number_of_edges() as Weight;
        4.0 * Weight::EPSILON * operands * capacity.out_weight_of(s)
    }

    /// Computes a maximum `s-t` flow of `capacity`.
    ///
    /// Fails like [`MaxFlow::run`] and additionally with [`FlowError::CapacityOverflow`] or
    /// [`FlowError::PrecisionLoss`] if the capacities cannot be handled within `f64` precision.
    pub fn run<G: FlowGraph>(&self, capacity: &G, s: Node, t: Node) -> Result<FlowResult<G>> {
        let mut network = FlowNetwork::new(capacity, s, t)?;
        let n = capacity.number_of_nodes();
        debug!(
            "push-relabel from {s} to {t} on {n} nodes and {} edges",
            capacity.number_of_edges()
        );

        let limit = Self::capacity_limit(n);
        if let Some(e) = capacity.out_edges_of(s).find(|e| e.weight() > limit) {
            return Err(FlowError::CapacityOverflow { value: e.weight() });
        }

        let tolerance = Self::tolerance(capacity, s);
        // `s != t`, hence `n >= 2`
        let max_height = 2 * n - 1;

        let mut heights = network
            .residual()
            .reverse_bfs_distances(t)
            .into_iter()
            .map(|h| h.unwrap_or(0))
            .collect_vec();
        heights[s as usize] = n;

        let mut state = Discharge {
            network: &mut network,
            excess: vec![0.0; n as usize],
            queue: VecDeque::new(),
            in_queue: vec![false; n as usize],
            tolerance,
        };

        let source_edges = state.network.residual().out_edges_of(s).collect_vec();
        for Edge(_, v, r) in source_edges {
            state.push(s, v, r)?;
        }

        let mut relabels = 0usize;
        while let Some(u) = state.queue.pop_front() {
            state.in_queue[u as usize] = false;

            for Edge(_, v, r) in state.residual_edges(u) {
                if !state.is_active(u) {
                    break;
                }
                if heights[u as usize] == heights[v as usize] + 1 {
                    let amount = state.excess[u as usize].min(r);
                    state.push(u, v, amount)?;
                }
            }

            if !state.is_active(u) {
                continue;
            }

            let lowest = state
                .residual_edges(u)
                .into_iter()
                .map(|e| heights[e.head() as usize])
                .min();
            match lowest {
                Some(lowest) if lowest < max_height => {
                    heights[u as usize] = lowest + 1;
                    relabels += 1;
                    state.activate(u);
                }
                _ => {
                    return Err(FlowError::PrecisionLoss {
                        node: u,
                        excess: state.excess[u as usize],
                    });
                }
            }
        }

        debug!(
            "push-relabel flow of value {} after {relabels} relabels",
            network.value()
        );
        Ok(network.into_result())
    }
}

impl<G: FlowGraph> MaxFlowStrategy<G> for PushRelabel {
    fn solve(&self, capacity: &G, s: Node, t: Node) -> Result<FlowResult<G>> {
        self.run(capacity, s, t)
    }
}

struct Discharge<'n, 'a, G> {
    network: &'n mut FlowNetwork<'a, G>,
    excess: Vec<Weight>,
    queue: VecDeque<Node>,
    in_queue: Vec<bool>,
    tolerance: Weight,
}

impl<G: FlowGraph> Discharge<'_, '_, G> {
    /// A node other than source and sink with excess above the tolerance
    fn is_active(&self, u: Node) -> bool {
        u != self.network.source()
            && u != self.network.sink()
            && self.excess[u as usize] > self.tolerance
    }

    fn activate(&mut self, u: Node) {
        if !self.in_queue[u as usize] {
            self.in_queue[u as usize] = true;
            self.queue.push_back(u);
        }
    }

    /// Residual edges leaving `u` with capacity above the tolerance
    fn residual_edges(&self, u: Node) -> Vec<Edge> {
        self.network
            .residual()
            .out_edges_of(u)
            .filter(|e| e.weight() > self.tolerance)
            .collect_vec()
    }

    /// Pushes `amount` over the residual edge `(u, v)` and enqueues `v` if it became active
    fn push(&mut self, u: Node, v: Node, amount: Weight) -> Result<()> {
        if amount <= 0.0 {
            return Ok(());
        }

        let before = (self.excess[u as usize], self.excess[v as usize]);
        self.excess[u as usize] -= amount;
        self.excess[v as usize] += amount;
        if !(self.excess[u as usize] < before.0 && self.excess[v as usize] > before.1) {
            return Err(FlowError::CapacityOverflow {
                value: before.0.abs().max(before.1.abs()),
            });
        }

        self.network.augment_edge(u, v, amount);

        if self.is_active(v) {
            self.activate(v);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flow::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn agrees_with_augmenting_paths() {
        let rng = &mut Pcg64Mcg::seed_from_u64(31);

        for n in [4 as NumNodes, 16, 50] {
            for _ in 0..20 {
                let capacity = random_network(rng, n, 4 * n, 100, true);
                let expected = MaxFlow::new().run(&capacity, 0, 1).unwrap();
                let result = PushRelabel::new().run(&capacity, 0, 1).unwrap();

                assert_close(result.value, expected.value);
                assert_feasible_flow(&capacity, &result.flow, 0, 1, result.value);
            }
        }
    }

    #[test]
    fn agrees_on_fractional_capacities() {
        let rng = &mut Pcg64Mcg::seed_from_u64(99);

        for n in [4 as NumNodes, 8, 20, 30] {
            for _ in 0..25 {
                let capacity = random_fractional_network(rng, n, 3 * n, 10.0, true);
                let expected = MaxFlow::new().run(&capacity, 0, n - 1).unwrap();
                let result = PushRelabel::new().run(&capacity, 0, n - 1).unwrap();

                assert_close(result.value, expected.value);
                assert_feasible_flow(&capacity, &result.flow, 0, n - 1, result.value);
            }
        }
    }

    #[test]
    fn fractional_excess_returns_to_source() {
        // the sink has no incoming edges, so all excess has to flow back
        let capacity = AdjArray::from_edges(
            6,
            [
                (0, 3, 7.85),
                (1, 3, 6.475),
                (1, 4, 10.1),
                (3, 1, 2.725),
                (3, 2, 3.6),
                (4, 3, 3.1),
                (5, 0, 9.725),
                (5, 2, 7.6),
            ],
        );
        let result = PushRelabel::new().run(&capacity, 0, 5).unwrap();
        assert_close(result.value, 0.0);
        assert_feasible_flow(&capacity, &result.flow, 0, 5, 0.0);
    }

    #[test]
    fn excess_returns_to_source() {
        // 1 can take 5 units but only forward 2 of them
        let capacity =
            AdjArray::from_edges(4, [(0, 1, 5.0), (1, 2, 2.0), (2, 3, 7.0), (0, 2, 1.0)]);
        let result = PushRelabel::new().run(&capacity, 0, 3).unwrap();
        assert_eq!(result.value, 3.0);
        assert_eq!(result.flow.edge_weight(0, 1), Some(2.0));
        assert_feasible_flow(&capacity, &result.flow, 0, 3, 3.0);
    }

    #[test]
    fn rejects_huge_capacities() {
        assert_eq!(PushRelabel::capacity_limit(1), 2f64.powi(53));
        let limit = PushRelabel::capacity_limit(3);

        let capacity = AdjArray::from_edges(3, [(0, 1, 2.0 * limit), (1, 2, 1.0)]);
        let err = PushRelabel::new().run(&capacity, 0, 2).unwrap_err();
        assert_eq!(err, FlowError::CapacityOverflow { value: 2.0 * limit });
        assert!(err.suggests_augmenting_paths());
        assert!(!err.is_invalid_argument());

        // augmenting paths handle the same network
        assert_eq!(MaxFlow::new().run(&capacity, 0, 2).unwrap().value, 1.0);

        let stranded = FlowError::PrecisionLoss {
            node: 1,
            excess: 1e-15,
        };
        assert!(stranded.suggests_augmenting_paths());
        assert!(!stranded.is_invalid_argument());

        let capacity = AdjArray::from_edges(3, [(0, 1, 1e300), (1, 2, 1e300)]);
        assert!(
            PushRelabel::new()
                .run(&capacity, 0, 2)
                .unwrap_err()
                .suggests_augmenting_paths()
        );
    }

    #[test]
    fn lost_excess_updates_are_reported() {
        // every capacity is accepted, but the source's excess cannot absorb the second push
        let big = (1u64 << 51) as Weight;
        let tiny = 1.0 / (1u64 << 30) as Weight;
        assert_eq!(PushRelabel::capacity_limit(4), big);

        let capacity = AdjArray::from_edges(
            4,
            [(0, 2, big), (0, 3, tiny), (3, 2, tiny), (2, 1, 2.0 * big)],
        );
        assert_eq!(
            PushRelabel::new().run(&capacity, 0, 1).unwrap_err(),
            FlowError::CapacityOverflow { value: big }
        );
    }
}
