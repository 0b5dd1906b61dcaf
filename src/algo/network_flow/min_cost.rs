/*!
# Minimum-Cost Maximum Flows

[`MinCostFlow`] computes a maximum `s-t` flow of minimum total cost by *cycle canceling*:
starting from any maximum flow, it repeatedly searches the cost-residual graph for a negative
cycle with [`BellmanFord`] and pushes the cycle's bottleneck around it. Once no negative cycle is
left, the flow has minimum cost among all maximum flows.

The cost-residual graph has the same edges as the residual graph. A residual edge `(u, v)` costs
`cost(u, v)` if `(u, v)` is a capacity edge and `-cost(v, u)` otherwise. This is unambiguous because
no two nodes may be connected in both directions.

The initial maximum flow is either computed by a [`MaxFlowStrategy`] ([`MinCostFlow::solve_with`]),
or constructed directly ([`MinCostFlow::solve`]): on a private copy of the network, an auxiliary
node `x` is attached via `s -> x -> t`, both with capacity `U` (the total capacity leaving `s`)
and the first with a cost larger than any path could ever cost. Routing `U` units over `x` is a
feasible start; cycle canceling then moves as much flow as possible onto the real edges. Whatever
remains on the auxiliary path is dropped from the result. The caller's graphs are never modified.
*/

use fxhash::FxHashSet;
use log::{debug, trace, warn};

use super::*;

/// Result of a minimum-cost maximum flow computation
#[derive(Debug, Clone)]
pub struct CostFlowResult<G> {
    /// Net flow leaving the source
    pub value: Weight,
    /// Sum of `flow(e) * cost(e)` over all edges
    pub cost: Weight,
    /// Every edge of the capacity graph weighted by the flow it carries (possibly `0`)
    pub flow: G,
}

/// Cycle canceling minimum-cost maximum flow.
///
/// Negative cycles are searched from a virtual root attached to every node, hence negative cycles
/// not touching `s` or `t` are cancelled as well.
#[derive(Debug, Clone, Default)]
pub struct MinCostFlow {
    shortest_paths: BellmanFord,
}

impl MinCostFlow {
    /// Cycle canceling with sequential Bellman-Ford
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shortest path search used to detect negative cycles
    pub fn set_shortest_paths(&mut self, shortest_paths: BellmanFord) {
        self.shortest_paths = shortest_paths;
    }

    /// Sets the shortest path search used to detect negative cycles
    pub fn with_shortest_paths(mut self, shortest_paths: BellmanFord) -> Self {
        self.set_shortest_paths(shortest_paths);
        self
    }

    /// Computes a minimum-cost maximum `s-t` flow, starting from the flow over an auxiliary path.
    ///
    /// `cost` must have the same nodes and edges as `capacity`. Fails if `capacity` is
    /// undirected, `s == t`, `s` or `t` are out of range, a capacity is negative, `capacity` and
    /// `cost` differ in their nodes or edges, or two nodes are connected in both directions.
    pub fn solve<G: FlowGraph>(
        &self,
        capacity: &G,
        cost: &G,
        s: Node,
        t: Node,
    ) -> Result<CostFlowResult<G>> {
        check_cost_network(capacity, cost, s, t)?;

        let n = capacity.number_of_nodes();
        let aux = n;
        let through = capacity.out_weight_of(s);
        let detour = 1.0 + cost.edges(false).map(|e| e.weight().abs()).sum::<Weight>();

        let mut aux_capacity = capacity.isolated_with(n + 1);
        let mut aux_cost = cost.isolated_with(n + 1);
        aux_capacity.add_edges(capacity.edges(false));
        aux_cost.add_edges(cost.edges(false));
        aux_capacity.add_edges([(s, aux, through), (aux, t, through)]);
        aux_cost.add_edges([(s, aux, detour), (aux, t, 0.0)]);

        let mut network = FlowNetwork::new(&aux_capacity, s, t)?;
        network.augment_edge(s, aux, through);
        network.augment_edge(aux, t, through);
        debug!("min cost flow from {s} to {t} starting with {through} units over node {aux}");

        self.cancel_cycles(&mut network, &aux_cost);

        let aux_flow = network.flow();
        let mut flow = capacity.isolated();
        for Edge(u, v, _) in capacity.edges(false) {
            flow.add_edge(u, v, aux_flow.edge_weight(u, v).unwrap_or(0.0));
        }

        Ok(CostFlowResult {
            value: net_outflow(&flow, s),
            cost: total_cost(&flow, cost),
            flow,
        })
    }

    /// Computes a minimum-cost maximum `s-t` flow, starting from the maximum flow computed by
    /// `strategy`. Fails like [`MinCostFlow::solve`] or with the error of `strategy`.
    pub fn solve_with<G, M>(
        &self,
        capacity: &G,
        cost: &G,
        s: Node,
        t: Node,
        strategy: &M,
    ) -> Result<CostFlowResult<G>>
    where
        G: FlowGraph,
        M: MaxFlowStrategy<G>,
    {
        check_cost_network(capacity, cost, s, t)?;

        let initial = strategy.solve(capacity, s, t)?;
        debug_assert!(
            is_conserved(&initial.flow, s, t, 1e-6 * (1.0 + capacity.out_weight_of(s))),
            "max flow strategy returned a flow that does not conserve flow"
        );
        let mut network = FlowNetwork::with_flow(capacity, &initial.flow, s, t)?;
        debug!(
            "min cost flow from {s} to {t} starting with a flow of value {}",
            initial.value
        );

        self.cancel_cycles(&mut network, cost);

        let value = network.value();
        let flow = network.into_result().flow;
        Ok(CostFlowResult {
            value,
            cost: total_cost(&flow, cost),
            flow,
        })
    }

    /// Cancels negative cycles in the cost-residual graph of `network` until none is left.
    /// Returns the number of cancelled cycles.
    fn cancel_cycles<G: FlowGraph>(&self, network: &mut FlowNetwork<'_, G>, cost: &G) -> usize {
        let mut cost_residual = cost_residual(network.residual(), cost);
        let mut cancelled = 0;

        loop {
            let paths = self.shortest_paths.run_from_all(&cost_residual);
            if paths.success {
                break;
            }

            let Some(cycle) = paths.negative_cycle() else {
                warn!("shortest paths failed without a negative cycle; stopping");
                break;
            };

            let bottleneck = cycle
                .iter()
                .map(|e| network.residual().edge_weight(e.tail(), e.head()).unwrap_or(0.0))
                .fold(Weight::INFINITY, Weight::min);
            if !(bottleneck > 0.0) {
                warn!("negative cycle without residual capacity; stopping");
                break;
            }

            trace!(
                "cancelling cycle of {} edges and cost {} by {bottleneck}",
                cycle.len(),
                cycle.iter().map(|e| e.weight()).sum::<Weight>()
            );
            for &Edge(u, v, _) in &cycle {
                network.augment_edge(u, v, bottleneck);
                update_cost_residual(&mut cost_residual, network.residual(), cost, u, v);
                update_cost_residual(&mut cost_residual, network.residual(), cost, v, u);
            }
            cancelled += 1;
        }

        debug!("cancelled {cancelled} negative cycles");
        cancelled
    }
}

/// Checks the preconditions of [`MinCostFlow`]
fn check_cost_network<G: FlowGraph>(capacity: &G, cost: &G, s: Node, t: Node) -> Result<()> {
    check_network(capacity, s, t)?;

    if capacity.number_of_nodes() != cost.number_of_nodes() {
        return Err(FlowError::VertexCountMismatch {
            capacity: capacity.number_of_nodes(),
            cost: cost.number_of_nodes(),
        });
    }

    let capacity_edges: FxHashSet<(Node, Node)> =
        capacity.edges(false).map(|e| e.endpoints()).collect();
    let cost_edges: FxHashSet<(Node, Node)> = cost.edges(false).map(|e| e.endpoints()).collect();
    if let Some(&(u, v)) = capacity_edges.symmetric_difference(&cost_edges).min() {
        return Err(FlowError::TopologyMismatch { u, v });
    }

    if let Some(&(u, v)) = capacity_edges
        .iter()
        .filter(|&&(u, v)| u < v && capacity_edges.contains(&(v, u)))
        .min()
    {
        return Err(FlowError::AntiParallelEdges { u, v });
    }

    Ok(())
}

/// Cost of pushing flow over the residual edge `(u, v)`
fn residual_cost<G: FlowGraph>(cost: &G, u: Node, v: Node) -> Weight {
    match (cost.edge_weight(u, v), cost.edge_weight(v, u)) {
        (Some(c), _) => c,
        (None, Some(c)) => -c,
        (None, None) => 0.0,
    }
}

/// Builds the cost-residual graph: the residual graph weighted by residual costs
fn cost_residual<G: FlowGraph>(residual: &G, cost: &G) -> G {
    let mut graph = residual.isolated();
    for Edge(u, v, _) in residual.edges(false) {
        graph.add_edge(u, v, residual_cost(cost, u, v));
    }
    graph
}

fn update_cost_residual<G: FlowGraph>(
    cost_residual: &mut G,
    residual: &G,
    cost: &G,
    u: Node,
    v: Node,
) {
    if residual.has_edge(u, v) {
        cost_residual.set_edge_weight(u, v, residual_cost(cost, u, v));
    } else {
        cost_residual.try_remove_edge(u, v);
    }
}

/// Sum of `flow(e) * cost(e)` over all edges of `flow`
fn total_cost<G: FlowGraph>(flow: &G, cost: &G) -> Weight {
    flow.edges(false)
        .map(|Edge(u, v, f)| f * cost.edge_weight(u, v).unwrap_or(0.0))
        .sum()
}
