/*!
# Network Flows

Maximum flows and minimum-cost maximum flows on directed graphs with non-negative `f64`
capacities.

- [`MaxFlow`] augments along structures found by an [`AugmentingStrategy`]: shortest paths
  (Edmonds-Karp), widest paths or blocking flows of [`LevelGraph`]s (Dinic).
- [`PushRelabel`] is a FIFO push-relabel implementation.
- [`MinCostFlow`] turns any maximum flow into one of minimum cost by cycle canceling.

All algorithms work on a [`FlowNetwork`] that owns the flow and residual graphs of a single call;
the capacity (and cost) graphs passed in are only read. Flows are returned in the representation
of the capacity graph and contain every capacity edge, weighted by the flow it carries.

The [`NetworkFlow`] trait makes the default configurations available on every graph:
```
use wgraphs::{prelude::*, algo::*};

let capacity = AdjArray::from_edges(3, [(0, 1, 2.0), (1, 2, 1.0), (0, 2, 1.0)]);
let cost = AdjArray::from_edges(3, [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]);

let result = capacity.min_cost_max_flow(&cost, 0, 2).unwrap();
assert_eq!(result.value, 2.0);
assert_eq!(result.cost, 7.0);
```
*/

mod augmenting;
mod blocking;
mod level_graph;
mod max_flow;
mod min_cost;
mod push_relabel;
mod residual;

use super::*;
use crate::error::Result;

pub use augmenting::*;
pub use blocking::*;
pub use level_graph::*;
pub use max_flow::*;
pub use min_cost::*;
pub use push_relabel::*;
pub use residual::*;

/// Network flow computations with their default configuration, available on every [`FlowGraph`].
/// The graph itself holds the capacities.
pub trait NetworkFlow: FlowGraph {
    /// Computes a maximum `s-t` flow with Edmonds-Karp.
    /// See [`MaxFlow::run`] for the error conditions.
    fn max_flow(&self, s: Node, t: Node) -> Result<FlowResult<Self>> {
        MaxFlow::new().run(self, s, t)
    }

    /// Computes a maximum `s-t` flow with the given algorithm
    fn max_flow_with<M: MaxFlowStrategy<Self>>(
        &self,
        s: Node,
        t: Node,
        strategy: &M,
    ) -> Result<FlowResult<Self>> {
        strategy.solve(self, s, t)
    }

    /// Computes a maximum `s-t` flow of minimum total cost with respect to `cost`.
    /// See [`MinCostFlow::solve`] for the error conditions.
    fn min_cost_max_flow(&self, cost: &Self, s: Node, t: Node) -> Result<CostFlowResult<Self>> {
        MinCostFlow::new().solve(self, cost, s, t)
    }

    /// Computes a minimum `s-t` cut
    fn min_st_cut(&self, s: Node, t: Node) -> Result<MinCut> {
        MaxFlow::new().min_st_cut(self, s, t)
    }
}

impl<G: FlowGraph> NetworkFlow for G {}
