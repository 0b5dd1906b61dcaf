/*!
# Errors

Almost all failures of the flow algorithms are precondition violations. They are detected before
any work is done and reported as [`FlowError`]; nothing is retried internally. The exception is
push-relabel, which may detect during the run that `f64` precision does not suffice.
Unreachability is never an error: it is a flow of value zero.
*/

use thiserror::Error;

use crate::{Node, NumNodes, Weight};

/// Errors raised by the network flow algorithms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    /// An undirected graph was passed where a directed graph is required
    #[error("flow networks must be directed")]
    UndirectedGraph,

    /// Source and sink coincide
    #[error("source and sink must differ (both are {0})")]
    SourceIsSink(Node),

    /// A terminal is not a node of the graph
    #[error("node {node} is out of range for a graph with {n} nodes")]
    NodeOutOfRange { node: Node, n: NumNodes },

    /// An edge has a negative (or NaN) capacity
    #[error("edge ({u},{v}) has invalid capacity {capacity}")]
    NegativeCapacity { u: Node, v: Node, capacity: Weight },

    /// Capacity and cost graph differ in size
    #[error("capacity graph has {capacity} nodes but cost graph has {cost}")]
    VertexCountMismatch { capacity: NumNodes, cost: NumNodes },

    /// Capacity and cost graph differ in their edge sets
    #[error("edge ({u},{v}) is present in only one of capacity and cost graph")]
    TopologyMismatch { u: Node, v: Node },

    /// Both `(u, v)` and `(v, u)` carry capacity which makes residual costs ambiguous
    #[error("nodes {u} and {v} are connected in both directions")]
    AntiParallelEdges { u: Node, v: Node },

    /// Push-relabel cannot handle the capacities within `f64` precision
    #[error(
        "capacities around {value} exceed the safe floating point range of push-relabel; use an augmenting path based max-flow instead"
    )]
    CapacityOverflow { value: Weight },

    /// Push-relabel holds excess that rounding cut off from every residual path
    #[error(
        "excess {excess} at node {node} was stranded by floating point rounding in push-relabel; use an augmenting path based max-flow instead"
    )]
    PrecisionLoss { node: Node, excess: Weight },
}

impl FlowError {
    /// Returns *true* if the error reports a malformed argument (as opposed to a numeric limitation)
    pub fn is_invalid_argument(&self) -> bool {
        !self.suggests_augmenting_paths()
    }

    /// Returns *true* if the caller should retry with an augmenting path based algorithm
    pub fn suggests_augmenting_paths(&self) -> bool {
        matches!(
            self,
            FlowError::CapacityOverflow { .. } | FlowError::PrecisionLoss { .. }
        )
    }
}

/// Result type of all fallible flow computations
pub type Result<T> = std::result::Result<T, FlowError>;
