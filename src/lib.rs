/*!
`wgraphs` is a weighted graph data structure & algorithms library centered around **network flows**:
maximum flows (augmenting paths, blocking flows and push-relabel) and minimum-cost maximum flows
(cycle canceling) on directed graphs with `f64` capacities and costs.

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the graph.
For **edges**, we use a simple tuple-struct `Edge(Node, Node, Weight)` with `Weight = f64`.
Absent edges are always `None` (see [`ops::WeightedAdjacencyList::edge_weight`]), never a special
floating point value.

Graphs are simple (at most one edge per ordered pair of nodes) and either **directed** or
**undirected**; the flow algorithms require directed graphs.

### Available Representations

See the [`repr`] module for the full list of graph storage backends:

- [`AdjArray`](crate::repr::AdjArray)
- [`SparseAdjArray`](crate::repr::SparseAdjArray)
- [`AdjMatrix`](crate::repr::AdjMatrix)

# Design

All algorithms are provided as configurable structs that one can alter to their needs using the
*Builder* / *Setter* pattern before running the configured algorithm on a provided graph.
The most commonly used functionalities are also implemented via traits on the graph itself
(see [`algo::NetworkFlow`]), making them usable without configuring the algorithm beforehand.

Preconditions of the flow algorithms are checked up front and reported as [`FlowError`];
no algorithm mutates a graph passed in by the caller.
The library logs through the [`log`](https://docs.rs/log) facade and never installs a logger itself.

# Usage

- [`prelude`] includes definitions for nodes, edges, basic graph operations, and all graph representations,
- [`algo`] includes traversals, shortest paths (Bellman-Ford, sequential and parallel) and the network flow algorithms.

In most use-cases, `use wgraphs::{prelude::*, algo::*};` suffices for your needs.

```
use wgraphs::{prelude::*, algo::*};

let capacity = AdjArray::from_edges(
    4,
    [(0, 1, 3.0), (0, 2, 2.0), (1, 3, 2.0), (2, 3, 3.0), (1, 2, 1.0)],
);
let result = capacity.max_flow(0, 3).unwrap();
assert_eq!(result.value, 5.0);
```
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod node;
pub mod ops;
pub mod repr;
pub(crate) mod testing;

pub use edge::*;
pub use error::FlowError;
pub use node::*;

/// `wgraphs::prelude` includes definitions for nodes and edges, all basic graph operation traits as well as all implemented representations.
pub mod prelude {
    pub use super::{edge::*, error::FlowError, node::*, ops::*, repr::*};
}
