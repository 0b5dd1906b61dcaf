/*!
# Graph Algorithms

This module provides the **graph algorithms** built on top of the graph representations in this crate.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use wgraphs::algo::*;
```
and gain access to traversals, shortest paths and the network flow algorithms.
*/

mod network_flow;
mod shortest_path;
mod traversal;

use crate::prelude::*;

pub use network_flow::*;
pub use shortest_path::*;
pub use traversal::*;
