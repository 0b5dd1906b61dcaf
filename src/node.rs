/*!
# Node Representation

We choose `Node = u32` as flow networks beyond `2^32` nodes are out of reach for the
algorithms in this crate anyway.
This allows us to (1) save space compared to `usize` in the many per-node label vectors
the flow algorithms keep and (2) directly manipulate node values without abstracting over them.
*/

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// Returns *true* if `u` is a valid node of a graph with `n` nodes
#[inline]
pub const fn is_node_of(u: Node, n: NumNodes) -> bool {
    u < n && u != INVALID_NODE
}
