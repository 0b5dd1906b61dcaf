/*!
# Graph Representations

All representations are instances of [`WeightedGraph`], parameterized by a [`Neighborhood`]
that controls how the weighted out-neighborhood of a single node is stored:

- [`AdjArray`]: adjacency arrays (`Vec<(Node, Weight)>`),
- [`SparseAdjArray`]: adjacency arrays with inline storage for small degrees (`SmallVec`),
- [`AdjMatrix`]: one dense row of `Option<Weight>` per node.

Directedness is chosen at construction (see [`GraphNew`]).
Every algorithm of this crate is generic over the representation; working graphs created by an
algorithm use the representation of the graph passed in.
*/

use crate::{ops::*, *};

mod neighborhood;
mod weighted;

pub use neighborhood::*;
pub use weighted::*;

/// Trait for methods on the weighted out-neighborhood of a single node.
pub trait Neighborhood: Clone {
    /// Creates an empty neighborhood for a graph with `n` nodes
    fn new(n: NumNodes) -> Self;

    /// Returns the number of neighbors in the Neighborhood
    fn num_of_neighbors(&self) -> NumNodes;

    type NeighborhoodIter<'a>: Iterator<Item = (Node, Weight)> + 'a
    where
        Self: 'a;

    /// Returns an iterator over all `(neighbor, weight)` pairs in the Neighborhood
    fn neighbors(&self) -> Self::NeighborhoodIter<'_>;

    /// Returns the weight towards `v` or `None` if `v` is no neighbor
    /// ** Might panic if `v >= n` **
    fn weight_to(&self, v: Node) -> Option<Weight>;

    /// Returns *true* if `v` is in the Neighborhood
    /// ** Might panic if `v >= n` **
    fn has_neighbor(&self, v: Node) -> bool {
        self.weight_to(v).is_some()
    }

    /// Adds a neighbor without checking if it exists beforehand.
    /// For some implementations, this might lead to Multi-Edges
    fn add_neighbor(&mut self, v: Node, w: Weight);

    /// Sets the weight towards `v`, adding `v` if necessary.
    /// Returns the previous weight if `v` was a neighbor.
    /// ** Might panic if `v >= n` **
    fn set_weight(&mut self, v: Node, w: Weight) -> Option<Weight>;

    /// Tries to remove a neighbor from the Neighborhood.
    /// Returns its weight if the node was in the Neighborhood before.
    /// ** Might panic if `v >= n` **
    fn try_remove_neighbor(&mut self, v: Node) -> Option<Weight>;

    /// Removes all neighbors in the Neighborhood
    fn clear(&mut self);
}
