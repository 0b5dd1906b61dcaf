/*!
# Edge Representation

Edges of weighted graphs are triples `Edge(from, to, weight)` of two endpoints and an `f64`-weight.
In flow computations the weight is a capacity, a flow value, a residual capacity or a cost
depending on the graph the edge was taken from.

Edges are plain values: they are never references into a graph and changing a graph
does not change previously obtained edges.
*/

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

use crate::Node;

/// Weights are `f64`. The absence of an edge is always modelled as `Option<Weight>::None`
/// and never by a special floating point value.
pub type Weight = f64;

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = u32;

/// A weighted edge `(from, to, weight)`.
///
/// Equality, ordering and hashing are lexicographic on `(from, to, weight)` where the weight
/// is compared by its IEEE total order. Hence edges can be sorted and used as keys.
#[derive(Copy, Clone)]
pub struct Edge(pub Node, pub Node, pub Weight);

impl Edge {
    /// Tail `from` of the edge
    #[inline]
    pub fn tail(&self) -> Node {
        self.0
    }

    /// Head `to` of the edge
    #[inline]
    pub fn head(&self) -> Node {
        self.1
    }

    /// Weight of the edge
    #[inline]
    pub fn weight(&self) -> Weight {
        self.2
    }

    /// Returns both endpoints `(from, to)`
    #[inline]
    pub fn endpoints(&self) -> (Node, Node) {
        (self.0, self.1)
    }

    /// Returns *true* if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints; the weight is kept
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0, self.2)
    }

    /// Returns the same endpoints with a different weight
    pub fn with_weight(&self, weight: Weight) -> Self {
        Edge(self.0, self.1, weight)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Edge {}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .cmp(&other.0)
            .then(self.1.cmp(&other.1))
            .then(self.2.total_cmp(&other.2))
    }
}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
        self.1.hash(state);
        // consistent with `total_cmp`: bit-equal weights are exactly the `Ordering::Equal` ones
        self.2.to_bits().hash(state);
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{}:{})", self.0, self.1, self.2)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl From<(Node, Node, Weight)> for Edge {
    fn from(value: (Node, Node, Weight)) -> Self {
        Edge(value.0, value.1, value.2)
    }
}

impl From<&(Node, Node, Weight)> for Edge {
    fn from(value: &(Node, Node, Weight)) -> Self {
        Edge(value.0, value.1, value.2)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;
    use itertools::Itertools;

    #[test]
    fn lexicographic_order() {
        let edges = [
            Edge(1, 0, 2.0),
            Edge(0, 2, 1.0),
            Edge(0, 1, 3.0),
            Edge(0, 1, -1.0),
        ];

        let sorted = edges.iter().copied().sorted().collect_vec();
        assert_eq!(
            sorted,
            vec![
                Edge(0, 1, -1.0),
                Edge(0, 1, 3.0),
                Edge(0, 2, 1.0),
                Edge(1, 0, 2.0)
            ]
        );
    }

    #[test]
    fn hash_agrees_with_eq() {
        let set: FxHashSet<Edge> = [Edge(0, 1, 1.5), Edge(0, 1, 1.5), Edge(1, 0, 1.5)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Edge(0, 1, 1.5)));
        assert!(!set.contains(&Edge(0, 1, 2.5)));
    }

    #[test]
    fn reverse_keeps_weight() {
        let e = Edge(3, 7, 0.25);
        assert_eq!(e.reverse(), Edge(7, 3, 0.25));
        assert_eq!(e.reverse().reverse(), e);
        assert_eq!(e.with_weight(1.0).weight(), 1.0);
        assert!(!e.is_loop());
        assert_eq!(format!("{e}"), "(3,7:0.25)");
    }
}
