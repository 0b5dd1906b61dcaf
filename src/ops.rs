/*!
# Graph Operations

Traits describing everything the algorithms of this crate need from a graph:
- sizes ([`GraphNodeOrder`], [`GraphEdgeOrder`]) and directedness ([`GraphType`]),
- weighted adjacency queries ([`WeightedAdjacencyList`]),
- construction ([`GraphNew`]) and edge editing ([`WeightedEdgeEditing`]).

[`FlowGraph`] bundles all of them and is implemented for every graph that implements its parts.
*/

use std::ops::Range;

use itertools::Itertools;

use crate::*;

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns the range `0..n` of all nodes.
    /// The range does not borrow `self` and hence may be used while the graph is modified.
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns *true* if `u` is a node of the graph
    fn has_vertex(&self, u: Node) -> bool {
        is_node_of(u, self.number_of_nodes())
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph.
    /// Undirected edges are counted once.
    fn number_of_edges(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn is_singleton_graph(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Directedness of a graph. It is fixed at construction.
pub trait GraphType {
    /// Returns *true* if edges have an orientation
    fn is_directed(&self) -> bool;

    /// Returns *true* if `(u, v)` and `(v, u)` denote the same edge
    fn is_undirected(&self) -> bool {
        !self.is_directed()
    }
}

/// Getters for weighted neighborhoods & edges.
///
/// In an undirected graph every edge `{u, v}` is reported as outgoing edge of both `u` and `v`.
pub trait WeightedAdjacencyList: GraphNodeOrder + GraphEdgeOrder + GraphType + Sized {
    /// Returns an iterator over the outgoing edges of a given vertex.
    /// ** Panics if `u >= n` **
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = Edge> + '_;

    /// Returns the number of outgoing edges of `u`
    /// ** Panics if `u >= n` **
    fn out_degree_of(&self, u: Node) -> NumNodes;

    /// Returns the number of incoming edges of `u`
    /// ** Panics if `u >= n` **
    fn in_degree_of(&self, u: Node) -> NumNodes;

    /// Returns the weight of the edge `(u, v)` or `None` if there is no such edge.
    /// ** Panics if `u >= n || v >= n` **
    fn edge_weight(&self, u: Node, v: Node) -> Option<Weight>;

    /// Returns *true* if the edge `(u, v)` exists in the graph.
    /// ** Panics if `u >= n || v >= n` **
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.edge_weight(u, v).is_some()
    }

    /// Returns an iterator over the heads of all outgoing edges of `u`
    /// ** Panics if `u >= n` **
    fn out_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.out_edges_of(u).map(|e| e.head())
    }

    /// Returns the out-degree and in-degree of a given vertex
    /// ** Panics if `u >= n` **
    #[inline]
    fn total_degree_of(&self, u: Node) -> NumNodes {
        self.out_degree_of(u) + self.in_degree_of(u)
    }

    /// Returns an iterator over outgoing edges of a given vertex in sorted order.
    /// ** Panics if `u >= n` **
    fn ordered_out_edges_of(&self, u: Node) -> impl Iterator<Item = Edge> {
        let mut edges = self.out_edges_of(u).collect_vec();
        edges.sort();
        edges.into_iter()
    }

    /// Returns an iterator over all edges in the graph.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered which
    /// reports every edge of an undirected graph exactly once.
    fn edges(&self, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.vertices().flat_map(move |u| {
            self.out_edges_of(u)
                .filter(move |e| !only_normalized || e.tail() <= e.head())
        })
    }

    /// Returns an iterator over all edges in the graph in sorted order.
    fn ordered_edges(&self, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.vertices().flat_map(move |u| {
            self.ordered_out_edges_of(u)
                .filter(move |e| !only_normalized || e.tail() <= e.head())
        })
    }

    /// Returns the sum of weights of all outgoing edges of `u`
    /// ** Panics if `u >= n` **
    fn out_weight_of(&self, u: Node) -> Weight {
        self.out_edges_of(u).map(|e| e.weight()).sum()
    }

    /// Returns the sum of weights of all incoming edges of `u`.
    /// Requires a lookup per node of the graph.
    /// ** Panics if `u >= n` **
    fn in_weight_of(&self, u: Node) -> Weight {
        self.vertices().filter_map(|v| self.edge_weight(v, u)).sum()
    }
}

/// Trait for creating new empty graphs
pub trait GraphNew: Sized {
    /// Creates an empty graph with `n` singleton nodes and the given directedness
    fn with_directedness(n: NumNodes, directed: bool) -> Self;

    /// Creates an empty directed graph with `n` singleton nodes
    fn new(n: NumNodes) -> Self {
        Self::with_directedness(n, true)
    }

    /// Creates an empty undirected graph with `n` singleton nodes
    fn new_undirected(n: NumNodes) -> Self {
        Self::with_directedness(n, false)
    }

    /// Creates an edgeless graph of the same representation, node count and directedness
    fn isolated(&self) -> Self
    where
        Self: GraphNodeOrder + GraphType,
    {
        Self::with_directedness(self.number_of_nodes(), self.is_directed())
    }

    /// Creates an edgeless graph of the same representation and directedness but with `n` nodes
    fn isolated_with(&self, n: NumNodes) -> Self
    where
        Self: GraphType,
    {
        Self::with_directedness(n, self.is_directed())
    }

    /// Creates a directed graph from a number of nodes and a collection of edges
    /// ** Panics if any edge is invalid or appears twice **
    fn from_edges(n: NumNodes, edges: impl IntoIterator<Item = impl Into<Edge>>) -> Self
    where
        Self: WeightedEdgeEditing,
    {
        let mut graph = Self::new(n);
        graph.add_edges(edges);
        graph
    }

    /// Creates an undirected graph from a number of nodes and a collection of edges
    /// ** Panics if any edge is invalid or appears twice **
    fn from_edges_undirected(n: NumNodes, edges: impl IntoIterator<Item = impl Into<Edge>>) -> Self
    where
        Self: WeightedEdgeEditing,
    {
        let mut graph = Self::new_undirected(n);
        graph.add_edges(edges);
        graph
    }
}

/// Provides functions to insert/delete edges and to change their weight.
///
/// Graphs are simple: there is at most one edge `(u, v)` for every ordered pair.
pub trait WeightedEdgeEditing: WeightedAdjacencyList {
    /// Adds the edge `(u, v)` with weight `w`.
    /// ** Panics if `u >= n || v >= n` or the edge was already present **
    fn add_edge(&mut self, u: Node, v: Node, w: Weight) {
        assert!(!self.try_add_edge(u, v, w), "edge ({u},{v}) already present");
    }

    /// Adds the edge `(u, v)` with weight `w` if it does not exist yet.
    /// Returns *true* if the edge was present before, in which case the graph is unchanged.
    /// ** Panics if `u >= n || v >= n` **
    fn try_add_edge(&mut self, u: Node, v: Node, w: Weight) -> bool;

    /// Adds all edges in the collection
    /// ** Panics if any edge is invalid or already present **
    fn add_edges(&mut self, edges: impl IntoIterator<Item = impl Into<Edge>>) {
        for Edge(u, v, w) in edges.into_iter().map(|e| e.into()) {
            self.add_edge(u, v, w);
        }
    }

    /// Removes the edge `(u, v)` and returns its weight, or `None` if it was not present.
    /// ** Panics if `u >= n || v >= n` **
    fn try_remove_edge(&mut self, u: Node, v: Node) -> Option<Weight>;

    /// Removes the edge `(u, v)` and returns its weight.
    /// ** Panics if the edge is not present or `u >= n || v >= n` **
    fn remove_edge(&mut self, u: Node, v: Node) -> Weight {
        match self.try_remove_edge(u, v) {
            Some(w) => w,
            None => panic!("edge ({u},{v}) not present"),
        }
    }

    /// Sets the weight of `(u, v)` to `w`, inserting the edge if necessary.
    /// Returns the previous weight if the edge existed.
    /// ** Panics if `u >= n || v >= n` **
    fn set_edge_weight(&mut self, u: Node, v: Node, w: Weight) -> Option<Weight>;

    /// Adds `delta` to the weight of an existing edge `(u, v)` and returns the new weight.
    /// Returns `None` (and leaves the graph unchanged) if the edge does not exist.
    /// ** Panics if `u >= n || v >= n` **
    fn modify_edge_weight(&mut self, u: Node, v: Node, delta: Weight) -> Option<Weight> {
        let w = self.edge_weight(u, v)? + delta;
        self.set_edge_weight(u, v, w);
        Some(w)
    }

    /// Removes all edges of the graph while keeping its nodes
    fn clear_edges(&mut self) {
        for u in self.vertices() {
            let heads = self.out_neighbors_of(u).collect_vec();
            for v in heads {
                self.try_remove_edge(u, v);
            }
        }
    }
}

/// Everything the network flow algorithms require from a graph representation.
///
/// Working graphs (flow, residual, level, cost-residual) are created via [`GraphNew::isolated`]
/// and hence share the representation of the graph passed in by the caller.
/// `Sync` is required as shortest path searches may relax a graph from several threads.
pub trait FlowGraph: GraphNew + WeightedEdgeEditing + Clone + Send + Sync {}

impl<G> FlowGraph for G where G: GraphNew + WeightedEdgeEditing + Clone + Send + Sync {}
