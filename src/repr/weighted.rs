/*!
# Weighted Graph

[`WeightedGraph`] stores the weighted out-neighborhood of every node together with in-degree
counters, so that both degree queries of the collaborator contract are `O(1)`.

Undirected graphs store an edge `{u, v}` in the neighborhoods of both endpoints (a loop is
stored once) and count it once in [`GraphEdgeOrder::number_of_edges`].
*/

use super::*;
use crate::testing::test_graph_ops;

/// A weighted simple graph with fixed node count and fixed directedness.
///
/// # Type parameters
/// - `Nbs`: [`Neighborhood`] implementation used for outgoing adjacency.
#[derive(Clone, Debug)]
pub struct WeightedGraph<Nbs>
where
    Nbs: Neighborhood,
{
    out_nbs: Vec<Nbs>,
    in_degrees: Vec<NumNodes>,
    num_edges: NumEdges,
    directed: bool,
}

/// Graph using adjacency arrays (`Vec<(Node, Weight)>`).
pub type AdjArray = WeightedGraph<ArrNeighborhood>;

/// Graph using sparse adjacency arrays (`SmallVec<[(Node, Weight); 8]>`).
pub type SparseAdjArray = WeightedGraph<SparseNeighborhood>;

/// Graph using a dense adjacency matrix of optional weights.
pub type AdjMatrix = WeightedGraph<MatrixNeighborhood>;

impl<Nbs: Neighborhood> GraphType for WeightedGraph<Nbs> {
    fn is_directed(&self) -> bool {
        self.directed
    }
}

impl<Nbs: Neighborhood> GraphNodeOrder for WeightedGraph<Nbs> {
    fn number_of_nodes(&self) -> NumNodes {
        self.out_nbs.len() as NumNodes
    }
}

impl<Nbs: Neighborhood> GraphEdgeOrder for WeightedGraph<Nbs> {
    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }
}

impl<Nbs: Neighborhood> WeightedAdjacencyList for WeightedGraph<Nbs> {
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = Edge> + '_ {
        self.out_nbs[u as usize]
            .neighbors()
            .map(move |(v, w)| Edge(u, v, w))
    }

    fn out_degree_of(&self, u: Node) -> NumNodes {
        self.out_nbs[u as usize].num_of_neighbors()
    }

    fn in_degree_of(&self, u: Node) -> NumNodes {
        self.in_degrees[u as usize]
    }

    fn edge_weight(&self, u: Node, v: Node) -> Option<Weight> {
        assert!(self.has_vertex(v));
        self.out_nbs[u as usize].weight_to(v)
    }

    fn in_weight_of(&self, u: Node) -> Weight {
        if self.directed {
            self.vertices().filter_map(|v| self.edge_weight(v, u)).sum()
        } else {
            self.out_weight_of(u)
        }
    }
}

impl<Nbs: Neighborhood> GraphNew for WeightedGraph<Nbs> {
    fn with_directedness(n: NumNodes, directed: bool) -> Self {
        assert!(n < INVALID_NODE);
        Self {
            out_nbs: vec![Nbs::new(n); n as usize],
            in_degrees: vec![0; n as usize],
            num_edges: 0,
            directed,
        }
    }
}

impl<Nbs: Neighborhood> WeightedEdgeEditing for WeightedGraph<Nbs> {
    fn try_add_edge(&mut self, u: Node, v: Node, w: Weight) -> bool {
        assert!(self.has_vertex(v));
        if self.out_nbs[u as usize].has_neighbor(v) {
            return true;
        }

        self.out_nbs[u as usize].add_neighbor(v, w);
        self.in_degrees[v as usize] += 1;
        if !self.directed && u != v {
            self.out_nbs[v as usize].add_neighbor(u, w);
            self.in_degrees[u as usize] += 1;
        }

        self.num_edges += 1;
        false
    }

    fn try_remove_edge(&mut self, u: Node, v: Node) -> Option<Weight> {
        assert!(self.has_vertex(v));
        let w = self.out_nbs[u as usize].try_remove_neighbor(v)?;
        self.in_degrees[v as usize] -= 1;
        if !self.directed && u != v {
            self.out_nbs[v as usize].try_remove_neighbor(u);
            self.in_degrees[u as usize] -= 1;
        }

        self.num_edges -= 1;
        Some(w)
    }

    fn set_edge_weight(&mut self, u: Node, v: Node, w: Weight) -> Option<Weight> {
        assert!(self.has_vertex(v));
        let prev = self.out_nbs[u as usize].set_weight(v, w);
        if !self.directed && u != v {
            self.out_nbs[v as usize].set_weight(u, w);
        }

        if prev.is_none() {
            self.in_degrees[v as usize] += 1;
            if !self.directed && u != v {
                self.in_degrees[u as usize] += 1;
            }
            self.num_edges += 1;
        }

        prev
    }

    fn clear_edges(&mut self) {
        self.out_nbs.iter_mut().for_each(|nbs| nbs.clear());
        self.in_degrees.iter_mut().for_each(|d| *d = 0);
        self.num_edges = 0;
    }
}

test_graph_ops!(
    test_adj_array,
    AdjArray,
    (GraphNew, WeightedAdjacencyList, WeightedEdgeEditing, Undirected)
);
test_graph_ops!(
    test_sparse_adj_array,
    SparseAdjArray,
    (GraphNew, WeightedAdjacencyList, WeightedEdgeEditing, Undirected)
);
test_graph_ops!(
    test_adj_matrix,
    AdjMatrix,
    (GraphNew, WeightedAdjacencyList, WeightedEdgeEditing, Undirected)
);
