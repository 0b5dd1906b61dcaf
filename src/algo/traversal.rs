/*!
Breadth-first traversals and traversal-derived labels.

This module provides:
- [`BFS`], a lazy breadth-first iterator that yields every reached node with its hop-distance
  from the start and the edge it was discovered through,
- the [`Traversal`] trait that exposes hop-distance labels, reachability and hop-distances
  *towards* a target directly as methods on graph data structures.

Edges of weight `<= 0` count as absent if the traversal is built with
[`BFS::positive_only`]; residual graphs use this to ignore exhausted edges.
*/

use super::*;
use std::collections::VecDeque;

/// A node reached by a traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit {
    /// The reached node
    pub node: Node,
    /// Number of edges on the traversal-tree path from the start
    pub depth: NumNodes,
    /// Edge through which `node` was discovered; `None` for the start node
    pub via: Option<Edge>,
}

/// A BFS traversal iterator over the graph, visiting nodes in
/// breadth-first order from a given starting node.
pub struct BFS<'a, G>
where
    G: WeightedAdjacencyList,
{
    graph: &'a G,
    visited: Vec<bool>,
    queue: VecDeque<Visit>,
    stop_at: Option<Node>,
    positive_only: bool,
}

impl<'a, G> BFS<'a, G>
where
    G: WeightedAdjacencyList,
{
    /// Creates a new traversal iterator starting from `start`.
    pub fn new(graph: &'a G, start: Node) -> Self {
        let mut visited = vec![false; graph.len()];
        visited[start as usize] = true;
        Self {
            graph,
            visited,
            queue: VecDeque::from(vec![Visit {
                node: start,
                depth: 0,
                via: None,
            }]),
            stop_at: None,
            positive_only: false,
        }
    }

    /// Sets a stopper node. If this node is reached, the iterator returns it and afterwards only None.
    pub fn set_stop_at(&mut self, stopper: Node) {
        self.stop_at = Some(stopper);
    }

    /// Sets a stopper node. If this node is reached, the iterator returns it and afterwards only None.
    pub fn stop_at(mut self, stopper: Node) -> Self {
        self.set_stop_at(stopper);
        self
    }

    /// Only follow edges with a strictly positive weight
    pub fn positive_only(mut self) -> Self {
        self.positive_only = true;
        self
    }

    /// Returns *true* if `u` was discovered so far
    pub fn did_visit_node(&self, u: Node) -> bool {
        self.visited[u as usize]
    }
}

impl<G> Iterator for BFS<'_, G>
where
    G: WeightedAdjacencyList,
{
    type Item = Visit;

    fn next(&mut self) -> Option<Self::Item> {
        let popped = self.queue.pop_front()?;
        let u = popped.node;

        if self.stop_at == Some(u) {
            self.queue.clear();
        } else {
            for e in self.graph.out_edges_of(u) {
                let v = e.head();
                if self.visited[v as usize] || (self.positive_only && e.weight() <= 0.0) {
                    continue;
                }
                self.visited[v as usize] = true;
                self.queue.push_back(Visit {
                    node: v,
                    depth: popped.depth + 1,
                    via: Some(e),
                });
            }
        }

        Some(popped)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.graph.len()))
    }
}

/// Traversal based labels implemented directly on graphs
pub trait Traversal: WeightedAdjacencyList {
    /// Returns a breadth-first traversal starting at `start`
    /// ** Panics if `start >= n` **
    fn bfs(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Returns the hop-distance of every node from `start`; `None` if unreachable.
    /// Edges of non-positive weight are ignored.
    /// ** Panics if `start >= n` **
    fn bfs_distances(&self, start: Node) -> Vec<Option<NumNodes>> {
        let mut distances = vec![None; self.len()];
        for visit in self.bfs(start).positive_only() {
            distances[visit.node as usize] = Some(visit.depth);
        }
        distances
    }

    /// Returns the hop-distance of every node *towards* `target`; `None` if `target` cannot be reached.
    /// Edges of non-positive weight are ignored.
    /// ** Panics if `target >= n` **
    fn reverse_bfs_distances(&self, target: Node) -> Vec<Option<NumNodes>> {
        let mut in_nbs = vec![Vec::new(); self.len()];
        for e in self.edges(false).filter(|e| e.weight() > 0.0) {
            in_nbs[e.head() as usize].push(e.tail());
        }

        let mut distances = vec![None; self.len()];
        distances[target as usize] = Some(0);
        let mut queue = VecDeque::from(vec![target]);
        while let Some(v) = queue.pop_front() {
            let depth = distances[v as usize].map(|d| d + 1);
            for &u in &in_nbs[v as usize] {
                if distances[u as usize].is_none() {
                    distances[u as usize] = depth;
                    queue.push_back(u);
                }
            }
        }
        distances
    }

    /// Returns for every node whether it is reachable from `start` via edges of positive weight
    /// ** Panics if `start >= n` **
    fn reachable_from(&self, start: Node) -> Vec<bool> {
        let mut bfs = self.bfs(start).positive_only();
        bfs.by_ref().for_each(drop);
        bfs.visited
    }

    /// Returns *true* if there is a path of positive-weight edges from `u` to `v`
    /// ** Panics if `u >= n || v >= n` **
    fn is_reachable(&self, u: Node, v: Node) -> bool {
        self.bfs(u).positive_only().stop_at(v).any(|visit| visit.node == v)
    }
}

impl<G> Traversal for G where G: WeightedAdjacencyList {}
