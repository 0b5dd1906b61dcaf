/*!
# Level Graphs

The level graph of a residual graph with respect to `s` and `t` contains exactly the residual edges
that lie on some shortest (fewest edges) `s-t` path. Every such edge runs from BFS layer `d` to
layer `d + 1`.

Edges live in an arena and are addressed by their index. The primary adjacency is the
*incoming* one, i.e. edges are oriented from the sink side towards the source side, so that
walks starting at `t` only ever see edges that can still reach `s`. Outgoing lists are kept as well
for finders that sweep forward.
*/

use itertools::Itertools;

use super::*;

/// An edge of a [`LevelGraph`] together with the residual capacity of the edge it represents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelEdge {
    pub tail: Node,
    pub head: Node,
    pub capacity: Weight,
}

/// The layered DAG of all shortest `s-t` paths in a residual graph
#[derive(Debug, Clone)]
pub struct LevelGraph {
    source: Node,
    sink: Node,
    levels: Vec<Option<NumNodes>>,
    edges: Vec<LevelEdge>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
}

impl LevelGraph {
    /// Builds the level graph of `residual`. Returns `None` if `t` is unreachable from `s`.
    /// Edges with non-positive residual capacity are ignored.
    /// ** Panics if `s >= n || t >= n` **
    pub fn build<G: FlowGraph>(residual: &G, s: Node, t: Node) -> Option<Self> {
        let n = residual.len();

        // all nodes in front of the layer of `t` are expanded before `t` is dequeued
        let mut levels = vec![None; n];
        for visit in residual.bfs(s).positive_only().stop_at(t) {
            levels[visit.node as usize] = Some(visit.depth);
        }
        let sink_level = levels[t as usize]?;

        let candidates = residual
            .edges(false)
            .filter(|e| e.weight() > 0.0)
            .filter(|e| match (levels[e.tail() as usize], levels[e.head() as usize]) {
                (Some(lu), Some(lv)) => lv == lu + 1 && lv <= sink_level,
                _ => false,
            })
            .collect_vec();

        // keep only edges whose head can still reach `t`
        let mut preds = vec![Vec::new(); n];
        for e in &candidates {
            preds[e.head() as usize].push(e.tail());
        }
        let mut useful = vec![false; n];
        useful[t as usize] = true;
        let mut stack = vec![t];
        while let Some(v) = stack.pop() {
            for &u in &preds[v as usize] {
                if !useful[u as usize] {
                    useful[u as usize] = true;
                    stack.push(u);
                }
            }
        }

        let mut graph = Self {
            source: s,
            sink: t,
            levels: vec![None; n],
            edges: Vec::new(),
            incoming: vec![Vec::new(); n],
            outgoing: vec![Vec::new(); n],
        };

        for Edge(u, v, capacity) in candidates.into_iter().filter(|e| useful[e.head() as usize]) {
            let id = graph.edges.len();
            graph.edges.push(LevelEdge {
                tail: u,
                head: v,
                capacity,
            });
            graph.incoming[v as usize].push(id);
            graph.outgoing[u as usize].push(id);
            graph.levels[u as usize] = levels[u as usize];
            graph.levels[v as usize] = levels[v as usize];
        }

        Some(graph)
    }

    /// Source of the level graph (layer `0`)
    pub fn source(&self) -> Node {
        self.source
    }

    /// Sink of the level graph (last layer)
    pub fn sink(&self) -> Node {
        self.sink
    }

    /// Number of nodes of the underlying residual graph
    pub fn number_of_nodes(&self) -> NumNodes {
        self.levels.len() as NumNodes
    }

    /// Returns the number of edges
    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Layer of `u` or `None` if `u` is on no shortest `s-t` path
    pub fn level_of(&self, u: Node) -> Option<NumNodes> {
        self.levels[u as usize]
    }

    /// All edges; the position of an edge is its id
    pub fn edges(&self) -> &[LevelEdge] {
        &self.edges
    }

    /// Edge with id `id`
    pub fn edge(&self, id: usize) -> &LevelEdge {
        &self.edges[id]
    }

    /// Ids of the edges entering `v`
    pub fn incoming(&self, v: Node) -> &[usize] {
        &self.incoming[v as usize]
    }

    /// Ids of the edges leaving `u`
    pub fn outgoing(&self, u: Node) -> &[usize] {
        &self.outgoing[u as usize]
    }

    /// Sum of the amounts pushed over the edges leaving the source
    pub fn flow_value(&self, pushed: &[Weight]) -> Weight {
        self.outgoing(self.source)
            .iter()
            .map(|&id| pushed[id])
            .sum()
    }

    /// Converts per-edge amounts into an augmenting flow of the residual graph
    /// the level graph was built from. Edges without flow are omitted.
    pub fn to_augmenting_flow<G: FlowGraph>(
        &self,
        residual: &G,
        pushed: &[Weight],
    ) -> AugmentingFlow<G> {
        let mut flow = residual.isolated();
        for (e, &amount) in self.edges.iter().zip(pushed) {
            if amount > 0.0 {
                flow.add_edge(e.tail, e.head, amount);
            }
        }

        AugmentingFlow {
            value: self.flow_value(pushed),
            flow,
        }
    }
}
