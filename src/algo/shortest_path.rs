/*!
# Shortest Paths with Negative Weights

[`BellmanFord`] computes single-source shortest paths on directed graphs with arbitrary
(including negative) edge weights and reports negative cycles.
It is the primitive the cycle-canceling minimum-cost flow builds upon.

The result is a [`PathInfo`] per node: the distance (`None` if unreached) and the last edge of a
shortest path. If a negative cycle is reachable, [`ShortestPaths::success`] is *false* and the
last-edge labels contain a cycle that [`ShortestPaths::negative_cycle`] extracts.

## Relaxation
The algorithm works in rounds. Each round relaxes the outgoing edges of all nodes whose distance
improved in the previous round (the *active* nodes). Without negative cycles no node is active after
`n` rounds.

- [`Relaxation::Sequential`] relaxes the active nodes one after another.
- [`Relaxation::Parallel`] partitions the active nodes of a round among the threads of a `rayon`
  pool. Each node's `(distance, last edge)` pair is guarded by its own lock; a relaxation only
  replaces it on strict improvement. The distances are thus deterministic, but if two relaxations
  produce the same distance, which last edge wins depends on the schedule. This may change which
  negative cycle is reported, never whether one is reported.
*/

use std::sync::Arc;

use itertools::Itertools;
use log::{trace, warn};
use parking_lot::Mutex;
use rayon::prelude::*;

use super::*;

/// Per-node result of a shortest path computation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathInfo {
    /// Length of the best known path; `None` if the node was not reached
    pub distance: Option<Weight>,
    /// Last edge of the best known path; `None` for start nodes and unreached nodes
    pub last_edge: Option<Edge>,
}

impl PathInfo {
    /// Label of a start node
    pub fn start() -> Self {
        Self {
            distance: Some(0.0),
            last_edge: None,
        }
    }

    /// Returns *true* if the node was reached
    pub fn is_reached(&self) -> bool {
        self.distance.is_some()
    }

    /// Replaces the label if `distance` is a strict improvement and returns whether it did
    fn improve(&mut self, distance: Weight, edge: Edge) -> bool {
        if self.distance.is_some_and(|d| d <= distance) {
            return false;
        }
        self.distance = Some(distance);
        self.last_edge = Some(edge);
        true
    }
}

/// Follows the `last_edge` labels from `target` back to `source` and returns the path edges in
/// forward order. Returns `None` if `target` was not reached or the labels do not lead to `source`.
pub fn trace_back(info: &[PathInfo], source: Node, target: Node) -> Option<Vec<Edge>> {
    info[target as usize].distance?;

    let mut path = Vec::new();
    let mut v = target;
    while v != source {
        let e = info[v as usize].last_edge?;
        path.push(e);
        v = e.tail();
        if path.len() > info.len() {
            return None;
        }
    }

    path.reverse();
    Some(path)
}

/// Result of a [`BellmanFord`] run
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    /// *false* exactly if a negative cycle is reachable from the start node(s)
    pub success: bool,
    /// Distance and last edge of every node
    pub info: Vec<PathInfo>,
}

impl ShortestPaths {
    /// Returns the distance to `u` or `None` if `u` is unreachable
    pub fn distance(&self, u: Node) -> Option<Weight> {
        self.info[u as usize].distance
    }

    /// Returns the edges of a shortest path from `source` to `target`.
    /// Only meaningful if the run succeeded.
    pub fn path(&self, source: Node, target: Node) -> Option<Vec<Edge>> {
        trace_back(&self.info, source, target)
    }

    /// Searches the last-edge labels for a cycle and returns its edges in forward order,
    /// starting with the edge leaving the node with the smallest id on the cycle.
    ///
    /// A cycle in the last-edge labels always has negative weight; cycles whose recorded weights do
    /// not sum to a negative value (possible only through floating point rounding) are skipped.
    pub fn negative_cycle(&self) -> Option<Vec<Edge>> {
        find_label_cycle(&self.info)
    }
}

fn find_label_cycle(info: &[PathInfo]) -> Option<Vec<Edge>> {
    const UNSEEN: u32 = u32::MAX;
    // walk id that first touched each node
    let mut seen_in = vec![UNSEEN; info.len()];

    for (walk, start) in (0..info.len() as Node).enumerate() {
        let walk = walk as u32;
        let mut v = start;
        loop {
            if seen_in[v as usize] != UNSEEN {
                if seen_in[v as usize] == walk {
                    let cycle = collect_cycle(info, v);
                    if cycle.iter().map(|e| e.weight()).sum::<Weight>() < 0.0 {
                        return Some(cycle);
                    }
                }
                break;
            }
            seen_in[v as usize] = walk;

            match info[v as usize].last_edge {
                Some(e) => v = e.tail(),
                None => break,
            }
        }
    }

    None
}

/// Collects the label cycle through `v`, rotated to start at its smallest node
fn collect_cycle(info: &[PathInfo], v: Node) -> Vec<Edge> {
    let mut cycle = Vec::new();
    let mut u = v;
    loop {
        // all nodes on a label cycle carry a last edge
        let Some(e) = info[u as usize].last_edge else {
            break;
        };
        cycle.push(e);
        u = e.tail();
        if u == v {
            break;
        }
    }
    cycle.reverse();

    let first = cycle
        .iter()
        .position_min_by_key(|e| e.tail())
        .unwrap_or(0);
    cycle.rotate_left(first);
    cycle
}

/// How the edges of a round are relaxed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relaxation {
    /// One thread relaxes all active nodes
    #[default]
    Sequential,
    /// Active nodes are partitioned among `num_threads` threads (`0` lets rayon decide)
    Parallel { num_threads: usize },
}

/// Bellman-Ford shortest paths, configurable to relax sequentially or in parallel.
#[derive(Clone, Default)]
pub struct BellmanFord {
    relaxation: Relaxation,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl std::fmt::Debug for BellmanFord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BellmanFord")
            .field("relaxation", &self.relaxation)
            .finish()
    }
}

impl BellmanFord {
    /// Sequential Bellman-Ford
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequential Bellman-Ford
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Bellman-Ford relaxing every round with `num_threads` threads (`0` lets rayon decide).
    /// Falls back to sequential relaxation if the thread pool cannot be created.
    pub fn parallel(num_threads: usize) -> Self {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("bellman-ford-{i}"))
            .build()
        {
            Ok(pool) => Self {
                relaxation: Relaxation::Parallel { num_threads },
                pool: Some(Arc::new(pool)),
            },
            Err(err) => {
                warn!("cannot build thread pool ({err}); relaxing sequentially");
                Self::default()
            }
        }
    }

    /// Returns the configured relaxation mode
    pub fn relaxation(&self) -> Relaxation {
        self.relaxation
    }

    /// Shortest paths from `source`
    /// ** Panics if `source >= n` **
    pub fn run<G>(&self, graph: &G, source: Node) -> ShortestPaths
    where
        G: WeightedAdjacencyList + Sync,
    {
        assert!(graph.has_vertex(source));
        let mut info = vec![PathInfo::default(); graph.len()];
        info[source as usize] = PathInfo::start();
        self.run_rounds(graph, info, vec![source])
    }

    /// Shortest paths from a virtual root connected to every node by an edge of weight `0`.
    /// Every node is reached and every negative cycle of the graph is detected.
    pub fn run_from_all<G>(&self, graph: &G) -> ShortestPaths
    where
        G: WeightedAdjacencyList + Sync,
    {
        let info = vec![PathInfo::start(); graph.len()];
        self.run_rounds(graph, info, graph.vertices().collect())
    }

    fn run_rounds<G>(&self, graph: &G, info: Vec<PathInfo>, mut active: Vec<Node>) -> ShortestPaths
    where
        G: WeightedAdjacencyList + Sync,
    {
        let n = graph.len();
        let mut labels = match &self.pool {
            Some(pool) => Labels::Locked {
                cells: info.into_iter().map(Mutex::new).collect(),
                pool,
            },
            None => Labels::Plain(info),
        };

        // beyond `n` rounds, labels only keep decreasing around negative cycles; a label cycle
        // has to show up eventually, the cap only guards against floating point stalls
        let max_rounds = n * (n + 2) + 2;
        let mut round = 0;
        while !active.is_empty() {
            round += 1;
            active = labels.relax_round(graph, &active);

            if round >= n && !active.is_empty() {
                let info = labels.snapshot();
                if find_label_cycle(&info).is_some() {
                    trace!("negative cycle after {round} rounds");
                    return ShortestPaths {
                        success: false,
                        info,
                    };
                }
                if round >= max_rounds {
                    warn!("no label cycle after {round} rounds despite ongoing improvements");
                    return ShortestPaths {
                        success: false,
                        info,
                    };
                }
            }
        }

        ShortestPaths {
            success: true,
            info: labels.into_info(),
        }
    }
}

/// Node labels during a run; locked per node when relaxed in parallel
enum Labels<'p> {
    Plain(Vec<PathInfo>),
    Locked {
        cells: Vec<Mutex<PathInfo>>,
        pool: &'p rayon::ThreadPool,
    },
}

impl Labels<'_> {
    /// Relaxes all outgoing edges of `active` and returns the nodes that improved (sorted, unique)
    fn relax_round<G>(&mut self, graph: &G, active: &[Node]) -> Vec<Node>
    where
        G: WeightedAdjacencyList + Sync,
    {
        let mut improved = match self {
            Labels::Plain(info) => {
                let mut improved = Vec::new();
                for &u in active {
                    let Some(du) = info[u as usize].distance else {
                        continue;
                    };
                    for e in graph.out_edges_of(u) {
                        if info[e.head() as usize].improve(du + e.weight(), e) {
                            improved.push(e.head());
                        }
                    }
                }
                improved
            }
            Labels::Locked { cells, pool } => {
                let cells: &[Mutex<PathInfo>] = cells;
                let chunk_size = active.len().div_ceil(4 * pool.current_num_threads()).max(1);

                // every task fills its own buffer; they are merged after the round
                let buffers: Vec<Vec<Node>> = pool.install(|| {
                    active
                        .par_chunks(chunk_size)
                        .map(|chunk| {
                            let mut buffer = Vec::new();
                            for &u in chunk {
                                let Some(du) = cells[u as usize].lock().distance else {
                                    continue;
                                };
                                for e in graph.out_edges_of(u) {
                                    if cells[e.head() as usize].lock().improve(du + e.weight(), e) {
                                        buffer.push(e.head());
                                    }
                                }
                            }
                            buffer
                        })
                        .collect()
                });
                buffers.into_iter().flatten().collect()
            }
        };

        improved.sort_unstable();
        improved.dedup();
        improved
    }

    fn snapshot(&self) -> Vec<PathInfo> {
        match self {
            Labels::Plain(info) => info.clone(),
            Labels::Locked { cells, .. } => cells.iter().map(|c| *c.lock()).collect(),
        }
    }

    fn into_info(self) -> Vec<PathInfo> {
        match self {
            Labels::Plain(info) => info,
            Labels::Locked { cells, .. } => cells.into_iter().map(Mutex::into_inner).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    fn graph_with_negative_edges() -> AdjArray {
        AdjArray::from_edges(
            6,
            [
                (0, 1, 4.0),
                (0, 2, 2.0),
                (2, 1, -1.0),
                (1, 3, 2.0),
                (2, 3, 5.0),
                (3, 4, -3.0),
                (5, 0, 1.0),
            ],
        )
    }

    #[test]
    fn distances_and_paths() {
        let graph = graph_with_negative_edges();
        for bf in [BellmanFord::sequential(), BellmanFord::parallel(3)] {
            let sp = bf.run(&graph, 0);
            assert!(sp.success);
            assert_eq!(sp.distance(0), Some(0.0));
            assert_eq!(sp.distance(1), Some(1.0));
            assert_eq!(sp.distance(2), Some(2.0));
            assert_eq!(sp.distance(3), Some(3.0));
            assert_eq!(sp.distance(4), Some(0.0));
            assert_eq!(sp.distance(5), None);
            assert!(sp.negative_cycle().is_none());

            assert_eq!(
                sp.path(0, 4).unwrap(),
                vec![
                    Edge(0, 2, 2.0),
                    Edge(2, 1, -1.0),
                    Edge(1, 3, 2.0),
                    Edge(3, 4, -3.0)
                ]
            );
            assert!(sp.path(0, 5).is_none());
            assert!(sp.info[4].is_reached());
            assert!(!sp.info[5].is_reached());
        }
    }

    #[test]
    fn relaxation_modes() {
        assert_eq!(BellmanFord::new().relaxation(), Relaxation::Sequential);
        assert_eq!(BellmanFord::sequential().relaxation(), Relaxation::Sequential);
        assert_eq!(
            BellmanFord::parallel(2).relaxation(),
            Relaxation::Parallel { num_threads: 2 }
        );
    }

    #[test]
    fn detects_negative_cycle() {
        let mut graph = graph_with_negative_edges();
        graph.add_edge(4, 2, 1.0); // 2 -> 1 -> 3 -> 4 -> 2 has weight -1

        for bf in [BellmanFord::sequential(), BellmanFord::parallel(2)] {
            let sp = bf.run(&graph, 0);
            assert!(!sp.success);

            let cycle = sp.negative_cycle().unwrap();
            assert_eq!(
                cycle,
                vec![
                    Edge(1, 3, 2.0),
                    Edge(3, 4, -3.0),
                    Edge(4, 2, 1.0),
                    Edge(2, 1, -1.0)
                ]
            );
        }
    }

    #[test]
    fn unreachable_cycle_needs_all_sources() {
        let graph = AdjArray::from_edges(4, [(0, 1, 1.0), (2, 3, -2.0), (3, 2, 1.0)]);

        let sp = BellmanFord::sequential().run(&graph, 0);
        assert!(sp.success);

        let sp = BellmanFord::sequential().run_from_all(&graph);
        assert!(!sp.success);
        assert_eq!(
            sp.negative_cycle().unwrap(),
            vec![Edge(2, 3, -2.0), Edge(3, 2, 1.0)]
        );
    }

    #[test]
    fn parallel_agrees_with_sequential() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        let parallel = BellmanFord::parallel(4);

        for n in [5 as NumNodes, 20, 60] {
            for _ in 0..10 {
                let mut graph = AdjArray::new(n);
                for _ in 0..4 * n {
                    let u = rng.random_range(0..n);
                    let v = rng.random_range(0..n);
                    graph.try_add_edge(u, v, rng.random_range(-2..20) as Weight);
                }

                let seq = BellmanFord::sequential().run(&graph, 0);
                let par = parallel.run(&graph, 0);
                assert_eq!(seq.success, par.success);

                if seq.success {
                    for u in graph.vertices() {
                        assert_eq!(seq.distance(u), par.distance(u));
                    }
                } else {
                    let cycle = par.negative_cycle().unwrap();
                    assert!(cycle.iter().map(|e| e.weight()).sum::<Weight>() < 0.0);
                    for (a, b) in cycle.iter().circular_tuple_windows() {
                        assert_eq!(a.head(), b.tail());
                        assert_eq!(graph.edge_weight(a.tail(), a.head()), Some(a.weight()));
                    }
                }
            }
        }
    }
}
