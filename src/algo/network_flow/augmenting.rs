/*!
# Augmenting Strategies

An [`AugmentingStrategy`] finds *one* flow-carrying structure in a residual graph: an
[`AugmentingFlow`] whose edges are residual edges weighted by the amount to push over them.
If the sink is unreachable from the source, strategies return `None`.

Strategies are stateless and can be shared between calls. Any function or closure
`Fn(&G, Node, Node) -> Option<AugmentingFlow<G>>` is a strategy as well.

The path based strategies in this module differ in which path they select:
- [`ShortestAugmentingPath`]: fewest edges (breadth-first search; Edmonds-Karp),
- [`WidestAugmentingPath`]: largest bottleneck,
- [`WidestShortestAugmentingPath`]: largest bottleneck among the paths with fewest edges.

If several widest paths exist, the search settles nodes by decreasing bottleneck and, among equal
bottlenecks, by increasing node id.
*/

use std::{cmp::Reverse, collections::BinaryHeap};

use super::*;

/// A flow in a residual graph from source to sink
#[derive(Debug, Clone)]
pub struct AugmentingFlow<G> {
    /// Amount of flow the structure carries from source to sink
    pub value: Weight,
    /// Residual edges weighted by the amount of flow to push over them
    pub flow: G,
}

impl<G: FlowGraph> AugmentingFlow<G> {
    /// Creates the augmenting flow of a path in `residual`: every edge carries the bottleneck.
    /// Returns `None` for an empty path.
    pub fn from_path(residual: &G, path: &[Edge]) -> Option<Self> {
        if path.is_empty() {
            return None;
        }

        let value = path
            .iter()
            .map(|e| e.weight())
            .fold(Weight::INFINITY, Weight::min);

        let mut flow = residual.isolated();
        for e in path {
            flow.add_edge(e.tail(), e.head(), value);
        }

        Some(Self { value, flow })
    }
}

/// Finds augmenting structures in residual graphs
pub trait AugmentingStrategy<G: FlowGraph> {
    /// Returns a flow from `s` to `t` in `residual` or `None` if `t` is unreachable from `s`.
    /// Edges of `residual` with non-positive weight must be ignored.
    fn find(&self, residual: &G, s: Node, t: Node) -> Option<AugmentingFlow<G>>;
}

impl<G, F> AugmentingStrategy<G> for F
where
    G: FlowGraph,
    F: Fn(&G, Node, Node) -> Option<AugmentingFlow<G>>,
{
    fn find(&self, residual: &G, s: Node, t: Node) -> Option<AugmentingFlow<G>> {
        self(residual, s, t)
    }
}

/// Augments along a path with the fewest edges
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestAugmentingPath;

impl<G: FlowGraph> AugmentingStrategy<G> for ShortestAugmentingPath {
    fn find(&self, residual: &G, s: Node, t: Node) -> Option<AugmentingFlow<G>> {
        let mut info = vec![PathInfo::default(); residual.len()];
        for visit in residual.bfs(s).positive_only().stop_at(t) {
            info[visit.node as usize] = PathInfo {
                distance: Some(visit.depth as Weight),
                last_edge: visit.via,
            };
        }

        let path = trace_back(&info, s, t)?;
        AugmentingFlow::from_path(residual, &path)
    }
}

/// Augments along a path with maximum bottleneck
#[derive(Debug, Clone, Copy, Default)]
pub struct WidestAugmentingPath;

impl<G: FlowGraph> AugmentingStrategy<G> for WidestAugmentingPath {
    fn find(&self, residual: &G, s: Node, t: Node) -> Option<AugmentingFlow<G>> {
        let path = widest_path(residual, s, t, |_| true)?;
        AugmentingFlow::from_path(residual, &path)
    }
}

/// Augments along a path with maximum bottleneck among all paths with the fewest edges
#[derive(Debug, Clone, Copy, Default)]
pub struct WidestShortestAugmentingPath;

impl<G: FlowGraph> AugmentingStrategy<G> for WidestShortestAugmentingPath {
    fn find(&self, residual: &G, s: Node, t: Node) -> Option<AugmentingFlow<G>> {
        let hops = residual.bfs_distances(s);
        let target_hops = hops[t as usize]?;

        // only edges advancing by one layer, and never beyond the layer of `t`
        let path = widest_path(residual, s, t, |e| {
            match (hops[e.tail() as usize], hops[e.head() as usize]) {
                (Some(hu), Some(hv)) => hv == hu + 1 && hv <= target_hops,
                _ => false,
            }
        })?;
        AugmentingFlow::from_path(residual, &path)
    }
}

/// Maximum bottleneck path from `s` to `t` over the admissible edges of positive weight.
///
/// Bottlenecks are positive, so their bit patterns order like the values themselves.
fn widest_path<G, F>(residual: &G, s: Node, t: Node, admissible: F) -> Option<Vec<Edge>>
where
    G: FlowGraph,
    F: Fn(&Edge) -> bool,
{
    let mut info = vec![PathInfo::default(); residual.len()];
    let mut settled = vec![false; residual.len()];
    info[s as usize].distance = Some(Weight::INFINITY);

    let mut heap = BinaryHeap::new();
    heap.push((Weight::INFINITY.to_bits(), Reverse(s)));

    while let Some((width, Reverse(u))) = heap.pop() {
        if settled[u as usize] {
            continue;
        }
        settled[u as usize] = true;
        if u == t {
            break;
        }

        let width = Weight::from_bits(width);
        for e in residual.out_edges_of(u) {
            if e.weight() <= 0.0 || settled[e.head() as usize] || !admissible(&e) {
                continue;
            }

            let candidate = width.min(e.weight());
            let label = &mut info[e.head() as usize];
            if label.distance.is_none_or(|w| w < candidate) {
                label.distance = Some(candidate);
                label.last_edge = Some(e);
                heap.push((candidate.to_bits(), Reverse(e.head())));
            }
        }
    }

    trace_back(&info, s, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 -> 1 -> 4 has bottleneck 1, 0 -> 2 -> 3 -> 4 has bottleneck 5
    fn two_routes() -> AdjArray {
        AdjArray::from_edges(
            5,
            [
                (0, 1, 10.0),
                (1, 4, 1.0),
                (0, 2, 5.0),
                (2, 3, 6.0),
                (3, 4, 7.0),
            ],
        )
    }

    fn path_of(aug: &AugmentingFlow<AdjArray>) -> Vec<(Node, Node)> {
        aug.flow.ordered_edges(false).map(|e| e.endpoints()).collect()
    }

    #[test]
    fn shortest_path_prefers_fewer_edges() {
        let residual = two_routes();
        let aug = ShortestAugmentingPath.find(&residual, 0, 4).unwrap();
        assert_eq!(aug.value, 1.0);
        assert_eq!(path_of(&aug), vec![(0, 1), (1, 4)]);
        assert!(aug.flow.edges(false).all(|e| e.weight() == 1.0));
    }

    #[test]
    fn widest_path_prefers_bottleneck() {
        let residual = two_routes();
        let aug = WidestAugmentingPath.find(&residual, 0, 4).unwrap();
        assert_eq!(aug.value, 5.0);
        assert_eq!(path_of(&aug), vec![(0, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn widest_shortest_stays_in_layers() {
        let mut residual = two_routes();
        residual.add_edge(0, 3, 2.0);
        residual.add_edge(2, 4, 3.0);

        // among the two-edge paths, 0 -> 2 -> 4 is widest
        let aug = WidestShortestAugmentingPath.find(&residual, 0, 4).unwrap();
        assert_eq!(aug.value, 3.0);
        assert_eq!(path_of(&aug), vec![(0, 2), (2, 4)]);

        // the globally widest path is longer
        let aug = WidestAugmentingPath.find(&residual, 0, 4).unwrap();
        assert_eq!(aug.value, 5.0);
    }

    #[test]
    fn equal_bottlenecks_prefer_lower_ids() {
        let residual = AdjArray::from_edges(
            4,
            [(0, 2, 2.0), (0, 1, 2.0), (2, 3, 2.0), (1, 3, 2.0)],
        );
        let aug = WidestAugmentingPath.find(&residual, 0, 3).unwrap();
        assert_eq!(path_of(&aug), vec![(0, 1), (1, 3)]);
    }

    #[test]
    fn unreachable_sink_and_zero_edges() {
        let residual = AdjArray::from_edges(3, [(0, 1, 1.0), (1, 2, 0.0)]);
        assert!(ShortestAugmentingPath.find(&residual, 0, 2).is_none());
        assert!(WidestAugmentingPath.find(&residual, 0, 2).is_none());
        assert!(WidestShortestAugmentingPath.find(&residual, 0, 2).is_none());
    }

    #[test]
    fn closures_are_strategies() {
        let never = |_: &AdjArray, _: Node, _: Node| None;
        assert!(never.find(&two_routes(), 0, 4).is_none());
    }
}
