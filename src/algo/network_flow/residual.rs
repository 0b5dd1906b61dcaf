/*!
# Flow Networks

A [`FlowNetwork`] couples a read-only capacity graph with the two working graphs of a flow
computation: the *flow graph* (every capacity edge, weighted by the flow it carries) and the
*residual graph* (remaining augmentable capacity).

After every call to [`FlowNetwork::augment_edge`] the residual graph contains the edge `(u, v)`
exactly if `r = c(u, v) - f(u, v) + f(v, u) > 0`, weighted by that value. Values of `r` that are
within a few ulps of zero relative to `c(u, v) + f(v, u)` count as zero: they are what remains
of an edge saturated by several fractional pushes. For a capacity edge without
an opposite edge this is the usual forward edge `c - f` and backward edge `f`.
*/

use super::*;

/// Residual capacities at most this fraction of the capacity they stem from are rounding noise
/// of a saturated edge and are not kept in the residual graph
const ROUNDING_NOISE: Weight = 8.0 * Weight::EPSILON;

/// Checks the preconditions shared by all flow computations on `capacity`
pub(crate) fn check_network<G: FlowGraph>(capacity: &G, s: Node, t: Node) -> Result<()> {
    if capacity.is_undirected() {
        return Err(FlowError::UndirectedGraph);
    }

    for node in [s, t] {
        if !capacity.has_vertex(node) {
            return Err(FlowError::NodeOutOfRange {
                node,
                n: capacity.number_of_nodes(),
            });
        }
    }

    if s == t {
        return Err(FlowError::SourceIsSink(s));
    }

    // NaN fails the comparison as well
    if let Some(Edge(u, v, capacity)) = capacity.edges(false).find(|e| !(e.weight() >= 0.0)) {
        return Err(FlowError::NegativeCapacity { u, v, capacity });
    }

    Ok(())
}

/// Flow leaving `u` minus flow entering `u`
pub(crate) fn net_outflow<G: FlowGraph>(flow: &G, u: Node) -> Weight {
    flow.out_weight_of(u) - flow.in_weight_of(u)
}

/// Returns *true* if flow is conserved up to `tolerance` at every node other than `s` and `t`
pub(crate) fn is_conserved<G: FlowGraph>(flow: &G, s: Node, t: Node, tolerance: Weight) -> bool {
    let mut balance = vec![0.0; flow.len()];
    for Edge(u, v, f) in flow.edges(false) {
        balance[u as usize] -= f;
        balance[v as usize] += f;
    }
    flow.vertices()
        .filter(|&u| u != s && u != t)
        .all(|u| balance[u as usize].abs() <= tolerance)
}

/// Flow and residual graph of a single flow computation on a borrowed capacity graph.
#[derive(Debug, Clone)]
pub struct FlowNetwork<'a, G> {
    capacity: &'a G,
    flow: G,
    residual: G,
    source: Node,
    sink: Node,
    value: Weight,
}

impl<'a, G: FlowGraph> FlowNetwork<'a, G> {
    /// Creates the network of the zero flow.
    ///
    /// Fails if `capacity` is undirected, if `s` or `t` are not nodes of `capacity`, if `s == t` or
    /// if any capacity is negative.
    pub fn new(capacity: &'a G, s: Node, t: Node) -> Result<Self> {
        check_network(capacity, s, t)?;

        let mut flow = capacity.isolated();
        let mut residual = capacity.isolated();
        for Edge(u, v, c) in capacity.edges(false) {
            flow.add_edge(u, v, 0.0);
            if c > 0.0 && u != v {
                residual.add_edge(u, v, c);
            }
        }

        Ok(Self {
            capacity,
            flow,
            residual,
            source: s,
            sink: t,
            value: 0.0,
        })
    }

    /// Creates the network of an existing flow.
    ///
    /// Only the capacity edges of `flow` are read; their weights are clamped into `[0, c]`.
    /// The flow is not checked for conservation.
    pub fn with_flow(capacity: &'a G, flow: &G, s: Node, t: Node) -> Result<Self> {
        let mut network = Self::new(capacity, s, t)?;
        for Edge(u, v, c) in capacity.edges(false) {
            let f = flow.edge_weight(u, v).unwrap_or(0.0).clamp(0.0, c);
            network.flow.set_edge_weight(u, v, f);
        }
        network.rebuild_residual();
        Ok(network)
    }

    /// Source of the network
    pub fn source(&self) -> Node {
        self.source
    }

    /// Sink of the network
    pub fn sink(&self) -> Node {
        self.sink
    }

    /// The capacity graph the network was built on
    pub fn capacity(&self) -> &G {
        self.capacity
    }

    /// Current flow: every capacity edge weighted by the flow it carries
    pub fn flow(&self) -> &G {
        &self.flow
    }

    /// Current residual graph
    pub fn residual(&self) -> &G {
        &self.residual
    }

    /// Net flow leaving the source
    pub fn value(&self) -> Weight {
        self.value
    }

    /// Pushes `amount` units from `u` to `v` along the residual edge `(u, v)`.
    ///
    /// Flow on `(v, u)` is cancelled first; only the remainder is added to `(u, v)`, which never
    /// exceeds its capacity. Afterwards, the residual entries of both directions are recomputed.
    /// Loops are ignored.
    pub fn augment_edge(&mut self, u: Node, v: Node, amount: Weight) {
        if u == v || amount <= 0.0 {
            return;
        }

        let mut rest = amount;
        if let Some(back) = self.flow.edge_weight(v, u) {
            let cancel = rest.min(back);
            if cancel > 0.0 {
                self.flow.set_edge_weight(v, u, back - cancel);
                rest -= cancel;
            }
        }

        if rest > 0.0 {
            match (self.flow.edge_weight(u, v), self.capacity.edge_weight(u, v)) {
                (Some(f), Some(c)) => {
                    debug_assert!(f + rest <= c * (1.0 + 1e-12), "overshoot on ({u},{v})");
                    self.flow.set_edge_weight(u, v, (f + rest).min(c));
                }
                _ => debug_assert!(false, "({u},{v}) carries no residual capacity"),
            }
        }

        if u == self.source {
            self.value += amount;
        } else if v == self.source {
            self.value -= amount;
        }

        self.refresh_residual(u, v);
        self.refresh_residual(v, u);
    }

    /// Pushes an augmenting flow, i.e. every edge of `augmenting.flow` by its weight
    pub fn augment(&mut self, augmenting: &AugmentingFlow<G>) {
        for Edge(u, v, amount) in augmenting.flow.edges(false) {
            self.augment_edge(u, v, amount);
        }
    }

    /// Marks all nodes reachable from the source in the residual graph.
    /// For a maximum flow, these form the source side of a minimum cut.
    pub fn min_cut_source_side(&self) -> Vec<bool> {
        self.residual.reachable_from(self.source)
    }

    /// Consumes the network and returns the flow and its value
    pub fn into_result(self) -> FlowResult<G> {
        FlowResult {
            value: self.value,
            flow: self.flow,
        }
    }

    fn residual_capacity(&self, u: Node, v: Node) -> Weight {
        self.capacity.edge_weight(u, v).unwrap_or(0.0) - self.flow.edge_weight(u, v).unwrap_or(0.0)
            + self.flow.edge_weight(v, u).unwrap_or(0.0)
    }

    fn refresh_residual(&mut self, u: Node, v: Node) {
        let r = self.residual_capacity(u, v);
        let scale = self.capacity.edge_weight(u, v).unwrap_or(0.0)
            + self.flow.edge_weight(v, u).unwrap_or(0.0);
        if r > scale * ROUNDING_NOISE {
            self.residual.set_edge_weight(u, v, r);
        } else {
            self.residual.try_remove_edge(u, v);
        }
    }

    fn rebuild_residual(&mut self) {
        self.residual.clear_edges();
        for Edge(u, v, _) in self.capacity.edges(false).filter(|e| !e.is_loop()) {
            self.refresh_residual(u, v);
            self.refresh_residual(v, u);
        }
        self.value = net_outflow(&self.flow, self.source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_networks() {
        let graph = AdjArray::from_edges(3, [(0, 1, 1.0), (1, 2, 2.0)]);
        assert_eq!(
            FlowNetwork::new(&graph, 1, 1).unwrap_err(),
            FlowError::SourceIsSink(1)
        );
        assert_eq!(
            FlowNetwork::new(&graph, 0, 3).unwrap_err(),
            FlowError::NodeOutOfRange { node: 3, n: 3 }
        );

        let undirected = AdjArray::from_edges_undirected(3, [(0, 1, 1.0)]);
        assert_eq!(
            FlowNetwork::new(&undirected, 0, 1).unwrap_err(),
            FlowError::UndirectedGraph
        );

        let negative = AdjArray::from_edges(3, [(0, 1, 1.0), (1, 2, -2.0)]);
        assert_eq!(
            FlowNetwork::new(&negative, 0, 2).unwrap_err(),
            FlowError::NegativeCapacity {
                u: 1,
                v: 2,
                capacity: -2.0
            }
        );

        let nan = AdjArray::from_edges(2, [(0, 1, Weight::NAN)]);
        assert!(matches!(
            FlowNetwork::new(&nan, 0, 1).unwrap_err(),
            FlowError::NegativeCapacity { u: 0, v: 1, .. }
        ));
    }

    #[test]
    fn residual_invariant_after_augmentations() {
        let capacity = AdjArray::from_edges(3, [(0, 1, 3.0), (1, 2, 2.0), (0, 2, 0.0)]);
        let mut network = FlowNetwork::new(&capacity, 0, 2).unwrap();

        // zero capacity edges are part of the flow but not of the residual graph
        assert_eq!(network.flow().edge_weight(0, 2), Some(0.0));
        assert!(!network.residual().has_edge(0, 2));

        network.augment_edge(0, 1, 2.0);
        network.augment_edge(1, 2, 2.0);
        assert_eq!(network.value(), 2.0);
        assert_eq!(network.residual().edge_weight(0, 1), Some(1.0));
        assert_eq!(network.residual().edge_weight(1, 0), Some(2.0));
        assert_eq!(network.residual().edge_weight(1, 2), None);
        assert_eq!(network.residual().edge_weight(2, 1), Some(2.0));

        // cancel flow along the backward edge
        network.augment_edge(2, 1, 1.5);
        assert_eq!(network.flow().edge_weight(1, 2), Some(0.5));
        assert_eq!(network.residual().edge_weight(1, 2), Some(1.5));
        assert_eq!(network.residual().edge_weight(2, 1), Some(0.5));

        assert_eq!(network.min_cut_source_side(), vec![true, true, true]);
    }

    #[test]
    fn anti_parallel_edges_cancel_before_adding() {
        let capacity = AdjArray::from_edges(3, [(0, 1, 2.0), (1, 0, 1.0), (1, 2, 5.0)]);
        let mut network = FlowNetwork::new(&capacity, 0, 2).unwrap();
        assert_eq!(network.residual().edge_weight(0, 1), Some(2.0));
        assert_eq!(network.residual().edge_weight(1, 0), Some(1.0));

        network.augment_edge(1, 0, 1.0);
        assert_eq!(network.flow().edge_weight(1, 0), Some(1.0));
        assert_eq!(network.value(), -1.0);

        // first cancels the unit on (1, 0), then adds one unit to (0, 1)
        network.augment_edge(0, 1, 2.0);
        assert_eq!(network.flow().edge_weight(1, 0), Some(0.0));
        assert_eq!(network.flow().edge_weight(0, 1), Some(1.0));
        assert_eq!(network.value(), 1.0);
        assert_eq!(network.residual().edge_weight(0, 1), Some(1.0));
        assert_eq!(network.residual().edge_weight(1, 0), Some(2.0));
    }

    #[test]
    fn saturation_by_fractional_pushes() {
        let capacity = AdjArray::from_edges(2, [(0, 1, 1.0)]);
        let mut network = FlowNetwork::new(&capacity, 0, 1).unwrap();

        // 0.7 + 0.2 + 0.1 falls one ulp short of 1.0
        for amount in [0.7, 0.2, 0.1] {
            network.augment_edge(0, 1, amount);
        }
        assert!(network.flow().edge_weight(0, 1).unwrap() < 1.0);
        assert!(!network.residual().has_edge(0, 1));
        assert!(network.residual().has_edge(1, 0));
        assert_eq!(MaxFlow::new().run(network.residual(), 0, 1).unwrap().value, 0.0);
    }

    #[test]
    fn with_flow_restores_residual() {
        let capacity = AdjArray::from_edges(4, [(0, 1, 2.0), (1, 3, 2.0), (0, 2, 1.0), (2, 3, 4.0)]);
        let flow = AdjArray::from_edges(4, [(0, 1, 2.0), (1, 3, 2.0), (0, 2, 1.0), (2, 3, 1.0)]);

        let network = FlowNetwork::with_flow(&capacity, &flow, 0, 3).unwrap();
        assert_eq!(network.value(), 3.0);
        assert!(!network.residual().has_edge(0, 1));
        assert_eq!(network.residual().edge_weight(2, 3), Some(3.0));
        assert_eq!(network.residual().edge_weight(3, 2), Some(1.0));
        assert_eq!(
            network.min_cut_source_side(),
            vec![true, false, false, false]
        );

        let result = network.into_result();
        assert_eq!(result.value, 3.0);
        assert_eq!(result.flow.edge_weight(2, 3), Some(1.0));
    }
}
