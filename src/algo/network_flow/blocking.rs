/*!
# Blocking Flows

A *blocking flow* of a [`LevelGraph`] is a flow that saturates at least one edge on every
source-sink path of the level graph. Running a [`MaxFlow`] with a blocking flow finder as
augmenting strategy yields Dinic's method: each augmentation builds the level graph of the current
residual graph and pushes a blocking flow through it.

Finders report the amount pushed over every level graph edge (indexed by edge id):
- [`DinicBlockingFlow`] repeatedly walks from the sink towards the source along current arcs,
  saturates the bottleneck of every completed path and retracts from dead ends,
- [`MkmBlockingFlow`] (Malhotra, Kumar & Maheshwari) repeatedly selects the node of smallest
  throughput and pushes that much flow forward to the sink and backward to the source,
- [`DfsBlockingFlow`] runs a single depth-first search from the source bounded by the available
  flow. It uses an explicit stack and thus works on arbitrarily deep level graphs.

Every finder is an [`AugmentingStrategy`] itself.
*/

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use itertools::Itertools;
use log::trace;

use super::*;

/// Computes blocking flows in level graphs
pub trait BlockingFlow {
    /// Returns the amount of flow pushed over every edge of `level` (indexed by edge id).
    /// No edge carries more than its capacity and flow is conserved at all nodes other than
    /// source and sink.
    fn blocking_flow(&self, level: &LevelGraph) -> Vec<Weight>;
}

macro_rules! blocking_flow_strategy {
    ($($finder:ty),*) => {
        $(
            impl<G: FlowGraph> AugmentingStrategy<G> for $finder {
                fn find(&self, residual: &G, s: Node, t: Node) -> Option<AugmentingFlow<G>> {
                    let level = LevelGraph::build(residual, s, t)?;
                    let pushed = self.blocking_flow(&level);
                    let augmenting = level.to_augmenting_flow(residual, &pushed);
                    (augmenting.value > 0.0).then_some(augmenting)
                }
            }
        )*
    };
}

blocking_flow_strategy!(DinicBlockingFlow, MkmBlockingFlow, DfsBlockingFlow);

/// Path decomposition along current arcs, walking from the sink towards the source
#[derive(Debug, Clone, Copy, Default)]
pub struct DinicBlockingFlow;

impl BlockingFlow for DinicBlockingFlow {
    fn blocking_flow(&self, level: &LevelGraph) -> Vec<Weight> {
        let (s, t) = (level.source(), level.sink());
        let mut remaining = level.edges().iter().map(|e| e.capacity).collect_vec();
        let mut pushed = vec![0.0; remaining.len()];

        // index into `level.incoming(v)` of the first edge that may still be usable
        let mut current = vec![0usize; level.number_of_nodes() as usize];
        // edges from `t` to `v`, in walking order
        let mut path: Vec<usize> = Vec::new();
        let mut v = t;

        loop {
            if v == s {
                let bottleneck = path
                    .iter()
                    .map(|&id| remaining[id])
                    .fold(Weight::INFINITY, Weight::min);
                for &id in &path {
                    remaining[id] -= bottleneck;
                    pushed[id] += bottleneck;
                }
                trace!("dinic: path of {} edges carries {bottleneck}", path.len());

                // restart at the head of the saturated edge closest to `t`
                let saturated = path.iter().position(|&id| remaining[id] <= 0.0).unwrap_or(0);
                v = path.get(saturated).map_or(t, |&id| level.edge(id).head);
                path.truncate(saturated);
                continue;
            }

            let incoming = level.incoming(v);
            let arc = &mut current[v as usize];
            while *arc < incoming.len() && remaining[incoming[*arc]] <= 0.0 {
                *arc += 1;
            }

            if let Some(&id) = incoming.get(*arc) {
                path.push(id);
                v = level.edge(id).tail;
                continue;
            }

            // `v` cannot be reached from `s` anymore
            match path.pop() {
                Some(id) => {
                    v = level.edge(id).head;
                    current[v as usize] += 1;
                }
                None => break,
            }
        }

        pushed
    }
}

/// Throughput based blocking flow (Malhotra, Kumar & Maheshwari).
///
/// The throughput of a node is the minimum of its remaining incoming and outgoing capacity
/// (only outgoing for the source, only incoming for the sink). Ties are broken by smaller node id.
#[derive(Debug, Clone, Copy, Default)]
pub struct MkmBlockingFlow;

impl BlockingFlow for MkmBlockingFlow {
    fn blocking_flow(&self, level: &LevelGraph) -> Vec<Weight> {
        let mut state = Throughputs::new(level);

        while let Some(v) = state.min_throughput_node() {
            let throughput = state.throughput(v);
            if throughput > 0.0 {
                trace!("mkm: routing {throughput} through {v}");
                state.route(v, throughput, true);
                state.route(v, throughput, false);
            }

            state.remove_node(v);
            if v == level.source() || v == level.sink() {
                break;
            }
        }

        state.pushed
    }
}

struct Throughputs<'a> {
    level: &'a LevelGraph,
    remaining: Vec<Weight>,
    pushed: Vec<Weight>,
    in_capacity: Vec<Weight>,
    out_capacity: Vec<Weight>,
    alive: Vec<bool>,
    excess: Vec<Weight>,
    /// throughputs (as bits of non-negative values) at the time they were recorded;
    /// entries that no longer match the current throughput are skipped
    candidates: BinaryHeap<Reverse<(u64, Node)>>,
}

impl<'a> Throughputs<'a> {
    fn new(level: &'a LevelGraph) -> Self {
        let n = level.number_of_nodes() as usize;
        let mut in_capacity = vec![0.0; n];
        let mut out_capacity = vec![0.0; n];
        for e in level.edges() {
            out_capacity[e.tail as usize] += e.capacity;
            in_capacity[e.head as usize] += e.capacity;
        }

        let mut state = Self {
            level,
            remaining: level.edges().iter().map(|e| e.capacity).collect(),
            pushed: vec![0.0; level.number_of_edges()],
            in_capacity,
            out_capacity,
            alive: (0..n as Node).map(|u| level.level_of(u).is_some()).collect(),
            excess: vec![0.0; n],
            candidates: BinaryHeap::with_capacity(n),
        };
        for u in 0..n as Node {
            state.record(u);
        }
        state
    }

    fn throughput(&self, u: Node) -> Weight {
        let throughput = if u == self.level.source() {
            self.out_capacity[u as usize]
        } else if u == self.level.sink() {
            self.in_capacity[u as usize]
        } else {
            self.in_capacity[u as usize].min(self.out_capacity[u as usize])
        };
        // rounding may leave tiny negative values
        if throughput > 0.0 { throughput } else { 0.0 }
    }

    fn record(&mut self, u: Node) {
        if self.alive[u as usize] {
            self.candidates.push(Reverse((self.throughput(u).to_bits(), u)));
        }
    }

    /// Smallest throughput first, smaller id on ties
    fn min_throughput_node(&mut self) -> Option<Node> {
        while let Some(Reverse((bits, u))) = self.candidates.pop() {
            if self.alive[u as usize] && self.throughput(u).to_bits() == bits {
                return Some(u);
            }
        }
        None
    }

    /// Routes `amount` from `v` to the sink (`forward`) or from the source to `v`, handling the
    /// nodes layer by layer
    fn route(&mut self, v: Node, amount: Weight, forward: bool) {
        let level = self.level;
        let stop = if forward { level.sink() } else { level.source() };

        self.excess[v as usize] = amount;
        let mut queue = VecDeque::from(vec![v]);
        while let Some(u) = queue.pop_front() {
            let mut rest = std::mem::take(&mut self.excess[u as usize]);
            if u == stop {
                continue;
            }

            let ids = if forward {
                level.outgoing(u)
            } else {
                level.incoming(u)
            };

            for &id in ids {
                if rest <= 0.0 {
                    break;
                }

                let e = *level.edge(id);
                let w = if forward { e.head } else { e.tail };
                if !self.alive[w as usize] || self.remaining[id] <= 0.0 {
                    continue;
                }

                let amount = rest.min(self.remaining[id]);
                self.remaining[id] -= amount;
                self.pushed[id] += amount;
                self.out_capacity[e.tail as usize] -= amount;
                self.in_capacity[e.head as usize] -= amount;
                self.record(w);

                if self.excess[w as usize] <= 0.0 {
                    queue.push_back(w);
                }
                self.excess[w as usize] += amount;
                rest -= amount;
            }
            self.record(u);
        }
    }

    /// Deletes `v` together with all its edges
    fn remove_node(&mut self, v: Node) {
        let level = self.level;
        self.alive[v as usize] = false;
        for &id in level.incoming(v) {
            let tail = level.edge(id).tail;
            if self.alive[tail as usize] {
                self.out_capacity[tail as usize] -= self.remaining[id];
                self.record(tail);
            }
        }
        for &id in level.outgoing(v) {
            let head = level.edge(id).head;
            if self.alive[head as usize] {
                self.in_capacity[head as usize] -= self.remaining[id];
                self.record(head);
            }
        }
    }
}

/// Depth-first search from the source with an explicit stack
#[derive(Debug, Clone, Copy, Default)]
pub struct DfsBlockingFlow;

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: Node,
    /// Maximum amount this node may forward
    limit: Weight,
    /// Amount forwarded so far
    pushed: Weight,
    /// Amount requested from the child currently on top of this frame
    request: Weight,
}

impl Frame {
    fn new(node: Node, limit: Weight) -> Self {
        Self {
            node,
            limit,
            pushed: 0.0,
            request: 0.0,
        }
    }
}

impl BlockingFlow for DfsBlockingFlow {
    fn blocking_flow(&self, level: &LevelGraph) -> Vec<Weight> {
        let t = level.sink();
        let mut remaining = level.edges().iter().map(|e| e.capacity).collect_vec();
        let mut pushed = vec![0.0; remaining.len()];
        let mut current = vec![0usize; level.number_of_nodes() as usize];

        let mut stack = vec![Frame::new(level.source(), Weight::INFINITY)];
        // amount delivered by the frame popped last
        let mut returned: Option<Weight> = None;

        while let Some(&frame) = stack.last() {
            let top = stack.len() - 1;
            let u = frame.node;
            let outgoing = level.outgoing(u);

            if let Some(delivered) = returned.take() {
                let id = outgoing[current[u as usize]];
                remaining[id] -= delivered;
                pushed[id] += delivered;
                stack[top].pushed += delivered;

                // the child is exhausted or the edge saturated
                if delivered < frame.request || remaining[id] <= 0.0 {
                    current[u as usize] += 1;
                }
                continue;
            }

            if u == t {
                stack.pop();
                returned = Some(frame.limit);
                continue;
            }

            let budget = frame.limit - frame.pushed;
            let arc = &mut current[u as usize];
            while *arc < outgoing.len() && remaining[outgoing[*arc]] <= 0.0 {
                *arc += 1;
            }

            match outgoing.get(*arc) {
                Some(&id) if budget > 0.0 => {
                    let request = budget.min(remaining[id]);
                    stack[top].request = request;
                    stack.push(Frame::new(level.edge(id).head, request));
                }
                _ => {
                    stack.pop();
                    returned = Some(frame.pushed);
                }
            }
        }

        trace!(
            "dfs: blocking flow of value {}",
            returned.unwrap_or_default()
        );
        pushed
    }
}
