//! Greedy bus detection.
//!
//! A bus is a bundle of edges fanning out from one root node to distinct neighbours. A bundle is
//! accepted when the neighbours carry few edges that are not part of it ("interference"). When
//! the ratio is too high, interfering neighbours are evicted in candidate order until the ratio
//! holds or the bundle becomes too small.

use crate::data::DataMap;
use crate::graphlib::{EdgeId, NodeId};
use crate::model::LayoutGraph;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BusDetectionOptions {
    /// Smallest number of distinct neighbours a bus may have.
    pub min_bus_size: usize,
    /// Largest accepted `interference / size`.
    pub max_interference_ratio: f64,
}

impl Default for BusDetectionOptions {
    fn default() -> Self {
        Self {
            min_bus_size: 4,
            max_interference_ratio: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(pub usize);

/// An accepted bundle: its root, the bus edges, and the neighbours they lead to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedBus {
    pub root: NodeId,
    pub edges: Vec<EdgeId>,
    pub nodes: Vec<NodeId>,
}

/// Working set for one root. Interfering neighbours are evicted first-in first-out, i.e. in the
/// order the candidate edges listed them, not by degree.
struct BusCandidate {
    // Opposite node -> the edge that reaches it.
    members: IndexMap<NodeId, EdgeId, FxBuildHasher>,
    // Eviction queue, popped from the front.
    interfering: VecDeque<NodeId>,
    evicted: FxHashSet<NodeId>,
    interference: usize,
    size: usize,
}

impl BusCandidate {
    fn collect(
        g: &LayoutGraph,
        root: NodeId,
        used: &FxHashSet<NodeId>,
        candidate_edges: &[EdgeId],
    ) -> Self {
        let mut members: IndexMap<NodeId, EdgeId, FxBuildHasher> = IndexMap::default();
        let mut interfering = VecDeque::new();
        let mut interference = 0;

        for &e in candidate_edges {
            if g.is_edge_hidden(e) {
                continue;
            }
            let Some(other) = g.opposite(e, root) else {
                continue;
            };
            if other == root || used.contains(&other) || members.contains_key(&other) {
                continue;
            }
            members.insert(other, e);
            let degree = g.degree(other);
            if degree > 1 {
                interfering.push_back(other);
                interference += degree - 1;
            }
        }

        let size = members.len();
        Self {
            members,
            interfering,
            evicted: FxHashSet::default(),
            interference,
            size,
        }
    }

    fn evict_next(&mut self, g: &LayoutGraph) -> bool {
        let Some(n) = self.interfering.pop_front() else {
            return false;
        };
        self.evicted.insert(n);
        self.size -= 1;
        self.interference -= g.degree(n).saturating_sub(1);
        true
    }

    fn accepts(&self, opts: &BusDetectionOptions) -> bool {
        self.interference as f64 <= self.size as f64 * opts.max_interference_ratio
    }

    fn into_bus(self, root: NodeId) -> DetectedBus {
        let mut edges = Vec::with_capacity(self.size);
        let mut nodes = Vec::with_capacity(self.size);
        for (n, e) in self.members {
            if self.evicted.contains(&n) {
                continue;
            }
            nodes.push(n);
            edges.push(e);
        }
        DetectedBus { root, edges, nodes }
    }
}

/// Tries to form a bus at `root` out of `candidate_edges` (typically all in- or all out-edges).
///
/// Neighbours in `used` are skipped. Returns `None` when `root` is a group node or when no
/// bundle of at least `min_bus_size` neighbours satisfies the interference ratio.
pub fn detect_bus(
    g: &LayoutGraph,
    root: NodeId,
    used: &FxHashSet<NodeId>,
    candidate_edges: &[EdgeId],
    opts: &BusDetectionOptions,
) -> Option<DetectedBus> {
    if g.is_group(root) {
        return None;
    }

    let mut candidate = BusCandidate::collect(g, root, used, candidate_edges);
    while candidate.size >= opts.min_bus_size {
        if candidate.accepts(opts) {
            trace!(
                root = %root,
                size = candidate.size,
                interference = candidate.interference,
                "bus accepted"
            );
            return Some(candidate.into_bus(root));
        }
        if !candidate.evict_next(g) {
            break;
        }
    }
    trace!(root = %root, "no bus");
    None
}

/// Runs [`detect_bus`] on the incoming and then the outgoing edges of every non-group node.
///
/// Neighbours absorbed by an accepted bus are not reused by later buses and are not tried as
/// roots themselves.
pub fn detect_buses(g: &LayoutGraph, opts: &BusDetectionOptions) -> Vec<DetectedBus> {
    let mut used: FxHashSet<NodeId> = FxHashSet::default();
    let mut buses: Vec<DetectedBus> = Vec::new();

    let roots: Vec<NodeId> = g.nodes().collect();
    for root in roots {
        if g.is_group(root) {
            continue;
        }
        for incoming in [true, false] {
            if used.contains(&root) {
                break;
            }
            let edges = if incoming {
                g.in_edges(root)
            } else {
                g.out_edges(root)
            };
            if edges.len() < opts.min_bus_size {
                continue;
            }
            if let Some(bus) = detect_bus(g, root, &used, &edges, opts) {
                used.extend(bus.nodes.iter().copied());
                buses.push(bus);
            }
        }
    }

    debug!(buses = buses.len(), "bus detection finished");
    buses
}

/// Side-data map assigning each bus edge the index of its bus.
pub fn bus_id_map(buses: &[DetectedBus]) -> DataMap<EdgeId, BusId> {
    let mut map = DataMap::default();
    for (ix, bus) in buses.iter().enumerate() {
        for &e in &bus.edges {
            map.insert(e, BusId(ix));
        }
    }
    map
}
