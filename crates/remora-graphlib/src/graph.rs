//! Arena graph container.
//!
//! Elements are addressed by [`NodeId`] / [`EdgeId`] handles that stay valid for the lifetime of
//! the graph. Hidden elements keep their slot (and their labels) but are skipped by every
//! traversal, so hiding and showing are flag flips rather than structural edits.

mod entries;
mod ids;
mod options;

pub use ids::{EdgeId, ElementId, NodeId};
pub use options::GraphOptions;

use crate::error::{Error, Result};
use entries::{EdgeEntry, NodeEntry};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct Graph<N, E, G> {
    options: GraphOptions,

    graph_label: G,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, NodeId>,

    edges: Vec<EdgeEntry<E>>,

    parent: HashMap<NodeId, NodeId>,
    children: HashMap<NodeId, Vec<NodeId>>,
    groups: HashSet<NodeId>,

    hidden_nodes: usize,
    hidden_edges: usize,
}

impl<N, E, G> Graph<N, E, G>
where
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            parent: HashMap::default(),
            children: HashMap::default(),
            groups: HashSet::default(),
            hidden_nodes: 0,
            hidden_edges: 0,
        }
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default,
{
    /// Returns the node named `id`, creating it with a default label if needed.
    pub fn ensure_node(&mut self, id: &str) -> NodeId {
        if let Some(&n) = self.node_index.get(id) {
            return n;
        }
        self.set_node(id, N::default())
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default,
    E: Default,
{
    pub fn set_edge(&mut self, v: &str, w: &str) -> EdgeId {
        self.set_edge_with_label(v, w, E::default())
    }

    /// Adds a new edge between the named nodes, creating missing endpoints.
    ///
    /// Parallel edges are always allowed; every call creates a new edge.
    pub fn set_edge_with_label(&mut self, v: &str, w: &str, label: E) -> EdgeId {
        let source = self.ensure_node(v);
        let target = self.ensure_node(w);
        self.push_edge(source, target, label)
    }
}

impl<N, E, G> Graph<N, E, G> {
    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.node_index.get(id).copied()
    }

    pub fn node_name(&self, n: NodeId) -> Option<&str> {
        self.nodes.get(n.0).map(|e| e.id.as_str())
    }

    /// Inserts a node or replaces the label of an existing one.
    pub fn set_node(&mut self, id: &str, label: N) -> NodeId {
        if let Some(&n) = self.node_index.get(id) {
            self.nodes[n.0].label = label;
            return n;
        }
        let n = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            id: id.to_string(),
            label,
            out: Vec::new(),
            in_: Vec::new(),
            hidden: false,
        });
        self.node_index.insert(id.to_string(), n);
        n
    }

    pub fn node(&self, n: NodeId) -> Option<&N> {
        self.nodes.get(n.0).map(|e| &e.label)
    }

    pub fn node_mut(&mut self, n: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(n.0).map(|e| &mut e.label)
    }

    pub fn node_named(&self, id: &str) -> Option<&N> {
        self.node_id(id).and_then(|n| self.node(n))
    }

    /// Number of visible nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.hidden_nodes
    }

    /// Visible nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.hidden)
            .map(|(ix, _)| NodeId(ix))
    }

    /// Every node slot, hidden or not.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(NodeId, &mut N),
    {
        for (ix, n) in self.nodes.iter_mut().enumerate() {
            if !n.hidden {
                f(NodeId(ix), &mut n.label);
            }
        }
    }

    /// Adds a new edge between two existing nodes.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, label: E) -> Result<EdgeId> {
        self.check_node(source)?;
        self.check_node(target)?;
        Ok(self.push_edge(source, target, label))
    }

    fn push_edge(&mut self, source: NodeId, target: NodeId, label: E) -> EdgeId {
        let e = EdgeId(self.edges.len());
        self.edges.push(EdgeEntry {
            source,
            target,
            label,
            hidden: false,
        });
        self.nodes[source.0].out.push(e);
        self.nodes[target.0].in_.push(e);
        e
    }

    pub fn edge(&self, e: EdgeId) -> Option<&E> {
        self.edges.get(e.0).map(|x| &x.label)
    }

    pub fn edge_mut(&mut self, e: EdgeId) -> Option<&mut E> {
        self.edges.get_mut(e.0).map(|x| &mut x.label)
    }

    pub fn source(&self, e: EdgeId) -> Option<NodeId> {
        self.edges.get(e.0).map(|x| x.source)
    }

    pub fn target(&self, e: EdgeId) -> Option<NodeId> {
        self.edges.get(e.0).map(|x| x.target)
    }

    pub fn endpoints(&self, e: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(e.0).map(|x| (x.source, x.target))
    }

    /// The endpoint of `e` that is not `n`. Self-loops return `n` itself.
    pub fn opposite(&self, e: EdgeId, n: NodeId) -> Option<NodeId> {
        let x = self.edges.get(e.0)?;
        if x.source == n {
            Some(x.target)
        } else if x.target == n {
            Some(x.source)
        } else {
            None
        }
    }

    /// Number of visible edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len() - self.hidden_edges
    }

    /// Visible edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.hidden)
            .map(|(ix, _)| EdgeId(ix))
    }

    /// Every edge slot, hidden or not.
    pub fn all_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(EdgeId, &mut E),
    {
        for (ix, e) in self.edges.iter_mut().enumerate() {
            if !e.hidden {
                f(EdgeId(ix), &mut e.label);
            }
        }
    }

    pub fn out_edges(&self, n: NodeId) -> Vec<EdgeId> {
        let Some(entry) = self.nodes.get(n.0) else {
            return Vec::new();
        };
        entry
            .out
            .iter()
            .copied()
            .filter(|e| !self.edges[e.0].hidden)
            .collect()
    }

    pub fn in_edges(&self, n: NodeId) -> Vec<EdgeId> {
        let Some(entry) = self.nodes.get(n.0) else {
            return Vec::new();
        };
        entry
            .in_
            .iter()
            .copied()
            .filter(|e| !self.edges[e.0].hidden)
            .collect()
    }

    /// Visible incident edges, outgoing first. Self-loops are reported once.
    pub fn node_edges(&self, n: NodeId) -> Vec<EdgeId> {
        let mut out = self.out_edges(n);
        for e in self.in_edges(n) {
            if self.edges[e.0].source != n {
                out.push(e);
            }
        }
        out
    }

    pub fn out_degree(&self, n: NodeId) -> usize {
        self.nodes.get(n.0).map_or(0, |entry| {
            entry.out.iter().filter(|e| !self.edges[e.0].hidden).count()
        })
    }

    pub fn in_degree(&self, n: NodeId) -> usize {
        self.nodes.get(n.0).map_or(0, |entry| {
            entry.in_.iter().filter(|e| !self.edges[e.0].hidden).count()
        })
    }

    /// Visible edge ends at `n`; a self-loop counts twice.
    pub fn degree(&self, n: NodeId) -> usize {
        self.in_degree(n) + self.out_degree(n)
    }

    pub fn successors(&self, n: NodeId) -> Vec<NodeId> {
        self.out_edges(n)
            .into_iter()
            .map(|e| self.edges[e.0].target)
            .collect()
    }

    pub fn predecessors(&self, n: NodeId) -> Vec<NodeId> {
        self.in_edges(n)
            .into_iter()
            .map(|e| self.edges[e.0].source)
            .collect()
    }

    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> &mut Self {
        if !self.options.compound || child.0 >= self.nodes.len() || parent.0 >= self.nodes.len()
        {
            return self;
        }
        if let Some(prev) = self.parent.insert(child, parent) {
            if let Some(ch) = self.children.get_mut(&prev) {
                ch.retain(|c| *c != child);
            }
        }
        let entry = self.children.entry(parent).or_default();
        if !entry.contains(&child) {
            entry.push(child);
        }
        self.groups.insert(parent);
        self
    }

    /// Flags `n` as a group node even if it has no children yet.
    pub fn mark_group(&mut self, n: NodeId) -> &mut Self {
        if self.options.compound && n.0 < self.nodes.len() {
            self.groups.insert(n);
        }
        self
    }

    pub fn is_group(&self, n: NodeId) -> bool {
        self.groups.contains(&n)
    }

    /// Whether the graph contains any group node at all.
    pub fn is_grouped(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn parent(&self, child: NodeId) -> Option<NodeId> {
        self.parent.get(&child).copied()
    }

    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children.get(&parent).cloned().unwrap_or_default()
    }

    pub fn is_node_hidden(&self, n: NodeId) -> bool {
        self.nodes.get(n.0).is_some_and(|e| e.hidden)
    }

    pub fn is_edge_hidden(&self, e: EdgeId) -> bool {
        self.edges.get(e.0).is_some_and(|x| x.hidden)
    }

    pub fn hide_edge(&mut self, e: EdgeId) -> Result<()> {
        let entry = self.edges.get_mut(e.0).ok_or(Error::UnknownEdge(e))?;
        if entry.hidden {
            return Err(Error::AlreadyHidden(e.into()));
        }
        entry.hidden = true;
        self.hidden_edges += 1;
        Ok(())
    }

    pub fn unhide_edge(&mut self, e: EdgeId) -> Result<()> {
        let entry = self.edges.get(e.0).ok_or(Error::UnknownEdge(e))?;
        if !entry.hidden {
            return Err(Error::NotHidden(e.into()));
        }
        for node in [entry.source, entry.target] {
            if self.nodes[node.0].hidden {
                return Err(Error::HiddenEndpoint { edge: e, node });
            }
        }
        self.edges[e.0].hidden = false;
        self.hidden_edges -= 1;
        Ok(())
    }

    /// Hides a node. Its incident edges must already be hidden.
    pub fn hide_node(&mut self, n: NodeId) -> Result<()> {
        self.check_node(n)?;
        if self.nodes[n.0].hidden {
            return Err(Error::AlreadyHidden(n.into()));
        }
        let count = self.node_edges(n).len();
        if count > 0 {
            return Err(Error::NodeHasVisibleEdges { node: n, count });
        }
        self.nodes[n.0].hidden = true;
        self.hidden_nodes += 1;
        Ok(())
    }

    pub fn unhide_node(&mut self, n: NodeId) -> Result<()> {
        self.check_node(n)?;
        if !self.nodes[n.0].hidden {
            return Err(Error::NotHidden(n.into()));
        }
        self.nodes[n.0].hidden = false;
        self.hidden_nodes -= 1;
        Ok(())
    }

    fn check_node(&self, n: NodeId) -> Result<()> {
        if n.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::UnknownNode(n))
        }
    }
}
