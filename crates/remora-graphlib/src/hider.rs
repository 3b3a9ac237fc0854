//! Reversible element hiding.
//!
//! A [`Hider`] remembers exactly which elements it took out of the graph so a stage can put them
//! back later without disturbing elements that someone else hid. [`HideScope`] ties that
//! restoration to a borrow of the graph: dropping the scope shows everything again, which also
//! covers early returns and panics inside the wrapped algorithm.

use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, NodeId};
use rustc_hash::FxBuildHasher;
use std::ops::{Deref, DerefMut};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Default)]
pub struct Hider {
    edges: Vec<EdgeId>,
    edge_set: HashSet<EdgeId>,
    nodes: Vec<NodeId>,
    node_set: HashSet<NodeId>,
    // Edges that went away together with a hidden node.
    node_edges: HashMap<NodeId, Vec<EdgeId>>,
}

impl Hider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.nodes.is_empty()
    }

    /// Number of elements currently held by this hider.
    pub fn len(&self) -> usize {
        self.edges.len() + self.nodes.len()
    }

    pub fn hidden_edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn hidden_nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn hides_edge(&self, e: EdgeId) -> bool {
        self.edge_set.contains(&e)
    }

    pub fn hides_node(&self, n: NodeId) -> bool {
        self.node_set.contains(&n)
    }

    pub fn hide_edge<N, E, G>(&mut self, g: &mut Graph<N, E, G>, e: EdgeId) -> Result<()> {
        g.hide_edge(e)?;
        self.edges.push(e);
        self.edge_set.insert(e);
        Ok(())
    }

    /// Hides every edge yielded by `edges`, stopping at the first failure.
    pub fn hide_edges<N, E, G, I>(&mut self, g: &mut Graph<N, E, G>, edges: I) -> Result<usize>
    where
        I: IntoIterator<Item = EdgeId>,
    {
        let mut count = 0;
        for e in edges {
            self.hide_edge(g, e)?;
            count += 1;
        }
        Ok(count)
    }

    /// Hides a node together with all of its still-visible edges.
    pub fn hide_node<N, E, G>(&mut self, g: &mut Graph<N, E, G>, n: NodeId) -> Result<()> {
        if g.node(n).is_none() {
            return Err(Error::UnknownNode(n));
        }
        if g.is_node_hidden(n) {
            return Err(Error::AlreadyHidden(n.into()));
        }
        let incident = g.node_edges(n);
        for &e in &incident {
            self.hide_edge(g, e)?;
        }
        g.hide_node(n)?;
        self.nodes.push(n);
        self.node_set.insert(n);
        self.node_edges.insert(n, incident);
        Ok(())
    }

    pub fn unhide_edge<N, E, G>(&mut self, g: &mut Graph<N, E, G>, e: EdgeId) -> Result<()> {
        if !self.edge_set.contains(&e) {
            return Err(Error::NotHiddenByThisHider(e.into()));
        }
        g.unhide_edge(e)?;
        self.edge_set.remove(&e);
        self.edges.retain(|x| *x != e);
        Ok(())
    }

    /// Shows a node again, followed by the edges that were hidden along with it.
    pub fn unhide_node<N, E, G>(&mut self, g: &mut Graph<N, E, G>, n: NodeId) -> Result<()> {
        if !self.node_set.contains(&n) {
            return Err(Error::NotHiddenByThisHider(n.into()));
        }
        g.unhide_node(n)?;
        self.node_set.remove(&n);
        self.nodes.retain(|x| *x != n);

        let incident = self.node_edges.remove(&n).unwrap_or_default();
        let mut restored: HashSet<EdgeId> = HashSet::default();
        let mut first_err = None;
        for e in incident {
            if !self.edge_set.contains(&e) || !endpoints_visible(g, e) {
                continue;
            }
            if let Err(err) = g.unhide_edge(e) {
                first_err = first_err.or(Some(err));
            }
            self.edge_set.remove(&e);
            restored.insert(e);
        }
        if !restored.is_empty() {
            self.edges.retain(|e| !restored.contains(e));
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Shows every edge this hider holds whose endpoints are visible; returns how many.
    ///
    /// Keeps going past edges that cannot be shown: such an edge is forgotten (it is already
    /// visible, or gone) and the first error is reported once everything else is back.
    pub fn unhide_edges<N, E, G>(&mut self, g: &mut Graph<N, E, G>) -> Result<usize> {
        let mut kept: Vec<EdgeId> = Vec::new();
        let mut count = 0;
        let mut first_err = None;
        for e in std::mem::take(&mut self.edges) {
            if !endpoints_visible(g, e) {
                kept.push(e);
                continue;
            }
            match g.unhide_edge(e) {
                Ok(()) => count += 1,
                Err(err) => {
                    first_err = first_err.or(Some(err));
                }
            }
            self.edge_set.remove(&e);
        }
        self.edges = kept;
        first_err.map_or(Ok(count), Err)
    }

    /// Shows everything this hider holds. Calling it with nothing hidden is a no-op.
    ///
    /// Restoration is best effort: every element that can be shown is shown, and the first
    /// failure is returned afterwards.
    pub fn unhide_all<N, E, G>(&mut self, g: &mut Graph<N, E, G>) -> Result<()> {
        let mut first_err = None;
        for n in std::mem::take(&mut self.nodes) {
            if let Err(err) = g.unhide_node(n) {
                first_err = first_err.or(Some(err));
            }
            self.node_set.remove(&n);
        }
        self.node_edges.clear();
        if let Err(err) = self.unhide_edges(g) {
            first_err = first_err.or(Some(err));
        }
        first_err.map_or(Ok(()), Err)
    }
}

fn endpoints_visible<N, E, G>(g: &Graph<N, E, G>, e: EdgeId) -> bool {
    g.endpoints(e)
        .is_some_and(|(s, t)| !g.is_node_hidden(s) && !g.is_node_hidden(t))
}

/// A mutable borrow of a graph paired with a [`Hider`] that is emptied on drop.
pub struct HideScope<'g, N, E, G> {
    graph: &'g mut Graph<N, E, G>,
    hider: Hider,
}

impl<'g, N, E, G> HideScope<'g, N, E, G> {
    pub fn new(graph: &'g mut Graph<N, E, G>) -> Self {
        Self {
            graph,
            hider: Hider::new(),
        }
    }

    pub fn hider(&self) -> &Hider {
        &self.hider
    }

    pub fn hide_edge(&mut self, e: EdgeId) -> Result<()> {
        self.hider.hide_edge(&mut *self.graph, e)
    }

    pub fn hide_edges<I>(&mut self, edges: I) -> Result<usize>
    where
        I: IntoIterator<Item = EdgeId>,
    {
        self.hider.hide_edges(&mut *self.graph, edges)
    }

    pub fn hide_node(&mut self, n: NodeId) -> Result<()> {
        self.hider.hide_node(&mut *self.graph, n)
    }

    /// Restores everything now and reports failures instead of swallowing them on drop.
    pub fn restore(mut self) -> Result<()> {
        self.hider.unhide_all(&mut *self.graph)
    }
}

impl<N, E, G> Deref for HideScope<'_, N, E, G> {
    type Target = Graph<N, E, G>;

    fn deref(&self) -> &Self::Target {
        &*self.graph
    }
}

impl<N, E, G> DerefMut for HideScope<'_, N, E, G> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.graph
    }
}

impl<N, E, G> Drop for HideScope<'_, N, E, G> {
    fn drop(&mut self) {
        let _ = self.hider.unhide_all(&mut *self.graph);
    }
}
