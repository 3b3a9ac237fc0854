//! Internal storage entries for [`Graph`](super::Graph).

use super::{EdgeId, NodeId};

#[derive(Debug, Clone)]
pub(in crate::graph) struct NodeEntry<N> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) label: N,
    pub(in crate::graph) out: Vec<EdgeId>,
    pub(in crate::graph) in_: Vec<EdgeId>,
    pub(in crate::graph) hidden: bool,
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeEntry<E> {
    pub(in crate::graph) source: NodeId,
    pub(in crate::graph) target: NodeId,
    pub(in crate::graph) label: E,
    pub(in crate::graph) hidden: bool,
}
