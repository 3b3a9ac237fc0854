use crate::graph::{EdgeId, ElementId, NodeId};

/// Misuse of the hide/unhide protocol or a dangling id.
///
/// These are programming errors in stage composition rather than user-facing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),

    #[error("{0} is already hidden")]
    AlreadyHidden(ElementId),

    #[error("{0} is not hidden")]
    NotHidden(ElementId),

    #[error("{0} was not hidden by this hider")]
    NotHiddenByThisHider(ElementId),

    #[error("edge {edge} cannot be shown while its endpoint {node} is hidden")]
    HiddenEndpoint { edge: EdgeId, node: NodeId },

    #[error("node {node} cannot be hidden while {count} visible edges still touch it")]
    NodeHasVisibleEdges { node: NodeId, count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
