//! Graph container APIs used by `remora`.
//!
//! Nodes and edges live in an arena and are never physically removed. Hiding an element flips a
//! flag that takes it out of every traversal; the [`Hider`] keeps track of what it hid so the
//! graph can be restored exactly.

pub mod error;
pub mod graph;
pub mod hider;

pub use error::{Error, Result};
pub use graph::{EdgeId, ElementId, Graph, GraphOptions, NodeId};
pub use hider::{HideScope, Hider};
