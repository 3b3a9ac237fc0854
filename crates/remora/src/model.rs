//! Label types and geometry primitives shared by every stage.
//!
//! Node coordinates are centres. Edge geometry is the ordered list of bend points between the
//! source and target centres.

use crate::data::DataRegistry;
use crate::graphlib::{EdgeId, Graph};
use serde::{Deserialize, Serialize};

pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Geometry of one label attached to an edge. `x`/`y` is the label centre, `angle` is in
/// radians measured clockwise from the positive x axis (y grows downwards).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelLayout {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl LabelLayout {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeLabel {
    pub points: Vec<Point>,
    pub labels: Vec<LabelLayout>,
}

#[derive(Debug, Clone, Default)]
pub struct GraphLabel {
    pub data: DataRegistry,
}

/// Identifies one label of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId {
    pub edge: EdgeId,
    pub index: usize,
}

/// Label ids of every label attached to `e`.
pub fn label_ids(g: &LayoutGraph, e: EdgeId) -> impl Iterator<Item = LabelId> + use<> {
    let count = g.edge(e).map_or(0, |l| l.labels.len());
    (0..count).map(move |index| LabelId { edge: e, index })
}

/// Full polyline of an edge: source centre, bends, target centre.
pub fn edge_path(g: &LayoutGraph, e: EdgeId) -> Vec<Point> {
    let Some((s, t)) = g.endpoints(e) else {
        return Vec::new();
    };
    let (Some(source), Some(target)) = (g.node(s), g.node(t)) else {
        return Vec::new();
    };
    let bends = g.edge(e).map(|l| l.points.as_slice()).unwrap_or_default();
    let mut path = Vec::with_capacity(bends.len() + 2);
    path.push(source.center());
    path.extend_from_slice(bends);
    path.push(target.center());
    path
}
