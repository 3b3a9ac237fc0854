//! Routers for edges that a stage hands back after the core layout ran.
//!
//! A router only touches visible edges that are marked `true` under its scope key.

use crate::data::{DataKey, ROUTE_EDGES};
use crate::error::Result;
use crate::graphlib::EdgeId;
use crate::model::{LayoutGraph, Point};

const ALIGNED_EPSILON: f64 = 1e-4;

pub trait EdgeRouter: Send {
    /// Side-data key holding the edges this router must handle.
    fn scope_key(&self) -> DataKey<EdgeId, bool> {
        ROUTE_EDGES
    }

    fn route(&mut self, g: &mut LayoutGraph) -> Result<()>;
}

pub(crate) fn marked_edges(g: &LayoutGraph, key: DataKey<EdgeId, bool>) -> Vec<EdgeId> {
    let Some(marks) = g.graph().data.get(key) else {
        return Vec::new();
    };
    g.edges()
        .filter(|e| marks.get(e).copied().unwrap_or(false))
        .collect()
}

/// Routes marked edges as axis-parallel polylines with at most two bends.
///
/// The longer axis is traversed in two halves: a vertically dominant edge leaves its source
/// vertically, crosses over horizontally halfway, and enters its target vertically.
#[derive(Debug, Clone)]
pub struct OrthogonalRouter {
    pub scope: DataKey<EdgeId, bool>,
}

impl Default for OrthogonalRouter {
    fn default() -> Self {
        Self { scope: ROUTE_EDGES }
    }
}

impl OrthogonalRouter {
    fn bends(source: Point, target: Point) -> Vec<Point> {
        let dx = target.x - source.x;
        let dy = target.y - source.y;
        if dx.abs() < ALIGNED_EPSILON || dy.abs() < ALIGNED_EPSILON {
            return Vec::new();
        }
        if dy.abs() >= dx.abs() {
            let mid = source.y + dy / 2.0;
            vec![Point::new(source.x, mid), Point::new(target.x, mid)]
        } else {
            let mid = source.x + dx / 2.0;
            vec![Point::new(mid, source.y), Point::new(mid, target.y)]
        }
    }
}

impl EdgeRouter for OrthogonalRouter {
    fn scope_key(&self) -> DataKey<EdgeId, bool> {
        self.scope
    }

    fn route(&mut self, g: &mut LayoutGraph) -> Result<()> {
        for e in marked_edges(g, self.scope) {
            let Some((s, t)) = g.endpoints(e) else {
                continue;
            };
            let (Some(source), Some(target)) = (g.node(s), g.node(t)) else {
                continue;
            };
            let bends = Self::bends(source.center(), target.center());
            if let Some(lbl) = g.edge_mut(e) {
                lbl.points = bends;
            }
        }
        Ok(())
    }
}

/// Drops all bends of marked edges.
#[derive(Debug, Clone)]
pub struct StraightLineRouter {
    pub scope: DataKey<EdgeId, bool>,
}

impl Default for StraightLineRouter {
    fn default() -> Self {
        Self { scope: ROUTE_EDGES }
    }
}

impl EdgeRouter for StraightLineRouter {
    fn scope_key(&self) -> DataKey<EdgeId, bool> {
        self.scope
    }

    fn route(&mut self, g: &mut LayoutGraph) -> Result<()> {
        for e in marked_edges(g, self.scope) {
            if let Some(lbl) = g.edge_mut(e) {
                lbl.points.clear();
            }
        }
        Ok(())
    }
}
