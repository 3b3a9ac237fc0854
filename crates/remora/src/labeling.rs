//! Edge label placement driven by [`PlacementDescriptor`]s.

use crate::data::{AFFECTED_LABELS, DataKey, EDGE_LABEL_PLACEMENT};
use crate::error::Result;
use crate::model::{LabelId, LayoutGraph, Point, edge_path, label_ids};
use crate::placement::{AlongEdgePlacement, AngleReference, EdgeSides, PlacementDescriptor};

pub trait LabelPlacer: Send {
    /// Side-data key holding the labels this placer must handle.
    fn scope_key(&self) -> DataKey<LabelId, bool> {
        AFFECTED_LABELS
    }

    fn place_labels(&mut self, g: &mut LayoutGraph) -> Result<()>;
}

/// Places each scoped label at a fixed spot derived from its descriptor.
///
/// Descriptors are looked up under [`EDGE_LABEL_PLACEMENT`]; labels without one use
/// `default_placement`. No overlap removal is attempted.
#[derive(Debug, Clone)]
pub struct GenericLabeling {
    pub scope: DataKey<LabelId, bool>,
    pub default_placement: PlacementDescriptor,
}

impl Default for GenericLabeling {
    fn default() -> Self {
        Self {
            scope: AFFECTED_LABELS,
            default_placement: PlacementDescriptor::default(),
        }
    }
}

impl GenericLabeling {
    pub fn with_default_placement(default_placement: PlacementDescriptor) -> Self {
        Self {
            default_placement,
            ..Default::default()
        }
    }
}

impl LabelPlacer for GenericLabeling {
    fn scope_key(&self) -> DataKey<LabelId, bool> {
        self.scope
    }

    fn place_labels(&mut self, g: &mut LayoutGraph) -> Result<()> {
        let edges: Vec<_> = g.edges().collect();
        for e in edges {
            let path = edge_path(g, e);
            if path.is_empty() {
                continue;
            }
            for id in label_ids(g, e) {
                let data = &g.graph().data;
                if !data.is_marked(self.scope, &id) {
                    continue;
                }
                let descriptor = data
                    .value(EDGE_LABEL_PLACEMENT, &id)
                    .copied()
                    .unwrap_or(self.default_placement);
                let Some(label) = g
                    .edge_mut(e)
                    .and_then(|lbl| lbl.labels.get_mut(id.index))
                else {
                    continue;
                };
                let (center, angle) = place(&path, label.width, label.height, &descriptor);
                label.x = center.x;
                label.y = center.y;
                label.angle = angle;
            }
        }
        Ok(())
    }
}

fn along_ratio(along: AlongEdgePlacement) -> f64 {
    match along {
        AlongEdgePlacement::AtSourcePort => 0.0,
        AlongEdgePlacement::AtSource => 0.1,
        AlongEdgePlacement::Anywhere | AlongEdgePlacement::AtCenter => 0.5,
        AlongEdgePlacement::AtTarget => 0.9,
        AlongEdgePlacement::AtTargetPort => 1.0,
    }
}

/// Point at `ratio` of the path length and the unit direction of the segment it lies on.
fn point_on_path(path: &[Point], ratio: f64) -> (Point, Point) {
    let segments: Vec<(Point, Point, f64)> = path
        .windows(2)
        .map(|w| (w[0], w[1], (w[1].x - w[0].x).hypot(w[1].y - w[0].y)))
        .collect();
    let total: f64 = segments.iter().map(|s| s.2).sum();

    let Some(&(first, _, _)) = segments.first() else {
        return (path[0], Point::new(1.0, 0.0));
    };
    if total <= 0.0 {
        return (first, Point::new(1.0, 0.0));
    }

    let mut remaining = total * ratio.clamp(0.0, 1.0);
    let mut last = segments[segments.len() - 1];
    for seg in segments.iter().copied().filter(|s| s.2 > 0.0) {
        last = seg;
        let (a, b, len) = seg;
        if remaining <= len {
            let t = remaining / len;
            let dir = Point::new((b.x - a.x) / len, (b.y - a.y) / len);
            return (Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t), dir);
        }
        remaining -= len;
    }
    let (a, b, len) = last;
    (b, Point::new((b.x - a.x) / len, (b.y - a.y) / len))
}

fn place(
    path: &[Point],
    width: f64,
    height: f64,
    descriptor: &PlacementDescriptor,
) -> (Point, f64) {
    let (anchor, dir) = point_on_path(path, along_ratio(descriptor.along()));

    let angle = match descriptor.angle_reference() {
        AngleReference::RelativeToEdgeFlow => dir.y.atan2(dir.x) + descriptor.angle(),
        AngleReference::Absolute => descriptor.angle(),
    };

    // Left of the flow direction, with y growing downwards.
    let normal = Point::new(dir.y, -dir.x);
    let sides = descriptor.sides();
    let sign = if sides.contains(EdgeSides::ON_EDGE) {
        0.0
    } else if sides.contains(EdgeSides::LEFT) {
        1.0
    } else {
        -1.0
    };
    if sign == 0.0 {
        return (anchor, angle);
    }

    // Half extent of the rotated label box along the normal.
    let (sin, cos) = angle.sin_cos();
    let extent = (width * (cos * normal.x + sin * normal.y).abs()
        + height * (-sin * normal.x + cos * normal.y).abs())
        / 2.0;
    let offset = sign * (descriptor.distance() + extent);
    (
        Point::new(anchor.x + normal.x * offset, anchor.y + normal.y * offset),
        angle,
    )
}
