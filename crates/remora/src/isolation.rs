//! Structural isolation: run an inner algorithm as if a category of edges did not exist.
//!
//! Edges of the configured [`EdgeCategory`] are hidden, the inner algorithm runs on the reduced
//! graph, and the edges are shown again. Restored edges can then be rerouted by an
//! [`EdgeRouter`] and have their labels placed by a [`LabelPlacer`], each scoped to exactly the
//! restored set through transient side-data.

use crate::data::{AFFECTED_EDGES, DataMap, DataScope, SELECTED_NODES};
use crate::error::Result;
use crate::graphlib::{EdgeId, HideScope};
use crate::labeling::LabelPlacer;
use crate::layout::{LayoutAlgorithm, LayoutStage};
use crate::model::{LabelId, LayoutGraph, edge_path, label_ids};
use crate::route::EdgeRouter;
use std::fmt;
use tracing::{debug, trace};

/// Tolerance below which a coordinate difference counts as axis-aligned.
pub const ORTHOGONAL_EPSILON: f64 = 1e-4;

pub type EdgePredicate = Box<dyn Fn(&LayoutGraph, EdgeId) -> bool + Send>;

/// Which edges the stage takes away from the inner algorithm.
pub enum EdgeCategory {
    /// Edges with a group node at either end.
    GroupIncident,
    /// Edges whose endpoints are both outside [`SELECTED_NODES`].
    BetweenUnselected,
    /// Edges the inner algorithm routed with a non-axis-parallel segment and whose endpoints are
    /// both unselected. Needs a first inner run to find them.
    NonOrthogonal { epsilon: f64 },
    Custom(EdgePredicate),
}

impl fmt::Debug for EdgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeCategory::GroupIncident => f.write_str("GroupIncident"),
            EdgeCategory::BetweenUnselected => f.write_str("BetweenUnselected"),
            EdgeCategory::NonOrthogonal { epsilon } => f
                .debug_struct("NonOrthogonal")
                .field("epsilon", epsilon)
                .finish(),
            EdgeCategory::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl EdgeCategory {
    /// Cheap check whether the category can match anything in `g` at all.
    fn may_occur(&self, g: &LayoutGraph) -> bool {
        match self {
            EdgeCategory::GroupIncident => g.is_grouped(),
            EdgeCategory::BetweenUnselected => g
                .graph()
                .data
                .get(SELECTED_NODES)
                .is_some_and(|sel| sel.values().any(|&v| v)),
            EdgeCategory::NonOrthogonal { .. } | EdgeCategory::Custom(_) => true,
        }
    }

    fn matches(&self, g: &LayoutGraph, e: EdgeId) -> bool {
        match self {
            EdgeCategory::GroupIncident => g
                .endpoints(e)
                .is_some_and(|(s, t)| g.is_group(s) || g.is_group(t)),
            EdgeCategory::BetweenUnselected => both_unselected(g, e),
            EdgeCategory::NonOrthogonal { epsilon } => {
                is_affected(g, e) && both_unselected(g, e) && !is_orthogonal(g, e, *epsilon)
            }
            EdgeCategory::Custom(pred) => pred(g, e),
        }
    }
}

fn both_unselected(g: &LayoutGraph, e: EdgeId) -> bool {
    let data = &g.graph().data;
    g.endpoints(e).is_some_and(|(s, t)| {
        !data.is_marked(SELECTED_NODES, &s) && !data.is_marked(SELECTED_NODES, &t)
    })
}

// Without an affected set every edge counts as affected.
fn is_affected(g: &LayoutGraph, e: EdgeId) -> bool {
    match g.graph().data.get(AFFECTED_EDGES) {
        Some(marks) => marks.get(&e).copied().unwrap_or(false),
        None => true,
    }
}

/// Whether every segment of the edge path is horizontal or vertical within `epsilon`.
pub fn is_orthogonal(g: &LayoutGraph, e: EdgeId, epsilon: f64) -> bool {
    edge_path(g, e).windows(2).all(|w| {
        let dx = (w[1].x - w[0].x).abs();
        let dy = (w[1].y - w[0].y).abs();
        dx < epsilon || dy < epsilon
    })
}

pub struct IsolationStage {
    category: EdgeCategory,
    router: Option<Box<dyn EdgeRouter>>,
    labeler: Option<Box<dyn LabelPlacer>>,
    last_hidden: Vec<EdgeId>,
}

impl fmt::Debug for IsolationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IsolationStage")
            .field("category", &self.category)
            .field("router", &self.router.is_some())
            .field("labeler", &self.labeler.is_some())
            .field("last_hidden", &self.last_hidden)
            .finish()
    }
}

impl IsolationStage {
    pub fn new(category: EdgeCategory) -> Self {
        Self {
            category,
            router: None,
            labeler: None,
            last_hidden: Vec::new(),
        }
    }

    pub fn group_edges() -> Self {
        Self::new(EdgeCategory::GroupIncident)
    }

    pub fn unselected_edges() -> Self {
        Self::new(EdgeCategory::BetweenUnselected)
    }

    pub fn non_orthogonal_edges() -> Self {
        Self::new(EdgeCategory::NonOrthogonal {
            epsilon: ORTHOGONAL_EPSILON,
        })
    }

    pub fn with_router(mut self, router: impl EdgeRouter + 'static) -> Self {
        self.router = Some(Box::new(router));
        self
    }

    pub fn with_label_placement(mut self, labeler: impl LabelPlacer + 'static) -> Self {
        self.labeler = Some(Box::new(labeler));
        self
    }

    pub fn category(&self) -> &EdgeCategory {
        &self.category
    }

    /// Edges hidden during the most recent run, in hiding order.
    pub fn last_hidden(&self) -> &[EdgeId] {
        &self.last_hidden
    }

    fn marked_edges(&self, g: &LayoutGraph) -> Vec<EdgeId> {
        g.edges().filter(|&e| self.category.matches(g, e)).collect()
    }

    fn reconcile(&mut self, g: &mut LayoutGraph, hidden: &[EdgeId]) -> Result<()> {
        if let Some(router) = self.router.as_mut() {
            let marking: DataMap<EdgeId, bool> = hidden.iter().map(|&e| (e, true)).collect();
            let mut scope = DataScope::new(g);
            scope.install(router.scope_key(), marking);
            router.route(&mut scope)?;
        }

        if let Some(labeler) = self.labeler.as_mut() {
            let labels: DataMap<LabelId, bool> = hidden
                .iter()
                .flat_map(|&e| label_ids(g, e))
                .map(|id| (id, true))
                .collect();
            if !labels.is_empty() {
                let mut scope = DataScope::new(g);
                scope.install(labeler.scope_key(), labels);
                labeler.place_labels(&mut scope)?;
            }
        }
        Ok(())
    }
}

impl LayoutStage for IsolationStage {
    fn apply_stage(&mut self, g: &mut LayoutGraph, core: &mut dyn LayoutAlgorithm) -> Result<()> {
        self.last_hidden.clear();

        let marked = if let EdgeCategory::NonOrthogonal { .. } = self.category {
            // Geometry is only known after the inner algorithm produced paths.
            core.apply_layout(g)?;
            let marked = self.marked_edges(g);
            if marked.is_empty() {
                trace!("no non-orthogonal edges after first pass");
                return Ok(());
            }
            marked
        } else {
            let marked = if self.category.may_occur(g) {
                self.marked_edges(g)
            } else {
                Vec::new()
            };
            if marked.is_empty() {
                trace!(category = ?self.category, "nothing to isolate");
                return core.apply_layout(g);
            }
            marked
        };

        debug!(category = ?self.category, hidden = marked.len(), "isolating edges");
        {
            let mut scope = HideScope::new(g);
            scope.hide_edges(marked.iter().copied())?;
            core.apply_layout(&mut scope)?;
            scope.restore()?;
        }

        self.reconcile(g, &marked)?;
        self.last_hidden = marked;
        Ok(())
    }
}
