//! A deterministic row-major grid layout.
//!
//! Used as a stand-in core algorithm: it places visible nodes on a grid in insertion order and
//! resets visible edges to straight lines.

use crate::error::Result;
use crate::layout::LayoutAlgorithm;
use crate::model::LayoutGraph;

#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Fixed column count; `None` picks a roughly square grid.
    pub columns: Option<usize>,
    pub spacing: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: None,
            spacing: 50.0,
        }
    }
}

impl LayoutAlgorithm for GridLayout {
    fn apply_layout(&mut self, g: &mut LayoutGraph) -> Result<()> {
        let nodes: Vec<_> = g.nodes().collect();
        if nodes.is_empty() {
            return Ok(());
        }

        let columns = self
            .columns
            .unwrap_or_else(|| (nodes.len() as f64).sqrt().ceil() as usize)
            .max(1);

        let mut cell_w: f64 = 0.0;
        let mut cell_h: f64 = 0.0;
        for &n in &nodes {
            if let Some(lbl) = g.node(n) {
                cell_w = cell_w.max(lbl.width);
                cell_h = cell_h.max(lbl.height);
            }
        }
        cell_w += self.spacing;
        cell_h += self.spacing;

        for (ix, n) in nodes.into_iter().enumerate() {
            let col = ix % columns;
            let row = ix / columns;
            if let Some(lbl) = g.node_mut(n) {
                lbl.x = col as f64 * cell_w + cell_w / 2.0;
                lbl.y = row as f64 * cell_h + cell_h / 2.0;
            }
        }

        g.for_each_edge_mut(|_, lbl| lbl.points.clear());
        Ok(())
    }
}
