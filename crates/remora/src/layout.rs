//! Seams between `remora` stages and the layout algorithms they wrap.

use crate::error::Result;
use crate::model::LayoutGraph;

/// An opaque layout algorithm: reads and writes node positions and edge geometry in place.
pub trait LayoutAlgorithm: Send {
    fn apply_layout(&mut self, g: &mut LayoutGraph) -> Result<()>;
}

impl<F> LayoutAlgorithm for F
where
    F: FnMut(&mut LayoutGraph) -> Result<()> + Send,
{
    fn apply_layout(&mut self, g: &mut LayoutGraph) -> Result<()> {
        self(g)
    }
}

/// A pre/post-processing step that runs around an inner algorithm.
pub trait LayoutStage: Send {
    fn apply_stage(&mut self, g: &mut LayoutGraph, core: &mut dyn LayoutAlgorithm) -> Result<()>;
}

/// Stages applied outermost-first around a core algorithm.
pub struct StageChain<'a> {
    stages: &'a mut [Box<dyn LayoutStage>],
    core: &'a mut dyn LayoutAlgorithm,
}

impl<'a> StageChain<'a> {
    pub fn new(stages: &'a mut [Box<dyn LayoutStage>], core: &'a mut dyn LayoutAlgorithm) -> Self {
        Self { stages, core }
    }
}

impl LayoutAlgorithm for StageChain<'_> {
    fn apply_layout(&mut self, g: &mut LayoutGraph) -> Result<()> {
        match self.stages.split_first_mut() {
            None => self.core.apply_layout(g),
            Some((first, rest)) => {
                let mut inner = StageChain {
                    stages: rest,
                    core: &mut *self.core,
                };
                first.apply_stage(g, &mut inner)
            }
        }
    }
}
