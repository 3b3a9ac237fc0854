//! Pipeline composition.
//!
//! A [`LayoutPipeline`] owns a core algorithm, the stages wrapped around it (outermost first),
//! and the side-data it supplies to them: bus ids from bus detection and per-label placement
//! descriptors. Side-data is installed for the duration of one run and removed afterwards.

use crate::bus::{BusDetectionOptions, DetectedBus, bus_id_map, detect_buses};
use crate::config::LayoutConfig;
use crate::data::{BUS_IDS, DataMap, DataScope, EDGE_LABEL_PLACEMENT};
use crate::error::{Error, Result};
use crate::isolation::IsolationStage;
use crate::labeling::{GenericLabeling, LabelPlacer};
use crate::layout::{LayoutAlgorithm, LayoutStage, StageChain};
use crate::model::{LabelId, LayoutGraph, label_ids};
use crate::placement::PlacementDescriptor;
use crate::route::OrthogonalRouter;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, warn};

pub struct LayoutPipeline {
    stages: Vec<Box<dyn LayoutStage>>,
    core: Box<dyn LayoutAlgorithm>,
    bus_detection: Option<BusDetectionOptions>,
    edge_label_placement: Option<PlacementDescriptor>,
    labeler: Option<Box<dyn LabelPlacer>>,
    buses: Vec<DetectedBus>,
}

impl LayoutPipeline {
    pub fn new(core: impl LayoutAlgorithm + 'static) -> Self {
        Self {
            stages: Vec::new(),
            core: Box::new(core),
            bus_detection: None,
            edge_label_placement: None,
            labeler: None,
            buses: Vec::new(),
        }
    }

    /// Builds a pipeline from typed configuration.
    ///
    /// Isolation reroutes restored edges with an [`OrthogonalRouter`] and places their labels
    /// with [`GenericLabeling`] when the configuration asks for it.
    pub fn from_config(config: &LayoutConfig, core: impl LayoutAlgorithm + 'static) -> Self {
        let placement = config
            .edge_label_placement
            .as_ref()
            .map(|p| p.descriptor());

        let mut pipeline = Self::new(core);
        if let Some(iso) = &config.isolation {
            let mut stage = IsolationStage::new(iso.edge_category());
            if iso.route_restored_edges {
                stage = stage.with_router(OrthogonalRouter::default());
            }
            if iso.place_restored_labels {
                stage = stage.with_label_placement(GenericLabeling::with_default_placement(
                    placement.unwrap_or_default(),
                ));
            }
            pipeline = pipeline.with_stage(stage);
        }
        if let Some(opts) = config.bus_detection {
            pipeline = pipeline.with_bus_detection(opts);
        }
        if let Some(descriptor) = placement {
            pipeline = pipeline.with_edge_label_placement(descriptor);
        }
        pipeline
    }

    /// Appends a stage inside the ones added before it.
    pub fn with_stage(mut self, stage: impl LayoutStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn with_bus_detection(mut self, opts: BusDetectionOptions) -> Self {
        self.bus_detection = Some(opts);
        self
    }

    /// Supplies `descriptor` for every edge label under [`EDGE_LABEL_PLACEMENT`].
    pub fn with_edge_label_placement(mut self, descriptor: PlacementDescriptor) -> Self {
        self.edge_label_placement = Some(descriptor);
        self
    }

    /// Runs `labeler` over every edge label once the stages and core have finished.
    pub fn with_labeling(mut self, labeler: impl LabelPlacer + 'static) -> Self {
        self.labeler = Some(Box::new(labeler));
        self
    }

    /// Buses detected during the most recent run.
    pub fn buses(&self) -> &[DetectedBus] {
        &self.buses
    }

    fn all_labels(g: &LayoutGraph) -> Vec<LabelId> {
        g.edges().flat_map(|e| label_ids(g, e)).collect()
    }
}

impl LayoutAlgorithm for LayoutPipeline {
    fn apply_layout(&mut self, g: &mut LayoutGraph) -> Result<()> {
        self.buses = match &self.bus_detection {
            Some(opts) => detect_buses(g, opts),
            None => Vec::new(),
        };

        let labels = Self::all_labels(g);
        let mut scope = DataScope::new(g);
        if self.bus_detection.is_some() {
            debug!(buses = self.buses.len(), "installing bus ids");
            scope.install(BUS_IDS, bus_id_map(&self.buses));
        }
        if let Some(descriptor) = self.edge_label_placement {
            let placements: DataMap<LabelId, PlacementDescriptor> =
                labels.iter().map(|&id| (id, descriptor)).collect();
            scope.install(EDGE_LABEL_PLACEMENT, placements);
        }

        StageChain::new(&mut self.stages, self.core.as_mut()).apply_layout(&mut scope)?;

        if let Some(labeler) = self.labeler.as_mut() {
            let marks: DataMap<LabelId, bool> = Self::all_labels(&scope)
                .into_iter()
                .map(|id| (id, true))
                .collect();
            if !marks.is_empty() {
                let mut inner = DataScope::new(&mut scope);
                inner.install(labeler.scope_key(), marks);
                labeler.place_labels(&mut inner)?;
            }
        }
        Ok(())
    }
}

/// Runs `pipeline` on a copy of `g` in a worker thread and waits at most `timeout`.
///
/// On success the laid-out copy replaces `g` and the pipeline is handed back. When the deadline
/// passes, the worker is abandoned and `g` is left as it was; the pipeline goes down with the
/// worker.
pub fn apply_with_timeout(
    mut pipeline: LayoutPipeline,
    g: &mut LayoutGraph,
    timeout: Duration,
) -> Result<LayoutPipeline> {
    let mut work = g.clone();
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("remora-layout".to_string())
        .spawn(move || {
            let result = pipeline.apply_layout(&mut work);
            let _ = tx.send((pipeline, work, result));
        })?;

    match rx.recv_timeout(timeout) {
        Ok((pipeline, work, result)) => {
            result?;
            *g = work;
            Ok(pipeline)
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!(?timeout, "layout aborted after timeout");
            Err(Error::Timeout { timeout })
        }
        Err(RecvTimeoutError::Disconnected) => Err(Error::WorkerPanicked),
    }
}
