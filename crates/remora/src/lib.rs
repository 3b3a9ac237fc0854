#![forbid(unsafe_code)]

//! Layout-stage orchestration around opaque core layout algorithms.
//!
//! `remora` does not lay graphs out by itself. It wraps a caller-supplied
//! [`LayoutAlgorithm`] with stages that temporarily isolate problematic edges, detects edge
//! bundles ("buses") at high-degree nodes, and hands per-element side-data such as label
//! placement descriptors to whatever runs inside the pipeline.

pub use remora_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bus;
pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod isolation;
pub mod labeling;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod placement;
pub mod route;

pub use bus::{BusDetectionOptions, BusId, DetectedBus, detect_bus, detect_buses};
pub use config::LayoutConfig;
pub use data::{DataKey, DataMap, DataRegistry, DataScope};
pub use error::{Error, Result};
pub use grid::GridLayout;
pub use isolation::{EdgeCategory, IsolationStage};
pub use labeling::{GenericLabeling, LabelPlacer};
pub use layout::{LayoutAlgorithm, LayoutStage, StageChain};
pub use model::{EdgeLabel, GraphLabel, LabelId, LabelLayout, LayoutGraph, NodeLabel, Point};
pub use pipeline::{LayoutPipeline, apply_with_timeout};
pub use placement::{
    AlongEdge, AlongEdgePlacement, AngleReference, EdgeSides, LabelOrientation,
    PlacementDescriptor, SideOfEdge,
};
pub use route::{EdgeRouter, OrthogonalRouter, StraightLineRouter};
