//! Typed layout configuration.
//!
//! Every knob is an explicit field; configurations are usually loaded from JSON with
//! [`LayoutConfig::from_json`] and turned into a pipeline by
//! [`LayoutPipeline::from_config`](crate::LayoutPipeline::from_config).

use crate::bus::BusDetectionOptions;
use crate::error::Result;
use crate::isolation::{EdgeCategory, ORTHOGONAL_EPSILON};
use crate::placement::{AlongEdge, LabelOrientation, PlacementDescriptor, SideOfEdge};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    pub isolation: Option<IsolationConfig>,
    pub bus_detection: Option<BusDetectionOptions>,
    pub edge_label_placement: Option<LabelPlacementConfig>,
    /// Abort the layout after this many milliseconds (see
    /// [`apply_with_timeout`](crate::apply_with_timeout)).
    pub timeout_ms: Option<u64>,
}

impl LayoutConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IsolationCategory {
    #[default]
    GroupIncident,
    BetweenUnselected,
    NonOrthogonal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IsolationConfig {
    pub category: IsolationCategory,
    /// Axis-alignment tolerance for [`IsolationCategory::NonOrthogonal`].
    pub epsilon: f64,
    pub route_restored_edges: bool,
    pub place_restored_labels: bool,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            category: IsolationCategory::default(),
            epsilon: ORTHOGONAL_EPSILON,
            route_restored_edges: true,
            place_restored_labels: false,
        }
    }
}

impl IsolationConfig {
    pub fn edge_category(&self) -> EdgeCategory {
        match self.category {
            IsolationCategory::GroupIncident => EdgeCategory::GroupIncident,
            IsolationCategory::BetweenUnselected => EdgeCategory::BetweenUnselected,
            IsolationCategory::NonOrthogonal => EdgeCategory::NonOrthogonal {
                epsilon: self.epsilon,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LabelPlacementConfig {
    pub along_edge: AlongEdge,
    pub side_of_edge: SideOfEdge,
    pub orientation: LabelOrientation,
    pub distance: f64,
}

impl LabelPlacementConfig {
    pub fn descriptor(&self) -> PlacementDescriptor {
        PlacementDescriptor::build(
            self.along_edge,
            self.side_of_edge,
            self.orientation,
            self.distance,
        )
    }
}
