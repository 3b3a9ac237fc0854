//! Edge label placement descriptors.
//!
//! User-facing choices (`SideOfEdge`, `AlongEdge`, `LabelOrientation`, distance) are mapped onto
//! a [`PlacementDescriptor`] consumed by label placers.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::ops::BitOr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideOfEdge {
    #[default]
    Anywhere,
    OnEdge,
    Left,
    Right,
    LeftOrRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlongEdge {
    #[default]
    Anywhere,
    AtSourcePort,
    AtTargetPort,
    AtSource,
    AtTarget,
    Centered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelOrientation {
    #[default]
    Parallel,
    Orthogonal,
    Horizontal,
    Vertical,
}

/// Sides of an edge a label may occupy, as a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeSides(u8);

impl EdgeSides {
    pub const LEFT: Self = Self(0b001);
    pub const RIGHT: Self = Self(0b010);
    pub const ON_EDGE: Self = Self(0b100);
    pub const ANYWHERE: Self = Self(0b111);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EdgeSides {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<SideOfEdge> for EdgeSides {
    fn from(side: SideOfEdge) -> Self {
        match side {
            SideOfEdge::Anywhere => EdgeSides::ANYWHERE,
            SideOfEdge::OnEdge => EdgeSides::ON_EDGE,
            SideOfEdge::Left => EdgeSides::LEFT,
            SideOfEdge::Right => EdgeSides::RIGHT,
            SideOfEdge::LeftOrRight => EdgeSides::LEFT | EdgeSides::RIGHT,
        }
    }
}

/// Where along the edge path a label may sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlongEdgePlacement {
    Anywhere,
    AtSourcePort,
    AtTargetPort,
    AtSource,
    AtTarget,
    AtCenter,
}

impl From<AlongEdge> for AlongEdgePlacement {
    fn from(along: AlongEdge) -> Self {
        match along {
            AlongEdge::Anywhere => AlongEdgePlacement::Anywhere,
            AlongEdge::AtSourcePort => AlongEdgePlacement::AtSourcePort,
            AlongEdge::AtTargetPort => AlongEdgePlacement::AtTargetPort,
            AlongEdge::AtSource => AlongEdgePlacement::AtSource,
            AlongEdge::AtTarget => AlongEdgePlacement::AtTarget,
            AlongEdge::Centered => AlongEdgePlacement::AtCenter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleReference {
    /// The angle is added to the direction of the edge segment the label sits on.
    RelativeToEdgeFlow,
    /// The angle is measured against the x axis.
    Absolute,
}

impl LabelOrientation {
    /// `(angle in radians, reference)` for this orientation.
    pub fn angle(self) -> (f64, AngleReference) {
        match self {
            LabelOrientation::Parallel => (0.0, AngleReference::RelativeToEdgeFlow),
            LabelOrientation::Orthogonal => (FRAC_PI_2, AngleReference::RelativeToEdgeFlow),
            LabelOrientation::Horizontal => (0.0, AngleReference::Absolute),
            LabelOrientation::Vertical => (FRAC_PI_2, AngleReference::Absolute),
        }
    }
}

/// Immutable geometric constraint for an edge label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementDescriptor {
    sides: EdgeSides,
    along: AlongEdgePlacement,
    angle: f64,
    angle_reference: AngleReference,
    distance: f64,
}

impl PlacementDescriptor {
    pub fn build(
        along: AlongEdge,
        side: SideOfEdge,
        orientation: LabelOrientation,
        distance: f64,
    ) -> Self {
        let (angle, angle_reference) = orientation.angle();
        Self {
            sides: side.into(),
            along: along.into(),
            angle,
            angle_reference,
            distance,
        }
    }

    pub fn sides(&self) -> EdgeSides {
        self.sides
    }

    pub fn along(&self) -> AlongEdgePlacement {
        self.along
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angle_reference(&self) -> AngleReference {
        self.angle_reference
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Default for PlacementDescriptor {
    fn default() -> Self {
        Self::build(
            AlongEdge::Centered,
            SideOfEdge::Anywhere,
            LabelOrientation::Parallel,
            0.0,
        )
    }
}
