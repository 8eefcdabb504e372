//! Solid requests
//!
//! The structure is described as a flat, ordered list of requests before any
//! body exists. Each request names a structural element, says what kind of
//! element it is, and carries everything a world needs to create it.

use serde::{Deserialize, Serialize};

use super::column::TaperedColumnSpec;
use crate::physics::{Pose, Vec3};

/// Structural function of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    /// Fixed floor, also the absolute reference
    Ground,
    /// Slab the excitation is applied to
    ShakeTable,
    Pedestal,
    ColumnSegment,
    Capital,
    Beam,
}

/// Geometry of a requested solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SolidShape {
    /// Box centered on its pose, full side lengths
    Box { size: Vec3, density: f64 },
    /// Tapered convex-hull column segment
    Column(TaperedColumnSpec),
}

/// One solid the structure wants created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidRequest {
    /// Unique element name, e.g. `row0.col1.seg2`
    pub name: String,
    pub role: ElementRole,
    pub shape: SolidShape,
    /// Absolute pose of the body reference frame
    pub pose: Pose,
    pub collide: bool,
    pub visible: bool,
    /// Welded to the absolute frame
    pub fixed: bool,
}

impl SolidRequest {
    /// Box request centered at `center`, colliding and visible.
    pub fn cuboid(
        name: impl Into<String>,
        role: ElementRole,
        size: Vec3,
        density: f64,
        center: Vec3,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            shape: SolidShape::Box { size, density },
            pose: Pose::from_translation(center),
            collide: true,
            visible: true,
            fixed: false,
        }
    }

    /// Column segment request; the pose is the spec's centroid pose.
    pub fn column(name: impl Into<String>, spec: TaperedColumnSpec) -> Self {
        Self {
            name: name.into(),
            role: ElementRole::ColumnSegment,
            pose: spec.centroid_pose(),
            shape: SolidShape::Column(spec),
            collide: true,
            visible: true,
            fixed: false,
        }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn without_collision(mut self) -> Self {
        self.collide = false;
        self
    }

    pub fn density(&self) -> f64 {
        match &self.shape {
            SolidShape::Box { density, .. } => *density,
            SolidShape::Column(spec) => spec.density(),
        }
    }

    /// Lowest and highest Y reached by the solid, assuming an upright pose.
    pub fn vertical_extent(&self) -> (f64, f64) {
        let center = self.pose.position().y;
        let half = match &self.shape {
            SolidShape::Box { size, .. } => size.y / 2.0,
            SolidShape::Column(spec) => spec.height() / 2.0,
        };
        (center - half, center + half)
    }
}
