//! Column Geometry Generator
//!
//! A tapered column segment is modelled as two horizontal polygonal rings,
//! the bottom one at y = 0 and the top one at y = height, each sampled at
//! `edge_count` evenly spaced angles. The external engine wraps the points
//! in a convex hull, so point order carries no meaning and no face topology
//! is built here.
//!
//! # Example
//!
//! ```ignore
//! use terremoto_engine::geometry::TaperedColumnSpec;
//! use terremoto_engine::physics::Pose;
//!
//! let spec = TaperedColumnSpec::new(100, 0.45, 0.50, 1.0, 3000.0, Pose::IDENTITY)?;
//! let cloud = spec.point_cloud();
//! assert_eq!(cloud.len(), 200);
//! ```

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::physics::{Pose, Vec3, compose};

/// Smallest polygon that still encloses an area.
pub const MIN_EDGE_COUNT: u32 = 3;

/// Rejected column parameters.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("column needs at least 3 edges, got {0}")]
    TooFewEdges(u32),
    #[error("column {field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// Full description of one frustum-shaped column segment.
///
/// Fields are private: a value of this type has always passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColumnSpec")]
pub struct TaperedColumnSpec {
    edge_count: u32,
    radius_top: f64,
    radius_bottom: f64,
    height: f64,
    density: f64,
    base_pose: Pose,
}

/// Unvalidated serde shape of a column segment.
#[derive(Deserialize)]
struct RawColumnSpec {
    edge_count: u32,
    radius_top: f64,
    radius_bottom: f64,
    height: f64,
    density: f64,
    base_pose: Pose,
}

impl TryFrom<RawColumnSpec> for TaperedColumnSpec {
    type Error = GeometryError;

    fn try_from(raw: RawColumnSpec) -> Result<Self, Self::Error> {
        TaperedColumnSpec::new(
            raw.edge_count,
            raw.radius_top,
            raw.radius_bottom,
            raw.height,
            raw.density,
            raw.base_pose,
        )
    }
}

impl TaperedColumnSpec {
    /// Validate and build a column segment description.
    ///
    /// # Arguments
    /// * `edge_count` - Facets around the vertical axis (>= 3)
    /// * `radius_top` - Ring radius at y = height (meters)
    /// * `radius_bottom` - Ring radius at y = 0 (meters)
    /// * `height` - Segment height (meters)
    /// * `density` - Stone density (kg/m³)
    /// * `base_pose` - Frame of the bottom ring center
    pub fn new(
        edge_count: u32,
        radius_top: f64,
        radius_bottom: f64,
        height: f64,
        density: f64,
        base_pose: Pose,
    ) -> Result<Self, GeometryError> {
        if edge_count < MIN_EDGE_COUNT {
            return Err(GeometryError::TooFewEdges(edge_count));
        }
        for (field, value) in [
            ("radius_top", radius_top),
            ("radius_bottom", radius_bottom),
            ("height", height),
            ("density", density),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::NonPositive { field, value });
            }
        }

        Ok(Self {
            edge_count,
            radius_top,
            radius_bottom,
            height,
            density,
            base_pose,
        })
    }

    pub fn edge_count(&self) -> u32 {
        self.edge_count
    }

    pub fn radius_top(&self) -> f64 {
        self.radius_top
    }

    pub fn radius_bottom(&self) -> f64 {
        self.radius_bottom
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn base_pose(&self) -> Pose {
        self.base_pose
    }

    /// Frame the solid is placed at: half the height above the base, so the
    /// body reference sits at the segment's mid-height on the axis.
    pub fn centroid_pose(&self) -> Pose {
        compose(Pose::from_xyz(0.0, self.height / 2.0, 0.0), self.base_pose)
    }

    /// Generate the two rings in the base frame (bottom ring at y = 0).
    pub fn point_cloud(&self) -> SolidPointCloud {
        let n = self.edge_count as usize;
        let mut points = Vec::with_capacity(2 * n);
        for (radius, y) in [(self.radius_top, self.height), (self.radius_bottom, 0.0)] {
            points.extend((0..n).map(|i| {
                let alpha = TAU * (i as f64 / n as f64);
                Vec3::new(radius * alpha.cos(), y, radius * alpha.sin())
            }));
        }
        SolidPointCloud { points }
    }
}

/// Unordered points handed once to a convex-hull constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidPointCloud {
    points: Vec<Vec3>,
}

impl SolidPointCloud {
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points re-expressed relative to `origin` (same axes).
    pub fn relative_to(&self, origin: Vec3) -> Vec<Vec3> {
        self.points.iter().map(|p| *p - origin).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Quat;

    fn column(edges: u32) -> TaperedColumnSpec {
        TaperedColumnSpec::new(edges, 0.45, 0.5, 1.5, 3000.0, Pose::IDENTITY).unwrap()
    }

    #[test]
    fn cloud_has_two_rings() {
        for edges in [3, 4, 10, 100] {
            let spec = column(edges);
            let cloud = spec.point_cloud();
            assert_eq!(cloud.len(), 2 * edges as usize);

            let top: Vec<_> = cloud.points().iter().filter(|p| p.y == spec.height()).collect();
            let bottom: Vec<_> = cloud.points().iter().filter(|p| p.y == 0.0).collect();
            assert_eq!(top.len(), edges as usize);
            assert_eq!(bottom.len(), edges as usize);

            for p in top {
                let r = (p.x * p.x + p.z * p.z).sqrt();
                assert!((r - spec.radius_top()).abs() < 1e-12);
            }
            for p in bottom {
                let r = (p.x * p.x + p.z * p.z).sqrt();
                assert!((r - spec.radius_bottom()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn first_point_of_each_ring_lies_on_x_axis() {
        let cloud = column(6).point_cloud();
        assert_eq!(cloud.points()[0], Vec3::new(0.45, 1.5, 0.0));
        assert_eq!(cloud.points()[6], Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn centroid_pose_is_half_height_above_base() {
        let base = Pose::new(Vec3::new(2.0, 1.0, 4.0), Quat::IDENTITY);
        let spec = TaperedColumnSpec::new(10, 0.4, 0.45, 2.0, 3000.0, base).unwrap();
        assert_eq!(spec.centroid_pose().position(), Vec3::new(2.0, 2.0, 4.0));
    }

    #[test]
    fn centroid_follows_tilted_base() {
        let base = Pose::new(Vec3::ZERO, Quat::from_rotation_z(std::f64::consts::FRAC_PI_2));
        let spec = TaperedColumnSpec::new(10, 0.4, 0.45, 2.0, 3000.0, base).unwrap();
        // column lying on its side: +Y turned a quarter about Z points to -X
        let p = spec.centroid_pose().position();
        assert!((p - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn rejects_too_few_edges() {
        let result = TaperedColumnSpec::new(2, 0.4, 0.5, 1.0, 3000.0, Pose::IDENTITY);
        assert_eq!(result, Err(GeometryError::TooFewEdges(2)));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let cases = [
            (0.0, 0.5, 1.0, 3000.0, "radius_top"),
            (0.4, -0.5, 1.0, 3000.0, "radius_bottom"),
            (0.4, 0.5, 0.0, 3000.0, "height"),
            (0.4, 0.5, 1.0, f64::NAN, "density"),
        ];
        for (top, bottom, height, density, field) in cases {
            let err = TaperedColumnSpec::new(8, top, bottom, height, density, Pose::IDENTITY)
                .unwrap_err();
            assert!(
                matches!(err, GeometryError::NonPositive { field: f, .. } if f == field),
                "expected {field} rejection, got {err:?}"
            );
        }
    }

    #[test]
    fn relative_to_shifts_points() {
        let spec = column(4);
        let centered = spec.point_cloud().relative_to(Vec3::new(0.0, spec.height() / 2.0, 0.0));
        assert!(centered.iter().all(|p| p.y.abs() == spec.height() / 2.0));
    }
}
