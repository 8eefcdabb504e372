//! External world capability
//!
//! The colonnade never owns body state. It asks a [`PhysicsWorld`] to create
//! solids and constraints, binds prescribed motions to constraint axes, and
//! reads poses back between steps. Any rigid-body engine can sit behind
//! this trait; [`super::KinematicWorld`] is the headless reference one.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::frame::Pose;
use super::material::MaterialProperties;
use super::types::Vec3;
use crate::motion::MotionFunction;

/// Opaque handle to a body owned by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// Opaque handle to a constraint owned by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle(pub u32);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

impl fmt::Display for ConstraintHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint#{}", self.0)
    }
}

/// Linear degree of freedom of a constraint, in the constraint anchor frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kinematic state of one body seen from another body's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelativeState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

/// Errors reported by a world implementation.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("unknown {0}")]
    UnknownBody(BodyHandle),
    #[error("unknown {0}")]
    UnknownConstraint(ConstraintHandle),
    #[error("convex hull needs at least 4 non-coplanar points, got {0}")]
    DegenerateHull(usize),
    #[error("axis {axis} of {constraint} already has a motion bound")]
    AxisAlreadyBound {
        constraint: ConstraintHandle,
        axis: Axis,
    },
    #[error("invalid solid parameter: {0}")]
    InvalidSolid(&'static str),
}

/// Capabilities consumed from the external rigid-body engine.
///
/// Creation happens once during setup. During stepping the engine evaluates
/// bound motions itself; callers only read state back after `step` returns.
pub trait PhysicsWorld {
    /// Create a convex-hull solid from points expressed in the body frame.
    fn create_convex_solid(
        &mut self,
        points: &[Vec3],
        density: f64,
        material: &MaterialProperties,
        collide: bool,
        visible: bool,
    ) -> Result<BodyHandle, WorldError>;

    /// Create a box solid centered on its body frame.
    fn create_box_solid(
        &mut self,
        size: Vec3,
        density: f64,
        material: &MaterialProperties,
        collide: bool,
        visible: bool,
    ) -> Result<BodyHandle, WorldError>;

    /// Weld a body to the absolute frame (or release it).
    fn set_body_fixed(&mut self, body: BodyHandle, fixed: bool) -> Result<(), WorldError>;

    fn set_pose(&mut self, body: BodyHandle, pose: Pose) -> Result<(), WorldError>;

    fn pose(&self, body: BodyHandle) -> Result<Pose, WorldError>;

    /// Linear velocity of the body reference point, absolute frame.
    fn velocity(&self, body: BodyHandle) -> Result<Vec3, WorldError>;

    /// Linear acceleration of the body reference point, absolute frame.
    fn acceleration(&self, body: BodyHandle) -> Result<Vec3, WorldError>;

    /// Lock `body_a` to `body_b` at `anchor` (absolute frame). Every axis is
    /// rigid until a motion is bound to it.
    fn create_two_body_constraint(
        &mut self,
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor: Pose,
    ) -> Result<ConstraintHandle, WorldError>;

    /// Prescribe the displacement of `body_a` along `axis` of the anchor frame.
    fn bind_axis_motion(
        &mut self,
        constraint: ConstraintHandle,
        axis: Axis,
        motion: Arc<dyn MotionFunction>,
    ) -> Result<(), WorldError>;

    /// Advance simulated time by `dt` seconds.
    fn step(&mut self, dt: f64);

    /// Current simulated time in seconds.
    fn time(&self) -> f64;

    /// State of `target` relative to `reference`, in the reference local frame.
    ///
    /// The default uses linear quantities only: positions, velocities and
    /// accelerations are differenced in the absolute frame and rotated into
    /// the reference axes. Engines tracking angular velocity should override
    /// this to add the transport terms.
    fn relative_state(
        &self,
        reference: BodyHandle,
        target: BodyHandle,
    ) -> Result<RelativeState, WorldError> {
        let reference_pose = self.pose(reference)?;
        let target_pose = self.pose(target)?;
        let velocity = self.velocity(target)? - self.velocity(reference)?;
        let acceleration = self.acceleration(target)? - self.acceleration(reference)?;

        Ok(RelativeState {
            position: reference_pose.inverse_transform_point(target_pose.position()),
            velocity: reference_pose.inverse_transform_vector(velocity),
            acceleration: reference_pose.inverse_transform_vector(acceleration),
        })
    }
}
