//! Kinematic reference world
//!
//! A headless [`PhysicsWorld`] that does no dynamics at all: free bodies stay
//! exactly where they were placed, and the first body of each lock
//! constraint follows the motions bound to the constraint axes. That is
//! enough to run the full setup / step / record pipeline without an
//! external engine, and it makes the excitation path easy to test because
//! every recorded displacement is known in closed form.

use std::sync::Arc;

use super::frame::{Pose, compose};
use super::material::MaterialProperties;
use super::types::Vec3;
use super::world::{Axis, BodyHandle, ConstraintHandle, PhysicsWorld, WorldError};
use crate::motion::MotionFunction;

/// Collision geometry kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyShape {
    ConvexHull { points: Vec<Vec3> },
    Box { size: Vec3 },
}

/// Everything the kinematic world remembers about a body.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    pub shape: BodyShape,
    pub density: f64,
    pub material: MaterialProperties,
    pub collide: bool,
    pub visible: bool,
    pub fixed: bool,
    pub pose: Pose,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

#[derive(Debug)]
struct LockConstraint {
    body_a: BodyHandle,
    body_b: BodyHandle,
    /// Anchor frame expressed in body B's frame
    anchor_in_b: Pose,
    /// Body A's rest pose expressed in the anchor frame
    a_in_anchor: Pose,
    motions: [Option<Arc<dyn MotionFunction>>; 3],
}

/// Headless world with prescribed motion only.
#[derive(Debug, Default)]
pub struct KinematicWorld {
    bodies: Vec<KinematicBody>,
    constraints: Vec<LockConstraint>,
    time: f64,
}

impl KinematicWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&KinematicBody, WorldError> {
        self.bodies
            .get(handle.0 as usize)
            .ok_or(WorldError::UnknownBody(handle))
    }

    /// Iterate over all bodies in creation order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &KinematicBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (BodyHandle(i as u32), body))
    }

    /// Axes of a constraint that currently carry a motion.
    pub fn driven_axes(&self, handle: ConstraintHandle) -> Result<Vec<Axis>, WorldError> {
        let constraint = self
            .constraints
            .get(handle.0 as usize)
            .ok_or(WorldError::UnknownConstraint(handle))?;
        Ok(Axis::ALL
            .into_iter()
            .filter(|axis| constraint.motions[axis.index()].is_some())
            .collect())
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut KinematicBody, WorldError> {
        self.bodies
            .get_mut(handle.0 as usize)
            .ok_or(WorldError::UnknownBody(handle))
    }

    fn push_body(
        &mut self,
        shape: BodyShape,
        density: f64,
        material: &MaterialProperties,
        collide: bool,
        visible: bool,
    ) -> Result<BodyHandle, WorldError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(WorldError::InvalidSolid("density"));
        }
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(KinematicBody {
            shape,
            density,
            material: *material,
            collide,
            visible,
            fixed: false,
            pose: Pose::IDENTITY,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        });
        Ok(handle)
    }

    /// Move every driven body to its prescribed pose at the current time.
    fn apply_prescribed_motion(&mut self) {
        let t = self.time;
        for constraint in &self.constraints {
            let (displacement, velocity, acceleration) =
                constraint.motions.iter().zip(Axis::ALL).fold(
                    (Vec3::ZERO, Vec3::ZERO, Vec3::ZERO),
                    |(d, v, a), (motion, axis)| match motion {
                        Some(m) => (
                            d + axis.unit() * m.value(t),
                            v + axis.unit() * m.velocity(t),
                            a + axis.unit() * m.acceleration(t),
                        ),
                        None => (d, v, a),
                    },
                );

            let Some(b) = self.bodies.get(constraint.body_b.0 as usize) else {
                continue;
            };
            let anchor = compose(constraint.anchor_in_b, b.pose);
            let carrier_velocity = b.velocity;
            let carrier_acceleration = b.acceleration;
            let shifted = compose(Pose::from_translation(displacement), anchor);
            let pose = compose(constraint.a_in_anchor, shifted);

            let Some(a) = self.bodies.get_mut(constraint.body_a.0 as usize) else {
                continue;
            };
            if a.fixed {
                continue;
            }
            a.pose = pose;
            a.velocity = carrier_velocity + anchor.transform_vector(velocity);
            a.acceleration = carrier_acceleration + anchor.transform_vector(acceleration);
        }
    }
}

impl PhysicsWorld for KinematicWorld {
    fn create_convex_solid(
        &mut self,
        points: &[Vec3],
        density: f64,
        material: &MaterialProperties,
        collide: bool,
        visible: bool,
    ) -> Result<BodyHandle, WorldError> {
        if !spans_volume(points) {
            return Err(WorldError::DegenerateHull(points.len()));
        }
        self.push_body(
            BodyShape::ConvexHull {
                points: points.to_vec(),
            },
            density,
            material,
            collide,
            visible,
        )
    }

    fn create_box_solid(
        &mut self,
        size: Vec3,
        density: f64,
        material: &MaterialProperties,
        collide: bool,
        visible: bool,
    ) -> Result<BodyHandle, WorldError> {
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(WorldError::InvalidSolid("size"));
        }
        self.push_body(BodyShape::Box { size }, density, material, collide, visible)
    }

    fn set_body_fixed(&mut self, body: BodyHandle, fixed: bool) -> Result<(), WorldError> {
        let body = self.body_mut(body)?;
        body.fixed = fixed;
        if fixed {
            body.velocity = Vec3::ZERO;
            body.acceleration = Vec3::ZERO;
        }
        Ok(())
    }

    fn set_pose(&mut self, body: BodyHandle, pose: Pose) -> Result<(), WorldError> {
        self.body_mut(body)?.pose = pose;
        Ok(())
    }

    fn pose(&self, body: BodyHandle) -> Result<Pose, WorldError> {
        Ok(self.body(body)?.pose)
    }

    fn velocity(&self, body: BodyHandle) -> Result<Vec3, WorldError> {
        Ok(self.body(body)?.velocity)
    }

    fn acceleration(&self, body: BodyHandle) -> Result<Vec3, WorldError> {
        Ok(self.body(body)?.acceleration)
    }

    fn create_two_body_constraint(
        &mut self,
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor: Pose,
    ) -> Result<ConstraintHandle, WorldError> {
        let pose_a = self.pose(body_a)?;
        let pose_b = self.pose(body_b)?;
        let handle = ConstraintHandle(self.constraints.len() as u32);
        self.constraints.push(LockConstraint {
            body_a,
            body_b,
            anchor_in_b: anchor.relative_to(&pose_b),
            a_in_anchor: pose_a.relative_to(&anchor),
            motions: [None, None, None],
        });
        Ok(handle)
    }

    fn bind_axis_motion(
        &mut self,
        constraint: ConstraintHandle,
        axis: Axis,
        motion: Arc<dyn MotionFunction>,
    ) -> Result<(), WorldError> {
        let lock = self
            .constraints
            .get_mut(constraint.0 as usize)
            .ok_or(WorldError::UnknownConstraint(constraint))?;
        let slot = &mut lock.motions[axis.index()];
        if slot.is_some() {
            return Err(WorldError::AxisAlreadyBound { constraint, axis });
        }
        *slot = Some(motion);
        Ok(())
    }

    fn step(&mut self, dt: f64) {
        self.time += dt;
        self.apply_prescribed_motion();
    }

    fn time(&self) -> f64 {
        self.time
    }
}

/// True when the points enclose a non-zero volume.
fn spans_volume(points: &[Vec3]) -> bool {
    const EPS: f64 = 1e-12;
    let Some(&origin) = points.first() else {
        return false;
    };
    let Some(&far) = points.iter().find(|p| (**p - origin).length_squared() > EPS) else {
        return false;
    };
    let edge = far - origin;
    let Some(normal) = points
        .iter()
        .map(|p| edge.cross(*p - origin))
        .find(|n| n.length_squared() > EPS)
    else {
        return false;
    };
    points
        .iter()
        .any(|p| normal.dot(*p - origin).abs() > EPS * normal.length())
}
