//! Kinematic Driver Binder
//!
//! Assigns motion functions to the linear axes of a lock constraint. Axes
//! without a motion stay locked. The binding set is fixed when the driver is
//! built; it is attached to the constraint once during setup and there is no
//! way to rebind an axis while the simulation runs.
//!
//! # Example
//!
//! ```ignore
//! let driver = KinematicDriver::new()
//!     .with_axis(Axis::X, Arc::new(track_x))?
//!     .with_axis(Axis::Z, Arc::new(track_z))?;
//! driver.attach(&mut world, earthquake_lock)?;
//! ```

use std::sync::Arc;

use thiserror::Error;

use super::function::MotionFunction;
use crate::physics::{Axis, ConstraintHandle, PhysicsWorld, WorldError};

/// A driven constraint moves along at most this many independent axes.
pub const MAX_DRIVEN_AXES: usize = 2;

#[derive(Debug, Error, PartialEq)]
pub enum DriverError {
    #[error("cannot drive axis {0}: at most 2 axes per constraint")]
    TooManyAxes(Axis),
    #[error("axis {0} already has a motion")]
    AxisTaken(Axis),
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Evaluated motion on one axis at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSample {
    pub axis: Axis,
    pub value: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

/// Static set of axis → motion bindings.
#[derive(Debug, Clone, Default)]
pub struct KinematicDriver {
    bindings: Vec<(Axis, Arc<dyn MotionFunction>)>,
}

impl KinematicDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding. Consumes the driver so bindings can only grow while it
    /// is being built.
    pub fn with_axis(
        mut self,
        axis: Axis,
        motion: Arc<dyn MotionFunction>,
    ) -> Result<Self, DriverError> {
        if self.bindings.iter().any(|(bound, _)| *bound == axis) {
            return Err(DriverError::AxisTaken(axis));
        }
        if self.bindings.len() >= MAX_DRIVEN_AXES {
            return Err(DriverError::TooManyAxes(axis));
        }
        self.bindings.push((axis, motion));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Driven axes in binding order.
    pub fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        self.bindings.iter().map(|(axis, _)| *axis)
    }

    pub fn motion(&self, axis: Axis) -> Option<&Arc<dyn MotionFunction>> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == axis)
            .map(|(_, motion)| motion)
    }

    /// Hand every binding to the constraint inside the world.
    ///
    /// The world keeps shared references; the driver stays the owner.
    pub fn attach<W: PhysicsWorld + ?Sized>(
        &self,
        world: &mut W,
        constraint: ConstraintHandle,
    ) -> Result<(), DriverError> {
        for (axis, motion) in &self.bindings {
            world.bind_axis_motion(constraint, *axis, Arc::clone(motion))?;
        }
        Ok(())
    }

    /// Evaluate every bound motion at `t`, in binding order.
    pub fn sample(&self, t: f64) -> Vec<AxisSample> {
        self.bindings
            .iter()
            .map(|(axis, motion)| AxisSample {
                axis: *axis,
                value: motion.value(t),
                velocity: motion.velocity(t),
                acceleration: motion.acceleration(t),
            })
            .collect()
    }
}
