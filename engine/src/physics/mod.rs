//! Physics module for the Terremoto engine
//!
//! This module holds the small amount of rigid-body plumbing the colonnade
//! needs on this side of the engine boundary. Collision, contact resolution
//! and integration are done by an external engine consumed through
//! [`PhysicsWorld`].
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Density in kg/m³
//! - Time in seconds
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types (Vec3, Quat) re-exported from glam
//! - [`frame`] - Immutable poses and frame composition
//! - [`material`] - Surface material shared by every solid request
//! - [`world`] - The external world capability trait and its handles
//! - [`kinematic_world`] - Headless reference world (prescribed motion only)

pub mod frame;
pub mod kinematic_world;
pub mod material;
pub mod types;
pub mod world;

// Re-export commonly used types at the physics module level
pub use frame::{Pose, PoseError, compose};
pub use kinematic_world::{BodyShape, KinematicBody, KinematicWorld};
pub use material::MaterialProperties;
pub use types::{Quat, Vec3};
pub use world::{Axis, BodyHandle, ConstraintHandle, PhysicsWorld, RelativeState, WorldError};
