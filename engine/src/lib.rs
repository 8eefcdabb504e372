//! Terremoto Engine Library
//!
//! Builds a parametric masonry colonnade on top of a shake table, drives the
//! table with a recorded (time-scaled) ground motion and logs how the
//! structure moves relative to its support.
//!
//! Rigid-body dynamics, contact and integration belong to an external engine
//! reached through [`physics::PhysicsWorld`]. This crate only supplies
//! creation parameters, prescribed motions and read-back logging.
//!
//! # Modules
//!
//! - [`physics`] - Numeric types, poses and frame composition, the world capability trait
//! - [`geometry`] - Tapered column point clouds and solid requests
//! - [`motion`] - Recorded motion tracks, sine excitation and the kinematic driver
//! - [`recorder`] - Relative motion recorder and delimited signal logs
//! - [`colonnade`] - Configuration, layout tables, structure assembly and the step session
//!
//! # Example
//!
//! ```ignore
//! use terremoto_engine::colonnade::{Session, SimulationConfig};
//! use terremoto_engine::physics::KinematicWorld;
//!
//! let config = SimulationConfig::default();
//! let mut session = Session::setup(KinematicWorld::new(), config)?;
//! let summary = session.run_until(|_| false)?;
//! println!("recorded {} rows", summary.records_written);
//! ```

pub mod geometry;
pub mod motion;
pub mod physics;
pub mod recorder;

// Structure-specific modules (located in src/colonnade/ directory)
#[path = "../../src/colonnade/mod.rs"]
pub mod colonnade;

// Re-export the most used types at crate level for convenience
pub use geometry::{SolidPointCloud, SolidRequest, SolidShape, TaperedColumnSpec};
pub use motion::{KinematicDriver, MotionFunction, MotionTrack, SineMotion};
pub use physics::{Pose, Quat, Vec3, compose};
pub use recorder::{RelativeMotionRecord, RelativeMotionRecorder};
