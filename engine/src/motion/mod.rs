//! Motion Module
//!
//! Prescribed excitation for the shake table: recorded tracks, a harmonic
//! fallback, and the binder that hangs them on constraint axes.
//!
//! # Submodules
//!
//! - [`function`] - The `MotionFunction` trait and the sine excitation
//! - [`track`] - Recorded, interpolated motion tracks and their parser
//! - [`driver`] - Static axis bindings attached to a lock constraint

pub mod driver;
pub mod function;
pub mod track;

pub use driver::{AxisSample, DriverError, KinematicDriver, MAX_DRIVEN_AXES};
pub use function::{MotionFunction, SineMotion};
pub use track::{MotionError, MotionSample, MotionTrack, ParseStop, parse_samples};
