//! Physics type re-exports from glam
//!
//! The structure and its excitation are simulated in double precision: time
//! accumulates over thousands of small steps and is compared against settle
//! and end thresholds, so the f64 variants of glam are used throughout.

pub use glam::{DQuat as Quat, DVec3 as Vec3};
