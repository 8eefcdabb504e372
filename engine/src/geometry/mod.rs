//! Geometry Module
//!
//! Procedural solids for the colonnade: tapered polygonal column segments
//! and the request catalogue the structure is described with.

pub mod column;
pub mod solid;

pub use column::{GeometryError, MIN_EDGE_COUNT, SolidPointCloud, TaperedColumnSpec};
pub use solid::{ElementRole, SolidRequest, SolidShape};
