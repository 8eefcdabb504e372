//! Colonnade Module
//!
//! The shake-table experiment itself, built on the engine modules:
//!
//! - [`config`] - Run configuration loaded from JSON
//! - [`layout`] - Fixed placement tables for each layout variant
//! - [`assembler`] - Creates a layout plan's bodies inside a world
//! - [`session`] - Setup, step loop and log writing

pub mod assembler;
pub mod config;
pub mod layout;
pub mod session;

pub use assembler::{AssembledStructure, AssemblyError, assemble};
pub use config::{ConfigError, ExcitationConfig, ExcitationSource, SimulationConfig, TrackFiles};
pub use layout::{LayoutPlan, LayoutVariant, extended_layout, simple_layout};
pub use session::{Session, SessionError, SessionSummary, StepOutcome, build_driver};
