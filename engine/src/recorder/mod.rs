//! Recorder Module
//!
//! Reads body state back after each completed step and writes it out.
//!
//! - [`relative`] - Settling/recording state machine producing relative motion records
//! - [`log`] - Delimited, file-per-signal text logs

pub mod log;
pub mod relative;

pub use log::{LogError, SignalLog};
pub use relative::{RecorderError, RecorderPhase, RelativeMotionRecord, RelativeMotionRecorder};
