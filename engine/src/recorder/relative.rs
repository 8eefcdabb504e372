//! Relative Motion Recorder
//!
//! Measures a tracked body in the local frame of a reference body, net of the
//! position it had when the excitation started.
//!
//! The recorder has two phases:
//!
//! - **Settling** (`time < settle_time`): every observation overwrites the
//!   baseline with the current relative position. Nothing is recorded.
//! - **Recording** (`time >= settle_time`): the baseline is frozen on the
//!   first observation and every observation yields one record. Position is
//!   reported net of the baseline; velocity and acceleration are rates and
//!   are reported as-is.
//!
//! The transition is one-way. Observations must be taken after a world step
//! has completed, never in the middle of one.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::physics::{RelativeState, Vec3};

/// Current phase of a recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecorderPhase {
    Settling,
    Recording,
}

/// One logged step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelativeMotionRecord {
    pub time: f64,
    /// Displacement from the frozen baseline, reference local frame
    pub relative_position: Vec3,
    pub relative_velocity: Vec3,
    pub relative_acceleration: Vec3,
}

impl RelativeMotionRecord {
    /// Columns in log order: t, position xyz, velocity xyz, acceleration xyz.
    pub fn to_row(&self) -> [f64; 10] {
        let p = self.relative_position;
        let v = self.relative_velocity;
        let a = self.relative_acceleration;
        [self.time, p.x, p.y, p.z, v.x, v.y, v.z, a.x, a.y, a.z]
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RecorderError {
    /// Recording was asked for before any settling observation existed.
    #[error("no baseline captured before recording started at t={time}")]
    MissingBaseline { time: f64 },
}

/// Settling/recording state machine for one tracked body.
#[derive(Debug, Clone)]
pub struct RelativeMotionRecorder {
    settle_time: f64,
    phase: RecorderPhase,
    baseline: Option<Vec3>,
    records_emitted: usize,
}

impl RelativeMotionRecorder {
    pub fn new(settle_time: f64) -> Self {
        Self {
            settle_time,
            phase: RecorderPhase::Settling,
            baseline: None,
            records_emitted: 0,
        }
    }

    pub fn settle_time(&self) -> f64 {
        self.settle_time
    }

    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    pub fn records_emitted(&self) -> usize {
        self.records_emitted
    }

    /// The frozen baseline. `None` while still settling.
    pub fn baseline(&self) -> Option<Vec3> {
        match self.phase {
            RecorderPhase::Recording => self.baseline,
            RecorderPhase::Settling => None,
        }
    }

    /// Displacement of `position` from the frozen baseline.
    pub fn displacement(&self, position: Vec3) -> Result<Vec3, RecorderError> {
        self.baseline()
            .map(|baseline| position - baseline)
            .ok_or(RecorderError::MissingBaseline {
                time: self.settle_time,
            })
    }

    /// Take the rest state read before the first step as the initial
    /// baseline. Later settling observations still overwrite it; once
    /// recording has started this does nothing.
    pub fn seed_baseline(&mut self, state: RelativeState) {
        if self.phase == RecorderPhase::Settling {
            self.baseline = Some(state.position);
        }
    }

    /// Feed the relative state read back after a completed step.
    ///
    /// # Returns
    /// A record once recording has started, `None` while settling.
    pub fn observe(
        &mut self,
        time: f64,
        state: RelativeState,
    ) -> Result<Option<RelativeMotionRecord>, RecorderError> {
        if self.phase == RecorderPhase::Settling {
            if time < self.settle_time {
                self.baseline = Some(state.position);
                return Ok(None);
            }
            let Some(baseline) = self.baseline else {
                return Err(RecorderError::MissingBaseline { time });
            };
            debug!(time, ?baseline, "baseline frozen, recording relative motion");
            self.phase = RecorderPhase::Recording;
        }

        let relative_position = self.displacement(state.position)?;
        self.records_emitted += 1;
        Ok(Some(RelativeMotionRecord {
            time,
            relative_position,
            relative_velocity: state.velocity,
            relative_acceleration: state.acceleration,
        }))
    }
}
