//! Shake-Table Session
//!
//! Owns the world for the duration of a run and drives it step by step:
//!
//! 1. `setup` validates the configuration, assembles the layout, locks the
//!    table to the ground, binds the excitation and opens the logs.
//! 2. `step` advances the world, then reads state back and writes one row
//!    per excitation axis and one row per recording monitor.
//! 3. `run_until` repeats `step` until the end time or an external stop.
//!
//! Everything runs on the caller's thread. Reads happen only between steps.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::assembler::{AssembledStructure, AssemblyError, assemble};
use super::config::{ConfigError, ExcitationConfig, SimulationConfig};
use crate::motion::{DriverError, KinematicDriver, MotionError, MotionTrack, SineMotion};
use crate::physics::{Axis, BodyHandle, ConstraintHandle, PhysicsWorld, Pose, WorldError};
use crate::recorder::{LogError, RecorderError, RelativeMotionRecorder, SignalLog};

/// Slack when comparing accumulated simulation time against `end_time`.
const END_TIME_EPSILON: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Motion(#[from] MotionError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Recorder(#[from] RecorderError),
    #[error(transparent)]
    Log(#[from] LogError),
    #[error("monitored element {0:?} is not part of the layout")]
    UnknownElement(String),
}

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Finished,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub steps: usize,
    pub final_time: f64,
    /// Relative-motion rows over all monitors
    pub records_written: usize,
    /// Excitation rows over all axes
    pub excitation_rows: usize,
    /// `false` when the stop predicate ended the run early
    pub reached_end: bool,
}

/// One monitored element: its recorder and its log.
#[derive(Debug)]
struct Monitor {
    name: String,
    body: BodyHandle,
    recorder: RelativeMotionRecorder,
    log: SignalLog,
}

/// A configured shake-table run over any [`PhysicsWorld`].
#[derive(Debug)]
pub struct Session<W: PhysicsWorld> {
    world: W,
    config: SimulationConfig,
    structure: AssembledStructure,
    table_lock: ConstraintHandle,
    driver: KinematicDriver,
    excitation_logs: Vec<SignalLog>,
    monitors: Vec<Monitor>,
    steps: usize,
}

impl<W: PhysicsWorld> Session<W> {
    /// Build the structure in `world` and prepare every log.
    pub fn setup(mut world: W, config: SimulationConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let plan = config.layout.build().map_err(AssemblyError::from)?;
        let structure = assemble(&mut world, &plan, &config.material)?;

        let table_lock =
            world.create_two_body_constraint(structure.table, structure.ground, Pose::IDENTITY)?;
        let driver = build_driver(&config.excitation)?;
        driver.attach(&mut world, table_lock)?;

        let excitation_logs = driver
            .axes()
            .map(|axis| {
                SignalLog::create(
                    &excitation_log_path(&config.output_dir, axis),
                    &config.log_delimiter,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let names = if config.monitored.is_empty() {
            &plan.monitored
        } else {
            &config.monitored
        };
        let mut monitors = Vec::with_capacity(names.len());
        for name in names {
            let body = structure
                .get(name)
                .ok_or_else(|| SessionError::UnknownElement(name.clone()))?;
            // Rest state before the first step
            let mut recorder = RelativeMotionRecorder::new(config.settle_time);
            recorder.seed_baseline(world.relative_state(structure.table, body)?);
            monitors.push(Monitor {
                name: name.clone(),
                body,
                recorder,
                log: SignalLog::create(
                    &relative_log_path(&config.output_dir, name),
                    &config.log_delimiter,
                )?,
            });
        }

        info!(
            layout = %config.layout,
            excitation = ?config.excitation.source,
            axes = ?driver.axes().collect::<Vec<_>>(),
            monitors = monitors.len(),
            output = %config.output_dir.display(),
            "session ready"
        );

        Ok(Self {
            world,
            config,
            structure,
            table_lock,
            driver,
            excitation_logs,
            monitors,
            steps: 0,
        })
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn structure(&self) -> &AssembledStructure {
        &self.structure
    }

    pub fn driver(&self) -> &KinematicDriver {
        &self.driver
    }

    /// The lock joint between the shake table and the ground.
    pub fn table_lock(&self) -> ConstraintHandle {
        self.table_lock
    }

    pub fn time(&self) -> f64 {
        self.world.time()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Monitored element names in logging order.
    pub fn monitored(&self) -> impl Iterator<Item = &str> {
        self.monitors.iter().map(|m| m.name.as_str())
    }

    pub fn recorder(&self, name: &str) -> Option<&RelativeMotionRecorder> {
        self.monitors.iter().find(|m| m.name == name).map(|m| &m.recorder)
    }

    pub fn is_finished(&self) -> bool {
        self.world.time() + END_TIME_EPSILON >= self.config.end_time
    }

    /// Advance one timestep and record what the completed step produced.
    pub fn step(&mut self) -> Result<StepOutcome, SessionError> {
        if self.is_finished() {
            return Ok(StepOutcome::Finished);
        }

        self.world.step(self.config.timestep);
        self.steps += 1;
        let t = self.world.time();

        for (log, sample) in self.excitation_logs.iter_mut().zip(self.driver.sample(t)) {
            log.append_excitation(t, &sample)?;
        }

        for monitor in &mut self.monitors {
            let state = self.world.relative_state(self.structure.table, monitor.body)?;
            if let Some(record) = monitor.recorder.observe(t, state)? {
                monitor.log.append_record(&record)?;
            }
        }
        trace!(t, step = self.steps, "step complete");

        Ok(if self.is_finished() {
            StepOutcome::Finished
        } else {
            StepOutcome::Continue
        })
    }

    /// Step until the end time, or until `stop` returns `true` for the
    /// current time. Logs are flushed on every exit path.
    pub fn run_until(
        &mut self,
        mut stop: impl FnMut(f64) -> bool,
    ) -> Result<SessionSummary, SessionError> {
        let result = loop {
            if stop(self.world.time()) {
                debug!(t = self.world.time(), "run stopped externally");
                break Ok(false);
            }
            match self.step() {
                Ok(StepOutcome::Finished) => break Ok(true),
                Ok(StepOutcome::Continue) => {}
                Err(err) => break Err(err),
            }
        };

        match result {
            Ok(reached_end) => {
                self.flush()?;
                let summary = self.summary(reached_end);
                info!(
                    steps = summary.steps,
                    t = summary.final_time,
                    records = summary.records_written,
                    "run complete"
                );
                Ok(summary)
            }
            Err(err) => {
                if let Err(flush_err) = self.flush() {
                    warn!(error = %flush_err, "failed to flush partial logs");
                }
                Err(err)
            }
        }
    }

    /// Push buffered rows of every log to disk.
    pub fn flush(&mut self) -> Result<(), SessionError> {
        for log in &mut self.excitation_logs {
            log.flush()?;
        }
        for monitor in &mut self.monitors {
            monitor.log.flush()?;
        }
        Ok(())
    }

    pub fn summary(&self, reached_end: bool) -> SessionSummary {
        SessionSummary {
            steps: self.steps,
            final_time: self.world.time(),
            records_written: self.monitors.iter().map(|m| m.log.rows()).sum(),
            excitation_rows: self.excitation_logs.iter().map(|l| l.rows()).sum(),
            reached_end,
        }
    }

    /// Flush and hand the world back.
    pub fn into_world(mut self) -> Result<W, SessionError> {
        self.flush()?;
        Ok(self.world)
    }
}

/// Motions for the configured excitation source.
///
/// Recorded sources always drive X and drive Z when a Z file is given. The
/// sine source drives X only; it is shifted and scaled the same way a
/// recording is.
pub fn build_driver(excitation: &ExcitationConfig) -> Result<KinematicDriver, SessionError> {
    let offset = excitation.time_offset;
    let factor = excitation.amplitude_factor;

    let Some(files) = excitation.selected_files() else {
        let sine = SineMotion {
            amplitude: excitation.sine.amplitude * factor,
            start_time: excitation.sine.start_time + offset,
            ..excitation.sine
        };
        return Ok(KinematicDriver::new().with_axis(Axis::X, Arc::new(sine))?);
    };

    let x = MotionTrack::from_path(&files.x, offset, factor)?;
    let mut driver = KinematicDriver::new().with_axis(Axis::X, Arc::new(x))?;
    if let Some(z_path) = &files.z {
        let z = MotionTrack::from_path(z_path, offset, factor)?;
        driver = driver.with_axis(Axis::Z, Arc::new(z))?;
    }
    Ok(driver)
}

pub(crate) fn excitation_log_path(output_dir: &Path, axis: Axis) -> PathBuf {
    output_dir.join(format!("excitation_{axis}.txt"))
}

pub(crate) fn relative_log_path(output_dir: &Path, element: &str) -> PathBuf {
    output_dir.join(format!("relative_{element}.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colonnade::config::ExcitationSource;
    use crate::motion::MotionFunction;

    #[test]
    fn sine_driver_is_shifted_and_scaled() {
        let mut excitation = ExcitationConfig {
            source: ExcitationSource::Sine,
            amplitude_factor: 2.0,
            time_offset: 1.0,
            ..Default::default()
        };
        excitation.sine.amplitude = 0.25;
        let driver = build_driver(&excitation).unwrap();

        assert_eq!(driver.axes().collect::<Vec<_>>(), vec![Axis::X]);
        let motion = driver.motion(Axis::X).unwrap();
        assert_eq!(motion.value(0.9), 0.0);
        let quarter_period = 1.0 + 1.0 / (4.0 * 1.6);
        assert!((motion.value(quarter_period) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn recorded_driver_binds_x_and_optional_z() {
        let dir = tempfile::tempdir().unwrap();
        let x = dir.path().join("x.txt");
        let z = dir.path().join("z.txt");
        std::fs::write(&x, "0 0\n1 0.1\n").unwrap();
        std::fs::write(&z, "0 0\n1 -0.1\n").unwrap();

        let mut excitation = ExcitationConfig::default();
        excitation.without_barrier.x = x.clone();
        excitation.without_barrier.z = None;
        let driver = build_driver(&excitation).unwrap();
        assert_eq!(driver.axes().collect::<Vec<_>>(), vec![Axis::X]);

        excitation.without_barrier.z = Some(z);
        let driver = build_driver(&excitation).unwrap();
        assert_eq!(driver.axes().collect::<Vec<_>>(), vec![Axis::X, Axis::Z]);
    }

    #[test]
    fn missing_track_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut excitation = ExcitationConfig::default();
        excitation.without_barrier.x = dir.path().join("absent.txt");
        assert!(matches!(
            build_driver(&excitation),
            Err(SessionError::Motion(MotionError::Io { .. }))
        ));
    }

    #[test]
    fn log_paths() {
        let dir = Path::new("out");
        assert_eq!(excitation_log_path(dir, Axis::Z), dir.join("excitation_z.txt"));
        assert_eq!(relative_log_path(dir, "row0.beam0"), dir.join("relative_row0.beam0.txt"));
    }
}
