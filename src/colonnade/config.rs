//! Simulation Configuration
//!
//! Everything that is fixed before the run starts: which layout to build,
//! which excitation to apply and how to scale it, when to start recording,
//! when to stop, and where the logs go. `Default` reproduces the constants
//! the shake-table demo was tuned with.
//!
//! Configurations are plain JSON; every field is optional and falls back to
//! its default.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layout::LayoutVariant;
use crate::motion::SineMotion;
use crate::physics::MaterialProperties;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which signal shakes the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExcitationSource {
    /// Recorded response with the barrier installed
    WithBarrier,
    /// Recorded response without the barrier
    WithoutBarrier,
    /// Harmonic excitation, no file needed
    Sine,
}

/// Recorded track files for one excitation source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFiles {
    /// Motion along the table X axis
    pub x: PathBuf,
    /// Optional motion along the table Z axis
    #[serde(default)]
    pub z: Option<PathBuf>,
}

/// Excitation selection and scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcitationConfig {
    pub source: ExcitationSource,
    pub with_barrier: TrackFiles,
    pub without_barrier: TrackFiles,
    pub sine: SineMotion,
    /// Shift applied to the recording time axis (seconds)
    pub time_offset: f64,
    /// Multiplier applied to every recorded value
    pub amplitude_factor: f64,
}

impl Default for ExcitationConfig {
    fn default() -> Self {
        Self {
            source: ExcitationSource::WithoutBarrier,
            with_barrier: TrackFiles {
                x: PathBuf::from("data/with_barrier_x.txt"),
                z: Some(PathBuf::from("data/with_barrier_z.txt")),
            },
            without_barrier: TrackFiles {
                x: PathBuf::from("data/without_barrier_x.txt"),
                z: Some(PathBuf::from("data/without_barrier_z.txt")),
            },
            sine: SineMotion::default(),
            time_offset: 2.0,
            amplitude_factor: 1.0,
        }
    }
}

impl ExcitationConfig {
    /// Track files of the selected recorded source, if it is a recorded one.
    pub fn selected_files(&self) -> Option<&TrackFiles> {
        match self.source {
            ExcitationSource::WithBarrier => Some(&self.with_barrier),
            ExcitationSource::WithoutBarrier => Some(&self.without_barrier),
            ExcitationSource::Sine => None,
        }
    }
}

/// Central configuration for one shake-table run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub layout: LayoutVariant,
    pub excitation: ExcitationConfig,
    /// Seconds of settling before the baseline freezes and recording starts
    pub settle_time: f64,
    /// Simulated time at which the session ends (seconds)
    pub end_time: f64,
    /// Integration step (seconds)
    pub timestep: f64,
    /// Surface material shared by every solid
    pub material: MaterialProperties,
    /// Elements whose motion relative to the table is logged; empty means
    /// the layout's own choice
    pub monitored: Vec<String>,
    /// Directory receiving the log files
    pub output_dir: PathBuf,
    /// Column separator in log files
    pub log_delimiter: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            layout: LayoutVariant::Simple,
            excitation: ExcitationConfig::default(),
            settle_time: 2.0,
            end_time: 30.0,
            timestep: 0.005,
            material: MaterialProperties::default(),
            monitored: Vec::new(),
            output_dir: PathBuf::from("output"),
            log_delimiter: "\t".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Load a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the configuration can drive a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return invalid(format!("timestep must be positive, got {}", self.timestep));
        }
        if !self.settle_time.is_finite() || self.settle_time < 0.0 {
            return invalid(format!("settle_time must be >= 0, got {}", self.settle_time));
        }
        if !self.end_time.is_finite() || self.end_time <= self.settle_time {
            return invalid(format!(
                "end_time ({}) must be after settle_time ({})",
                self.end_time, self.settle_time
            ));
        }
        if self.log_delimiter.is_empty() {
            return invalid("log_delimiter must not be empty".to_string());
        }
        let mut seen = HashSet::new();
        if let Some(name) = self.monitored.iter().find(|name| !seen.insert(name.as_str())) {
            return invalid(format!("monitored element {name:?} listed twice"));
        }
        if let Some(field) = self.material.invalid_field() {
            return invalid(format!("material {field} out of range"));
        }
        let sine = &self.excitation.sine;
        if ![sine.phase, sine.frequency, sine.amplitude, sine.start_time]
            .iter()
            .all(|v| v.is_finite())
        {
            return invalid("sine parameters must be finite".to_string());
        }
        Ok(())
    }

    /// Approximate number of steps between time zero and `end_time`.
    pub fn expected_steps(&self) -> usize {
        (self.end_time / self.timestep).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timestep, 0.005);
        assert_eq!(config.expected_steps(), 6000);
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config: SimulationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn partial_json_overrides() {
        let json = r#"{
            "layout": "extended",
            "excitation": { "source": "with-barrier", "amplitude_factor": 1.5 },
            "end_time": 12.0
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.layout, LayoutVariant::Extended);
        assert_eq!(config.excitation.source, ExcitationSource::WithBarrier);
        assert_eq!(config.excitation.amplitude_factor, 1.5);
        assert_eq!(config.excitation.time_offset, 2.0);
        assert_eq!(config.end_time, 12.0);
        assert_eq!(
            config.excitation.selected_files().unwrap().x,
            PathBuf::from("data/with_barrier_x.txt")
        );
    }

    #[test]
    fn rejects_end_before_settle() {
        let config = SimulationConfig {
            settle_time: 5.0,
            end_time: 5.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_bad_timestep_and_delimiter() {
        let config = SimulationConfig {
            timestep: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            log_delimiter: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_repeated_monitored_element() {
        let config = SimulationConfig {
            monitored: vec![
                "row0.beam0".to_string(),
                "row2.beam0".to_string(),
                "row0.beam0".to_string(),
            ],
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("row0.beam0"), "{msg}"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn zero_settle_time_is_valid() {
        let config = SimulationConfig {
            settle_time: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sine_source_has_no_files() {
        let mut config = SimulationConfig::default();
        config.excitation.source = ExcitationSource::Sine;
        assert!(config.excitation.selected_files().is_none());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"settle_time": 1.0, "monitored": ["row0.beam0"]}"#).unwrap();
        let config = SimulationConfig::from_path(&path).unwrap();
        assert_eq!(config.settle_time, 1.0);
        assert_eq!(config.monitored, vec!["row0.beam0".to_string()]);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            SimulationConfig::from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
