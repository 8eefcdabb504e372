//! Motion Track Builder
//!
//! Turns a recorded ground-motion file into a continuous excitation signal.
//!
//! # File format
//!
//! Whitespace-separated `time value` pairs, any number per line:
//!
//! ```text
//! 0.000  0.0000
//! 0.005  0.0012
//! 0.010  0.0031
//! ```
//!
//! Parsing keeps every complete pair read before the first anomaly (a token
//! that is not a finite number, an I/O failure, or a time without its
//! value). Recorded files often carry trailing junk, so an anomaly shortens
//! the track instead of failing it. Reaching the end of the stream is the
//! normal way to finish.
//!
//! # Evaluation
//!
//! `value(t) = interpolate(samples, t - time_offset) * amplitude_factor`,
//! linear between samples and clamped to the first/last value outside them.
//! The velocity is the slope of the active segment. The curve is piecewise
//! linear, so its second derivative is zero inside every segment and
//! undefined at the samples; `acceleration` reports zero everywhere. Treat
//! it as an approximation, not as the true structural excitation.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::function::MotionFunction;

/// One recorded point of the excitation signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionSample {
    /// Seconds from the start of the recording (>= 0)
    pub time: f64,
    /// Displacement (meters)
    pub value: f64,
}

impl MotionSample {
    pub const fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Why sample parsing stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseStop {
    /// Whole source consumed
    EndOfStream,
    /// A token was not a finite number
    Malformed { line: usize, token: String },
    /// The source ended between a time and its value
    DanglingTime { line: usize },
    /// Reading the source failed
    Io(io::ErrorKind),
}

impl ParseStop {
    pub fn is_clean(&self) -> bool {
        matches!(self, ParseStop::EndOfStream)
    }
}

/// Errors building a motion track.
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("failed to open motion file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sample {index} at t={time} does not come after t={previous}")]
    NonMonotonic { index: usize, time: f64, previous: f64 },
    #[error("sample {index} has negative time {time}")]
    NegativeTime { index: usize, time: f64 },
    #[error("{name} must be finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Read `time value` pairs until the source ends or stops making sense.
///
/// # Returns
/// The complete pairs read so far, and the reason reading stopped.
pub fn parse_samples<R: BufRead>(reader: R) -> (Vec<MotionSample>, ParseStop) {
    let mut samples = Vec::new();
    let mut pending_time: Option<(f64, usize)> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => return (samples, ParseStop::Io(e.kind())),
        };

        for token in line.split_whitespace() {
            let number = match token.parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                _ => {
                    return (
                        samples,
                        ParseStop::Malformed {
                            line: line_number,
                            token: token.to_string(),
                        },
                    );
                }
            };
            match pending_time.take() {
                None => pending_time = Some((number, line_number)),
                Some((time, _)) => samples.push(MotionSample::new(time, number)),
            }
        }
    }

    match pending_time {
        Some((_, line)) => (samples, ParseStop::DanglingTime { line }),
        None => (samples, ParseStop::EndOfStream),
    }
}

/// Immutable, interpolated excitation signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionTrack {
    samples: Vec<MotionSample>,
    time_offset: f64,
    amplitude_factor: f64,
}

impl MotionTrack {
    /// Build a track from samples already in memory.
    ///
    /// Sample times must be non-negative and strictly increasing.
    pub fn new(
        samples: Vec<MotionSample>,
        time_offset: f64,
        amplitude_factor: f64,
    ) -> Result<Self, MotionError> {
        for (name, value) in [
            ("time_offset", time_offset),
            ("amplitude_factor", amplitude_factor),
        ] {
            if !value.is_finite() {
                return Err(MotionError::InvalidParameter { name, value });
            }
        }

        let mut previous: Option<f64> = None;
        for (index, sample) in samples.iter().enumerate() {
            if sample.time < 0.0 {
                return Err(MotionError::NegativeTime {
                    index,
                    time: sample.time,
                });
            }
            if let Some(previous) = previous {
                if sample.time <= previous {
                    return Err(MotionError::NonMonotonic {
                        index,
                        time: sample.time,
                        previous,
                    });
                }
            }
            previous = Some(sample.time);
        }

        Ok(Self {
            samples,
            time_offset,
            amplitude_factor,
        })
    }

    /// Parse a track from any buffered source, keeping the valid prefix.
    pub fn from_reader<R: BufRead>(
        reader: R,
        time_offset: f64,
        amplitude_factor: f64,
    ) -> Result<Self, MotionError> {
        let (samples, stop) = parse_samples(reader);
        match &stop {
            ParseStop::EndOfStream => debug!(samples = samples.len(), "motion track parsed"),
            other => warn!(
                samples = samples.len(),
                reason = ?other,
                "motion track truncated at first unreadable entry"
            ),
        }
        Self::new(samples, time_offset, amplitude_factor)
    }

    /// Open and parse a recorded motion file.
    pub fn from_path(
        path: &Path,
        time_offset: f64,
        amplitude_factor: f64,
    ) -> Result<Self, MotionError> {
        let file = File::open(path).map_err(|source| MotionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "reading motion track");
        Self::from_reader(BufReader::new(file), time_offset, amplitude_factor)
    }

    pub fn samples(&self) -> &[MotionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn time_offset(&self) -> f64 {
        self.time_offset
    }

    pub fn amplitude_factor(&self) -> f64 {
        self.amplitude_factor
    }

    /// Simulation-time span covered by the recording, offset applied.
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.time + self.time_offset, last.time + self.time_offset))
    }

    /// Index of the segment `[i, i + 1]` containing recording time `x`, or
    /// `None` when `x` lies outside the recording (or there is no segment).
    fn segment(&self, x: f64) -> Option<usize> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if self.samples.len() < 2 || x < first.time || x >= last.time {
            return None;
        }
        Some(self.samples.partition_point(|s| s.time <= x).saturating_sub(1))
    }

    /// Unscaled, interpolated recording value at recording time `x`.
    fn interpolate(&self, x: f64) -> f64 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };
        if x <= first.time {
            return first.value;
        }
        if x >= last.time {
            return last.value;
        }
        match self.segment(x) {
            Some(i) => {
                let start = self.samples[i];
                let end = self.samples[i + 1];
                let u = (x - start.time) / (end.time - start.time);
                start.value + (end.value - start.value) * u
            }
            None => last.value,
        }
    }

    fn slope(&self, x: f64) -> f64 {
        match self.segment(x) {
            Some(i) => {
                let start = self.samples[i];
                let end = self.samples[i + 1];
                (end.value - start.value) / (end.time - start.time)
            }
            None => 0.0,
        }
    }
}

impl MotionFunction for MotionTrack {
    fn value(&self, t: f64) -> f64 {
        self.interpolate(t - self.time_offset) * self.amplitude_factor
    }

    fn velocity(&self, t: f64) -> f64 {
        self.slope(t - self.time_offset) * self.amplitude_factor
    }

    fn acceleration(&self, _t: f64) -> f64 {
        0.0
    }
}

static_assertions::assert_impl_all!(MotionTrack: MotionFunction, Send, Sync);
