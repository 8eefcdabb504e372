//! Delimited signal logs
//!
//! One file per signal, one row per step, plain numbers separated by a
//! configurable delimiter. Files are truncated when opened, so every run
//! starts with fresh logs.
//!
//! # Layouts
//!
//! ```text
//! relative motion:  t  px py pz  vx vy vz  ax ay az
//! excitation:       t  value  d/dt  d²/dt²
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::relative::RelativeMotionRecord;
use crate::motion::AxisSample;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write log row: {0}")]
    Write(#[from] io::Error),
}

/// Append-only, single-writer row sink.
#[derive(Debug)]
pub struct SignalLog<W: Write = BufWriter<File>> {
    writer: W,
    delimiter: String,
    rows: usize,
}

impl SignalLog<BufWriter<File>> {
    /// Create (or truncate) the log file, creating parent directories.
    pub fn create(path: &Path, delimiter: &str) -> Result<Self, LogError> {
        let create_err = |source: io::Error| LogError::Create {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(create_err)?;
        }
        let file = File::create(path).map_err(create_err)?;
        Ok(Self::new(BufWriter::new(file), delimiter))
    }
}

impl<W: Write> SignalLog<W> {
    pub fn new(writer: W, delimiter: &str) -> Self {
        Self {
            writer,
            delimiter: delimiter.to_string(),
            rows: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn write_row(&mut self, values: &[f64]) -> Result<(), LogError> {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.writer.write_all(self.delimiter.as_bytes())?;
            }
            write!(self.writer, "{value}")?;
        }
        self.writer.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    pub fn append_record(&mut self, record: &RelativeMotionRecord) -> Result<(), LogError> {
        self.write_row(&record.to_row())
    }

    pub fn append_excitation(&mut self, time: f64, sample: &AxisSample) -> Result<(), LogError> {
        self.write_row(&[time, sample.value, sample.velocity, sample.acceleration])
    }

    pub fn flush(&mut self) -> Result<(), LogError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
