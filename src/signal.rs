//! Sample series handed over for analysis
//!
//! A [`Signal`] is one channel of already-decoded amplitudes together with the
//! total duration of the recording. The plain-text loader at the bottom of this
//! module is what the command-line tool uses to obtain one.

use std::path::Path;

use ndarray::{Array1, ArrayView1};

use crate::error::{AnalysisError, Result};
use crate::units::{self, TimeUnit};

/// One hour at 44.1 kHz.
pub const DEFAULT_MAX_SAMPLES: usize = 44_100 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Signal {
    samples: Array1<f64>,
    duration_ms: f64,
}

impl Signal {
    pub fn new(samples: Array1<f64>, duration_ms: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(AnalysisError::invalid_input("Sample series is empty"));
        }
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "Duration must be a positive number of milliseconds, got {}", duration_ms
            )));
        }

        let non_finite = samples.iter().filter(|s| !s.is_finite()).count();
        if non_finite > 0 {
            log::warn!("Sample series contains {} non-finite values", non_finite);
        }

        Ok(Self { samples, duration_ms })
    }

    /// Builds a signal whose duration follows from the sample count and rate.
    pub fn from_sample_rate(samples: Array1<f64>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AnalysisError::invalid_input("Sample rate cannot be 0"));
        }
        // Multiply first: exact frame multiples must stay exact.
        let duration_ms = samples.len() as f64 * 1000.0 / sample_rate as f64;
        Self::new(samples, duration_ms)
    }

    pub fn samples(&self) -> ArrayView1<'_, f64> {
        self.samples.view()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn duration_in(&self, unit: TimeUnit) -> f64 {
        units::convert(self.duration_ms, TimeUnit::Milliseconds, unit)
    }

    /// Display unit matching the signal's length.
    pub fn natural_unit(&self) -> TimeUnit {
        TimeUnit::for_duration_ms(self.duration_ms)
    }

    /// X-values for the raw waveform, spread linearly over the duration.
    pub fn timeline(&self, unit: TimeUnit) -> Vec<f64> {
        linear_timeline(self.samples.len(), self.duration_in(unit))
    }
}

/// `len` evenly spaced points covering `[0, total)`.
pub fn linear_timeline(len: usize, total: f64) -> Vec<f64> {
    (0..len).map(|i| i as f64 / len as f64 * total).collect()
}

/// Parses whitespace separated decimal samples; `#` starts a comment that runs
/// to the end of the line.
pub fn parse_samples(text: &str) -> Result<Vec<f64>> {
    let mut samples = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("");
        for token in content.split_whitespace() {
            let value = token.parse::<f64>().map_err(|e| {
                AnalysisError::invalid_input(format!(
                    "Line {}: cannot parse sample '{}': {}", line_no + 1, token, e
                ))
            })?;
            samples.push(value);
        }
    }

    Ok(samples)
}

/// Reads a sample file, refusing anything longer than `max_samples`.
pub fn read_samples<P: AsRef<Path>>(path: P, max_samples: usize) -> Result<Array1<f64>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let samples = parse_samples(&text)?;

    if samples.len() > max_samples {
        return Err(AnalysisError::invalid_input(format!(
            "{} holds {} samples, limit is {}", path.display(), samples.len(), max_samples
        )));
    }

    log::debug!("Read {} samples from {}", samples.len(), path.display());
    Ok(Array1::from(samples))
}
