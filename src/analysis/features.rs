//! Per-frame short-term energy and zero-crossing rate (NKS)

use ndarray::{ArrayView1, s};
use serde::{Deserialize, Serialize};

use super::frame::FrameLayout;
use crate::error::{AnalysisError, Result};
use crate::signal::linear_timeline;
use crate::units::{self, TimeUnit};

/// Parallel x/y series, x-values expressed in `unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSeries {
    pub unit: TimeUnit,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl FeatureSeries {
    pub fn len(&self) -> usize {
        self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }

    /// Smallest and largest y-value, `None` for an empty series.
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut iter = self.ys.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

/// Mean squared amplitude. Divides by the nominal `frame_len` even when the
/// frame was truncated at the end of the series.
pub fn frame_energy(frame: &ArrayView1<f64>, frame_len: usize) -> f64 {
    frame.iter().map(|&x| x * x).sum::<f64>() / frame_len as f64
}

/// Sign-class transitions between neighbouring samples over `2 * frame_len`.
/// Zero counts as positive, so the result stays within `[0, 0.5]`.
pub fn frame_nks(frame: &ArrayView1<f64>, frame_len: usize) -> f64 {
    let transitions = frame
        .iter()
        .zip(frame.iter().skip(1))
        .filter(|&(&prev, &cur)| (prev >= 0.0) != (cur >= 0.0))
        .count();

    transitions as f64 / (2 * frame_len) as f64
}

/// Computes both features over a precomputed frame layout.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    layout: FrameLayout,
}

impl FeatureExtractor {
    pub fn new(layout: FrameLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn energy(
        &self,
        samples: ArrayView1<f64>,
        total_duration_ms: f64,
        unit: TimeUnit,
    ) -> Result<FeatureSeries> {
        self.extract(samples, total_duration_ms, unit, frame_energy)
    }

    pub fn nks(
        &self,
        samples: ArrayView1<f64>,
        total_duration_ms: f64,
        unit: TimeUnit,
    ) -> Result<FeatureSeries> {
        self.extract(samples, total_duration_ms, unit, frame_nks)
    }

    fn extract<F>(
        &self,
        samples: ArrayView1<f64>,
        total_duration_ms: f64,
        unit: TimeUnit,
        feature: F,
    ) -> Result<FeatureSeries>
    where
        F: Fn(&ArrayView1<f64>, usize) -> f64,
    {
        if samples.len() != self.layout.sample_count {
            return Err(AnalysisError::invalid_input(format!(
                "Frame layout was built for {} samples, got {}",
                self.layout.sample_count,
                samples.len()
            )));
        }

        let ys: Vec<f64> = self
            .layout
            .frames()
            .map(|range| {
                let frame = samples.slice(s![range.start..range.end]);
                feature(&frame, self.layout.frame_len)
            })
            .collect();

        // X positions are spread over the whole duration, not placed at the
        // (overlapping) frame starts.
        let total = units::convert(total_duration_ms, TimeUnit::Milliseconds, unit);
        let xs = linear_timeline(ys.len(), total);

        Ok(FeatureSeries { unit, xs, ys })
    }
}
