//! Analysis state for one loaded signal
//!
//! The series unit is fixed when the signal is loaded and every x-value is
//! already expressed in it. The marker unit is whatever unit the user types
//! marker times in and can be switched at any time. The two are kept apart:
//! a marker is always converted from the marker unit into the series unit
//! before it is placed.

use serde::Serialize;

use super::features::{FeatureExtractor, FeatureSeries};
use super::frame::FrameLayout;
use super::segment::{Segmentation, Segmenter};
use crate::error::{AnalysisError, Result};
use crate::signal::Signal;
use crate::units::{self, TimeUnit};

/// Segment boundaries computed for one threshold, with a visibility flag that
/// can be flipped without rescanning the series.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOverlay {
    pub segmentation: Segmentation,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerReport {
    pub value: f64,
    pub unit: TimeUnit,
    pub position: f64,
}

/// Everything a renderer needs, detached from the session.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub sample_count: usize,
    pub duration_ms: f64,
    pub series_unit: TimeUnit,
    pub layout: FrameLayout,
    pub energy: FeatureSeries,
    pub nks: FeatureSeries,
    pub segmentation: Option<Segmentation>,
    pub marker: Option<MarkerReport>,
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    signal: Signal,
    layout: FrameLayout,
    series_unit: TimeUnit,
    energy: FeatureSeries,
    nks: FeatureSeries,
    threshold: f64,
    segments_enabled: bool,
    overlay: Option<SegmentOverlay>,
    marker_unit: TimeUnit,
    marker: Option<f64>,
}

impl AnalysisSession {
    /// Frames the signal and computes both feature series. Without an explicit
    /// series unit one is picked from the signal's duration.
    pub fn load(signal: Signal, series_unit: Option<TimeUnit>) -> Result<Self> {
        let series_unit = series_unit.unwrap_or_else(|| signal.natural_unit());
        let layout = FrameLayout::new(signal.len(), signal.duration_ms())?;

        let extractor = FeatureExtractor::new(layout);
        let energy = extractor.energy(signal.samples(), signal.duration_ms(), series_unit)?;
        let nks = extractor.nks(signal.samples(), signal.duration_ms(), series_unit)?;

        log::info!(
            "Analyzed {} samples ({:.3} {}): {} frames",
            signal.len(),
            signal.duration_in(series_unit),
            series_unit.abbreviation(),
            layout.frame_count
        );

        Ok(Self {
            signal,
            layout,
            series_unit,
            energy,
            nks,
            threshold: 0.0,
            segments_enabled: false,
            overlay: None,
            marker_unit: TimeUnit::Milliseconds,
            marker: None,
        })
    }

    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn series_unit(&self) -> TimeUnit {
        self.series_unit
    }

    pub fn energy(&self) -> &FeatureSeries {
        &self.energy
    }

    pub fn nks(&self) -> &FeatureSeries {
        &self.nks
    }

    pub fn waveform_xs(&self) -> Vec<f64> {
        self.signal.timeline(self.series_unit)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn segments_enabled(&self) -> bool {
        self.segments_enabled
    }

    /// Stores a new threshold and, when segmentation is switched on, replaces
    /// the boundaries. While switched off, boundaries computed for a different
    /// threshold are dropped. A rejected threshold leaves everything as it was.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        let segmenter = Segmenter::new(threshold)?;
        if self.segments_enabled {
            let segmentation = self.scan(&segmenter)?;
            self.overlay = Some(SegmentOverlay { segmentation, visible: true });
        } else if threshold != self.threshold {
            self.overlay = None;
        }
        self.threshold = threshold;
        Ok(())
    }

    pub fn set_threshold_text(&mut self, text: &str) -> Result<()> {
        let threshold = Segmenter::from_text(text)?.threshold();
        self.set_threshold(threshold)
    }

    /// Rescans the energy series with the current threshold.
    pub fn regenerate_segments(&mut self) -> Result<&Segmentation> {
        let segmentation = self.scan(&Segmenter::new(self.threshold)?)?;
        let overlay = self.overlay.insert(SegmentOverlay { segmentation, visible: true });
        Ok(&overlay.segmentation)
    }

    /// A single-frame series has no interior pair to examine and yields no
    /// boundaries.
    fn scan(&self, segmenter: &Segmenter) -> Result<Segmentation> {
        if self.energy.len() < 2 {
            return Ok(Segmentation {
                threshold: segmenter.threshold(),
                boundaries: Vec::new(),
            });
        }
        segmenter.segment(&self.energy.xs, &self.energy.ys)
    }

    /// Shows or hides the last computed boundaries. Never rescans; after a
    /// threshold change while switched off there is nothing left to show.
    pub fn set_segments_visible(&mut self, visible: bool) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.visible = visible;
        }
    }

    /// Switching on regenerates the boundaries, switching off only hides them.
    pub fn set_segments_enabled(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.regenerate_segments()?;
        } else {
            self.set_segments_visible(false);
        }
        self.segments_enabled = enabled;
        Ok(())
    }

    pub fn overlay(&self) -> Option<&SegmentOverlay> {
        self.overlay.as_ref()
    }

    pub fn visible_segments(&self) -> Option<&Segmentation> {
        self.overlay
            .as_ref()
            .filter(|overlay| overlay.visible)
            .map(|overlay| &overlay.segmentation)
    }

    pub fn marker_unit(&self) -> TimeUnit {
        self.marker_unit
    }

    /// Marker value as entered, in the marker unit.
    pub fn marker(&self) -> Option<f64> {
        self.marker
    }

    pub fn set_marker(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(AnalysisError::invalid_input(format!(
                "Marker time must be finite, got {}", value
            )));
        }
        self.marker = Some(value);
        Ok(())
    }

    pub fn clear_marker(&mut self) {
        self.marker = None;
    }

    /// Changes the unit marker times are entered in, rewriting the current
    /// marker value so it still points at the same instant.
    pub fn set_marker_unit(&mut self, unit: TimeUnit) {
        if let Some(value) = self.marker.as_mut() {
            *value = units::convert(*value, self.marker_unit, unit);
        }
        self.marker_unit = unit;
    }

    /// Marker position on the series' x-axis.
    pub fn marker_position(&self) -> Option<f64> {
        self.marker
            .map(|value| units::convert(value, self.marker_unit, self.series_unit))
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            sample_count: self.signal.len(),
            duration_ms: self.signal.duration_ms(),
            series_unit: self.series_unit,
            layout: self.layout,
            energy: self.energy.clone(),
            nks: self.nks.clone(),
            segmentation: self.visible_segments().cloned(),
            marker: self.marker.zip(self.marker_position()).map(|(value, position)| MarkerReport {
                value,
                unit: self.marker_unit,
                position,
            }),
        }
    }
}
