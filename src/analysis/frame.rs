//! Frame layout: fixed 20 ms frames with 50% backward overlap

use std::ops::Range;

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Nominal duration of one analysis frame.
pub const FRAME_DURATION_MS: f64 = 20.0;

/// How a sample series is cut into frames.
///
/// Computed once per signal and shared by every feature pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameLayout {
    pub sample_count: usize,
    pub frame_count: usize,
    pub frame_len: usize,
    pub frame_overlap: usize,
}

impl FrameLayout {
    pub fn new(sample_count: usize, total_duration_ms: f64) -> Result<Self> {
        if sample_count == 0 {
            return Err(AnalysisError::invalid_input("Sample series is empty"));
        }
        if !total_duration_ms.is_finite() || total_duration_ms <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "Duration must be positive, got {} ms", total_duration_ms
            )));
        }
        if total_duration_ms < FRAME_DURATION_MS {
            return Err(AnalysisError::invalid_input(format!(
                "Duration {} ms is shorter than one {} ms frame",
                total_duration_ms, FRAME_DURATION_MS
            )));
        }

        let frame_count = (total_duration_ms / FRAME_DURATION_MS).floor() as usize;
        let frame_len = sample_count / frame_count;
        if frame_len == 0 {
            return Err(AnalysisError::invalid_input(format!(
                "{} samples cannot fill {} frames", sample_count, frame_count
            )));
        }
        let frame_overlap = frame_len / 2;

        log::debug!(
            "Frame layout: {} frames of {} samples ({} overlap) over {} samples",
            frame_count, frame_len, frame_overlap, sample_count
        );

        Ok(Self {
            sample_count,
            frame_count,
            frame_len,
            frame_overlap,
        })
    }

    /// First sample of frame `frame`. Every frame after the first is pulled
    /// back by `frame_len - frame_overlap` samples.
    pub fn frame_start(&self, frame: usize) -> usize {
        let offset = if frame == 0 { 0 } else { self.frame_len - self.frame_overlap };
        frame * self.frame_len - offset
    }

    /// Sample range of frame `frame`, cut short at the end of the series.
    pub fn frame_range(&self, frame: usize) -> Range<usize> {
        let start = self.frame_start(frame).min(self.sample_count);
        let end = (start + self.frame_len).min(self.sample_count);
        start..end
    }

    pub fn frames(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.frame_count).map(move |f| self.frame_range(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_arithmetic() {
        let layout = FrameLayout::new(1000, 100.0).unwrap();
        assert_eq!(layout.frame_count, 5);
        assert_eq!(layout.frame_len, 200);
        assert_eq!(layout.frame_overlap, 100);

        let layout = FrameLayout::new(1001, 59.9).unwrap();
        assert_eq!(layout.frame_count, 2);
        assert_eq!(layout.frame_len, 500);
        assert_eq!(layout.frame_overlap, 250);
    }

    #[test]
    fn test_frame_starts_overlap_backwards() {
        let layout = FrameLayout::new(40, 80.0).unwrap();
        assert_eq!(layout.frame_len, 10);

        assert_eq!(layout.frame_range(0), 0..10);
        assert_eq!(layout.frame_range(1), 5..15);
        assert_eq!(layout.frame_range(2), 15..25);
        assert_eq!(layout.frame_range(3), 25..35);
        assert_eq!(layout.frames().count(), 4);
    }

    #[test]
    fn test_odd_frame_len() {
        let layout = FrameLayout::new(21, 60.0).unwrap();
        assert_eq!(layout.frame_len, 7);
        assert_eq!(layout.frame_overlap, 3);
        // pulled back by 7 - 3 = 4
        assert_eq!(layout.frame_range(1), 3..10);
        assert_eq!(layout.frame_range(2), 10..17);
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(FrameLayout::new(0, 100.0).is_err());
        assert!(FrameLayout::new(100, 19.99).is_err());
        assert!(FrameLayout::new(100, 0.0).is_err());
        assert!(FrameLayout::new(100, f64::INFINITY).is_err());
        // 3 samples over 4 frames
        assert!(matches!(
            FrameLayout::new(3, 80.0),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }
}
