//! Threshold segmentation of the energy series

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Threshold line plus the times where the series crosses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    pub threshold: f64,
    pub boundaries: Vec<f64>,
}

impl Segmentation {
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Spans between consecutive boundaries.
    pub fn segments(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.boundaries.windows(2).map(|w| (w[0], w[1]))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    threshold: f64,
}

impl Segmenter {
    pub fn new(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(AnalysisError::malformed_threshold(format!(
                "Threshold must be finite, got {}", threshold
            )));
        }
        Ok(Self { threshold })
    }

    /// Parses user-entered threshold text; `,` is accepted as decimal separator.
    pub fn from_text(text: &str) -> Result<Self> {
        let normalized = text.trim().replace(',', ".");
        let threshold = normalized.parse::<f64>().map_err(|e| {
            AnalysisError::malformed_threshold(format!("'{}': {}", text, e))
        })?;
        Self::new(threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scans `ys` for threshold crossings and reports the midpoint of each
    /// bracketing pair of x-values.
    ///
    /// Rising and falling crossings count the same. The final pair of samples is
    /// never examined.
    pub fn segment(&self, xs: &[f64], ys: &[f64]) -> Result<Segmentation> {
        if xs.len() != ys.len() {
            return Err(AnalysisError::invalid_input(format!(
                "Series lengths differ: {} x-values, {} y-values", xs.len(), ys.len()
            )));
        }
        if ys.len() < 2 {
            return Err(AnalysisError::invalid_input(format!(
                "Segmentation needs at least 2 points, got {}", ys.len()
            )));
        }

        let above = |y: f64| y >= self.threshold;
        let boundaries: Vec<f64> = (1..ys.len() - 1)
            .filter(|&i| above(ys[i]) != above(ys[i - 1]))
            .map(|i| (xs[i] + xs[i - 1]) / 2.0)
            .collect();

        log::debug!("Threshold {} crossed {} times", self.threshold, boundaries.len());

        Ok(Segmentation { threshold: self.threshold, boundaries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn xs(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * 10.0).collect()
    }

    #[test]
    fn test_single_crossing_midpoint() {
        let ys = vec![0.0, 0.0, 1.0, 1.0];
        let seg = Segmenter::new(0.5).unwrap().segment(&xs(4), &ys).unwrap();
        assert_eq!(seg.threshold, 0.5);
        assert_eq!(seg.boundaries, vec![15.0]);
    }

    #[test]
    fn test_rising_and_falling_both_count() {
        let ys = vec![0.0, 2.0, 2.0, 0.0, 0.0];
        let seg = Segmenter::new(1.0).unwrap().segment(&xs(5), &ys).unwrap();
        assert_eq!(seg.boundaries, vec![5.0, 25.0]);
        assert_eq!(seg.segments().collect::<Vec<_>>(), vec![(5.0, 25.0)]);
    }

    #[test]
    fn test_threshold_equal_counts_as_above() {
        let ys = vec![0.5, 0.5, 0.4, 0.4];
        let seg = Segmenter::new(0.5).unwrap().segment(&xs(4), &ys).unwrap();
        assert_eq!(seg.boundaries, vec![15.0]);
    }

    #[test]
    fn test_last_pair_is_not_examined() {
        let ys = vec![0.0, 0.0, 0.0, 1.0];
        let seg = Segmenter::new(0.5).unwrap().segment(&xs(4), &ys).unwrap();
        assert!(seg.boundaries.is_empty());
    }

    #[test]
    fn test_threshold_outside_range() {
        let ys = vec![0.1, 0.9, 0.2, 0.8, 0.3];
        let above = Segmenter::new(1.0).unwrap().segment(&xs(5), &ys).unwrap();
        let below = Segmenter::new(0.0).unwrap().segment(&xs(5), &ys).unwrap();
        assert!(above.boundaries.is_empty());
        assert!(below.boundaries.is_empty());
    }

    #[test]
    fn test_monotonic_single_boundary() {
        let ys: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let seg = Segmenter::new(4.5).unwrap().segment(&xs(10), &ys).unwrap();
        assert_eq!(seg.boundary_count(), 1);
        assert!(seg.boundaries[0] > 40.0 && seg.boundaries[0] < 50.0);
    }

    #[test]
    fn test_boundary_count_matches_sign_changes() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let n = rng.gen_range(2..200);
            let ys: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
            let threshold = rng.gen_range(0.0..1.0);

            let expected = (1..n - 1)
                .filter(|&i| (ys[i] >= threshold) != (ys[i - 1] >= threshold))
                .count();

            let segmenter = Segmenter::new(threshold).unwrap();
            let first = segmenter.segment(&xs(n), &ys).unwrap();
            let second = segmenter.segment(&xs(n), &ys).unwrap();

            assert_eq!(first.boundary_count(), expected);
            assert_eq!(first, second);
            assert!(first.boundaries.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(Segmenter::new(f64::NAN), Err(AnalysisError::MalformedThreshold { .. })));
        assert!(matches!(
            Segmenter::new(f64::INFINITY),
            Err(AnalysisError::MalformedThreshold { .. })
        ));

        let segmenter = Segmenter::new(0.5).unwrap();
        assert!(matches!(
            segmenter.segment(&[0.0], &[1.0]),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(matches!(
            segmenter.segment(&[0.0, 1.0], &[1.0]),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_threshold_text() {
        assert_eq!(Segmenter::from_text("0,25").unwrap().threshold(), 0.25);
        assert_eq!(Segmenter::from_text(" 1.5 ").unwrap().threshold(), 1.5);
        assert!(matches!(
            Segmenter::from_text("abc"),
            Err(AnalysisError::MalformedThreshold { .. })
        ));
        assert!(matches!(
            Segmenter::from_text("NaN"),
            Err(AnalysisError::MalformedThreshold { .. })
        ));
        assert!(matches!(Segmenter::from_text(""), Err(AnalysisError::MalformedThreshold { .. })));
    }
}
