//! energyseg - Short-term energy, zero-crossing rate and threshold segmentation
//!
//! Cuts a mono sample series into 20 ms half-overlapping frames, computes
//! per-frame energy and NKS (zero-crossing rate), and finds where the energy
//! crosses a threshold.

pub mod analysis;
pub mod config;
pub mod error;
pub mod signal;
pub mod units;

pub use analysis::{AnalysisReport, AnalysisSession, FeatureSeries, FrameLayout, Segmentation};
pub use config::{Args, Config};
pub use error::{AnalysisError, Result};
pub use signal::Signal;
pub use units::TimeUnit;

use ndarray::ArrayView1;

use analysis::{FeatureExtractor, Segmenter};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Per-frame short-term energy, x-values in `unit`.
pub fn compute_energy(
    samples: ArrayView1<f64>,
    total_duration_ms: f64,
    unit: TimeUnit,
) -> Result<FeatureSeries> {
    let layout = FrameLayout::new(samples.len(), total_duration_ms)?;
    FeatureExtractor::new(layout).energy(samples, total_duration_ms, unit)
}

/// Per-frame zero-crossing rate, x-values in `unit`.
pub fn compute_nks(
    samples: ArrayView1<f64>,
    total_duration_ms: f64,
    unit: TimeUnit,
) -> Result<FeatureSeries> {
    let layout = FrameLayout::new(samples.len(), total_duration_ms)?;
    FeatureExtractor::new(layout).nks(samples, total_duration_ms, unit)
}

pub fn compute_segments(
    energy_xs: &[f64],
    energy_ys: &[f64],
    threshold: f64,
) -> Result<Segmentation> {
    Segmenter::new(threshold)?.segment(energy_xs, energy_ys)
}

pub fn convert_time_unit(value: f64, from: TimeUnit, to: TimeUnit) -> f64 {
    units::convert(value, from, to)
}

pub fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
