//! Energy / zero-crossing analysis pipeline

pub mod frame;
pub mod features;
pub mod segment;
pub mod session;

pub use frame::{FrameLayout, FRAME_DURATION_MS};
pub use features::{FeatureExtractor, FeatureSeries, frame_energy, frame_nks};
pub use segment::{Segmentation, Segmenter};
pub use session::{AnalysisReport, AnalysisSession, MarkerReport, SegmentOverlay};
