//! Configuration management for signal analysis

use crate::analysis::Segmenter;
use crate::error::{AnalysisError, Result};
use crate::signal::{DEFAULT_MAX_SAMPLES, Signal};
use crate::units::TimeUnit;
use clap::Parser;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub verbose: bool,
    pub input: InputConfig,
    pub analysis: AnalysisConfig,
    pub marker: MarkerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub sample_rate: Option<u32>,
    pub duration_ms: Option<f64>,
    pub max_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub threshold: f64,
    pub segments_enabled: bool,
    pub series_unit: Option<TimeUnit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub time: Option<f64>,
    pub unit: TimeUnit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("samples.txt"),
            output_path: None,
            verbose: false,
            input: InputConfig::default(),
            analysis: AnalysisConfig::default(),
            marker: MarkerConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sample_rate: Some(44_100),
            duration_ms: None,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            segments_enabled: true,
            series_unit: None,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            time: None,
            unit: TimeUnit::Milliseconds,
        }
    }
}

impl Config {
    /// Get threshold (convenience method)
    pub fn threshold(&self) -> f64 {
        self.analysis.threshold
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Wraps loaded samples into a [`Signal`]. An explicit duration wins over
    /// one derived from the sample rate.
    pub fn build_signal(&self, samples: Array1<f64>) -> Result<Signal> {
        match (self.input.duration_ms, self.input.sample_rate) {
            (Some(duration_ms), _) => Signal::new(samples, duration_ms),
            (None, Some(rate)) => Signal::from_sample_rate(samples, rate),
            (None, None) => Err(AnalysisError::config("Either duration or sample rate is required")),
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "energyseg", about = "Energy / zero-crossing analysis and threshold segmentation", version, author)]
pub struct Args {
    #[arg(short = 'i', long = "input", help = "Sample file (whitespace separated values, '#' comments)")]
    pub input: Option<PathBuf>,

    #[arg(short = 'r', long = "sample-rate", help = "Sample rate (Hz), used to derive the duration")]
    pub sample_rate: Option<u32>,

    #[arg(short = 'd', long = "duration-ms", help = "Total signal duration in milliseconds")]
    pub duration_ms: Option<f64>,

    #[arg(short = 't', long = "threshold", help = "Energy threshold for segmentation")]
    pub threshold: Option<String>,

    #[arg(long = "no-segments", help = "Skip threshold segmentation")]
    pub no_segments: bool,

    #[arg(short = 'u', long = "unit", help = "X-axis unit: ms, s or min (default: picked from duration)")]
    pub unit: Option<TimeUnit>,

    #[arg(long = "marker", help = "Time marker value, in --marker-unit")]
    pub marker: Option<f64>,

    #[arg(long = "marker-unit", help = "Unit the marker value is given in")]
    pub marker_unit: Option<TimeUnit>,

    #[arg(long = "max-samples", help = "Refuse inputs with more samples than this")]
    pub max_samples: Option<usize>,

    #[arg(short = 'o', long = "output", help = "Write the full report to this TOML file")]
    pub output: Option<PathBuf>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "init-config", help = "Write a default config file to this path and exit")]
    pub init_config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(input) = args.input {
            config.input_path = input;
        }
        if let Some(output) = args.output {
            config.output_path = Some(output);
        }
        if let Some(rate) = args.sample_rate {
            config.input.sample_rate = Some(rate);
        }
        if let Some(duration_ms) = args.duration_ms {
            config.input.duration_ms = Some(duration_ms);
        }
        if let Some(max_samples) = args.max_samples {
            config.input.max_samples = max_samples;
        }
        if let Some(text) = &args.threshold {
            config.analysis.threshold = Segmenter::from_text(text)?.threshold();
        }
        if args.no_segments {
            config.analysis.segments_enabled = false;
        }
        if args.unit.is_some() {
            config.analysis.series_unit = args.unit;
        }
        if args.marker.is_some() {
            config.marker.time = args.marker;
        }
        if let Some(unit) = args.marker_unit {
            config.marker.unit = unit;
        }
        config.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AnalysisError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        if let Some(rate) = self.input.sample_rate {
            if rate == 0 {
                return Err(AnalysisError::config("Sample rate must be greater than 0"));
            }
            if rate > 192_000 {
                return Err(AnalysisError::config("Sample rate cannot exceed 192000 Hz"));
            }
        }

        if let Some(duration_ms) = self.input.duration_ms {
            if !duration_ms.is_finite() || duration_ms <= 0.0 {
                return Err(AnalysisError::config("Duration must be a positive number of milliseconds"));
            }
        }

        if self.input.sample_rate.is_none() && self.input.duration_ms.is_none() {
            return Err(AnalysisError::config("Either duration or sample rate is required"));
        }

        if self.input.max_samples == 0 {
            return Err(AnalysisError::config("Sample limit must be greater than 0"));
        }

        if !self.analysis.threshold.is_finite() {
            return Err(AnalysisError::malformed_threshold("Threshold must be finite"));
        }

        if let Some(time) = self.marker.time {
            if !time.is_finite() {
                return Err(AnalysisError::config("Marker time must be finite"));
            }
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AnalysisError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AnalysisError::config(format!("Failed to write config file: {}", e)))
    }

    /// Create default config file
    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["energyseg"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.sample_rate, Some(44_100));
        assert_eq!(config.input.max_samples, DEFAULT_MAX_SAMPLES);
        assert_eq!(config.threshold(), 0.0);
        assert!(config.analysis.segments_enabled);
        assert_eq!(config.marker.unit, TimeUnit::Milliseconds);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.input.sample_rate = Some(0);
        assert!(config.validate().is_err());
        config.input.sample_rate = Some(200_000);
        assert!(config.validate().is_err());
        config.input.sample_rate = None;
        assert!(config.validate().is_err());

        config.input.duration_ms = Some(-1.0);
        assert!(config.validate().is_err());
        config.input.duration_ms = Some(250.0);
        assert!(config.validate().is_ok());

        config.analysis.threshold = f64::INFINITY;
        assert!(matches!(config.validate(), Err(AnalysisError::MalformedThreshold { .. })));
        config.analysis.threshold = 0.5;

        config.input.max_samples = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.analysis.threshold = 0.25;
        config.analysis.series_unit = Some(TimeUnit::Seconds);
        config.marker.time = Some(1.5);

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded.threshold(), 0.25);
        assert_eq!(loaded.analysis.series_unit, Some(TimeUnit::Seconds));
        assert_eq!(loaded.marker.time, Some(1.5));
        assert_eq!(loaded.input.sample_rate, config.input.sample_rate);
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "[analysis]\nthreshold = 3.5\n\n[marker]\nunit = \"seconds\"\n").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.threshold(), 3.5);
        assert_eq!(config.marker.unit, TimeUnit::Seconds);
        assert_eq!(config.input.sample_rate, Some(44_100));

        std::fs::write(&config_path, "[analysis]\nthreshold = \"high\"\n").unwrap();
        assert!(matches!(Config::from_file(&config_path), Err(AnalysisError::Config { .. })));
    }

    #[test]
    fn test_args_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Config::create_default_config(&config_path).unwrap();

        let config = Config::from_args_and_config(args(&[
            "-c", config_path.to_str().unwrap(),
            "-i", "voice.txt",
            "-d", "1500",
            "-t", "0,75",
            "-u", "ms",
            "--marker", "2",
            "--marker-unit", "s",
            "--no-segments",
        ]))
        .unwrap();

        assert_eq!(config.input_path, PathBuf::from("voice.txt"));
        assert_eq!(config.input.duration_ms, Some(1500.0));
        assert_eq!(config.threshold(), 0.75);
        assert_eq!(config.analysis.series_unit, Some(TimeUnit::Milliseconds));
        assert_eq!(config.marker.time, Some(2.0));
        assert_eq!(config.marker.unit, TimeUnit::Seconds);
        assert!(!config.analysis.segments_enabled);
    }

    #[test]
    fn test_malformed_threshold_argument() {
        assert!(matches!(
            Config::from_args_and_config(args(&["-t", "loud"])),
            Err(AnalysisError::MalformedThreshold { .. })
        ));
    }

    #[test]
    fn test_build_signal() {
        let mut config = Config::default();
        config.input.sample_rate = Some(1000);

        let signal = config.build_signal(Array1::zeros(500)).unwrap();
        assert!((signal.duration_ms() - 500.0).abs() < 1e-9);

        config.input.duration_ms = Some(40.0);
        let signal = config.build_signal(Array1::zeros(500)).unwrap();
        assert_eq!(signal.duration_ms(), 40.0);
    }
}
