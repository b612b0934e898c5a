//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Malformed threshold: {message}")]
    MalformedThreshold { message: String },

    #[error("Unknown time unit: {name}")]
    UnknownTimeUnit { name: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self { Self::InvalidInput { message: msg.into() } }
    pub fn malformed_threshold<S: Into<String>>(msg: S) -> Self { Self::MalformedThreshold { message: msg.into() } }
    pub fn unknown_time_unit<S: Into<String>>(name: S) -> Self { Self::UnknownTimeUnit { name: name.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
