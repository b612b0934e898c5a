//! Time units used for series x-values and marker input

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

const MS_PER_SECOND: f64 = 1000.0;
const SECONDS_PER_MINUTE: f64 = 60.0;
const MS_PER_MINUTE: f64 = MS_PER_SECOND * SECONDS_PER_MINUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 3] = [TimeUnit::Milliseconds, TimeUnit::Seconds, TimeUnit::Minutes];

    pub fn name(&self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
        }
    }

    /// Picks the display unit for a signal of the given length: under a second
    /// is shown in milliseconds, under a minute in seconds, anything longer in
    /// minutes.
    pub fn for_duration_ms(duration_ms: f64) -> Self {
        if duration_ms < MS_PER_SECOND {
            TimeUnit::Milliseconds
        } else if duration_ms < MS_PER_MINUTE {
            TimeUnit::Seconds
        } else {
            TimeUnit::Minutes
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "millisecond" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "sec" | "second" | "seconds" => Ok(TimeUnit::Seconds),
            "min" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
            _ => Err(AnalysisError::unknown_time_unit(s)),
        }
    }
}

/// Converts `time` from one unit to another.
///
/// Every directed pair is listed explicitly; identical units pass the value
/// through untouched.
pub fn convert(time: f64, from: TimeUnit, to: TimeUnit) -> f64 {
    use TimeUnit::*;

    match (from, to) {
        (Milliseconds, Seconds) => time / MS_PER_SECOND,
        (Milliseconds, Minutes) => time / MS_PER_MINUTE,
        (Seconds, Milliseconds) => time * MS_PER_SECOND,
        (Seconds, Minutes) => time / SECONDS_PER_MINUTE,
        (Minutes, Milliseconds) => time * MS_PER_MINUTE,
        (Minutes, Seconds) => time * SECONDS_PER_MINUTE,
        (Milliseconds, Milliseconds) | (Seconds, Seconds) | (Minutes, Minutes) => time,
    }
}
