//! Configuration errors. These surface host wiring mistakes at load time;
//! the per-step path never returns them.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Per-axis array with the wrong number of entries
    #[error("{field} needs exactly 3 per-axis values, got {got}")]
    AxisCount { field: &'static str, got: usize },

    /// Value that must be strictly positive
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: String, value: f64 },

    /// NaN or infinite where a number is required
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: String, value: f64 },

    /// Clamp range with min above max
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange { field: String, min: f64, max: f64 },

    #[error("unknown airborne mode {0} (expected -4..=3)")]
    UnknownAirborneMode(i32),

    #[error("craft has no actuators")]
    NoActuators,

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
