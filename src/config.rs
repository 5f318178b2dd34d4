//! Configuration
//!
//! Construction-time constants for the odometer: drum count, auto-run
//! interval and animation duration. Loadable from JSON for the CLI.

use crate::{OdometerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default number of drums (six decimal places)
pub const DEFAULT_DRUM_COUNT: usize = 6;

/// Largest supported drum count; `10^18 - 1` still fits in an `i64`
pub const MAX_DRUM_COUNT: usize = 18;

/// Default auto-run tick interval in milliseconds
pub const DEFAULT_AUTO_INTERVAL_MS: u64 = 200;

/// Default drum spin animation duration in milliseconds
pub const DEFAULT_ANIMATION_MS: u64 = 600;

/// Odometer configuration.
///
/// Faces per drum is fixed at 10 (decimal digits) and is not
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Number of drums (decimal places), `1..=18`
    pub drum_count: usize,
    /// Auto-run tick interval in milliseconds, must be non-zero
    pub auto_interval_ms: u64,
    /// Drum spin animation duration in milliseconds
    pub animation_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        CounterConfig {
            drum_count: DEFAULT_DRUM_COUNT,
            auto_interval_ms: DEFAULT_AUTO_INTERVAL_MS,
            animation_ms: DEFAULT_ANIMATION_MS,
        }
    }
}

impl CounterConfig {
    /// Auto-run tick interval as a [`Duration`]
    pub fn auto_interval(&self) -> Duration {
        Duration::from_millis(self.auto_interval_ms)
    }

    /// Animation duration as a [`Duration`]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Check the configuration bounds.
    ///
    /// `drum_count` must be at least 1 and no more than
    /// [`MAX_DRUM_COUNT`]; the auto-run interval must be non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.drum_count < 1 || self.drum_count > MAX_DRUM_COUNT {
            return Err(OdometerError::ConfigError(format!(
                "drum_count must be in 1..={}, got {}",
                MAX_DRUM_COUNT, self.drum_count
            )));
        }
        if self.auto_interval_ms == 0 {
            return Err(OdometerError::ConfigError(
                "auto_interval_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CounterConfig = serde_json::from_str(json)
            .map_err(|e| OdometerError::ConfigError(format!("malformed config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
