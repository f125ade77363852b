//! Wall-run configuration.
//!
//! Configs are plain `Reflect` + `serde` types so they can be edited in an
//! inspector or loaded from RON. Loading always validates.

mod camera_tilt;
mod wall_running;

use std::fs;
use std::path::Path;
use std::time::Duration;

use bevy::prelude::*;
use ron::Options;
use thiserror::Error;

pub use camera_tilt::CameraTiltConfig;
pub use wall_running::WallRunConfig;

/// Error returned when a wall-run config cannot be loaded or is invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Ron(#[from] ron::error::SpannedError),

    #[error("max_wall_run_time must be positive, got {0}")]
    NonPositiveRunTime(f32),

    #[error("max_wall_run_time must be a finite duration, got {0}")]
    UnboundedRunTime(f32),

    #[error("walkable_floor_y must lie in [0, 1], got {0}")]
    WalkableThresholdOutOfRange(f32),

    #[error("line_trace_length must be positive, got {0}")]
    NonPositiveTraceLength(f32),

    #[error("axis_epsilon must be non-negative, got {0}")]
    NegativeEpsilon(f32),

    #[error("tilt ramp_time must be non-negative, got {0}")]
    NegativeRampTime(f32),
}

impl WallRunConfig {
    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_wall_run_time > 0.0) {
            return Err(ConfigError::NonPositiveRunTime(self.max_wall_run_time));
        }
        if Duration::try_from_secs_f32(self.max_wall_run_time).is_err() {
            return Err(ConfigError::UnboundedRunTime(self.max_wall_run_time));
        }
        if !(0.0..=1.0).contains(&self.walkable_floor_y) {
            return Err(ConfigError::WalkableThresholdOutOfRange(
                self.walkable_floor_y,
            ));
        }
        if !(self.line_trace_length > 0.0) {
            return Err(ConfigError::NonPositiveTraceLength(self.line_trace_length));
        }
        if !(self.axis_epsilon >= 0.0) {
            return Err(ConfigError::NegativeEpsilon(self.axis_epsilon));
        }
        if !(self.tilt.ramp_time >= 0.0) {
            return Err(ConfigError::NegativeRampTime(self.tilt.ramp_time));
        }
        Ok(())
    }

    /// Parse and validate a config from RON text. Missing fields take their
    /// default values.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = Options::default().from_str(text)?;
        config.validate().inspect_err(|err| {
            warn!("Rejected wall-run config: {err}");
        })?;
        Ok(config)
    }

    /// Read, parse and validate a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&text)
    }
}
