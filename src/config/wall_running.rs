//! Configuration for wall-run entry, duration and surface probing.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::CameraTiltConfig;

/// Per-character wall-run tuning.
///
/// Attach next to a [`WallRunner`](crate::state::WallRunner). Characters
/// without this component fall back to [`WallRunConfig::default`].
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct WallRunConfig {
    /// Seconds after entry at which a run is force-ended.
    pub max_wall_run_time: f32,

    /// Largest upward normal component a surface may have and still count
    /// as a wall. Anything flatter is walkable floor.
    pub walkable_floor_y: f32,

    /// Length of the per-tick probe cast toward the wall.
    pub line_trace_length: f32,

    /// Dead zone for input axes and the side test.
    pub axis_epsilon: f32,

    /// Camera roll applied while running.
    pub tilt: CameraTiltConfig,
}

impl Default for WallRunConfig {
    fn default() -> Self {
        Self {
            max_wall_run_time: 2.0,
            walkable_floor_y: 0.71,
            line_trace_length: 200.0,
            axis_epsilon: 0.001,
            tilt: CameraTiltConfig::default(),
        }
    }
}

impl WallRunConfig {
    /// Builder-style override of the run duration.
    pub fn with_max_wall_run_time(mut self, seconds: f32) -> Self {
        self.max_wall_run_time = seconds;
        self
    }

    /// Builder-style override of the probe length.
    pub fn with_line_trace_length(mut self, length: f32) -> Self {
        self.line_trace_length = length;
        self
    }

    /// Builder-style override of the walkable floor threshold.
    pub fn with_walkable_floor_y(mut self, threshold: f32) -> Self {
        self.walkable_floor_y = threshold;
        self
    }

    /// Set the walkable threshold from a maximum walkable slope angle (radians).
    pub fn with_walkable_slope(mut self, angle: f32) -> Self {
        self.walkable_floor_y = angle.cos();
        self
    }
}
