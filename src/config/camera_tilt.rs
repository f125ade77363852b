//! Configuration for the camera roll shown while wall running.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the camera roll timeline.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTiltConfig {
    /// Whether a roll is applied at all.
    pub enabled: bool,

    /// Peak roll in degrees.
    pub max_roll: f32,

    /// Seconds to ramp from neutral to peak roll (and back).
    pub ramp_time: f32,
}

impl Default for CameraTiltConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_roll: 15.0,
            ramp_time: 0.25,
        }
    }
}
