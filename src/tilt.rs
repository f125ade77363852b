//! Camera roll feedback while wall running.
//!
//! The state machine only ever asks a [`TiltPresenter`] to begin or end a
//! tilt. [`CameraTilt`] is the stock presenter: an eased timeline that is
//! played forward on begin and backward on end, whose value becomes the
//! roll of any [`WallRunCamera`] attached to the character.

use bevy::math::curve::{Curve, EaseFunction, EasingCurve};
use bevy::prelude::*;

use crate::config::CameraTiltConfig;
use crate::surface::WallRunSide;

/// Receiver of tilt requests from the state machine.
pub trait TiltPresenter {
    /// Start ramping the roll toward the wall on `side`.
    fn begin_tilt(&mut self, side: WallRunSide);

    /// Ramp the roll back to neutral.
    fn end_tilt(&mut self);
}

impl TiltPresenter for () {
    fn begin_tilt(&mut self, _side: WallRunSide) {}
    fn end_tilt(&mut self) {}
}

impl<P: TiltPresenter> TiltPresenter for Option<P> {
    fn begin_tilt(&mut self, side: WallRunSide) {
        if let Some(presenter) = self {
            presenter.begin_tilt(side);
        }
    }

    fn end_tilt(&mut self) {
        if let Some(presenter) = self {
            presenter.end_tilt();
        }
    }
}

/// Roll for a tilt scalar on the given side. Left walls roll positive.
pub fn roll_for_side(side: WallRunSide, value: f32) -> f32 {
    match side {
        WallRunSide::Left => value,
        WallRunSide::Right | WallRunSide::None => -value,
    }
}

#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Playback {
    #[default]
    Stopped,
    Forward,
    Reverse,
}

/// Eased camera-roll timeline owned by a wall-running character.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct CameraTilt {
    config: CameraTiltConfig,
    /// Side of the most recent run. Kept after the run ends so the roll
    /// eases back out on the same side.
    side: WallRunSide,
    /// Normalised timeline position in `[0, 1]`.
    progress: f32,
    playback: Playback,
}

impl Default for CameraTilt {
    fn default() -> Self {
        Self::new(CameraTiltConfig::default())
    }
}

impl CameraTilt {
    pub fn new(config: CameraTiltConfig) -> Self {
        Self {
            config,
            side: WallRunSide::None,
            progress: 0.0,
            playback: Playback::Stopped,
        }
    }

    /// Replace the tuning without resetting the timeline.
    pub fn set_config(&mut self, config: CameraTiltConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &CameraTiltConfig {
        &self.config
    }

    pub fn side(&self) -> WallRunSide {
        self.side
    }

    /// Whether the timeline is moving.
    pub fn is_playing(&self) -> bool {
        self.playback != Playback::Stopped
    }

    /// Whether any roll is currently shown.
    pub fn is_tilted(&self) -> bool {
        self.progress > 0.0
    }

    /// Current tilt scalar in degrees, before the side sign is applied.
    pub fn value(&self) -> f32 {
        if !self.config.enabled {
            return 0.0;
        }
        EasingCurve::new(0.0, self.config.max_roll, EaseFunction::SineInOut)
            .sample_clamped(self.progress)
    }

    /// Current signed roll in degrees.
    pub fn roll(&self) -> f32 {
        roll_for_side(self.side, self.value())
    }

    /// Step the timeline and return the new tilt scalar.
    pub fn advance(&mut self, delta_secs: f32) -> f32 {
        let step = if self.config.ramp_time > 0.0 {
            delta_secs / self.config.ramp_time
        } else {
            1.0
        };

        match self.playback {
            Playback::Stopped => {}
            Playback::Forward => {
                self.progress = (self.progress + step).min(1.0);
                if self.progress >= 1.0 {
                    self.playback = Playback::Stopped;
                }
            }
            Playback::Reverse => {
                self.progress = (self.progress - step).max(0.0);
                if self.progress <= 0.0 {
                    self.playback = Playback::Stopped;
                }
            }
        }

        self.value()
    }
}

impl TiltPresenter for CameraTilt {
    fn begin_tilt(&mut self, side: WallRunSide) {
        self.side = side;
        self.playback = Playback::Forward;
    }

    fn end_tilt(&mut self) {
        self.playback = Playback::Reverse;
    }
}

/// Marks a camera whose roll follows the [`CameraTilt`] of the character.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct WallRunCamera(pub Entity);

/// Replace the roll of `rotation` while keeping its yaw and pitch.
pub fn with_roll(rotation: Quat, roll_degrees: f32) -> Quat {
    let (yaw, pitch, _) = rotation.to_euler(EulerRot::YXZ);
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll_degrees.to_radians())
}
