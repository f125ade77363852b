//! The movement system as seen from the wall run.
//!
//! The wall run never integrates motion itself. It reads a handful of facts
//! from the surrounding movement system and writes back velocity and a plane
//! constraint through [`MovementContext`].

use bevy::prelude::*;

use crate::detection::TraceHit;

/// Access to the host movement system for one character.
pub trait MovementContext {
    /// Current forward and strafe axis values, each in `[-1, 1]`.
    fn input_axes(&self) -> (f32, f32);

    /// Whether the character is falling (not standing on walkable ground).
    fn is_airborne(&self) -> bool;

    /// World position the wall probe starts from.
    fn position(&self) -> Vec3;

    /// The character's right vector.
    fn right(&self) -> Vec3;

    /// Cast a line from `origin` to `end`, ignoring the character itself.
    fn line_trace(&mut self, origin: Vec3, end: Vec3) -> Option<TraceHit>;

    fn velocity(&self) -> Vec3;

    fn set_velocity(&mut self, velocity: Vec3);

    /// Restrict motion to the plane with the given normal. Zero removes
    /// the restriction.
    fn set_plane_constraint(&mut self, normal: Vec3);

    fn clear_plane_constraint(&mut self) {
        self.set_plane_constraint(Vec3::ZERO);
    }

    fn max_horizontal_speed(&self) -> f32;

    fn jump_impulse(&self) -> f32;

    /// Launch the character. Horizontal components add to the current
    /// velocity, the vertical component replaces it.
    fn launch(&mut self, launch: Vec3) {
        let current = self.velocity();
        self.set_velocity(Vec3::new(current.x + launch.x, launch.y, current.z + launch.z));
    }
}

/// Movement facts the host keeps up to date for a wall-running character.
///
/// The host's locomotion code owns `airborne`, `max_speed` and
/// `jump_impulse`. `plane_constraint` is written by the wall run and read by
/// physics backends.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct WallRunMovement {
    /// Whether the character is currently falling.
    pub airborne: bool,
    /// Maximum horizontal speed; also the wall-run slide speed.
    pub max_speed: f32,
    /// Speed of a jump launch.
    pub jump_impulse: f32,
    /// Normal of the active movement plane (zero = unconstrained).
    pub plane_constraint: Vec3,
}

impl Default for WallRunMovement {
    fn default() -> Self {
        Self {
            airborne: false,
            max_speed: 600.0,
            jump_impulse: 420.0,
            plane_constraint: Vec3::ZERO,
        }
    }
}

impl WallRunMovement {
    pub fn with_speeds(max_speed: f32, jump_impulse: f32) -> Self {
        Self {
            max_speed,
            jump_impulse,
            ..default()
        }
    }
}
