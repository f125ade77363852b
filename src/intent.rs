//! Movement intent components and the input gate.
//!
//! Intents hold the last axis values produced by the input layer. The wall
//! run reads them to decide whether the player is still steering into the
//! wall.

use bevy::prelude::*;

use crate::surface::WallRunSide;

/// Planar movement intent from player input.
///
/// # Example
///
/// ```rust
/// use wallrun_controller::prelude::*;
///
/// let mut intent = WallRunIntent::new();
/// intent.set_forward(1.0);
/// intent.set_right(-1.0);
/// assert!(intent.has_required_input(WallRunSide::Left, 0.001));
/// assert!(!intent.has_required_input(WallRunSide::Right, 0.001));
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct WallRunIntent {
    /// Forward axis (-1.0 = back, 1.0 = forward).
    pub forward: f32,
    /// Strafe axis (-1.0 = left, 1.0 = right).
    pub right: f32,
}

impl WallRunIntent {
    /// Create a new empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an intent with both axes set.
    pub fn with_axes(forward: f32, right: f32) -> Self {
        let mut intent = Self::new();
        intent.set_forward(forward);
        intent.set_right(right);
        intent
    }

    /// Set the forward axis (-1.0 = back, 1.0 = forward).
    pub fn set_forward(&mut self, value: f32) {
        self.forward = value.clamp(-1.0, 1.0);
    }

    /// Set the strafe axis (-1.0 = left, 1.0 = right).
    pub fn set_right(&mut self, value: f32) {
        self.right = value.clamp(-1.0, 1.0);
    }

    /// Clear both axes.
    pub fn clear(&mut self) {
        self.forward = 0.0;
        self.right = 0.0;
    }

    /// Whether this intent keeps a run on `side` alive.
    pub fn has_required_input(&self, side: WallRunSide, epsilon: f32) -> bool {
        has_required_input(self.forward, self.right, side, epsilon)
    }
}

/// Returns true if the axes steer forward and into the wall on `side`.
pub fn has_required_input(forward: f32, right: f32, side: WallRunSide, epsilon: f32) -> bool {
    if forward < epsilon {
        return false;
    }

    match side {
        WallRunSide::Left => right <= -epsilon,
        WallRunSide::Right => right >= epsilon,
        WallRunSide::None => false,
    }
}

/// Jump request component.
///
/// The input layer sets this when jump is pressed. The wall run consumes
/// it only when it turns the press into a wall jump; otherwise the request
/// is left for the host's regular jump.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct JumpRequest {
    /// Whether a jump is currently requested.
    pub requested: bool,
    /// Whether this request has been consumed.
    pub consumed: bool,
}

impl JumpRequest {
    /// Request a jump.
    pub fn request(&mut self) {
        if !self.requested {
            self.requested = true;
            self.consumed = false;
        }
    }

    /// Check if the request is still pending.
    pub fn is_pending(&self) -> bool {
        self.requested && !self.consumed
    }

    /// Consume the jump request.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Reset the request.
    pub fn reset(&mut self) {
        self.requested = false;
        self.consumed = false;
    }
}
