//! Messages into and out of the wall-run systems.

use bevy::prelude::*;

use crate::state::WallRunEndReason;
use crate::surface::WallRunSide;

/// A character touched a surface for the first time.
///
/// Physics backends write this from their collision events; hosts with
/// their own collision handling can write it directly.
#[derive(Message, Debug, Clone, Copy)]
pub struct SurfaceContact {
    /// The character that made contact.
    pub entity: Entity,
    /// Outward normal of the touched surface.
    pub normal: Vec3,
}

/// A character started running along a wall.
#[derive(Message, Debug, Clone, Copy)]
pub struct WallRunStarted {
    pub entity: Entity,
    pub side: WallRunSide,
    pub direction: Vec3,
}

/// A character stopped running along a wall.
#[derive(Message, Debug, Clone, Copy)]
pub struct WallRunEnded {
    pub entity: Entity,
    pub side: WallRunSide,
    pub reason: WallRunEndReason,
    /// Seconds the run lasted.
    pub elapsed: f32,
}
