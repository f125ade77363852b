use bevy::prelude::*;

/// Backend plugin that adds nothing.
///
/// For hosts that write [`SurfaceContact`](crate::messages::SurfaceContact)
/// and keep [`WallRunMovement`](crate::context::WallRunMovement) current
/// themselves.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
