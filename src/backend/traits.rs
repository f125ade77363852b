//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement
//! to drive a wall run. The wall-run systems only ever talk to physics
//! through this trait, so swapping engines means writing one impl.

use bevy::prelude::*;

use crate::detection::TraceHit;

/// Trait for physics backend implementations.
///
/// Everything is a static function over the `World` so the exclusive
/// wall-run systems can call into the backend while they hold the world.
pub trait WallRunBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .or_else(|| world.get::<GlobalTransform>(entity).map(|t| t.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Get the right vector of an entity.
    fn get_right(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| *t.right())
            .or_else(|| world.get::<GlobalTransform>(entity).map(|t| *t.right()))
            .unwrap_or(Vec3::X)
    }

    /// Get the current velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Cast a line from `origin` to `end`, skipping `entity` itself.
    fn line_trace(world: &mut World, entity: Entity, origin: Vec3, end: Vec3) -> Option<TraceHit>;

    /// Restrict the entity's motion to the plane with `normal`. Zero
    /// removes the restriction.
    ///
    /// The requested constraint is always recorded in
    /// [`WallRunMovement`](crate::context::WallRunMovement); backends whose
    /// integrator reads it from there can keep this default.
    fn set_plane_constraint(_world: &mut World, _entity: Entity, _normal: Vec3) {}
}
