//! Avian3D physics backend implementation.
//!
//! This module provides the physics backend for Avian3D.
//! Enable with the `avian3d` feature.
//!
//! - velocity goes through `LinearVelocity`,
//! - the wall-run plane constraint locks translation along Y via `LockedAxes`,
//! - probes use `SpatialQuery`,
//! - `CollisionStart` messages become [`SurfaceContact`]s,
//! - a downward ray keeps [`WallRunMovement::airborne`] up to date.

use avian3d::prelude::*;
use bevy::ecs::system::SystemState;
use bevy::prelude::*;

use crate::WallRunSet;
use crate::backend::WallRunBackend;
use crate::context::WallRunMovement;
use crate::detection::TraceHit;
use crate::messages::SurfaceContact;
use crate::state::WallRunner;

/// Extra ground probe length beyond the collider bottom, as a fraction of
/// the distance from collider centre to bottom.
const GROUND_PROBE_MARGIN: f32 = 0.1;

/// Avian3D physics backend for the wall run.
pub struct Avian3dBackend;

impl WallRunBackend for Avian3dBackend {
    fn plugin() -> impl Plugin {
        Avian3dBackendPlugin
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        // Try Avian's Position component first, then fall back to Transform
        world
            .get::<Position>(entity)
            .map(|p| p.0)
            .or_else(|| world.get::<Transform>(entity).map(|t| t.translation))
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation())
            })
            .unwrap_or(Vec3::ZERO)
    }

    fn get_right(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Rotation>(entity)
            .map(|r| r.0 * Vec3::X)
            .or_else(|| world.get::<Transform>(entity).map(|t| *t.right()))
            .unwrap_or(Vec3::X)
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<LinearVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 = velocity;
        }
    }

    fn line_trace(world: &mut World, entity: Entity, origin: Vec3, end: Vec3) -> Option<TraceHit> {
        let (direction, max_distance) = Dir3::new_and_length(end - origin).ok()?;
        let filter = query_filter(world, entity);

        let mut state = SystemState::<SpatialQuery>::new(world);
        let spatial_query = state.get_mut(world);

        spatial_query
            .cast_ray(origin, direction, max_distance, true, &filter)
            .map(|hit| {
                TraceHit::new(
                    hit.distance,
                    hit.normal,
                    origin + direction * hit.distance,
                    Some(hit.entity),
                )
            })
    }

    fn set_plane_constraint(world: &mut World, entity: Entity, normal: Vec3) {
        let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
            return;
        };
        let current = entity_mut.get::<LockedAxes>().copied().unwrap_or_default();

        // Only the vertical plane is ever requested; lock Y for it and
        // release Y for anything else.
        let vertical = normal.normalize_or_zero().y.abs() > 0.99;
        let updated = if vertical {
            current.lock_translation_y()
        } else {
            current.unlock_translation_y()
        };
        entity_mut.insert(updated);

        if vertical {
            if let Some(mut vel) = entity_mut.get_mut::<LinearVelocity>() {
                vel.0.y = 0.0;
            }
        }
    }
}

/// Filter that respects the character's collision layers and skips itself.
fn query_filter(world: &World, entity: Entity) -> SpatialQueryFilter {
    let filter = match world.get::<CollisionLayers>(entity) {
        Some(layers) => SpatialQueryFilter::from_mask(layers.filters),
        None => SpatialQueryFilter::default(),
    };
    filter.with_excluded_entities([entity])
}

/// Plugin that sets up Avian3D-specific systems for the wall run.
pub struct Avian3dBackendPlugin;

impl Plugin for Avian3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, enable_collision_events);

        // Contacts and fall state feed the state machine, so both run
        // before it in the same fixed step.
        app.add_systems(
            FixedUpdate,
            (avian_ground_detection, forward_collision_contacts)
                .chain()
                .before(WallRunSet::Contacts),
        );
    }
}

/// Wall runners need collision events to see their contacts.
fn enable_collision_events(
    mut commands: Commands,
    q_new: Query<Entity, (Added<WallRunner>, Without<CollisionEventsEnabled>)>,
) {
    for entity in &q_new {
        commands.entity(entity).insert(CollisionEventsEnabled);
    }
}

/// Distance from a character collider's centre down to its lowest point.
///
/// Upright 3D capsules reach half their segment plus the radius below the
/// centre. Shapes other than capsule, sphere and box report zero, so the
/// ground probe only covers the margin.
pub fn get_collider_bottom_offset(collider: &Collider) -> f32 {
    let shape = collider.shape_scaled();
    if let Some(capsule) = shape.as_capsule() {
        capsule.half_height() + capsule.radius
    } else if let Some(ball) = shape.as_ball() {
        ball.radius
    } else if let Some(cuboid) = shape.as_cuboid() {
        cuboid.half_extents.y
    } else {
        0.0
    }
}

/// Turn collision starts involving a wall runner into [`SurfaceContact`]s.
///
/// Manifold normals point from the first collider to the second, so the
/// surface normal seen by the character is the manifold normal when the
/// character is second and its negation when it is first.
fn forward_collision_contacts(
    mut started: MessageReader<CollisionStart>,
    collisions: Collisions,
    q_runners: Query<(), With<WallRunner>>,
    mut contacts: MessageWriter<SurfaceContact>,
) {
    for event in started.read() {
        let body1 = event.body1.unwrap_or(event.collider1);
        let body2 = event.body2.unwrap_or(event.collider2);

        let (character, sign) = if q_runners.contains(body1) {
            (body1, -1.0)
        } else if q_runners.contains(body2) {
            (body2, 1.0)
        } else {
            continue;
        };

        let Some(pair) = collisions.get(event.collider1, event.collider2) else {
            continue;
        };
        // `get` may hand the pair back in either order.
        let sign = if pair.collider1 == event.collider1 {
            sign
        } else {
            -sign
        };

        let Some(manifold) = pair.manifolds.first() else {
            continue;
        };

        contacts.write(SurfaceContact {
            entity: character,
            normal: manifold.normal * sign,
        });
    }
}

/// Keep [`WallRunMovement::airborne`] in sync with a short downward ray.
fn avian_ground_detection(
    spatial_query: SpatialQuery,
    mut q_movers: Query<(
        Entity,
        &GlobalTransform,
        &mut WallRunMovement,
        Option<&Collider>,
        Option<&CollisionLayers>,
    )>,
    q_runners: Query<&WallRunner>,
) {
    for (entity, transform, mut movement, collider, layers) in &mut q_movers {
        // A running character is held off the ground by the wall.
        if q_runners.get(entity).is_ok_and(|runner| runner.is_running()) {
            continue;
        }

        let bottom = collider.map(get_collider_bottom_offset).unwrap_or(0.0);
        let probe_length = bottom * (1.0 + GROUND_PROBE_MARGIN) + 0.01;

        let filter = match layers {
            Some(layers) => SpatialQueryFilter::from_mask(layers.filters),
            None => SpatialQueryFilter::default(),
        }
        .with_excluded_entities([entity]);

        let grounded = spatial_query
            .cast_ray(
                transform.translation(),
                Dir3::NEG_Y,
                probe_length,
                true,
                &filter,
            )
            .is_some();

        movement.airborne = !grounded;
    }
}
