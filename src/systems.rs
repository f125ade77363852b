//! ECS systems that drive [`WallRunner`]s.
//!
//! The state machine needs synchronous access to physics (probe, velocity,
//! plane constraint) in the middle of a transition, so the driving systems
//! are exclusive and reach physics through the [`WallRunBackend`].

use std::marker::PhantomData;

use bevy::ecs::message::{MessageCursor, Messages};
use bevy::prelude::*;

use crate::backend::WallRunBackend;
use crate::config::WallRunConfig;
use crate::context::{MovementContext, WallRunMovement};
use crate::detection::TraceHit;
use crate::intent::{JumpRequest, WallRunIntent};
use crate::messages::{SurfaceContact, WallRunEnded, WallRunStarted};
use crate::state::{JumpOutcome, WallRunEnd, WallRunner};
use crate::tilt::{CameraTilt, WallRunCamera, with_roll};

/// [`MovementContext`] for one entity, backed by the world and a backend.
pub struct BackendContext<'w, B: WallRunBackend> {
    world: &'w mut World,
    entity: Entity,
    intent: WallRunIntent,
    movement: WallRunMovement,
    _backend: PhantomData<B>,
}

impl<'w, B: WallRunBackend> BackendContext<'w, B> {
    pub fn new(world: &'w mut World, entity: Entity) -> Self {
        let intent = world.get::<WallRunIntent>(entity).copied().unwrap_or_default();
        let movement = world
            .get::<WallRunMovement>(entity)
            .copied()
            .unwrap_or_default();
        Self {
            world,
            entity,
            intent,
            movement,
            _backend: PhantomData,
        }
    }

    /// Write the movement state back to the entity.
    pub fn finish(self) {
        if let Some(mut movement) = self.world.get_mut::<WallRunMovement>(self.entity) {
            if *movement != self.movement {
                *movement = self.movement;
            }
        }
    }
}

impl<B: WallRunBackend> MovementContext for BackendContext<'_, B> {
    fn input_axes(&self) -> (f32, f32) {
        (self.intent.forward, self.intent.right)
    }

    fn is_airborne(&self) -> bool {
        self.movement.airborne
    }

    fn position(&self) -> Vec3 {
        B::get_position(self.world, self.entity)
    }

    fn right(&self) -> Vec3 {
        B::get_right(self.world, self.entity)
    }

    fn line_trace(&mut self, origin: Vec3, end: Vec3) -> Option<TraceHit> {
        B::line_trace(self.world, self.entity, origin, end)
    }

    fn velocity(&self) -> Vec3 {
        B::get_velocity(self.world, self.entity)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        B::set_velocity(self.world, self.entity, velocity);
    }

    fn set_plane_constraint(&mut self, normal: Vec3) {
        self.movement.plane_constraint = normal;
        B::set_plane_constraint(self.world, self.entity, normal);
    }

    fn max_horizontal_speed(&self) -> f32 {
        self.movement.max_speed
    }

    fn jump_impulse(&self) -> f32 {
        self.movement.jump_impulse
    }
}

/// Run `f` against a copy of the entity's runner, context and presenter,
/// then store the results. Returns `None` if the entity has no runner.
fn with_runner<B, R>(
    world: &mut World,
    entity: Entity,
    f: impl FnOnce(
        &mut WallRunner,
        &WallRunConfig,
        &mut BackendContext<'_, B>,
        &mut Option<CameraTilt>,
    ) -> R,
) -> Option<R>
where
    B: WallRunBackend,
{
    let mut runner = world.get::<WallRunner>(entity)?.clone();
    let config = world.get::<WallRunConfig>(entity).copied().unwrap_or_default();
    let mut tilt = world.get::<CameraTilt>(entity).cloned();

    let mut ctx = BackendContext::<B>::new(world, entity);
    let result = f(&mut runner, &config, &mut ctx, &mut tilt);
    ctx.finish();

    if let Some(mut stored) = world.get_mut::<WallRunner>(entity) {
        *stored = runner;
    }
    if let Some(tilt) = tilt {
        if let Some(mut stored) = world.get_mut::<CameraTilt>(entity) {
            *stored = tilt;
        }
    }

    Some(result)
}

fn report_end(world: &mut World, entity: Entity, end: WallRunEnd) {
    debug!(
        "Wall run ended: entity={entity}, side={:?}, reason={:?}, elapsed={:.2}s",
        end.side, end.reason, end.elapsed
    );
    world.write_message(WallRunEnded {
        entity,
        side: end.side,
        reason: end.reason,
        elapsed: end.elapsed,
    });
}

/// Try to start a run for every new surface contact.
pub fn handle_surface_contacts<B: WallRunBackend>(
    world: &mut World,
    mut cursor: Local<MessageCursor<SurfaceContact>>,
) {
    let contacts: Vec<SurfaceContact> = cursor
        .read(world.resource::<Messages<SurfaceContact>>())
        .copied()
        .collect();

    for contact in contacts {
        let result = with_runner::<B, _>(world, contact.entity, |runner, config, ctx, tilt| {
            runner.on_contact(contact.normal, config, ctx, tilt)
        });

        match result {
            Some(Ok(start)) => {
                debug!(
                    "Wall run started: entity={}, side={:?}, direction={}",
                    contact.entity, start.side, start.direction
                );
                world.write_message(WallRunStarted {
                    entity: contact.entity,
                    side: start.side,
                    direction: start.direction,
                });
            }
            Some(Err(rejection)) => {
                trace!(
                    "Wall run rejected: entity={}, normal={}, reason={rejection:?}",
                    contact.entity, contact.normal
                );
            }
            None => {}
        }
    }
}

/// Turn pending jump presses of running characters into wall jumps.
///
/// Presses of characters that are not running are left untouched for the
/// host's own jump handling.
pub fn handle_jump_requests<B: WallRunBackend>(world: &mut World) {
    let jumpers: Vec<Entity> = world
        .query::<(Entity, &WallRunner, &JumpRequest)>()
        .iter(world)
        .filter(|(_, runner, request)| runner.is_running() && request.is_pending())
        .map(|(entity, _, _)| entity)
        .collect();

    for entity in jumpers {
        let outcome = with_runner::<B, _>(world, entity, |runner, _, ctx, tilt| {
            runner.on_jump_request(ctx, tilt)
        });

        if let Some(JumpOutcome::Launched { launch, end }) = outcome {
            if let Some(mut request) = world.get_mut::<JumpRequest>(entity) {
                request.consume();
            }
            debug!("Wall jump: entity={entity}, launch={launch}");
            report_end(world, entity, end);
        }
    }
}

/// Advance every active run by one fixed step.
pub fn update_wall_runs<B: WallRunBackend>(world: &mut World) {
    let delta = world.resource::<Time>().delta();

    let running: Vec<Entity> = world
        .query::<(Entity, &WallRunner)>()
        .iter(world)
        .filter(|(_, runner)| runner.is_running())
        .map(|(entity, _)| entity)
        .collect();

    for entity in running {
        let end = with_runner::<B, _>(world, entity, |runner, config, ctx, tilt| {
            runner.on_tick(delta, config, ctx, tilt)
        });

        if let Some(Some(end)) = end {
            report_end(world, entity, end);
        }
    }
}

/// Step every camera-tilt timeline.
pub fn update_camera_tilt(
    time: Res<Time>,
    mut q_tilts: Query<(&mut CameraTilt, Option<&WallRunConfig>)>,
) {
    let delta = time.delta_secs();
    for (mut tilt, config) in &mut q_tilts {
        if let Some(config) = config {
            if *tilt.config() != config.tilt {
                tilt.set_config(config.tilt);
            }
        }
        if tilt.is_playing() {
            tilt.advance(delta);
        }
    }
}

/// Copy each character's tilt onto the roll of its cameras.
pub fn apply_camera_roll(
    q_tilts: Query<&CameraTilt>,
    mut q_cameras: Query<(&WallRunCamera, &mut Transform)>,
) {
    for (camera, mut transform) in &mut q_cameras {
        let Ok(tilt) = q_tilts.get(camera.0) else {
            continue;
        };
        let rotation = with_roll(transform.rotation, tilt.roll());
        if transform.rotation != rotation {
            transform.rotation = rotation;
        }
    }
}
