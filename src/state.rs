//! The wall-run state machine.
//!
//! [`WallRunner`] owns the whole run lifecycle. It has three entry points
//! that the host calls in whatever order events arrive:
//!
//! - [`WallRunner::on_contact`] when the character first touches a surface,
//! - [`WallRunner::on_tick`] once per simulation step,
//! - [`WallRunner::on_jump_request`] when jump is pressed.
//!
//! Every exit path funnels through [`WallRunner::exit`], which is a no-op
//! when no run is active. The run timeout is a [`OneShot`] owned by the
//! runner and advanced from `on_tick`; it is cancelled on every exit.

use std::time::Duration;

use bevy::prelude::*;

use crate::config::WallRunConfig;
use crate::context::{MovementContext, WallRunMovement};
use crate::intent::{JumpRequest, WallRunIntent, has_required_input};
use crate::surface::{WallRunSide, classify_surface, derive_side_and_direction, is_usable_direction};
use crate::tilt::TiltPresenter;
use crate::timer::{OneShot, TimeoutHandle};

/// Why a contact did not start a run.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRejection {
    /// A run is already active.
    AlreadyRunning,
    /// The surface is floor or overhang.
    NotRunnable,
    /// The character is standing on the ground.
    Grounded,
    /// The contact normal does not define a travel direction.
    DegenerateSurface,
    /// The player is not steering forward and into the wall.
    NoSteeringInput,
}

/// Why a run ended.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallRunEndReason {
    /// The run lasted its maximum time.
    Timeout,
    /// The player stopped steering into the wall.
    InputReleased,
    /// The probe found no usable wall.
    SurfaceLost,
    /// The probe found a wall on the other flank.
    SideChanged,
    /// The player jumped off the wall.
    Jumped,
    /// The host ended the run directly.
    Cancelled,
}

/// A run that just started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallRunStart {
    pub side: WallRunSide,
    pub direction: Vec3,
    pub timeout: TimeoutHandle,
}

/// A run that just ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallRunEnd {
    pub side: WallRunSide,
    pub reason: WallRunEndReason,
    /// Seconds the run lasted.
    pub elapsed: f32,
}

/// Result of a jump press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpOutcome {
    /// The press became a wall jump and ended the run.
    Launched { launch: Vec3, end: WallRunEnd },
    /// No run is active; the host should perform its normal jump.
    Fallthrough,
}

/// Wall-run state for one character.
///
/// Inserting a runner also inserts the movement and input components the
/// wall-run systems read.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
#[require(WallRunMovement, WallRunIntent, JumpRequest)]
pub struct WallRunner {
    running: bool,
    side: WallRunSide,
    direction: Vec3,
    elapsed: f32,
    timeout: OneShot,
    run_timeout: Option<TimeoutHandle>,
}

impl WallRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Flank of the active run, `None` when not running.
    #[inline]
    pub fn side(&self) -> WallRunSide {
        self.side
    }

    /// Travel direction of the active run, zero when not running.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Seconds since the active run started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds until the active run times out.
    pub fn time_remaining(&self) -> Option<f32> {
        self.timeout.remaining_secs()
    }

    /// Handle of the timeout armed for the active run.
    pub fn timeout_handle(&self) -> Option<TimeoutHandle> {
        self.run_timeout
    }

    /// Try to start a run from a new surface contact.
    ///
    /// Guards are checked in order and the first failure is returned
    /// without touching the context or the presenter.
    pub fn on_contact(
        &mut self,
        normal: Vec3,
        config: &WallRunConfig,
        ctx: &mut impl MovementContext,
        tilt: &mut impl TiltPresenter,
    ) -> Result<WallRunStart, EntryRejection> {
        if self.running {
            return Err(EntryRejection::AlreadyRunning);
        }
        if !classify_surface(normal, config.walkable_floor_y) {
            return Err(EntryRejection::NotRunnable);
        }
        if !ctx.is_airborne() {
            return Err(EntryRejection::Grounded);
        }

        let (side, direction) = derive_side_and_direction(normal, ctx.right(), config.axis_epsilon);
        if !is_usable_direction(direction) {
            return Err(EntryRejection::DegenerateSurface);
        }

        let (forward, right) = ctx.input_axes();
        if !has_required_input(forward, right, side, config.axis_epsilon) {
            return Err(EntryRejection::NoSteeringInput);
        }

        tilt.begin_tilt(side);

        self.running = true;
        self.side = side;
        self.direction = direction;
        self.elapsed = 0.0;

        ctx.set_plane_constraint(Vec3::Y);

        let timeout = self.timeout.schedule(config.max_wall_run_time);
        self.run_timeout = Some(timeout);

        Ok(WallRunStart {
            side,
            direction,
            timeout,
        })
    }

    /// Advance an active run by one step.
    ///
    /// Returns the run that ended during this step, if any.
    pub fn on_tick(
        &mut self,
        delta: Duration,
        config: &WallRunConfig,
        ctx: &mut impl MovementContext,
        tilt: &mut impl TiltPresenter,
    ) -> Option<WallRunEnd> {
        if !self.running {
            return None;
        }

        self.elapsed += delta.as_secs_f32();
        if let Some(fired) = self.timeout.advance(delta) {
            if let Some(end) = self.on_timeout(fired, ctx, tilt) {
                return Some(end);
            }
        }

        let (forward, right) = ctx.input_axes();
        if !has_required_input(forward, right, self.side, config.axis_epsilon) {
            return self.exit(WallRunEndReason::InputReleased, ctx, tilt);
        }

        let right_vector = ctx.right();
        let origin = ctx.position();
        let end = origin + right_vector * self.side.sign() * config.line_trace_length;

        let Some(hit) = ctx.line_trace(origin, end) else {
            return self.exit(WallRunEndReason::SurfaceLost, ctx, tilt);
        };
        if !classify_surface(hit.normal, config.walkable_floor_y) {
            return self.exit(WallRunEndReason::SurfaceLost, ctx, tilt);
        }

        let (side, direction) =
            derive_side_and_direction(hit.normal, right_vector, config.axis_epsilon);
        if !is_usable_direction(direction) {
            return self.exit(WallRunEndReason::SurfaceLost, ctx, tilt);
        }
        if side != self.side {
            return self.exit(WallRunEndReason::SideChanged, ctx, tilt);
        }

        self.direction = direction;
        ctx.set_velocity(direction * ctx.max_horizontal_speed());
        None
    }

    /// Handle a fired timeout. Handles from earlier runs are ignored.
    pub fn on_timeout(
        &mut self,
        handle: TimeoutHandle,
        ctx: &mut impl MovementContext,
        tilt: &mut impl TiltPresenter,
    ) -> Option<WallRunEnd> {
        if self.run_timeout != Some(handle) {
            return None;
        }
        self.exit(WallRunEndReason::Timeout, ctx, tilt)
    }

    /// Handle a jump press.
    ///
    /// While running, launches the character up and away from the wall and
    /// ends the run. Otherwise leaves the jump to the host.
    pub fn on_jump_request(
        &mut self,
        ctx: &mut impl MovementContext,
        tilt: &mut impl TiltPresenter,
    ) -> JumpOutcome {
        if !self.running {
            return JumpOutcome::Fallthrough;
        }

        let launch = jump_launch(self.side, self.direction) * ctx.jump_impulse();

        let Some(end) = self.exit(WallRunEndReason::Jumped, ctx, tilt) else {
            return JumpOutcome::Fallthrough;
        };
        ctx.launch(launch);

        JumpOutcome::Launched { launch, end }
    }

    /// End the active run. Calling this when not running does nothing.
    pub fn exit(
        &mut self,
        reason: WallRunEndReason,
        ctx: &mut impl MovementContext,
        tilt: &mut impl TiltPresenter,
    ) -> Option<WallRunEnd> {
        if !self.running {
            return None;
        }

        tilt.end_tilt();

        let end = WallRunEnd {
            side: self.side,
            reason,
            elapsed: self.elapsed,
        };

        self.running = false;
        self.side = WallRunSide::None;
        self.direction = Vec3::ZERO;
        self.timeout.cancel_all();
        self.run_timeout = None;

        ctx.clear_plane_constraint();

        Some(end)
    }
}

/// Unit launch direction for a jump off a wall on `side` while travelling
/// along `direction`: away from the wall and up, at 45 degrees.
pub fn jump_launch(side: WallRunSide, direction: Vec3) -> Vec3 {
    let away = match side {
        WallRunSide::Right => Vec3::Y.cross(direction),
        WallRunSide::Left => direction.cross(Vec3::Y),
        WallRunSide::None => Vec3::ZERO,
    }
    .normalize_or_zero();

    (away + Vec3::Y).normalize_or_zero()
}
