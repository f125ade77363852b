//! Wall-running locomotion for first-person Bevy characters.
//!
//! A character carrying a [`WallRunner`](state::WallRunner) starts running
//! along a roughly vertical wall when it touches one while falling and the
//! player steers forward and into it. While running, the character is held
//! in the horizontal plane and slides along the wall at its maximum speed.
//! The run ends when the wall runs out, the player lets go, the run times
//! out, or the player jumps off.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use wallrun_controller::prelude::*;
//!
//! # struct MyBackend;
//! # impl WallRunBackend for MyBackend {
//! #     fn plugin() -> impl Plugin { NoOpBackendPlugin }
//! #     fn get_velocity(_: &World, _: Entity) -> Vec3 { Vec3::ZERO }
//! #     fn set_velocity(_: &mut World, _: Entity, _: Vec3) {}
//! #     fn line_trace(_: &mut World, _: Entity, _: Vec3, _: Vec3) -> Option<TraceHit> { None }
//! # }
//! App::new()
//!     .add_plugins(MinimalPlugins)
//!     .add_plugins(WallRunPlugin::<MyBackend>::default())
//!     .run();
//! ```
//!
//! The host keeps [`WallRunIntent`](intent::WallRunIntent) and
//! [`WallRunMovement`](context::WallRunMovement) current and writes a
//! [`SurfaceContact`](messages::SurfaceContact) for every new collision
//! (the Avian backend does the latter two itself).

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod context;
pub mod detection;
pub mod intent;
pub mod messages;
pub mod state;
pub mod surface;
pub mod systems;
pub mod tilt;
pub mod timer;

pub use backend::WallRunBackend;

pub mod prelude {
    #[cfg(feature = "avian3d")]
    pub use crate::backend::Avian3dBackend;
    pub use crate::backend::{NoOpBackendPlugin, WallRunBackend};
    pub use crate::config::{CameraTiltConfig, ConfigError, WallRunConfig};
    pub use crate::context::{MovementContext, WallRunMovement};
    pub use crate::detection::TraceHit;
    pub use crate::intent::{JumpRequest, WallRunIntent};
    pub use crate::messages::{SurfaceContact, WallRunEnded, WallRunStarted};
    pub use crate::state::{EntryRejection, JumpOutcome, WallRunEndReason, WallRunner};
    pub use crate::surface::WallRunSide;
    pub use crate::tilt::{CameraTilt, TiltPresenter, WallRunCamera};
    pub use crate::{WallRunPlugin, WallRunSet};
}

/// Ordering of the wall-run systems inside `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallRunSet {
    /// New surface contacts may start a run.
    Contacts,
    /// Jump presses of running characters become wall jumps.
    Jump,
    /// Active runs are re-validated and moved.
    Update,
    /// Camera tilt timelines advance and roll is applied.
    Presentation,
}

/// Adds wall running to every entity with a [`WallRunner`](state::WallRunner).
pub struct WallRunPlugin<B: WallRunBackend> {
    _backend: PhantomData<B>,
}

impl<B: WallRunBackend> Default for WallRunPlugin<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B: WallRunBackend> Plugin for WallRunPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<state::WallRunner>()
            .register_type::<config::WallRunConfig>()
            .register_type::<context::WallRunMovement>()
            .register_type::<intent::WallRunIntent>()
            .register_type::<intent::JumpRequest>()
            .register_type::<tilt::CameraTilt>()
            .register_type::<tilt::WallRunCamera>();

        app.add_message::<messages::SurfaceContact>()
            .add_message::<messages::WallRunStarted>()
            .add_message::<messages::WallRunEnded>();

        app.configure_sets(
            FixedUpdate,
            (
                WallRunSet::Contacts,
                WallRunSet::Jump,
                WallRunSet::Update,
                WallRunSet::Presentation,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::handle_surface_contacts::<B>.in_set(WallRunSet::Contacts),
                systems::handle_jump_requests::<B>.in_set(WallRunSet::Jump),
                systems::update_wall_runs::<B>.in_set(WallRunSet::Update),
                (systems::update_camera_tilt, systems::apply_camera_roll)
                    .chain()
                    .in_set(WallRunSet::Presentation),
            ),
        );

        app.add_plugins(B::plugin());
    }
}
