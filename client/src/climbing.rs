//! Climbing systems: input-edge routing in the early pass, continuous
//! grab recomputation in the late pass, and typed notification delivery.
//!
//! The late pass runs in `PostUpdate`, after the player body integrated
//! this tick's movement, so the controller reads post-physics poses.

use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use shared::{ClimbConfig, ClimbEvent, ClimbingController, Hand, SurfaceId, SurfaceSet};

use crate::convert::to_bevy;
use crate::input::InputAction;
use crate::player::{self, Player};

/// The local player's climbing controller plus its notification buffer.
#[derive(Resource)]
pub struct ClimbRig {
    pub controller: ClimbingController,
    events: Vec<ClimbEvent>,
}

impl ClimbRig {
    pub fn new(controller: ClimbingController) -> Self {
        Self {
            controller,
            events: Vec::new(),
        }
    }

    /// Targeted force release, for collaborators like the booster.
    pub fn release_surface(&mut self, surface: SurfaceId) {
        let Self { controller, events } = self;
        controller.release_surface(surface, events);
    }
}

/// The climbable surface registry shared with the core.
#[derive(Resource)]
pub struct Surfaces(pub SurfaceSet);

/// Buffered grab/drop notification for interested systems.
#[derive(Message, Clone, Copy, Debug)]
pub struct ClimbNotify(pub ClimbEvent);

pub(super) fn plugin(app: &mut App) {
    // The sandbox is a desktop rig; a VR host would pass `true` and feed
    // real tracked hands instead.
    app.insert_resource(ClimbRig::new(ClimbingController::new(
        ClimbConfig::default(),
        false,
    )));
    app.add_message::<ClimbNotify>();

    app.add_systems(Update, route_input_edges);
    app.add_systems(
        PostUpdate,
        (late_update_grab, apply_velocity_command, dispatch_notifications).chain(),
    );
}

/// Early pass: forward press and release edges of the semantic actions.
fn route_input_edges(
    actions: Res<ActionState<InputAction>>,
    mut rig: ResMut<ClimbRig>,
    surfaces: Res<Surfaces>,
    player_q: Single<&Transform, With<Player>>,
) {
    let tracking = player::tracking_frame(player_q.into_inner());
    let ClimbRig { controller, events } = &mut *rig;

    if actions.just_pressed(&InputAction::Use) {
        controller.input_use(true, Hand::Left, &tracking, &surfaces.0, events);
    }
    if actions.just_released(&InputAction::Use) {
        controller.input_use(false, Hand::Left, &tracking, &surfaces.0, events);
    }
    if actions.just_pressed(&InputAction::Grab) {
        controller.input_grab(true, Hand::Left, &tracking, &surfaces.0, events);
    }
    if actions.just_released(&InputAction::Grab) {
        controller.input_grab(false, Hand::Left, &tracking, &surfaces.0, events);
    }
    if actions.just_pressed(&InputAction::Drop) {
        controller.input_drop(true, &tracking, &surfaces.0, events);
    }
    if actions.just_released(&InputAction::Drop) {
        controller.input_drop(false, &tracking, &surfaces.0, events);
    }
    if actions.just_pressed(&InputAction::Jump) {
        controller.input_jump(true, &tracking, events);
    }
}

/// Late pass: recompute the grab against post-integration poses.
fn late_update_grab(
    time: Res<Time>,
    mut rig: ResMut<ClimbRig>,
    surfaces: Res<Surfaces>,
    player_q: Single<&Transform, With<Player>>,
) {
    let tracking = player::tracking_frame(player_q.into_inner());
    let ClimbRig { controller, events } = &mut *rig;
    controller.update_grab(time.delta_secs(), &tracking, &surfaces.0, events);
}

/// Hand the controller's velocity to the player body.
fn apply_velocity_command(mut rig: ResMut<ClimbRig>, player_q: Single<&mut Player>) {
    let mut player = player_q.into_inner();
    if let Some(velocity) = rig.controller.take_velocity_command() {
        player.velocity = to_bevy(velocity);
    }
}

/// Drain this tick's notifications into the message bus.
fn dispatch_notifications(mut rig: ResMut<ClimbRig>, mut writer: MessageWriter<ClimbNotify>) {
    for event in rig.events.drain(..) {
        log::debug!("climb event: {event:?}");
        writer.write(ClimbNotify(event));
    }
}
