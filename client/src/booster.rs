//! Booster lines: advance the sequencer, carry the boosted handle along
//! its baked path, and wire grab notifications into the cycle.

use bevy::prelude::*;
use shared::{BakedPath, BoostEvent, Booster, ClimbEvent, SurfaceId};

use crate::climbing::{ClimbNotify, ClimbRig, Surfaces};
use crate::convert::{to_bevy, to_core_transform};

/// Buffered boost notification for interested systems.
///
/// `Started` is the one session-scoped notification: a networked host
/// would broadcast it to all peers here so everyone runs the same cycle
/// locally.
#[derive(Message, Clone, Copy, Debug)]
pub struct BoostNotify(pub BoostEvent);

/// A boosted handle riding a baked path. The handle doubles as a
/// climbable surface, so its registry entry follows the placement.
#[derive(Component)]
pub struct BoosterLine {
    pub booster: Booster,
    pub path: BakedPath,
    pub surface: SurfaceId,
    events: Vec<BoostEvent>,
}

impl BoosterLine {
    pub fn new(booster: Booster, path: BakedPath, surface: SurfaceId) -> Self {
        Self {
            booster,
            path,
            surface,
            events: Vec::new(),
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<BoostNotify>();
    app.add_systems(
        Update,
        (start_on_grab, advance_and_place, dispatch_notifications).chain(),
    );
}

/// Grabbing an idle booster handle triggers its cycle.
fn start_on_grab(
    mut notifications: MessageReader<ClimbNotify>,
    mut lines: Query<&mut BoosterLine>,
    rig: Res<ClimbRig>,
) {
    if !rig.controller.config().notify_climbed_surfaces {
        return;
    }

    for note in notifications.read() {
        let ClimbEvent::Grabbed { surface } = note.0 else {
            continue;
        };
        for mut line in &mut lines {
            if line.surface == surface && !line.booster.is_active() {
                let BoosterLine {
                    booster, events, ..
                } = &mut *line;
                booster.start(events);
            }
        }
    }
}

/// Early pass: advance active cycles and place the handle (and its climb
/// surface) on the path, before the climbing late pass reads the pose.
fn advance_and_place(
    time: Res<Time>,
    mut lines: Query<(&mut BoosterLine, &mut Transform)>,
    mut surfaces: ResMut<Surfaces>,
) {
    for (mut line, mut tf) in &mut lines {
        if !line.booster.is_active() {
            continue;
        }

        let BoosterLine {
            booster,
            path,
            events,
            ..
        } = &mut *line;
        booster.advance(time.delta_secs(), events);

        let pose = path.place(booster.time());
        tf.translation = to_bevy(pose.position);
        tf.look_to(to_bevy(pose.forward.into_inner()), Vec3::Y);

        surfaces.0.set_transform(line.surface, to_core_transform(&tf));
    }
}

/// Deliver boost notifications and apply the force-drop rules.
fn dispatch_notifications(
    mut lines: Query<&mut BoosterLine>,
    mut rig: ResMut<ClimbRig>,
    mut writer: MessageWriter<BoostNotify>,
) {
    for mut line in &mut lines {
        let surface = line.surface;
        let force_drop_on_start = line.booster.config().force_drop_on_start;
        let force_drop_on_stop = line.booster.config().force_drop_on_stop;

        for event in line.events.drain(..) {
            match event {
                BoostEvent::Started => {
                    log::info!("boost started");
                    if force_drop_on_start {
                        rig.release_surface(surface);
                    }
                }
                BoostEvent::Stopped => {
                    log::info!("boost stopped");
                    if force_drop_on_stop {
                        rig.release_surface(surface);
                    }
                }
                BoostEvent::FeedbackStarted(_) | BoostEvent::FeedbackStopped(_) => {
                    log::debug!("boost feedback edge: {event:?}");
                }
            }
            writer.write(BoostNotify(event));
        }
    }
}
