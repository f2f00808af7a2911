//! Dev-only debug drawing: baked path polylines, live path poses, and the
//! current attach anchor. Read-only over the core.

use bevy::prelude::*;
use shared::Hand;

use crate::booster::BoosterLine;
use crate::climbing::{ClimbRig, Surfaces};
use crate::convert::to_bevy;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(PostUpdate, (draw_paths, draw_attachments));
}

fn draw_paths(mut gizmos: Gizmos, lines: Query<&BoosterLine>) {
    for line in &lines {
        let points = line.path.points();
        gizmos.linestrip(
            points.iter().map(|p| to_bevy(*p)),
            Color::srgb(1.0, 0.8, 0.2),
        );
        if let Some(end) = points.last() {
            gizmos.sphere(to_bevy(*end), 0.15, Color::srgb(1.0, 0.8, 0.2));
        }

        if line.booster.is_active() {
            let pose = line.path.place(line.booster.time());
            let start = to_bevy(pose.position);
            let end = start + to_bevy(pose.forward.into_inner());
            gizmos.arrow(start, end, Color::srgb(0.2, 1.0, 0.4));
        }
    }
}

fn draw_attachments(mut gizmos: Gizmos, rig: Res<ClimbRig>, surfaces: Res<Surfaces>) {
    for hand in [Hand::Left, Hand::Right] {
        let Some(att) = rig.controller.hand(hand).attachment else {
            continue;
        };
        let Some(surface) = surfaces.0.get(att.surface) else {
            continue;
        };

        let anchor = surface.transform.world_point(att.local_point);
        gizmos.sphere(to_bevy(anchor), 0.08, Color::srgb(1.0, 0.2, 0.2));
    }
}
