//! Local player body and its tracking rig.
//!
//! The sandbox runs the desktop modality: the "head" sits at eye height on
//! the capsule and looks along the body's facing, and the "hands" are
//! fixed anchors in front of the shoulders. The climbing controller only
//! ever sees the resulting [`TrackingFrame`].

use bevy::prelude::*;
use shared::TrackingFrame;
use shared::constants::GRAVITY_MPS2;

use crate::convert::to_core;

/// Capsule center height while standing on the floor.
const STAND_HEIGHT: f32 = 0.9;
/// Eye offset above the capsule center.
const EYE_OFFSET: f32 = 0.7;
/// Yaw aim speed for the arrow keys (radians per second).
const YAW_RATE: f32 = 1.8;
/// Ground friction applied to planar velocity per tick on the floor.
const FLOOR_FRICTION: f32 = 0.9;

/// Kinematic state for the local player body.
#[derive(Component)]
pub struct Player {
    pub velocity: Vec3,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_player);
    app.add_systems(Update, integrate);
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Player {
            velocity: Vec3::ZERO,
        },
        Mesh3d(meshes.add(Mesh::from(Capsule3d {
            radius: 0.3,
            half_length: 0.6,
        }))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.9, 0.8),
            ..default()
        })),
        Transform::from_xyz(0.0, STAND_HEIGHT, 2.0),
    ));
}

/// Simple kinematic integration: gravity, velocity, a floor clamp, and
/// yaw aiming with the arrow keys. The climbing late pass overwrites the
/// velocity while attached, which is exactly how the controller expects
/// to drive locomotion.
fn integrate(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    query: Single<(&mut Transform, &mut Player)>,
) {
    let dt = time.delta_secs();
    let (mut tf, mut player) = query.into_inner();

    if keys.pressed(KeyCode::ArrowLeft) {
        tf.rotate_y(YAW_RATE * dt);
    }
    if keys.pressed(KeyCode::ArrowRight) {
        tf.rotate_y(-YAW_RATE * dt);
    }

    player.velocity.y -= GRAVITY_MPS2 * dt;
    let mut translation = tf.translation + player.velocity * dt;

    if translation.y <= STAND_HEIGHT {
        translation.y = STAND_HEIGHT;
        player.velocity.y = player.velocity.y.max(0.0);
        player.velocity.x *= FLOOR_FRICTION;
        player.velocity.z *= FLOOR_FRICTION;
    }

    tf.translation = translation;
}

/// Build the tracking frame the climbing controller consumes, from the
/// player body pose.
pub fn tracking_frame(tf: &Transform) -> TrackingFrame {
    let forward = *tf.forward();
    let head = tf.translation + Vec3::Y * EYE_OFFSET;

    TrackingFrame {
        head_position: to_core(head),
        head_forward: to_core(forward),
        left_hand: to_core(tf.transform_point(Vec3::new(-0.3, 0.3, -0.3))),
        right_hand: to_core(tf.transform_point(Vec3::new(0.3, 0.3, -0.3))),
    }
}
