//! Conversions between Bevy math types and the core's nalgebra types.

use bevy::prelude::{Quat, Transform, Vec3};

#[inline]
pub fn to_bevy(v: shared::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_core(v: Vec3) -> shared::Vec3 {
    shared::Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_core_quat(q: Quat) -> shared::Quat {
    shared::Quat::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn to_core_transform(tf: &Transform) -> shared::Transform {
    shared::Transform::new(to_core(tf.translation), to_core_quat(tf.rotation))
}
