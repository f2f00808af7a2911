/*!
Math aliases and the rigid `Transform` shared across the controller.

This module intentionally contains no algorithms. It defines the common
math aliases and the explicit local-frame attach transform used in place
of engine reparenting: a grab stores a point in a surface's local frame
(`local_point`) and recovers its world position each tick (`world_point`)
so hands ride moving surfaces deterministically.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// The identity transform: no translation, no rotation.
    #[inline]
    pub fn identity() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }

    /// Map a point expressed in this transform's local frame to world space.
    #[inline]
    pub fn world_point(&self, local: Vec3) -> Vec3 {
        self.rotation * local + self.translation
    }

    /// Map a world-space point into this transform's local frame.
    ///
    /// Inverse of [`world_point`](Self::world_point): for any `p`,
    /// `local_point(world_point(p)) == p` (up to floating point).
    #[inline]
    pub fn local_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.translation)
    }

    /// Convert to nalgebra `Isometry3` for use with parry3d queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }
}
