use nalgebra as na;

use crate::constants::DIST_EPS;
use crate::types::Vec3;

use super::BakedPath;

/// Position and travel direction on a baked path at some normalized time.
///
/// Ephemeral: recomputed on every query, never stored.
#[derive(Clone, Copy, Debug)]
pub struct PathPose {
    pub position: Vec3,
    /// Direction of travel through the containing segment. Piecewise
    /// constant within a segment; both endpoints use the direction of
    /// travel (the end pose is not reversed).
    pub forward: na::UnitVector3<f32>,
}

impl BakedPath {
    /// Sample the path at normalized time `t`.
    ///
    /// `t` outside [0, 1] is clamped, never rejected. Position is linearly
    /// interpolated inside a segment and continuous across segment
    /// boundaries; `forward` snaps per segment.
    pub fn place(&self, t: f32) -> PathPose {
        let t = t.clamp(0.0, 1.0);
        let points = self.points();
        let last = points.len() - 1;

        if t <= 0.0 {
            return PathPose {
                position: points[0],
                forward: segment_dir(points[0], points[1]),
            };
        }
        if t >= 1.0 {
            return PathPose {
                position: points[last],
                forward: segment_dir(points[last - 1], points[last]),
            };
        }

        let local = t * last as f32;
        // The min guard covers float rounding pushing floor(local) to the
        // final sample even though t < 1.
        let segment = (local.floor() as usize).min(last - 1);
        let frac = local - segment as f32;

        PathPose {
            position: points[segment].lerp(&points[segment + 1], frac),
            forward: segment_dir(points[segment], points[segment + 1]),
        }
    }
}

/// Travel direction from `a` to `b`, falling back to the engine forward
/// (-Z) for a collapsed segment so callers never see a NaN direction.
#[inline]
fn segment_dir(a: Vec3, b: Vec3) -> na::UnitVector3<f32> {
    na::Unit::try_new(b - a, DIST_EPS).unwrap_or_else(|| na::Unit::new_unchecked(-Vec3::z()))
}
