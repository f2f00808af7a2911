use nalgebra as na;
use std::f32::consts::PI;

use crate::constants::DIST_EPS;
use crate::types::{Quat, Vec3};

/// A parametric path shape, evaluated on `t` in [0, 1].
///
/// Each variant carries only the control points meaningful for its kind.
/// Evaluation at `t = 0` yields `origin` and at `t = 1` yields `target`,
/// except for [`Curve::Swing`], whose endpoint is the swung rest vector
/// rotated about `target` by the full excursion.
///
/// Curves are cheap data; per-frame consumers should bake them once into a
/// [`BakedPath`](crate::curve::BakedPath) instead of evaluating closed
/// forms every tick.
#[derive(Clone, Copy, Debug)]
pub enum Curve {
    /// Straight segment from `origin` to `target`.
    Line { origin: Vec3, target: Vec3 },
    /// Three-point Bezier pulled toward a single weight point.
    QuadraticBezier {
        origin: Vec3,
        weighted: Vec3,
        target: Vec3,
    },
    /// Four-point Bezier with two interior control points.
    CubicBezier {
        origin: Vec3,
        control_a: Vec3,
        control_b: Vec3,
        target: Vec3,
    },
    /// Pendulum arc: `origin` swings about the pivot `target`, with the
    /// excursion derived from the angle between the pivot arm and
    /// straight-down doubled (a symmetric swing through the rest pose).
    ///
    /// With `smooth_speed` the excursion is eased so the angular rate is
    /// zero at both ends of the arc instead of constant.
    Swing {
        origin: Vec3,
        target: Vec3,
        smooth_speed: bool,
    },
}

impl Curve {
    /// The curve's start point (`t = 0`).
    #[inline]
    pub fn origin(&self) -> Vec3 {
        match *self {
            Curve::Line { origin, .. }
            | Curve::QuadraticBezier { origin, .. }
            | Curve::CubicBezier { origin, .. }
            | Curve::Swing { origin, .. } => origin,
        }
    }

    /// The curve's end anchor. For [`Curve::Swing`] this is the pivot, not
    /// the `t = 1` sample.
    #[inline]
    pub fn target(&self) -> Vec3 {
        match *self {
            Curve::Line { target, .. }
            | Curve::QuadraticBezier { target, .. }
            | Curve::CubicBezier { target, .. }
            | Curve::Swing { target, .. } => target,
        }
    }

    /// Evaluate the closed form at `t` (callers pass `t` in [0, 1]).
    pub fn point_at(&self, t: f32) -> Vec3 {
        match *self {
            Curve::Line { origin, target } => origin.lerp(&target, t),
            Curve::QuadraticBezier {
                origin,
                weighted,
                target,
            } => quadratic_bezier(origin, weighted, target, t),
            Curve::CubicBezier {
                origin,
                control_a,
                control_b,
                target,
            } => cubic_bezier(origin, control_a, control_b, target, t),
            Curve::Swing {
                origin,
                target,
                smooth_speed,
            } => swing_point(origin, target, smooth_speed, t),
        }
    }

    /// True when a swing curve has no usable rotation axis (pivot arm
    /// vertical or zero length) and evaluation falls back to the
    /// documented degenerate behavior.
    pub fn swing_axis_degenerate(&self) -> bool {
        match *self {
            Curve::Swing { origin, target, .. } => {
                let v = origin - target;
                v.norm_squared() <= DIST_EPS * DIST_EPS
                    || Vec3::y().cross(&v).norm_squared() <= DIST_EPS * DIST_EPS
            }
            _ => false,
        }
    }
}

fn quadratic_bezier(start: Vec3, weight: Vec3, end: Vec3, t: f32) -> Vec3 {
    let w1 = (1.0 - t) * (1.0 - t);
    let w2 = 2.0 * (1.0 - t) * t;
    let w3 = t * t;
    start * w1 + weight * w2 + end * w3
}

fn cubic_bezier(start: Vec3, control_a: Vec3, control_b: Vec3, end: Vec3, t: f32) -> Vec3 {
    let w1 = (1.0 - t) * (1.0 - t) * (1.0 - t);
    let w2 = 3.0 * (1.0 - t) * (1.0 - t) * t;
    let w3 = 3.0 * (1.0 - t) * t * t;
    let w4 = t * t * t;
    start * w1 + control_a * w2 + control_b * w3 + end * w4
}

/// Swing-arc evaluation.
///
/// The pivot arm is `origin - target`; the full excursion is twice the
/// signed angle from the arm to straight-down about the horizontal axis
/// orthogonal to the arm. Rotation preserves the arm length, so every
/// sample stays at the pivot distance.
///
/// Degenerate cases (no NaN ever leaves this function):
/// - arm length ~ 0: there is nothing to swing, every sample is `target`;
/// - arm parallel to +Y: the cross product has no direction, so the world
///   X axis (orthogonal to any vertical arm) is used instead.
fn swing_point(origin: Vec3, target: Vec3, smooth_speed: bool, t: f32) -> Vec3 {
    let arm = origin - target;
    if arm.norm_squared() <= DIST_EPS * DIST_EPS {
        return target;
    }

    let up = Vec3::y();
    let mut axis = up.cross(&arm);
    if axis.norm_squared() <= DIST_EPS * DIST_EPS {
        axis = Vec3::x();
    }
    let axis = na::Unit::new_normalize(axis);

    // Rest direction of a pendulum is straight down.
    let full_excursion = signed_angle(&arm, &-up, &axis) * 2.0;
    let angle = if smooth_speed {
        full_excursion * ((((1.0 + t) * PI).cos() + 1.0) * 0.5)
    } else {
        full_excursion * t
    };

    target + Quat::from_axis_angle(&axis, angle) * arm
}

/// Angle from `a` to `b` about `axis`, in radians, negative when the
/// rotation is clockwise looking down the axis.
fn signed_angle(a: &Vec3, b: &Vec3, axis: &na::Unit<Vec3>) -> f32 {
    let unsigned = a.angle(b);
    if a.cross(b).dot(axis) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}
