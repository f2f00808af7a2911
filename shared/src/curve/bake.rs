use crate::types::Vec3;

use super::Curve;

/// A curve baked down to an ordered polyline for cheap per-frame lookup.
///
/// Baking happens once at configuration time; the result is read-only and
/// may be sampled any number of times per tick without touching the
/// closed forms again.
#[derive(Clone, Debug)]
pub struct BakedPath {
    points: Vec<Vec3>,
    length: f32,
}

impl BakedPath {
    /// Sample `curve` into a polyline.
    ///
    /// - [`Curve::Line`] always bakes to exactly its two endpoints,
    ///   whatever `precision` says; its length is the endpoint distance.
    /// - Every other kind bakes `precision` samples at `t = i/(precision-1)`.
    ///   A `precision` below 2 cannot form a segment and is clamped to 2.
    ///
    /// The reported length is the sum of consecutive sample distances — a
    /// piecewise-linear approximation, not the analytic arc length. The
    /// boost sequencer divides traversal speeds by this same value, so the
    /// approximation error cancels out of the traversal timing and must
    /// not be "improved" independently of it.
    pub fn bake(curve: &Curve, precision: usize) -> Self {
        if let Curve::Line { origin, target } = *curve {
            return Self {
                points: vec![origin, target],
                length: (target - origin).norm(),
            };
        }

        if curve.swing_axis_degenerate() {
            log::warn!("baking a swing curve with a degenerate axis; using fallback evaluation");
        }

        let samples = if precision < 2 {
            log::warn!("bake precision {precision} cannot form a segment, clamping to 2");
            2
        } else {
            precision
        };

        let mut points = Vec::with_capacity(samples);
        for i in 0..samples {
            let t = i as f32 / (samples - 1) as f32;
            points.push(curve.point_at(t));
        }

        let length = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();

        Self { points, length }
    }

    /// The baked samples, in curve order. Always at least 2.
    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Piecewise-linear path length in meters (see [`BakedPath::bake`]).
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_bakes_to_exactly_two_samples() {
        let curve = Curve::Line {
            origin: Vec3::zeros(),
            target: Vec3::new(0.0, 10.0, 0.0),
        };

        // Precision is irrelevant for straight lines.
        let path = BakedPath::bake(&curve, 64);
        assert_eq!(path.points().len(), 2);
        assert!((path.length() - 10.0).abs() < 1.0e-6);
    }

    #[test]
    fn non_linear_bakes_the_requested_sample_count() {
        let curve = Curve::QuadraticBezier {
            origin: Vec3::zeros(),
            weighted: Vec3::new(1.0, 2.0, 0.0),
            target: Vec3::new(2.0, 0.0, 0.0),
        };

        let path = BakedPath::bake(&curve, 20);
        assert_eq!(path.points().len(), 20);
        assert_eq!(path.points()[0], curve.point_at(0.0));
        assert_eq!(path.points()[19], curve.point_at(1.0));
    }

    #[test]
    fn sub_two_precision_clamps_to_two() {
        let curve = Curve::CubicBezier {
            origin: Vec3::zeros(),
            control_a: Vec3::x(),
            control_b: Vec3::y(),
            target: Vec3::new(1.0, 1.0, 0.0),
        };

        assert_eq!(BakedPath::bake(&curve, 0).points().len(), 2);
        assert_eq!(BakedPath::bake(&curve, 1).points().len(), 2);
    }

    #[test]
    fn collapsed_curve_has_zero_length() {
        // Every control point at the origin: all samples coincide.
        let curve = Curve::QuadraticBezier {
            origin: Vec3::zeros(),
            weighted: Vec3::zeros(),
            target: Vec3::zeros(),
        };

        let path = BakedPath::bake(&curve, 20);
        assert_eq!(path.length(), 0.0);
        assert!(path.points().iter().all(|p| *p == Vec3::zeros()));
    }

    #[test]
    fn curved_path_is_longer_than_its_chord() {
        let origin = Vec3::zeros();
        let target = Vec3::new(4.0, 0.0, 0.0);
        let curve = Curve::QuadraticBezier {
            origin,
            weighted: Vec3::new(2.0, 3.0, 0.0),
            target,
        };

        let path = BakedPath::bake(&curve, 32);
        assert!(path.length() > (target - origin).norm());
    }

    #[test]
    fn degenerate_swing_bakes_finite_points() {
        let curve = Curve::Swing {
            origin: Vec3::zeros(),
            target: Vec3::new(0.0, 5.0, 0.0),
            smooth_speed: false,
        };

        let path = BakedPath::bake(&curve, 16);
        assert_eq!(path.points().len(), 16);
        assert!(path.length().is_finite());
        assert!(path.points().iter().all(|p| p.iter().all(|c| c.is_finite())));
    }
}
