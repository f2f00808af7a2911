/*!
Climbable-surface registry and grab-probe queries.

Surfaces are immutable shapes with a per-tick mutable pose: the host
updates the pose of anything that moves (platforms, boosted handles)
before the climbing controller's late pass, and the controller recomposes
hand attach points against the fresh pose. Narrow-phase math is parry's,
through the `rapier3d::parry` re-export:

- sphere probe: `PointQuery::project_point` per surface, keep the nearest
  projection inside the probe radius (the VR hand test)
- ray probe:    `RayCast::cast_ray_and_get_normal` per surface, keep the
  earliest time of impact (the desktop head test)

Layer membership is a plain bit mask; a probe only sees surfaces whose
`layers` intersect its mask.
*/

use nalgebra as na;
use rapier3d::parry::query::{PointQuery, Ray, RayCast};
use rapier3d::parry::shape as pshape;
use rapier3d::prelude::SharedShape;

use crate::constants::DIST_EPS;
use crate::types::{Iso, Transform, Vec3};

/// Identifier for a registered surface. Stable for the surface's lifetime.
pub type SurfaceId = u32;

/// Collision shapes a climbable surface can take.
///
/// - Plane: infinite half-space; the world normal is derived from the
///   surface pose as `rotation * +Y`, offset along that normal.
/// - Everything else is posed directly by the surface transform.
#[derive(Clone, Copy, Debug)]
pub enum SurfaceShape {
    Plane {
        /// Offset along the derived plane normal (meters).
        offset_along_normal: f32,
    },
    Cuboid {
        /// Local-space half-extents (hx, hy, hz).
        half_extents: Vec3,
    },
    Sphere {
        /// Radius in meters.
        radius: f32,
    },
    CapsuleY {
        /// Radius of the caps and cylinder (meters).
        radius: f32,
        /// Half of the cylinder length along local +Y (meters).
        half_height: f32,
    },
}

/// One grabbable surface: shape, current pose, and layer membership.
#[derive(Clone, Copy, Debug)]
pub struct ClimbSurface {
    pub id: SurfaceId,
    pub shape: SurfaceShape,
    pub transform: Transform,
    pub layers: u32,
}

/// Result of a sphere overlap probe: the closest point on the nearest
/// surface within the probe radius.
#[derive(Clone, Copy, Debug)]
pub struct OverlapHit {
    pub surface: SurfaceId,
    /// Closest point on the surface (the probe center itself if the
    /// center is inside the surface).
    pub point: Vec3,
    /// Distance from the probe center to `point` (0 when inside).
    pub distance: f32,
}

/// Result of a ray probe: earliest surface hit along the ray.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub surface: SurfaceId,
    /// World-space impact point.
    pub point: Vec3,
    /// World-space surface normal at the impact, flipped to oppose the
    /// ray direction.
    pub normal: Vec3,
    /// Distance along the (normalized) ray at which the hit occurred.
    pub time_of_impact: f32,
}

/// The set of surfaces a climbing probe can see.
#[derive(Default)]
pub struct SurfaceSet {
    surfaces: Vec<ClimbSurface>,
}

impl SurfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface. Ids are caller-assigned; a duplicate id would
    /// shadow the earlier entry in lookups and is a host bug.
    pub fn insert(&mut self, surface: ClimbSurface) {
        self.surfaces.push(surface);
    }

    #[inline]
    pub fn get(&self, id: SurfaceId) -> Option<&ClimbSurface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    /// Update the pose of a moving surface. Call before the climbing late
    /// pass so attached hands read the fresh pose.
    pub fn set_transform(&mut self, id: SurfaceId, transform: Transform) {
        if let Some(s) = self.surfaces.iter_mut().find(|s| s.id == id) {
            s.transform = transform;
        }
    }

    /// Overlap a sphere against every surface matching `mask`; return the
    /// closest point on the nearest overlapped surface.
    pub fn probe_sphere(&self, center: Vec3, radius: f32, mask: u32) -> Option<OverlapHit> {
        let center_pt = na::Point3::from(center);
        let mut best: Option<OverlapHit> = None;

        for s in &self.surfaces {
            if s.layers & mask == 0 {
                continue;
            }

            let (shape, iso) = shape_and_iso(s);
            let proj = shape.project_point(&iso, &center_pt, true);
            let distance = if proj.is_inside {
                0.0
            } else {
                (proj.point.coords - center).norm()
            };

            if distance <= radius && best.map_or(true, |b| distance < b.distance) {
                best = Some(OverlapHit {
                    surface: s.id,
                    point: proj.point.coords,
                    distance,
                });
            }
        }

        best
    }

    /// Cast a ray against every surface matching `mask`; return the
    /// earliest hit within `max_dist` meters.
    pub fn probe_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: u32) -> Option<RayHit> {
        let Some(dir) = na::Unit::try_new(dir, DIST_EPS) else {
            log::warn!("surface ray probe with a zero direction, ignoring");
            return None;
        };
        let ray = Ray::new(na::Point3::from(origin), dir.into_inner());

        let mut best: Option<RayHit> = None;
        for s in &self.surfaces {
            if s.layers & mask == 0 {
                continue;
            }

            let (shape, iso) = shape_and_iso(s);
            if let Some(hit) = shape.cast_ray_and_get_normal(&iso, &ray, max_dist, true) {
                if best.map_or(true, |b| hit.time_of_impact < b.time_of_impact) {
                    // Normal opposes the ray; a zero normal (cast started
                    // inside the shape) falls back the same way.
                    let mut normal = hit.normal;
                    if normal.norm_squared() <= DIST_EPS * DIST_EPS
                        || normal.dot(&dir) > 0.0
                    {
                        normal = -dir.into_inner();
                    }
                    best = Some(RayHit {
                        surface: s.id,
                        point: ray.point_at(hit.time_of_impact).coords,
                        normal,
                        time_of_impact: hit.time_of_impact,
                    });
                }
            }
        }

        best
    }
}

/// Parry shape + query isometry for a surface.
///
/// Planes are rebuilt from the pose the way the collider layer does it:
/// normal = rotation * +Y, positioned at `normal * dist`.
fn shape_and_iso(s: &ClimbSurface) -> (SharedShape, Iso) {
    match s.shape {
        SurfaceShape::Plane {
            offset_along_normal,
        } => {
            let n = s.transform.rotation * Vec3::y();
            let dist = n.dot(&s.transform.translation) + offset_along_normal;
            let unit_n = na::Unit::new_normalize(n);
            let iso = Iso::from_parts(
                na::Translation3::from(unit_n.into_inner() * dist),
                na::UnitQuaternion::identity(),
            );
            (SharedShape::new(pshape::HalfSpace::new(unit_n)), iso)
        }
        SurfaceShape::Cuboid { half_extents } => (
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            s.transform.iso(),
        ),
        SurfaceShape::Sphere { radius } => (SharedShape::ball(radius), s.transform.iso()),
        SurfaceShape::CapsuleY {
            radius,
            half_height,
        } => (
            SharedShape::new(pshape::Capsule::new_y(half_height, radius)),
            s.transform.iso(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Quat;

    const MASK: u32 = 1;

    fn wall(id: SurfaceId, x: f32) -> ClimbSurface {
        // A 2x2x0.2 panel standing at the given x, facing the origin.
        ClimbSurface {
            id,
            shape: SurfaceShape::Cuboid {
                half_extents: Vec3::new(0.1, 1.0, 1.0),
            },
            transform: Transform::new(Vec3::new(x, 0.0, 0.0), Quat::identity()),
            layers: MASK,
        }
    }

    fn approx(a: Vec3, b: Vec3) {
        assert!((a - b).norm() < 1.0e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn sphere_probe_snaps_to_the_surface() {
        let mut set = SurfaceSet::new();
        set.insert(wall(7, 2.0));

        // Probe just off the inner face at x = 1.9.
        let hit = set
            .probe_sphere(Vec3::new(1.85, 0.0, 0.0), 0.1, MASK)
            .expect("overlap expected");
        assert_eq!(hit.surface, 7);
        approx(hit.point, Vec3::new(1.9, 0.0, 0.0));
        assert!((hit.distance - 0.05).abs() < 1.0e-4);
    }

    #[test]
    fn sphere_probe_misses_outside_radius() {
        let mut set = SurfaceSet::new();
        set.insert(wall(7, 2.0));

        assert!(set.probe_sphere(Vec3::new(1.0, 0.0, 0.0), 0.1, MASK).is_none());
    }

    #[test]
    fn sphere_probe_prefers_the_nearest_surface() {
        let mut set = SurfaceSet::new();
        set.insert(wall(1, 2.0));
        set.insert(wall(2, -2.05));

        // Slightly nearer the right-hand wall.
        let hit = set
            .probe_sphere(Vec3::new(0.0, 0.0, 0.0), 5.0, MASK)
            .expect("both walls in range");
        assert_eq!(hit.surface, 1);
    }

    #[test]
    fn sphere_probe_inside_a_surface_has_zero_distance() {
        let mut set = SurfaceSet::new();
        set.insert(wall(3, 0.0));

        let hit = set
            .probe_sphere(Vec3::new(0.0, 0.0, 0.0), 0.5, MASK)
            .expect("center is inside the panel");
        assert_eq!(hit.distance, 0.0);
        approx(hit.point, Vec3::zeros());
    }

    #[test]
    fn layer_mask_filters_surfaces() {
        let mut set = SurfaceSet::new();
        let mut decoration = wall(9, 2.0);
        decoration.layers = 1 << 4;
        set.insert(decoration);

        assert!(set.probe_sphere(Vec3::new(1.85, 0.0, 0.0), 0.2, MASK).is_none());
        assert!(
            set.probe_sphere(Vec3::new(1.85, 0.0, 0.0), 0.2, 1 << 4)
                .is_some()
        );
    }

    #[test]
    fn ray_probe_reports_point_and_opposing_normal() {
        let mut set = SurfaceSet::new();
        set.insert(wall(5, 2.0));

        let hit = set
            .probe_ray(Vec3::zeros(), Vec3::x(), 10.0, MASK)
            .expect("wall ahead");
        assert_eq!(hit.surface, 5);
        approx(hit.point, Vec3::new(1.9, 0.0, 0.0));
        approx(hit.normal, -Vec3::x());
        assert!((hit.time_of_impact - 1.9).abs() < 1.0e-4);
    }

    #[test]
    fn ray_probe_respects_reach() {
        let mut set = SurfaceSet::new();
        set.insert(wall(5, 2.0));

        assert!(set.probe_ray(Vec3::zeros(), Vec3::x(), 1.0, MASK).is_none());
    }

    #[test]
    fn ray_probe_picks_the_earliest_hit() {
        let mut set = SurfaceSet::new();
        set.insert(wall(1, 4.0));
        set.insert(wall(2, 2.0));

        let hit = set
            .probe_ray(Vec3::zeros(), Vec3::x(), 10.0, MASK)
            .expect("two walls ahead");
        assert_eq!(hit.surface, 2);
    }

    #[test]
    fn ray_probe_hits_a_plane() {
        let mut set = SurfaceSet::new();
        set.insert(ClimbSurface {
            id: 11,
            shape: SurfaceShape::Plane {
                offset_along_normal: 0.0,
            },
            transform: Transform::identity(),
            layers: MASK,
        });

        let hit = set
            .probe_ray(Vec3::new(0.0, 3.0, 0.0), -Vec3::y(), 10.0, MASK)
            .expect("ground plane below");
        approx(hit.point, Vec3::zeros());
        approx(hit.normal, Vec3::y());
    }

    #[test]
    fn moved_surface_is_probed_at_its_new_pose() {
        let mut set = SurfaceSet::new();
        set.insert(wall(8, 2.0));

        set.set_transform(
            8,
            Transform::new(Vec3::new(2.0, 5.0, 0.0), Quat::identity()),
        );

        assert!(set.probe_ray(Vec3::zeros(), Vec3::x(), 10.0, MASK).is_none());
        assert!(
            set.probe_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::x(), 10.0, MASK)
                .is_some()
        );
    }

    #[test]
    fn zero_direction_ray_is_rejected() {
        let mut set = SurfaceSet::new();
        set.insert(wall(1, 2.0));

        assert!(set.probe_ray(Vec3::zeros(), Vec3::zeros(), 10.0, MASK).is_none());
    }
}
