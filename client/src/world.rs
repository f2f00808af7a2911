//! Demo world: a climbing wall, a booster line, camera and light.

use bevy::prelude::*;
use shared::constants::DEFAULT_BAKE_PRECISION;
use shared::{
    BakedPath, BoostConfig, Booster, ClimbSurface, Curve, SurfaceId, SurfaceSet, SurfaceShape,
};

use crate::booster::BoosterLine;
use crate::climbing::Surfaces;
use crate::convert::{to_bevy, to_core, to_core_transform};

/// Layer bit for grabbable geometry (the default climbing mask).
const CLIMBABLE: u32 = 1;

const WALL_SURFACE: SurfaceId = 1;
const HANDLE_SURFACE: SurfaceId = 2;

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(Surfaces(SurfaceSet::new()));
    app.add_systems(Startup, setup);
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut surfaces: ResMut<Surfaces>,
) {
    // Ground. Visual only; the player's floor clamp does the rest.
    commands.spawn((
        Transform::from_xyz(0.0, 0.0, 0.0),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(50., 50.).build())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.3, 0.25),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
    ));

    // Climbing wall in front of the spawn.
    let wall_tf = Transform::from_xyz(0.0, 3.0, -4.0);
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(6.0, 6.0, 0.4))),
        MeshMaterial3d(materials.add(Color::srgb_u8(124, 144, 255))),
        wall_tf,
    ));
    surfaces.0.insert(ClimbSurface {
        id: WALL_SURFACE,
        shape: SurfaceShape::Cuboid {
            half_extents: to_core(Vec3::new(3.0, 3.0, 0.2)),
        },
        transform: to_core_transform(&wall_tf),
        layers: CLIMBABLE,
    });

    // Booster line: a weighted arc from the wall top down across the
    // arena. The handle at its start is itself climbable; grabbing it
    // starts the cycle.
    let curve = Curve::QuadraticBezier {
        origin: to_core(Vec3::new(2.5, 5.5, -4.0)),
        weighted: to_core(Vec3::new(6.0, 7.0, 2.0)),
        target: to_core(Vec3::new(-5.0, 1.5, 6.0)),
    };
    let path = BakedPath::bake(&curve, DEFAULT_BAKE_PRECISION);
    let handle_tf = Transform::from_translation(to_bevy(path.place(0.0).position));

    surfaces.0.insert(ClimbSurface {
        id: HANDLE_SURFACE,
        shape: SurfaceShape::Sphere { radius: 0.3 },
        transform: to_core_transform(&handle_tf),
        layers: CLIMBABLE,
    });
    commands.spawn((
        BoosterLine::new(
            Booster::new(BoostConfig::default(), path.length()),
            path,
            HANDLE_SURFACE,
        ),
        Mesh3d(meshes.add(Mesh::from(Sphere { radius: 0.3 }))),
        MeshMaterial3d(materials.add(Color::srgb(1.0, 0.6, 0.1))),
        handle_tf,
    ));

    // Light.
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    // Camera behind and above the spawn, looking at the wall.
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 4.5, 9.0).looking_at(Vec3::new(0.0, 2.5, -4.0), Vec3::Y),
    ));
}
