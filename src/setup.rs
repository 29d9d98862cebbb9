use bevy::prelude::*;

use crate::input::CameraOrbit;
use scatter_tool::scatter::config::{AxisRanges, RandomRange};
use scatter_tool::scatter::instancing::ScatterTarget;
use scatter_tool::scatter::plugin::ScatterPanel;
use scatter_tool::scatter::shapes::{create_primitive_mesh, PrimitiveKind, Subdivisions};

#[derive(Component)]
pub struct MainCamera;

/// Entities the panel scatters with.
#[derive(Resource, Clone, Copy)]
pub struct DemoScene {
    pub target: Entity,
    pub source: Entity,
}

/// Where freshly created source shapes are parked.
pub const SOURCE_SLOT: Vec3 = Vec3::new(-3.0, 0.5, 0.0);

const SPIN_Y: RandomRange = RandomRange::between(0.0, 360.0);
const SOURCE_SCALE: RandomRange = RandomRange::between(0.15, 0.3);

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut panel: ResMut<ScatterPanel>,
) {
    // 1) Light
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    // 2) Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 4.5, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        CameraOrbit {
            focus: Vec3::ZERO,
            radius: 10.0,
            yaw: 0.0,
            pitch: 0.4,
        },
    ));

    // 3) Scatter target: a finely subdivided sphere
    let target = commands
        .spawn((
            Name::new("Sphere"),
            ScatterTarget,
            Mesh3d(meshes.add(create_primitive_mesh(PrimitiveKind::Sphere, Subdivisions::new(24, 16, 0)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.35, 0.55, 0.3),
                ..default()
            })),
            Transform::from_scale(Vec3::splat(4.0)),
        ))
        .id();

    // 4) Source object: a small cone
    let source = commands
        .spawn((
            Name::new("Cone"),
            Mesh3d(meshes.add(create_primitive_mesh(PrimitiveKind::Cone, PrimitiveKind::Cone.default_subdivisions()))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.8, 0.5, 0.2),
                ..default()
            })),
            Transform::from_translation(SOURCE_SLOT).with_scale(Vec3::splat(0.2)),
        ))
        .id();

    commands.insert_resource(DemoScene { target, source });

    // 5) Panel starting values sized for the demo sphere
    panel.config.density = 0.3;
    panel.config.align_to_normal = true;
    panel.config.rotation.y = SPIN_Y;
    panel.config.scale = AxisRanges::splat(SOURCE_SCALE);
}
