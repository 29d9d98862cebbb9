use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::input::{mouse::MouseMotion, keyboard::KeyCode, ButtonInput};

use crate::actions::{PanelAction, ActionState};
use crate::setup::{DemoScene, MainCamera, SOURCE_SLOT};
use scatter_tool::scatter::instancing::ScatterGroup;
use scatter_tool::scatter::plugin::{ScatterPanel, ScatterPresetsHandle};
use scatter_tool::scatter::queue::ScatterQueue;
use scatter_tool::scatter::registry::ScatterPresets;
use scatter_tool::scatter::shapes::{create_primitive_mesh, Subdivisions};

pub const ROTATE_SPEED: f32 = 0.2;
pub const MAX_CAMERA_DT: f32 = 0.05; // never use a dt larger than 50ms
pub const DENSITY_STEP: f32 = 0.1;
pub const MAX_SUBDIVISIONS: u32 = 64;

#[derive(Component)]
pub struct CameraOrbit {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

pub fn input_mapping_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut action_state: ResMut<ActionState>,
) {
    action_state.set(PanelAction::CycleShape, keys.just_pressed(KeyCode::Tab));
    action_state.set(PanelAction::CreateShape, keys.just_pressed(KeyCode::KeyN));
    action_state.set(PanelAction::MoreSubdivisions, keys.just_pressed(KeyCode::ArrowRight));
    action_state.set(PanelAction::FewerSubdivisions, keys.just_pressed(KeyCode::ArrowLeft));
    action_state.set(PanelAction::DensityUp, keys.just_pressed(KeyCode::ArrowUp));
    action_state.set(PanelAction::DensityDown, keys.just_pressed(KeyCode::ArrowDown));
    action_state.set(PanelAction::ToggleAlign, keys.just_pressed(KeyCode::KeyL));
    action_state.set(PanelAction::NextPreset, keys.just_pressed(KeyCode::KeyP));
    action_state.set(PanelAction::Scatter, keys.just_pressed(KeyCode::Space));
    action_state.set(PanelAction::Clear, keys.just_pressed(KeyCode::Delete));
}

/// Snap density to the step grid so repeated presses don't drift.
fn step_density(density: f32, dir: f32) -> f32 {
    let steps = (density / DENSITY_STEP).round() + dir;
    (steps * DENSITY_STEP).clamp(0.0, 1.0)
}

/// Step every count together, kept within `1..=MAX_SUBDIVISIONS`.
fn step_subdivisions(s: Subdivisions, dir: i32) -> Subdivisions {
    let step = |v: u32| v.saturating_add_signed(dir).clamp(1, MAX_SUBDIVISIONS);
    Subdivisions::new(step(s.axis), step(s.height), step(s.base))
}

pub fn panel_action_system(
    mut commands: Commands,
    action_state: Res<ActionState>,
    mut panel: ResMut<ScatterPanel>,
    mut queue: ResMut<ScatterQueue>,
    mut scene: ResMut<DemoScene>,
    mut meshes: ResMut<Assets<Mesh>>,
    presets: Res<Assets<ScatterPresets>>,
    presets_handle: Res<ScatterPresetsHandle>,
    groups: Query<Entity, With<ScatterGroup>>,
    sources: Query<&MeshMaterial3d<StandardMaterial>>,
) {
    if action_state.triggered(PanelAction::CycleShape) {
        let next = panel.shape.next();
        panel.select_shape(next);
        info!("Panel: shape {} {:?}", next.label(), panel.subdivisions);
    }

    if action_state.triggered(PanelAction::MoreSubdivisions) {
        panel.subdivisions = step_subdivisions(panel.subdivisions, 1);
    }
    if action_state.triggered(PanelAction::FewerSubdivisions) {
        panel.subdivisions = step_subdivisions(panel.subdivisions, -1);
    }

    if action_state.triggered(PanelAction::DensityUp) {
        panel.config.density = step_density(panel.config.density, 1.0);
    }
    if action_state.triggered(PanelAction::DensityDown) {
        panel.config.density = step_density(panel.config.density, -1.0);
    }

    if action_state.triggered(PanelAction::ToggleAlign) {
        panel.config.align_to_normal = !panel.config.align_to_normal;
    }

    if action_state.triggered(PanelAction::NextPreset) {
        match presets.get(&presets_handle.0) {
            Some(p) => {
                if let Some(name) = panel.cycle_preset(p) {
                    info!("Panel: preset '{}'", name);
                }
            }
            None => warn!("Panel: presets not loaded yet"),
        }
    }

    // New source replaces the old one; instances already placed keep their mesh handles.
    if action_state.triggered(PanelAction::CreateShape) {
        let material = sources.get(scene.source).ok().cloned();
        let mesh = meshes.add(create_primitive_mesh(panel.shape, panel.subdivisions));
        let mut e = commands.spawn((
            Name::new(panel.shape.label()),
            Mesh3d(mesh),
            Transform::from_translation(SOURCE_SLOT).with_scale(Vec3::splat(0.2)),
        ));
        if let Some(m) = material { e.insert(m); }
        let new_source = e.id();
        commands.entity(scene.source).despawn();
        scene.source = new_source;
        info!("Panel: created {} as scatter source", panel.shape.label());
    }

    if action_state.triggered(PanelAction::Scatter) {
        queue.push(panel.request(scene.source, scene.target));
    }

    if action_state.triggered(PanelAction::Clear) {
        for e in &groups {
            commands.entity(e).despawn();
        }
    }
}

pub fn camera_controller(
    time: Res<Time>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut query: Query<(&mut Transform, &mut CameraOrbit), With<MainCamera>>,
) {
    // 0) Clamp delta
    let mut dt = time.delta_secs();
    if dt > MAX_CAMERA_DT {
        dt = MAX_CAMERA_DT;
    }

    let Ok((mut tf, mut orbit)) = query.single_mut() else { return; };

    // 1) Zoom
    for ev in scroll_evr.read() {
        let amount = match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.02,
        };
        orbit.radius = (orbit.radius - amount).clamp(2.0, 200.0);
    }

    // 2) Orbit
    if mouse_buttons.pressed(MouseButton::Middle) {
        for ev in motion_evr.read() {
            orbit.yaw += ev.delta.x * ROTATE_SPEED * dt;
            orbit.pitch += ev.delta.y * ROTATE_SPEED * dt;
        }
    } else {
        motion_evr.clear();
    }

    orbit.pitch = orbit.pitch.clamp(
        -std::f32::consts::FRAC_PI_2 + 0.01,
        std::f32::consts::FRAC_PI_2 - 0.01,
    );

    // 3) Position camera
    let xz_radius = orbit.radius * orbit.pitch.cos();
    let offset = Vec3::new(
        xz_radius * orbit.yaw.cos(),
        orbit.radius * orbit.pitch.sin(),
        xz_radius * orbit.yaw.sin(),
    );

    tf.translation = orbit.focus + offset;
    tf.look_at(orbit.focus, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_steps_snap_and_clamp() {
        assert!((step_density(0.3, 1.0) - 0.4).abs() < 1e-6);
        assert!((step_density(0.33, -1.0) - 0.2).abs() < 1e-6);
        assert_eq!(step_density(1.0, 1.0), 1.0);
        assert_eq!(step_density(0.0, -1.0), 0.0);
    }

    #[test]
    fn subdivision_steps_move_every_count() {
        let up = step_subdivisions(Subdivisions::new(8, 3, 0), 1);
        assert_eq!(up, Subdivisions::new(9, 4, 1));
        let down = step_subdivisions(Subdivisions::new(1, 2, 5), -1);
        assert_eq!(down, Subdivisions::new(1, 1, 4));
        let top = step_subdivisions(Subdivisions::new(MAX_SUBDIVISIONS, 1, 1), 1);
        assert_eq!(top.axis, MAX_SUBDIVISIONS);
    }
}
