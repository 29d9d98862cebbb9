use bevy::prelude::*;

mod setup;
mod input;
mod actions;
mod ui;

// re-export the bits we actually need in main
use actions::ActionState;
use input::{camera_controller, input_mapping_system, panel_action_system};
use ui::{spawn_panel_overlay, update_panel_overlay};
use scatter_tool::scatter::ScatterStackPlugin;

fn main() {
    App::new()
        // core engine plugins (LogPlugin included)
        .add_plugins(DefaultPlugins)
        // scatter panel, queue, pass system + presets
        .add_plugins(ScatterStackPlugin)
        .init_resource::<ActionState>()
        // camera, light, target + source objects
        .add_systems(Startup, (setup::setup, spawn_panel_overlay))
        // input -> panel actions -> overlay
        .add_systems(
            Update,
            (
                input_mapping_system,
                panel_action_system.after(input_mapping_system),
                camera_controller,
                update_panel_overlay.after(panel_action_system),
            ),
        )
        .run();
}
