// src/scatter/stack.rs
use bevy::prelude::*;
use crate::scatter::plugin::{ScatterPlugin, ScatterPresetsPlugin};

pub struct ScatterStackPlugin;
impl Plugin for ScatterStackPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ScatterPlugin)          // panel + queue + pass system
           .add_plugins(ScatterPresetsPlugin);  // .scatter.ron presets
    }
}
