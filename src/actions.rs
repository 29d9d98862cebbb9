use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelAction {
    CycleShape,
    CreateShape,
    MoreSubdivisions,
    FewerSubdivisions,
    DensityUp,
    DensityDown,
    ToggleAlign,
    NextPreset,
    Scatter,
    Clear,
}

/// Panel actions triggered this frame.
#[derive(Default, Resource)]
pub struct ActionState {
    triggered: HashMap<PanelAction, bool>,
}

impl ActionState {
    pub fn set(&mut self, action: PanelAction, is_triggered: bool) {
        self.triggered.insert(action, is_triggered);
    }

    pub fn triggered(&self, action: PanelAction) -> bool {
        *self.triggered.get(&action).unwrap_or(&false)
    }
}
