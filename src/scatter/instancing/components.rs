// src/scatter/instancing/components.rs
use bevy::prelude::*;

/// Which vertices of a target's mesh are selected for scattering.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub enum VertexSelection {
    #[default]
    All,
    Indices(Vec<u32>),
}

/// Marks an entity whose mesh vertices can be scattered onto.
#[derive(Component, Clone, Copy, Debug, Default)]
#[require(VertexSelection)]
pub struct ScatterTarget;

/// Marker on every spawned scatter instance.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScatterInstance {
    /// The object this instance shares geometry with.
    pub source: Entity,
}

/// Parent collecting one pass's instances.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScatterGroup {
    pub pass: u64,
}
