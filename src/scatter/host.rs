// src/scatter/host.rs
//! The scene-graph surface a scatter pass drives. Implemented for Bevy in
//! `instancing::ecs_host`; tests can supply their own.

use bevy::prelude::*;

use super::core::{InstancePlacement, PlacementPoint, ScatterError};

pub trait SceneHost {
    /// Handle of the object being instanced.
    type Source: Copy;
    /// Handle of one created instance.
    type Instance: Clone;
    /// Handle of the group that collects a pass's instances.
    type Group;

    /// Current selection flattened into distinct world-space points.
    fn query_selected_points(&self) -> Result<Vec<PlacementPoint>, ScatterError>;

    /// Raw (not necessarily unit) world-space normal at `point`.
    fn query_vertex_normal(&self, point: &PlacementPoint) -> Result<Vec3, ScatterError>;

    fn create_instance(&mut self, source: Self::Source) -> Result<Self::Instance, ScatterError>;

    /// Applies `placement` verbatim and returns the resulting local transform.
    fn apply_transform(
        &mut self,
        instance: &Self::Instance,
        placement: InstancePlacement,
    ) -> Result<Transform, ScatterError>;

    fn group(&mut self, instances: &[Self::Instance]) -> Result<Self::Group, ScatterError>;
}
