//! Bevy side of scatter instancing: marker components plus a `SceneHost`
//! that reads selections from mesh assets and spawns instances as entities.

pub mod components;
pub mod ecs_host;

pub use components::{ScatterGroup, ScatterInstance, ScatterTarget, VertexSelection};
pub use ecs_host::EcsSceneHost;
