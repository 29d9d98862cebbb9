// src/scatter/instancing/ecs_host.rs
//! `SceneHost` over a Bevy `World`.
//! Selection = vertices of the target's `Mesh3d` asset, transformed to world space
//! and welded so split seam/pole vertices count once.
//! Instances = entities sharing the source's mesh/material handles.

use bevy::pbr::MeshMaterial3d;
use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;

use crate::scatter::core::{InstancePlacement, PlacementPoint, ScatterError, WELD_EPSILON};
use crate::scatter::host::SceneHost;
use crate::scatter::placement::weld_points;

use super::components::{ScatterGroup, ScatterInstance, VertexSelection};

pub struct EcsSceneHost<'w> {
    world: &'w mut World,
    target: Entity,
    pass: u64,
}

impl<'w> EcsSceneHost<'w> {
    /// `pass` tags the group entity so passes can be told apart.
    pub fn new(world: &'w mut World, target: Entity, pass: u64) -> Self {
        Self { world, target, pass }
    }

    /// Target mesh plus its local-to-world matrix.
    fn target_mesh(&self) -> Result<(&Mesh, Mat4), ScatterError> {
        let world: &World = &*self.world;
        let mesh3d = world.get::<Mesh3d>(self.target).ok_or_else(|| {
            ScatterError::HostQuery(format!("target {:?} has no Mesh3d", self.target))
        })?;
        let meshes = world
            .get_resource::<Assets<Mesh>>()
            .ok_or_else(|| ScatterError::HostQuery("mesh assets unavailable".to_string()))?;
        let mesh = meshes.get(&mesh3d.0).ok_or_else(|| {
            ScatterError::HostQuery(format!("mesh for target {:?} is not loaded", self.target))
        })?;
        Ok((mesh, world_matrix(world, self.target)))
    }

    fn ensure_exists(&self, e: Entity) -> Result<(), ScatterError> {
        if self.world.entities().contains(e) {
            Ok(())
        } else {
            Err(ScatterError::HostQuery(format!("entity {e:?} does not exist")))
        }
    }
}

/// Local-to-world matrix composed up the `ChildOf` chain. Does not wait on
/// `GlobalTransform` propagation, so it is exact inside the same frame.
fn world_matrix(world: &World, entity: Entity) -> Mat4 {
    let local = |e: Entity| world.get::<Transform>(e).map_or(Mat4::IDENTITY, Transform::compute_matrix);
    let mut matrix = local(entity);
    let mut current = entity;
    while let Some(parent) = world.get::<ChildOf>(current).map(ChildOf::parent) {
        matrix = local(parent) * matrix;
        current = parent;
    }
    matrix
}

/// Borrow a `Float32x3` vertex attribute.
fn as_vec3s<'m>(
    values: Option<&'m VertexAttributeValues>,
    what: &str,
) -> Result<&'m [[f32; 3]], ScatterError> {
    match values {
        Some(VertexAttributeValues::Float32x3(v)) => Ok(v.as_slice()),
        Some(_) => Err(ScatterError::HostQuery(format!("{what} attribute is not Float32x3"))),
        None => Err(ScatterError::HostQuery(format!("mesh has no {what} attribute"))),
    }
}

fn vertex(values: &[[f32; 3]], index: u32) -> Result<Vec3, ScatterError> {
    values
        .get(index as usize)
        .map(|v| Vec3::from_array(*v))
        .ok_or_else(|| {
            ScatterError::HostQuery(format!(
                "vertex {index} out of range ({} vertices)",
                values.len()
            ))
        })
}

impl SceneHost for EcsSceneHost<'_> {
    type Source = Entity;
    type Instance = Entity;
    type Group = Entity;

    fn query_selected_points(&self) -> Result<Vec<PlacementPoint>, ScatterError> {
        let (mesh, matrix) = self.target_mesh()?;
        let positions = as_vec3s(mesh.attribute(Mesh::ATTRIBUTE_POSITION), "position")?;

        let indices: Vec<u32> = match self.world.get::<VertexSelection>(self.target) {
            None | Some(VertexSelection::All) => (0..positions.len() as u32).collect(),
            Some(VertexSelection::Indices(list)) => {
                let mut list = list.clone();
                list.sort_unstable();
                list.dedup();
                list
            }
        };

        let points = indices
            .into_iter()
            .map(|i| {
                let local = vertex(positions, i)?;
                Ok(PlacementPoint::new(i, matrix.transform_point3(local)))
            })
            .collect::<Result<Vec<_>, ScatterError>>()?;
        Ok(weld_points(points, WELD_EPSILON))
    }

    fn query_vertex_normal(&self, point: &PlacementPoint) -> Result<Vec3, ScatterError> {
        let (mesh, matrix) = self.target_mesh()?;
        let normals = as_vec3s(mesh.attribute(Mesh::ATTRIBUTE_NORMAL), "normal")?;
        let local = vertex(normals, point.vertex.0)?;

        // Normals transform by the inverse-transpose so non-uniform scale stays correct.
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        Ok(normal_matrix * local)
    }

    fn create_instance(&mut self, source: Entity) -> Result<Entity, ScatterError> {
        if !self.world.entities().contains(source) {
            return Err(ScatterError::MissingSource);
        }

        let mesh = self.world.get::<Mesh3d>(source).cloned();
        let material = self.world.get::<MeshMaterial3d<StandardMaterial>>(source).cloned();
        let name = self
            .world
            .get::<Name>(source)
            .map(|n| n.as_str().to_owned())
            .unwrap_or_else(|| "scatter".to_string());

        let mut e = self.world.spawn((
            ScatterInstance { source },
            Name::new(format!("{name}_instance")),
            Transform::default(),
            Visibility::default(),
        ));
        if let Some(m) = mesh { e.insert(m); }
        if let Some(m) = material { e.insert(m); }
        Ok(e.id())
    }

    fn apply_transform(
        &mut self,
        instance: &Entity,
        placement: InstancePlacement,
    ) -> Result<Transform, ScatterError> {
        let transform = placement.to_transform();
        let mut tf = self.world.get_mut::<Transform>(*instance).ok_or_else(|| {
            ScatterError::HostQuery(format!("instance {instance:?} has no Transform"))
        })?;
        *tf = transform;
        Ok(transform)
    }

    fn group(&mut self, instances: &[Entity]) -> Result<Entity, ScatterError> {
        for &e in instances {
            self.ensure_exists(e)?;
        }
        let group = self
            .world
            .spawn((
                Name::new("scatter_grp"),
                ScatterGroup { pass: self.pass },
                Transform::default(),
                Visibility::default(),
            ))
            .id();
        for &e in instances {
            self.world.entity_mut(e).insert(ChildOf(group));
        }
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter::instancing::ScatterTarget;
    use crate::scatter::shapes::{create_primitive_mesh, PrimitiveKind, Subdivisions};
    use bevy::render::mesh::PrimitiveTopology;

    fn point_mesh(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::PointList, Default::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh
    }

    fn world_with_target(transform: Transform) -> (World, Entity) {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        let handle = world.resource_mut::<Assets<Mesh>>().add(point_mesh(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 2.0]],
        ));
        let target = world.spawn((ScatterTarget, Mesh3d(handle), transform)).id();
        (world, target)
    }

    #[test]
    fn selection_is_in_world_space() {
        let (mut world, target) = world_with_target(Transform::from_xyz(10.0, 0.0, 0.0));
        let host = EcsSceneHost::new(&mut world, target, 0);
        let points = host.query_selected_points().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], PlacementPoint::new(1, Vec3::new(11.0, 0.0, 0.0)));
    }

    #[test]
    fn explicit_selection_is_deduplicated() {
        let (mut world, target) = world_with_target(Transform::IDENTITY);
        world.entity_mut(target).insert(VertexSelection::Indices(vec![2, 0, 2]));
        let host = EcsSceneHost::new(&mut world, target, 0);
        let ids: Vec<u32> = host.query_selected_points().unwrap().iter().map(|p| p.vertex.0).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn out_of_range_selection_fails() {
        let (mut world, target) = world_with_target(Transform::IDENTITY);
        world.entity_mut(target).insert(VertexSelection::Indices(vec![9]));
        let host = EcsSceneHost::new(&mut world, target, 0);
        assert!(matches!(host.query_selected_points(), Err(ScatterError::HostQuery(_))));
    }

    #[test]
    fn normals_follow_target_rotation() {
        let rot = Transform::from_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let (mut world, target) = world_with_target(rot);
        let host = EcsSceneHost::new(&mut world, target, 0);
        let n = host.query_vertex_normal(&PlacementPoint::new(0, Vec3::ZERO)).unwrap();
        assert!((n - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn parented_target_reads_in_world_space() {
        let (mut world, target) = world_with_target(Transform::from_xyz(0.0, 5.0, 0.0));
        let parent = world
            .spawn(
                Transform::from_xyz(100.0, 0.0, 0.0)
                    .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
            )
            .id();
        world.entity_mut(target).insert(ChildOf(parent));

        let host = EcsSceneHost::new(&mut world, target, 0);
        let points = host.query_selected_points().unwrap();
        // local (0,5,0) rotated a quarter turn about Z lands on -X
        assert!((points[0].position - Vec3::new(95.0, 0.0, 0.0)).length() < 1e-4);
        let n = host.query_vertex_normal(&points[0]).unwrap();
        assert!((n - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn sphere_seams_and_poles_count_once() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        let sphere = create_primitive_mesh(PrimitiveKind::Sphere, Subdivisions::new(8, 8, 0));
        let raw = sphere.count_vertices();
        let handle = world.resource_mut::<Assets<Mesh>>().add(sphere);
        let target = world.spawn((ScatterTarget, Mesh3d(handle), Transform::from_scale(Vec3::splat(4.0)))).id();

        let host = EcsSceneHost::new(&mut world, target, 0);
        let points = host.query_selected_points().unwrap();
        // 7 inner rings of 8 plus both poles
        assert_eq!(raw, 81);
        assert_eq!(points.len(), 58);
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.position.distance(b.position) > WELD_EPSILON);
            }
            // welded points keep a vertex whose normal is readable
            let n = host.query_vertex_normal(a).unwrap();
            assert!(n.length() > 0.0);
        }
    }

    #[test]
    fn target_without_mesh_is_a_query_error() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        let target = world.spawn(ScatterTarget).id();
        let host = EcsSceneHost::new(&mut world, target, 0);
        assert!(matches!(host.query_selected_points(), Err(ScatterError::HostQuery(_))));
    }

    #[test]
    fn instances_share_source_mesh_and_get_grouped() {
        let (mut world, target) = world_with_target(Transform::IDENTITY);
        let mesh = world.get::<Mesh3d>(target).unwrap().clone();
        let source = world.spawn((Name::new("Cone"), mesh.clone())).id();

        let mut host = EcsSceneHost::new(&mut world, target, 3);
        let a = host.create_instance(source).unwrap();
        let b = host.create_instance(source).unwrap();
        let applied = host
            .apply_transform(&a, InstancePlacement::Trs {
                translation: Vec3::new(1.0, 2.0, 3.0),
                rotation_deg: Vec3::ZERO,
                scale: Vec3::ONE,
            })
            .unwrap();
        let group = host.group(&[a, b]).unwrap();

        assert_eq!(applied.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world.get::<Transform>(a).unwrap().translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world.get::<Mesh3d>(b).unwrap().0, mesh.0);
        assert_eq!(world.get::<ScatterInstance>(a), Some(&ScatterInstance { source }));
        assert_eq!(world.get::<Name>(a).unwrap().as_str(), "Cone_instance");
        assert_eq!(world.get::<ScatterGroup>(group), Some(&ScatterGroup { pass: 3 }));
        assert_eq!(world.get::<ChildOf>(b).unwrap().parent(), group);
        assert_eq!(world.get::<Children>(group).unwrap().len(), 2);
    }

    #[test]
    fn despawned_source_is_reported() {
        let (mut world, target) = world_with_target(Transform::IDENTITY);
        let source = world.spawn_empty().id();
        world.despawn(source);
        let mut host = EcsSceneHost::new(&mut world, target, 0);
        assert_eq!(host.create_instance(source), Err(ScatterError::MissingSource));
    }
}
