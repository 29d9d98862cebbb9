// src/scatter/shapes.rs
//! Primitive creation helpers for scatter targets/sources.
//! Kinds map to defaults and mesh constructors through lookup tables.

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
}

/// Subdivision counts. Cube: width, height, depth. Sphere: sectors, stacks.
/// Cylinder and cone: sides, height segments, cap rings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivisions {
    pub axis: u32,
    pub height: u32,
    pub base: u32,
}

impl Subdivisions {
    pub const fn new(axis: u32, height: u32, base: u32) -> Self { Self { axis, height, base } }
}

type MeshCtor = fn(Subdivisions) -> Mesh;

struct PrimitiveEntry {
    kind: PrimitiveKind,
    label: &'static str,
    defaults: Subdivisions,
    build: MeshCtor,
}

static PRIMITIVES: [PrimitiveEntry; 4] = [
    PrimitiveEntry { kind: PrimitiveKind::Cube, label: "Cube", defaults: Subdivisions::new(1, 1, 1), build: cube_mesh },
    PrimitiveEntry { kind: PrimitiveKind::Sphere, label: "Sphere", defaults: Subdivisions::new(8, 8, 0), build: sphere_mesh },
    PrimitiveEntry { kind: PrimitiveKind::Cylinder, label: "Cylinder", defaults: Subdivisions::new(8, 4, 0), build: cylinder_mesh },
    PrimitiveEntry { kind: PrimitiveKind::Cone, label: "Cone", defaults: Subdivisions::new(8, 3, 0), build: cone_mesh },
];

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 4] = [
        PrimitiveKind::Cube,
        PrimitiveKind::Sphere,
        PrimitiveKind::Cylinder,
        PrimitiveKind::Cone,
    ];

    fn entry(self) -> &'static PrimitiveEntry {
        &PRIMITIVES[self as usize]
    }

    pub fn label(self) -> &'static str { self.entry().label }

    pub fn default_subdivisions(self) -> Subdivisions { self.entry().defaults }

    /// Next kind in panel order, wrapping.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }
}

/// Build the mesh for `kind`. Zero counts fall back to the kind's defaults.
pub fn create_primitive_mesh(kind: PrimitiveKind, subdiv: Subdivisions) -> Mesh {
    let entry = kind.entry();
    debug_assert_eq!(entry.kind, kind);
    let d = entry.defaults;
    let pick = |v: u32, fallback: u32| if v == 0 { fallback } else { v };
    let resolved = Subdivisions {
        axis: pick(subdiv.axis, d.axis),
        height: pick(subdiv.height, d.height),
        base: pick(subdiv.base, d.base),
    };
    (entry.build)(resolved)
}

// ---------- Mesh assembly ----------

/// Triangle-list buffers, filled face by face.
#[derive(Default)]
struct MeshParts {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshParts {
    fn next_index(&self) -> u32 {
        self.positions.len() as u32
    }

    fn push_vertex(&mut self, p: Vec3, n: Vec3, uv: Vec2) {
        self.positions.push(p.to_array());
        self.normals.push(n.to_array());
        self.uvs.push(uv.to_array());
    }

    /// Flat `cols x rows` grid spanning `u` and `v` around `center`; faces `u x v`.
    fn push_grid(&mut self, center: Vec3, u: Vec3, v: Vec3, cols: u32, rows: u32) {
        let base = self.next_index();
        let normal = u.cross(v).normalize();
        let corner = center - 0.5 * (u + v);
        for j in 0..=rows {
            let fv = j as f32 / rows as f32;
            for i in 0..=cols {
                let fu = i as f32 / cols as f32;
                self.push_vertex(corner + fu * u + fv * v, normal, Vec2::new(fu, 1.0 - fv));
            }
        }
        let stride = cols + 1;
        for j in 0..rows {
            for i in 0..cols {
                let a = base + j * stride + i;
                let c = a + stride;
                self.indices.extend_from_slice(&[a, a + 1, c + 1, a, c + 1, c]);
            }
        }
    }

    /// Side wall of a frustum around +Y, `bottom` radius at y = -h/2, `top` at +h/2.
    fn push_wall(&mut self, bottom: f32, top: f32, height: f32, sides: u32, segments: u32) {
        let base = self.next_index();
        for j in 0..=segments {
            let t = j as f32 / segments as f32;
            let radius = bottom + (top - bottom) * t;
            let y = (t - 0.5) * height;
            for i in 0..=sides {
                let s = i as f32 / sides as f32;
                let (sin, cos) = (s * TAU).sin_cos();
                let normal = Vec3::new(cos * height, bottom - top, sin * height).normalize();
                self.push_vertex(Vec3::new(cos * radius, y, sin * radius), normal, Vec2::new(s, 1.0 - t));
            }
        }
        let stride = sides + 1;
        for j in 0..segments {
            for i in 0..sides {
                let a = base + j * stride + i;
                let c = a + stride;
                self.indices.extend_from_slice(&[a, c, a + 1, a + 1, c, c + 1]);
            }
        }
    }

    /// Disc at height `y` made of `rings` concentric bands; `up` picks the facing.
    fn push_cap(&mut self, y: f32, radius: f32, sides: u32, rings: u32, up: bool) {
        let normal = if up { Vec3::Y } else { Vec3::NEG_Y };
        let center = self.next_index();
        self.push_vertex(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5));

        let stride = sides + 1;
        let ring_start = |k: u32| center + 1 + (k - 1) * stride;
        for k in 1..=rings {
            let r = radius * k as f32 / rings as f32;
            for i in 0..=sides {
                let (sin, cos) = (i as f32 / sides as f32 * TAU).sin_cos();
                let uv = Vec2::new(0.5 + 0.5 * cos * r / radius, 0.5 + 0.5 * sin * r / radius);
                self.push_vertex(Vec3::new(cos * r, y, sin * r), normal, uv);
            }
        }

        let mut tri = |a: u32, b: u32, c: u32| {
            if up {
                self.indices.extend_from_slice(&[a, b, c]);
            } else {
                self.indices.extend_from_slice(&[a, c, b]);
            }
        };
        for i in 0..sides {
            let outer = ring_start(1) + i;
            tri(center, outer + 1, outer);
        }
        for k in 2..=rings {
            for i in 0..sides {
                let inner = ring_start(k - 1) + i;
                let outer = ring_start(k) + i;
                tri(inner, outer + 1, outer);
                tri(inner, inner + 1, outer + 1);
            }
        }
    }

    fn build(self) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

// ---------- Constructors (unit size, centered on the origin) ----------

fn cube_mesh(s: Subdivisions) -> Mesh {
    let (w, h, d) = (s.axis.max(1), s.height.max(1), s.base.max(1));
    let mut parts = MeshParts::default();
    parts.push_grid(Vec3::X * 0.5, Vec3::NEG_Z, Vec3::Y, d, h);
    parts.push_grid(Vec3::NEG_X * 0.5, Vec3::Z, Vec3::Y, d, h);
    parts.push_grid(Vec3::Y * 0.5, Vec3::X, Vec3::NEG_Z, w, d);
    parts.push_grid(Vec3::NEG_Y * 0.5, Vec3::X, Vec3::Z, w, d);
    parts.push_grid(Vec3::Z * 0.5, Vec3::X, Vec3::Y, w, h);
    parts.push_grid(Vec3::NEG_Z * 0.5, Vec3::NEG_X, Vec3::Y, w, h);
    parts.build()
}

fn sphere_mesh(s: Subdivisions) -> Mesh {
    Sphere::new(0.5).mesh().uv(s.axis.max(3), s.height.max(2))
}

fn cylinder_mesh(s: Subdivisions) -> Mesh {
    let (sides, segments, rings) = (s.axis.max(3), s.height.max(1), s.base.max(1));
    let mut parts = MeshParts::default();
    parts.push_wall(0.5, 0.5, 1.0, sides, segments);
    parts.push_cap(0.5, 0.5, sides, rings, true);
    parts.push_cap(-0.5, 0.5, sides, rings, false);
    parts.build()
}

fn cone_mesh(s: Subdivisions) -> Mesh {
    let (sides, segments, rings) = (s.axis.max(3), s.height.max(1), s.base.max(1));
    let mut parts = MeshParts::default();
    parts.push_wall(0.5, 0.0, 1.0, sides, segments);
    parts.push_cap(-0.5, 0.5, sides, rings, false);
    parts.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    #[test]
    fn lookup_table_matches_kind_order() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(kind.entry().kind, kind);
        }
    }

    #[test]
    fn default_subdivisions() {
        assert_eq!(PrimitiveKind::Cube.default_subdivisions(), Subdivisions::new(1, 1, 1));
        assert_eq!(PrimitiveKind::Sphere.default_subdivisions(), Subdivisions::new(8, 8, 0));
        assert_eq!(PrimitiveKind::Cylinder.default_subdivisions(), Subdivisions::new(8, 4, 0));
        assert_eq!(PrimitiveKind::Cone.default_subdivisions(), Subdivisions::new(8, 3, 0));
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(PrimitiveKind::Cube.next(), PrimitiveKind::Sphere);
        assert_eq!(PrimitiveKind::Cone.next(), PrimitiveKind::Cube);
    }

    #[test]
    fn every_kind_builds_with_normals() {
        for kind in PrimitiveKind::ALL {
            let mesh = create_primitive_mesh(kind, kind.default_subdivisions());
            assert!(mesh.count_vertices() > 0, "{} has no vertices", kind.label());
            assert!(matches!(
                mesh.attribute(Mesh::ATTRIBUTE_NORMAL),
                Some(VertexAttributeValues::Float32x3(_))
            ));
        }
    }

    #[test]
    fn more_axis_subdivisions_give_more_vertices() {
        let coarse = create_primitive_mesh(PrimitiveKind::Sphere, Subdivisions::new(8, 8, 0));
        let fine = create_primitive_mesh(PrimitiveKind::Sphere, Subdivisions::new(16, 8, 0));
        assert!(fine.count_vertices() > coarse.count_vertices());
    }

    fn verts(kind: PrimitiveKind, a: u32, h: u32, b: u32) -> usize {
        create_primitive_mesh(kind, Subdivisions::new(a, h, b)).count_vertices()
    }

    #[test]
    fn every_count_shapes_the_cube() {
        let cube = PrimitiveKind::Cube;
        assert_eq!(verts(cube, 1, 1, 1), 24);
        // faces are (cols + 1) * (rows + 1) grids: 2*(d+1)(h+1) + 2*(w+1)(d+1) + 2*(w+1)(h+1)
        assert_eq!(verts(cube, 2, 3, 4), 2 * 5 * 4 + 2 * 3 * 5 + 2 * 3 * 4);
        assert!(verts(cube, 2, 1, 1) > verts(cube, 1, 1, 1));
        assert!(verts(cube, 1, 2, 1) > verts(cube, 1, 1, 1));
        assert!(verts(cube, 1, 1, 2) > verts(cube, 1, 1, 1));
    }

    #[test]
    fn every_count_shapes_cylinder_and_cone() {
        // wall (h+1)(a+1) plus caps of 1 + b(a+1) each
        assert_eq!(verts(PrimitiveKind::Cylinder, 8, 4, 1), 5 * 9 + 2 * (1 + 9));
        assert_eq!(verts(PrimitiveKind::Cone, 8, 3, 2), 4 * 9 + (1 + 2 * 9));
        for kind in [PrimitiveKind::Cylinder, PrimitiveKind::Cone] {
            assert!(verts(kind, 9, 3, 1) > verts(kind, 8, 3, 1));
            assert!(verts(kind, 8, 4, 1) > verts(kind, 8, 3, 1));
            assert!(verts(kind, 8, 3, 2) > verts(kind, 8, 3, 1));
        }
    }

    #[test]
    fn faces_wind_outward() {
        for kind in [PrimitiveKind::Cube, PrimitiveKind::Cylinder, PrimitiveKind::Cone] {
            let mesh = create_primitive_mesh(kind, Subdivisions::new(5, 3, 2));
            let Some(VertexAttributeValues::Float32x3(pos)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
                panic!("positions missing");
            };
            let Some(Indices::U32(idx)) = mesh.indices() else { panic!("indices missing") };
            for tri in idx.chunks_exact(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(pos[i as usize]));
                let face = (b - a).cross(c - a);
                if face.length() < 1e-6 {
                    continue;
                }
                let centroid = (a + b + c) / 3.0;
                assert!(face.dot(centroid) > 0.0, "{} has an inward face", kind.label());
            }
        }
    }

    #[test]
    fn zero_counts_use_defaults() {
        let zero = create_primitive_mesh(PrimitiveKind::Cylinder, Subdivisions::new(0, 0, 0));
        let dflt = create_primitive_mesh(PrimitiveKind::Cylinder, PrimitiveKind::Cylinder.default_subdivisions());
        assert_eq!(zero.count_vertices(), dflt.count_vertices());
    }
}
