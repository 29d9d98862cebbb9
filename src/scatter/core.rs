// src/scatter/core.rs
//! Core types for scatter placement: points, normals, transforms and errors.
//! Host-independent; nothing in here touches the ECS.

use bevy::prelude::*; // Vec3, Vec4, Mat4

/// Smallest normal magnitude accepted before normalization.
pub const NORMAL_EPSILON: f32 = 1e-8;

/// Cross products shorter than this mean the normal is parallel to the up-vector.
pub const BASIS_EPSILON: f32 = 1e-6;

/// World-space candidates closer than this count as one point.
pub const WELD_EPSILON: f32 = 1e-4;

// ---------- Points & normals ----------

/// Index of a vertex inside the selection it was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// World-space candidate position, read from the host per scatter pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPoint {
    pub vertex: VertexId,
    pub position: Vec3,
}

impl PlacementPoint {
    pub const fn new(vertex: u32, position: Vec3) -> Self {
        Self { vertex: VertexId(vertex), position }
    }
}

/// Unit-length surface direction. Only obtainable through [`SurfaceNormal::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceNormal(Vec3);

impl SurfaceNormal {
    /// Normalizes `raw`, rejecting zero-length and non-finite input.
    pub fn new(raw: Vec3) -> Result<Self, ScatterError> {
        let magnitude = raw.length();
        if !magnitude.is_finite() || magnitude < NORMAL_EPSILON {
            return Err(ScatterError::DegenerateNormal { magnitude });
        }
        Ok(Self(raw / magnitude))
    }

    #[inline]
    pub fn get(self) -> Vec3 { self.0 }
}

// ---------- Transforms ----------

/// Rigid placement transform handed to the host verbatim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform(pub Mat4);

impl AffineTransform {
    /// Builds from basis columns and a translation; last row is (0, 0, 0, 1).
    pub fn from_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, translation: Vec3) -> Self {
        Self(Mat4::from_cols(
            x_axis.extend(0.0),
            y_axis.extend(0.0),
            z_axis.extend(0.0),
            translation.extend(1.0),
        ))
    }

    /// Column-major float layout as consumed by the host.
    pub fn to_cols_array(&self) -> [f32; 16] { self.0.to_cols_array() }

    pub fn x_axis(&self) -> Vec3 { self.0.x_axis.truncate() }
    pub fn y_axis(&self) -> Vec3 { self.0.y_axis.truncate() }
    pub fn z_axis(&self) -> Vec3 { self.0.z_axis.truncate() }
    pub fn translation(&self) -> Vec3 { self.0.w_axis.truncate() }

    pub fn matrix(&self) -> Mat4 { self.0 }
}

/// What the host is asked to apply to a fresh instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InstancePlacement {
    /// Full matrix (surface-aligned placements).
    Matrix(AffineTransform),
    /// Translation plus XYZ Euler rotation in degrees plus per-axis scale.
    Trs {
        translation: Vec3,
        rotation_deg: Vec3,
        scale: Vec3,
    },
}

impl InstancePlacement {
    pub fn to_transform(&self) -> Transform {
        match *self {
            InstancePlacement::Matrix(m) => Transform::from_matrix(m.matrix()),
            InstancePlacement::Trs { translation, rotation_deg, scale } => Transform {
                translation,
                rotation: euler_degrees_to_quat(rotation_deg),
                scale,
            },
        }
    }
}

/// XYZ Euler angles in degrees to a quaternion.
#[inline]
pub fn euler_degrees_to_quat(deg: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        deg.x.to_radians(),
        deg.y.to_radians(),
        deg.z.to_radians(),
    )
}

// ---------- Errors ----------

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScatterError {
    #[error("density {0} is outside [0, 1]")]
    InvalidDensity(f32),
    #[error("surface normal has degenerate magnitude {magnitude}")]
    DegenerateNormal { magnitude: f32 },
    #[error("surface normal is parallel to the up-vector; no tangent basis")]
    DegenerateBasis,
    #[error("random range ({min}, {max}) needs finite bounds, min <= max and a finite span")]
    InvalidRange { min: f32, max: f32 },
    #[error("source object no longer exists")]
    MissingSource,
    #[error("host query failed: {0}")]
    HostQuery(String),
}
