// src/scatter/placement/align.rs
//! Surface-aligned placement: object +Y follows the surface normal.

use bevy::prelude::*;

use crate::scatter::core::{AffineTransform, ScatterError, SurfaceNormal, BASIS_EPSILON};

/// Reference up-vector the tangent basis is derived from.
pub const UP: Vec3 = Vec3::Y;

/// Basis columns: X = n x (n x up), Y = n, Z = n x up; translation = `point`.
///
/// Fails with [`ScatterError::DegenerateNormal`] for (near) zero normals and
/// [`ScatterError::DegenerateBasis`] when the normal is parallel to [`UP`].
pub fn build_transform(point: Vec3, normal: Vec3) -> Result<AffineTransform, ScatterError> {
    let n = SurfaceNormal::new(normal)?.get();

    let cross = n.cross(UP);
    if cross.length() < BASIS_EPSILON {
        return Err(ScatterError::DegenerateBasis);
    }
    let tangent = cross.normalize();
    let tangent2 = n.cross(tangent).normalize();

    Ok(AffineTransform::from_basis(tangent2, n, tangent, point))
}

/// [`build_transform`], with the parallel-to-up case resolved as the
/// shortest-arc rotation from +Y onto the normal.
pub fn align_to_surface(point: Vec3, normal: Vec3) -> Result<AffineTransform, ScatterError> {
    match build_transform(point, normal) {
        Err(ScatterError::DegenerateBasis) => {
            let n = SurfaceNormal::new(normal)?.get();
            let rot = Quat::from_rotation_arc(UP, n);
            Ok(AffineTransform(Mat4::from_rotation_translation(rot, point)))
        }
        other => other,
    }
}
