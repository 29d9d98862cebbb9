// src/scatter/placement/weld.rs
//! Collapse coincident candidates. Mesh builders split vertices at seams,
//! poles and hard edges, so one surface point can appear several times.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::scatter::core::PlacementPoint;

fn cell_of(p: Vec3, epsilon: f32) -> IVec3 {
    (p / epsilon).floor().as_ivec3()
}

/// Keep the first point of every cluster closer than `epsilon`; order is preserved.
pub fn weld_points(points: Vec<PlacementPoint>, epsilon: f32) -> Vec<PlacementPoint> {
    if epsilon <= 0.0 {
        return points;
    }

    let mut grid: HashMap<IVec3, Vec<Vec3>> = HashMap::with_capacity(points.len());
    let mut kept = Vec::with_capacity(points.len());

    'points: for point in points {
        let cell = cell_of(point.position, epsilon);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(bucket) = grid.get(&(cell + IVec3::new(dx, dy, dz))) else { continue };
                    if bucket.iter().any(|q| q.distance(point.position) <= epsilon) {
                        continue 'points;
                    }
                }
            }
        }
        grid.entry(cell).or_default().push(point.position);
        kept.push(point);
    }
    kept
}
