// src/scatter/placement/density.rs
//! Density sampling: a uniform subset of the candidates, without replacement.

use rand::Rng;

use crate::scatter::core::{PlacementPoint, ScatterError};

/// Number of candidates kept for `density`; rounds half away from zero.
#[inline]
pub fn sample_size(candidate_count: usize, density: f32) -> usize {
    let n = (candidate_count as f32 * density).round();
    (n.max(0.0) as usize).min(candidate_count)
}

/// Pick `round(len * density)` distinct candidates. Output order is random.
pub fn sample<R: Rng>(
    candidates: &[PlacementPoint],
    density: f32,
    rng: &mut R,
) -> Result<Vec<PlacementPoint>, ScatterError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(ScatterError::InvalidDensity(density));
    }
    let amount = sample_size(candidates.len(), density);
    if amount == 0 {
        return Ok(Vec::new());
    }

    let picked = rand::seq::index::sample(rng, candidates.len(), amount);
    Ok(picked.into_iter().map(|i| candidates[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn grid(n: u32) -> Vec<PlacementPoint> {
        (0..n)
            .map(|i| PlacementPoint::new(i, Vec3::new(i as f32, 0.0, (i * 2) as f32)))
            .collect()
    }

    #[test]
    fn size_follows_density() {
        let pts = grid(37);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for step in 0..=20 {
            let density = step as f32 / 20.0;
            let out = sample(&pts, density, &mut rng).unwrap();
            assert_eq!(out.len(), (37.0 * density).round() as usize, "density {density}");

            let ids: HashSet<_> = out.iter().map(|p| p.vertex).collect();
            assert_eq!(ids.len(), out.len(), "duplicate pick at density {density}");
            assert!(out.iter().all(|p| pts.contains(p)));
        }
    }

    #[test]
    fn zero_density_is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(sample(&grid(10), 0.0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn full_density_is_a_permutation() {
        let pts = grid(16);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut out = sample(&pts, 1.0, &mut rng).unwrap();
        out.sort_by_key(|p| p.vertex);
        assert_eq!(out, pts);
    }

    #[test]
    fn empty_candidates_are_not_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(sample(&[], 0.5, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_density_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(sample(&grid(4), -0.1, &mut rng), Err(ScatterError::InvalidDensity(-0.1)));
        assert_eq!(sample(&grid(4), 1.01, &mut rng), Err(ScatterError::InvalidDensity(1.01)));
    }

    #[test]
    fn same_seed_same_subset() {
        let pts = grid(50);
        let a = sample(&pts, 0.3, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = sample(&pts, 0.3, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn half_rounds_away_from_zero() {
        assert_eq!(sample_size(5, 0.5), 3);
        assert_eq!(sample_size(10, 0.5), 5);
        assert_eq!(sample_size(3, 1.0), 3);
    }
}
