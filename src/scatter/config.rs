// src/scatter/config.rs
//! Immutable scatter configuration: density, per-axis random ranges, alignment.
//! Built by the panel (or a preset file) and handed to each scatter pass.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::core::ScatterError;

// ---------- Ranges ----------

/// Inclusive `[min, max]` range; construction rejects `min > max` and spans
/// that overflow `f32`. Serialized as a `(min, max)` tuple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f32, f32)", into = "(f32, f32)")]
pub struct RandomRange {
    min: f32,
    max: f32,
}

impl RandomRange {
    pub const fn new(min: f32, max: f32) -> Result<Self, ScatterError> {
        if !Self::is_valid(min, max) {
            return Err(ScatterError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Like [`RandomRange::new`] for literals; bad bounds fail const evaluation.
    pub const fn between(min: f32, max: f32) -> Self {
        assert!(Self::is_valid(min, max), "invalid random range");
        Self { min, max }
    }

    const fn is_valid(min: f32, max: f32) -> bool {
        min.is_finite() && max.is_finite() && min <= max && (max - min).is_finite()
    }

    /// Degenerate range that always yields `v`.
    pub const fn fixed(v: f32) -> Self { Self { min: v, max: v } }

    #[inline] pub fn min(&self) -> f32 { self.min }
    #[inline] pub fn max(&self) -> f32 { self.max }
}

impl TryFrom<(f32, f32)> for RandomRange {
    type Error = ScatterError;
    fn try_from((min, max): (f32, f32)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<RandomRange> for (f32, f32) {
    fn from(r: RandomRange) -> Self { (r.min, r.max) }
}

/// Uniform draw over `[min, max]`. A degenerate range returns `min` exactly.
pub fn random_in_range<R: Rng>(range: RandomRange, rng: &mut R) -> f32 {
    if range.min == range.max {
        return range.min;
    }
    rng.random_range(range.min..=range.max)
}

/// One range per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    pub x: RandomRange,
    pub y: RandomRange,
    pub z: RandomRange,
}

impl AxisRanges {
    pub const fn splat(r: RandomRange) -> Self { Self { x: r, y: r, z: r } }

    /// Independent draw per axis, in x, y, z order.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let x = random_in_range(self.x, rng);
        let y = random_in_range(self.y, rng);
        let z = random_in_range(self.z, rng);
        Vec3::new(x, y, z)
    }
}

// ---------- Config ----------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    /// Fraction of candidate vertices that receive an instance.
    pub density: f32,
    /// Euler rotation ranges in degrees (XYZ order).
    pub rotation: AxisRanges,
    /// Per-axis scale ranges.
    pub scale: AxisRanges,
    /// Orient each instance's +Y along the vertex normal.
    pub align_to_normal: bool,
    /// Fixed RNG seed; `None` derives one per pass.
    pub seed: Option<u64>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            rotation: AxisRanges::splat(RandomRange::fixed(0.0)),
            scale: AxisRanges::splat(RandomRange::fixed(1.0)),
            align_to_normal: false,
            seed: None,
        }
    }
}

impl ScatterConfig {
    /// Ranges are checked at construction; only density can be out of bounds here.
    pub fn validate(&self) -> Result<(), ScatterError> {
        if !(0.0..=1.0).contains(&self.density) {
            return Err(ScatterError::InvalidDensity(self.density));
        }
        Ok(())
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
