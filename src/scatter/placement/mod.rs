// src/scatter/placement/mod.rs
//! Placement math: which candidates get an instance, and how it is oriented.

mod align;
mod density;
mod weld;

pub use align::{align_to_surface, build_transform, UP};
pub use density::{sample, sample_size};
pub use weld::weld_points;
