//! Vertex scatter tool: density-sampled, optionally surface-aligned instancing
//! of a source object over selected mesh vertices.

pub mod scatter;
