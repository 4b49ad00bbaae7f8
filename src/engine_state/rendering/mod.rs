//! Rendering data for the voxel engine.
//!
//! This module turns voxel data into GPU-ready geometry. It owns no GPU state: a
//! renderer consumes the [`Mesh`] buffers produced here and uploads them however
//! it likes.

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use meshing::{build_chunk_mesh, Mesh};
pub use vertex::Vertex;
