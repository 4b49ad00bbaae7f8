//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format produced by mesh extraction. It is plain old
//! data so a renderer can upload a slice of vertices without any conversion.

use cgmath::Point3;

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Colour tint: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Sky light: u8 (1 byte)
/// - Padding: [u8; 3] (3 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Colour multiplier applied to the texture sample
    pub color: [f32; 3],
    /// Atlas texture coordinates (normalized 0.0-1.0 over the whole atlas)
    pub uv: [f32; 2],
    /// Sky light of the block the face looks out into, `0..=15`
    pub sky_light: u8,
    _padding: [u8; 3],
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `pos` - The world space position of the vertex
    /// * `color` - The tint of the face this vertex belongs to
    /// * `uv` - Atlas texture coordinates
    /// * `sky_light` - Light level the face is lit with
    pub fn new(pos: Point3<f32>, color: [f32; 3], uv: [f32; 2], sky_light: u8) -> Self {
        Vertex {
            position: [pos.x, pos.y, pos.z],
            color,
            uv,
            sky_light,
            _padding: [0; 3],
        }
    }
}
