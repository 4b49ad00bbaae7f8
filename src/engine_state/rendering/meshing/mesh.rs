//! Mesh data structures for voxel rendering.
//!
//! A `Mesh` is the CPU side of one chunk's geometry: a vertex buffer and a `u32`
//! index buffer ready to be copied to the GPU as bytes.

use super::face::{Face, FACE_INDICES};
use crate::engine_state::rendering::Vertex;

/// The geometry of one chunk.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a face as four vertices and six indices.
    ///
    /// The indices are offset by the number of vertices already in the mesh.
    pub fn add_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.vertices());
        self.indices
            .extend(FACE_INDICES.iter().map(|index| index + base));
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType};
    use cgmath::Point3;

    #[test]
    fn indices_are_offset_by_the_running_vertex_count() {
        let mut mesh = Mesh::new();
        mesh.add_face(&Face::new(Point3::new(0, 0, 0), BlockType::Dirt, BlockSide::PosX, 15));
        mesh.add_face(&Face::new(Point3::new(0, 0, 0), BlockType::Dirt, BlockSide::NegX, 15));

        assert_eq!(mesh.face_count(), 2);
        assert_eq!(&mesh.indices[..6], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(mesh.vertex_bytes().len(), 8 * std::mem::size_of::<Vertex>());
        assert_eq!(mesh.index_bytes().len(), 12 * 4);
    }
}
