use cgmath::{Point3, Vector3};

use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::block::{
    block_side::BlockSide, block_type::BlockType, Block, ATLAS_TILES_PER_ROW,
};

/// Triangulation of a quad, relative to its first vertex.
pub const FACE_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Corners of each face of the unit cube, counter-clockwise seen from outside.
///
/// Indexed by `BlockSide as usize`.
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    [[1., 0., 0.], [1., 1., 0.], [1., 1., 1.], [1., 0., 1.]], // PosX
    [[0., 0., 1.], [0., 1., 1.], [0., 1., 0.], [0., 0., 0.]], // NegX
    [[0., 1., 0.], [0., 1., 1.], [1., 1., 1.], [1., 1., 0.]], // PosY
    [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]], // NegY
    [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]], // PosZ
    [[1., 0., 0.], [0., 0., 0.], [0., 1., 0.], [1., 1., 0.]], // NegZ
];

/// Texture coordinates of the corners above, within one atlas tile.
/// Side faces keep the tile upright.
const FACE_UVS: [[[f32; 2]; 4]; 6] = [
    [[0., 1.], [0., 0.], [1., 0.], [1., 1.]],
    [[0., 1.], [0., 0.], [1., 0.], [1., 1.]],
    [[0., 0.], [0., 1.], [1., 1.], [1., 0.]],
    [[0., 0.], [0., 1.], [1., 1.], [1., 0.]],
    [[0., 1.], [1., 1.], [1., 0.], [0., 0.]],
    [[0., 1.], [1., 1.], [1., 0.], [0., 0.]],
];

/// Represents a single visible face of a block.
///
/// A face knows the block it belongs to, which side of that block it covers and
/// the light of the block it looks out into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// World coordinate of the block the face belongs to
    pub block_position: Point3<i32>,
    pub block_type: BlockType,
    pub side: BlockSide,
    /// Sky light of the neighbour across the face
    pub sky_light: u8,
}

impl Face {
    pub fn new(block_position: Point3<i32>, block_type: BlockType, side: BlockSide, sky_light: u8) -> Self {
        Face {
            block_position,
            block_type,
            side,
            sky_light,
        }
    }

    /// Generates the four vertices of this face.
    ///
    /// The vertices are in the winding order [`FACE_INDICES`] expects.
    pub fn vertices(&self) -> [Vertex; 4] {
        let origin = self.block_position.cast::<f32>().unwrap_or(Point3::new(0.0, 0.0, 0.0));
        let (column, row) = Block::atlas_tile(self.block_type, self.side);
        let color = Block::face_tint(self.block_type, self.side);
        let tile_size = 1.0 / ATLAS_TILES_PER_ROW as f32;

        let corners = &FACE_CORNERS[self.side as usize];
        let uvs = &FACE_UVS[self.side as usize];
        std::array::from_fn(|i| {
            let [x, y, z] = corners[i];
            let [u, v] = uvs[i];
            Vertex::new(
                origin + Vector3::new(x, y, z),
                color,
                [(column as f32 + u) * tile_size, (row as f32 + v) * tile_size],
                self.sky_light,
            )
        })
    }
}
