//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, the per-voxel `Block`
//! value and the texture atlas lookup tables used by mesh extraction.

use block_side::BlockSide;
use block_type::{BlockType, BLOCK_TYPE_COUNT};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Full daylight. Light levels live in `0..=MAX_LIGHT`.
pub const MAX_LIGHT: u8 = 15;

/// Number of tiles along each edge of the square texture atlas.
pub const ATLAS_TILES_PER_ROW: u8 = 16;

/// Maps each block type to the atlas tile `(column, row)` of each face.
///
/// The outer array is indexed by `BlockType as usize`.
/// The inner array is indexed by `BlockSide as usize`:
/// [PosX, NegX, PosY, NegY, PosZ, NegZ]
pub static BLOCK_TYPE_TO_ATLAS_TILES: [[(u8, u8); 6]; BLOCK_TYPE_COUNT] = [
    [(0, 0); 6],                                      // AIR (never meshed)
    [(2, 0); 6],                                      // DIRT
    [(3, 0), (3, 0), (0, 0), (2, 0), (3, 0), (3, 0)], // GRASS (top: 0, bottom: dirt)
    [(1, 1); 6],                                      // BEDROCK
    [(4, 1), (4, 1), (5, 1), (5, 1), (4, 1), (4, 1)], // OAK_LOG (rings on top and bottom)
    [(4, 3); 6],                                      // OAK_LEAVES
];

const NO_TINT: [f32; 3] = [1.0, 1.0, 1.0];
const GRASS_TINT: [f32; 3] = [0.49, 0.74, 0.33];
const FOLIAGE_TINT: [f32; 3] = [0.38, 0.64, 0.25];

/// Represents a single voxel block in the world.
///
/// Blocks are plain values: chunks hand out copies and take replacements
/// through their setters. The light levels are private so that every write goes
/// through a setter that keeps them inside `0..=MAX_LIGHT`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// The type of this block.
    pub block_type: BlockType,
    /// Tags the logs and leaves generated as one tree. Carries no other meaning.
    pub tree_id: Option<u32>,
    sky_light: u8,
    block_light: u8,
}

impl Block {
    /// Creates a new unlit block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type,
            tree_id: None,
            sky_light: 0,
            block_light: 0,
        }
    }

    /// Creates a block that belongs to the tree with the given id.
    pub fn with_tree(block_type: BlockType, tree_id: u32) -> Self {
        Block {
            tree_id: Some(tree_id),
            ..Block::new(block_type)
        }
    }

    /// An unlit air block, the value every out-of-range read resolves to.
    pub const fn air() -> Self {
        Block {
            block_type: BlockType::Air,
            tree_id: None,
            sky_light: 0,
            block_light: 0,
        }
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.block_type.is_transparent()
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.block_type.is_solid()
    }

    #[inline]
    pub fn sky_light(&self) -> u8 {
        self.sky_light
    }

    /// Sets the sky light level, clamped to `MAX_LIGHT`.
    #[inline]
    pub fn set_sky_light(&mut self, level: u8) {
        self.sky_light = level.min(MAX_LIGHT);
    }

    #[inline]
    pub fn block_light(&self) -> u8 {
        self.block_light
    }

    /// Sets the block light level, clamped to `MAX_LIGHT`.
    #[inline]
    pub fn set_block_light(&mut self, level: u8) {
        self.block_light = level.min(MAX_LIGHT);
    }

    /// Gets the atlas tile of one face of a block type.
    ///
    /// # Arguments
    /// * `block_type` - The type of block being meshed
    /// * `side` - The face being meshed
    ///
    /// # Returns
    /// The `(column, row)` of the tile inside the atlas.
    pub fn atlas_tile(block_type: BlockType, side: BlockSide) -> (u8, u8) {
        BLOCK_TYPE_TO_ATLAS_TILES[block_type as usize][side as usize]
    }

    /// Colour multiplier applied to one face of a block type.
    ///
    /// Grass tops and leaves are stored grey in the atlas and tinted here.
    pub fn face_tint(block_type: BlockType, side: BlockSide) -> [f32; 3] {
        match (block_type, side) {
            (BlockType::Grass, BlockSide::PosY) => GRASS_TINT,
            (BlockType::OakLeaves, _) => FOLIAGE_TINT,
            _ => NO_TINT,
        }
    }
}
