//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and the
//! static property table that classifies them.
//!
//! Transparency and solidity are two independent columns of the table:
//! transparency drives sky light and face culling, solidity drives collision.
//! Oak leaves are the one type where the two disagree.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Number of distinct block types.
pub const BLOCK_TYPE_COUNT: usize = 6;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant doubles as the index into [`BLOCK_PROPERTIES`] and the
/// atlas tables, and as the compact id used when a block type travels as a
/// plain integer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. Transparent and non-solid.
    #[default]
    Air = 0,

    /// A plain dirt block.
    Dirt = 1,

    /// Dirt with a grass top. The top face is tinted green when meshed.
    Grass = 2,

    /// The unbreakable floor of the world.
    Bedrock = 3,

    /// The trunk of a generated oak tree.
    OakLog = 4,

    /// Oak foliage. Lets light through but still blocks movement.
    OakLeaves = 5,
}

/// Static classification of a block type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockProperties {
    /// Light passes through and neighbouring faces stay visible.
    pub transparent: bool,
    /// Blocks player movement.
    pub solid: bool,
    /// Can be replaced through `World::set_block`.
    pub breakable: bool,
}

/// Property table indexed by `BlockType as usize`.
pub static BLOCK_PROPERTIES: [BlockProperties; BLOCK_TYPE_COUNT] = [
    // Air
    BlockProperties { transparent: true, solid: false, breakable: true },
    // Dirt
    BlockProperties { transparent: false, solid: true, breakable: true },
    // Grass
    BlockProperties { transparent: false, solid: true, breakable: true },
    // Bedrock
    BlockProperties { transparent: false, solid: true, breakable: false },
    // OakLog
    BlockProperties { transparent: false, solid: true, breakable: true },
    // OakLeaves
    BlockProperties { transparent: true, solid: true, breakable: true },
];

impl BlockType {
    /// Every block type in discriminant order.
    pub const ALL: [BlockType; BLOCK_TYPE_COUNT] = [
        BlockType::Air,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Bedrock,
        BlockType::OakLog,
        BlockType::OakLeaves,
    ];

    /// Converts a compact block id back to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a block type.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// The compact id of this block type.
    #[inline]
    pub const fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Looks up the static properties of this block type.
    #[inline]
    pub fn properties(self) -> &'static BlockProperties {
        &BLOCK_PROPERTIES[self as usize]
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self.properties().transparent
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.properties().solid
    }

    #[inline]
    pub fn is_breakable(self) -> bool {
        self.properties().breakable
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self, BlockType::Air)
    }
}
