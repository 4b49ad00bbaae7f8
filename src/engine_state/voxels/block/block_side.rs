//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block. Faces are
//! used by mesh extraction to pick neighbours and by the ray caster to report
//! which face of a block was entered.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is named after the direction its outward normal points to.
/// The discriminant is the index used by the per-face atlas tables.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face whose normal points towards positive X
    PosX = 0,

    /// The face whose normal points towards negative X
    NegX = 1,

    /// The top face
    PosY = 2,

    /// The bottom face
    NegY = 3,

    /// The face whose normal points towards positive Z
    PosZ = 4,

    /// The face whose normal points towards negative Z
    NegZ = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [PosX, NegX, PosY, NegY, PosZ, NegZ]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::PosX,
            BlockSide::NegX,
            BlockSide::PosY,
            BlockSide::NegY,
            BlockSide::PosZ,
            BlockSide::NegZ,
        ]
    }

    /// The unit offset from a block to its neighbour across this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::PosX => Vector3::new(1, 0, 0),
            BlockSide::NegX => Vector3::new(-1, 0, 0),
            BlockSide::PosY => Vector3::new(0, 1, 0),
            BlockSide::NegY => Vector3::new(0, -1, 0),
            BlockSide::PosZ => Vector3::new(0, 0, 1),
            BlockSide::NegZ => Vector3::new(0, 0, -1),
        }
    }

    /// The face on the other side of the block.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::PosX => BlockSide::NegX,
            BlockSide::NegX => BlockSide::PosX,
            BlockSide::PosY => BlockSide::NegY,
            BlockSide::NegY => BlockSide::PosY,
            BlockSide::PosZ => BlockSide::NegZ,
            BlockSide::NegZ => BlockSide::PosZ,
        }
    }
}
