//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for managing
//! 16x32x16 columns of voxel data.
//!
//! ## Storage
//!
//! A chunk is a flat arena of `Block` values addressed by a bounds-checked index,
//! alongside a bit vector with one bit per block recording whether that block is
//! transparent:
//! - `blocks`: every block of the chunk, `x` fastest, then `z`, then `y`
//! - `transparent`: 1 bit per block, kept in sync by every write
//!
//! The bit vector is what the light flood fill and face culling consult, so the
//! hot loops never touch the full block data just to classify a neighbour.
//!
//! ## Access contract
//!
//! Reads return copies and resolve out-of-bounds coordinates to unlit air.
//! Writes to out-of-bounds coordinates are silently ignored.

use std::collections::VecDeque;

use bitvec::prelude::BitVec;
use cgmath::Point3;
use log::debug;
use web_time::Instant;

use super::block::block_side::BlockSide;
use super::block::block_type::BlockType;
use super::block::{Block, MAX_LIGHT};
use super::light;

mod chunk_creation;

/// Size of a chunk along X in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// Size of a chunk along Y in blocks. The world is exactly one chunk tall.
pub const CHUNK_HEIGHT: i32 = 32;
/// Size of a chunk along Z in blocks.
pub const CHUNK_DEPTH: i32 = 16;
/// The number of blocks in one horizontal layer of a chunk.
pub const CHUNK_LAYER_SIZE: usize = (CHUNK_WIDTH * CHUNK_DEPTH) as usize;
/// The total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_LAYER_SIZE * CHUNK_HEIGHT as usize;

/// The position of a chunk in chunk-grid coordinates.
///
/// Chunks tile the XZ plane only, so the position has no Y component.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkPosition {
    pub x: i32,
    pub z: i32,
}

impl ChunkPosition {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkPosition { x, z }
    }

    /// World coordinate of the chunk's local `(0, 0, 0)` block.
    pub fn world_origin(&self) -> Point3<i32> {
        Point3::new(self.x * CHUNK_WIDTH, 0, self.z * CHUNK_DEPTH)
    }

    /// The chunk next to this one across the given face. Vertical faces have no
    /// neighbour and return `self`.
    pub fn offset(&self, side: BlockSide) -> ChunkPosition {
        let normal = side.normal();
        ChunkPosition::new(self.x + normal.x, self.z + normal.z)
    }
}

/// Represents a 16x32x16 column of voxel blocks in the world.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: ChunkPosition,

    /// Every block of the chunk, indexed by [`Chunk::index`].
    blocks: Vec<Block>,

    /// One bit per block, set where the block lets light through.
    transparent: BitVec,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are unlit air).
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn empty(position: ChunkPosition) -> Self {
        Chunk {
            position,
            blocks: vec![Block::air(); CHUNK_VOLUME],
            transparent: BitVec::repeat(true, CHUNK_VOLUME),
        }
    }

    /// Checks whether local coordinates fall inside the chunk.
    #[inline]
    pub fn in_bounds(local: Point3<i32>) -> bool {
        (0..CHUNK_WIDTH).contains(&local.x)
            && (0..CHUNK_HEIGHT).contains(&local.y)
            && (0..CHUNK_DEPTH).contains(&local.z)
    }

    /// Converts local coordinates into an index into the block arena.
    ///
    /// # Returns
    /// `None` if the coordinates are outside the chunk.
    #[inline]
    pub fn index(local: Point3<i32>) -> Option<usize> {
        if !Self::in_bounds(local) {
            return None;
        }
        Some(
            local.x as usize
                + CHUNK_WIDTH as usize * local.z as usize
                + CHUNK_LAYER_SIZE * local.y as usize,
        )
    }

    /// Converts an arena index back into local coordinates.
    #[inline]
    pub fn local_from_index(index: usize) -> Point3<i32> {
        let y = index / CHUNK_LAYER_SIZE;
        let remainder = index % CHUNK_LAYER_SIZE;
        let z = remainder / CHUNK_WIDTH as usize;
        let x = remainder % CHUNK_WIDTH as usize;
        Point3::new(x as i32, y as i32, z as i32)
    }

    /// Converts local coordinates of this chunk into world coordinates.
    pub fn to_world(&self, local: Point3<i32>) -> Point3<i32> {
        let origin = self.position.world_origin();
        Point3::new(origin.x + local.x, local.y, origin.z + local.z)
    }

    /// Gets a copy of the block at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// The block, or unlit air if the coordinates are out of bounds.
    pub fn get_block(&self, local: Point3<i32>) -> Block {
        match Self::index(local) {
            Some(index) => self.blocks[index],
            None => Block::air(),
        }
    }

    /// Replaces the block at the specified chunk-relative coordinates.
    ///
    /// Does nothing if the coordinates are out of bounds.
    pub fn set_block(&mut self, local: Point3<i32>, block: Block) {
        if let Some(index) = Self::index(local) {
            self.transparent.set(index, block.is_transparent());
            self.blocks[index] = block;
        }
    }

    /// Replaces only the type of a block, keeping its light levels.
    pub fn set_block_type(&mut self, local: Point3<i32>, block_type: BlockType) {
        if let Some(index) = Self::index(local) {
            let block = &mut self.blocks[index];
            block.block_type = block_type;
            block.tree_id = None;
            self.transparent.set(index, block_type.is_transparent());
        }
    }

    /// Checks if the block at the specified coordinates lets light through.
    ///
    /// Out-of-bounds coordinates count as air and are therefore transparent.
    #[inline]
    pub fn is_transparent(&self, local: Point3<i32>) -> bool {
        match Self::index(local) {
            Some(index) => self.transparent[index],
            None => true,
        }
    }

    #[inline]
    pub fn sky_light(&self, local: Point3<i32>) -> u8 {
        match Self::index(local) {
            Some(index) => self.blocks[index].sky_light(),
            None => 0,
        }
    }

    #[inline]
    pub fn set_sky_light(&mut self, local: Point3<i32>, level: u8) {
        if let Some(index) = Self::index(local) {
            self.blocks[index].set_sky_light(level);
        }
    }

    /// Y coordinate of the highest non-air block in a column, if any.
    pub fn highest_block_at(&self, x: i32, z: i32) -> Option<i32> {
        (0..CHUNK_HEIGHT)
            .rev()
            .find(|&y| !self.get_block(Point3::new(x, y, z)).block_type.is_air())
    }

    /// Iterates over every non-air block together with its local coordinates.
    pub fn non_air_blocks(&self) -> impl Iterator<Item = (Point3<i32>, Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.block_type.is_air())
            .map(|(index, block)| (Self::local_from_index(index), *block))
    }

    /// Recomputes the sky light of every block from scratch.
    ///
    /// Every column is lit at full strength from the top down to its first opaque
    /// block, then light floods sideways and downwards into the remaining
    /// transparent blocks, losing one level per step. Light does not cross into
    /// neighbouring chunks here.
    pub fn calculate_sky_light(&mut self) {
        let started = Instant::now();

        for block in self.blocks.iter_mut() {
            block.set_sky_light(0);
        }

        let mut queue = VecDeque::new();
        for z in 0..CHUNK_DEPTH {
            for x in 0..CHUNK_WIDTH {
                for y in (0..CHUNK_HEIGHT).rev() {
                    let local = Point3::new(x, y, z);
                    if !self.is_transparent(local) {
                        break;
                    }
                    self.set_sky_light(local, MAX_LIGHT);
                    queue.push_back(local);
                }
            }
        }

        while let Some(local) = queue.pop_front() {
            let current = self.sky_light(local);
            for side in BlockSide::all() {
                let spread = light::spread_light(current, side);
                if spread == 0 {
                    continue;
                }
                let neighbor = local + side.normal();
                if !Self::in_bounds(neighbor) || !self.is_transparent(neighbor) {
                    continue;
                }
                if self.sky_light(neighbor) < spread {
                    self.set_sky_light(neighbor, spread);
                    queue.push_back(neighbor);
                }
            }
        }

        debug!(
            "Sky light for chunk ({}, {}) computed in {:?}",
            self.position.x,
            self.position.z,
            started.elapsed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sky_field(chunk: &Chunk) -> Vec<u8> {
        (0..CHUNK_VOLUME)
            .map(|index| chunk.sky_light(Chunk::local_from_index(index)))
            .collect()
    }

    #[test]
    fn index_round_trips_and_rejects_out_of_bounds() {
        for index in [0, 1, 17, CHUNK_LAYER_SIZE + 3, CHUNK_VOLUME - 1] {
            let local = Chunk::local_from_index(index);
            assert_eq!(Chunk::index(local), Some(index));
        }
        assert_eq!(Chunk::index(Point3::new(-1, 0, 0)), None);
        assert_eq!(Chunk::index(Point3::new(0, CHUNK_HEIGHT, 0)), None);
        assert_eq!(Chunk::index(Point3::new(0, 0, CHUNK_DEPTH)), None);
    }

    #[test]
    fn out_of_bounds_reads_are_air_and_writes_are_ignored() {
        let mut chunk = Chunk::empty(ChunkPosition::new(0, 0));
        let outside = Point3::new(CHUNK_WIDTH, 3, 3);
        chunk.set_block(outside, Block::new(BlockType::Dirt));
        assert_eq!(chunk.get_block(outside), Block::air());
        assert!(chunk.is_transparent(outside));
        assert_eq!(chunk.non_air_blocks().count(), 0);
    }

    #[test]
    fn writes_keep_transparency_mask_in_sync() {
        let mut chunk = Chunk::empty(ChunkPosition::new(0, 0));
        let local = Point3::new(3, 4, 5);
        chunk.set_block(local, Block::new(BlockType::Dirt));
        assert!(!chunk.is_transparent(local));
        chunk.set_block_type(local, BlockType::OakLeaves);
        assert!(chunk.is_transparent(local));
        chunk.set_block_type(local, BlockType::Air);
        assert!(chunk.is_transparent(local));
    }

    #[test]
    fn open_sky_lights_every_column_fully() {
        let mut chunk = Chunk::empty(ChunkPosition::new(0, 0));
        chunk.calculate_sky_light();
        assert!(sky_field(&chunk).iter().all(|&level| level == MAX_LIGHT));
    }

    #[test]
    fn light_attenuates_under_a_roof() {
        let mut chunk = Chunk::empty(ChunkPosition::new(0, 0));
        // Roof over x in 0..=4 at y = 20, open sky at x >= 5.
        for x in 0..=4 {
            for z in 0..CHUNK_DEPTH {
                chunk.set_block(Point3::new(x, 20, z), Block::new(BlockType::Dirt));
            }
        }
        chunk.calculate_sky_light();

        assert_eq!(chunk.sky_light(Point3::new(5, 10, 3)), MAX_LIGHT);
        assert_eq!(chunk.sky_light(Point3::new(4, 10, 3)), MAX_LIGHT - 1);
        assert_eq!(chunk.sky_light(Point3::new(0, 10, 3)), MAX_LIGHT - 5);
        assert_eq!(chunk.sky_light(Point3::new(0, 20, 3)), 0);
        assert_eq!(chunk.sky_light(Point3::new(0, 21, 3)), MAX_LIGHT);
    }

    #[test]
    fn sealed_cavity_stays_dark() {
        let mut chunk = Chunk::empty(ChunkPosition::new(0, 0));
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_DEPTH {
                chunk.set_block(Point3::new(x, 10, z), Block::new(BlockType::Dirt));
            }
        }
        chunk.calculate_sky_light();
        assert_eq!(chunk.sky_light(Point3::new(7, 5, 7)), 0);
        assert_eq!(chunk.sky_light(Point3::new(7, 11, 7)), MAX_LIGHT);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut chunk = Chunk::empty(ChunkPosition::new(2, -1));
        for x in 2..9 {
            chunk.set_block(Point3::new(x, 12, 6), Block::new(BlockType::Grass));
            chunk.set_block(Point3::new(6, 12, x), Block::new(BlockType::OakLog));
        }
        chunk.calculate_sky_light();
        let first = sky_field(&chunk);
        chunk.calculate_sky_light();
        assert_eq!(first, sky_field(&chunk));
    }

    #[test]
    fn chunk_position_maps_to_world_origin() {
        let chunk = Chunk::empty(ChunkPosition::new(-2, 3));
        assert_eq!(chunk.position.world_origin(), Point3::new(-32, 0, 48));
        assert_eq!(
            chunk.to_world(Point3::new(1, 5, 2)),
            Point3::new(-31, 5, 50)
        );
        assert_eq!(
            chunk.position.offset(BlockSide::NegX),
            ChunkPosition::new(-3, 3)
        );
    }
}
