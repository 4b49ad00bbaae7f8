//! # World Module
//!
//! This module provides the `World` struct which manages a collection of chunks in the voxel world.
//! It serves as the central coordinator for chunk creation and access, and is the only place
//! that converts world coordinates into chunk coordinates.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks that have been accessed or
//! modified are kept in memory. Chunks tile the XZ plane; the Y axis is a single
//! `CHUNK_HEIGHT` tall column and is not chunked.
//!
//! ## Absence is air
//!
//! Every read through the world resolves missing data to unlit air: coordinates above
//! or below the column, and coordinates inside chunks that have not been generated.
//! Reads never generate chunks. Writes go through [`World::get_or_create_chunk`], which
//! generates the target chunk synchronously if needed.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, info};
use web_time::Instant;

use crate::config::WorldConfig;
use crate::engine_state::voxels::{
    block::{block_type::BlockType, Block},
    chunk::{Chunk, ChunkPosition, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH},
    light,
};

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::{BlockType, World, WorldConfig};
///
/// let mut world = World::new(WorldConfig::flat(16));
///
/// // Placing a block generates the chunk it lands in.
/// world.set_block(Point3::new(3, 20, -5), BlockType::Dirt);
/// assert_eq!(world.get_block_at_world(Point3::new(3, 20, -5)).block_type, BlockType::Dirt);
/// ```
pub struct World {
    /// A mapping from chunk coordinates to chunk data. At most one chunk per position.
    chunks: HashMap<ChunkPosition, Chunk>,
    /// Terrain generation parameters applied to every new chunk.
    config: WorldConfig,
    /// The id the next generated tree will be tagged with.
    next_tree_id: u32,
}

impl Default for World {
    fn default() -> Self {
        World::new(WorldConfig::default())
    }
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    ///
    /// * `config` - How chunks of this world are generated
    pub fn new(config: WorldConfig) -> Self {
        info!(
            "Creating {:?} world with seed {}",
            config.terrain, config.seed
        );
        World {
            chunks: HashMap::new(),
            config,
            next_tree_id: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of chunks generated so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk_positions(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.chunks.keys().copied()
    }

    /// Splits a world coordinate into the chunk that holds it and the local
    /// coordinate inside that chunk.
    ///
    /// X and Z use floor division, so `-1` lands in chunk `-1` at local `15`.
    /// Y is not chunked; it is clamped into `0..CHUNK_HEIGHT`.
    pub fn world_to_chunk_coords(pos: Point3<i32>) -> (ChunkPosition, Point3<i32>) {
        let chunk_position = ChunkPosition::new(
            pos.x.div_euclid(CHUNK_WIDTH),
            pos.z.div_euclid(CHUNK_DEPTH),
        );
        let local = Point3::new(
            pos.x.rem_euclid(CHUNK_WIDTH),
            pos.y.clamp(0, CHUNK_HEIGHT - 1),
            pos.z.rem_euclid(CHUNK_DEPTH),
        );
        (chunk_position, local)
    }

    /// Retrieves the chunk at the specified chunk coordinates, if it has been generated.
    pub fn get_chunk(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Returns the chunk at the given position, generating it first if necessary.
    ///
    /// A new chunk gets its terrain and its initial sky light before this returns,
    /// so the first touch of a chunk is a potentially expensive call.
    ///
    /// # Arguments
    ///
    /// * `position` - The chunk coordinates to look up or generate
    pub fn get_or_create_chunk(&mut self, position: ChunkPosition) -> &mut Chunk {
        let config = &self.config;
        let next_tree_id = &mut self.next_tree_id;
        self.chunks.entry(position).or_insert_with(|| {
            let started = Instant::now();
            let mut chunk = Chunk::generate(position, config, next_tree_id);
            chunk.calculate_sky_light();
            info!(
                "Chunk ({}, {}) ready in {:?}",
                position.x,
                position.z,
                started.elapsed()
            );
            chunk
        })
    }

    /// Generates every missing chunk within `radius` chunks of `center`.
    ///
    /// # Returns
    /// The positions of the chunks that were generated by this call.
    pub fn ensure_chunks_around(&mut self, center: ChunkPosition, radius: i32) -> Vec<ChunkPosition> {
        let mut created = Vec::new();
        for x in center.x - radius..=center.x + radius {
            for z in center.z - radius..=center.z + radius {
                let position = ChunkPosition::new(x, z);
                if !self.chunks.contains_key(&position) {
                    self.get_or_create_chunk(position);
                    created.push(position);
                }
            }
        }
        created
    }

    /// Gets a copy of the block at a world coordinate.
    ///
    /// Never fails: coordinates outside the column or inside ungenerated chunks
    /// read as unlit air.
    pub fn get_block_at_world(&self, pos: Point3<i32>) -> Block {
        self.loaded_block(pos).unwrap_or_else(Block::air)
    }

    /// Whether the block at `pos` blocks player movement.
    pub fn is_solid(&self, pos: Point3<i32>) -> bool {
        self.get_block_at_world(pos).is_solid()
    }

    /// Whether the block at `pos` lets light through.
    pub fn is_transparent(&self, pos: Point3<i32>) -> bool {
        self.get_block_at_world(pos).is_transparent()
    }

    pub fn sky_light_at(&self, pos: Point3<i32>) -> u8 {
        self.get_block_at_world(pos).sky_light()
    }

    /// Reads a block only if it is backed by a generated chunk.
    ///
    /// The light engine uses this to keep light from flowing into, or being
    /// sourced from, chunks that do not exist yet.
    pub(crate) fn loaded_block(&self, pos: Point3<i32>) -> Option<Block> {
        if !(0..CHUNK_HEIGHT).contains(&pos.y) {
            return None;
        }
        let (chunk_position, local) = Self::world_to_chunk_coords(pos);
        self.chunks
            .get(&chunk_position)
            .map(|chunk| chunk.get_block(local))
    }

    /// Writes a sky light level. Ignored outside generated chunks.
    pub(crate) fn set_sky_light_at(&mut self, pos: Point3<i32>, level: u8) {
        if !(0..CHUNK_HEIGHT).contains(&pos.y) {
            return;
        }
        let (chunk_position, local) = Self::world_to_chunk_coords(pos);
        if let Some(chunk) = self.chunks.get_mut(&chunk_position) {
            chunk.set_sky_light(local, level);
        }
    }

    /// Replaces the block at a world coordinate and repairs the sky light around it.
    ///
    /// # Arguments
    ///
    /// * `pos` - World coordinate of the block to replace
    /// * `new_type` - The type to write
    ///
    /// # Returns
    ///
    /// The chunk whose mesh is now stale, or `None` if the write was refused
    /// because `pos` is outside the column or holds an unbreakable block.
    /// Use [`World::boundary_neighbors`] to find adjacent chunks that also need
    /// a rebuild.
    pub fn set_block(&mut self, pos: Point3<i32>, new_type: BlockType) -> Option<ChunkPosition> {
        if !(0..CHUNK_HEIGHT).contains(&pos.y) {
            debug!("Refusing to set block outside the world column at {:?}", pos);
            return None;
        }

        let (chunk_position, local) = Self::world_to_chunk_coords(pos);
        let chunk = self.get_or_create_chunk(chunk_position);
        let old = chunk.get_block(local);
        if !old.block_type.is_breakable() {
            debug!("Refusing to overwrite {:?} at {:?}", old.block_type, pos);
            return None;
        }
        chunk.set_block_type(local, new_type);

        match (old.is_transparent(), new_type.is_transparent()) {
            (false, true) => light::propagate_light_addition(self, pos),
            (true, false) => light::propagate_light_removal(self, pos, old.sky_light()),
            _ => {}
        }

        debug!(
            "Set {:?} -> {:?} at {:?} in chunk ({}, {})",
            old.block_type, new_type, pos, chunk_position.x, chunk_position.z
        );
        Some(chunk_position)
    }

    /// Chunks adjacent to the one holding `pos` that share the face `pos` lies on.
    ///
    /// An edit on a chunk edge changes the culling of the neighbour's border
    /// faces, so those chunks need their meshes rebuilt too.
    pub fn boundary_neighbors(pos: Point3<i32>) -> Vec<ChunkPosition> {
        let (chunk_position, local) = Self::world_to_chunk_coords(pos);
        let mut neighbors = Vec::new();
        if local.x == 0 {
            neighbors.push(ChunkPosition::new(chunk_position.x - 1, chunk_position.z));
        }
        if local.x == CHUNK_WIDTH - 1 {
            neighbors.push(ChunkPosition::new(chunk_position.x + 1, chunk_position.z));
        }
        if local.z == 0 {
            neighbors.push(ChunkPosition::new(chunk_position.x, chunk_position.z - 1));
        }
        if local.z == CHUNK_DEPTH - 1 {
            neighbors.push(ChunkPosition::new(chunk_position.x, chunk_position.z + 1));
        }
        neighbors
    }

    /// World coordinates of every block tagged with `tree_id`.
    pub fn find_tree_blocks(&self, tree_id: u32) -> Vec<Point3<i32>> {
        self.chunks
            .values()
            .flat_map(|chunk| {
                chunk
                    .non_air_blocks()
                    .filter(move |(_, block)| block.tree_id == Some(tree_id))
                    .map(move |(local, _)| chunk.to_world(local))
            })
            .collect()
    }
}
