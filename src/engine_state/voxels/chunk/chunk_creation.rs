//! # Chunk Creation Module
//!
//! Terrain generation for new chunks. Every generator lays columns out the same
//! way: bedrock at `y = 0`, dirt up to the surface, and grass on top. The
//! generators differ only in where the surface is:
//! - Flat: a fixed height from the config
//! - Perlin: a 2D Perlin noise height map around that height
//! - Empty: no terrain at all
//!
//! Trees are planted afterwards with a random generator seeded from the world
//! seed and the chunk position, so a chunk always regenerates identically.

use cgmath::Point3;
use log::debug;
use noise::{NoiseFn, Perlin};
use web_time::Instant;

use crate::config::{TerrainKind, WorldConfig};
use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::{Chunk, ChunkPosition, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Distance kept between a trunk and the chunk edge so the canopy fits inside.
const TREE_MARGIN: i32 = 2;
/// Trunk heights are drawn from this range.
const TREE_TRUNK_HEIGHT: std::ops::RangeInclusive<i32> = 4..=6;

impl Chunk {
    /// Generates a chunk with the terrain generator named in the config.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `config` - The world generation parameters
    /// * `next_tree_id` - The world's tree id counter, advanced once per planted tree
    ///
    /// # Returns
    /// A new chunk with terrain but no light computed.
    pub fn generate(position: ChunkPosition, config: &WorldConfig, next_tree_id: &mut u32) -> Self {
        let started = Instant::now();

        let mut chunk = match config.terrain {
            TerrainKind::Flat => Self::flat(position, config.surface_height),
            TerrainKind::Perlin => Self::perlin(position, config),
            TerrainKind::Empty => Self::empty(position),
        };

        let mut trees = 0;
        if config.terrain != TerrainKind::Empty {
            trees = chunk.plant_trees(config, next_tree_id);
        }

        debug!(
            "Generated {:?} chunk ({}, {}) with {} trees in {:?}",
            config.terrain,
            position.x,
            position.z,
            trees,
            started.elapsed()
        );

        chunk
    }

    /// Creates a chunk whose grass layer sits at `surface_height` everywhere.
    pub fn flat(position: ChunkPosition, surface_height: i32) -> Self {
        let mut chunk = Self::empty(position);
        for z in 0..CHUNK_DEPTH {
            for x in 0..CHUNK_WIDTH {
                chunk.fill_column(x, z, surface_height);
            }
        }
        chunk
    }

    /// Creates a chunk whose surface follows a Perlin noise height map.
    pub fn perlin(position: ChunkPosition, config: &WorldConfig) -> Self {
        let perlin = Perlin::new(config.seed);
        let origin = position.world_origin();
        let mut chunk = Self::empty(position);

        for z in 0..CHUNK_DEPTH {
            for x in 0..CHUNK_WIDTH {
                let sample = perlin.get([
                    (origin.x + x) as f64 * config.noise_scale,
                    (origin.z + z) as f64 * config.noise_scale,
                ]);
                let height = config.surface_height + (sample * config.height_amplitude).round() as i32;
                chunk.fill_column(x, z, height);
            }
        }

        chunk
    }

    /// Lays out one column: bedrock, dirt, then grass at `surface`.
    ///
    /// The surface is clamped so there is always bedrock and always room above.
    fn fill_column(&mut self, x: i32, z: i32, surface: i32) {
        let surface = surface.clamp(1, CHUNK_HEIGHT - 1);
        self.set_block(Point3::new(x, 0, z), Block::new(BlockType::Bedrock));
        for y in 1..surface {
            self.set_block(Point3::new(x, y, z), Block::new(BlockType::Dirt));
        }
        self.set_block(Point3::new(x, surface, z), Block::new(BlockType::Grass));
    }

    /// Tries to plant `config.trees_per_chunk` trees on grass.
    ///
    /// # Returns
    /// The number of trees actually planted.
    fn plant_trees(&mut self, config: &WorldConfig, next_tree_id: &mut u32) -> u32 {
        let mut rng = fastrand::Rng::with_seed(tree_seed(config.seed, self.position));
        let mut planted = 0;

        for _ in 0..config.trees_per_chunk {
            let x = rng.i32(TREE_MARGIN..CHUNK_WIDTH - TREE_MARGIN);
            let z = rng.i32(TREE_MARGIN..CHUNK_DEPTH - TREE_MARGIN);
            let trunk_height = rng.i32(TREE_TRUNK_HEIGHT);

            if self.place_tree(x, z, trunk_height, *next_tree_id) {
                *next_tree_id += 1;
                planted += 1;
            }
        }

        planted
    }

    /// Places a trunk on the grass at `(x, z)` and a leaf canopy around its top.
    ///
    /// # Returns
    /// `false` without touching the chunk if the column has no grass on top, the
    /// trunk would be obstructed, or the canopy would leave the chunk.
    fn place_tree(&mut self, x: i32, z: i32, trunk_height: i32, tree_id: u32) -> bool {
        let Some(ground) = self.highest_block_at(x, z) else {
            return false;
        };
        if self.get_block(Point3::new(x, ground, z)).block_type != BlockType::Grass {
            return false;
        }

        let top = ground + trunk_height;
        if top + 1 >= CHUNK_HEIGHT {
            return false;
        }
        if (ground + 1..=top).any(|y| !self.get_block(Point3::new(x, y, z)).block_type.is_air()) {
            return false;
        }

        self.set_block(Point3::new(x, ground, z), Block::new(BlockType::Dirt));
        for y in ground + 1..=top {
            self.set_block(Point3::new(x, y, z), Block::with_tree(BlockType::OakLog, tree_id));
        }

        for dy in -2..=1 {
            let radius: i32 = if dy < 0 { 2 } else { 1 };
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    // Round the canopy off by dropping its corners.
                    if radius > 1 && dx.abs() == radius && dz.abs() == radius {
                        continue;
                    }
                    if dy == 1 && dx != 0 && dz != 0 {
                        continue;
                    }
                    let local = Point3::new(x + dx, top + dy, z + dz);
                    if self.get_block(local).block_type.is_air() {
                        self.set_block(local, Block::with_tree(BlockType::OakLeaves, tree_id));
                    }
                }
            }
        }

        true
    }
}

/// Mixes the world seed with a chunk position into a tree placement seed.
fn tree_seed(seed: u32, position: ChunkPosition) -> u64 {
    (seed as u64)
        ^ (position.x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (position.z as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}
