//! Mesh extraction for voxel chunks.
//!
//! Every non-air block gets a quad for each of its faces that borders a
//! transparent block. Neighbours inside the chunk are read directly; neighbours
//! across the chunk border are read through the world, where ungenerated chunks
//! count as air. Each quad is lit with the sky light of the block it faces, not
//! the light of the block it belongs to.
//!
//! # Architecture
//! - [`Mesh`]: Vertex and index buffers of one chunk
//! - [`Face`]: A single visible block face and its vertex generation
//! - [`build_chunk_mesh`]: The culling pass tying the two together
//!
//! A mesh must be rebuilt whenever a block in its chunk changes, and when a
//! block on the shared border of a neighbouring chunk changes.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, Block, MAX_LIGHT},
    chunk::{Chunk, ChunkPosition, CHUNK_HEIGHT},
    world::World,
};

mod face;
mod mesh;

pub use face::{Face, FACE_INDICES};
pub use mesh::Mesh;

/// Builds the mesh of one chunk.
///
/// # Arguments
/// * `world` - The world holding the chunk and its neighbours
/// * `chunk_position` - The chunk to mesh
///
/// # Returns
/// The chunk's mesh, or an empty mesh if the chunk has not been generated.
pub fn build_chunk_mesh(world: &World, chunk_position: ChunkPosition) -> Mesh {
    let mut mesh = Mesh::new();
    let Some(chunk) = world.get_chunk(chunk_position) else {
        return mesh;
    };
    let started = Instant::now();

    for (local, block) in chunk.non_air_blocks() {
        let block_position = chunk.to_world(local);
        for side in BlockSide::all() {
            let neighbor = neighbor_block(world, chunk, local + side.normal());
            if neighbor.is_transparent() {
                mesh.add_face(&Face::new(block_position, block.block_type, side, neighbor.sky_light()));
            }
        }
    }

    debug!(
        "Meshed chunk ({}, {}): {} faces in {:?}",
        chunk_position.x,
        chunk_position.z,
        mesh.face_count(),
        started.elapsed()
    );
    mesh
}

/// The block a face looks into. Above the world is open sky at full light.
fn neighbor_block(world: &World, chunk: &Chunk, local: Point3<i32>) -> Block {
    if local.y >= CHUNK_HEIGHT {
        let mut sky = Block::air();
        sky.set_sky_light(MAX_LIGHT);
        sky
    } else if Chunk::in_bounds(local) {
        chunk.get_block(local)
    } else {
        world.get_block_at_world(chunk.to_world(local))
    }
}
