//! # Sky Light Module
//!
//! Incremental repair of the sky light field after a single block changes.
//!
//! Light levels run from 0 (dark) to `MAX_LIGHT` (open sky). Light spreads to each
//! transparent orthogonal neighbour one level dimmer, except straight down from a
//! fully lit block, where it stays at full strength. That exception is what keeps a
//! vertical shaft under open sky lit from top to bottom.
//!
//! Both repairs work in world coordinates, so light crosses chunk borders. Blocks in
//! chunks that have not been generated are neither read as light sources nor written.
//!
//! ## Addition
//!
//! When a transparent block appears (a block is broken), its level is derived from its
//! neighbours and then flooded outwards breadth first.
//!
//! ## Removal
//!
//! When an opaque block appears where there was light, a first breadth-first pass
//! darkens everything that was lit only through that block, while collecting the
//! brighter blocks on the rim of the darkened region that have a light source of their
//! own. A second pass floods light back in from those blocks.

use std::collections::VecDeque;

use cgmath::{Point3, Vector3};
use log::debug;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, MAX_LIGHT},
    chunk::CHUNK_HEIGHT,
    world::World,
};

/// The level light has after travelling one step out of a block lit at `current`
/// in the direction of `side`.
#[inline]
pub fn spread_light(current: u8, side: BlockSide) -> u8 {
    if side == BlockSide::NegY && current == MAX_LIGHT {
        MAX_LIGHT
    } else {
        current.saturating_sub(1)
    }
}

/// Whether the block directly above `pos` is open sky: either above the world or
/// a transparent block at full light.
fn is_under_open_sky(world: &World, pos: Point3<i32>) -> bool {
    let above = pos + Vector3::unit_y();
    if above.y >= CHUNK_HEIGHT {
        return true;
    }
    world
        .loaded_block(above)
        .is_some_and(|block| block.is_transparent() && block.sky_light() == MAX_LIGHT)
}

/// Lights a block that has just become transparent and floods the light outwards.
///
/// The new level is full light if the block is under open sky, otherwise the
/// brightest level any transparent neighbour can spread into it.
pub fn propagate_light_addition(world: &mut World, pos: Point3<i32>) {
    let Some(block) = world.loaded_block(pos) else {
        return;
    };
    if !block.is_transparent() {
        return;
    }

    let level = if is_under_open_sky(world, pos) {
        MAX_LIGHT
    } else {
        BlockSide::all()
            .into_iter()
            .filter_map(|side| {
                let neighbor = world.loaded_block(pos + side.normal())?;
                neighbor
                    .is_transparent()
                    .then(|| spread_light(neighbor.sky_light(), side.opposite()))
            })
            .max()
            .unwrap_or(0)
    }
    .max(block.sky_light());

    world.set_sky_light_at(pos, level);
    if level > 0 {
        flood(world, VecDeque::from([pos]));
    }
    debug!("Light addition at {:?} settled at level {}", pos, level);
}

/// Darkens everything that was lit through `pos` and relights it from
/// independent sources.
///
/// # Arguments
/// * `world` - The world whose light field is repaired
/// * `pos` - The block that just became opaque
/// * `removed_level` - The sky light `pos` had before it became opaque
pub fn propagate_light_removal(world: &mut World, pos: Point3<i32>, removed_level: u8) {
    world.set_sky_light_at(pos, 0);

    let mut removal = VecDeque::from([(pos, removed_level)]);
    let mut relight = VecDeque::new();
    let mut darkened = 0usize;

    while let Some((current, level)) = removal.pop_front() {
        for side in BlockSide::all() {
            let neighbor = current + side.normal();
            let Some(block) = world.loaded_block(neighbor) else {
                continue;
            };
            let neighbor_level = block.sky_light();
            if !block.is_transparent() || neighbor_level == 0 {
                continue;
            }

            let lit_through_removed = neighbor_level < level
                || (side == BlockSide::NegY && level == MAX_LIGHT && neighbor_level == MAX_LIGHT);
            if lit_through_removed {
                world.set_sky_light_at(neighbor, 0);
                removal.push_back((neighbor, neighbor_level));
                darkened += 1;
            } else if should_be_relit(world, neighbor) {
                relight.push_back(neighbor);
            }
        }
    }

    debug!(
        "Light removal at {:?} darkened {} blocks, relighting from {}",
        pos,
        darkened,
        relight.len()
    );
    flood(world, relight);
}

/// Whether a block still has a light source after a removal pass: open sky
/// directly above it, or a neighbour brighter than itself.
pub fn should_be_relit(world: &World, pos: Point3<i32>) -> bool {
    if is_under_open_sky(world, pos) {
        return true;
    }
    let level = world.sky_light_at(pos);
    BlockSide::all().into_iter().any(|side| {
        world
            .loaded_block(pos + side.normal())
            .is_some_and(|block| block.is_transparent() && block.sky_light() > level)
    })
}

/// Breadth-first flood fill from already lit blocks.
fn flood(world: &mut World, mut queue: VecDeque<Point3<i32>>) {
    while let Some(pos) = queue.pop_front() {
        let current = world.sky_light_at(pos);
        for side in BlockSide::all() {
            let spread = spread_light(current, side);
            if spread == 0 {
                continue;
            }
            let neighbor = pos + side.normal();
            let Some(block) = world.loaded_block(neighbor) else {
                continue;
            };
            if block.is_transparent() && block.sky_light() < spread {
                world.set_sky_light_at(neighbor, spread);
                queue.push_back(neighbor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::engine_state::voxels::{
        block::block_type::BlockType,
        chunk::{Chunk, ChunkPosition, CHUNK_VOLUME},
    };

    fn single_chunk_world(config: WorldConfig) -> World {
        let mut world = World::new(config);
        world.get_or_create_chunk(ChunkPosition::new(0, 0));
        world
    }

    /// Asserts that the incrementally repaired field of chunk (0, 0) equals a
    /// recompute from scratch.
    fn assert_matches_recompute(world: &World) {
        let chunk = world.get_chunk(ChunkPosition::new(0, 0)).unwrap();
        let mut recomputed = chunk.clone();
        recomputed.calculate_sky_light();
        for index in 0..CHUNK_VOLUME {
            let local = Chunk::local_from_index(index);
            assert_eq!(
                chunk.sky_light(local),
                recomputed.sky_light(local),
                "light mismatch at {:?}",
                local
            );
        }
    }

    #[test]
    fn spreading_dims_by_one_except_straight_down_from_full_light() {
        assert_eq!(spread_light(MAX_LIGHT, BlockSide::NegY), MAX_LIGHT);
        assert_eq!(spread_light(MAX_LIGHT, BlockSide::PosX), MAX_LIGHT - 1);
        assert_eq!(spread_light(MAX_LIGHT - 1, BlockSide::NegY), MAX_LIGHT - 2);
        assert_eq!(spread_light(0, BlockSide::NegY), 0);
    }

    #[test]
    fn placing_a_block_mid_column_darkens_only_the_shaft_below() {
        let mut world = single_chunk_world(WorldConfig::empty());
        world.set_block(Point3::new(8, 20, 8), BlockType::Dirt);

        assert_eq!(world.sky_light_at(Point3::new(8, 20, 8)), 0);
        assert_eq!(world.sky_light_at(Point3::new(8, 21, 8)), MAX_LIGHT);
        // Below the block only sideways light remains.
        assert_eq!(world.sky_light_at(Point3::new(8, 19, 8)), MAX_LIGHT - 1);
        assert_eq!(world.sky_light_at(Point3::new(8, 0, 8)), MAX_LIGHT - 1);
        // Neighbouring columns keep their own sky light.
        assert_eq!(world.sky_light_at(Point3::new(9, 19, 8)), MAX_LIGHT);
        assert_eq!(world.sky_light_at(Point3::new(8, 5, 7)), MAX_LIGHT);
        assert_matches_recompute(&world);
    }

    #[test]
    fn sealing_a_room_then_opening_it_matches_a_recompute() {
        let mut world = single_chunk_world(WorldConfig::flat(4));

        // Walls and roof of a 5x5 room on top of the grass.
        for x in 4..=10 {
            for z in 4..=10 {
                for y in 5..=9 {
                    let wall = x == 4 || x == 10 || z == 4 || z == 10 || y == 9;
                    if wall {
                        world.set_block(Point3::new(x, y, z), BlockType::Dirt);
                    }
                }
            }
        }
        assert_eq!(world.sky_light_at(Point3::new(7, 6, 7)), 0);
        assert_matches_recompute(&world);

        // Knock a hole in the roof.
        world.set_block(Point3::new(7, 9, 7), BlockType::Air);
        assert_eq!(world.sky_light_at(Point3::new(7, 5, 7)), MAX_LIGHT);
        assert_eq!(world.sky_light_at(Point3::new(5, 5, 5)), MAX_LIGHT - 4);
        assert_matches_recompute(&world);

        // And close it again.
        world.set_block(Point3::new(7, 9, 7), BlockType::OakLog);
        assert_eq!(world.sky_light_at(Point3::new(7, 5, 7)), 0);
        assert_matches_recompute(&world);
    }

    #[test]
    fn digging_into_the_ground_lights_the_new_hole() {
        let mut world = single_chunk_world(WorldConfig::flat(16));
        world.set_block(Point3::new(5, 16, 5), BlockType::Air);
        world.set_block(Point3::new(5, 15, 5), BlockType::Air);
        world.set_block(Point3::new(6, 15, 5), BlockType::Air);

        assert_eq!(world.sky_light_at(Point3::new(5, 16, 5)), MAX_LIGHT);
        assert_eq!(world.sky_light_at(Point3::new(5, 15, 5)), MAX_LIGHT);
        assert_eq!(world.sky_light_at(Point3::new(6, 15, 5)), MAX_LIGHT - 1);
        assert_matches_recompute(&world);
    }

    #[test]
    fn leaf_roof_keeps_the_pocket_below_fully_lit() {
        let mut world = single_chunk_world(WorldConfig::flat(10));
        // A leaf roof over a pocket dug out of the ground keeps the pocket lit.
        world.set_block(Point3::new(3, 10, 3), BlockType::OakLeaves);
        world.set_block(Point3::new(3, 9, 3), BlockType::Air);
        assert_eq!(world.sky_light_at(Point3::new(3, 10, 3)), MAX_LIGHT);
        assert_eq!(world.sky_light_at(Point3::new(3, 9, 3)), MAX_LIGHT);
        assert_matches_recompute(&world);
    }

    #[test]
    fn light_crosses_into_loaded_neighbour_chunks() {
        let mut world = World::new(WorldConfig::flat(16));
        world.ensure_chunks_around(ChunkPosition::new(0, 0), 1);

        // A tunnel under the surface running across the x = 0 chunk border,
        // opened to the sky at x = 2.
        for x in -3..=2 {
            world.set_block(Point3::new(x, 12, 4), BlockType::Air);
        }
        for y in 13..=16 {
            world.set_block(Point3::new(2, y, 4), BlockType::Air);
        }

        assert_eq!(world.sky_light_at(Point3::new(2, 12, 4)), MAX_LIGHT);
        assert_eq!(world.sky_light_at(Point3::new(0, 12, 4)), MAX_LIGHT - 2);
        assert_eq!(world.sky_light_at(Point3::new(-1, 12, 4)), MAX_LIGHT - 3);
        assert_eq!(world.sky_light_at(Point3::new(-3, 12, 4)), MAX_LIGHT - 5);
    }

    #[test]
    fn capping_a_shaft_darkens_the_neighbour_chunk() {
        let mut world = World::new(WorldConfig::flat(16));
        world.ensure_chunks_around(ChunkPosition::new(0, 0), 1);
        for x in -3..=2 {
            world.set_block(Point3::new(x, 12, 4), BlockType::Air);
        }
        for y in 13..=16 {
            world.set_block(Point3::new(2, y, 4), BlockType::Air);
        }
        assert_eq!(world.sky_light_at(Point3::new(-1, 12, 4)), MAX_LIGHT - 3);

        // With the shaft capped, nothing lights the tunnel on either side of x = 0.
        world.set_block(Point3::new(2, 16, 4), BlockType::Dirt);
        assert_eq!(world.sky_light_at(Point3::new(2, 12, 4)), 0);
        assert_eq!(world.sky_light_at(Point3::new(0, 12, 4)), 0);
        assert_eq!(world.sky_light_at(Point3::new(-1, 12, 4)), 0);
        assert_eq!(world.sky_light_at(Point3::new(-3, 12, 4)), 0);
        assert_matches_recompute(&world);
    }

    #[test]
    fn unloaded_chunks_are_never_written() {
        let mut world = single_chunk_world(WorldConfig::empty());
        world.set_block(Point3::new(0, 20, 0), BlockType::Dirt);
        assert!(world.get_chunk(ChunkPosition::new(-1, 0)).is_none());
        assert_eq!(world.chunk_count(), 1);
    }
}
