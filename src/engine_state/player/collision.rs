//! Axis-aligned bounding boxes and the broad phase against the block grid.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::world::World;

/// An axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// The box of a body standing at `feet`, centred on it horizontally.
    pub fn from_feet(feet: Point3<f32>, width: f32, height: f32) -> Self {
        let half = width / 2.0;
        Aabb {
            min: Point3::new(feet.x - half, feet.y, feet.z - half),
            max: Point3::new(feet.x + half, feet.y + height, feet.z + half),
        }
    }

    /// The unit cube of the block at `pos`.
    pub fn block(pos: Point3<i32>) -> Self {
        let min = Point3::new(pos.x as f32, pos.y as f32, pos.z as f32);
        Aabb {
            min,
            max: min + Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Whether the two boxes overlap. Boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Boxes of every solid block within one block of `aabb`.
///
/// Reads go through the world, so ungenerated chunks contribute nothing.
pub fn solid_blocks_around(world: &World, aabb: &Aabb) -> Vec<Aabb> {
    let min = Point3::new(
        aabb.min.x.floor() as i32 - 1,
        aabb.min.y.floor() as i32 - 1,
        aabb.min.z.floor() as i32 - 1,
    );
    let max = Point3::new(
        aabb.max.x.ceil() as i32 + 1,
        aabb.max.y.ceil() as i32 + 1,
        aabb.max.z.ceil() as i32 + 1,
    );

    let mut blocks = Vec::new();
    for y in min.y..=max.y {
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                let pos = Point3::new(x, y, z);
                if world.is_solid(pos) {
                    blocks.push(Aabb::block(pos));
                }
            }
        }
    }
    blocks
}
