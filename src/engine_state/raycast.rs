//! # Voxel Ray Casting
//!
//! Block selection by walking a ray through the voxel grid one cell boundary at a
//! time (Amanatides and Woo's traversal). The first non-air block the ray enters
//! is the hit, together with the face it entered through.
//!
//! A ray that starts inside a block does not report that block; only blocks
//! entered after the first step count. The world is one chunk tall, so a ray stops
//! as soon as it has left that slab and keeps moving away from it.

use cgmath::{InnerSpace, Point3, Rad, Vector3};

use crate::engine_state::voxels::{
    block::block_side::BlockSide, chunk::CHUNK_HEIGHT, world::World,
};

/// Direction components smaller than this never cross a cell boundary.
const PARALLEL_EPSILON: f32 = 1e-6;

/// The block a ray hit and the face it entered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaycastResult {
    pub block_position: Point3<i32>,
    pub hit_face: BlockSide,
}

impl RaycastResult {
    /// The air block in front of the hit face, where a placed block would go.
    pub fn placement_position(&self) -> Point3<i32> {
        self.block_position + self.hit_face.normal()
    }
}

/// Converts a yaw and pitch into a unit view direction.
///
/// Yaw `0` looks along positive X and grows towards positive Z; pitch is the
/// angle above the horizon.
pub fn direction_from_angles(yaw: Rad<f32>, pitch: Rad<f32>) -> Vector3<f32> {
    let (yaw_sin, yaw_cos) = yaw.0.sin_cos();
    let (pitch_sin, pitch_cos) = pitch.0.sin_cos();
    Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos)
}

/// Casts a ray and returns the first non-air block it enters.
///
/// # Arguments
/// * `world` - The world to cast through. Ungenerated chunks read as air.
/// * `origin` - Where the ray starts, usually the player's eye
/// * `direction` - The ray direction. Need not be normalised.
/// * `max_distance` - Blocks entered further away than this are not hit
///
/// # Returns
/// The hit, or `None` if nothing was hit within `max_distance`. Non-finite
/// inputs never hit.
pub fn raycast(
    world: &World,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<RaycastResult> {
    let finite = origin.x.is_finite()
        && origin.y.is_finite()
        && origin.z.is_finite()
        && direction.x.is_finite()
        && direction.y.is_finite()
        && direction.z.is_finite()
        && max_distance.is_finite();
    if !finite || direction.magnitude2() == 0.0 {
        return None;
    }
    let direction = direction.normalize();

    let mut voxel = Point3::new(
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        origin.z.floor() as i32,
    );
    let origin = [origin.x, origin.y, origin.z];
    let direction = [direction.x, direction.y, direction.z];

    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];
    for axis in 0..3 {
        let d = direction[axis];
        if d.abs() < PARALLEL_EPSILON {
            continue;
        }
        let cell = origin[axis].floor();
        step[axis] = if d > 0.0 { 1 } else { -1 };
        t_delta[axis] = 1.0 / d.abs();
        let boundary = if d > 0.0 { cell + 1.0 } else { cell };
        t_max[axis] = (boundary - origin[axis]) / d;
    }

    loop {
        let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
            0
        } else if t_max[1] <= t_max[2] {
            1
        } else {
            2
        };

        if t_max[axis] > max_distance {
            return None;
        }

        voxel[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        let above = voxel.y >= CHUNK_HEIGHT && step[1] >= 0;
        let below = voxel.y < 0 && step[1] <= 0;
        if above || below {
            return None;
        }

        if !world.get_block_at_world(voxel).block_type.is_air() {
            return Some(RaycastResult {
                block_position: voxel,
                hit_face: entered_face(axis, step[axis]),
            });
        }
    }
}

/// The face a ray enters a block through when it steps along `axis` by `step`.
fn entered_face(axis: usize, step: i32) -> BlockSide {
    match (axis, step > 0) {
        (0, true) => BlockSide::NegX,
        (0, false) => BlockSide::PosX,
        (1, true) => BlockSide::NegY,
        (1, false) => BlockSide::PosY,
        (_, true) => BlockSide::NegZ,
        (_, false) => BlockSide::PosZ,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::engine_state::voxels::{block::block_type::BlockType, chunk::ChunkPosition};
    use cgmath::Deg;

    fn flat_world() -> World {
        let mut world = World::new(WorldConfig::flat(16));
        world.get_or_create_chunk(ChunkPosition::new(0, 0));
        world
    }

    fn eye() -> Point3<f32> {
        Point3::new(0.5, 17.6, 0.5)
    }

    #[test]
    fn looking_down_hits_the_grass_top() {
        let world = flat_world();
        let down = direction_from_angles(Rad(0.0), Deg(-90.0).into());
        let hit = raycast(&world, eye(), down, 10.0).unwrap();
        assert_eq!(hit.block_position, Point3::new(0, 16, 0));
        assert_eq!(hit.hit_face, BlockSide::PosY);
        assert_eq!(hit.placement_position(), Point3::new(0, 17, 0));
    }

    #[test]
    fn looking_up_into_open_sky_misses() {
        let world = flat_world();
        let up = direction_from_angles(Rad(0.0), Deg(90.0).into());
        assert_eq!(raycast(&world, eye(), up, 10.0), None);
    }

    #[test]
    fn rays_leaving_the_world_stop() {
        let world = flat_world();
        let up = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(raycast(&world, eye(), up, 1.0e9), None);
        let sideways = Vector3::new(1.0, 0.0, 0.0);
        let above_world = Point3::new(0.5, 40.0, 0.5);
        assert_eq!(raycast(&world, above_world, sideways, 1.0e9), None);

        // From above the world, a ray heading down still finds the ground.
        let down = Vector3::new(0.0, -1.0, 0.0);
        let hit = raycast(&world, above_world, down, 100.0).unwrap();
        assert_eq!(hit.block_position, Point3::new(0, 16, 0));
    }

    #[test]
    fn non_finite_rays_never_hit() {
        let world = flat_world();
        let down = Vector3::new(0.0, -1.0, 0.0);
        assert_eq!(raycast(&world, eye(), Vector3::new(f32::NAN, -1.0, 0.0), 10.0), None);
        assert_eq!(raycast(&world, eye(), down, f32::INFINITY), None);
        assert_eq!(raycast(&world, eye(), down, f32::NAN), None);
        assert_eq!(raycast(&world, Point3::new(0.5, f32::NAN, 0.5), down, 10.0), None);
    }

    #[test]
    fn hits_beyond_reach_are_ignored() {
        let world = flat_world();
        let down = Vector3::new(0.0, -1.0, 0.0);
        assert!(raycast(&world, eye(), down, 0.5).is_none());
        assert!(raycast(&world, eye(), down, 0.7).is_some());
    }

    #[test]
    fn sideways_ray_reports_the_entered_face() {
        let mut world = flat_world();
        world.set_block(Point3::new(4, 17, 0), BlockType::OakLog);
        world.set_block(Point3::new(0, 17, 4), BlockType::Dirt);

        let east = raycast(&world, eye(), Vector3::new(1.0, 0.0, 0.0), 6.0).unwrap();
        assert_eq!(east.block_position, Point3::new(4, 17, 0));
        assert_eq!(east.hit_face, BlockSide::NegX);

        let south = raycast(&world, eye(), Vector3::new(0.0, 0.0, 1.0), 6.0).unwrap();
        assert_eq!(south.block_position, Point3::new(0, 17, 4));
        assert_eq!(south.hit_face, BlockSide::NegZ);
    }

    #[test]
    fn diagonal_ray_walks_through_negative_coordinates() {
        let mut world = World::new(WorldConfig::flat(16));
        world.ensure_chunks_around(ChunkPosition::new(0, 0), 1);
        let origin = Point3::new(-0.5, 18.5, -0.5);
        let direction = Vector3::new(-1.0, -1.0, 0.0);

        let hit = raycast(&world, origin, direction, 10.0).unwrap();
        assert_eq!(hit.block_position.y, 16);
        assert!(hit.block_position.x < 0);
        assert!(matches!(hit.hit_face, BlockSide::PosY | BlockSide::PosX));
    }

    #[test]
    fn direction_from_angles_is_unit_length() {
        let direction = direction_from_angles(Deg(37.0).into(), Deg(-20.0).into());
        assert!((direction.magnitude() - 1.0).abs() < 1e-5);
        let forward = direction_from_angles(Rad(0.0), Rad(0.0));
        assert!((forward - Vector3::unit_x()).magnitude() < 1e-6);
    }
}
